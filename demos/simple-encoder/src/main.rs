//! Simple encoder example
//!
//! Decodes a quadrature knob on the Raspberry Pi Pico 2. An edge task wakes
//! on every change of the A⊕B line and feeds the decoder; the main loop
//! polls at 100 Hz and logs the step count via defmt.
//!
//! # Wiring
//!
//! | Signal  | Pico 2 Pin | Notes                                  |
//! |---------|------------|----------------------------------------|
//! | ENC A   | GP2        | Pull-up enabled                        |
//! | ENC B   | GP3        | Pull-up enabled                        |
//! | A XOR B | GP4        | External XOR gate, toggles on any step |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::{Duration, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rotary_decode::{BitOrder, EmbassyClock, EncoderConfig, PinGroup, RelativeEncoder};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

/// Concrete encoder type: two embassy-rp inputs, embassy-time clock.
type KnobEncoder = RelativeEncoder<PinGroup<Input<'static>, 2>>;

/// Shared between the edge task and the polling loop.
static ENCODER: StaticCell<KnobEncoder> = StaticCell::new();

/// Feed every edge of the XOR line into the decoder.
#[embassy_executor::task]
async fn edge_task(mut edge: Input<'static>, encoder: &'static KnobEncoder) {
    loop {
        edge.wait_for_any_edge().await;
        encoder.on_raw_edge();
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- Encoder lines (pull configuration is fixed here, not at setup) ---
    let lines = PinGroup::new(
        [Input::new(p.PIN_2, Pull::Up), Input::new(p.PIN_3, Pull::Up)],
        BitOrder::LsbFirst,
    );
    let edge = Input::new(p.PIN_4, Pull::None);

    let encoder: &'static KnobEncoder =
        match RelativeEncoder::new(lines, EmbassyClock, EncoderConfig::default()) {
            Ok(encoder) => ENCODER.init(encoder),
            Err(_) => defmt::panic!("Encoder needs exactly two lines"),
        };

    // Prime from the current knob position, then start listening for edges.
    if encoder
        .setup_with(|| spawner.spawn(unwrap!(edge_task(edge, encoder))))
        .is_err()
    {
        error!("Encoder setup failed");
        return;
    }

    info!("Encoder example started, turn the knob to see step changes");

    let mut ticker = Ticker::every(Duration::from_millis(10));
    loop {
        ticker.next().await;

        let report = encoder.poll();
        if report.error {
            warn!("Missed or illegal transition, steps={}", report.steps);
        }
        if report.change != 0 {
            info!(
                "Steps: {} (change {}, {})",
                report.steps, report.change, report.direction
            );
        }
    }
}

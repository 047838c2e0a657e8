//! Interrupt-driven rotary encoder decoding for `no_std` targets.
//!
//! Two encoder kinds are supported:
//!
//! - **Absolute**: a 4-line reflected Gray-code wheel with 16 positions.
//!   Each reading maps straight to a position index; a jump that is not
//!   exactly one step raises an error flag.
//! - **Relative**: a 2-line quadrature encoder (A/B). Each legal transition
//!   is ±1 step; steps accumulate in an interrupt-side buffer and are moved
//!   into the visible total by [`Encoder::synchronize`].
//!
//! # Architecture
//!
//! - **[`SampleSource`]**: source of the raw levels, either a [`PinGroup`] of
//!   `embedded-hal` inputs or a [`PortBank`] masked out of one port register.
//! - **[`AbsoluteDecoder`] / [`RelativeDecoder`]**: plain state machines
//!   driven by the lookup tables in [`tables`].
//! - **[`Encoder`]**: the decoder, source and [`Debouncer`] behind one
//!   critical-section mutex, shared between the pin-change interrupt
//!   ([`Encoder::on_raw_edge`]) and the polling loop.
//!
//! # Quick start
//!
//! ```ignore
//! use rotary_decode::{BitOrder, EmbassyClock, EncoderConfig, PinGroup, RelativeEncoder};
//!
//! let lines = PinGroup::new([pin_a, pin_b], BitOrder::LsbFirst);
//! let encoder: RelativeEncoder<_> =
//!     RelativeEncoder::new(lines, EmbassyClock, EncoderConfig::default())?;
//! encoder.setup_with(|| enable_pin_change_interrupts())?;
//!
//! // In the pin-change interrupt:
//! encoder.on_raw_edge();
//!
//! // In the main loop:
//! let report = encoder.poll();
//! ```
//!
//! # Features
//!
//! - **`defmt`**: Enable [`defmt::Format`] on the public types and emit
//!   `defmt` log frames for setup, illegal transitions and read failures.

#![no_std]

pub use absolute::AbsoluteDecoder;
pub use clock::{Clock, EmbassyClock};
pub use debounce::Debouncer;
pub use encoder::{
    AbsoluteEncoder, Decoder, EdgeOutcome, Encoder, EncoderConfig, PollReport, RelativeEncoder,
};
pub use error::EncoderError;
pub use motion::{Direction, Transition};
pub use relative::RelativeDecoder;
pub use source::{BitOrder, PinGroup, PinMode, PortBank, PortRegister, SampleSource};
pub use tables::{ABSOLUTE_LINES, ABSOLUTE_POSITIONS, DEFAULT_DEBOUNCE_MS, RELATIVE_LINES};

mod absolute;
mod clock;
mod debounce;
mod encoder;
mod error;
mod motion;
mod relative;
mod source;
pub mod tables;

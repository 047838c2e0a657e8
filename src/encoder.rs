//! Interrupt-safe encoder: sample source, debounce filter and decoder
//! behind one critical-section mutex.
//!
//! An [`Encoder`] is meant to live in a `static` and be shared between two
//! contexts:
//!
//! - **Interrupt context** calls [`Encoder::on_raw_edge`] on every pin
//!   change. It debounces, samples the lines and advances the decoder.
//! - **Polling context** (the main loop) reads position, direction and
//!   steps, calls [`Encoder::synchronize`] once per cycle for relative
//!   encoders, and acknowledges errors with [`Encoder::consume_error`].
//!
//! Every access runs inside a short critical section taken through
//! [`CriticalSectionRawMutex`], so the interrupt can never observe a
//! half-finished buffer transfer and the polling side never reads a torn
//! multi-byte value. Nothing here blocks or waits.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::absolute::AbsoluteDecoder;
use crate::clock::{Clock, EmbassyClock};
use crate::debounce::Debouncer;
use crate::error::EncoderError;
use crate::motion::{Direction, Transition};
use crate::relative::RelativeDecoder;
use crate::source::{PinMode, SampleSource};
use crate::tables::{ABSOLUTE_LINES, RELATIVE_LINES};

// ── Decoder seam ─────────────────────────────────────────────────────────

/// A bit-pattern state machine that an [`Encoder`] can drive.
pub trait Decoder: Default {
    /// Number of lines in one reading.
    const LINES: u8;

    /// Load the first reading as both previous and current.
    fn prime(&mut self, raw: u8);

    /// Advance by one accepted reading.
    fn update(&mut self, raw: u8) -> Transition;

    /// Read (and optionally clear) the sticky error flag.
    fn consume_error(&mut self, reset: bool) -> bool;

    /// Raise the sticky error flag.
    fn flag_error(&mut self);
}

impl Decoder for AbsoluteDecoder {
    const LINES: u8 = ABSOLUTE_LINES;

    fn prime(&mut self, raw: u8) {
        AbsoluteDecoder::prime(self, raw);
    }

    fn update(&mut self, raw: u8) -> Transition {
        AbsoluteDecoder::update(self, raw)
    }

    fn consume_error(&mut self, reset: bool) -> bool {
        AbsoluteDecoder::consume_error(self, reset)
    }

    fn flag_error(&mut self) {
        AbsoluteDecoder::flag_error(self);
    }
}

impl Decoder for RelativeDecoder {
    const LINES: u8 = RELATIVE_LINES;

    fn prime(&mut self, raw: u8) {
        RelativeDecoder::prime(self, raw);
    }

    fn update(&mut self, raw: u8) -> Transition {
        RelativeDecoder::update(self, raw)
    }

    fn consume_error(&mut self, reset: bool) -> bool {
        RelativeDecoder::consume_error(self, reset)
    }

    fn flag_error(&mut self) {
        RelativeDecoder::flag_error(self);
    }
}

// ── Configuration and results ────────────────────────────────────────────

/// Per-encoder configuration.
///
/// [`EncoderConfig::default()`] accepts every edge and asks for pull-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Minimum time between accepted edges in ms. Default: 0 (off).
    pub debounce_ms: u32,
    /// Mode applied to the lines at setup. Default: pull-up.
    ///
    /// Only sources that own their pin configuration honour it, such as
    /// [`PortBank`](crate::PortBank). A [`PinGroup`](crate::PinGroup) keeps
    /// the pulls chosen when its HAL inputs were built.
    pub pin_mode: PinMode,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 0,
            pin_mode: PinMode::PullUp,
        }
    }
}

impl EncoderConfig {
    /// Set the debounce window.
    pub fn with_debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Set the line mode applied at setup.
    pub fn with_pin_mode(mut self, pin_mode: PinMode) -> Self {
        self.pin_mode = pin_mode;
        self
    }
}

/// What the edge handler did with one interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// Edge arrived inside the debounce window and was dropped.
    Suppressed,
    /// Lines were sampled and fed to the decoder.
    Decoded(Transition),
    /// The sample source failed; the error flag was raised.
    ReadFailed,
}

/// Result of one polling cycle of a relative encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// Steps moved into the visible total by this cycle.
    pub change: i32,
    /// Visible total after the transfer.
    pub steps: i32,
    /// Direction of the last non-zero step.
    pub direction: Direction,
    /// An error was pending; the flag has been cleared.
    pub error: bool,
}

// ── Encoder ──────────────────────────────────────────────────────────────

struct Inner<D, S> {
    decoder: D,
    source: S,
    debouncer: Debouncer,
}

/// Decoder, sample source and debounce filter shared between an interrupt
/// handler and a polling loop.
///
/// Use the [`AbsoluteEncoder`] and [`RelativeEncoder`] aliases.
pub struct Encoder<D, S, C = EmbassyClock> {
    state: Mutex<CriticalSectionRawMutex, RefCell<Inner<D, S>>>,
    clock: C,
    pin_mode: PinMode,
}

/// 4-line Gray-code wheel.
pub type AbsoluteEncoder<S, C = EmbassyClock> = Encoder<AbsoluteDecoder, S, C>;

/// 2-line quadrature encoder.
pub type RelativeEncoder<S, C = EmbassyClock> = Encoder<RelativeDecoder, S, C>;

impl<D, S, C> Encoder<D, S, C>
where
    D: Decoder,
    S: SampleSource,
    C: Clock,
{
    /// Wrap `source` without touching the hardware.
    ///
    /// # Errors
    /// [`EncoderError::LineCount`] if `source` does not track exactly
    /// `D::LINES` lines.
    pub fn new(source: S, clock: C, config: EncoderConfig) -> Result<Self, EncoderError<S::Error>> {
        let found = source.line_count();
        if found != D::LINES {
            return Err(EncoderError::LineCount {
                expected: D::LINES,
                found,
            });
        }

        Ok(Self {
            state: Mutex::new(RefCell::new(Inner {
                decoder: D::default(),
                source,
                debouncer: Debouncer::new(config.debounce_ms),
            })),
            clock,
            pin_mode: config.pin_mode,
        })
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut Inner<D, S>) -> R) -> R {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Configure the lines and prime the decoder with one reading.
    ///
    /// Call before interrupts are armed; see [`setup_with`](Self::setup_with).
    pub fn setup(&self) -> Result<(), EncoderError<S::Error>> {
        self.setup_with(|| {})
    }

    /// Configure the lines, prime the decoder, then run `arm_interrupts`.
    ///
    /// The closure is where pin-change interrupts get attached, so that the
    /// first interrupt is measured against a real previous reading rather
    /// than a zeroed history. It is not called when setup fails.
    ///
    /// # Errors
    /// [`EncoderError::Source`] if configuring or reading the lines fails.
    pub fn setup_with<F>(&self, arm_interrupts: F) -> Result<(), EncoderError<S::Error>>
    where
        F: FnOnce(),
    {
        let pin_mode = self.pin_mode;
        let _raw = self
            .with_state(|inner| -> Result<u8, S::Error> {
                inner.source.set_pin_mode(pin_mode)?;
                let raw = inner.source.read()?;
                inner.decoder.prime(raw);
                inner.debouncer.reset();
                Ok(raw)
            })
            .map_err(EncoderError::Source)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Encoder primed, reading={=u8:#06b}", _raw);

        arm_interrupts();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Interrupt context
    // -----------------------------------------------------------------------

    /// Body of the pin-change interrupt handler.
    ///
    /// Debounce check, sample, decoder update, all inside one critical
    /// section. Never blocks and never reports errors synchronously: illegal
    /// transitions and read failures raise the sticky error flag.
    pub fn on_raw_edge(&self) -> EdgeOutcome {
        let now = self.clock.now_ms();

        self.with_state(|inner| {
            if !inner.debouncer.accept(now) {
                return EdgeOutcome::Suppressed;
            }

            match inner.source.read() {
                Ok(raw) => {
                    let transition = inner.decoder.update(raw);
                    #[cfg(feature = "defmt")]
                    {
                        if transition.is_invalid() {
                            defmt::warn!("Illegal encoder transition, reading={=u8:#06b}", raw);
                        }
                    }
                    EdgeOutcome::Decoded(transition)
                }
                Err(_) => {
                    inner.decoder.flag_error();
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Encoder sample read failed");
                    EdgeOutcome::ReadFailed
                }
            }
        })
    }

    // -----------------------------------------------------------------------
    // Polling context
    // -----------------------------------------------------------------------

    /// Returns whether an error occurred since the last consumption; clears
    /// the flag unless `reset` is `false`.
    pub fn consume_error(&self, reset: bool) -> bool {
        self.with_state(|inner| inner.decoder.consume_error(reset))
    }

    /// Change the debounce window at run time.
    pub fn set_debounce_delay(&self, debounce_ms: u32) {
        self.with_state(|inner| inner.debouncer.set_delay_ms(debounce_ms));
    }

    /// Current debounce window in ms.
    pub fn debounce_delay(&self) -> u32 {
        self.with_state(|inner| inner.debouncer.delay_ms())
    }

    /// Consistent copy of the decoder state.
    pub fn snapshot(&self) -> D
    where
        D: Copy,
    {
        self.with_state(|inner| inner.decoder)
    }

    /// Tear down and hand the sample source back.
    pub fn release(self) -> S {
        self.state.into_inner().into_inner().source
    }
}

impl<S, C> Encoder<AbsoluteDecoder, S, C>
where
    S: SampleSource,
    C: Clock,
{
    /// Position index `0..16` of the latest accepted reading.
    pub fn read_position(&self) -> u8 {
        self.with_state(|inner| inner.decoder.position())
    }

    /// Direction of the last legal move.
    pub fn read_direction(&self) -> Direction {
        self.with_state(|inner| inner.decoder.direction())
    }
}

impl<S, C> Encoder<RelativeDecoder, S, C>
where
    S: SampleSource,
    C: Clock,
{
    /// Move the steps buffered by the interrupt into the visible total.
    ///
    /// Call once per polling cycle before trusting
    /// [`read_steps`](Self::read_steps). Returns the change applied.
    pub fn synchronize(&self) -> i32 {
        self.with_state(|inner| inner.decoder.synchronize())
    }

    /// Visible step total as of the last [`synchronize`](Self::synchronize).
    pub fn read_steps(&self) -> i32 {
        self.with_state(|inner| inner.decoder.steps())
    }

    /// Steps decoded by the interrupt but not yet synchronized.
    pub fn pending_steps(&self) -> i32 {
        self.with_state(|inner| inner.decoder.pending())
    }

    /// Make the current physical position the logical origin.
    pub fn home(&self) {
        self.with_state(|inner| inner.decoder.home());
    }

    /// Direction of the last non-zero step.
    pub fn read_direction(&self) -> Direction {
        self.with_state(|inner| inner.decoder.direction())
    }

    /// One polling cycle: synchronize, then consume the error flag.
    pub fn poll(&self) -> PollReport {
        let report = self.with_state(|inner| {
            let change = inner.decoder.synchronize();
            PollReport {
                change,
                steps: inner.decoder.steps(),
                direction: inner.decoder.direction(),
                error: inner.decoder.consume_error(true),
            }
        });

        #[cfg(feature = "defmt")]
        {
            if report.error {
                defmt::warn!("Relative encoder error since last poll, steps={}", report.steps);
            }
        }

        report
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use core::cell::Cell;
    use core::sync::atomic::{AtomicU8, Ordering};

    use crate::source::{BitOrder, PortBank, PortRegister};
    use crate::tables::{binary_to_gray, GRAY_POSITION_TABLE};

    extern crate std;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct ReadFault;

    /// Lines whose level and health the test controls through cells.
    struct ScriptedLines<'a> {
        lines: u8,
        level: &'a Cell<u8>,
        failing: &'a Cell<bool>,
        mode: &'a Cell<Option<PinMode>>,
    }

    impl SampleSource for ScriptedLines<'_> {
        type Error = ReadFault;

        fn line_count(&self) -> u8 {
            self.lines
        }

        fn read(&mut self) -> Result<u8, Self::Error> {
            if self.failing.get() {
                Err(ReadFault)
            } else {
                Ok(self.level.get())
            }
        }

        fn set_pin_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
            self.mode.set(Some(mode));
            Ok(())
        }
    }

    #[derive(Default)]
    struct Rig {
        level: Cell<u8>,
        failing: Cell<bool>,
        mode: Cell<Option<PinMode>>,
        now: Cell<u32>,
    }

    impl Rig {
        fn lines(&self, lines: u8) -> ScriptedLines<'_> {
            ScriptedLines {
                lines,
                level: &self.level,
                failing: &self.failing,
                mode: &self.mode,
            }
        }

        /// Set the lines, advance the clock, fire the edge handler.
        fn edge<D: Decoder>(
            &self,
            encoder: &Encoder<D, ScriptedLines<'_>, impl Clock>,
            raw: u8,
            advance_ms: u32,
        ) -> EdgeOutcome {
            self.level.set(raw);
            self.now.set(self.now.get().wrapping_add(advance_ms));
            encoder.on_raw_edge()
        }
    }

    fn absolute(
        rig: &Rig,
        config: EncoderConfig,
    ) -> AbsoluteEncoder<ScriptedLines<'_>, impl Fn() -> u32 + '_> {
        Encoder::new(rig.lines(4), move || rig.now.get(), config).unwrap()
    }

    fn relative(
        rig: &Rig,
        config: EncoderConfig,
    ) -> RelativeEncoder<ScriptedLines<'_>, impl Fn() -> u32 + '_> {
        Encoder::new(rig.lines(2), move || rig.now.get(), config).unwrap()
    }

    // ── Construction and setup ───────────────────────────────────────

    #[test]
    fn new_rejects_wrong_line_count() {
        let rig = Rig::default();
        let result =
            Encoder::<AbsoluteDecoder, _, _>::new(rig.lines(2), || 0u32, EncoderConfig::default());
        assert!(matches!(
            result,
            Err(EncoderError::LineCount {
                expected: 4,
                found: 2
            })
        ));

        let result =
            Encoder::<RelativeDecoder, _, _>::new(rig.lines(4), || 0u32, EncoderConfig::default());
        assert!(matches!(
            result,
            Err(EncoderError::LineCount {
                expected: 2,
                found: 4
            })
        ));
    }

    #[test]
    fn setup_applies_mode_primes_and_arms() {
        let rig = Rig::default();
        rig.level.set(binary_to_gray(7));
        let encoder = absolute(&rig, EncoderConfig::default().with_pin_mode(PinMode::PullDown));

        let armed = Cell::new(false);
        encoder.setup_with(|| armed.set(true)).unwrap();

        assert!(armed.get());
        assert_eq!(rig.mode.get(), Some(PinMode::PullDown));
        assert_eq!(encoder.read_position(), 7);
        assert_eq!(encoder.read_direction(), Direction::Stationary);
        assert!(!encoder.consume_error(true));
    }

    #[test]
    fn setup_failure_does_not_arm() {
        let rig = Rig::default();
        rig.failing.set(true);
        let encoder = relative(&rig, EncoderConfig::default());

        let armed = Cell::new(false);
        let result = encoder.setup_with(|| armed.set(true));
        assert_eq!(result, Err(EncoderError::Source(ReadFault)));
        assert!(!armed.get());
    }

    #[test]
    fn primed_first_edge_is_no_change() {
        let rig = Rig::default();
        rig.level.set(0b11);
        let encoder = relative(&rig, EncoderConfig::default());
        encoder.setup().unwrap();

        assert_eq!(rig.edge(&encoder, 0b11, 1), EdgeOutcome::Decoded(Transition::Stay));
        assert!(!encoder.consume_error(true));
    }

    // ── Absolute encoder ─────────────────────────────────────────────

    #[test]
    fn absolute_forward_scenario() {
        let rig = Rig::default();
        let encoder = absolute(&rig, EncoderConfig::default());
        encoder.setup().unwrap();

        for raw in [0, 1, 3, 2] {
            rig.edge(&encoder, raw, 1);
        }

        assert_eq!(encoder.read_position(), GRAY_POSITION_TABLE[2]);
        assert_eq!(encoder.read_direction().signum(), 1);
        assert!(!encoder.consume_error(true));
    }

    #[test]
    fn absolute_mirrored_wiring_through_port_bank() {
        struct Port<'a>(&'a Cell<u8>);

        impl PortRegister for Port<'_> {
            fn read(&mut self) -> u8 {
                self.0.get()
            }

            fn configure(&mut self, _mask: u8, _mode: PinMode) {}
        }

        // Lines on port bits 4..8, wired highest line first.
        let port_value = Cell::new(0);
        let bank = PortBank::new(Port(&port_value), 0xF0, BitOrder::MsbFirst).unwrap();
        let encoder =
            Encoder::<AbsoluteDecoder, _, _>::new(bank, || 0u32, EncoderConfig::default()).unwrap();
        encoder.setup().unwrap();

        // Direction follows position order, so raw 0 → 1 is a backward step
        // on this wiring and raw 1 → 0 a forward one.
        port_value.set(1 << 4);
        assert_eq!(
            encoder.on_raw_edge(),
            EdgeOutcome::Decoded(Transition::Backward)
        );
        assert_eq!(encoder.read_direction(), Direction::Backward);
        port_value.set(0);
        assert_eq!(
            encoder.on_raw_edge(),
            EdgeOutcome::Decoded(Transition::Forward)
        );
        assert_eq!(encoder.read_direction(), Direction::Forward);

        let expected = [0, 15, 7, 8, 3, 12, 4, 11, 1, 14, 6, 9, 2, 13, 5, 10];
        for (raw, &position) in expected.iter().enumerate() {
            port_value.set((raw as u8) << 4);
            encoder.on_raw_edge();
            assert_eq!(encoder.read_position(), position, "raw {:#06b}", raw);
        }
    }

    #[test]
    fn absolute_invalid_jump_sets_sticky_error() {
        let rig = Rig::default();
        let encoder = absolute(&rig, EncoderConfig::default());
        encoder.setup().unwrap();

        rig.edge(&encoder, 1, 1);
        assert_eq!(
            rig.edge(&encoder, binary_to_gray(6), 1),
            EdgeOutcome::Decoded(Transition::Invalid)
        );

        assert_eq!(encoder.read_position(), 6);
        assert_eq!(encoder.read_direction(), Direction::Forward);
        assert!(encoder.consume_error(false));
        assert!(encoder.consume_error(false));
        assert!(encoder.consume_error(true));
        assert!(!encoder.consume_error(true));
    }

    // ── Relative encoder ─────────────────────────────────────────────

    #[test]
    fn relative_cycle_scenario() {
        let rig = Rig::default();
        let encoder = relative(&rig, EncoderConfig::default());
        encoder.setup().unwrap();

        for raw in [0b00, 0b01, 0b11, 0b10, 0b00] {
            rig.edge(&encoder, raw, 1);
        }
        assert_eq!(encoder.read_steps(), 0);
        assert_eq!(encoder.pending_steps(), 4);

        assert_eq!(encoder.synchronize(), 4);
        assert_eq!(encoder.read_steps(), 4);
        assert_eq!(encoder.read_direction(), Direction::Forward);
    }

    #[test]
    fn relative_double_flip_is_discarded() {
        let rig = Rig::default();
        let encoder = relative(&rig, EncoderConfig::default());
        encoder.setup().unwrap();

        assert_eq!(
            rig.edge(&encoder, 0b11, 1),
            EdgeOutcome::Decoded(Transition::Invalid)
        );
        encoder.synchronize();
        assert_eq!(encoder.read_steps(), 0);
        assert!(encoder.consume_error(true));
    }

    #[test]
    fn home_then_read_is_zero() {
        let rig = Rig::default();
        let encoder = relative(&rig, EncoderConfig::default());
        encoder.setup().unwrap();

        for raw in [0b10, 0b11, 0b01, 0b00, 0b10] {
            rig.edge(&encoder, raw, 1);
        }
        encoder.synchronize();
        assert_eq!(encoder.read_steps(), -5);
        rig.edge(&encoder, 0b11, 1); // buffered, not yet visible

        encoder.home();
        assert_eq!(encoder.read_steps(), 0);
        assert_eq!(encoder.synchronize(), 0);
    }

    #[test]
    fn poll_reports_and_clears_error() {
        let rig = Rig::default();
        let encoder = relative(&rig, EncoderConfig::default());
        encoder.setup().unwrap();

        rig.edge(&encoder, 0b01, 1);
        rig.edge(&encoder, 0b10, 1); // illegal
        let report = encoder.poll();
        assert_eq!(
            report,
            PollReport {
                change: 1,
                steps: 1,
                direction: Direction::Forward,
                error: true,
            }
        );

        let report = encoder.poll();
        assert_eq!(report.change, 0);
        assert_eq!(report.steps, 1);
        assert!(!report.error);
    }

    #[test]
    fn read_failure_flags_error_and_keeps_state() {
        let rig = Rig::default();
        let encoder = relative(&rig, EncoderConfig::default());
        encoder.setup().unwrap();
        rig.edge(&encoder, 0b01, 1);

        rig.failing.set(true);
        assert_eq!(rig.edge(&encoder, 0b11, 1), EdgeOutcome::ReadFailed);
        rig.failing.set(false);

        let decoder = encoder.snapshot();
        assert_eq!(decoder.pending(), 1);
        assert_eq!(decoder.history() & 0b11, 0b01);
        assert!(encoder.consume_error(true));
    }

    // ── Debounce ─────────────────────────────────────────────────────

    #[test]
    fn debounce_drops_edges_inside_window() {
        let rig = Rig::default();
        let encoder = relative(&rig, EncoderConfig::default().with_debounce_ms(5));
        encoder.setup().unwrap();

        assert!(matches!(rig.edge(&encoder, 0b01, 10), EdgeOutcome::Decoded(_)));
        assert_eq!(rig.edge(&encoder, 0b11, 3), EdgeOutcome::Suppressed);
        assert_eq!(rig.edge(&encoder, 0b11, 2), EdgeOutcome::Suppressed);
        // 6 ms after the accepted edge.
        assert_eq!(
            rig.edge(&encoder, 0b11, 1),
            EdgeOutcome::Decoded(Transition::Forward)
        );
        assert_eq!(encoder.synchronize(), 2);
    }

    #[test]
    fn debounce_delay_can_change_at_runtime() {
        let rig = Rig::default();
        let encoder = relative(&rig, EncoderConfig::default().with_debounce_ms(50));
        encoder.setup().unwrap();
        assert_eq!(encoder.debounce_delay(), 50);

        rig.edge(&encoder, 0b01, 1);
        assert_eq!(rig.edge(&encoder, 0b11, 1), EdgeOutcome::Suppressed);

        encoder.set_debounce_delay(0);
        assert_eq!(
            rig.edge(&encoder, 0b11, 0),
            EdgeOutcome::Decoded(Transition::Forward)
        );
    }

    #[test]
    fn release_returns_source() {
        let rig = Rig::default();
        let encoder = relative(&rig, EncoderConfig::default());
        let lines = encoder.release();
        assert_eq!(lines.line_count(), 2);
    }

    // ── Cross-context transfer ───────────────────────────────────────

    struct AtomicLines<'a>(&'a AtomicU8);

    impl SampleSource for AtomicLines<'_> {
        type Error = core::convert::Infallible;

        fn line_count(&self) -> u8 {
            2
        }

        fn read(&mut self) -> Result<u8, Self::Error> {
            Ok(self.0.load(Ordering::SeqCst))
        }

        fn set_pin_mode(&mut self, _mode: PinMode) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn concurrent_synchronize_loses_no_steps() {
        const CYCLE: [u8; 4] = [0b01, 0b11, 0b10, 0b00];
        const EDGES: usize = 20_000;

        let level = AtomicU8::new(0);
        let encoder = Encoder::<RelativeDecoder, _, _>::new(
            AtomicLines(&level),
            || 0u32,
            EncoderConfig::default(),
        )
        .unwrap();
        encoder.setup().unwrap();

        let mut observed = 0;
        std::thread::scope(|scope| {
            let producer = scope.spawn(|| {
                for i in 0..EDGES {
                    level.store(CYCLE[i % 4], Ordering::SeqCst);
                    encoder.on_raw_edge();
                }
            });
            while !producer.is_finished() {
                observed += encoder.synchronize();
            }
        });
        observed += encoder.synchronize();

        assert_eq!(observed, EDGES as i32);
        assert_eq!(encoder.read_steps(), EDGES as i32);
        assert!(!encoder.consume_error(true));
    }
}

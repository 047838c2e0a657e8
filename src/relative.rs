//! 2-line quadrature relative decoder.
//!
//! Steps are produced on the interrupt side into a buffer and only become
//! visible after [`RelativeDecoder::synchronize`] moves them into the
//! running total. At any instant the true count is `steps() + pending()`.

use crate::motion::{Direction, Transition};
use crate::tables::{QUADRATURE_TRANSITIONS, RELATIVE_HISTORY_MASK, RELATIVE_READING_MASK};

/// Quadrature state machine with a producer buffer and a visible total.
///
/// # Example
///
/// ```
/// use rotary_decode::{Direction, RelativeDecoder};
///
/// let mut decoder = RelativeDecoder::new();
/// decoder.prime(0b00);
/// for raw in [0b01, 0b11, 0b10, 0b00] {
///     decoder.update(raw);
/// }
/// assert_eq!(decoder.steps(), 0); // not synchronized yet
/// assert_eq!(decoder.synchronize(), 4);
/// assert_eq!(decoder.steps(), 4);
/// assert_eq!(decoder.direction(), Direction::Forward);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelativeDecoder {
    /// bits 3-2: previous reading, bits 1-0: current reading.
    history: u8,
    buffer: i32,
    total: i32,
    direction: Direction,
    error: bool,
}

impl RelativeDecoder {
    /// Decoder with zero steps and an all-zero history.
    pub const fn new() -> Self {
        Self {
            history: 0,
            buffer: 0,
            total: 0,
            direction: Direction::Stationary,
            error: false,
        }
    }

    /// Load `raw` as both previous and current reading.
    pub fn prime(&mut self, raw: u8) {
        let raw = raw & RELATIVE_READING_MASK;
        self.history = (raw << 2) | raw;
        self.direction = Direction::Stationary;
        self.error = false;
    }

    /// Feed one accepted reading. Legal steps go to the buffer; an illegal
    /// step raises the error flag and leaves the buffer untouched.
    pub fn update(&mut self, raw: u8) -> Transition {
        self.history = ((self.history << 2) | (raw & RELATIVE_READING_MASK)) & RELATIVE_HISTORY_MASK;
        let transition = QUADRATURE_TRANSITIONS[self.history as usize];

        match transition.delta() {
            Some(delta) => {
                self.buffer = self.buffer.wrapping_add(i32::from(delta));
                if let Some(direction) = transition.direction() {
                    self.direction = direction;
                }
            }
            None => self.error = true,
        }

        transition
    }

    /// Move the buffered steps into the visible total and clear the buffer.
    ///
    /// Returns the change that was applied.
    pub fn synchronize(&mut self) -> i32 {
        let change = self.buffer;
        self.total = self.total.wrapping_add(change);
        self.buffer = 0;
        change
    }

    /// Zero both the visible total and the buffer.
    pub fn home(&mut self) {
        self.buffer = 0;
        self.total = 0;
    }

    /// Visible total as of the last [`synchronize`](Self::synchronize).
    pub fn steps(&self) -> i32 {
        self.total
    }

    /// Steps decoded since the last synchronization.
    pub fn pending(&self) -> i32 {
        self.buffer
    }

    /// Direction of the last non-zero step.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Packed (previous, current) readings.
    pub fn history(&self) -> u8 {
        self.history
    }

    /// Returns whether an error occurred since the last consumption and
    /// clears the flag when `reset` is `true`.
    pub fn consume_error(&mut self, reset: bool) -> bool {
        let error = self.error;
        if reset {
            self.error = false;
        }
        error
    }

    /// Raise the sticky error flag from outside the decode path.
    pub fn flag_error(&mut self) {
        self.error = true;
    }
}

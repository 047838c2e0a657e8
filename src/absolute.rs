//! 4-line Gray-code absolute decoder.

use crate::motion::{Direction, Transition};
use crate::tables::{ABSOLUTE_READING_MASK, ABSOLUTE_TRANSITIONS, GRAY_POSITION_TABLE};

/// State machine for a 16-position Gray-code wheel.
///
/// Each accepted reading is unwrapped through [`GRAY_POSITION_TABLE`] and
/// the (previous, current) pair is checked against [`ABSOLUTE_TRANSITIONS`].
/// An illegal jump raises a sticky error flag; the position is still
/// updated to the latest reading, the direction is not.
///
/// # Example
///
/// ```
/// use rotary_decode::{AbsoluteDecoder, Direction};
///
/// let mut decoder = AbsoluteDecoder::new();
/// decoder.prime(0);
/// for raw in [1, 3, 2] {
///     decoder.update(raw);
/// }
/// assert_eq!(decoder.position(), 3);
/// assert_eq!(decoder.direction(), Direction::Forward);
/// assert!(!decoder.consume_error(true));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbsoluteDecoder {
    /// bits 7-4: previous reading, bits 3-0: current reading.
    history: u8,
    position: u8,
    direction: Direction,
    error: bool,
}

impl AbsoluteDecoder {
    /// Decoder at position 0 with an all-zero history. Call
    /// [`prime`](Self::prime) with a real reading before the first update.
    pub const fn new() -> Self {
        Self {
            history: 0,
            position: 0,
            direction: Direction::Stationary,
            error: false,
        }
    }

    /// Load `raw` as both previous and current reading, so the first real
    /// transition is measured from here instead of from zero.
    pub fn prime(&mut self, raw: u8) {
        let raw = raw & ABSOLUTE_READING_MASK;
        self.history = (raw << 4) | raw;
        self.position = GRAY_POSITION_TABLE[raw as usize];
        self.direction = Direction::Stationary;
        self.error = false;
    }

    /// Feed one accepted reading and classify the move.
    pub fn update(&mut self, raw: u8) -> Transition {
        self.history = (self.history << 4) | (raw & ABSOLUTE_READING_MASK);
        let transition = ABSOLUTE_TRANSITIONS[self.history as usize];

        match transition.direction() {
            Some(direction) => self.direction = direction,
            None if transition.is_invalid() => self.error = true,
            None => {}
        }
        // Best effort: the latest reading wins even after an illegal jump.
        self.position = GRAY_POSITION_TABLE[(self.history & ABSOLUTE_READING_MASK) as usize];

        transition
    }

    /// Position index `0..16` of the latest reading.
    pub fn position(&self) -> u8 {
        self.position
    }

    /// Direction of the last legal move.
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

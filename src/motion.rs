//! Motion value types shared by both decoders.

/// Last observed travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Toward lower positions / negative steps.
    Backward,
    /// No motion recorded since priming or homing.
    #[default]
    Stationary,
    /// Toward higher positions / positive steps.
    Forward,
}

impl Direction {
    /// Returns `-1`, `0` or `+1`.
    pub const fn signum(self) -> i8 {
        match self {
            Direction::Backward => -1,
            Direction::Stationary => 0,
            Direction::Forward => 1,
        }
    }

    /// Direction of a signed step count (`0` maps to `Stationary`).
    pub const fn of(delta: i32) -> Self {
        if delta > 0 {
            Direction::Forward
        } else if delta < 0 {
            Direction::Backward
        } else {
            Direction::Stationary
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.signum()
    }
}

/// Outcome of classifying one (previous, current) reading pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    /// Readings are equal.
    Stay,
    /// One step forward.
    Forward,
    /// One step backward.
    Backward,
    /// The sensor cannot make this move in one sample: a skipped step or a
    /// corrupted read.
    Invalid,
}

impl Transition {
    /// Signed step of a legal transition, `None` when invalid.
    pub const fn delta(self) -> Option<i8> {
        match self {
            Transition::Stay => Some(0),
            Transition::Forward => Some(1),
            Transition::Backward => Some(-1),
            Transition::Invalid => None,
        }
    }

    /// Direction implied by a moving transition.
    ///
    /// `Stay` and `Invalid` carry no direction and return `None`.
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Transition::Forward => Some(Direction::Forward),
            Transition::Backward => Some(Direction::Backward),
            Transition::Stay | Transition::Invalid => None,
        }
    }

    /// Returns `true` for [`Transition::Invalid`].
    pub const fn is_invalid(self) -> bool {
        matches!(self, Transition::Invalid)
    }
}

//! Minimum-interval edge filter.

/// Drops edges that arrive within `delay_ms` of the last accepted edge.
///
/// Suppression is silent: a dropped edge is not an error and does not move
/// the reference timestamp, so a burst of bounces cannot extend the window
/// indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    delay_ms: u32,
    last_accepted: Option<u32>,
}

impl Debouncer {
    /// Create a filter. `delay_ms == 0` accepts every edge.
    pub const fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            last_accepted: None,
        }
    }

    /// Decide whether an edge observed at `now_ms` should be processed.
    ///
    /// The first edge is always accepted. Elapsed time is computed with
    /// wrapping subtraction, so counter overflow only ever shortens one
    /// window and never blocks edges permanently.
    pub fn accept(&mut self, now_ms: u32) -> bool {
        if let Some(last) = self.last_accepted {
            if self.delay_ms > 0 && now_ms.wrapping_sub(last) <= self.delay_ms {
                return false;
            }
        }
        self.last_accepted = Some(now_ms);
        true
    }

    /// Current window in milliseconds.
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Change the window. The last accepted timestamp is kept.
    pub fn set_delay_ms(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }

    /// Forget the last accepted edge; the next edge is accepted.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(0)
    }
}

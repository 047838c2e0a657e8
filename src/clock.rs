//! Millisecond time source for the debounce filter.

use embassy_time::Instant;

/// Free-running millisecond counter.
///
/// The value may wrap around; consumers only ever look at differences
/// computed with wrapping subtraction.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch, truncated to 32 bits.
    fn now_ms(&self) -> u32;
}

/// [`Clock`] backed by the `embassy-time` driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the intended wrap.
        Instant::now().as_millis() as u32
    }
}

impl<F> Clock for F
where
    F: Fn() -> u32,
{
    fn now_ms(&self) -> u32 {
        self()
    }
}

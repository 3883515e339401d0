//! Mock Timer implementation for testing

use crate::platform::{traits::TimerInterface, Result};

/// Mock Timer implementation
///
/// Uses simulated time: delays advance the clock instantly, and tests can
/// move time forward explicitly with [`advance_us`](MockTimer::advance_us) /
/// [`advance_ms`](MockTimer::advance_ms) to trigger due sampler cycles.
#[derive(Debug)]
pub struct MockTimer {
    current_us: u64,
}

impl MockTimer {
    /// Create a new mock timer starting at time zero
    pub fn new() -> Self {
        Self { current_us: 0 }
    }

    /// Advance simulated time by the given number of microseconds
    pub fn advance_us(&mut self, us: u64) {
        self.current_us = self.current_us.wrapping_add(us);
    }

    /// Advance simulated time by the given number of milliseconds
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance_us(ms.saturating_mul(1000));
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerInterface for MockTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        // Simulated delay: just move the clock
        self.current_us = self.current_us.wrapping_add(us as u64);
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.current_us
    }
}

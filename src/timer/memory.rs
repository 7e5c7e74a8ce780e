use std::time::{Duration, Instant};

use super::Timer;

/// Timer that only measures; the owning client records the result.
pub struct MemoryTimer {
    started_at: Instant,
}

impl MemoryTimer {
    pub fn new() -> Self {
        MemoryTimer {
            started_at: Instant::now(),
        }
    }
}

impl Default for MemoryTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for MemoryTimer {
    fn finish(&mut self, _bucket: &str) -> Duration {
        self.started_at.elapsed()
    }
}

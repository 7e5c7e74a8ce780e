use std::collections::HashMap;
use std::sync::Mutex;

use super::State;

/// State that stores gauge values in memory, for tests.
#[derive(Default)]
pub struct MemoryState {
    metrics: Mutex<HashMap<String, i64>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all gauge values recorded so far.
    pub fn metrics(&self) -> HashMap<String, i64> {
        self.metrics.lock().expect("memory state mutex poisoned").clone()
    }

    pub fn reset(&self) {
        self.metrics.lock().expect("memory state mutex poisoned").clear();
    }
}

impl State for MemoryState {
    fn set(&self, metric: &str, value: i64) {
        let mut metrics = self.metrics.lock().expect("memory state mutex poisoned");
        metrics.insert(metric.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryState;
    use crate::state::State;

    #[test]
    fn keeps_the_latest_value() {
        let state = MemoryState::new();
        state.set("queue.depth", 10);
        state.set("queue.depth", 3);
        assert_eq!(3, state.metrics()["queue.depth"]);
    }
}

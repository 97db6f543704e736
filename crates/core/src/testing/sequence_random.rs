//! Deterministic random source for testing.

use std::sync::{Mutex, PoisonError};

use crate::random::RandomSource;

/// Replays a fixed sequence of picks, cycling when exhausted.
///
/// Each value is reduced modulo the requested range, so `pick(len)` always
/// stays in bounds.
#[derive(Debug)]
pub struct SequenceRandom {
    state: Mutex<SequenceState>,
}

#[derive(Debug)]
struct SequenceState {
    values: Vec<usize>,
    calls: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<usize>) -> Self {
        Self {
            state: Mutex::new(SequenceState { values, calls: 0 }),
        }
    }

    /// Always picks the first element.
    pub fn first() -> Self {
        Self::new(vec![0])
    }

    /// Number of picks made so far.
    pub fn calls(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
    }
}

impl RandomSource for SequenceRandom {
    fn pick(&self, len: usize) -> usize {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let value = if state.values.is_empty() {
            0
        } else {
            state.values[state.calls % state.values.len()]
        };
        state.calls += 1;
        value % len.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_and_cycles() {
        let random = SequenceRandom::new(vec![1, 3]);
        assert_eq!(random.pick(4), 1);
        assert_eq!(random.pick(4), 3);
        assert_eq!(random.pick(4), 1);
        assert_eq!(random.calls(), 3);
    }

    #[test]
    fn test_wraps_into_range() {
        let random = SequenceRandom::new(vec![7]);
        assert_eq!(random.pick(3), 1);
    }
}

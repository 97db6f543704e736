//! Random index selection.
//!
//! Keyword choice and video choice both go through [`RandomSource`] so tests
//! can replay a fixed sequence instead of depending on the thread RNG.

use rand::Rng;

/// Picks a uniformly distributed index.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. `len` must be non-zero.
    fn pick(&self, len: usize) -> usize;
}

/// Random source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        debug_assert!(len > 0, "pick called with an empty range");
        rand::rng().random_range(0..len.max(1))
    }
}

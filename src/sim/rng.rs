//! Injectable random source
//!
//! The simulation only ever needs "pick one of N", so that is the whole
//! interface. Live games use a seeded PCG stream; tests plug in `FixedIndex`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniformly distributed indices
pub trait IndexSource {
    /// Pick an index in `0..len`. Callers guarantee `len > 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl IndexSource for Pcg32 {
    fn pick_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

impl<R: IndexSource + ?Sized> IndexSource for &mut R {
    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

/// Seeded PCG stream for reproducible runs
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Always picks the same index (clamped to the range)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedIndex(pub usize);

impl IndexSource for FixedIndex {
    fn pick_index(&mut self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

//! BetaCache — memoized `B(1/2, α)` values for the optimized posterior.
//!
//! Purpose
//! -------
//! Avoid re-evaluating the Beta special function for shape values that
//! recur from step to step. Every hypothesis created since the last reset
//! carries `α = α₀ + r/2` for its run length `r`, so consecutive steps score
//! almost the same set of shapes.
//!
//! Key behaviors
//! -------------
//! - [`BetaCache::get`] computes and stores `B(1/2, α)` on first use.
//! - [`BetaCache::retain_live`] evicts shapes no live hypothesis carries, so
//!   the cache holds at most one entry per hypothesis plus the seed.
//! - [`BetaCache::reset`] drops everything except the prior shape `α₀`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Entries are keyed by the exact bit pattern of `α`, not by array
//!   position, so inserting or pruning hypotheses can never make an entry
//!   stale.
//! - A cache is owned by exactly one posterior and is never shared between
//!   engines.
use std::collections::{HashMap, HashSet};

use crate::online_detection::core::special::{BetaSource, beta_half};

/// BetaCache — `α ↦ B(1/2, α)` memo table seeded with the prior shape.
#[derive(Debug, Clone)]
pub struct BetaCache {
    alpha0: f64,
    values: HashMap<u64, f64>,
}

impl BetaCache {
    /// Create a cache holding the single entry for `alpha0`.
    pub fn new(alpha0: f64) -> Self {
        let mut values = HashMap::new();
        values.insert(alpha0.to_bits(), beta_half(alpha0));
        BetaCache { alpha0, values }
    }

    /// `B(1/2, alpha)`, computed on first request and memoized.
    #[inline]
    pub fn get(&mut self, alpha: f64) -> f64 {
        *self.values.entry(alpha.to_bits()).or_insert_with(|| beta_half(alpha))
    }

    /// Clear to the single seeded entry for `α₀`.
    pub fn reset(&mut self) {
        let seed = self.values.get(&self.alpha0.to_bits()).copied();
        self.values.clear();
        self.values.insert(self.alpha0.to_bits(), seed.unwrap_or_else(|| beta_half(self.alpha0)));
    }

    /// Drop every entry whose shape is neither `α₀` nor in `live`.
    pub fn retain_live<I>(&mut self, live: I)
    where
        I: IntoIterator<Item = f64>,
    {
        let mut keep: HashSet<u64> = live.into_iter().map(f64::to_bits).collect();
        keep.insert(self.alpha0.to_bits());
        self.values.retain(|bits, _| keep.contains(bits));
    }

    /// Value stored for the prior shape `α₀`.
    pub fn seed_value(&self) -> Option<f64> {
        self.values.get(&self.alpha0.to_bits()).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl BetaSource for BetaCache {
    #[inline]
    fn beta_half(&mut self, alpha: f64) -> f64 {
        self.get(alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Seeding, lazy insertion, and bitwise agreement with `beta_half`.
    // - Eviction of shapes no longer carried by a live hypothesis.
    // - `reset` semantics, including idempotence.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a new cache holds exactly the prior entry and that `get`
    // inserts new shapes lazily with values identical to direct evaluation.
    //
    // Given
    // -----
    // - α₀ = 1 and requests for α = 1.5, 2.0, then 1.5 again.
    //
    // Expect
    // ------
    // - len() goes 1 → 3 and stays 3 on the repeated request.
    // - Every returned value has the same bits as `beta_half(α)`.
    fn beta_cache_memoizes_lazily_and_matches_direct_evaluation() {
        // Arrange
        let mut cache = BetaCache::new(1.0);
        assert_eq!(cache.len(), 1);

        // Act
        let a = cache.get(1.5);
        let b = cache.get(2.0);
        let again = cache.get(1.5);

        // Assert
        assert_eq!(cache.len(), 3);
        assert_eq!(a.to_bits(), beta_half(1.5).to_bits());
        assert_eq!(b.to_bits(), beta_half(2.0).to_bits());
        assert_eq!(a.to_bits(), again.to_bits());
    }

    #[test]
    // Purpose
    // -------
    // Check that `reset` returns to the single prior entry and that a second
    // reset changes nothing.
    //
    // Given
    // -----
    // - A cache with several memoized shapes.
    //
    // Expect
    // ------
    // - After one reset: len() == 1 and only α₀ is present.
    // - After a second reset: identical state.
    fn beta_cache_reset_is_idempotent() {
        // Arrange
        let mut cache = BetaCache::new(0.75);
        for k in 1..10 {
            cache.get(0.75 + 0.5 * k as f64);
        }

        // Act
        cache.reset();
        let once = (cache.len(), cache.seed_value());
        cache.reset();
        let twice = (cache.len(), cache.seed_value());

        // Assert
        assert_eq!(once, twice);
        assert_eq!(once.0, 1);
        assert_eq!(once.1.map(f64::to_bits), Some(beta_half(0.75).to_bits()));
    }

    #[test]
    // Purpose
    // -------
    // Verify that `retain_live` evicts dead shapes but never the seed.
    //
    // Given
    // -----
    // - α₀ = 1 with shapes 1.5, 2.0, 2.5 memoized; live shapes {2.0, 3.0}.
    //
    // Expect
    // ------
    // - Two entries remain (α₀ and 2.0); 3.0 is not inserted by eviction.
    // - A later `get(1.5)` recomputes the same bits.
    fn beta_cache_retain_live_evicts_dead_shapes() {
        // Arrange
        let mut cache = BetaCache::new(1.0);
        let before = cache.get(1.5);
        cache.get(2.0);
        cache.get(2.5);
        assert_eq!(cache.len(), 4);

        // Act
        cache.retain_live([2.0, 3.0]);

        // Assert
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.seed_value().map(f64::to_bits), Some(beta_half(1.0).to_bits()));
        assert_eq!(cache.get(1.5).to_bits(), before.to_bits());
        assert_eq!(cache.len(), 3);
    }
}

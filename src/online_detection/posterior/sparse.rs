//! SparsePosterior — optimized run-length posterior over a hypothesis arena.
//!
//! Purpose
//! -------
//! Run the same recursion as [`DensePosterior`](super::dense::DensePosterior)
//! while updating hypotheses in place: every hypothesis is one record in a
//! [`HypothesisArena`], and Beta values come from a [`BetaCache`] keyed by the
//! shape parameter. Pruned hypotheses are removed in a single pass
//! instead of re-slicing parallel arrays.
//!
//! Key behaviors
//! -------------
//! - [`SparsePosterior::try_new`] is the capability check used by the engine
//!   when it resolves the backend; it fails when the crate is built without
//!   the `sparse-backend` feature or the cache seed is not finite.
//! - `step`, `reset` and `change_probability` follow the shared recursion in
//!   [`recursion`](super::recursion) so decisions match the reference
//!   variant.
//!
//! Invariants & assumptions
//! ------------------------
//! - The Beta cache belongs to this posterior alone and is reset together
//!   with the arena.
//! - After every step the cache holds only shapes carried by a surviving
//!   hypothesis plus `α₀`, so its size is bounded by `len() + 1` on
//!   arbitrarily long streams.
use ndarray::Array1;

use crate::online_detection::{
    core::{
        beta_cache::BetaCache,
        hazard::HazardModel,
        hypothesis::{Hypothesis, HypothesisArena, PosteriorEntry},
        predictive::predictive_densities,
        prior::NigPrior,
    },
    posterior::{
        PosteriorKind, RunLengthPosterior, StepOutcome,
        recursion::{first_argmax, message_pass, mixture, survivors},
    },
};

/// Reason the optimized posterior could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// Compiled without the `sparse-backend` feature.
    FeatureDisabled,
    /// `B(1/2, α₀)` is not a finite number.
    NonFiniteBetaSeed,
}

impl std::fmt::Display for Unavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailable::FeatureDisabled => {
                write!(f, "crate built without the `sparse-backend` feature")
            }
            Unavailable::NonFiniteBetaSeed => {
                write!(f, "Beta(1/2, alpha0) is not finite for this prior")
            }
        }
    }
}

/// SparsePosterior — optimized variant backed by an arena and a Beta cache.
#[derive(Debug, Clone)]
pub struct SparsePosterior {
    arena: HypothesisArena,
    cache: BetaCache,
    truncation_threshold: f64,
}

impl SparsePosterior {
    /// Build the optimized posterior if this build and prior support it.
    ///
    /// Errors
    /// ------
    /// - [`Unavailable::FeatureDisabled`] without the `sparse-backend` feature.
    /// - [`Unavailable::NonFiniteBetaSeed`] when seeding the cache with
    ///   `B(1/2, α₀)` yields a non-finite value.
    pub fn try_new(prior: NigPrior, truncation_threshold: f64) -> Result<Self, Unavailable> {
        if !cfg!(feature = "sparse-backend") {
            return Err(Unavailable::FeatureDisabled);
        }
        let cache = BetaCache::new(prior.params().alpha);
        if !cache.seed_value().is_some_and(f64::is_finite) {
            return Err(Unavailable::NonFiniteBetaSeed);
        }
        Ok(SparsePosterior { arena: HypothesisArena::new(prior), cache, truncation_threshold })
    }

    /// Read access to the hypothesis records, including their ids.
    pub fn hypotheses(&self) -> impl ExactSizeIterator<Item = &Hypothesis> + '_ {
        self.arena.iter()
    }

    /// Number of memoized Beta values.
    pub fn cached_betas(&self) -> usize {
        self.cache.len()
    }

    fn predictive(&mut self, x: f64) -> Array1<f64> {
        Array1::from(predictive_densities(x, self.arena.params(), &mut self.cache))
    }

    fn probability_column(&self) -> Array1<f64> {
        self.arena.iter().map(|h| h.probability).collect()
    }
}

impl RunLengthPosterior for SparsePosterior {
    fn kind(&self) -> PosteriorKind {
        PosteriorKind::Optimized
    }

    fn step(&mut self, x: f64, hazard: &HazardModel) -> StepOutcome {
        let predictive = self.predictive(x);
        let pass = message_pass(predictive.view(), self.probability_column().view(), hazard);

        self.arena.grow_no_change(x);
        self.arena.assign_probabilities(pass.probabilities.iter().copied());
        self.arena.prune(&survivors(pass.probabilities.view(), self.truncation_threshold));
        self.cache.retain_live(self.arena.params().map(|p| p.alpha));

        let map_index = first_argmax(self.probability_column().view());
        let map_run_length = self.arena.get(map_index).map_or(0, |h| h.run_length);
        StepOutcome { map_run_length, degenerate: pass.is_degenerate() }
    }

    fn reset(&mut self) {
        self.arena.reset();
        self.cache.reset();
    }

    fn change_probability(&mut self, x: f64) -> f64 {
        let predictive = self.predictive(x);
        mixture(predictive.view(), self.probability_column().view())
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn probabilities(&self) -> Vec<f64> {
        self.arena.iter().map(|h| h.probability).collect()
    }

    fn run_lengths(&self) -> Vec<usize> {
        self.arena.iter().map(|h| h.run_length).collect()
    }

    fn entries(&self) -> Vec<PosteriorEntry> {
        self.arena.iter().map(Hypothesis::entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::online_detection::posterior::dense::DensePosterior;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Capability check on a well-formed prior.
    // - Bitwise agreement with the dense reference on a mixed series.
    // - Reset of arena and cache together.
    // - Cache size bounded by the live hypotheses on a long stream.
    // -------------------------------------------------------------------------

    fn unit_prior() -> NigPrior {
        NigPrior::new(0.0, 1.0, 1.0, 1.0).unwrap()
    }

    #[cfg(feature = "sparse-backend")]
    #[test]
    // Purpose
    // -------
    // Verify that the optimized and reference posteriors perform the same
    // floating-point operations.
    //
    // Given
    // -----
    // - Unit prior, λ = 50, threshold 1e-8, a level shift mid-series.
    //
    // Expect
    // ------
    // - Identical MAP run lengths, entries and change probabilities at every
    //   step (exact equality).
    fn sparse_matches_dense_bitwise() {
        // Arrange
        let hazard = HazardModel::new(50.0).unwrap();
        let mut sparse = SparsePosterior::try_new(unit_prior(), 1e-8).unwrap();
        let mut dense = DensePosterior::new(unit_prior(), 1e-8);
        let xs = [0.1, -0.3, 0.2, 0.0, 5.1, 4.8, 5.3, 5.0, 4.9, -0.2];

        for &x in &xs {
            // Act
            let a = sparse.step(x, &hazard);
            let b = dense.step(x, &hazard);

            // Assert
            assert_eq!(a, b);
            assert_eq!(sparse.entries(), dense.entries());
            assert_eq!(
                sparse.change_probability(x).to_bits(),
                dense.change_probability(x).to_bits()
            );
        }
    }

    #[cfg(feature = "sparse-backend")]
    #[test]
    // Purpose
    // -------
    // Check that reset restores the singleton and empties the Beta cache down
    // to its seed while keeping hypothesis ids fresh.
    //
    // Given
    // -----
    // - A posterior stepped several times.
    //
    // Expect
    // ------
    // - One hypothesis with probability 1, one cached Beta value, and a new
    //   id larger than every id seen before.
    fn sparse_reset_clears_arena_and_cache() {
        // Arrange
        let hazard = HazardModel::new(20.0).unwrap();
        let mut posterior = SparsePosterior::try_new(unit_prior(), 1e-8).unwrap();
        for x in [0.0, 0.5, 1.0, 1.5] {
            posterior.step(x, &hazard);
        }
        let max_id = posterior.hypotheses().map(|h| h.id).max().unwrap();
        assert!(posterior.cached_betas() > 1);

        // Act
        posterior.reset();

        // Assert
        assert_eq!(posterior.probabilities(), vec![1.0]);
        assert_eq!(posterior.run_lengths(), vec![0]);
        assert_eq!(posterior.cached_betas(), 1);
        assert!(posterior.hypotheses().all(|h| h.id > max_id));
    }

    #[cfg(feature = "sparse-backend")]
    #[test]
    // Purpose
    // -------
    // Ensure the Beta cache does not grow with the stream when no reset ever
    // happens.
    //
    // Given
    // -----
    // - Unit prior, λ = 200, threshold 1e-8, 5000 low-variance observations
    //   fed straight to the posterior (no reset detector).
    //
    // Expect
    // ------
    // - After every step, and after scoring the decision mixture,
    //   `cached_betas() <= len() + 1`.
    // - The final cache is far smaller than the number of steps.
    fn sparse_cache_stays_bounded_without_resets() {
        // Arrange
        let hazard = HazardModel::new(200.0).unwrap();
        let mut posterior = SparsePosterior::try_new(unit_prior(), 1e-8).unwrap();
        let mut state: u64 = 11;
        let steps = 5000;

        for _ in 0..steps {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let x = 0.01 * (((state >> 11) as f64 / (1u64 << 53) as f64) - 0.5);

            // Act
            posterior.step(x, &hazard);
            posterior.change_probability(x);

            // Assert
            assert!(
                posterior.cached_betas() <= posterior.len() + 1,
                "cache {} vs {} hypotheses",
                posterior.cached_betas(),
                posterior.len()
            );
        }
        assert!(posterior.cached_betas() < steps / 2);
    }

    #[cfg(feature = "sparse-backend")]
    #[test]
    fn sparse_rejects_non_finite_beta_seed() {
        let prior = NigPrior::new(0.0, 1.0, 1e-320, 1.0).unwrap();
        let err = SparsePosterior::try_new(prior, 1e-8).unwrap_err();
        assert_eq!(err, Unavailable::NonFiniteBetaSeed);
    }

    #[cfg(not(feature = "sparse-backend"))]
    #[test]
    fn sparse_unavailable_without_feature() {
        let err = SparsePosterior::try_new(unit_prior(), 1e-8).unwrap_err();
        assert_eq!(err, Unavailable::FeatureDisabled);
    }
}

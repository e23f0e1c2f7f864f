//! online_detection::core — building blocks of the BOCPD recursion.
//!
//! Purpose
//! -------
//! Group the leaf components the run-length posteriors are assembled from:
//! the hazard model, the NIG prior and conjugate update, the Beta special
//! function and its cache, the Student-t predictive density, the hypothesis
//! arena, and the reset detector. Nothing here knows about backends or the
//! engine loop.
//!
//! Key behaviors
//! -------------
//! - [`HazardModel`]: constant per-step change prior `1/λ`.
//! - [`NigPrior`] / [`NigParams`]: validated prior and conjugate no-change
//!   update.
//! - [`BocpdOptions`] / [`Backend`]: validated thresholds and backend request.
//! - [`beta_half`], [`BetaSource`], [`DirectBeta`], [`BetaCache`]: direct and
//!   memoized `B(1/2, α)`.
//! - [`student_t_density`] / [`predictive_densities`]: predictive density per
//!   hypothesis.
//! - [`HypothesisArena`]: record-per-hypothesis store with insert-front and
//!   prune.
//! - [`ResetDetector`]: explicit `{Warming, Steady}` MAP-run-length window.
//!
//! Invariants & assumptions
//! ------------------------
//! - Construction-time validation (prior, hazard, thresholds) happens here
//!   and is reported as [`BocpdError`](crate::online_detection::BocpdError);
//!   per-step functions are infallible.
//! - No module in this subtree logs or performs I/O.
//!
//! Testing notes
//! -------------
//! - Every submodule carries its own unit tests next to the code.

pub mod beta_cache;
pub mod hazard;
pub mod hypothesis;
pub mod options;
pub mod predictive;
pub mod prior;
pub mod reset;
pub mod special;

pub use self::beta_cache::BetaCache;
pub use self::hazard::{DEFAULT_HAZARD_RATE, HazardModel};
pub use self::hypothesis::{Hypothesis, HypothesisArena, PosteriorEntry};
pub use self::options::{
    Backend, BocpdOptions, DEFAULT_DECISION_THRESHOLD, DEFAULT_TRUNCATION_THRESHOLD,
};
pub use self::predictive::{predictive_densities, student_t_density};
pub use self::prior::{NigParams, NigPrior};
pub use self::reset::{ResetDetector, ResetSignal, ResetState};
pub use self::special::{BetaSource, DirectBeta, beta_half};

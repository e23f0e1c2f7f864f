//! online_detection — Bayesian online change point detection (BOCPD).
//!
//! Purpose
//! -------
//! Detect change points in a streaming scalar series by maintaining a
//! posterior over the run length (observations since the last change) under
//! a Normal-Inverse-Gamma (NIG) conjugate model with a constant hazard rate.
//! For every observation the engine reports whether a change most likely
//! just occurred.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the building blocks: hazard model, NIG prior and
//!   conjugate update, Student-t predictive density, Beta function and cache,
//!   hypothesis arena, and reset detector.
//! - [`posterior`] provides the [`RunLengthPosterior`] trait and its two
//!   variants, a dense reference and an arena-based optimized posterior,
//!   which agree exactly on every step.
//! - [`engine`] drives a posterior per observation and turns it into change
//!   decisions, with lazy iterator adapters and [`detect_series`] for
//!   timestamped batches.
//! - [`errors`] / [`validation`] centralize precondition failures.
//!
//! Invariants & assumptions
//! ------------------------
//! - Priors and options are validated at construction (`kappa0`, `alpha0`,
//!   `beta0 > 0`, `lambda >= 1`, thresholds in range); per-step code cannot
//!   fail.
//! - After each step the run-length probabilities sum to one (up to
//!   floating tolerance) unless every candidate received zero mass, index 0
//!   is run length 0, and every other survivor has probability above the
//!   truncation threshold.
//! - One engine per series; engines are `Send` and share nothing.
//!
//! Conventions
//! -----------
//! - Indices are 0-based; run lengths are counts of observations since the
//!   most recent change.
//! - A change is flagged when the predictive mixture of the current
//!   observation over the post-update posterior is at most the decision
//!   threshold (default 0.05).
//! - Only the engine logs (through the `log` facade). Numeric code performs
//!   no I/O.
//!
//! Downstream usage
//! ----------------
//! - Streaming:
//!   1. Build a [`NigPrior`] and [`BocpdOptions`].
//!   2. Create a [`BocpdEngine`] and call `step(x)` per observation, or
//!      `detect(iter)` for a lazy flag stream.
//! - Batch: [`detect_series`] validates `(time, data)` and returns the lazy
//!   flag stream.
//! - Python bindings wrap [`BocpdEngine`] and map [`BocpdError`] to
//!   `ValueError`.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule.
//! - `tests/integration_bocpd_pipeline.rs` covers end-to-end scenarios,
//!   reference/optimized agreement, truncation bounds and laziness.

pub mod core;
pub mod engine;
pub mod errors;
pub mod posterior;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    Backend, BetaCache, BocpdOptions, DEFAULT_DECISION_THRESHOLD, DEFAULT_HAZARD_RATE,
    DEFAULT_TRUNCATION_THRESHOLD, HazardModel, NigParams, NigPrior, PosteriorEntry,
};

pub use self::engine::{BocpdEngine, Detections, Reports, StepReport, detect_series};

pub use self::errors::{BocpdError, BocpdResult};

pub use self::posterior::{
    DensePosterior, PosteriorKind, RunLengthPosterior, SparsePosterior, StepOutcome,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use rust_changepoint::online_detection::prelude::*;

pub mod prelude {
    pub use super::{
        Backend, BocpdEngine, BocpdError, BocpdOptions, BocpdResult, HazardModel, NigPrior,
        PosteriorKind, StepReport, detect_series,
    };
}

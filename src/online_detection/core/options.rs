//! Engine configuration — hazard rate, thresholds, and backend choice.
//!
//! Purpose
//! -------
//! Bundle the scalar knobs of the BOCPD engine that are not part of the NIG
//! prior: the hazard model, the change-decision threshold, the truncation
//! threshold used to prune negligible hypotheses, and the requested
//! run-length posterior backend.
//!
//! Key behaviors
//! -------------
//! - [`BocpdOptions::new`] validates every field and returns a typed
//!   [`BocpdError`] for the first violation.
//! - [`BocpdOptions::default`] uses λ = 200, decision threshold 0.05,
//!   truncation threshold 1e-8 and [`Backend::Auto`].
//! - [`Backend`] parses from the strings accepted by the Python bindings.
//!
//! Invariants & assumptions
//! ------------------------
//! - `decision_threshold` is finite and `>= 0`. The quantity it is compared
//!   against is a predictive-density-weighted sum, not a probability, so no
//!   upper bound is imposed.
//! - `truncation_threshold ∈ [0, 1)`. A value of 0 keeps every hypothesis
//!   with non-zero mass.
//!
//! Conventions
//! -----------
//! - The truncation threshold is a single explicit parameter shared by both
//!   posterior backends, so the reference and optimized paths prune the
//!   same hypotheses.
use std::{fmt, str::FromStr};

use crate::online_detection::{
    core::hazard::HazardModel,
    errors::{BocpdError, BocpdResult},
};

/// Default change-decision threshold on the weighted predictive density.
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.05;

/// Default pruning threshold on normalized run-length probabilities.
pub const DEFAULT_TRUNCATION_THRESHOLD: f64 = 1e-8;

/// Backend — requested run-length posterior implementation.
///
/// Variants
/// --------
/// - `Auto`: the optimized posterior when available, else the reference one.
/// - `Optimized`: hypothesis arena + Beta cache. Still falls back (with a
///   warning) when unavailable.
/// - `Reference`: dense columns, direct special-function evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Auto,
    Optimized,
    Reference,
}

impl FromStr for Backend {
    type Err = BocpdError;

    fn from_str(s: &str) -> BocpdResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "optimized" | "sparse" => Ok(Backend::Optimized),
            "reference" | "dense" => Ok(Backend::Reference),
            _ => Err(BocpdError::InvalidBackend { name: s.to_string() }),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Auto => "auto",
            Backend::Optimized => "optimized",
            Backend::Reference => "reference",
        };
        f.write_str(name)
    }
}

/// BocpdOptions — validated engine configuration.
///
/// Fields
/// ------
/// - `hazard`: [`HazardModel`]
///   Constant per-step change prior `1/λ`.
/// - `decision_threshold`: `f64`
///   An observation is flagged as a change when the post-update weighted
///   predictive density is `<=` this value.
/// - `truncation_threshold`: `f64`
///   Hypotheses other than run length 0 survive a step only when their
///   normalized probability is strictly greater than this value.
/// - `backend`: [`Backend`]
///   Requested posterior implementation; resolved once at engine
///   construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BocpdOptions {
    pub hazard: HazardModel,
    pub decision_threshold: f64,
    pub truncation_threshold: f64,
    pub backend: Backend,
}

impl BocpdOptions {
    /// Construct validated options.
    ///
    /// Parameters
    /// ----------
    /// - `lambda`: `f64`
    ///   Hazard rate; see [`HazardModel::new`].
    /// - `decision_threshold`: `f64`
    ///   Finite and `>= 0`.
    /// - `truncation_threshold`: `f64`
    ///   Finite and in `[0, 1)`.
    /// - `backend`: [`Backend`]
    ///
    /// Errors
    /// ------
    /// - `BocpdError::InvalidHazardRate`
    /// - `BocpdError::InvalidDecisionThreshold`
    /// - `BocpdError::InvalidTruncationThreshold`
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_changepoint::online_detection::core::options::{Backend, BocpdOptions};
    /// let opts = BocpdOptions::new(100.0, 0.05, 1e-16, Backend::Reference).unwrap();
    /// assert_eq!(opts.hazard.probability(), 0.01);
    /// assert!(BocpdOptions::new(100.0, 0.05, 1.5, Backend::Auto).is_err());
    /// ```
    pub fn new(
        lambda: f64, decision_threshold: f64, truncation_threshold: f64, backend: Backend,
    ) -> BocpdResult<Self> {
        let hazard = HazardModel::new(lambda)?;

        if !decision_threshold.is_finite() || decision_threshold < 0.0 {
            return Err(BocpdError::InvalidDecisionThreshold { value: decision_threshold });
        }

        if !(0.0..1.0).contains(&truncation_threshold) {
            return Err(BocpdError::InvalidTruncationThreshold { value: truncation_threshold });
        }

        Ok(BocpdOptions { hazard, decision_threshold, truncation_threshold, backend })
    }

    /// Default thresholds and backend with a caller-supplied hazard rate.
    pub fn with_hazard_rate(lambda: f64) -> BocpdResult<Self> {
        BocpdOptions::new(
            lambda,
            DEFAULT_DECISION_THRESHOLD,
            DEFAULT_TRUNCATION_THRESHOLD,
            Backend::Auto,
        )
    }

    /// Same options with a different requested backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

impl Default for BocpdOptions {
    fn default() -> Self {
        BocpdOptions {
            hazard: HazardModel::default(),
            decision_threshold: DEFAULT_DECISION_THRESHOLD,
            truncation_threshold: DEFAULT_TRUNCATION_THRESHOLD,
            backend: Backend::Auto,
        }
    }
}

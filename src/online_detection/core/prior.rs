//! Normal-Inverse-Gamma prior and posterior hyperparameters.
//!
//! Purpose
//! -------
//! Hold the four NIG hyperparameters `(α, β, μ, κ)` of one run-length
//! hypothesis, the conjugate "no change" update that ages them by one
//! observation, and the validated prior `(μ₀, κ₀, α₀, β₀)` every new
//! hypothesis starts from.
//!
//! Key behaviors
//! -------------
//! - [`NigPrior::new`] rejects priors that would make the predictive density
//!   ill-defined (`κ₀ <= 0`, `α₀ <= 0`, `β₀ <= 0`, non-finite values) before
//!   any observation is processed.
//! - [`NigParams::updated`] applies the closed-form conjugate recursion
//!   ```text
//!   κ' = κ + 1
//!   α' = α + 0.5
//!   μ' = (κ μ + x) / κ'
//!   β' = β + κ (x − μ)² / (2 κ')
//!   ```
//!
//! Invariants & assumptions
//! ------------------------
//! - The recursion only increases `κ` and `α`, so starting from a valid
//!   prior every hypothesis keeps `κ > 0` and `α > 0`; `β` never decreases.
//! - For a hypothesis created after the most recent reset,
//!   `α = α₀ + run_length / 2` and `κ = κ₀ + run_length`.
use crate::online_detection::errors::{BocpdError, BocpdResult};

/// NigParams — posterior hyperparameters of one run-length hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NigParams {
    pub alpha: f64,
    pub beta: f64,
    pub mu: f64,
    pub kappa: f64,
}

impl NigParams {
    /// Conjugate update of these hyperparameters after observing `x` with no
    /// change point.
    #[inline]
    pub fn updated(&self, x: f64) -> NigParams {
        let kappa_plus = self.kappa + 1.0;
        let diff = x - self.mu;
        NigParams {
            alpha: self.alpha + 0.5,
            beta: self.beta + self.kappa * diff * diff / (2.0 * kappa_plus),
            mu: (self.kappa * self.mu + x) / kappa_plus,
            kappa: kappa_plus,
        }
    }
}

/// NigPrior — validated prior hyperparameters `(μ₀, κ₀, α₀, β₀)`.
///
/// Parameters
/// ----------
/// Constructed via [`NigPrior::new`] with:
/// - `mu`: prior location, any finite value.
/// - `kappa`: prior pseudo-count on the mean, finite and `> 0`.
/// - `alpha`: prior shape, finite and `> 0`.
/// - `beta`: prior scale, finite and `> 0`.
///
/// Invariants
/// ----------
/// - All four values are finite and `κ₀, α₀, β₀ > 0`; downstream code never
///   re-checks them.
///
/// Notes
/// -----
/// - `β₀ > 0` is required in addition to `κ₀ > 0` so that the predictive
///   scale `2β(κ+1)/κ` is strictly positive for the prior hypothesis, which
///   has seen no data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NigPrior {
    params: NigParams,
}

impl NigPrior {
    /// Construct a validated prior.
    ///
    /// Errors
    /// ------
    /// - `BocpdError::InvalidPrior`
    ///   Returned for the first offending hyperparameter, checked in the
    ///   order `mu`, `kappa`, `alpha`, `beta`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_changepoint::online_detection::core::prior::NigPrior;
    /// let prior = NigPrior::new(0.0, 1.0, 1.0, 1.0).unwrap();
    /// assert_eq!(prior.params().kappa, 1.0);
    /// assert!(NigPrior::new(0.0, 0.0, 1.0, 1.0).is_err());
    /// ```
    pub fn new(mu: f64, kappa: f64, alpha: f64, beta: f64) -> BocpdResult<Self> {
        if !mu.is_finite() {
            return Err(BocpdError::InvalidPrior {
                param: "mu",
                value: mu,
                reason: "Must be finite.",
            });
        }
        check_positive("kappa", kappa)?;
        check_positive("alpha", alpha)?;
        check_positive("beta", beta)?;

        Ok(NigPrior { params: NigParams { alpha, beta, mu, kappa } })
    }

    /// Hyperparameters of a freshly created (run length 0) hypothesis.
    #[inline]
    pub fn params(&self) -> NigParams {
        self.params
    }
}

impl Default for NigPrior {
    /// Unit prior `μ₀ = 0, κ₀ = α₀ = β₀ = 1`.
    fn default() -> Self {
        NigPrior { params: NigParams { alpha: 1.0, beta: 1.0, mu: 0.0, kappa: 1.0 } }
    }
}

fn check_positive(param: &'static str, value: f64) -> BocpdResult<()> {
    if !value.is_finite() {
        return Err(BocpdError::InvalidPrior { param, value, reason: "Must be finite." });
    }
    if value <= 0.0 {
        return Err(BocpdError::InvalidPrior { param, value, reason: "Must be strictly positive." });
    }
    Ok(())
}

//! Beta-function evaluation for the Student-t normalizing constant.
//!
//! The predictive density of a NIG hypothesis divides by `B(1/2, α)`. Both
//! posterior backends obtain that value through the [`BetaSource`] trait:
//! the reference path evaluates it directly ([`DirectBeta`]), the optimized
//! path memoizes it ([`BetaCache`](super::beta_cache::BetaCache)). Both
//! bottom out in [`beta_half`], so cached and uncached values are bitwise
//! identical.
use statrs::function::beta::ln_beta;

/// `B(1/2, α) = Γ(1/2) Γ(α) / Γ(α + 1/2)`, evaluated in log space.
///
/// `alpha` must be finite and `> 0`; the NIG recursion guarantees this for
/// every hypothesis built from a validated prior.
#[inline]
pub fn beta_half(alpha: f64) -> f64 {
    ln_beta(0.5, alpha).exp()
}

/// Supplier of `B(1/2, α)` values for predictive-density evaluation.
pub trait BetaSource {
    fn beta_half(&mut self, alpha: f64) -> f64;
}

/// Uncached evaluation; every call recomputes the special function.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectBeta;

impl BetaSource for DirectBeta {
    #[inline]
    fn beta_half(&mut self, alpha: f64) -> f64 {
        beta_half(alpha)
    }
}

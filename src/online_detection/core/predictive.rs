//! Student-t predictive density of the NIG posterior.
//!
//! Purpose
//! -------
//! Evaluate, for every active run-length hypothesis, the density of the next
//! observation under that hypothesis' posterior. For NIG hyperparameters
//! `(α, β, μ, κ)` this is a Student-t with location `μ`, squared scale
//! `β(κ+1)/(ακ)` and `2α` degrees of freedom, written here in the single
//! canonical form
//!
//! ```text
//! d       = 2β(κ+1)/κ
//! p(x)    = ((x − μ)²/d + 1)^(−(α + 1/2)) / (√d · B(1/2, α))
//! ```
//!
//! Invariants & assumptions
//! ------------------------
//! - `κ > 0`, `α > 0`, `β > 0` for every hypothesis (guaranteed by a
//!   validated prior and the conjugate recursion), so `d > 0`.
//! - The only difference between cached and uncached evaluation is where
//!   `B(1/2, α)` comes from; see [`BetaSource`].
//!
//! Conventions
//! -----------
//! - Pure numerics: no allocation beyond the output vector, no logging.
use crate::online_detection::core::{prior::NigParams, special::BetaSource};

/// Predictive density of `x` under one hypothesis, given `B(1/2, α)`.
#[inline]
pub fn student_t_density(x: f64, params: &NigParams, beta_half: f64) -> f64 {
    let denom = 2.0 * params.beta * (params.kappa + 1.0) / params.kappa;
    let diff = x - params.mu;
    let kernel = (diff * diff / denom + 1.0).powf(-(params.alpha + 0.5));
    kernel / (denom.sqrt() * beta_half)
}

/// Predictive densities of `x` for a sequence of hypotheses, in order.
///
/// Parameters
/// ----------
/// - `x`: `f64`
///   The observation being scored.
/// - `params`: iterator over `&NigParams`
///   Hyperparameters ordered by ascending run length.
/// - `betas`: `&mut B`
///   Source of `B(1/2, α)` values (direct or cached).
///
/// Returns
/// -------
/// `Vec<f64>` with one density per hypothesis.
pub fn predictive_densities<'a, I, B>(x: f64, params: I, betas: &mut B) -> Vec<f64>
where
    I: IntoIterator<Item = &'a NigParams>,
    B: BetaSource + ?Sized,
{
    params
        .into_iter()
        .map(|p| student_t_density(x, p, betas.beta_half(p.alpha)))
        .collect()
}

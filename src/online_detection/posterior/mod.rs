//! online_detection::posterior — run-length posterior variants.
//!
//! Purpose
//! -------
//! Define the [`RunLengthPosterior`] seam the engine drives once per
//! observation, and provide its two implementations:
//!
//! - [`DensePosterior`]: reference variant over parallel `ndarray` columns
//!   with direct Beta evaluation.
//! - [`SparsePosterior`]: optimized variant over a hypothesis arena with a
//!   Beta cache.
//!
//! Key behaviors
//! -------------
//! - `step` performs predictive scoring, hazard-weighted message passing,
//!   normalization, conjugate growth and truncation, and reports the MAP run
//!   length.
//! - `change_probability` mixes the predictive density of an observation
//!   over the current posterior; the engine thresholds it.
//! - Both variants share [`recursion`], so they agree exactly.
//!
//! Invariants & assumptions
//! ------------------------
//! - After every `step`, index 0 has run length 0 and probabilities sum to
//!   one within floating tolerance, unless the step was degenerate (all
//!   candidate mass zero), in which case all probabilities are zero.
//! - Every surviving index > 0 has probability strictly above the truncation
//!   threshold.
//!
//! Downstream usage
//! ----------------
//! - The engine owns one `Box<dyn RunLengthPosterior>` chosen at
//!   construction; callers normally never touch this module directly.
use std::fmt;

use crate::online_detection::core::{hazard::HazardModel, hypothesis::PosteriorEntry};

pub mod dense;
pub mod recursion;
pub mod sparse;

pub use self::dense::DensePosterior;
pub use self::sparse::{SparsePosterior, Unavailable};

/// Which posterior variant is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosteriorKind {
    Reference,
    Optimized,
}

impl PosteriorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosteriorKind::Reference => "reference",
            PosteriorKind::Optimized => "optimized",
        }
    }
}

impl fmt::Display for PosteriorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one posterior step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Run length of the first most probable hypothesis after truncation.
    pub map_run_length: usize,
    /// `true` when the grown distribution carried no mass and normalization
    /// was skipped.
    pub degenerate: bool,
}

/// RunLengthPosterior — posterior over run lengths for one series.
///
/// Implementations must be `Send` so independent engines can run on
/// independent threads.
pub trait RunLengthPosterior: fmt::Debug + Send {
    fn kind(&self) -> PosteriorKind;

    /// Absorb observation `x` under `hazard`.
    fn step(&mut self, x: f64, hazard: &HazardModel) -> StepOutcome;

    /// Collapse to the single prior hypothesis with probability 1.
    fn reset(&mut self);

    /// `Σ predictive(x | hypothesis)·probability` over the current state.
    fn change_probability(&mut self, x: f64) -> f64;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn probabilities(&self) -> Vec<f64>;

    fn run_lengths(&self) -> Vec<usize>;

    fn entries(&self) -> Vec<PosteriorEntry>;
}

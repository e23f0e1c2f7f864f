//! BocpdEngine — streaming Bayesian online change point detection.
//!
//! Purpose
//! -------
//! Drive a [`RunLengthPosterior`] over a stream of scalar observations and
//! turn each step into a change decision. The engine owns the posterior, the
//! reset detector, and the validated prior and options; it is the only
//! component that logs.
//!
//! Key behaviors
//! -------------
//! - Backend resolution happens once in [`BocpdEngine::new`]: `Auto` and
//!   `Optimized` try [`SparsePosterior::try_new`] and fall back to
//!   [`DensePosterior`] with a single `log::warn!`; `Reference` always runs
//!   the dense posterior.
//! - [`BocpdEngine::step_report`] performs, per observation:
//!   1. a posterior step (scoring, message passing, growth, truncation);
//!   2. a reset check on the MAP run length, collapsing the posterior to the
//!      prior when it dropped;
//!   3. the decision `change_probability <= decision_threshold`, where the
//!      change probability is the predictive mixture of `x` over the
//!      post-update posterior.
//! - [`BocpdEngine::detect`] and [`detect_series`] return lazy iterators that
//!   run exactly one step per pulled item.
//!
//! Invariants & assumptions
//! ------------------------
//! - The reset detector keeps its window across posterior resets; only
//!   [`BocpdEngine::reset`] clears it.
//! - Reset and decision are independent signals: a step may reset without
//!   being flagged as a change, and vice versa.
//! - A non-finite observation is rejected with
//!   [`BocpdError::NonFiniteData`] before it touches any state; its `index`
//!   is the engine's observation counter. [`detect_series`] checks the whole
//!   series up front, so its items are always `Ok`.
//!
//! Conventions
//! -----------
//! - `index` in [`StepReport`] counts observations since construction or the
//!   last explicit [`BocpdEngine::reset`], starting at 0.
//!
//! Downstream usage
//! ----------------
//! - Streaming callers hold a `BocpdEngine` and call [`BocpdEngine::step`].
//! - Batch callers use [`detect_series`] with parallel time/data slices.
//!
//! Testing notes
//! -------------
//! - Unit tests here cover backend resolution, laziness and explicit reset;
//!   end-to-end scenarios live in `tests/integration_bocpd_pipeline.rs`.
use std::borrow::{Borrow, BorrowMut};

use crate::online_detection::{
    core::{
        hypothesis::PosteriorEntry,
        options::{Backend, BocpdOptions},
        prior::NigPrior,
        reset::{ResetDetector, ResetSignal},
    },
    errors::{BocpdError, BocpdResult},
    posterior::{DensePosterior, PosteriorKind, RunLengthPosterior, SparsePosterior},
    validation::validate_series,
};

/// Everything the engine decided about one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub index: usize,
    pub is_change: bool,
    pub change_probability: f64,
    pub map_run_length: usize,
    /// Whether the posterior was collapsed to the prior on this step.
    pub reset: bool,
    /// Hypotheses alive after the step.
    pub active_hypotheses: usize,
}

/// BocpdEngine — owns one posterior and turns observations into decisions.
///
/// Parameters
/// ----------
/// - `prior`: [`NigPrior`]
///   Hyperparameters every new hypothesis starts from.
/// - `options`: [`BocpdOptions`]
///   Hazard model, thresholds and requested backend.
///
/// Invariants
/// ----------
/// - The posterior variant never changes after construction.
/// - `BocpdEngine: Send`; one engine per series.
#[derive(Debug)]
pub struct BocpdEngine {
    prior: NigPrior,
    options: BocpdOptions,
    posterior: Box<dyn RunLengthPosterior>,
    detector: ResetDetector,
    observations: usize,
}

impl BocpdEngine {
    /// Build an engine, resolving the requested backend.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_changepoint::online_detection::prelude::*;
    /// let prior = NigPrior::new(0.0, 1.0, 1.0, 1.0).unwrap();
    /// let options = BocpdOptions::with_hazard_rate(100.0).unwrap();
    /// let mut engine = BocpdEngine::new(prior, options);
    /// let flags: Vec<bool> = engine.detect([0.0, 0.0, 0.0, 10.0]).collect::<BocpdResult<_>>().unwrap();
    /// assert_eq!(flags.len(), 4);
    /// ```
    pub fn new(prior: NigPrior, options: BocpdOptions) -> Self {
        let posterior = resolve_posterior(prior, &options);
        log::debug!(
            "bocpd engine ready: backend={}, lambda={}, decision_threshold={}, truncation_threshold={}",
            posterior.kind(),
            options.hazard.expected_run_length(),
            options.decision_threshold,
            options.truncation_threshold
        );
        BocpdEngine { prior, options, posterior, detector: ResetDetector::new(), observations: 0 }
    }

    /// Process one observation and return whether it is flagged as a change.
    ///
    /// Errors
    /// ------
    /// - `BocpdError::NonFiniteData` if `x` is NaN or ±∞; the engine state is
    ///   left untouched.
    pub fn step(&mut self, x: f64) -> BocpdResult<bool> {
        Ok(self.step_report(x)?.is_change)
    }

    /// Process one observation and return the full [`StepReport`].
    ///
    /// Errors
    /// ------
    /// - `BocpdError::NonFiniteData` if `x` is NaN or ±∞; the engine state is
    ///   left untouched.
    pub fn step_report(&mut self, x: f64) -> BocpdResult<StepReport> {
        if !x.is_finite() {
            return Err(BocpdError::NonFiniteData { index: self.observations, value: x });
        }
        Ok(self.advance(x))
    }

    fn advance(&mut self, x: f64) -> StepReport {
        let index = self.observations;
        let outcome = self.posterior.step(x, &self.options.hazard);
        if outcome.degenerate {
            log::debug!("step {index}: all run-length mass vanished for x={x}");
        }

        let reset = self.detector.observe(outcome.map_run_length) == ResetSignal::Reset;
        if reset {
            log::debug!("step {index}: MAP run length dropped to {}, resetting", outcome.map_run_length);
            self.posterior.reset();
        }

        let change_probability = self.posterior.change_probability(x);
        let is_change = change_probability <= self.options.decision_threshold;
        self.observations += 1;

        let report = StepReport {
            index,
            is_change,
            change_probability,
            map_run_length: outcome.map_run_length,
            reset,
            active_hypotheses: self.posterior.len(),
        };
        log::trace!("{report:?}");
        report
    }

    /// Restore the state right after construction (same backend).
    pub fn reset(&mut self) {
        self.posterior.reset();
        self.detector.clear();
        self.observations = 0;
    }

    /// Lazily flag every observation of `data`, one step per pulled item.
    pub fn detect<I>(&mut self, data: I) -> Detections<&mut BocpdEngine, I::IntoIter>
    where
        I: IntoIterator<Item = f64>,
    {
        Detections { engine: self, data: data.into_iter() }
    }

    /// Like [`detect`](Self::detect) but yields full [`StepReport`]s.
    pub fn detect_reports<I>(&mut self, data: I) -> Reports<&mut BocpdEngine, I::IntoIter>
    where
        I: IntoIterator<Item = f64>,
    {
        Reports { engine: self, data: data.into_iter() }
    }

    /// Consume the engine into an owning lazy detector over `data`.
    pub fn into_detections<I>(self, data: I) -> Detections<BocpdEngine, I::IntoIter>
    where
        I: IntoIterator<Item = f64>,
    {
        Detections { engine: self, data: data.into_iter() }
    }

    pub fn backend(&self) -> PosteriorKind {
        self.posterior.kind()
    }

    pub fn prior(&self) -> NigPrior {
        self.prior
    }

    pub fn options(&self) -> &BocpdOptions {
        &self.options
    }

    /// Observations processed since construction or the last reset.
    pub fn observations(&self) -> usize {
        self.observations
    }

    pub fn active_hypotheses(&self) -> usize {
        self.posterior.len()
    }

    pub fn run_lengths(&self) -> Vec<usize> {
        self.posterior.run_lengths()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.posterior.probabilities()
    }

    pub fn entries(&self) -> Vec<PosteriorEntry> {
        self.posterior.entries()
    }
}

fn resolve_posterior(prior: NigPrior, options: &BocpdOptions) -> Box<dyn RunLengthPosterior> {
    let threshold = options.truncation_threshold;
    match options.backend {
        Backend::Reference => Box::new(DensePosterior::new(prior, threshold)),
        Backend::Auto | Backend::Optimized => match SparsePosterior::try_new(prior, threshold) {
            Ok(posterior) => Box::new(posterior),
            Err(reason) => {
                log::warn!(
                    "optimized run-length posterior unavailable ({reason}); using the reference posterior"
                );
                Box::new(DensePosterior::new(prior, threshold))
            }
        },
    }
}

/// Lazy change flags, one engine step per item.
///
/// `E` is either an owned [`BocpdEngine`] or `&mut BocpdEngine`.
#[derive(Debug)]
pub struct Detections<E, I> {
    engine: E,
    data: I,
}

impl<E: BorrowMut<BocpdEngine>, I> Detections<E, I> {
    pub fn engine(&self) -> &BocpdEngine {
        <E as Borrow<BocpdEngine>>::borrow(&self.engine)
    }
}

impl<E, I> Iterator for Detections<E, I>
where
    E: BorrowMut<BocpdEngine>,
    I: Iterator<Item = f64>,
{
    type Item = BocpdResult<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.data.next()?;
        Some(self.engine.borrow_mut().step(x))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.data.size_hint()
    }
}

/// Lazy [`StepReport`]s, one engine step per item.
#[derive(Debug)]
pub struct Reports<E, I> {
    engine: E,
    data: I,
}

impl<E, I> Iterator for Reports<E, I>
where
    E: BorrowMut<BocpdEngine>,
    I: Iterator<Item = f64>,
{
    type Item = BocpdResult<StepReport>;

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.data.next()?;
        Some(self.engine.borrow_mut().step_report(x))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.data.size_hint()
    }
}

/// Validate a timestamped series and return its lazy change flags.
///
/// Parameters
/// ----------
/// - `time`: `&[T]`
///   Timestamps; only their count is used.
/// - `data`: `&[f64]`
///   Observations aligned with `time`.
/// - `prior`: [`NigPrior`]
/// - `options`: [`BocpdOptions`]
///
/// Returns
/// -------
/// A [`Detections`] iterator owning a fresh engine. No step has run yet,
/// and every item it yields is `Ok`.
///
/// Errors
/// ------
/// - `BocpdError::LengthMismatch` if `time.len() != data.len()`.
/// - `BocpdError::NonFiniteData` for the first NaN or infinite observation.
///
/// Examples
/// --------
/// ```rust
/// # use rust_changepoint::online_detection::prelude::*;
/// let time = [0, 1, 2, 3, 4, 5];
/// let data = [0.0, 0.0, 0.0, 10.0, 10.0, 10.0];
/// let prior = NigPrior::new(0.0, 1.0, 1.0, 1.0).unwrap();
/// let options = BocpdOptions::with_hazard_rate(100.0).unwrap();
/// let flags: BocpdResult<Vec<bool>> = detect_series(&time, &data, prior, options).unwrap().collect();
/// assert_eq!(flags.unwrap(), vec![false, false, false, true, true, false]);
/// ```
pub fn detect_series<'a, T>(
    time: &[T], data: &'a [f64], prior: NigPrior, options: BocpdOptions,
) -> BocpdResult<Detections<BocpdEngine, std::iter::Copied<std::slice::Iter<'a, f64>>>> {
    validate_series(time, data)?;
    Ok(BocpdEngine::new(prior, options).into_detections(data.iter().copied()))
}

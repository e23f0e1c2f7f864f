//! rust_changepoint — Bayesian online change point detection with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the online change point detector to Python via the `_rust_changepoint`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing class and submodule used by the
//! `rust_changepoint` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module (`online_detection`) as the public crate
//!   surface.
//! - Define the `Bocpd` `#[pyclass]` wrapper and the `#[pymodule]` initializer
//!   for the `_rust_changepoint` Python extension.
//! - Create and register the `online_detection` Python submodule under
//!   `rust_changepoint` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in [`online_detection`]; this file
//!   performs only FFI glue, input validation, and error mapping.
//! - When `python-bindings` is enabled, the Python-visible type mirrors the
//!   invariants and signatures of [`BocpdEngine`](online_detection::BocpdEngine).
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_rust_changepoint.<submodule>` and are
//!   wrapped by thin pure-Python facades in the top-level `rust_changepoint`
//!   package.
//! - Errors from core Rust code are propagated as [`BocpdError`]
//!   internally and converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`online_detection`] and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports `_rust_changepoint` and wraps its
//!   classes in user-facing APIs.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.
//! - The PyO3 surface is exercised from Python.
//!
//! [`BocpdError`]: online_detection::BocpdError

pub mod online_detection;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    online_detection::{core::DEFAULT_DECISION_THRESHOLD, engine::BocpdEngine, errors::BocpdResult},
    utils::{build_engine, check_time_length, extract_observations},
};

/// Bocpd — Python-facing wrapper for the streaming change point engine.
///
/// Purpose
/// -------
/// Expose [`BocpdEngine`] to Python callers while preserving its validation
/// and error handling.
///
/// Key behaviors
/// -------------
/// - Validate the prior, hazard rate, thresholds and backend name at
///   construction.
/// - `step(x)` processes one observation; `detect(data)` and
///   `detect_series(time, data)` process whole arrays after validating them.
/// - Read-only properties expose the resolved backend and the current
///   run-length posterior.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Bocpd(mu, kappa, alpha, beta, lamb, decision_threshold=0.05,
/// truncation_threshold=1e-8, backend="auto")`:
/// - `mu`, `kappa`, `alpha`, `beta`: `f64`
///   NIG prior; `kappa`, `alpha`, `beta` must be positive.
/// - `lamb`: `f64`
///   Hazard rate λ ≥ 1 (expected run length).
/// - `decision_threshold`: `f64`
///   Change flagged when the predictive mixture is at most this value.
/// - `truncation_threshold`: `f64`
///   Pruning threshold in `[0, 1)`.
/// - `backend`: `str`
///   `"auto"`, `"optimized"`/`"sparse"` or `"reference"`/`"dense"`.
///
/// Fields
/// ------
/// - `inner`: [`BocpdEngine`]
///
/// Notes
/// -----
/// - Each instance tracks one series; use one instance per series.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_changepoint.online_detection", unsendable)]
pub struct Bocpd {
    inner: BocpdEngine,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Bocpd {
    #[new]
    #[pyo3(
        signature = (
            mu,
            kappa,
            alpha,
            beta,
            lamb,
            decision_threshold = DEFAULT_DECISION_THRESHOLD,
            truncation_threshold = 1e-8,
            backend = "auto",
        ),
        text_signature = "(mu, kappa, alpha, beta, lamb, /, decision_threshold=0.05, \
                          truncation_threshold=1e-8, backend='auto')"
    )]
    pub fn new(
        mu: f64, kappa: f64, alpha: f64, beta: f64, lamb: f64, decision_threshold: f64,
        truncation_threshold: f64, backend: &str,
    ) -> PyResult<Self> {
        let inner = build_engine(
            mu,
            kappa,
            alpha,
            beta,
            lamb,
            decision_threshold,
            truncation_threshold,
            backend,
        )?;
        Ok(Bocpd { inner })
    }

    /// Process one observation; `True` when it is flagged as a change.
    pub fn step(&mut self, x: f64) -> PyResult<bool> {
        Ok(self.inner.step(x)?)
    }

    /// Flag every observation of `data`, continuing from the current state.
    pub fn detect<'py>(&mut self, py: Python<'py>, data: &Bound<'py, PyAny>) -> PyResult<Vec<bool>> {
        let data = extract_observations(py, data)?;
        Ok(self.inner.detect(data).collect::<BocpdResult<_>>()?)
    }

    /// Flag a timestamped series; `time` and `data` must have equal length.
    pub fn detect_series<'py>(
        &mut self, py: Python<'py>, time: &Bound<'py, PyAny>, data: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<bool>> {
        let data = extract_observations(py, data)?;
        check_time_length(time, data.len())?;
        Ok(self.inner.detect(data).collect::<BocpdResult<_>>()?)
    }

    /// Restore the state right after construction.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Resolved posterior backend: `"optimized"` or `"reference"`.
    #[getter]
    pub fn backend(&self) -> &'static str {
        self.inner.backend().as_str()
    }

    #[getter]
    pub fn active_hypotheses(&self) -> usize {
        self.inner.active_hypotheses()
    }

    #[getter]
    pub fn run_lengths(&self) -> Vec<usize> {
        self.inner.run_lengths()
    }

    #[getter]
    pub fn probabilities(&self) -> Vec<f64> {
        self.inner.probabilities()
    }

    #[getter]
    pub fn observations(&self) -> usize {
        self.inner.observations()
    }
}

/// _rust_changepoint — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_changepoint` Python module and register the
/// `online_detection` submodule used by the public `rust_changepoint` package.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_changepoint<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let online_detection_mod = PyModule::new(_py, "online_detection")?;
    online_detection(_py, m, &online_detection_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_changepoint.online_detection", online_detection_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn online_detection<'py>(
    _py: Python, rust_changepoint: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<Bocpd>()?;
    rust_changepoint.add_submodule(m)?;
    Ok(())
}

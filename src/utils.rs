//! utils — Python-boundary helpers for the `_rust_changepoint` extension.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! performs input conversion and engine construction for `lib.rs`.

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::online_detection::{
    core::{
        options::{Backend, BocpdOptions},
        prior::NigPrior,
    },
    engine::BocpdEngine,
    errors::BocpdError,
    validation::validate_observations,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a Python array-like into a validated, finite `Vec<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_observations<'py>(py: Python<'py>, raw_data: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let data = arr.as_slice().map_err(|_| {
        pyo3::exceptions::PyValueError::new_err("data must be a 1-D contiguous float64 array or sequence")
    })?;
    validate_observations(data)?;
    Ok(data.to_vec())
}

/// Check that a Python `time` sequence is as long as `data`.
#[cfg(feature = "python-bindings")]
pub fn check_time_length(time: &Bound<'_, PyAny>, data_len: usize) -> PyResult<()> {
    let time_len = time.len()?;
    if time_len != data_len {
        return Err(BocpdError::LengthMismatch { time: time_len, data: data_len }.into());
    }
    Ok(())
}

#[cfg(feature = "python-bindings")]
pub fn build_engine(
    mu: f64, kappa: f64, alpha: f64, beta: f64, lamb: f64, decision_threshold: f64,
    truncation_threshold: f64, backend: &str,
) -> PyResult<BocpdEngine> {
    let prior = NigPrior::new(mu, kappa, alpha, beta)?;
    let backend: Backend = backend.parse()?;
    let options = BocpdOptions::new(lamb, decision_threshold, truncation_threshold, backend)?;
    Ok(BocpdEngine::new(prior, options))
}

//! online_detection::validation — up-front guards for observation series.
//!
//! Purpose
//! -------
//! Centralize the checks that must pass before the first BOCPD step runs on
//! an aligned `(time, data)` pair, so that precondition violations are
//! reported immediately instead of part-way through a lazy sequence.
//!
//! Invariants & assumptions
//! ------------------------
//! - `time.len() == data.len()`.
//! - Every observation is finite.
//! - An empty series is valid and yields an empty decision sequence.
//!
//! Conventions
//! -----------
//! - Only lengths and finiteness are checked; time values themselves are
//!   opaque to the engine and are never inspected.
use crate::online_detection::errors::{BocpdError, BocpdResult};

/// Validate an aligned time index / observation pair.
///
/// Parameters
/// ----------
/// - `time`: `&[T]`
///   Time index of the series. Only its length is used.
/// - `data`: `&[f64]`
///   Observations. Must have the same length as `time` and contain no
///   `NaN` or ±∞.
///
/// Returns
/// -------
/// `BocpdResult<()>`
///   - `Ok(())` when both constraints hold.
///
/// Errors
/// ------
/// - `BocpdError::LengthMismatch`
///   Returned when `time.len() != data.len()`. Checked first.
/// - `BocpdError::NonFiniteData`
///   Returned for the first non-finite observation, with its index.
///
/// Examples
/// --------
/// ```rust
/// # use rust_changepoint::online_detection::validation::validate_series;
/// # use rust_changepoint::online_detection::errors::BocpdError;
/// let time = [0_u32, 1, 2];
/// assert!(validate_series(&time, &[0.1, 0.2, 0.3]).is_ok());
///
/// match validate_series(&time, &[0.1, 0.2]) {
///     Err(BocpdError::LengthMismatch { time: 3, data: 2 }) => (),
///     other => panic!("expected LengthMismatch, got {other:?}"),
/// }
/// ```
pub fn validate_series<T>(time: &[T], data: &[f64]) -> BocpdResult<()> {
    if time.len() != data.len() {
        return Err(BocpdError::LengthMismatch { time: time.len(), data: data.len() });
    }

    validate_observations(data)
}

/// Reject the first non-finite observation in `data`.
pub fn validate_observations(data: &[f64]) -> BocpdResult<()> {
    match data.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(BocpdError::NonFiniteData { index, value: data[index] }),
        None => Ok(()),
    }
}

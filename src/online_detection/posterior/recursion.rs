//! Shared arithmetic of the run-length recursion.
//!
//! Purpose
//! -------
//! Hold the operations both posterior variants must perform identically:
//! hazard-weighted message passing with normalization, the truncation mask,
//! the first-argmax lookup, and the mixture used for the change decision.
//! Keeping a single implementation means the reference and optimized
//! variants see the same floating-point operations in the same order.
//!
//! Conventions
//! -----------
//! - Sums are left-to-right folds, so results do not depend on how a
//!   container lays out or unrolls its reductions.
//! - Inputs are `ndarray` views; callers own the storage.
use ndarray::{Array1, ArrayView1, Zip, s};

use crate::online_detection::core::hazard::HazardModel;

/// Result of one hazard-weighted message pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MessagePass {
    /// Normalized growth/change probabilities, length N + 1.
    pub probabilities: Array1<f64>,
    /// `sum(new)` before normalization.
    pub evidence: f64,
}

impl MessagePass {
    /// Whether every candidate received zero mass.
    pub fn is_degenerate(&self) -> bool {
        self.evidence == 0.0
    }
}

/// Hazard-weighted update of the run-length distribution.
///
/// Parameters
/// ----------
/// - `predictive`: `ArrayView1<f64>`
///   Predictive density of the new observation under each hypothesis.
/// - `probabilities`: `ArrayView1<f64>`
///   Current posterior mass, aligned with `predictive`.
/// - `hazard`: `&HazardModel`
///   Constant change prior `h = 1/λ`.
///
/// Returns
/// -------
/// [`MessagePass`] where `probabilities[0] = h·Σ joint` and
/// `probabilities[i + 1] = (1 − h)·joint[i]`, divided by their sum unless
/// that sum is exactly zero.
pub fn message_pass(
    predictive: ArrayView1<f64>, probabilities: ArrayView1<f64>, hazard: &HazardModel,
) -> MessagePass {
    let joint: Array1<f64> = &predictive * &probabilities;
    let joint_mass = fold_sum(joint.view());

    let mut next = Array1::<f64>::zeros(joint.len() + 1);
    next[0] = hazard.probability() * joint_mass;
    next.slice_mut(s![1..]).assign(&(&joint * hazard.survival()));

    let evidence = fold_sum(next.view());
    if evidence != 0.0 {
        next.mapv_inplace(|p| p / evidence);
    }

    MessagePass { probabilities: next, evidence }
}

/// Survivor mask for truncation: `p > threshold`, index 0 always `true`.
pub fn survivors(probabilities: ArrayView1<f64>, threshold: f64) -> Vec<bool> {
    probabilities
        .iter()
        .enumerate()
        .map(|(i, &p)| i == 0 || p > threshold)
        .collect()
}

/// Positions of the `true` entries of `mask`.
pub fn kept_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter().enumerate().filter_map(|(i, &keep)| keep.then_some(i)).collect()
}

/// Index of the first maximum. `NaN` entries never win; an empty or all-`NaN`
/// input yields 0.
pub fn first_argmax(probabilities: ArrayView1<f64>) -> usize {
    let mut best_index = 0;
    let mut best = f64::NEG_INFINITY;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > best {
            best = p;
            best_index = i;
        }
    }
    best_index
}

/// `Σ predictive[i]·probabilities[i]`, accumulated left to right.
pub fn mixture(predictive: ArrayView1<f64>, probabilities: ArrayView1<f64>) -> f64 {
    let mut acc = 0.0;
    Zip::from(&predictive).and(&probabilities).for_each(|&d, &p| acc += d * p);
    acc
}

fn fold_sum(values: ArrayView1<f64>) -> f64 {
    values.iter().fold(0.0, |acc, &v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Message passing: change/growth split, normalization, degenerate mass.
    // - Truncation mask with the index-0 exemption.
    // - First-argmax tie breaking and the decision mixture.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the hazard split and normalization of a single message pass.
    //
    // Given
    // -----
    // - λ = 4 (h = 0.25), predictive [0.5, 0.1], probabilities [0.6, 0.4].
    //
    // Expect
    // ------
    // - joint = [0.3, 0.04], evidence = 0.25·0.34 + 0.75·0.34 = 0.34.
    // - probabilities = [0.25, 0.75·0.3/0.34, 0.75·0.04/0.34].
    fn message_pass_splits_change_and_growth_mass() {
        // Arrange
        let hazard = HazardModel::new(4.0).unwrap();
        let predictive = array![0.5, 0.1];
        let probabilities = array![0.6, 0.4];

        // Act
        let pass = message_pass(predictive.view(), probabilities.view(), &hazard);

        // Assert
        assert_relative_eq!(pass.evidence, 0.34, epsilon = 1e-15);
        assert_eq!(pass.probabilities.len(), 3);
        assert_relative_eq!(pass.probabilities[0], 0.25, epsilon = 1e-15);
        assert_relative_eq!(pass.probabilities[1], 0.75 * 0.3 / 0.34, epsilon = 1e-15);
        assert_relative_eq!(pass.probabilities[2], 0.75 * 0.04 / 0.34, epsilon = 1e-15);
        assert_relative_eq!(pass.probabilities.sum(), 1.0, epsilon = 1e-12);
        assert!(!pass.is_degenerate());
    }

    #[test]
    // Purpose
    // -------
    // Ensure that an all-zero joint mass is left unnormalized rather than
    // producing NaNs.
    //
    // Given
    // -----
    // - Predictive densities that underflowed to zero.
    //
    // Expect
    // ------
    // - All probabilities zero, evidence zero, degenerate flag set.
    fn message_pass_leaves_all_zero_mass_untouched() {
        let hazard = HazardModel::new(100.0).unwrap();
        let pass = message_pass(array![0.0, 0.0].view(), array![0.5, 0.5].view(), &hazard);

        assert!(pass.is_degenerate());
        assert!(pass.probabilities.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn survivors_keep_index_zero_and_strictly_larger_entries() {
        let probabilities = array![0.0, 1e-8, 2e-8, 0.5];
        assert_eq!(survivors(probabilities.view(), 1e-8), vec![true, false, true, true]);
        assert_eq!(kept_indices(&[true, false, true, true]), vec![0, 2, 3]);
    }

    #[test]
    fn first_argmax_prefers_earliest_maximum() {
        assert_eq!(first_argmax(array![0.1, 0.4, 0.4, 0.1].view()), 1);
        assert_eq!(first_argmax(array![f64::NAN, 0.2].view()), 1);
        assert_eq!(first_argmax(Array1::<f64>::zeros(0).view()), 0);
    }

    #[test]
    fn mixture_is_the_weighted_sum() {
        let value = mixture(array![0.2, 0.5].view(), array![0.25, 0.75].view());
        assert_relative_eq!(value, 0.05 + 0.375, epsilon = 1e-15);
    }
}

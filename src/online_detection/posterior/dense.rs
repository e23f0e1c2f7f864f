//! DensePosterior — reference run-length posterior over parallel columns.
//!
//! Purpose
//! -------
//! Keep the textbook layout of the recursion: the NIG hyperparameters
//! `alpha, beta, mu, kappa`, the posterior probabilities and the run lengths
//! are six aligned `ndarray` columns that are rebuilt on every step. Every
//! Beta value is evaluated directly. This variant is the correctness
//! baseline the optimized posterior is checked against.
//!
//! Key behaviors
//! -------------
//! - [`DensePosterior::step`] scores `x`, runs the shared message pass,
//!   grows every column by one (prior prepended, conjugate update applied to
//!   the rest), then selects the surviving indices from all columns at once.
//! - [`DensePosterior::reset`] rebuilds the singleton prior columns.
//!
//! Invariants & assumptions
//! ------------------------
//! - All six columns have the same length after every public call.
//! - `run_lengths[0] == 0`.
use ndarray::{Array1, Axis, Zip, s};

use crate::online_detection::{
    core::{
        hazard::HazardModel,
        hypothesis::PosteriorEntry,
        predictive::predictive_densities,
        prior::{NigParams, NigPrior},
        special::DirectBeta,
    },
    posterior::{
        PosteriorKind, RunLengthPosterior, StepOutcome,
        recursion::{first_argmax, kept_indices, message_pass, mixture, survivors},
    },
};

/// DensePosterior — reference variant with one column per field.
#[derive(Debug, Clone)]
pub struct DensePosterior {
    prior: NigPrior,
    truncation_threshold: f64,
    alpha: Array1<f64>,
    beta: Array1<f64>,
    mu: Array1<f64>,
    kappa: Array1<f64>,
    probabilities: Array1<f64>,
    run_lengths: Array1<usize>,
}

impl DensePosterior {
    pub fn new(prior: NigPrior, truncation_threshold: f64) -> Self {
        let p = prior.params();
        DensePosterior {
            prior,
            truncation_threshold,
            alpha: Array1::from_elem(1, p.alpha),
            beta: Array1::from_elem(1, p.beta),
            mu: Array1::from_elem(1, p.mu),
            kappa: Array1::from_elem(1, p.kappa),
            probabilities: Array1::from_elem(1, 1.0),
            run_lengths: Array1::zeros(1),
        }
    }

    fn params(&self) -> Vec<NigParams> {
        Zip::from(&self.alpha)
            .and(&self.beta)
            .and(&self.mu)
            .and(&self.kappa)
            .map_collect(|&alpha, &beta, &mu, &kappa| NigParams { alpha, beta, mu, kappa })
            .to_vec()
    }

    fn predictive(&self, x: f64) -> Array1<f64> {
        Array1::from(predictive_densities(x, &self.params(), &mut DirectBeta))
    }

    /// Conjugate no-change update of every column, prior prepended.
    fn grow_no_change(&mut self, x: f64) {
        let p = self.prior.params();
        let kappa_plus = &self.kappa + 1.0;
        let diff = self.mu.mapv(|mu| x - mu);

        let alpha = &self.alpha + 0.5;
        let beta = &self.beta + &(&self.kappa * &diff * &diff / &(&kappa_plus * 2.0));
        let mu = (&self.kappa * &self.mu + x) / &kappa_plus;

        self.alpha = prepend(p.alpha, &alpha);
        self.beta = prepend(p.beta, &beta);
        self.mu = prepend(p.mu, &mu);
        self.kappa = prepend(p.kappa, &kappa_plus);
        self.run_lengths = prepend(0, &(&self.run_lengths + 1));
    }

    fn select(&mut self, indices: &[usize]) {
        self.alpha = self.alpha.select(Axis(0), indices);
        self.beta = self.beta.select(Axis(0), indices);
        self.mu = self.mu.select(Axis(0), indices);
        self.kappa = self.kappa.select(Axis(0), indices);
        self.probabilities = self.probabilities.select(Axis(0), indices);
        self.run_lengths = self.run_lengths.select(Axis(0), indices);
    }
}

impl RunLengthPosterior for DensePosterior {
    fn kind(&self) -> PosteriorKind {
        PosteriorKind::Reference
    }

    fn step(&mut self, x: f64, hazard: &HazardModel) -> StepOutcome {
        let predictive = self.predictive(x);
        let pass = message_pass(predictive.view(), self.probabilities.view(), hazard);

        let degenerate = pass.is_degenerate();
        self.grow_no_change(x);
        let mask = survivors(pass.probabilities.view(), self.truncation_threshold);
        self.probabilities = pass.probabilities;
        self.select(&kept_indices(&mask));

        let map_index = first_argmax(self.probabilities.view());
        StepOutcome { map_run_length: self.run_lengths[map_index], degenerate }
    }

    fn reset(&mut self) {
        *self = DensePosterior::new(self.prior, self.truncation_threshold);
    }

    fn change_probability(&mut self, x: f64) -> f64 {
        mixture(self.predictive(x).view(), self.probabilities.view())
    }

    fn len(&self) -> usize {
        self.probabilities.len()
    }

    fn probabilities(&self) -> Vec<f64> {
        self.probabilities.to_vec()
    }

    fn run_lengths(&self) -> Vec<usize> {
        self.run_lengths.to_vec()
    }

    fn entries(&self) -> Vec<PosteriorEntry> {
        self.params()
            .into_iter()
            .zip(self.run_lengths.iter().zip(&self.probabilities))
            .map(|(params, (&run_length, &probability))| PosteriorEntry {
                run_length,
                probability,
                params,
            })
            .collect()
    }
}

fn prepend<T: Clone + Default>(head: T, tail: &Array1<T>) -> Array1<T> {
    let mut out = Array1::from_elem(tail.len() + 1, T::default());
    out[0] = head;
    out.slice_mut(s![1..]).assign(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_prior() -> NigPrior {
        NigPrior::new(0.0, 1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Check the column update against the scalar conjugate update.
    //
    // Given
    // -----
    // - Unit prior, λ = 100, truncation effectively off (1e-300),
    //   observations 0.5, −1.2, 3.0.
    //
    // Expect
    // ------
    // - Run lengths [0, 1, 2, 3]; entry k equals the prior aged by the last k
    //   observations, bit for bit.
    fn dense_columns_track_scalar_conjugate_update() {
        // Arrange
        let hazard = HazardModel::new(100.0).unwrap();
        let mut posterior = DensePosterior::new(unit_prior(), 1e-300);
        let xs = [0.5, -1.2, 3.0];

        // Act
        for &x in &xs {
            posterior.step(x, &hazard);
        }

        // Assert
        let entries = posterior.entries();
        assert_eq!(posterior.run_lengths(), vec![0, 1, 2, 3]);
        let p = unit_prior().params();
        assert_eq!(entries[0].params, p);
        assert_eq!(entries[1].params, p.updated(3.0));
        assert_eq!(entries[2].params, p.updated(-1.2).updated(3.0));
        assert_eq!(entries[3].params, p.updated(0.5).updated(-1.2).updated(3.0));
        assert_relative_eq!(posterior.probabilities().iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify truncation and reset on the dense columns.
    //
    // Given
    // -----
    // - Truncation threshold 1e-3 and a long flat series followed by reset.
    //
    // Expect
    // ------
    // - No index > 0 at or below the threshold; reset yields the singleton.
    fn dense_truncates_and_resets() {
        // Arrange
        let hazard = HazardModel::new(10.0).unwrap();
        let mut posterior = DensePosterior::new(unit_prior(), 1e-3);

        // Act
        for _ in 0..50 {
            posterior.step(0.0, &hazard);
        }
        let probabilities = posterior.probabilities();
        posterior.reset();

        // Assert
        assert!(probabilities.iter().skip(1).all(|&p| p > 1e-3));
        assert_eq!(posterior.len(), 1);
        assert_eq!(posterior.run_lengths(), vec![0]);
        assert_eq!(posterior.probabilities(), vec![1.0]);
    }

    #[test]
    // Purpose
    // -------
    // Check that a step whose predictive mass vanishes is reported as
    // degenerate and leaves the probabilities unnormalized.
    //
    // Given
    // -----
    // - α₀ = 1e-320, so the directly evaluated `B(1/2, α₀)` is infinite and
    //   every predictive density is zero.
    //
    // Expect
    // ------
    // - `degenerate` is set, MAP run length 0, probabilities [0].
    fn dense_flags_degenerate_step() {
        // Arrange
        let hazard = HazardModel::new(100.0).unwrap();
        let prior = NigPrior::new(0.0, 1.0, 1e-320, 1.0).unwrap();
        let mut posterior = DensePosterior::new(prior, 1e-8);

        // Act
        let outcome = posterior.step(0.0, &hazard);

        // Assert
        assert_eq!(outcome, StepOutcome { map_run_length: 0, degenerate: true });
        assert_eq!(posterior.probabilities(), vec![0.0]);
    }
}

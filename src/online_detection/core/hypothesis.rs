//! Hypothesis arena — sufficient statistics of the optimized posterior.
//!
//! Purpose
//! -------
//! Store every active run-length hypothesis as one record (run length,
//! probability, NIG hyperparameters, stable id) instead of five parallel,
//! jointly-resized arrays. Insertion at the front and pruning are the
//! only two ways the arena changes shape, so the fields of a hypothesis can
//! never drift out of alignment.
//!
//! Key behaviors
//! -------------
//! - [`HypothesisArena::grow_no_change`] ages every record by one
//!   observation (conjugate update, run length + 1) and inserts a fresh prior
//!   hypothesis at index 0.
//! - [`HypothesisArena::assign_probabilities`] writes the normalized
//!   posterior mass computed by the caller.
//! - [`HypothesisArena::prune`] drops records failing a survivor mask;
//!   index 0 is always retained.
//! - [`HypothesisArena::reset`] collapses to the singleton prior hypothesis.
//!
//! Invariants & assumptions
//! ------------------------
//! - Records are ordered by strictly ascending run length and
//!   `records[0].run_length == 0` after every public operation.
//! - Ids are assigned from a monotonically increasing counter at creation
//!   and are never reused within one arena, including across resets.
//! - The arena never becomes empty.
use std::collections::VecDeque;

use crate::online_detection::core::prior::{NigParams, NigPrior};

/// Read-only view of one hypothesis, shared by both posterior backends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosteriorEntry {
    pub run_length: usize,
    pub probability: f64,
    pub params: NigParams,
}

/// Hypothesis — one run-length candidate owned by a [`HypothesisArena`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hypothesis {
    /// Stable identity assigned at creation.
    pub id: u64,
    pub run_length: usize,
    pub probability: f64,
    pub params: NigParams,
}

impl Hypothesis {
    pub fn entry(&self) -> PosteriorEntry {
        PosteriorEntry {
            run_length: self.run_length,
            probability: self.probability,
            params: self.params,
        }
    }
}

/// HypothesisArena — ordered store of active hypotheses.
#[derive(Debug, Clone)]
pub struct HypothesisArena {
    prior: NigPrior,
    records: VecDeque<Hypothesis>,
    next_id: u64,
}

impl HypothesisArena {
    /// Arena holding the single prior hypothesis with probability 1.
    pub fn new(prior: NigPrior) -> Self {
        let mut arena = HypothesisArena { prior, records: VecDeque::new(), next_id: 0 };
        arena.reset();
        arena
    }

    /// Replace every record with a fresh prior hypothesis of probability 1.
    pub fn reset(&mut self) {
        self.records.clear();
        let fresh = self.fresh(1.0);
        self.records.push_back(fresh);
    }

    /// Age every record by `x` and insert the prior at the front.
    ///
    /// Existing records keep their current probability; the new front record
    /// starts at 0 until [`assign_probabilities`](Self::assign_probabilities)
    /// is called. Size goes from N to N + 1.
    pub fn grow_no_change(&mut self, x: f64) {
        for record in self.records.iter_mut() {
            record.params = record.params.updated(x);
            record.run_length += 1;
        }
        let fresh = self.fresh(0.0);
        self.records.push_front(fresh);
    }

    /// Overwrite probabilities in order. Extra values are ignored and missing
    /// ones leave the tail untouched.
    pub fn assign_probabilities<I>(&mut self, probabilities: I)
    where
        I: IntoIterator<Item = f64>,
    {
        for (record, p) in self.records.iter_mut().zip(probabilities) {
            record.probability = p;
        }
    }

    /// Keep records whose mask entry is `true`; index 0 is kept regardless.
    /// Records beyond the end of the mask are dropped.
    pub fn prune(&mut self, mask: &[bool]) {
        let mut index = 0;
        self.records.retain(|_| {
            let keep = index == 0 || mask.get(index).copied().unwrap_or(false);
            index += 1;
            keep
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Hypothesis> + '_ {
        self.records.iter()
    }

    pub fn params(&self) -> impl ExactSizeIterator<Item = &NigParams> + '_ {
        self.records.iter().map(|record| &record.params)
    }

    pub fn front(&self) -> Option<&Hypothesis> {
        self.records.front()
    }

    pub fn get(&self, index: usize) -> Option<&Hypothesis> {
        self.records.get(index)
    }

    pub fn prior(&self) -> NigPrior {
        self.prior
    }

    fn fresh(&mut self, probability: f64) -> Hypothesis {
        let id = self.next_id;
        self.next_id += 1;
        Hypothesis { id, run_length: 0, probability, params: self.prior.params() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Growth: front insertion of the prior, aging of existing records,
    //   stable ids.
    // - Pruning by mask and by predicate with the index-0 exemption.
    // - Reset and its idempotence (up to fresh ids).
    // -------------------------------------------------------------------------

    fn prior() -> NigPrior {
        NigPrior::new(0.0, 1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that `grow_no_change` inserts the prior at index 0 and ages
    // every other record by one conjugate update.
    //
    // Given
    // -----
    // - A fresh arena grown twice with x = 2 then x = 4.
    //
    // Expect
    // ------
    // - Run lengths [0, 1, 2]; index 0 holds the prior; index 2 equals the
    //   prior updated by 2 then 4; ids are distinct and keep their records.
    fn arena_grow_inserts_prior_and_ages_records() {
        // Arrange
        let mut arena = HypothesisArena::new(prior());
        let first_id = arena.front().unwrap().id;

        // Act
        arena.grow_no_change(2.0);
        arena.grow_no_change(4.0);

        // Assert
        let run_lengths: Vec<usize> = arena.iter().map(|h| h.run_length).collect();
        assert_eq!(run_lengths, vec![0, 1, 2]);
        assert_eq!(arena.get(0).unwrap().params, prior().params());
        assert_eq!(arena.get(2).unwrap().params, prior().params().updated(2.0).updated(4.0));
        assert_eq!(arena.get(2).unwrap().id, first_id);
        let mut ids: Vec<u64> = arena.iter().map(|h| h.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Ensure that pruning never removes index 0, even when its mask entry
    // is false.
    //
    // Given
    // -----
    // - An arena of four records with probabilities [0, 0.5, 1e-12, 0.5].
    //
    // Expect
    // ------
    // - `prune([false, true, false, true])` keeps run lengths [0, 1, 3].
    // - `prune([false])` then keeps only run length 0.
    fn arena_prune_keeps_index_zero() {
        // Arrange
        let mut arena = HypothesisArena::new(prior());
        for x in [1.0, 1.0, 1.0] {
            arena.grow_no_change(x);
        }
        arena.assign_probabilities([0.0, 0.5, 1e-12, 0.5]);

        // Act
        arena.prune(&[false, true, false, true]);
        let after_mask: Vec<usize> = arena.iter().map(|h| h.run_length).collect();
        arena.prune(&[false]);

        // Assert
        assert_eq!(after_mask, vec![0, 1, 3]);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.front().unwrap().run_length, 0);
    }

    #[test]
    // Purpose
    // -------
    // Check that reset collapses to the prior singleton and that a second
    // reset yields the same observable state.
    //
    // Given
    // -----
    // - An arena grown several times.
    //
    // Expect
    // ------
    // - One record, run length 0, probability 1, prior parameters, both
    //   after one and after two resets.
    fn arena_reset_is_idempotent() {
        // Arrange
        let mut arena = HypothesisArena::new(prior());
        for x in [0.3, -4.0, 8.0] {
            arena.grow_no_change(x);
        }

        // Act
        arena.reset();
        let once: Vec<PosteriorEntry> = arena.iter().map(Hypothesis::entry).collect();
        arena.reset();
        let twice: Vec<PosteriorEntry> = arena.iter().map(Hypothesis::entry).collect();

        // Assert
        assert_eq!(once, twice);
        assert_eq!(
            once,
            vec![PosteriorEntry { run_length: 0, probability: 1.0, params: prior().params() }]
        );
    }
}

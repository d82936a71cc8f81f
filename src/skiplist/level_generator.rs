// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use rand::{
    Rng,
    RngCore,
};
use tracing::instrument;

use crate::errs::SkipListError;

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a `LevelGenerator`.
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist for this level
    /// generator.
    fn total(&self) -> usize;
    /// Generate a random height for a new node in the range `[1, total]`.
    ///
    /// This must never return a height that is `> self.total()` or zero.
    fn random(&mut self) -> usize;
}

/// A level generator which will produce geometrically distributed heights.
///
/// The probability of generating height `n` is `p` times the probability of
/// generating height `n-1`, with the probability truncated at the maximum
/// number of levels allowed. Whatever mass lies past the cap lands on `total`.
#[derive(Debug, Clone)]
pub struct GeometricalLevelGenerator<R> {
    total: usize,
    p: f64,
    rng: R,
}

impl<R: RngCore> GeometricalLevelGenerator<R> {
    /// Create a new GeometricalLevelGenerator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level. Every draw comes from `rng`, so a seeded generator makes the
    /// heights reproducible.
    ///
    /// `p` must be strictly between 0 and 1 and `total` must be at least 1.
    pub fn new(total: usize, p: f64, rng: R) -> Result<Self, SkipListError> {
        if total == 0 {
            return Err(SkipListError::InvalidMaxLevel(total));
        }
        // written this way round so NaN is rejected too
        if !(p > 0.0 && p < 1.0) {
            return Err(SkipListError::InvalidProbability(p));
        }
        Ok(GeometricalLevelGenerator { total, p, rng })
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

impl<R: RngCore> LevelGenerator for GeometricalLevelGenerator<R> {
    #[instrument(level = "trace", skip(self), ret)]
    fn random(&mut self) -> usize {
        let mut h = 1;
        while h < self.total && self.rng.gen::<f64>() < self.p {
            h += 1;
        }
        h
    }

    fn total(&self) -> usize {
        self.total
    }
}

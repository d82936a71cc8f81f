// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use rand::{
    rngs::SmallRng,
    SeedableRng,
};

use crate::{
    errs::SkipListError,
    skiplist::SkipList,
};

/// Sixteen levels comfortably index tens of thousands of keys at `p = 0.5`.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// The chance that a node on level `n` is also on level `n + 1`.
pub const DEFAULT_P: f64 = 0.5;

/// The default set of skip list options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkipListBuilder {
    /// The fixed upper bound on the number of levels.
    pub max_level: usize,
    /// The per-level promotion probability, strictly between 0 and 1.
    pub p: f64,
    /// Seed for the height generator. Without one, the generator is seeded
    /// from the operating system's entropy.
    pub seed: Option<u64>,
}

impl SkipListBuilder {
    pub fn new() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            p: DEFAULT_P,
            seed: None,
        }
    }

    pub fn max_level(&mut self, max_level: usize) -> &mut Self {
        self.max_level = max_level;
        self
    }

    pub fn p(&mut self, p: f64) -> &mut Self {
        self.p = p;
        self
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    pub fn build<K>(self) -> Result<SkipList<K>, SkipListError> {
        let rng = match self.seed {
            | Some(seed) => SmallRng::seed_from_u64(seed),
            | None => SmallRng::from_entropy(),
        };
        SkipList::with_rng(self.max_level, self.p, rng)
    }
}

impl Default for SkipListBuilder {
    fn default() -> Self {
        SkipListBuilder::new()
    }
}

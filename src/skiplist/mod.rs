// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! A skiplist which allows faster random access than a standard linked list.
//!
//! SkipLists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level `n > 0` will contain a random subset of the nodes on level `n - 1`.
//!
//! Every level is a singly linked list that starts at a keyless sentinel. The
//! sentinels are stacked into a vertical chain whose top is the list's head,
//! and every real node at level `n > 0` points down to its own copy at level
//! `n - 1`. Nodes live in an arena and link to each other by [`NodeId`], so
//! there are no raw pointers and no reference counting.
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level `n` is `p` times the chance of occupying level `n-1`
//! (with `0 < p < 1`). It is very unlikely that this will need to be changed
//! as the default should suffice, but if need be custom level generators can
//! be implemented and handed to [`SkipList::with_generator`].
//!
//! ```text
//! level 2:  H ──────────────► 10
//!           │                 │
//! level 1:  H ──────────────► 10 ──► 20
//!           │                 │      │
//! level 0:  H ──► 5 ────────► 10 ──► 20 ──► 20 ──► 40
//! ```
//!
//! Duplicate keys are allowed and each insert creates an independent column.
//! Equal keys keep insertion order, first-inserted leftmost.

mod level_generator;
mod node;

use std::{
    fmt,
    fmt::Debug,
};

use getset::CopyGetters;
pub use level_generator::{
    GeometricalLevelGenerator,
    LevelGenerator,
};
pub use node::NodeId;
use node::{
    Arena,
    Node,
};
use rand::{
    rngs::SmallRng,
    RngCore,
    SeedableRng,
};
use tracing::{
    debug,
    instrument,
    trace,
};

use crate::{
    config::DEFAULT_P,
    errs::SkipListError,
};

/// The level generator used when none is supplied.
pub type DefaultLevelGenerator = GeometricalLevelGenerator<SmallRng>;

#[derive(CopyGetters)]
pub struct SkipList<K, G = DefaultLevelGenerator> {
    arena: Arena<K>,
    /// The topmost sentinel.
    head: NodeId,
    /// Number of active levels, always in `1..=max_level`.
    #[getset(get_copy = "pub")]
    levels: usize,
    /// Number of keys, i.e. real nodes at level 0.
    #[getset(get_copy = "pub")]
    length: usize,
    generator: G,
}

impl<K> SkipList<K> {
    /// A list with promotion probability `0.5` whose heights are drawn from an
    /// entropy-seeded generator.
    pub fn new(max_level: usize) -> Result<Self, SkipListError> {
        Self::with_probability(max_level, DEFAULT_P)
    }

    pub fn with_probability(max_level: usize, p: f64) -> Result<Self, SkipListError> {
        Self::with_rng(max_level, p, SmallRng::from_entropy())
    }
}

impl<K, R: RngCore> SkipList<K, GeometricalLevelGenerator<R>> {
    /// Build a list over an explicit random source. A seeded `rng` makes every
    /// structural decision reproducible.
    pub fn with_rng(max_level: usize, p: f64, rng: R) -> Result<Self, SkipListError> {
        let generator = GeometricalLevelGenerator::new(max_level, p, rng)?;
        Self::with_generator(generator)
    }

    /// The per-level promotion probability.
    pub fn p(&self) -> f64 {
        self.generator.p()
    }
}

impl<K, G: LevelGenerator> SkipList<K, G> {
    /// Build a list over any level generator. The generator must allow at
    /// least one level.
    pub fn with_generator(generator: G) -> Result<Self, SkipListError> {
        if generator.total() == 0 {
            return Err(SkipListError::InvalidMaxLevel(0));
        }

        let mut arena = Arena::new();
        let head = arena.alloc(Node::sentinel(None));
        Ok(SkipList {
            arena,
            head,
            levels: 1,
            length: 0,
            generator,
        })
    }

    /// The fixed upper bound on the number of levels.
    pub fn max_level(&self) -> usize {
        self.generator.total()
    }
}

impl<K, G> SkipList<K, G> {
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Walks the nodes of `level`, where level 0 holds every key. Returns
    /// `None` for levels that do not exist yet.
    pub fn level(&self, level: usize) -> Option<Level<'_, K>> {
        if level >= self.levels {
            return None;
        }
        let mut sentinel = self.head;
        for _ in level + 1..self.levels {
            sentinel = self.arena[sentinel].bottom?;
        }
        Some(Level::new(&self.arena, self.arena[sentinel].right))
    }

    /// Iterates the keys in ascending order.
    pub fn iter(&self) -> Keys<'_, K> {
        Keys {
            inner: Level::new(&self.arena, self.arena[self.floor()].right),
        }
    }

    /// The level-0 sentinel.
    fn floor(&self) -> NodeId {
        let mut current = self.head;
        while let Some(below) = self.arena[current].bottom {
            current = below;
        }
        current
    }
}

impl<K: Ord, G: LevelGenerator> SkipList<K, G> {
    /// Moves right from `current` for as long as the next node's key satisfies
    /// `keep_going`, returning the last node visited.
    fn advance<F>(&self, mut current: NodeId, keep_going: F) -> NodeId
    where
        F: Fn(&K) -> bool,
    {
        while let Some(next) = self.arena[current].right {
            match &self.arena[next].key {
                | Some(key) if keep_going(key) => current = next,
                | _ => break,
            }
        }
        current
    }

    /// Finds a node holding `key`. With duplicates present this lands on the
    /// most recently inserted one.
    #[instrument(level = "trace", skip_all)]
    pub fn lookup(&self, key: &K) -> Option<Entry<'_, K>> {
        let mut current = self.head;
        loop {
            current = self.advance(current, |k| k <= key);
            match self.arena[current].bottom {
                | Some(below) => current = below,
                | None => break,
            }
        }

        match &self.arena[current].key {
            | Some(found) if found == key => Entry::new(&self.arena, current),
            | _ => None,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.lookup(key).is_some()
    }

    /// How many copies of `key` the list holds.
    pub fn count(&self, key: &K) -> usize {
        let mut current = self.head;
        loop {
            current = self.advance(current, |k| k < key);
            match self.arena[current].bottom {
                | Some(below) => current = below,
                | None => break,
            }
        }

        Level::new(&self.arena, self.arena[current].right)
            .take_while(|entry| entry.key() == key)
            .count()
    }

    /// Inserts `key`. Duplicates are never rejected, each call adds exactly
    /// one node column.
    #[instrument(level = "debug", skip_all, fields(length = self.length))]
    pub fn insert(&mut self, key: K)
    where
        K: Clone,
    {
        // predecessors, filled top-down and then flipped so index == level
        let mut update = Vec::with_capacity(self.max_level());
        let mut current = self.head;
        for _ in 0..self.levels {
            current = self.advance(current, |k| k <= &key);
            update.push(current);
            if let Some(below) = self.arena[current].bottom {
                current = below;
            }
        }
        update.reverse();

        let height = self.generator.random().clamp(1, self.max_level());
        trace!(height, "drew node height");

        if height > self.levels {
            for _ in self.levels..height {
                let sentinel = self.arena.alloc(Node::sentinel(Some(self.head)));
                self.head = sentinel;
                update.push(sentinel);
            }
            debug!(from = self.levels, to = height, "grew sentinel chain");
            self.levels = height;
        }

        let mut below = None;
        for pred in update.into_iter().take(height) {
            let right = self.arena[pred].right;
            let node = self.arena.alloc(Node {
                key: Some(key.clone()),
                right,
                bottom: below,
            });
            self.arena[pred].right = Some(node);
            below = Some(node);
        }

        self.length += 1;
    }

    /// Removes one copy of `key`, returning whether anything was removed.
    /// Absent keys are a no-op.
    #[instrument(level = "debug", skip_all, fields(length = self.length))]
    pub fn delete(&mut self, key: &K) -> bool {
        let mut update: Vec<Option<NodeId>> = vec![None; self.levels];
        let mut current = self.head;
        for level in (0..self.levels).rev() {
            current = self.advance(current, |k| k < key);
            if let Some(next) = self.arena[current].right {
                if self.arena[next].key.as_ref() == Some(key) {
                    update[level] = Some(current);
                }
            }
            if let Some(below) = self.arena[current].bottom {
                current = below;
            }
        }

        // a key present at level n is present at every level below it, so
        // the recorded predecessors form a run starting at level 0
        let mut unlinked = 0;
        for pred in update.into_iter().map_while(|pred| pred) {
            if let Some(target) = self.arena[pred].right {
                let node = self.arena.free(target);
                self.arena[pred].right = node.right;
                unlinked += 1;
            }
        }

        if unlinked == 0 {
            trace!("key not present");
            return false;
        }

        self.length -= 1;
        debug!(unlinked, "removed node");
        true
    }
}

impl<K, G> Debug for SkipList<K, G>
where
    K: Debug,
    G: LevelGenerator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipList")
            .field("max_level", &self.max_level())
            .field("levels", &self.levels)
            .field("length", &self.length)
            .field("keys", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<K, G> Extend<K> for SkipList<K, G>
where
    K: Ord + Clone,
    G: LevelGenerator,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K, G> IntoIterator for &'a SkipList<K, G> {
    type IntoIter = Keys<'a, K>;
    type Item = &'a K;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A read-only view of one real node.
pub struct Entry<'a, K> {
    arena: &'a Arena<K>,
    id: NodeId,
    key: &'a K,
}

impl<'a, K> Entry<'a, K> {
    /// `None` for sentinels.
    fn new(arena: &'a Arena<K>, id: NodeId) -> Option<Self> {
        arena[id]
            .key
            .as_ref()
            .map(|key| Entry { arena, id, key })
    }

    pub fn key(&self) -> &'a K {
        self.key
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The same column one level down, if this is not level 0.
    pub fn down(&self) -> Option<Entry<'a, K>> {
        self.arena[self.id]
            .bottom
            .and_then(|below| Entry::new(self.arena, below))
    }

    /// The id of this column's level-0 node.
    pub fn base(&self) -> NodeId {
        let mut current = self.id;
        while let Some(below) = self.arena[current].bottom {
            current = below;
        }
        current
    }
}

impl<K> Clone for Entry<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Entry<'_, K> {}

impl<K: Debug> Debug for Entry<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("key", self.key)
            .finish()
    }
}

/// The nodes of one level in link order.
pub struct Level<'a, K> {
    arena: &'a Arena<K>,
    next: Option<NodeId>,
}

impl<'a, K> Level<'a, K> {
    fn new(arena: &'a Arena<K>, first: Option<NodeId>) -> Self {
        Level { arena, next: first }
    }
}

impl<'a, K> Iterator for Level<'a, K> {
    type Item = Entry<'a, K>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.arena[id].right;
        Entry::new(self.arena, id)
    }
}

/// Keys of level 0 in ascending order.
pub struct Keys<'a, K> {
    inner: Level<'a, K>,
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| entry.key())
    }
}

#[cfg(test)]
mod tests {
    use rand::{
        rngs::SmallRng,
        SeedableRng,
    };

    use super::SkipList;
    use crate::{
        errs::SkipListError,
        skiplist::{
            test::{
                assert_invariants,
                ScriptedLevelGenerator,
            },
            GeometricalLevelGenerator,
            NodeId,
        },
    };

    type SeededList<K> = SkipList<K, GeometricalLevelGenerator<SmallRng>>;

    fn seeded<K>(max_level: usize) -> SeededList<K> {
        SkipList::with_rng(max_level, 0.5, SmallRng::seed_from_u64(42)).unwrap()
    }

    fn level_keys<K: Clone, G>(list: &SkipList<K, G>, level: usize) -> Vec<K> {
        list.level(level)
            .unwrap()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Node ids per level, bottom first.
    fn topology<K, G>(list: &SkipList<K, G>) -> Vec<Vec<NodeId>> {
        (0..list.levels())
            .map(|level| list.level(level).unwrap().map(|entry| entry.id()).collect())
            .collect()
    }

    #[test]
    fn test_new() {
        let list: SkipList<u32> = SkipList::new(10).unwrap();
        assert_eq!(list.len(), 0);
        assert_eq!(list.levels(), 1);
        assert_eq!(list.max_level(), 10);
        assert_eq!(list.p(), 0.5);
        assert!(list.is_empty());
        assert_invariants(&list);
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            SkipList::<u32>::new(0).unwrap_err(),
            SkipListError::InvalidMaxLevel(0)
        );
        assert_eq!(
            SkipList::<u32>::with_probability(4, 1.5).unwrap_err(),
            SkipListError::InvalidProbability(1.5)
        );
    }

    #[test]
    fn test_insert_lookup_delete_scenario() {
        let mut list = seeded(10);
        for key in [20, 40, 10, 20, 5, 80] {
            list.insert(key);
            assert_invariants(&list);
        }

        assert_eq!(list.lookup(&80).map(|entry| *entry.key()), Some(80));
        assert_eq!(list.len(), 6);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![5, 10, 20, 20, 40, 80]);

        assert!(list.delete(&20));
        assert_eq!(list.len(), 5);
        assert_eq!(list.count(&20), 1);
        assert!(list.lookup(&20).is_some());
        assert_invariants(&list);

        let mut walked = Vec::new();
        for key in &list {
            walked.push(*key);
        }
        assert_eq!(walked, vec![5, 10, 20, 40, 80]);
    }

    #[test]
    fn test_delete_on_empty() {
        let mut list: SeededList<u32> = seeded(10);
        assert!(!list.delete(&999));
        assert_eq!(list.len(), 0);
        assert_eq!(list.levels(), 1);
        assert_invariants(&list);
    }

    #[test]
    fn test_delete_absent_keeps_topology() {
        let mut list = seeded(8);
        list.extend([3, 1, 4, 1, 5, 9, 2, 6]);
        let before = topology(&list);

        assert!(!list.delete(&7));
        assert!(!list.delete(&0));
        assert!(!list.delete(&100));

        assert_eq!(topology(&list), before);
        assert_eq!(list.len(), 8);
    }

    #[test]
    fn test_lookup_bounds() {
        let mut list = seeded(6);
        list.extend([10, 20, 30]);

        assert!(list.lookup(&5).is_none(), "below every key");
        assert!(list.lookup(&35).is_none(), "above every key");
        assert!(list.lookup(&15).is_none(), "between keys");
        assert!(list.contains(&10));
        assert!(list.contains(&30));
    }

    #[test]
    fn test_insert_then_delete_once() {
        let mut list = seeded(12);
        for key in 0..200u32 {
            list.insert(key * 7 % 101);
        }
        assert_eq!(list.len(), 200);
        assert_invariants(&list);

        let mut unique = seeded(12);
        unique.extend(0..50u32);
        for key in 0..50u32 {
            assert!(unique.delete(&key));
            assert!(unique.lookup(&key).is_none());
            assert_invariants(&unique);
        }
        assert!(unique.is_empty());
        assert_eq!(unique.iter().count(), 0);
    }

    #[test]
    fn test_levels_monotonic_and_bounded() {
        let mut list = SkipList::with_rng(4, 0.9, SmallRng::seed_from_u64(7)).unwrap();
        let mut last = list.levels();
        for key in 0..500u32 {
            list.insert(key);
            assert!(list.levels() >= last);
            assert!(list.levels() <= list.max_level());
            last = list.levels();
        }
        assert_eq!(list.levels(), 4, "p=0.9 should saturate four levels quickly");
    }

    #[test]
    fn test_same_seed_same_shape() {
        let mut a = seeded(10);
        let mut b = seeded(10);
        a.extend(0..100u32);
        b.extend(0..100u32);
        for level in 0..a.levels() {
            let left: Vec<_> = a.level(level).unwrap().map(|entry| *entry.key()).collect();
            let right: Vec<_> = b.level(level).unwrap().map(|entry| *entry.key()).collect();
            assert_eq!(left, right);
        }
    }

    #[test]
    fn test_scripted_shape() {
        let mut list = SkipList::with_generator(ScriptedLevelGenerator::new(4, [2, 1, 3, 1])).unwrap();
        list.extend([20, 40, 10, 20]);

        assert_eq!(list.levels(), 3);
        assert_eq!(level_keys(&list, 0), vec![10, 20, 20, 40]);
        assert_eq!(level_keys(&list, 1), vec![10, 20]);
        assert_eq!(level_keys(&list, 2), vec![10]);
        assert!(list.level(3).is_none());

        // the tall 20 was inserted first, so it sits leftmost
        let tall = list.level(1).unwrap().nth(1).unwrap();
        let first_twenty = list.level(0).unwrap().nth(1).unwrap();
        assert_eq!(tall.base(), first_twenty.id());
        assert_eq!(tall.down().map(|entry| entry.id()), Some(first_twenty.id()));
        assert_invariants(&list);
    }

    #[test]
    fn test_duplicate_delete_truncates_tallest_run() {
        // short 5 inserted first sits left of the tall 5
        let mut list = SkipList::with_generator(ScriptedLevelGenerator::new(4, [1, 3])).unwrap();
        list.extend([5, 5]);
        assert_eq!(level_keys(&list, 0), vec![5, 5]);
        assert_eq!(level_keys(&list, 2), vec![5]);

        assert!(list.delete(&5));
        assert_eq!(list.len(), 1);
        assert_eq!(list.count(&5), 1);
        // the short column lost level 0, the tall one lost levels 1 and 2
        assert_eq!(level_keys(&list, 0), vec![5]);
        assert!(level_keys(&list, 1).is_empty());
        assert!(level_keys(&list, 2).is_empty());
        assert_eq!(list.levels(), 3, "the sentinel chain never shrinks");
        assert_invariants(&list);

        assert!(list.delete(&5));
        assert!(list.is_empty());
        assert_invariants(&list);
    }

    #[test]
    fn test_duplicate_delete_tall_first() {
        let mut list = SkipList::with_generator(ScriptedLevelGenerator::new(4, [3, 1])).unwrap();
        list.extend([5, 5]);

        assert!(list.delete(&5));
        assert_eq!(level_keys(&list, 0), vec![5]);
        assert!(level_keys(&list, 1).is_empty());
        assert_invariants(&list);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut list = SkipList::with_generator(ScriptedLevelGenerator::new(2, [2, 2])).unwrap();
        list.insert(1u32);
        let capacity = list.arena.capacity();

        assert!(list.delete(&1));
        list.insert(2);
        assert_eq!(list.arena.capacity(), capacity);
        assert_invariants(&list);
    }

    #[test]
    fn test_out_of_range_heights_are_clamped() {
        let mut list = SkipList::with_generator(ScriptedLevelGenerator::new(3, [0, 9])).unwrap();
        list.extend([1u32, 2]);
        assert_eq!(list.levels(), 3);
        assert_eq!(level_keys(&list, 0), vec![1, 2]);
        assert_eq!(level_keys(&list, 2), vec![2]);
        assert_invariants(&list);
    }

    #[test]
    fn test_generator_without_levels_is_rejected() {
        let result = SkipList::<u32, _>::with_generator(ScriptedLevelGenerator::new(0, [1]));
        assert_eq!(result.unwrap_err(), SkipListError::InvalidMaxLevel(0));

        let mut list = SkipList::with_generator(ScriptedLevelGenerator::new(1, [5])).unwrap();
        list.insert(1u32);
        assert_eq!(list.levels(), 1);
        assert_eq!(list.max_level(), 1);
        assert_invariants(&list);
    }

    #[test]
    fn test_debug() {
        let mut list = SkipList::with_generator(ScriptedLevelGenerator::new(2, [1, 1])).unwrap();
        list.extend(["b", "a"]);
        assert_eq!(
            format!("{:?}", list),
            r#"SkipList { max_level: 2, levels: 1, length: 2, keys: ["a", "b"] }"#
        );
    }
}

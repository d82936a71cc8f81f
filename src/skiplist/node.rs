// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::ops::{
    Index,
    IndexMut,
};

/// A stable handle to a node slot in an [`Arena`]. Handles are only
/// meaningful for the list that produced them, and a handle to a deleted node
/// may later name a different node once its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One cell of the layered structure. Sentinels carry no key.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    pub(crate) key: Option<K>,
    pub(crate) right: Option<NodeId>,
    pub(crate) bottom: Option<NodeId>,
}

impl<K> Node<K> {
    pub(crate) fn sentinel(bottom: Option<NodeId>) -> Self {
        Node {
            key: None,
            right: None,
            bottom,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_sentinel(&self) -> bool {
        self.key.is_none()
    }
}

#[derive(Debug, Clone)]
enum Slot<K> {
    Occupied(Node<K>),
    Vacant,
}

/// Slot storage for every node of a list. Freed slots are recycled LIFO.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K> {
    slots: Vec<Slot<K>>,
    free: Vec<usize>,
}

impl<K> Arena<K> {
    pub(crate) fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<K>) -> NodeId {
        match self.free.pop() {
            | Some(idx) => {
                self.slots[idx] = Slot::Occupied(node);
                NodeId(idx)
            },
            | None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            },
        }
    }

    pub(crate) fn free(&mut self, id: NodeId) -> Node<K> {
        match std::mem::replace(&mut self.slots[id.0], Slot::Vacant) {
            | Slot::Occupied(node) => {
                self.free.push(id.0);
                node
            },
            | Slot::Vacant => unreachable!("double free of node {:?}", id),
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K>> {
        match self.slots.get(id.0) {
            | Some(Slot::Occupied(node)) => Some(node),
            | _ => None,
        }
    }

    /// Number of occupied slots, sentinels included.
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Total slots ever allocated, occupied or not.
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<K> Index<NodeId> for Arena<K> {
    type Output = Node<K>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match &self.slots[id.0] {
            | Slot::Occupied(node) => node,
            | Slot::Vacant => unreachable!("node {:?} read after it was freed", id),
        }
    }
}

impl<K> IndexMut<NodeId> for Arena<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match &mut self.slots[id.0] {
            | Slot::Occupied(node) => node,
            | Slot::Vacant => unreachable!("node {:?} written after it was freed", id),
        }
    }
}

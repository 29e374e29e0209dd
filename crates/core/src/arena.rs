//! Flat, id-addressed storage for a nested tree.
//!
//! Nodes live in a map keyed by id; parent and children links are ids too, so replacing or
//! looking up a node is a single map operation and no handler ever holds a structural
//! reference into the tree.

use std::collections::{HashMap, HashSet};

use crate::error::ArenaError;
use crate::model::NodeId;
use crate::tree_sync::TreeNode;

#[derive(Debug, Clone)]
pub struct ArenaNode<T> {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
    /// The node itself with its child sequence emptied.
    pub payload: T,
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    roots: Vec<NodeId>,
    nodes: HashMap<NodeId, ArenaNode<T>>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { roots: Vec::new(), nodes: HashMap::new() }
    }
}

impl<T: TreeNode> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a nested forest apart, keeping sibling order.
    pub fn from_nested(roots: Vec<T>) -> Result<Self, ArenaError> {
        let mut arena = Self::new();
        for root in roots {
            arena.insert(None, root)?;
        }
        Ok(arena)
    }

    /// Appends `node` (and everything below it) under `parent`, or as a new root.
    /// The arena is left untouched when any id in the subtree is already present or repeated.
    pub fn insert(&mut self, parent: Option<NodeId>, node: T) -> Result<NodeId, ArenaError> {
        let depth = match parent {
            Some(pid) => self.nodes.get(&pid).ok_or(ArenaError::UnknownParent(pid))?.depth + 1,
            None => 0,
        };
        let mut seen = HashSet::new();
        self.check_ids(&node, &mut seen)?;
        Ok(self.attach(parent, depth, node))
    }

    fn check_ids(&self, node: &T, seen: &mut HashSet<NodeId>) -> Result<(), ArenaError> {
        let id = node.id();
        if self.nodes.contains_key(&id) || !seen.insert(id) {
            return Err(ArenaError::DuplicateId(id));
        }
        node.children().iter().try_for_each(|kid| self.check_ids(kid, seen))
    }

    fn attach(&mut self, parent: Option<NodeId>, depth: usize, mut node: T) -> NodeId {
        let id = node.id();
        let kids = std::mem::take(node.children_mut());
        self.nodes.insert(
            id,
            ArenaNode { id, parent, children: Vec::with_capacity(kids.len()), depth, payload: node },
        );
        match parent {
            Some(pid) => {
                if let Some(p) = self.nodes.get_mut(&pid) {
                    p.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        for kid in kids {
            self.attach(Some(id), depth + 1, kid);
        }
        id
    }

    /// Swaps the payload stored under `id`; links are kept. The replacement's own child
    /// sequence is discarded, structure changes go through `insert`/`remove`.
    pub fn replace(&mut self, id: NodeId, mut payload: T) -> Option<T> {
        let slot = self.nodes.get_mut(&id)?;
        payload.children_mut().clear();
        Some(std::mem::replace(&mut slot.payload, payload))
    }

    /// Removes `id` and its subtree. Returns how many nodes were dropped (0 when absent).
    pub fn remove(&mut self, id: NodeId) -> usize {
        let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else { return 0 };
        match parent {
            Some(pid) => {
                if let Some(p) = self.nodes.get_mut(&pid) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(n) = self.nodes.remove(&cur) {
                removed += 1;
                stack.extend(n.children);
            }
        }
        removed
    }

    pub fn get(&self, id: NodeId) -> Option<&ArenaNode<T>> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id)?.parent
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order walk, roots first, siblings in stored order.
    pub fn depth_first(&self) -> DepthFirst<'_, T> {
        DepthFirst { arena: self, stack: self.roots.iter().rev().copied().collect() }
    }
}

impl<T: TreeNode + Clone> Arena<T> {
    /// Rebuilds the nested forest.
    pub fn to_nested(&self) -> Vec<T> {
        self.roots.iter().filter_map(|id| self.build(*id)).collect()
    }

    fn build(&self, id: NodeId) -> Option<T> {
        let node = self.nodes.get(&id)?;
        let mut out = node.payload.clone();
        *out.children_mut() = node.children.iter().filter_map(|c| self.build(*c)).collect();
        Some(out)
    }
}

pub struct DepthFirst<'a, T> {
    arena: &'a Arena<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> Iterator for DepthFirst<'a, T> {
    type Item = &'a ArenaNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.arena.nodes.get(&id) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some(node);
            }
        }
        None
    }
}

//! Id-based reconciliation of locally cached trees with server-confirmed changes.
//!
//! File-group trees and comment-reply trees share one shape: a node with an id and an
//! ordered sequence of children of the same type. Everything here is written once against
//! [`TreeNode`] and walks depth-first, pre-order, children in stored order.

use tracing::{debug, trace};

use crate::model::{Comment, Entry, FileGroup, Millis, NodeId, Session};

/// An item addressed by a stable id.
pub trait Identified {
    fn id(&self) -> NodeId;
}

/// A node owning an ordered sequence of children of its own type.
pub trait TreeNode: Identified + Sized {
    fn children(&self) -> &[Self];
    fn children_mut(&mut self) -> &mut Vec<Self>;
}

pub trait Dated {
    fn date(&self) -> Millis;
}

impl Identified for Session {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl Identified for Entry {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl Identified for Comment {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl Identified for FileGroup {
    fn id(&self) -> NodeId {
        self.id
    }
}

impl TreeNode for Comment {
    fn children(&self) -> &[Self] {
        &self.replies
    }
    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.replies
    }
}

impl TreeNode for FileGroup {
    fn children(&self) -> &[Self] {
        &self.file_groups
    }
    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.file_groups
    }
}

impl Dated for Comment {
    fn date(&self) -> Millis {
        self.date
    }
}

impl Dated for Session {
    fn date(&self) -> Millis {
        self.date
    }
}

/// Result of removing a node from a tree by id.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<T> {
    /// The node (with its whole subtree) was detached from its parent sequence.
    Removed(T),
    /// The tree had nodes but none carried the id.
    NotFound,
    /// There was nothing to search.
    EmptyInput,
}

impl<T> DeleteOutcome<T> {
    pub fn is_removed(&self) -> bool {
        matches!(self, DeleteOutcome::Removed(_))
    }
}

/// Replaces the first element of `seq` whose id is `id` with `new`, keeping its position.
/// Returns `false` and leaves `seq` untouched when no element matches.
pub fn find_and_replace<T: Identified>(seq: &mut [T], id: NodeId, new: T) -> bool {
    match seq.iter_mut().find(|n| n.id() == id) {
        Some(slot) => {
            *slot = new;
            true
        }
        None => {
            debug!(%id, "replace target not present");
            false
        }
    }
}

/// Removes the first element of a flat sequence whose id is `id`.
pub fn remove_flat<T: Identified>(seq: &mut Vec<T>, id: NodeId) -> Option<T> {
    let pos = seq.iter().position(|n| n.id() == id)?;
    Some(seq.remove(pos))
}

/// Removes the node carrying `id`, wherever it sits in the tree, together with its subtree.
pub fn remove_by_id<T: TreeNode>(level: &mut Vec<T>, id: NodeId) -> DeleteOutcome<T> {
    if level.is_empty() {
        return DeleteOutcome::EmptyInput;
    }
    match remove_rec(level, id) {
        Some(node) => DeleteOutcome::Removed(node),
        None => DeleteOutcome::NotFound,
    }
}

fn remove_rec<T: TreeNode>(level: &mut Vec<T>, id: NodeId) -> Option<T> {
    for i in 0..level.len() {
        trace!(visited = %level[i].id(), "delete search step");
        if level[i].id() == id {
            return Some(level.remove(i));
        }
        if let Some(found) = remove_rec(level[i].children_mut(), id) {
            return Some(found);
        }
    }
    None
}

/// `true` when a node was removed; empty input and a missing id both read as `false`.
pub fn recursive_delete<T: TreeNode>(roots: &mut Vec<T>, id: NodeId) -> bool {
    remove_by_id(roots, id).is_removed()
}

pub fn find_by_id<T: TreeNode>(level: &[T], id: NodeId) -> Option<&T> {
    for node in level {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(node.children(), id) {
            return Some(found);
        }
    }
    None
}

pub fn find_by_id_mut<T: TreeNode>(level: &mut [T], id: NodeId) -> Option<&mut T> {
    for node in level.iter_mut() {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_by_id_mut(node.children_mut(), id) {
            return Some(found);
        }
    }
    None
}

/// Total number of nodes in the forest, at every depth.
pub fn node_count<T: TreeNode>(level: &[T]) -> usize {
    level.iter().map(|n| 1 + node_count(n.children())).sum()
}

/// The node with the greatest date among `root` and all of its descendants.
/// Only a strictly later date displaces the current best, so among equal dates the
/// first one met in pre-order wins.
pub fn latest_by_date<T: TreeNode + Dated>(root: &T) -> &T {
    let mut best = root;
    for child in root.children() {
        best = later_of(best, latest_by_date(child));
    }
    best
}

fn later_of<'a, T: Dated>(current: &'a T, candidate: &'a T) -> &'a T {
    if candidate.date() > current.date() {
        candidate
    } else {
        current
    }
}

/// Latest comment of an entry across all of its comment threads.
pub fn latest_entry_comment(entry: &Entry) -> Option<&Comment> {
    entry
        .comments
        .iter()
        .map(latest_by_date)
        .reduce(|best, c| later_of(best, c))
}

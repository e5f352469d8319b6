use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::{Node, NodeId};

/// Node storage with stable ids.
///
/// Ids are handed out before the node exists ([`Arena::reserve`]) so that a
/// node's d-sets can name their owner while the node is still being built.
#[derive(Clone, Debug, Default)]
pub struct Arena {
    nodes: IndexMap<NodeId, Node>,
    next: u32,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a node inserted later.
    pub fn reserve(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    pub fn insert(&mut self, id: NodeId, node: Node) {
        self.nodes.insert(id, node);
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut Node)> {
        self.nodes.iter_mut().map(|(id, node)| (*id, node))
    }

    /// Deep-copy the subtree at `id` and attach the copy to `parent`.
    ///
    /// Every owned child gets a fresh id; the parent link is set, never
    /// followed. Returns `None` if `id` is not in the arena.
    pub fn copy_subtree(&mut self, id: NodeId, parent: Option<NodeId>) -> Option<NodeId> {
        let mut node = self.nodes.get(&id)?.clone();
        let copy = self.reserve();
        node.parent = parent;

        let mut mapping: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        mapping.insert(id, copy);
        for child in node.kind.children() {
            if mapping.contains_key(&child) {
                continue;
            }
            let child_copy = self.copy_subtree(child, Some(copy))?;
            mapping.insert(child, child_copy);
        }
        node.kind
            .remap_children(&mut |old| mapping.get(&old).copied().unwrap_or(old));

        self.nodes.insert(copy, node);
        Some(copy)
    }
}

//! Arena-backed trees.
//!
//! All nodes of one tree live in a single [`Arena`]; an [`ArenaNode`] is an
//! `Arc` to the arena plus an index, so every handle keeps its whole tree
//! (and thus its parent chain) alive.

use std::fmt;
use std::sync::Arc;

use crate::data_map::DataMap;
use crate::node::Node;

/// Language-specific content of an arena node.
pub trait NodePayload: Send + Sync + 'static {
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

struct NodeRecord<T> {
    payload: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    index_in_parent: usize,
    data: DataMap,
}

/// Owned description of a tree, turned into an [`Arena`] by [`NodeProto::build`].
#[derive(Debug, Clone)]
pub struct NodeProto<T> {
    pub payload: T,
    pub children: Vec<NodeProto<T>>,
}

impl<T> NodeProto<T> {
    pub fn new(payload: T, children: Vec<NodeProto<T>>) -> Self {
        Self { payload, children }
    }

    pub fn leaf(payload: T) -> Self {
        Self::new(payload, Vec::new())
    }
}

impl<T: NodePayload> NodeProto<T> {
    /// Builds the arena and returns a handle to its root.
    pub fn build(self) -> ArenaNode<T> {
        Arc::new(Arena::from_proto(self)).root()
    }
}

pub struct Arena<T> {
    records: Vec<NodeRecord<T>>,
}

impl<T: NodePayload> Arena<T> {
    /// Lays the prototype out in pre-order. Iterative, so arbitrarily deep
    /// trees can be built.
    pub fn from_proto(proto: NodeProto<T>) -> Self {
        let mut records: Vec<NodeRecord<T>> = Vec::new();
        let mut pending = vec![(proto, None::<NodeId>)];

        while let Some((NodeProto { payload, children }, parent)) = pending.pop() {
            let id = NodeId(records.len());
            let index_in_parent = match parent {
                Some(p) => {
                    let siblings = &mut records[p.0].children;
                    siblings.push(id);
                    siblings.len() - 1
                }
                None => 0,
            };
            records.push(NodeRecord {
                payload,
                parent,
                children: Vec::with_capacity(children.len()),
                index_in_parent,
                data: DataMap::new(),
            });
            pending.extend(children.into_iter().rev().map(|c| (c, Some(id))));
        }

        tracing::trace!(nodes = records.len(), "built arena");
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Arena<T> {
    /// Handle to the first node laid out, the root.
    pub fn root(self: &Arc<Self>) -> ArenaNode<T> {
        ArenaNode {
            arena: Arc::clone(self),
            id: NodeId(0),
        }
    }

    fn record(&self, id: NodeId) -> &NodeRecord<T> {
        &self.records[id.0]
    }
}

/// Handle to a node of an [`Arena`].
pub struct ArenaNode<T> {
    arena: Arc<Arena<T>>,
    id: NodeId,
}

impl<T> Clone for ArenaNode<T> {
    fn clone(&self) -> Self {
        Self {
            arena: Arc::clone(&self.arena),
            id: self.id,
        }
    }
}

impl<T> ArenaNode<T> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn payload(&self) -> &T {
        &self.arena.record(self.id).payload
    }

    fn at(&self, id: NodeId) -> Self {
        Self {
            arena: Arc::clone(&self.arena),
            id,
        }
    }
}

impl<T: NodePayload> Node for ArenaNode<T> {
    fn parent(&self) -> Option<Self> {
        self.arena.record(self.id).parent.map(|p| self.at(p))
    }

    fn num_children(&self) -> usize {
        self.arena.record(self.id).children.len()
    }

    fn child(&self, index: usize) -> Self {
        self.at(self.arena.record(self.id).children[index])
    }

    fn index_in_parent(&self) -> usize {
        self.arena.record(self.id).index_in_parent
    }

    fn data(&self) -> &DataMap {
        &self.arena.record(self.id).data
    }

    fn kind(&self) -> &'static str {
        self.payload().kind()
    }

    fn is_same_node(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.arena, &other.arena) && self.id == other.id
    }
}

impl<T: NodePayload> fmt::Debug for ArenaNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind(), self.id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{leaf, node};

    #[test]
    fn ids_are_pre_order() {
        let root = node("r", vec![node("a", vec![leaf("b")]), leaf("c")]).build();
        assert_eq!(root.id().index(), 0);
        assert_eq!(root.child(0).id().index(), 1);
        assert_eq!(root.child(0).child(0).id().index(), 2);
        assert_eq!(root.child(1).id().index(), 3);
    }

    #[test]
    fn parent_links_and_indices() {
        let root = node("r", vec![leaf("a"), leaf("b"), leaf("c")]).build();
        for i in 0..3 {
            let child = root.child(i);
            assert_eq!(child.index_in_parent(), i);
            assert!(child.parent().unwrap().is_same_node(&root));
        }
        assert!(root.parent().is_none());
        assert_eq!(root.index_in_parent(), 0);
    }

    #[test]
    fn identity_is_per_tree() {
        let one = leaf("x").build();
        let two = leaf("x").build();
        assert!(one.is_same_node(&one.clone()));
        assert!(!one.is_same_node(&two));
    }

    #[test]
    fn child_handle_keeps_tree_alive() {
        let grandchild = {
            let root = node("r", vec![node("a", vec![leaf("b")])]).build();
            root.child(0).child(0)
        };
        assert_eq!(grandchild.root().kind(), "r");
    }

    #[test]
    fn data_map_is_per_node() {
        let key = crate::DataKey::<u8>::new("k");
        let root = node("r", vec![leaf("a")]).build();
        root.data().put(&key, 1);
        assert_eq!(root.child(0).data().get(&key), None);
        assert_eq!(root.clone().data().get(&key), Some(1));
    }
}

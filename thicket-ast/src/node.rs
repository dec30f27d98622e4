//! The node capability.
//!
//! Traversal and metric code only ever depends on this trait. Concrete
//! languages implement it for their own node handles, usually by wrapping an
//! [`ArenaNode`](crate::arena::ArenaNode).

use crate::data_map::DataMap;
use crate::filtermap::Filtermap;
use crate::stream::{self, NodeStream};

/// A handle to a tree element.
///
/// Handles are cheap to clone and compare by identity through
/// [`Node::is_same_node`]. The child list of a node is fixed once the tree is
/// built; only the [`DataMap`] may be written afterwards.
pub trait Node: Clone + Send + Sync + 'static {
    /// The parent of this node, `None` for the root.
    fn parent(&self) -> Option<Self>;

    fn num_children(&self) -> usize;

    /// Returns the child at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.num_children()`.
    fn child(&self, index: usize) -> Self;

    /// Zero-based position of this node among its siblings. 0 for the root.
    fn index_in_parent(&self) -> usize;

    /// Per-node side table, used for memoization.
    fn data(&self) -> &DataMap;

    /// Type tag of this node, e.g. `"MethodDeclaration"`.
    fn kind(&self) -> &'static str;

    /// Identity comparison. Two handles to the same tree element are the same node.
    fn is_same_node(&self, other: &Self) -> bool;

    fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    fn first_child(&self) -> Option<Self> {
        if self.num_children() == 0 {
            None
        } else {
            Some(self.child(0))
        }
    }

    fn last_child(&self) -> Option<Self> {
        match self.num_children() {
            0 => None,
            n => Some(self.child(n - 1)),
        }
    }

    /// The topmost ancestor of this node, or the node itself if it is a root.
    fn root(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    fn children(&self) -> NodeStream<Self> {
        stream::children(self)
    }

    fn descendants(&self) -> NodeStream<Self> {
        stream::descendants(self)
    }

    fn descendants_or_self(&self) -> NodeStream<Self> {
        stream::descendants_or_self(self)
    }

    fn ancestors(&self) -> NodeStream<Self> {
        stream::ancestors(self)
    }

    fn ancestors_or_self(&self) -> NodeStream<Self> {
        stream::ancestors_or_self(Some(self))
    }

    fn following_siblings(&self) -> NodeStream<Self> {
        stream::following_siblings(self)
    }

    fn preceding_siblings(&self) -> NodeStream<Self> {
        stream::preceding_siblings(self)
    }

    /// First child of the given kind.
    fn first_child_of_kind(&self, kind: &str) -> Option<Self> {
        self.children().find(|c| c.kind() == kind)
    }

    /// First descendant (document order) accepted by the filter.
    fn first_descendant<R, F>(&self, filter: F) -> Option<R>
    where
        F: Filtermap<Self, R>,
    {
        stream::descendants_filtered(self, filter).next()
    }

    /// Nearest ancestor accepted by the filter.
    fn first_ancestor<R, F>(&self, filter: F) -> Option<R>
    where
        F: Filtermap<Self, R>,
    {
        stream::ancestors_filtered(self, filter).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{leaf, node};
    use crate::filtermap::of_kind;

    #[test]
    fn root_of_nested_node() {
        let root = node("root", vec![node("a", vec![leaf("b")])]).build();
        let b = root.child(0).child(0);
        assert!(b.root().is_same_node(&root));
        assert!(root.root().is_same_node(&root));
        assert!(root.is_root());
        assert!(!b.is_root());
    }

    #[test]
    fn first_and_last_child() {
        let root = node("root", vec![leaf("a"), leaf("b"), leaf("c")]).build();
        assert_eq!(root.first_child().map(|n| n.kind()), Some("a"));
        assert_eq!(root.last_child().map(|n| n.kind()), Some("c"));
        assert!(root.child(1).first_child().is_none());
        assert!(root.child(1).last_child().is_none());
    }

    #[test]
    fn first_descendant_and_ancestor() {
        let root = node("root", vec![node("x", vec![node("y", vec![leaf("x")])])]).build();
        let deepest = root.child(0).child(0).child(0);

        let first_x = root.first_descendant(of_kind("x")).unwrap();
        assert!(first_x.is_same_node(&root.child(0)));

        let nearest_x = deepest.first_ancestor(of_kind("x")).unwrap();
        assert!(nearest_x.is_same_node(&root.child(0)));
        assert!(deepest.first_ancestor(of_kind("missing")).is_none());
        assert_eq!(root.first_child_of_kind("x").map(|n| n.index_in_parent()), Some(0));
    }
}

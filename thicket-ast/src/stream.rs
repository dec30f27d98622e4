//! Axis streams.
//!
//! Every function here returns a lazy, single-pass iterator over a fixed tree.
//! Streams yield nodes in document order (pre-order), except the ancestor
//! axes which go from the nearest ancestor outwards. Collect a stream to
//! traverse it more than once.
//!
//! Leaves and roots are handled by explicit branches that return the
//! [`NodeStream::Empty`] or [`NodeStream::Single`] variants without setting up
//! any traversal state. Leaves vastly outnumber inner nodes in real trees.

use std::iter::Flatten;
use std::marker::PhantomData;

use crate::filtermap::Filtermap;
use crate::node::Node;

/// A stream of nodes along one axis.
pub enum NodeStream<N> {
    Empty,
    Single(Option<N>),
    /// Children `next..end` of `parent`.
    Children {
        parent: N,
        next: usize,
        end: usize,
    },
    /// Explicit-stack pre-order walk. The top of the stack is the next node.
    Descendants(Vec<N>),
    /// Walks up through parents, starting at the held node.
    Ancestors(Option<N>),
}

impl<N> NodeStream<N> {
    pub fn is_empty_stream(&self) -> bool {
        matches!(self, NodeStream::Empty)
    }
}

impl<N: Node> Iterator for NodeStream<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        match self {
            NodeStream::Empty => None,
            NodeStream::Single(node) => node.take(),
            NodeStream::Children { parent, next, end } => {
                if *next < *end {
                    let child = parent.child(*next);
                    *next += 1;
                    Some(child)
                } else {
                    None
                }
            }
            NodeStream::Descendants(stack) => {
                let node = stack.pop()?;
                push_children_reversed(stack, &node);
                Some(node)
            }
            NodeStream::Ancestors(current) => {
                let node = current.take()?;
                *current = node.parent();
                Some(node)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            NodeStream::Empty => (0, Some(0)),
            NodeStream::Single(node) => {
                let n = usize::from(node.is_some());
                (n, Some(n))
            }
            NodeStream::Children { next, end, .. } => {
                let n = end.saturating_sub(*next);
                (n, Some(n))
            }
            NodeStream::Descendants(stack) => (stack.len(), None),
            NodeStream::Ancestors(current) => (usize::from(current.is_some()), None),
        }
    }
}

impl<N: Node> std::iter::FusedIterator for NodeStream<N> {}

fn push_children_reversed<N: Node>(stack: &mut Vec<N>, node: &N) {
    for i in (0..node.num_children()).rev() {
        stack.push(node.child(i));
    }
}

/// A node stream passed through a [`Filtermap`].
pub struct Filtered<N, F, R> {
    stream: NodeStream<N>,
    filter: F,
    _out: PhantomData<fn() -> R>,
}

impl<N, F, R> Iterator for Filtered<N, F, R>
where
    N: Node,
    F: Filtermap<N, R>,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        for node in self.stream.by_ref() {
            if let Some(out) = self.filter.apply(node) {
                return Some(out);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.stream.size_hint().1)
    }
}

fn filtered<N, R, F>(stream: NodeStream<N>, filter: F) -> Filtered<N, F, R>
where
    N: Node,
    F: Filtermap<N, R>,
{
    Filtered {
        stream,
        filter,
        _out: PhantomData,
    }
}

pub fn empty<N>() -> NodeStream<N> {
    NodeStream::Empty
}

pub fn singleton<N>(node: N) -> NodeStream<N> {
    NodeStream::Single(Some(node))
}

pub fn children<N: Node>(node: &N) -> NodeStream<N> {
    match node.num_children() {
        0 => NodeStream::Empty,
        n => NodeStream::Children {
            parent: node.clone(),
            next: 0,
            end: n,
        },
    }
}

pub fn children_filtered<N, R, F>(node: &N, filter: F) -> Filtered<N, F, R>
where
    N: Node,
    F: Filtermap<N, R>,
{
    filtered(children(node), filter)
}

/// Children `from..from + length` of `parent`.
///
/// # Panics
///
/// Panics if the range does not lie within the children of `parent`. A bad
/// range means the caller computed sibling indices from a malformed tree.
pub fn slice_children<N: Node>(parent: &N, from: usize, length: usize) -> NodeStream<N> {
    let count = parent.num_children();
    assert!(from <= count, "from ({from}) should be a valid index, have {count} children");
    let end = from.checked_add(length).filter(|end| *end <= count);
    let end = match end {
        Some(end) => end,
        None => panic!("from ({from}) + length ({length}) should be a valid index, have {count} children"),
    };

    match length {
        0 => NodeStream::Empty,
        1 => NodeStream::Single(Some(parent.child(from))),
        _ => NodeStream::Children {
            parent: parent.clone(),
            next: from,
            end,
        },
    }
}

pub fn slice_children_filtered<N, R, F>(
    parent: &N,
    filter: F,
    from: usize,
    length: usize,
) -> Filtered<N, F, R>
where
    N: Node,
    F: Filtermap<N, R>,
{
    filtered(slice_children(parent, from, length), filter)
}

/// All proper descendants of `node`, in document order.
pub fn descendants<N: Node>(node: &N) -> NodeStream<N> {
    if node.num_children() == 0 {
        return NodeStream::Empty;
    }
    let mut stack = Vec::new();
    push_children_reversed(&mut stack, node);
    NodeStream::Descendants(stack)
}

pub fn descendants_filtered<N, R, F>(node: &N, filter: F) -> Filtered<N, F, R>
where
    N: Node,
    F: Filtermap<N, R>,
{
    filtered(descendants(node), filter)
}

/// `node` followed by its descendants.
pub fn descendants_or_self<N: Node>(node: &N) -> NodeStream<N> {
    if node.num_children() == 0 {
        return NodeStream::Single(Some(node.clone()));
    }
    NodeStream::Descendants(vec![node.clone()])
}

pub fn descendants_or_self_filtered<N, R, F>(node: &N, filter: F) -> Filtered<N, F, R>
where
    N: Node,
    F: Filtermap<N, R>,
{
    filtered(descendants_or_self(node), filter)
}

/// `node` and then its ancestors, nearest first. Empty for `None`.
pub fn ancestors_or_self<N: Node>(node: Option<&N>) -> NodeStream<N> {
    match node {
        None => NodeStream::Empty,
        Some(root) if root.is_root() => NodeStream::Single(Some(root.clone())),
        Some(node) => NodeStream::Ancestors(Some(node.clone())),
    }
}

pub fn ancestors_or_self_filtered<N, R, F>(node: Option<&N>, filter: F) -> Filtered<N, F, R>
where
    N: Node,
    F: Filtermap<N, R>,
{
    filtered(ancestors_or_self(node), filter)
}

/// The ancestors of `node`, nearest first.
pub fn ancestors<N: Node>(node: &N) -> NodeStream<N> {
    ancestors_or_self(node.parent().as_ref())
}

pub fn ancestors_filtered<N, R, F>(node: &N, filter: F) -> Filtered<N, F, R>
where
    N: Node,
    F: Filtermap<N, R>,
{
    filtered(ancestors(node), filter)
}

/// Siblings after `node`, in document order.
pub fn following_siblings<N: Node>(node: &N) -> NodeStream<N> {
    match node.parent() {
        Some(parent) if parent.num_children() > 1 => {
            let from = node.index_in_parent() + 1;
            slice_children(&parent, from, parent.num_children() - from)
        }
        _ => NodeStream::Empty,
    }
}

/// Siblings before `node`, in document order.
pub fn preceding_siblings<N: Node>(node: &N) -> NodeStream<N> {
    match node.parent() {
        Some(parent) if parent.num_children() > 1 => {
            slice_children(&parent, 0, node.index_in_parent())
        }
        _ => NodeStream::Empty,
    }
}

/// Concatenates streams in argument order. Nodes reachable from several
/// streams are yielded once per stream.
pub fn union<I>(streams: I) -> Flatten<I::IntoIter>
where
    I: IntoIterator,
    I::Item: IntoIterator,
{
    streams.into_iter().flatten()
}

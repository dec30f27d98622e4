use std::iter::FlatMap;

use crate::filtermap::{Filtermap, KindFilter};
use crate::node::Node;
use crate::stream::{self, NodeStream};

type Step<N> = fn(N) -> NodeStream<N>;

fn children_of<N: Node>(node: N) -> NodeStream<N> {
    stream::children(&node)
}

fn descendants_of<N: Node>(node: N) -> NodeStream<N> {
    stream::descendants(&node)
}

fn descendants_or_self_of<N: Node>(node: N) -> NodeStream<N> {
    stream::descendants_or_self(&node)
}

fn parent_of<N: Node>(node: N) -> NodeStream<N> {
    match node.parent() {
        Some(parent) => stream::singleton(parent),
        None => stream::empty(),
    }
}

fn ancestors_of<N: Node>(node: N) -> NodeStream<N> {
    stream::ancestors(&node)
}

/// Lazily applies a [`Filtermap`] to every element of a node iterator.
pub struct FilterMapNodes<I, F, R> {
    inner: I,
    filter: F,
    _out: std::marker::PhantomData<fn() -> R>,
}

impl<I, F, R> Iterator for FilterMapNodes<I, F, R>
where
    I: Iterator,
    F: Filtermap<I::Item, R>,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        for node in self.inner.by_ref() {
            if let Some(out) = self.filter.apply(node) {
                return Some(out);
            }
        }
        None
    }
}

/// Chaining glue for any iterator of nodes.
///
/// Each axis step is applied to every element and the results concatenated
/// in input order, so `root.children().children()` yields grandchildren left
/// to right. Steps do not deduplicate.
pub trait NodeStreamExt<N: Node>: Iterator<Item = N> + Sized {
    fn filter_map_nodes<R, F: Filtermap<N, R>>(self, filter: F) -> FilterMapNodes<Self, F, R> {
        FilterMapNodes {
            inner: self,
            filter,
            _out: std::marker::PhantomData,
        }
    }

    /// Keeps nodes of the given kind.
    fn filter_kind(self, kind: &'static str) -> FilterMapNodes<Self, KindFilter, N> {
        self.filter_map_nodes(crate::filtermap::of_kind(kind))
    }

    fn children(self) -> FlatMap<Self, NodeStream<N>, Step<N>> {
        self.flat_map(children_of as Step<N>)
    }

    fn descendants(self) -> FlatMap<Self, NodeStream<N>, Step<N>> {
        self.flat_map(descendants_of as Step<N>)
    }

    fn descendants_or_self(self) -> FlatMap<Self, NodeStream<N>, Step<N>> {
        self.flat_map(descendants_or_self_of as Step<N>)
    }

    fn parents(self) -> FlatMap<Self, NodeStream<N>, Step<N>> {
        self.flat_map(parent_of as Step<N>)
    }

    fn ancestors(self) -> FlatMap<Self, NodeStream<N>, Step<N>> {
        self.flat_map(ancestors_of as Step<N>)
    }

    fn first_of_kind(mut self, kind: &str) -> Option<N> {
        self.find(|n| n.kind() == kind)
    }

    fn to_list(self) -> Vec<N> {
        self.collect()
    }

    fn nonempty(mut self) -> bool {
        self.next().is_some()
    }

    fn count_nodes(self) -> usize {
        self.count()
    }
}

impl<N: Node, I: Iterator<Item = N>> NodeStreamExt<N> for I {}

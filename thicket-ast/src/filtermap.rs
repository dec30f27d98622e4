//! Composable filter-maps over nodes.
//!
//! A [`Filtermap`] maps an input to an optional output: `None` drops the
//! element, `Some` keeps (and possibly converts) it. Filtered axis streams
//! apply one lazily to every node they visit, so chaining filters never
//! materializes intermediate lists.

use std::marker::PhantomData;

use crate::node::Node;

pub trait Filtermap<I, O> {
    fn apply(&self, input: I) -> Option<O>;

    /// Applies `self`, then `next` on whatever `self` kept.
    fn then<P, G>(self, next: G) -> Then<Self, G, O>
    where
        Self: Sized,
        G: Filtermap<O, P>,
    {
        Then {
            first: self,
            second: next,
            _mid: PhantomData,
        }
    }
}

impl<I, O, F> Filtermap<I, O> for F
where
    F: Fn(I) -> Option<O>,
{
    fn apply(&self, input: I) -> Option<O> {
        self(input)
    }
}

/// Composition of two filter-maps, see [`Filtermap::then`].
pub struct Then<A, B, M> {
    first: A,
    second: B,
    _mid: PhantomData<fn() -> M>,
}

impl<I, M, O, A, B> Filtermap<I, O> for Then<A, B, M>
where
    A: Filtermap<I, M>,
    B: Filtermap<M, O>,
{
    fn apply(&self, input: I) -> Option<O> {
        self.first
            .apply(input)
            .and_then(|mid| self.second.apply(mid))
    }
}

/// Keeps every node.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<N: Node> Filtermap<N, N> for Identity {
    fn apply(&self, input: N) -> Option<N> {
        Some(input)
    }
}

/// Keeps nodes whose [`Node::kind`] equals the given tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindFilter {
    kind: &'static str,
}

impl KindFilter {
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<N: Node> Filtermap<N, N> for KindFilter {
    fn apply(&self, input: N) -> Option<N> {
        (input.kind() == self.kind).then_some(input)
    }
}

pub fn of_kind(kind: &'static str) -> KindFilter {
    KindFilter { kind }
}

//! XPath-style axis names.

use std::fmt;
use std::str::FromStr;

use crate::node::Node;
use crate::stream::{self, NodeStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    SelfAxis,
    Parent,
}

impl Axis {
    pub const ALL: [Axis; 9] = [
        Axis::Child,
        Axis::Descendant,
        Axis::DescendantOrSelf,
        Axis::Ancestor,
        Axis::AncestorOrSelf,
        Axis::FollowingSibling,
        Axis::PrecedingSibling,
        Axis::SelfAxis,
        Axis::Parent,
    ];

    /// The nodes reachable from `node` along this axis.
    pub fn stream<N: Node>(self, node: &N) -> NodeStream<N> {
        match self {
            Axis::Child => stream::children(node),
            Axis::Descendant => stream::descendants(node),
            Axis::DescendantOrSelf => stream::descendants_or_self(node),
            Axis::Ancestor => stream::ancestors(node),
            Axis::AncestorOrSelf => stream::ancestors_or_self(Some(node)),
            Axis::FollowingSibling => stream::following_siblings(node),
            Axis::PrecedingSibling => stream::preceding_siblings(node),
            Axis::SelfAxis => stream::singleton(node.clone()),
            Axis::Parent => match node.parent() {
                Some(parent) => stream::singleton(parent),
                None => stream::empty(),
            },
        }
    }

    /// Whether the axis points towards the start of the document.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Ancestor | Axis::AncestorOrSelf | Axis::PrecedingSibling | Axis::Parent
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::FollowingSibling => "following-sibling",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::SelfAxis => "self",
            Axis::Parent => "parent",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAxis(pub String);

impl fmt::Display for UnknownAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown axis: {:?}", self.0)
    }
}

impl std::error::Error for UnknownAxis {}

impl FromStr for Axis {
    type Err = UnknownAxis;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::ALL
            .into_iter()
            .find(|axis| axis.name() == s)
            .ok_or_else(|| UnknownAxis(s.to_string()))
    }
}

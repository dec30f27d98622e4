#![forbid(unsafe_code)]

//! # Thicket AST Library
//!
//! Language-neutral tree plumbing shared by every thicket language module.
//!
//! ## Overview
//!
//! - [`node`]: the [`Node`] capability every language AST implements
//!   (parent, indexed children, kind tag, per-node [`DataMap`]).
//! - [`data_map`]: typed side table used to memoize values on nodes.
//! - [`stream`]: lazy axis streams (children, descendants, ancestors,
//!   siblings, unions) in document order.
//! - [`filtermap`]: composable node filters used by the filtered axes.
//! - [`axis`]: XPath-style [`Axis`] names dispatching to the streams.
//! - [`arena`]: an `Arc`-shared arena tree, the ready-made [`Node`]
//!   implementation used by the bundled languages.
//! - [`dummy`]: kind-only nodes for tests and examples.
//!
//! ## Quick Start
//!
//! ```
//! use thicket_ast::dummy::{leaf, node};
//! use thicket_ast::{Node, NodeStreamExt};
//!
//! let root = node("root", vec![node("child", vec![leaf("a"), leaf("b")]), leaf("child2")]).build();
//! let kinds: Vec<_> = root.descendants().map(|n| n.kind()).collect();
//! assert_eq!(kinds, vec!["child", "a", "b", "child2"]);
//! assert_eq!(root.descendants().filter_kind("a").count(), 1);
//! ```

pub mod arena;
pub mod axis;
pub mod data_map;
pub mod dummy;
pub mod filtermap;
pub mod node;
pub mod stream;
mod stream_ext;

pub use arena::{Arena, ArenaNode, NodeId, NodePayload, NodeProto};
pub use axis::{Axis, UnknownAxis};
pub use data_map::{DataKey, DataMap};
pub use filtermap::{of_kind, Filtermap, Identity, KindFilter};
pub use node::Node;
pub use stream::NodeStream;
pub use stream_ext::NodeStreamExt;

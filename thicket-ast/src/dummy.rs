//! Kind-only nodes, for tests and documentation.

use crate::arena::{ArenaNode, NodePayload, NodeProto};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyPayload {
    kind: &'static str,
}

impl NodePayload for DummyPayload {
    fn kind(&self) -> &'static str {
        self.kind
    }
}

pub type DummyNode = ArenaNode<DummyPayload>;

pub fn node(kind: &'static str, children: Vec<NodeProto<DummyPayload>>) -> NodeProto<DummyPayload> {
    NodeProto::new(DummyPayload { kind }, children)
}

pub fn leaf(kind: &'static str) -> NodeProto<DummyPayload> {
    NodeProto::leaf(DummyPayload { kind })
}

//! Per-frame change sets and structural events.

use crate::dirty::DirtyFlags;
use crate::element::ElementId;

use super::NodeId;

/// One node whose rendered state is stale.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeChange {
    pub node: NodeId,
    pub id: ElementId,
    pub flags: DirtyFlags,
}

/// A node that left the tree since the previous frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DetachedNode {
    pub node: NodeId,
    pub id: ElementId,
}

/// Everything a renderer needs to bring its output up to date.
///
/// `changed` is in pre-order: a group always precedes its descendants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameChanges {
    pub changed: Vec<NodeChange>,
    pub detached: Vec<DetachedNode>,
}

impl FrameChanges {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.detached.is_empty()
    }

    /// The flags collected for `node`, if it changed.
    pub fn flags_of(&self, node: NodeId) -> Option<DirtyFlags> {
        self.changed
            .iter()
            .find(|c| c.node == node)
            .map(|c| c.flags)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.flags_of(node).is_some()
    }
}

/// Insertions into and removals from a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureEvent {
    Attached { parent: NodeId, child: NodeId },
    Detached { parent: NodeId, child: NodeId },
}

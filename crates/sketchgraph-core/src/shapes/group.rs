//! Group node: a container whose transform applies to every descendant.

use crate::children::Children;

/// Read access to a node's children.
pub trait HasChildren {
    fn children(&self) -> &Children;
}

/// A container of child nodes.
///
/// Children are mutated only through the [`Scene`](crate::Scene), which
/// keeps parent links and dirty propagation in step with the list.
#[derive(Debug, Clone, Default)]
pub struct Group {
    children: Children,
}

impl Group {
    /// An empty group.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }
}

impl HasChildren for Group {
    fn children(&self) -> &Children {
        &self.children
    }
}

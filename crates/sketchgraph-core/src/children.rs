//! Ordered, id-indexed child list of a group.

use std::collections::HashMap;

use crate::element::ElementId;
use crate::scene::NodeId;

/// Children of a group in paint order (first is drawn first).
///
/// Positional access goes through the ordered list, id access through a
/// hash index; both always hold the same set of nodes. Inserting an id that
/// is already present replaces the old entry in place and hands back the
/// evicted node.
#[derive(Debug, Clone, Default)]
pub struct Children {
    entries: Vec<(ElementId, NodeId)>,
    by_id: HashMap<ElementId, NodeId>,
}

impl Children {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.entries.get(index).map(|(_, node)| *node)
    }

    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(|(_, n)| *n == node)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(_, node)| *node)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ElementId> + '_ {
        self.entries.iter().map(|(id, _)| id)
    }

    /// Append `node`. Returns the node evicted by an id collision.
    pub fn push(&mut self, id: ElementId, node: NodeId) -> Option<NodeId> {
        self.insert(self.entries.len(), id, node)
    }

    /// Insert `node` at `index` (clamped to the length). An id collision
    /// replaces the old entry where it stands and ignores `index`.
    pub fn insert(&mut self, index: usize, id: ElementId, node: NodeId) -> Option<NodeId> {
        if let Some(old) = self.by_id.insert(id.clone(), node) {
            if let Some(slot) = self.entries.iter_mut().find(|(_, n)| *n == old) {
                slot.1 = node;
            }
            return Some(old);
        }
        let index = index.min(self.entries.len());
        self.entries.insert(index, (id, node));
        None
    }

    pub fn remove_by_id(&mut self, id: &str) -> Option<NodeId> {
        let node = self.by_id.remove(id)?;
        self.entries.retain(|(_, n)| *n != node);
        Some(node)
    }

    pub fn remove(&mut self, node: NodeId) -> bool {
        match self.position(node) {
            Some(index) => self.remove_at(index).is_some(),
            None => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<NodeId> {
        if index >= self.entries.len() {
            return None;
        }
        let (id, node) = self.entries.remove(index);
        self.by_id.remove(&id);
        Some(node)
    }

    /// Move `node` to the end of the paint order. Returns whether it moved.
    pub fn bring_to_front(&mut self, node: NodeId) -> bool {
        match self.position(node) {
            Some(index) if index + 1 < self.entries.len() => {
                let entry = self.entries.remove(index);
                self.entries.push(entry);
                true
            }
            _ => false,
        }
    }

    /// Move `node` to the start of the paint order.
    pub fn send_to_back(&mut self, node: NodeId) -> bool {
        match self.position(node) {
            Some(index) if index > 0 => {
                let entry = self.entries.remove(index);
                self.entries.insert(0, entry);
                true
            }
            _ => false,
        }
    }

    /// Swap `node` with the entry painted after it.
    pub fn bring_forward(&mut self, node: NodeId) -> bool {
        match self.position(node) {
            Some(index) if index + 1 < self.entries.len() => {
                self.entries.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Swap `node` with the entry painted before it.
    pub fn send_backward(&mut self, node: NodeId) -> bool {
        match self.position(node) {
            Some(index) if index > 0 => {
                self.entries.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Whether the ordered list and the id index agree.
    pub fn is_consistent(&self) -> bool {
        self.entries.len() == self.by_id.len()
            && self
                .entries
                .iter()
                .all(|(id, node)| self.by_id.get(id) == Some(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(i: u32) -> NodeId {
        NodeId::new(i, 0)
    }

    fn filled(n: u32) -> Children {
        let mut children = Children::new();
        for i in 0..n {
            children.push(ElementId::new(format!("c{i}")), node(i));
        }
        children
    }

    fn order(children: &Children) -> Vec<NodeId> {
        children.iter().collect()
    }

    #[test]
    fn test_push_and_lookup() {
        let children = filled(3);
        assert_eq!(children.len(), 3);
        assert_eq!(children.get(1), Some(node(1)));
        assert_eq!(children.get_by_id("c2"), Some(node(2)));
        assert_eq!(children.position(node(2)), Some(2));
        assert!(children.is_consistent());
    }

    #[test]
    fn test_id_collision_replaces_in_place() {
        let mut children = filled(3);
        let evicted = children.push(ElementId::new("c1"), node(9));
        assert_eq!(evicted, Some(node(1)));
        assert_eq!(order(&children), vec![node(0), node(9), node(2)]);
        assert_eq!(children.get_by_id("c1"), Some(node(9)));
        assert!(children.is_consistent());
    }

    #[test]
    fn test_remove_keeps_indices_consistent() {
        let mut children = filled(4);
        assert_eq!(children.remove_by_id("c1"), Some(node(1)));
        assert!(children.remove(node(3)));
        assert_eq!(children.remove_at(0), Some(node(0)));
        assert_eq!(children.remove_by_id("c1"), None);
        assert_eq!(order(&children), vec![node(2)]);
        assert!(children.is_consistent());
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut children = filled(2);
        children.insert(99, ElementId::new("x"), node(7));
        children.insert(0, ElementId::new("y"), node(8));
        assert_eq!(order(&children), vec![node(8), node(0), node(1), node(7)]);
    }

    #[test]
    fn test_reordering() {
        let mut children = filled(3);
        assert!(children.bring_to_front(node(0)));
        assert_eq!(order(&children), vec![node(1), node(2), node(0)]);
        assert!(!children.bring_to_front(node(0)));

        assert!(children.send_to_back(node(0)));
        assert_eq!(order(&children), vec![node(0), node(1), node(2)]);

        assert!(children.bring_forward(node(1)));
        assert_eq!(order(&children), vec![node(0), node(2), node(1)]);
        assert!(children.send_backward(node(1)));
        assert!(!children.send_backward(node(0)));
        assert_eq!(order(&children), vec![node(0), node(1), node(2)]);
        assert!(children.is_consistent());
    }
}

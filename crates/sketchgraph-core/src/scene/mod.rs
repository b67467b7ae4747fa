//! The scene: an arena of nodes arranged in a tree under one root group.
//!
//! Nodes live in generational slots and are addressed by [`NodeId`]. Groups
//! own their children through a [`Children`] list of handles; every child
//! holds a non-owning handle back to its parent and a subscription that
//! forwards its dirty flags upward as `SUBTREE`.

mod frame;
mod id;
mod node;

pub use frame::{DetachedNode, FrameChanges, NodeChange, StructureEvent};
pub use id::NodeId;
pub use node::Node;

use crate::children::Children;
use crate::context::{SceneConfig, SceneContext};
use crate::dirty::DirtyFlags;
use crate::element::{ElementId, HasDirtyFlags, HasTransform};
use crate::error::{SceneError, SceneResult};
use crate::observable::{EventStream, Subscription};
use crate::shapes::{Group, HasChildren, Shape, ShapeKind};
use crate::transform::Placement;

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A tree of nodes plus the context that issues their ids.
#[derive(Debug)]
pub struct Scene {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    root: NodeId,
    context: SceneContext,
    structure: EventStream<StructureEvent>,
    pending_detached: Vec<DetachedNode>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        let mut context = SceneContext::new(config);
        let root_id = context.next_id("root");
        let root = Node::new(root_id, Shape::Group(Group::new()), context.config());
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
            context,
            structure: EventStream::new(),
            pending_detached: Vec::new(),
        }
    }

    /// The root group. It always exists and cannot be detached.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    /// Mutable context, for building gradients and stops.
    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    pub fn config(&self) -> &SceneConfig {
        self.context.config()
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- Allocation --

    /// Create a detached node with a generated id.
    pub fn create(&mut self, shape: impl Into<Shape>) -> NodeId {
        let shape = shape.into();
        let id = self.context.next_id(shape.kind());
        self.allocate(id, shape)
    }

    /// Create a detached node with a caller-chosen id.
    pub fn create_with_id(&mut self, id: impl Into<ElementId>, shape: impl Into<Shape>) -> NodeId {
        self.allocate(id.into(), shape.into())
    }

    /// Create a node and append it to `parent`.
    pub fn insert(&mut self, parent: NodeId, shape: impl Into<Shape>) -> SceneResult<NodeId> {
        self.group(parent)?;
        let node = self.create(shape);
        if let Err(err) = self.add(parent, node) {
            self.free(node);
            return Err(err);
        }
        Ok(node)
    }

    fn allocate(&mut self, id: ElementId, shape: Shape) -> NodeId {
        let node = Node::new(id, shape, self.context.config());
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.node = Some(node);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId::new(idx, 0)
        }
    }

    fn free(&mut self, node: NodeId) {
        if let Some(slot) = self.slots.get_mut(node.idx as usize) {
            if slot.generation == node.generation {
                if let Some(mut released) = slot.node.take() {
                    released.release();
                }
                self.free_list.push(node.idx);
            }
        }
    }

    // -- Access --

    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_ok()
    }

    pub fn get(&self, node: NodeId) -> SceneResult<&Node> {
        self.slots
            .get(node.idx as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(SceneError::StaleNode)
    }

    pub fn node_mut(&mut self, node: NodeId) -> SceneResult<&mut Node> {
        self.slots
            .get_mut(node.idx as usize)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(SceneError::StaleNode)
    }

    /// Borrow a node's kind-specific data.
    pub fn shape<S: ShapeKind>(&self, node: NodeId) -> SceneResult<&S> {
        self.get(node)?.get::<S>()
    }

    /// Edit a node's kind-specific data; see [`Node::edit`].
    pub fn edit<S: ShapeKind>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut S) -> SceneResult<bool>,
    ) -> SceneResult<bool> {
        self.node_mut(node)?.edit(f)
    }

    pub fn parent(&self, node: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.get(node)?.parent())
    }

    fn group(&self, node: NodeId) -> SceneResult<&Group> {
        let n = self.get(node)?;
        n.shape()
            .as_group()
            .ok_or_else(|| SceneError::NotAGroup(n.id().clone()))
    }

    fn group_mut(&mut self, node: NodeId) -> SceneResult<&mut Group> {
        let n = self.node_mut(node)?;
        let err = SceneError::NotAGroup(n.id().clone());
        n.shape_mut().as_group_mut().ok_or(err)
    }

    pub fn children(&self, node: NodeId) -> SceneResult<&Children> {
        Ok(self.group(node)?.children())
    }

    /// Depth-first search for `id` below the root, parents before children.
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.get(*n).is_ok_and(|node| node.id().as_str() == id))
    }

    /// `node` and everything below it, in pre-order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Ok(n) = self.get(current) else { continue };
            out.push(current);
            if let Some(group) = n.shape().as_group() {
                let children: Vec<NodeId> = group.children().iter().collect();
                stack.extend(children.into_iter().rev());
            }
        }
        out
    }

    /// Whether `node` is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.get(id).ok().and_then(Node::parent);
        }
        false
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).ok().and_then(Node::parent);
        }
        false
    }

    // -- Structure --

    /// Subscribe to insertions and removals anywhere in the scene.
    pub fn subscribe_structure(&self, f: impl Fn(&StructureEvent) + 'static) -> Subscription {
        self.structure.subscribe(f)
    }

    /// Append `child` to `parent`, detaching it from its previous parent.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let len = self.children(parent)?.len();
        self.add_at(parent, len, child)
    }

    /// Insert `child` into `parent` at `index` (clamped to the child count).
    ///
    /// Rejected without any change when `parent` is not a group, when
    /// `child` is the root or an ancestor of `parent`, or when `parent`
    /// already holds a different node with `child`'s id.
    pub fn add_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> SceneResult<()> {
        let parent_id = self.get(parent)?.id().clone();
        let children = self.children(parent)?;
        let child_id = self.get(child)?.id().clone();

        if child == self.root {
            log::warn!("rejected adding the root group under {parent_id}");
            return Err(SceneError::RootNode);
        }
        if self.is_ancestor_or_self(child, parent) {
            log::warn!("rejected adding {child_id} under its descendant {parent_id}");
            return Err(SceneError::Cycle {
                parent: parent_id,
                child: child_id,
            });
        }
        if children
            .get_by_id(child_id.as_str())
            .is_some_and(|existing| existing != child)
        {
            log::warn!("rejected duplicate id {child_id} under {parent_id}");
            return Err(SceneError::DuplicateId {
                parent: parent_id,
                id: child_id,
            });
        }

        self.unlink(child)?;

        let parent_flags = self.get(parent)?.element.flags_cell().clone();
        self.group_mut(parent)?
            .children_mut()
            .insert(index, child_id, child);
        self.node_mut(child)?.element.attach(parent, parent_flags);
        self.mark_subtree(child, DirtyFlags::ALL);
        self.get(parent)?
            .element
            .mark(DirtyFlags::CHILDREN | DirtyFlags::SUBTREE);

        self.pending_detached.retain(|d| d.node != child);
        self.structure
            .emit(&StructureEvent::Attached { parent, child });
        Ok(())
    }

    /// Remove `child` from its parent. Returns `false` if it had none.
    ///
    /// The node stays alive and can be added again; until then it no longer
    /// raises flags on its former ancestors.
    pub fn detach(&mut self, child: NodeId) -> SceneResult<bool> {
        if child == self.root {
            return Err(SceneError::RootNode);
        }
        let id = self.get(child)?.id().clone();
        if !self.unlink(child)? {
            return Ok(false);
        }
        self.pending_detached.push(DetachedNode { node: child, id });
        Ok(true)
    }

    /// Detach the child of `parent` with id `id`.
    pub fn remove_by_id(&mut self, parent: NodeId, id: &str) -> SceneResult<Option<NodeId>> {
        let Some(child) = self.children(parent)?.get_by_id(id) else {
            return Ok(None);
        };
        self.detach(child)?;
        Ok(Some(child))
    }

    /// Detach `node` and free it together with its whole subtree.
    pub fn destroy(&mut self, node: NodeId) -> SceneResult<()> {
        if node == self.root {
            return Err(SceneError::RootNode);
        }
        self.get(node)?;
        self.detach(node)?;
        for n in self.descendants(node) {
            self.free(n);
        }
        Ok(())
    }

    /// Take `child` out of its parent's list and drop the parent link.
    fn unlink(&mut self, child: NodeId) -> SceneResult<bool> {
        let Some(parent) = self.get(child)?.parent() else {
            return Ok(false);
        };
        self.group_mut(parent)?.children_mut().remove(child);
        self.node_mut(child)?.element.detach();
        self.get(parent)?
            .element
            .mark(DirtyFlags::CHILDREN | DirtyFlags::SUBTREE);
        self.structure
            .emit(&StructureEvent::Detached { parent, child });
        Ok(true)
    }

    fn mark_subtree(&self, node: NodeId, flags: DirtyFlags) {
        // Children first, so each mark stops at an ancestor already flagged.
        for n in self.descendants(node).into_iter().rev() {
            if let Ok(n) = self.get(n) {
                n.element.mark(flags);
            }
        }
    }

    // -- Paint order --

    pub fn bring_to_front(&mut self, node: NodeId) -> SceneResult<bool> {
        self.reorder(node, Children::bring_to_front)
    }

    pub fn send_to_back(&mut self, node: NodeId) -> SceneResult<bool> {
        self.reorder(node, Children::send_to_back)
    }

    pub fn bring_forward(&mut self, node: NodeId) -> SceneResult<bool> {
        self.reorder(node, Children::bring_forward)
    }

    pub fn send_backward(&mut self, node: NodeId) -> SceneResult<bool> {
        self.reorder(node, Children::send_backward)
    }

    fn reorder(
        &mut self,
        node: NodeId,
        op: impl FnOnce(&mut Children, NodeId) -> bool,
    ) -> SceneResult<bool> {
        let Some(parent) = self.get(node)?.parent() else {
            return Ok(false);
        };
        let moved = op(self.group_mut(parent)?.children_mut(), node);
        if moved {
            self.get(parent)?.element.mark(DirtyFlags::CHILDREN);
        }
        Ok(moved)
    }

    // -- Frames --

    /// Position, attitude and scale of `node` in root space, composed
    /// root first.
    pub fn world_transform(&self, node: NodeId) -> SceneResult<Placement> {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let n = self.get(id)?;
            chain.push(n.element.transform().placement());
            current = n.parent();
        }
        Ok(chain
            .iter()
            .rev()
            .fold(Placement::IDENTITY, |world, local| world.compose(local)))
    }

    /// Regenerate stale geometry, collect the frame's changes and clear
    /// the collected flags.
    ///
    /// Only branches flagged `SUBTREE` are walked. With no mutation since
    /// the previous call the result is empty and nothing is touched.
    pub fn update(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        let mut stack = vec![self.root];

        while let Some(current) = stack.pop() {
            let Ok(node) = self.node_mut(current) else { continue };
            node.update();
            let flags = node.flags();
            if flags.is_empty() {
                continue;
            }
            changes.changed.push(NodeChange {
                node: current,
                id: node.id().clone(),
                flags,
            });
            if flags.contains(DirtyFlags::SUBTREE) {
                if let Some(group) = node.shape().as_group() {
                    let children: Vec<NodeId> = group.children().iter().collect();
                    stack.extend(children.into_iter().rev());
                }
            }
        }

        for detached in std::mem::take(&mut self.pending_detached) {
            if !self.is_attached(detached.node) {
                changes.detached.push(detached);
            }
        }

        // Reset only after collecting, so marks raised while walking cannot
        // re-flag an ancestor that was already cleared.
        for change in &changes.changed {
            if let Ok(node) = self.get(change.node) {
                node.flag_reset();
            }
        }

        if !changes.is_empty() {
            log::debug!(
                "frame: {} changed, {} detached",
                changes.changed.len(),
                changes.detached.len()
            );
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::G20;
    use crate::shapes::{Ellipse, Rectangle};

    fn scene_with_rect() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let root = scene.root();
        let rect = scene.insert(root, Rectangle::new(10.0, 10.0).unwrap()).unwrap();
        scene.update();
        (scene, rect)
    }

    #[test]
    fn test_first_update_emits_everything() {
        let mut scene = Scene::new();
        let root = scene.root();
        let rect = scene.insert(root, Rectangle::new(1.0, 1.0).unwrap()).unwrap();

        let frame = scene.update();
        assert_eq!(frame.flags_of(root).map(|f| f.contains(DirtyFlags::CHILDREN)), Some(true));
        assert!(frame.flags_of(rect).unwrap().contains(DirtyFlags::ALL));
        assert!(scene.update().is_empty());
    }

    #[test]
    fn test_generated_ids() {
        let mut scene = Scene::new();
        let a = scene.create(Rectangle::new(1.0, 1.0).unwrap());
        assert_eq!(scene.get(a).unwrap().id().as_str(), "sg-rectangle-2");
        assert_eq!(scene.get(scene.root()).unwrap().id().as_str(), "sg-root-1");
    }

    #[test]
    fn test_setter_flags_node_and_ancestors() {
        let (mut scene, rect) = scene_with_rect();
        scene.node_mut(rect).unwrap().set_opacity(0.5).unwrap();

        let frame = scene.update();
        assert_eq!(frame.flags_of(rect), Some(DirtyFlags::OPACITY));
        assert_eq!(frame.flags_of(scene.root()), Some(DirtyFlags::SUBTREE));
    }

    #[test]
    fn test_stale_handle_rejected() {
        let (mut scene, rect) = scene_with_rect();
        scene.destroy(rect).unwrap();
        assert_eq!(scene.get(rect).unwrap_err(), SceneError::StaleNode);

        let reused = scene.create(Rectangle::new(1.0, 1.0).unwrap());
        assert_eq!(reused.index(), rect.index());
        assert!(scene.get(rect).is_err());
        assert!(scene.get(reused).is_ok());
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut scene = Scene::new();
        let root = scene.root();
        assert_eq!(scene.detach(root), Err(SceneError::RootNode));
        assert_eq!(scene.destroy(root), Err(SceneError::RootNode));
    }

    #[test]
    fn test_add_to_non_group_rejected() {
        let (mut scene, rect) = scene_with_rect();
        let other = scene.create(Rectangle::new(1.0, 1.0).unwrap());
        assert!(matches!(scene.add(rect, other), Err(SceneError::NotAGroup(_))));
        assert_eq!(scene.parent(other).unwrap(), None);
    }

    #[test]
    fn test_shape_edit_regenerates_on_update() {
        let mut scene = Scene::new();
        let root = scene.root();
        let ellipse = scene.insert(root, Ellipse::new(1.0, 1.0, 4).unwrap()).unwrap();
        scene.update();

        scene
            .edit::<Ellipse>(ellipse, |e| e.set_resolution(8))
            .unwrap();
        assert_eq!(scene.shape::<Ellipse>(ellipse).unwrap().path().len(), 4);

        let frame = scene.update();
        assert_eq!(scene.shape::<Ellipse>(ellipse).unwrap().path().len(), 8);
        assert_eq!(
            frame.flags_of(ellipse),
            Some(DirtyFlags::SHAPE | DirtyFlags::VERTICES)
        );
    }

    #[test]
    fn test_edit_wrong_kind() {
        let (mut scene, rect) = scene_with_rect();
        let err = scene.edit::<Ellipse>(rect, |e| e.set_rx(2.0)).unwrap_err();
        assert!(matches!(err, SceneError::WrongKind { expected: "ellipse", found: "rectangle", .. }));
    }

    #[test]
    fn test_world_transform_composes_down_the_chain() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.insert(root, Group::new()).unwrap();
        let rect = scene.insert(group, Rectangle::new(1.0, 1.0).unwrap()).unwrap();

        let g = scene.get(group).unwrap();
        g.set_position(G20::vector(10.0, 0.0)).unwrap();
        g.set_scale(2.0).unwrap();
        scene.get(rect).unwrap().set_position(G20::vector(1.0, 1.0)).unwrap();

        let world = scene.world_transform(rect).unwrap();
        assert!(world.position.approx_eq(&G20::vector(12.0, 2.0), 1e-9));
        assert!(world.scale.approx_eq(&G20::vector(2.0, 2.0), 1e-9));
    }

    #[test]
    fn test_structure_events() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut scene = Scene::new();
        let root = scene.root();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let _sub = scene.subscribe_structure(move |e| sink.borrow_mut().push(*e));

        let rect = scene.insert(root, Rectangle::new(1.0, 1.0).unwrap()).unwrap();
        scene.detach(rect).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                StructureEvent::Attached { parent: root, child: rect },
                StructureEvent::Detached { parent: root, child: rect },
            ]
        );
    }

    #[test]
    fn test_reorder_marks_parent() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.insert(root, Rectangle::new(1.0, 1.0).unwrap()).unwrap();
        let b = scene.insert(root, Rectangle::new(1.0, 1.0).unwrap()).unwrap();
        scene.update();

        assert!(scene.send_to_back(b).unwrap());
        assert!(!scene.send_to_back(b).unwrap());
        let order: Vec<NodeId> = scene.children(root).unwrap().iter().collect();
        assert_eq!(order, vec![b, a]);
        assert_eq!(scene.update().flags_of(root), Some(DirtyFlags::CHILDREN));
    }
}

//! A renderer that records the deltas it is handed instead of drawing.

use std::sync::{Arc, Mutex, PoisonError};

use kurbo::{Affine, BezPath, Size};
use sketchgraph_core::{ColorProvider as _, DirtyFlags, ElementId, Paint, SerializableColor};

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};

/// Paint as seen by a backend: a color, a provider to look up, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintRecord {
    None,
    Solid(SerializableColor),
    Provider(ElementId),
}

impl From<&Paint> for PaintRecord {
    fn from(paint: &Paint) -> Self {
        match paint {
            Paint::None => PaintRecord::None,
            Paint::Solid(color) => PaintRecord::Solid(*color),
            Paint::Provider(provider) => PaintRecord::Provider(provider.id().clone()),
        }
    }
}

/// What a backend would have to update for one node.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub id: ElementId,
    pub kind: &'static str,
    pub flags: DirtyFlags,
    pub transform: Affine,
    pub opacity: f64,
    pub visible: bool,
    /// Present when the anchor chain changed.
    pub path: Option<BezPath>,
    pub fill: Option<PaintRecord>,
    pub stroke: Option<PaintRecord>,
    pub linewidth: Option<f64>,
}

/// One recorded frame.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub viewport_size: Size,
    pub background: SerializableColor,
    pub nodes: Vec<NodeRecord>,
    pub detached: Vec<ElementId>,
}

impl FrameRecord {
    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }
}

/// Shared, cloneable view of the frames a [`RecordingRenderer`] captured.
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    frames: Arc<Mutex<Vec<FrameRecord>>>,
}

impl FrameLog {
    pub fn frames(&self) -> Vec<FrameRecord> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<FrameRecord> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn push(&self, frame: FrameRecord) {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame);
    }
}

/// Debug backend: turns every delta into a [`FrameRecord`].
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    log: FrameLog,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that keeps reading frames after the renderer is moved away.
    pub fn log(&self) -> FrameLog {
        self.log.clone()
    }
}

impl Renderer for RecordingRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let mut frame = FrameRecord {
            viewport_size: ctx.viewport_size,
            background: self.background_color(ctx).into(),
            nodes: Vec::with_capacity(ctx.changes.changed.len()),
            detached: Vec::new(),
        };

        for change in &ctx.changes.changed {
            let node = ctx
                .scene
                .get(change.node)
                .map_err(|e| RendererError::RenderFailed(e.to_string()))?;
            let element = node.element();
            let path = if change.flags.contains(DirtyFlags::VERTICES) {
                ctx.local_path(change.node)?
            } else {
                None
            };
            let style = node.style();
            frame.nodes.push(NodeRecord {
                id: change.id.clone(),
                kind: node.kind(),
                flags: change.flags,
                transform: ctx.world_affine(change.node)?,
                opacity: element.opacity(),
                visible: element.visible(),
                path,
                fill: style.map(|s| PaintRecord::from(&s.fill())),
                stroke: style.map(|s| PaintRecord::from(&s.stroke())),
                linewidth: style.map(|s| s.linewidth()),
            });
        }
        frame.detached = ctx.changes.detached.iter().map(|d| d.id.clone()).collect();

        log::debug!(
            "recorded frame: {} nodes, {} detached",
            frame.nodes.len(),
            frame.detached.len()
        );
        self.log.push(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_BACKGROUND, render_frame};
    use sketchgraph_core::{Ellipse, Group, Scene};

    #[test]
    fn test_records_paths_only_when_vertices_change() {
        let mut scene = Scene::new();
        let root = scene.root();
        let ellipse = scene.insert(root, Ellipse::new(3.0, 3.0, 4).unwrap()).unwrap();
        let mut renderer = RecordingRenderer::new();
        let log = renderer.log();
        let viewport = Size::new(10.0, 10.0);

        render_frame(&mut scene, &mut renderer, viewport).unwrap();
        let id = scene.get(ellipse).unwrap().id().clone();
        let first = log.last().unwrap();
        assert!(first.node(id.as_str()).unwrap().path.is_some());

        scene.node_mut(ellipse).unwrap().set_opacity(0.5).unwrap();
        render_frame(&mut scene, &mut renderer, viewport).unwrap();
        let second = log.last().unwrap();
        let record = second.node(id.as_str()).unwrap();
        assert!(record.path.is_none());
        assert!((record.opacity - 0.5).abs() < f64::EPSILON);
        assert_eq!(log.len(), 2);
        assert_eq!(second.viewport_size, viewport);
        assert_eq!(second.background, SerializableColor::from(DEFAULT_BACKGROUND));
    }

    #[test]
    fn test_groups_record_no_paint() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.insert(root, Group::new()).unwrap();
        let mut renderer = RecordingRenderer::new();
        render_frame(&mut scene, &mut renderer, Size::new(1.0, 1.0)).unwrap();

        let frame = renderer.log().last().unwrap();
        assert!(frame.nodes.iter().all(|n| n.fill.is_none()));
        assert_eq!(frame.nodes[0].kind, "group");
    }
}

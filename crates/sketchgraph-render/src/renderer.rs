//! Renderer trait abstraction.

use kurbo::{Affine, BezPath, Size};
use peniko::Color;
use sketchgraph_core::{FrameChanges, NodeId, Scene, SurfaceError};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything a backend sees for one frame.
pub struct RenderContext<'a> {
    /// The scene, already updated for this frame.
    pub scene: &'a Scene,
    /// What changed since the previous frame.
    pub changes: &'a FrameChanges,
    /// Size of the surface the frame is drawn on.
    pub viewport_size: Size,
    /// Surface pixels per scene unit after the stage fit, for HiDPI hosts.
    pub scale_factor: f64,
    /// Clear color behind the root group.
    pub background_color: Color,
}

/// Clear color used when the host does not pick one.
pub const DEFAULT_BACKGROUND: Color = Color::from_rgba8(250, 250, 250, 255);

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a Scene, changes: &'a FrameChanges, viewport_size: Size) -> Self {
        Self {
            scene,
            changes,
            viewport_size,
            scale_factor: 1.0,
            background_color: DEFAULT_BACKGROUND,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Root-to-node transform of `node`, with the HiDPI scale applied.
    pub fn world_affine(&self, node: NodeId) -> RenderResult<Affine> {
        let world = self
            .scene
            .world_transform(node)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))?;
        Ok(Affine::scale(self.scale_factor) * world.to_affine())
    }

    /// The node's outline in its local space, if it has one.
    pub fn local_path(&self, node: NodeId) -> RenderResult<Option<BezPath>> {
        let node = self
            .scene
            .get(node)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))?;
        Ok(node.shape().to_bez_path())
    }
}

/// Trait for rendering backends.
///
/// A backend keeps its own retained state and patches it from the frame
/// delta: only nodes listed in [`RenderContext::changes`] need work.
pub trait Renderer: Send + Sync {
    /// Apply one frame's changes.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Color to clear with before drawing; backends may override the host's.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

/// Update `scene` and hand a non-empty delta to `renderer`.
///
/// Returns the delta, which is empty when nothing changed; the renderer is
/// not called in that case.
pub fn render_frame(
    scene: &mut Scene,
    renderer: &mut dyn Renderer,
    viewport_size: Size,
) -> RenderResult<FrameChanges> {
    let changes = scene.update();
    if changes.is_empty() {
        log::trace!("frame skipped: nothing changed");
        return Ok(changes);
    }
    let ctx = RenderContext::new(scene, &changes, viewport_size);
    renderer.build_scene(&ctx)?;
    Ok(changes)
}

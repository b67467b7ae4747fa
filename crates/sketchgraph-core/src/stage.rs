//! A scene bound to a surface, with the root mapped onto a view box.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::algebra::G20;
use crate::element::HasTransform;
use crate::error::{SceneError, SceneResult, finite};
use crate::observable::Subscription;
use crate::scene::{FrameChanges, Scene};
use crate::surface::{RenderSurface, SurfaceError};
use crate::transform::TransformWriter;

/// The region of scene space shown on the surface.
///
/// A box with `bottom < top` is y-up: scene y grows towards the top of
/// the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ViewBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A y-down box from the origin spanning `size`.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Root position and scale that map this box onto a surface of `size`,
    /// top-left corner to the surface origin.
    pub fn fit(&self, size: Size) -> SceneResult<(G20, G20)> {
        let (w, h) = (self.width(), self.height());
        if w == 0.0 || h == 0.0 || !w.is_finite() || !h.is_finite() {
            return Err(SceneError::DegenerateViewBox);
        }
        let sx = finite("surface width", size.width)? / w;
        let sy = finite("surface height", size.height)? / h;
        let position = G20::vector(-self.left * sx, -self.top * sy);
        let scale = G20::vector(sx, sy);
        if !position.is_finite() || !scale.is_finite() {
            return Err(SceneError::DegenerateViewBox);
        }
        Ok((position, scale))
    }
}

/// Both parts are computed and checked before either is written.
fn apply_fit(root: &TransformWriter, view_box: &ViewBox, size: Size) -> SceneResult<()> {
    let (position, scale) = view_box.fit(size)?;
    root.set_position(position)?;
    root.set_scale(scale)?;
    Ok(())
}

/// Owns a scene and the surface it is drawn on.
///
/// Every size change of the surface refits the root group to the view box
/// before the call that caused it returns.
pub struct Stage {
    scene: Scene,
    surface: Box<dyn RenderSurface>,
    view_box: Rc<Cell<ViewBox>>,
    root: Rc<TransformWriter>,
    size_link: Subscription,
}

impl Stage {
    pub fn new(scene: Scene, surface: Box<dyn RenderSurface>, view_box: ViewBox) -> SceneResult<Self> {
        let root_node = scene.get(scene.root())?;
        let root = Rc::new(
            root_node
                .transform()
                .writer(root_node.element().flags_cell()),
        );
        apply_fit(&root, &view_box, surface.size())?;

        let view_box = Rc::new(Cell::new(view_box));
        let size_link = {
            let root = Rc::clone(&root);
            let view_box = Rc::clone(&view_box);
            surface.size_changes().subscribe(move |size| {
                if let Err(err) = apply_fit(&root, &view_box.get(), *size) {
                    log::warn!("cannot fit view box to {size:?}: {err}");
                }
            })
        };

        Ok(Self {
            scene,
            surface,
            view_box,
            root,
            size_link,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box.get()
    }

    pub fn size(&self) -> Size {
        self.surface.size()
    }

    /// Resize the surface; the root is refitted through its size stream.
    pub fn set_size(&mut self, size: Size) {
        self.surface.set_size(size);
    }

    /// Show a different region. A degenerate box is rejected unchanged.
    pub fn set_view_box(&mut self, view_box: ViewBox) -> SceneResult<()> {
        apply_fit(&self.root, &view_box, self.surface.size())?;
        self.view_box.set(view_box);
        Ok(())
    }

    /// Run one frame: update the scene and, if anything changed, render it.
    pub fn render(&mut self) -> Result<FrameChanges, SurfaceError> {
        let changes = self.scene.update();
        if !changes.is_empty() {
            self.surface.render_now(&self.scene, &changes)?;
        }
        Ok(changes)
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.size_link.dispose();
    }
}

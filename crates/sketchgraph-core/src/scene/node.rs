//! A scenegraph node: element base, paint state and kind-specific data.

use kurbo::{Cap, Join};

use crate::algebra::G20;
use crate::context::SceneConfig;
use crate::dirty::DirtyFlags;
use crate::element::{Element, ElementId, HasDirtyFlags, HasTransform};
use crate::error::{SceneError, SceneResult, finite};
use crate::observable::Signal;
use crate::paint::Paint;
use crate::shapes::{Shape, ShapeKind};
use crate::style::ShapeStyle;
use crate::transform::Transform;

use super::NodeId;

#[derive(Debug)]
pub struct Node {
    pub(crate) element: Element,
    style: Option<ShapeStyle>,
    shape: Shape,
}

impl Node {
    pub(crate) fn new(id: ElementId, shape: Shape, config: &SceneConfig) -> Self {
        let style = shape.is_drawable().then(|| ShapeStyle::new(config));
        Self {
            element: Element::new(id, config.epsilon),
            style,
            shape,
        }
    }

    pub fn id(&self) -> &ElementId {
        self.element.id()
    }

    pub fn kind(&self) -> &'static str {
        self.shape.kind()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.element.parent()
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Paint state; `None` for groups.
    pub fn style(&self) -> Option<&ShapeStyle> {
        self.style.as_ref()
    }

    /// Borrow the kind-specific data as `S`.
    pub fn get<S: ShapeKind>(&self) -> SceneResult<&S> {
        S::from_shape(&self.shape).ok_or_else(|| self.wrong_kind(S::KIND))
    }

    /// Edit the kind-specific data. When `f` reports a change, the kind's
    /// edit flags are raised; geometry is rebuilt on the next update.
    pub fn edit<S: ShapeKind>(
        &mut self,
        f: impl FnOnce(&mut S) -> SceneResult<bool>,
    ) -> SceneResult<bool> {
        let err = self.wrong_kind(S::KIND);
        let shape = S::from_shape_mut(&mut self.shape).ok_or(err)?;
        let changed = f(shape)?;
        if changed {
            self.element.mark(S::EDIT_FLAGS);
        }
        Ok(changed)
    }

    /// Rebuild geometry if its inputs changed. Returns whether the anchor
    /// chain was rebuilt, in which case `VERTICES` is raised.
    pub fn update(&mut self) -> bool {
        if !self.element.is_dirty(DirtyFlags::SHAPE) {
            return false;
        }
        let rebuilt = self.shape.regenerate();
        if rebuilt {
            log::trace!("regenerated {} {}", self.kind(), self.id());
            self.element.mark(DirtyFlags::VERTICES);
        }
        rebuilt
    }

    // -- Transform --

    pub fn set_position(&self, position: G20) -> SceneResult<bool> {
        self.transform().set_position(self.element.flags_cell(), position)
    }

    pub fn set_attitude(&self, attitude: G20) -> SceneResult<bool> {
        self.transform().set_attitude(self.element.flags_cell(), attitude)
    }

    /// Set the attitude to a counter-clockwise rotation by `angle` radians.
    pub fn set_rotation(&self, angle: f64) -> SceneResult<bool> {
        let angle = finite("rotation", angle)?;
        self.set_attitude(G20::rotor_from_angle(angle))
    }

    pub fn set_scale(&self, scale: f64) -> SceneResult<bool> {
        self.set_scale_xy(scale, scale)
    }

    pub fn set_scale_xy(&self, sx: f64, sy: f64) -> SceneResult<bool> {
        self.transform()
            .set_scale(self.element.flags_cell(), G20::vector(sx, sy))
    }

    pub fn set_opacity(&self, opacity: f64) -> SceneResult<bool> {
        self.element.set_opacity(opacity)
    }

    pub fn set_visible(&self, visible: bool) -> bool {
        self.element.set_visible(visible)
    }

    // -- Paint --

    pub fn set_fill(&mut self, fill: impl Into<Paint>) -> SceneResult<bool> {
        let flags = self.element.flags_cell().clone();
        Ok(self.style_mut()?.set_fill(&flags, fill.into()))
    }

    pub fn set_stroke(&mut self, stroke: impl Into<Paint>) -> SceneResult<bool> {
        let flags = self.element.flags_cell().clone();
        Ok(self.style_mut()?.set_stroke(&flags, stroke.into()))
    }

    pub fn set_linewidth(&mut self, linewidth: f64) -> SceneResult<bool> {
        let flags = self.element.flags_cell().clone();
        self.style_mut()?.set_linewidth(&flags, linewidth)
    }

    pub fn set_cap(&mut self, cap: Cap) -> SceneResult<bool> {
        let flags = self.element.flags_cell().clone();
        Ok(self.style_mut()?.set_cap(&flags, cap))
    }

    pub fn set_join(&mut self, join: Join) -> SceneResult<bool> {
        let flags = self.element.flags_cell().clone();
        Ok(self.style_mut()?.set_join(&flags, join))
    }

    pub fn set_miter(&mut self, miter: f64) -> SceneResult<bool> {
        let flags = self.element.flags_cell().clone();
        self.style_mut()?.set_miter(&flags, miter)
    }

    pub fn set_dashes(&mut self, dashes: Vec<f64>) -> SceneResult<bool> {
        let flags = self.element.flags_cell().clone();
        self.style_mut()?.set_dashes(&flags, dashes)
    }

    fn style_mut(&mut self) -> SceneResult<&mut ShapeStyle> {
        let err = self.wrong_kind("drawable");
        self.style.as_mut().ok_or(err)
    }

    fn wrong_kind(&self, expected: &'static str) -> SceneError {
        SceneError::WrongKind {
            id: self.id().clone(),
            expected,
            found: self.kind(),
        }
    }

    pub(crate) fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    /// Drop every subscription this node holds.
    pub(crate) fn release(&mut self) {
        self.element.detach();
        if let Some(style) = self.style.as_mut() {
            style.unlink();
        }
    }
}

impl HasDirtyFlags for Node {
    fn flags(&self) -> DirtyFlags {
        self.element.flags()
    }

    fn flag_stream(&self) -> Signal<DirtyFlags> {
        self.element.flag_stream()
    }

    fn flag_reset(&self) {
        self.element.flag_reset();
    }
}

impl HasTransform for Node {
    fn transform(&self) -> &Transform {
        self.element.transform()
    }
}

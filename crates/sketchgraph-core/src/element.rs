//! Identity, dirty flags and parent link shared by every scenegraph node.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dirty::DirtyFlags;
use crate::error::{SceneResult, unit_interval};
use crate::observable::{Observable, Signal, Subscription};
use crate::scene::NodeId;
use crate::transform::Transform;

/// Stable, user-visible identifier of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Read access to a node's dirty flags.
pub trait HasDirtyFlags {
    /// The currently raised flags.
    fn flags(&self) -> DirtyFlags;

    /// Stream of flag changes, including the reset to empty.
    fn flag_stream(&self) -> Signal<DirtyFlags>;

    /// Clear every flag. Called once the renderer has consumed the frame.
    fn flag_reset(&self);

    /// Whether any of `flags` is raised.
    fn is_dirty(&self, flags: DirtyFlags) -> bool {
        self.flags().intersects(flags)
    }
}

/// Access to a node's local transform.
pub trait HasTransform {
    fn transform(&self) -> &Transform;
}

/// Store `value` in `property`; on change raise `flag` first, then notify.
pub(crate) fn assign<T: Clone + PartialEq + 'static>(
    flags: &Observable<DirtyFlags>,
    property: &Observable<T>,
    flag: DirtyFlags,
    value: T,
) -> bool {
    if property.with(|current| *current == value) {
        return false;
    }
    flags.update(|f| *f | flag);
    property.set(value)
}

/// The part of a node every kind shares.
#[derive(Debug)]
pub struct Element {
    id: ElementId,
    parent: Option<NodeId>,
    flags: Observable<DirtyFlags>,
    transform: Transform,
    opacity: Observable<f64>,
    visible: Observable<bool>,
    parent_link: Option<Subscription>,
}

impl Element {
    /// `epsilon` is the tolerance below which transform writes are no-ops.
    pub(crate) fn new(id: ElementId, epsilon: f64) -> Self {
        Self {
            id,
            parent: None,
            flags: Observable::new(DirtyFlags::ALL),
            transform: Transform::new(epsilon),
            opacity: Observable::new(1.0),
            visible: Observable::new(true),
            parent_link: None,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// The containing group, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn opacity(&self) -> f64 {
        self.opacity.get()
    }

    pub fn opacity_signal(&self) -> Signal<f64> {
        self.opacity.signal()
    }

    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    pub fn visible_signal(&self) -> Signal<bool> {
        self.visible.signal()
    }

    pub(crate) fn set_opacity(&self, opacity: f64) -> SceneResult<bool> {
        let opacity = unit_interval("opacity", opacity)?;
        Ok(assign(&self.flags, &self.opacity, DirtyFlags::OPACITY, opacity))
    }

    pub(crate) fn set_visible(&self, visible: bool) -> bool {
        assign(&self.flags, &self.visible, DirtyFlags::VISIBILITY, visible)
    }

    pub(crate) fn flags_cell(&self) -> &Observable<DirtyFlags> {
        &self.flags
    }

    pub(crate) fn mark(&self, flags: DirtyFlags) {
        self.flags.update(|f| *f | flags);
    }

    /// Link this node under `parent`: any flag raised here raises
    /// `SUBTREE` on the parent, which in turn forwards to its own parent.
    ///
    /// Propagation stops at the first ancestor that already has `SUBTREE`,
    /// because setting an unchanged flag set notifies nobody.
    pub(crate) fn attach(&mut self, parent: NodeId, parent_flags: Observable<DirtyFlags>) {
        self.detach();
        let link = self.flags.subscribe(move |flags| {
            if !flags.is_empty() {
                parent_flags.update(|f| *f | DirtyFlags::SUBTREE);
            }
        });
        self.parent = Some(parent);
        self.parent_link = Some(link);
    }

    /// Drop the parent link; later changes no longer reach the old ancestors.
    pub(crate) fn detach(&mut self) {
        if let Some(mut link) = self.parent_link.take() {
            link.dispose();
        }
        self.parent = None;
    }
}

impl HasDirtyFlags for Element {
    fn flags(&self) -> DirtyFlags {
        self.flags.get()
    }

    fn flag_stream(&self) -> Signal<DirtyFlags> {
        self.flags.signal()
    }

    fn flag_reset(&self) {
        self.flags.set(DirtyFlags::EMPTY);
    }
}

impl HasTransform for Element {
    fn transform(&self) -> &Transform {
        &self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::EPSILON;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_new_element_is_fully_dirty() {
        let element = Element::new(ElementId::new("a"), EPSILON);
        assert_eq!(element.flags(), DirtyFlags::ALL);
        element.flag_reset();
        assert!(element.flags().is_empty());
    }

    #[test]
    fn test_setter_raises_flag_only_on_change() {
        let element = Element::new(ElementId::new("a"), EPSILON);
        element.flag_reset();

        assert!(!element.set_visible(true));
        assert!(element.flags().is_empty());

        assert!(element.set_visible(false));
        assert_eq!(element.flags(), DirtyFlags::VISIBILITY);
    }

    #[test]
    fn test_opacity_range() {
        let element = Element::new(ElementId::new("a"), EPSILON);
        assert!(element.set_opacity(0.5).unwrap());
        assert!(element.set_opacity(1.5).is_err());
        assert!(element.set_opacity(f64::NAN).is_err());
        assert!((element.opacity() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flag_raised_before_value_notification() {
        let element = Element::new(ElementId::new("a"), EPSILON);
        element.flag_reset();
        let seen = Rc::new(Cell::new(DirtyFlags::EMPTY));
        let flags = element.flag_stream();
        let sink = Rc::clone(&seen);
        let _sub = element
            .visible_signal()
            .subscribe(move |_| sink.set(flags.get()));

        element.set_visible(false);
        assert_eq!(seen.get(), DirtyFlags::VISIBILITY);
    }
}

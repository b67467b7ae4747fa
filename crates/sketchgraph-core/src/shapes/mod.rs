//! Node kinds of the scenegraph.

mod arc_segment;
mod ellipse;
mod group;
mod line;
mod polygon;
mod rectangle;
mod star;
mod text;

pub use arc_segment::ArcSegment;
pub use ellipse::Ellipse;
pub use group::{Group, HasChildren};
pub use line::Line;
pub use polygon::RegularPolygon;
pub use rectangle::Rectangle;
pub use star::Star;
pub use text::{Baseline, FontStyle, FontWeight, Text, TextAlign};

use kurbo::BezPath;

use crate::dirty::DirtyFlags;
use crate::path::Path;

/// The closed set of node kinds.
#[derive(Debug, Clone)]
pub enum Shape {
    Group(Group),
    Path(Path),
    Ellipse(Ellipse),
    Polygon(RegularPolygon),
    ArcSegment(ArcSegment),
    Rectangle(Rectangle),
    Star(Star),
    Line(Line),
    Text(Text),
}

impl Shape {
    /// Short lowercase name, also used in generated ids.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Group(_) => Group::KIND,
            Shape::Path(_) => Path::KIND,
            Shape::Ellipse(_) => Ellipse::KIND,
            Shape::Polygon(_) => RegularPolygon::KIND,
            Shape::ArcSegment(_) => ArcSegment::KIND,
            Shape::Rectangle(_) => Rectangle::KIND,
            Shape::Star(_) => Star::KIND,
            Shape::Line(_) => Line::KIND,
            Shape::Text(_) => Text::KIND,
        }
    }

    /// The anchor chain of vector kinds.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Shape::Path(s) => Some(s),
            Shape::Ellipse(s) => Some(s.path()),
            Shape::Polygon(s) => Some(s.path()),
            Shape::ArcSegment(s) => Some(s.path()),
            Shape::Rectangle(s) => Some(s.path()),
            Shape::Star(s) => Some(s.path()),
            Shape::Line(s) => Some(s.path()),
            Shape::Group(_) | Shape::Text(_) => None,
        }
    }

    /// Outline as a kurbo path; `None` for groups and text.
    pub fn to_bez_path(&self) -> Option<BezPath> {
        self.path().map(Path::to_bez_path)
    }

    /// Whether the node carries fill and stroke.
    pub fn is_drawable(&self) -> bool {
        !self.is_group()
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Shape::Group(_))
    }

    /// The group payload, if this is one.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Rebuild derived geometry. Returns whether the anchor chain was rebuilt.
    pub(crate) fn regenerate(&mut self) -> bool {
        match self {
            Shape::Path(p) => {
                if p.is_automatic() {
                    p.auto_controls();
                }
                true
            }
            Shape::Ellipse(s) => {
                s.regenerate();
                true
            }
            Shape::Polygon(s) => {
                s.regenerate();
                true
            }
            Shape::ArcSegment(s) => {
                s.regenerate();
                true
            }
            Shape::Rectangle(s) => {
                s.regenerate();
                true
            }
            Shape::Star(s) => {
                s.regenerate();
                true
            }
            Shape::Line(s) => {
                s.regenerate();
                true
            }
            Shape::Group(_) | Shape::Text(_) => false,
        }
    }
}

/// A concrete node kind that can be borrowed out of a [`Shape`].
pub trait ShapeKind: Sized {
    const KIND: &'static str;
    /// Flags raised when the kind's own parameters are edited.
    const EDIT_FLAGS: DirtyFlags;

    fn from_shape(shape: &Shape) -> Option<&Self>;
    fn from_shape_mut(shape: &mut Shape) -> Option<&mut Self>;
}

macro_rules! shape_kind {
    ($ty:ty, $variant:ident, $kind:literal, $flags:expr) => {
        impl ShapeKind for $ty {
            const KIND: &'static str = $kind;
            const EDIT_FLAGS: DirtyFlags = $flags;

            fn from_shape(shape: &Shape) -> Option<&Self> {
                match shape {
                    Shape::$variant(s) => Some(s),
                    _ => None,
                }
            }

            fn from_shape_mut(shape: &mut Shape) -> Option<&mut Self> {
                match shape {
                    Shape::$variant(s) => Some(s),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Shape {
            fn from(shape: $ty) -> Self {
                Shape::$variant(shape)
            }
        }
    };
}

shape_kind!(Group, Group, "group", DirtyFlags::CHILDREN);
shape_kind!(Path, Path, "path", DirtyFlags::SHAPE);
shape_kind!(Ellipse, Ellipse, "ellipse", DirtyFlags::SHAPE);
shape_kind!(RegularPolygon, Polygon, "polygon", DirtyFlags::SHAPE);
shape_kind!(ArcSegment, ArcSegment, "arc-segment", DirtyFlags::SHAPE);
shape_kind!(Rectangle, Rectangle, "rectangle", DirtyFlags::SHAPE);
shape_kind!(Star, Star, "star", DirtyFlags::SHAPE);
shape_kind!(Line, Line, "line", DirtyFlags::SHAPE);
shape_kind!(Text, Text, "text", DirtyFlags::TEXT);

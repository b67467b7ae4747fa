//! Sketchgraph Core Library
//!
//! Scenegraph, incremental change tracking and procedural geometry for a
//! 2D drawing engine. Positions, rotations and scales are all [`G20`]
//! multivectors. Every node carries [`DirtyFlags`]; [`Scene::update`]
//! walks only the changed branches and hands the delta to a renderer.

pub mod algebra;
pub mod children;
pub mod context;
pub mod dirty;
pub mod element;
pub mod error;
pub mod observable;
pub mod paint;
pub mod path;
pub mod scene;
pub mod shapes;
pub mod stage;
pub mod style;
pub mod surface;
pub mod transform;

pub use algebra::{AlgebraError, AlgebraResult, EPSILON, G20, LockToken};
pub use children::Children;
pub use context::{SceneConfig, SceneContext};
pub use dirty::DirtyFlags;
pub use element::{Element, ElementId, HasDirtyFlags, HasTransform};
pub use error::{SceneError, SceneResult};
pub use observable::{EventStream, Observable, Signal, Subscription};
pub use paint::{ColorProvider, Gradient, Paint, SerializableColor, Stop, Texture};
pub use path::{Anchor, Command, Path};
pub use scene::{DetachedNode, FrameChanges, Node, NodeChange, NodeId, Scene, StructureEvent};
pub use shapes::{
    ArcSegment, Ellipse, Group, HasChildren, Line, Rectangle, RegularPolygon, Shape, ShapeKind,
    Star, Text,
};
pub use stage::{Stage, ViewBox};
pub use style::ShapeStyle;
pub use surface::{RenderSurface, SurfaceError};
pub use transform::{Placement, Transform};

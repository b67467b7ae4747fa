//! Anchor chains: the vertex model shared by every drawable shape.

use kurbo::{BezPath, Point, Rect, Shape as _};

use crate::algebra::G20;

/// How an anchor is reached from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Start a new subpath.
    #[default]
    Move,
    Line,
    /// Cubic Bezier through the previous anchor's `right` and this anchor's `left`.
    Curve,
    /// Close the current subpath. The anchor's origin is the subpath start.
    Close,
}

/// A vertex with its two Bezier control handles.
///
/// `left` and `right` are offsets relative to `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub origin: G20,
    pub left: G20,
    pub right: G20,
    pub command: Command,
}

impl Anchor {
    pub fn new(origin: G20, command: Command) -> Self {
        Self {
            origin: origin.to_mutable(),
            left: G20::vector(0.0, 0.0),
            right: G20::vector(0.0, 0.0),
            command,
        }
    }

    pub fn with_controls(origin: G20, left: G20, right: G20, command: Command) -> Self {
        Self {
            origin: origin.to_mutable(),
            left: left.to_mutable(),
            right: right.to_mutable(),
            command,
        }
    }

    /// Absolute position of the incoming control point.
    pub fn left_point(&self) -> Point {
        (self.origin.to_vec2() + self.left.to_vec2()).to_point()
    }

    /// Absolute position of the outgoing control point.
    pub fn right_point(&self) -> Point {
        (self.origin.to_vec2() + self.right.to_vec2()).to_point()
    }
}

/// An ordered chain of anchors plus the flags a renderer needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    anchors: Vec<Anchor>,
    closed: bool,
    curved: bool,
    automatic: bool,
}

impl Path {
    pub fn new(anchors: Vec<Anchor>, closed: bool, curved: bool) -> Self {
        Self {
            anchors,
            closed,
            curved,
            automatic: false,
        }
    }

    /// A path through `points`. When `curved`, smooth control handles are
    /// derived from the neighbours of each point.
    pub fn from_points(points: &[G20], closed: bool, curved: bool) -> Self {
        let command = if curved { Command::Curve } else { Command::Line };
        let anchors = points
            .iter()
            .enumerate()
            .map(|(i, p)| Anchor::new(*p, if i == 0 { Command::Move } else { command }))
            .collect();
        let mut path = Self {
            anchors,
            closed,
            curved,
            automatic: curved,
        };
        if curved {
            path.auto_controls();
        }
        path
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_curved(&self) -> bool {
        self.curved
    }

    /// Whether control handles are recomputed from the anchors.
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    pub fn set_closed(&mut self, closed: bool) -> bool {
        std::mem::replace(&mut self.closed, closed) != closed
    }

    pub fn set_curved(&mut self, curved: bool) -> bool {
        std::mem::replace(&mut self.curved, curved) != curved
    }

    /// Handles are derived on the next regeneration, not here.
    pub fn set_automatic(&mut self, automatic: bool) -> bool {
        std::mem::replace(&mut self.automatic, automatic) != automatic
    }

    pub fn anchors_mut(&mut self) -> &mut Vec<Anchor> {
        &mut self.anchors
    }

    /// Replace the chain, keeping the flags. Automatic handles are
    /// rederived on the next regeneration.
    pub fn set_anchors(&mut self, anchors: Vec<Anchor>) {
        self.anchors = anchors;
    }

    /// Catmull-Rom style handles: each anchor's handles lie along the line
    /// from its previous to its next neighbour, a third of the way to each.
    pub fn auto_controls(&mut self) {
        let n = self.anchors.len();
        if n < 2 {
            return;
        }
        let origins: Vec<Point> = self.anchors.iter().map(|a| a.origin.to_point()).collect();
        for i in 0..n {
            let (prev, next) = if self.closed {
                (origins[(i + n - 1) % n], origins[(i + 1) % n])
            } else {
                (origins[i.saturating_sub(1)], origins[(i + 1).min(n - 1)])
            };
            let tangent = next - prev;
            let length = tangent.hypot();
            let anchor = &mut self.anchors[i];
            if length <= f64::EPSILON {
                anchor.left = G20::vector(0.0, 0.0);
                anchor.right = G20::vector(0.0, 0.0);
                continue;
            }
            let unit = tangent / length;
            let before = (origins[i] - prev).hypot() / 3.0;
            let after = (next - origins[i]).hypot() / 3.0;
            anchor.left = G20::from(-unit * before);
            anchor.right = G20::from(unit * after);
        }
    }

    /// Flatten the chain into a kurbo path.
    ///
    /// A closed path whose last anchor is not a [`Command::Close`] gets a
    /// closing segment: a curve back to the first anchor when curved,
    /// a straight line otherwise.
    pub fn to_bez_path(&self) -> BezPath {
        let mut bez = BezPath::new();
        let mut start: Option<&Anchor> = None;
        let mut prev: Option<&Anchor> = None;

        for anchor in &self.anchors {
            let p = anchor.origin.to_point();
            match (anchor.command, prev) {
                (Command::Move, _) | (_, None) => {
                    bez.move_to(p);
                    start = Some(anchor);
                }
                (Command::Line, Some(_)) => bez.line_to(p),
                (Command::Curve, Some(from)) => {
                    bez.curve_to(from.right_point(), anchor.left_point(), p);
                }
                (Command::Close, Some(_)) => bez.close_path(),
            }
            prev = Some(anchor);
        }

        if let (true, Some(first), Some(last)) = (self.closed, start, prev) {
            if last.command != Command::Close {
                if self.curved {
                    bez.curve_to(last.right_point(), first.left_point(), first.origin.to_point());
                } else {
                    bez.line_to(first.origin.to_point());
                }
                bez.close_path();
            }
        }
        bez
    }

    /// Bounds of the curve, control handles excluded. `None` when empty.
    pub fn bounding_box(&self) -> Option<Rect> {
        if self.anchors.is_empty() {
            return None;
        }
        Some(self.to_bez_path().bounding_box())
    }
}

//! Regular polygon inscribed in an ellipse.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::algebra::G20;
use crate::error::{SceneResult, at_least, non_negative};
use crate::path::{Anchor, Command, Path};

/// A regular polygon centred on the node origin.
///
/// `radius`, `width` and `height` are kept consistent: setting the radius
/// sets both extents to its diameter, and setting either extent re-derives
/// `radius = max(width, height) / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularPolygon {
    radius: f64,
    width: f64,
    height: f64,
    sides: usize,
    path: Path,
}

impl RegularPolygon {
    /// A polygon inscribed in a circle of `radius`, with at least three sides.
    pub fn new(radius: f64, sides: usize) -> SceneResult<Self> {
        let radius = non_negative("radius", radius)?;
        let mut polygon = Self {
            radius,
            width: radius * 2.0,
            height: radius * 2.0,
            sides: at_least("sides", sides, 3)?,
            path: Path::default(),
        };
        polygon.regenerate();
        Ok(polygon)
    }

    /// Half the larger of width and height.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Horizontal extent of the ellipse the vertices lie on.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent of the ellipse the vertices lie on.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn sides(&self) -> usize {
        self.sides
    }

    /// Generated outline, current as of the last update.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resets width and height to the diameter.
    pub fn set_radius(&mut self, radius: f64) -> SceneResult<bool> {
        let radius = non_negative("radius", radius)?;
        let diameter = radius * 2.0;
        let changed = self.radius != radius || self.width != diameter || self.height != diameter;
        self.radius = radius;
        self.width = diameter;
        self.height = diameter;
        Ok(changed)
    }

    /// Stretch horizontally; the radius follows the larger extent.
    pub fn set_width(&mut self, width: f64) -> SceneResult<bool> {
        let width = non_negative("width", width)?;
        if self.width == width {
            return Ok(false);
        }
        self.width = width;
        self.radius = self.width.max(self.height) / 2.0;
        Ok(true)
    }

    /// Stretch vertically; the radius follows the larger extent.
    pub fn set_height(&mut self, height: f64) -> SceneResult<bool> {
        let height = non_negative("height", height)?;
        if self.height == height {
            return Ok(false);
        }
        self.height = height;
        self.radius = self.width.max(self.height) / 2.0;
        Ok(true)
    }

    /// At least three sides.
    pub fn set_sides(&mut self, sides: usize) -> SceneResult<bool> {
        let sides = at_least("sides", sides, 3)?;
        Ok(std::mem::replace(&mut self.sides, sides) != sides)
    }

    /// Vertex `i` sits at `θ = 2π(i + ½)/n + π/2` on the `width × height`
    /// ellipse.
    pub(crate) fn regenerate(&mut self) {
        let n = self.sides as f64;
        let anchors = (0..self.sides)
            .map(|i| {
                let theta = TAU * (i as f64 + 0.5) / n + FRAC_PI_2;
                let origin = G20::vector(self.width / 2.0 * theta.cos(), self.height / 2.0 * theta.sin());
                let command = if i == 0 { Command::Move } else { Command::Line };
                Anchor::new(origin, command)
            })
            .collect();
        self.path = Path::new(anchors, true, false);
    }
}

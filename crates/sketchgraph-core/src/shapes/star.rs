//! Star shape.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::algebra::G20;
use crate::error::{SceneResult, at_least, non_negative};
use crate::path::{Anchor, Command, Path};

/// A star with `sides` points alternating between two radii.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    inner_radius: f64,
    outer_radius: f64,
    sides: usize,
    path: Path,
}

impl Star {
    /// A star with `sides` points; the first lies on the negative y axis.
    pub fn new(inner_radius: f64, outer_radius: f64, sides: usize) -> SceneResult<Self> {
        let mut star = Self {
            inner_radius: non_negative("inner_radius", inner_radius)?,
            outer_radius: non_negative("outer_radius", outer_radius)?,
            sides: at_least("sides", sides, 2)?,
            path: Path::default(),
        };
        star.regenerate();
        Ok(star)
    }

    /// Radius of the notches between points.
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Radius of the points.
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Number of points.
    pub fn sides(&self) -> usize {
        self.sides
    }

    /// Generated outline, current as of the last update.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_inner_radius(&mut self, radius: f64) -> SceneResult<bool> {
        let radius = non_negative("inner_radius", radius)?;
        Ok(std::mem::replace(&mut self.inner_radius, radius) != radius)
    }

    pub fn set_outer_radius(&mut self, radius: f64) -> SceneResult<bool> {
        let radius = non_negative("outer_radius", radius)?;
        Ok(std::mem::replace(&mut self.outer_radius, radius) != radius)
    }

    /// At least two points.
    pub fn set_sides(&mut self, sides: usize) -> SceneResult<bool> {
        let sides = at_least("sides", sides, 2)?;
        Ok(std::mem::replace(&mut self.sides, sides) != sides)
    }

    /// Even vertices lie on the outer radius, odd ones on the inner;
    /// the first point faces up.
    pub(crate) fn regenerate(&mut self) {
        let count = self.sides * 2;
        let anchors = (0..count)
            .map(|i| {
                let theta = PI * i as f64 / self.sides as f64 - FRAC_PI_2;
                let r = if i % 2 == 0 { self.outer_radius } else { self.inner_radius };
                let command = if i == 0 { Command::Move } else { Command::Line };
                Anchor::new(G20::vector(r * theta.cos(), r * theta.sin()), command)
            })
            .collect();
        self.path = Path::new(anchors, true, false);
    }
}

//! Ellipse approximated by cubic Bezier arcs.

use std::f64::consts::{PI, TAU};

use crate::algebra::G20;
use crate::context::SceneConfig;
use crate::error::{SceneResult, at_least, non_negative};
use crate::path::{Anchor, Command, Path};

/// An ellipse centred on the node origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    rx: f64,
    ry: f64,
    resolution: usize,
    path: Path,
}

impl Ellipse {
    /// Create an ellipse with `resolution` vertices (at least 2).
    pub fn new(rx: f64, ry: f64, resolution: usize) -> SceneResult<Self> {
        let mut ellipse = Self {
            rx: non_negative("rx", rx)?,
            ry: non_negative("ry", ry)?,
            resolution: at_least("resolution", resolution, 2)?,
            path: Path::default(),
        };
        ellipse.regenerate();
        Ok(ellipse)
    }

    /// Create an ellipse with the configured default resolution.
    pub fn from_config(rx: f64, ry: f64, config: &SceneConfig) -> SceneResult<Self> {
        Self::new(rx, ry, config.ellipse_resolution)
    }

    /// An ellipse with equal radii.
    pub fn circle(radius: f64, resolution: usize) -> SceneResult<Self> {
        Self::new(radius, radius, resolution)
    }

    /// Horizontal radius.
    pub fn rx(&self) -> f64 {
        self.rx
    }

    /// Vertical radius.
    pub fn ry(&self) -> f64 {
        self.ry
    }

    /// Number of vertices around the outline.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Generated outline, current as of the last update.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the radius changed; the outline follows on the next update.
    pub fn set_rx(&mut self, rx: f64) -> SceneResult<bool> {
        let rx = non_negative("rx", rx)?;
        Ok(std::mem::replace(&mut self.rx, rx) != rx)
    }

    /// Returns whether the radius changed; the outline follows on the next update.
    pub fn set_ry(&mut self, ry: f64) -> SceneResult<bool> {
        let ry = non_negative("ry", ry)?;
        Ok(std::mem::replace(&mut self.ry, ry) != ry)
    }

    /// At least two vertices.
    pub fn set_resolution(&mut self, resolution: usize) -> SceneResult<bool> {
        let resolution = at_least("resolution", resolution, 2)?;
        Ok(std::mem::replace(&mut self.resolution, resolution) != resolution)
    }

    /// Rebuild the anchor chain from the current parameters.
    ///
    /// Vertex `i` sits at `θ = 2πi/n`; its handles are tangent to the
    /// ellipse with length `c · radius`, `c = 4/3 · tan(π / 2n)`.
    pub(crate) fn regenerate(&mut self) {
        let n = self.resolution;
        let c = 4.0 / 3.0 * (PI / (2.0 * n as f64)).tan();
        let anchors = (0..n)
            .map(|i| {
                let theta = TAU * i as f64 / n as f64;
                let (sin, cos) = theta.sin_cos();
                let origin = G20::vector(self.rx * cos, self.ry * sin);
                let right = G20::vector(-c * self.rx * sin, c * self.ry * cos);
                let left = G20::vector(c * self.rx * sin, -c * self.ry * cos);
                let command = if i == 0 { Command::Move } else { Command::Curve };
                Anchor::with_controls(origin, left, right, command)
            })
            .collect();
        self.path = Path::new(anchors, true, true);
    }
}

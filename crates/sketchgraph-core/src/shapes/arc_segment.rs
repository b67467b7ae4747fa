//! Annular arc segment: pie slices, rings and partial annuli.

use std::f64::consts::{PI, TAU};

use crate::algebra::G20;
use crate::context::SceneConfig;
use crate::error::{SceneResult, at_least, finite, non_negative};
use crate::path::{Anchor, Command, Path};

/// Angles closer than this (mod 2π) count as the same direction.
const CONGRUENCE_TOLERANCE: f64 = 1e-9;

/// The region between two radii, swept from `start_angle` to `end_angle`.
///
/// With `inner_radius == 0` this is a pie slice. When the two angles are
/// congruent mod 2π the outer and inner arcs are closed into rings instead
/// of being joined by straight edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    start_angle: f64,
    end_angle: f64,
    inner_radius: f64,
    outer_radius: f64,
    resolution: usize,
    path: Path,
}

impl ArcSegment {
    /// `resolution` is the vertex count of each arc (at least 2).
    pub fn new(
        start_angle: f64,
        end_angle: f64,
        inner_radius: f64,
        outer_radius: f64,
        resolution: usize,
    ) -> SceneResult<Self> {
        let mut arc = Self {
            start_angle: finite("start_angle", start_angle)?,
            end_angle: finite("end_angle", end_angle)?,
            inner_radius: non_negative("inner_radius", inner_radius)?,
            outer_radius: non_negative("outer_radius", outer_radius)?,
            resolution: at_least("resolution", resolution, 2)?,
            path: Path::default(),
        };
        arc.regenerate();
        Ok(arc)
    }

    /// Like [`ArcSegment::new`] with the configured arc resolution.
    pub fn from_config(
        start_angle: f64,
        end_angle: f64,
        inner_radius: f64,
        outer_radius: f64,
        config: &SceneConfig,
    ) -> SceneResult<Self> {
        Self::new(start_angle, end_angle, inner_radius, outer_radius, config.arc_resolution)
    }

    /// Start of the sweep, radians counter-clockwise from +x.
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// End of the sweep, radians.
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Radius of the inner arc; zero makes a pie slice.
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Radius of the outer arc.
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Vertices per arc.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Generated outline, current as of the last update.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the sweep covers whole turns, so the arcs close on themselves.
    pub fn is_connected(&self) -> bool {
        let rest = (self.end_angle - self.start_angle).rem_euclid(TAU);
        rest < CONGRUENCE_TOLERANCE || TAU - rest < CONGRUENCE_TOLERANCE
    }

    /// Whether there is an inner arc (`inner_radius > 0`).
    pub fn is_punctured(&self) -> bool {
        self.inner_radius > 0.0
    }

    /// Returns whether the angle changed. Non-finite angles are rejected.
    pub fn set_start_angle(&mut self, angle: f64) -> SceneResult<bool> {
        let angle = finite("start_angle", angle)?;
        Ok(std::mem::replace(&mut self.start_angle, angle) != angle)
    }

    /// Returns whether the angle changed. Non-finite angles are rejected.
    pub fn set_end_angle(&mut self, angle: f64) -> SceneResult<bool> {
        let angle = finite("end_angle", angle)?;
        Ok(std::mem::replace(&mut self.end_angle, angle) != angle)
    }

    /// Returns whether the radius changed; negative radii are rejected.
    pub fn set_inner_radius(&mut self, radius: f64) -> SceneResult<bool> {
        let radius = non_negative("inner_radius", radius)?;
        Ok(std::mem::replace(&mut self.inner_radius, radius) != radius)
    }

    /// Returns whether the radius changed; negative radii are rejected.
    pub fn set_outer_radius(&mut self, radius: f64) -> SceneResult<bool> {
        let radius = non_negative("outer_radius", radius)?;
        Ok(std::mem::replace(&mut self.outer_radius, radius) != radius)
    }

    /// At least two vertices per arc.
    pub fn set_resolution(&mut self, resolution: usize) -> SceneResult<bool> {
        let resolution = at_least("resolution", resolution, 2)?;
        Ok(std::mem::replace(&mut self.resolution, resolution) != resolution)
    }

    pub(crate) fn regenerate(&mut self) {
        let connected = self.is_connected();
        let (start, end) = (self.start_angle, self.end_angle);
        let n = self.resolution;
        let mut anchors = Vec::with_capacity(2 * n + 3);

        push_arc(&mut anchors, self.outer_radius, start, end, n, Command::Move);
        let outer_start = anchors[0].origin;

        if self.is_punctured() {
            if connected {
                anchors.push(Anchor::new(outer_start, Command::Close));
                push_arc(&mut anchors, self.inner_radius, end, start, n, Command::Move);
                let inner_start = anchors[n + 1].origin;
                anchors.push(Anchor::new(inner_start, Command::Close));
            } else {
                push_arc(&mut anchors, self.inner_radius, end, start, n, Command::Line);
                anchors.push(Anchor::new(outer_start, Command::Close));
            }
        } else {
            if !connected {
                anchors.push(Anchor::new(G20::vector(0.0, 0.0), Command::Line));
            }
            anchors.push(Anchor::new(outer_start, Command::Close));
        }

        self.path = Path::new(anchors, true, true);
    }
}

/// Append `count` anchors on the circle of `radius` from angle `from` to `to`.
///
/// The lead anchor has no handles. Every following anchor is a curve whose
/// handles are tangent with length `amp = radius · step / π`. The handle
/// entering the second anchor and the one leaving the last anchor are
/// doubled, since the lead anchor contributes no outgoing handle.
fn push_arc(anchors: &mut Vec<Anchor>, radius: f64, from: f64, to: f64, count: usize, lead: Command) {
    let last = count - 1;
    let step = (to - from) / last as f64;
    let amp = radius * step / PI;

    for i in 0..count {
        let theta = from + step * i as f64;
        let (sin, cos) = theta.sin_cos();
        let origin = G20::vector(radius * cos, radius * sin);
        if i == 0 {
            anchors.push(Anchor::new(origin, lead));
            continue;
        }
        let mut left = G20::vector(amp * sin, -amp * cos);
        let mut right = G20::vector(-amp * sin, amp * cos);
        if i == 1 {
            left.scale(2.0);
        }
        if i == last {
            right.scale(2.0);
        }
        anchors.push(Anchor::with_controls(origin, left, right, Command::Curve));
    }
}

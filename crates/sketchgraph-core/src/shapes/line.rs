//! Line segment.

use crate::algebra::G20;
use crate::error::{SceneError, SceneResult};
use crate::path::{Anchor, Command, Path};

/// A straight segment between two points in the node's local space.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    start: G20,
    end: G20,
    path: Path,
}

impl Line {
    /// A segment between two points; only the vector parts are used.
    pub fn new(start: G20, end: G20) -> SceneResult<Self> {
        let mut line = Self {
            start: endpoint("start", start)?,
            end: endpoint("end", end)?,
            path: Path::default(),
        };
        line.regenerate();
        Ok(line)
    }

    pub fn start(&self) -> G20 {
        self.start
    }

    pub fn end(&self) -> G20 {
        self.end
    }

    /// Distance between the endpoints.
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Generated `move, line` pair.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the endpoint moved. Non-finite points are rejected.
    pub fn set_start(&mut self, start: G20) -> SceneResult<bool> {
        let start = endpoint("start", start)?;
        Ok(std::mem::replace(&mut self.start, start) != start)
    }

    /// Returns whether the endpoint moved. Non-finite points are rejected.
    pub fn set_end(&mut self, end: G20) -> SceneResult<bool> {
        let end = endpoint("end", end)?;
        Ok(std::mem::replace(&mut self.end, end) != end)
    }

    pub(crate) fn regenerate(&mut self) {
        let anchors = vec![
            Anchor::new(self.start, Command::Move),
            Anchor::new(self.end, Command::Line),
        ];
        self.path = Path::new(anchors, false, false);
    }
}

fn endpoint(property: &'static str, point: G20) -> SceneResult<G20> {
    if point.is_finite() {
        Ok(G20::vector(point.x(), point.y()))
    } else {
        Err(SceneError::InvalidValue {
            property,
            value: f64::NAN,
        })
    }
}

//! Rectangle shape.

use crate::algebra::G20;
use crate::error::{SceneResult, non_negative};
use crate::path::{Anchor, Command, Path};

/// An axis-aligned rectangle centred on the node origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    width: f64,
    height: f64,
    path: Path,
}

impl Rectangle {
    /// A rectangle centred on the origin.
    pub fn new(width: f64, height: f64) -> SceneResult<Self> {
        let mut rect = Self {
            width: non_negative("width", width)?,
            height: non_negative("height", height)?,
            path: Path::default(),
        };
        rect.regenerate();
        Ok(rect)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Four `line` anchors, closed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the width changed; negative widths are rejected.
    pub fn set_width(&mut self, width: f64) -> SceneResult<bool> {
        let width = non_negative("width", width)?;
        Ok(std::mem::replace(&mut self.width, width) != width)
    }

    /// Returns whether the height changed; negative heights are rejected.
    pub fn set_height(&mut self, height: f64) -> SceneResult<bool> {
        let height = non_negative("height", height)?;
        Ok(std::mem::replace(&mut self.height, height) != height)
    }

    pub(crate) fn regenerate(&mut self) {
        let (w, h) = (self.width / 2.0, self.height / 2.0);
        let corners = [(-w, -h), (w, -h), (w, h), (-w, h)];
        let anchors = corners
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| {
                let command = if i == 0 { Command::Move } else { Command::Line };
                Anchor::new(G20::vector(x, y), command)
            })
            .collect();
        self.path = Path::new(anchors, true, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    #[test]
    fn test_bounds_centred() {
        let rect = Rectangle::new(20.0, 10.0).unwrap();
        assert_eq!(rect.path().len(), 4);
        assert_eq!(
            rect.path().bounding_box(),
            Some(Rect::new(-10.0, -5.0, 10.0, 5.0))
        );
    }

    #[test]
    fn test_setters() {
        let mut rect = Rectangle::new(1.0, 1.0).unwrap();
        assert!(!rect.set_width(1.0).unwrap());
        assert!(rect.set_height(4.0).unwrap());
        assert!(rect.set_width(f64::NAN).is_err());
    }
}

//! The display surface a stage renders into.

use kurbo::Size;
use thiserror::Error;

use crate::observable::Signal;
use crate::scene::{FrameChanges, Scene};

/// Errors raised by a surface implementation.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface unavailable: {0}")]
    Unavailable(String),
    #[error("render failed: {0}")]
    RenderFailed(String),
}

/// A place pixels (or markup) end up. Implemented outside the core.
pub trait RenderSurface {
    /// Resize the surface; implementations publish the new size on
    /// [`size_changes`](Self::size_changes).
    fn set_size(&mut self, size: Size);

    fn size(&self) -> Size;

    /// Stream of size changes, including ones the host makes on its own.
    fn size_changes(&self) -> Signal<Size>;

    /// Draw the frame described by `changes`.
    fn render_now(&mut self, scene: &Scene, changes: &FrameChanges) -> Result<(), SurfaceError>;
}

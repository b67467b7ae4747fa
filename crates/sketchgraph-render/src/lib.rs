//! Sketchgraph Render Library
//!
//! The renderer side of a sketchgraph frame: the [`Renderer`] trait a
//! backend implements, the [`render_frame`] driver, and two debug
//! collaborators that never rasterize: [`RecordingRenderer`] and
//! [`HeadlessSurface`].

mod headless;
mod recorder;
mod renderer;

pub use headless::HeadlessSurface;
pub use recorder::{FrameLog, FrameRecord, NodeRecord, PaintRecord, RecordingRenderer};
pub use renderer::{
    DEFAULT_BACKGROUND, RenderContext, RenderResult, Renderer, RendererError, render_frame,
};

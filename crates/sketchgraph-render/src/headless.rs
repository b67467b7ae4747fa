//! A render surface with no display, driving any [`Renderer`].

use kurbo::Size;
use peniko::Color;
use sketchgraph_core::{FrameChanges, Observable, RenderSurface, Scene, Signal, SurfaceError};

use crate::renderer::{DEFAULT_BACKGROUND, RenderContext, Renderer};

/// Off-screen surface: tracks its size and forwards frames to a renderer.
pub struct HeadlessSurface<R: Renderer> {
    size: Observable<Size>,
    background: Color,
    renderer: R,
    frames: usize,
}

impl<R: Renderer> HeadlessSurface<R> {
    pub fn new(size: Size, renderer: R) -> Self {
        Self {
            size: Observable::new(size),
            background: DEFAULT_BACKGROUND,
            renderer,
            frames: 0,
        }
    }

    /// Clear color handed to the renderer with every frame.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl<R: Renderer> RenderSurface for HeadlessSurface<R> {
    fn set_size(&mut self, size: Size) {
        if self.size.set(size) {
            log::debug!("headless surface resized to {}x{}", size.width, size.height);
        }
    }

    fn size(&self) -> Size {
        self.size.get()
    }

    fn size_changes(&self) -> Signal<Size> {
        self.size.signal()
    }

    fn render_now(&mut self, scene: &Scene, changes: &FrameChanges) -> Result<(), SurfaceError> {
        let ctx = RenderContext::new(scene, changes, self.size.get()).with_background(self.background);
        self.renderer
            .build_scene(&ctx)
            .map_err(|e| SurfaceError::RenderFailed(e.to_string()))?;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingRenderer;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_size_stream() {
        let mut surface = HeadlessSurface::new(Size::new(1.0, 1.0), RecordingRenderer::new());
        let seen = Rc::new(Cell::new(Size::ZERO));
        let sink = Rc::clone(&seen);
        let _sub = surface.size_changes().subscribe(move |s| sink.set(*s));

        surface.set_size(Size::new(4.0, 3.0));
        assert_eq!(seen.get(), Size::new(4.0, 3.0));
        assert_eq!(surface.size(), Size::new(4.0, 3.0));
    }

    #[test]
    fn test_render_now_forwards_to_renderer() {
        let mut scene = Scene::new();
        let changes = scene.update();
        let mut surface = HeadlessSurface::new(Size::new(1.0, 1.0), RecordingRenderer::new());
        surface.render_now(&scene, &changes).unwrap();
        assert_eq!(surface.frames(), 1);
        assert_eq!(surface.renderer().log().len(), 1);
    }

    #[test]
    fn test_frames_carry_surface_size_and_background() {
        let mut scene = Scene::new();
        let changes = scene.update();
        let navy = Color::from_rgba8(0, 0, 128, 255);
        let mut surface =
            HeadlessSurface::new(Size::new(32.0, 16.0), RecordingRenderer::new()).with_background(navy);
        surface.render_now(&scene, &changes).unwrap();

        let frame = surface.renderer().log().last().unwrap();
        assert_eq!(frame.viewport_size, Size::new(32.0, 16.0));
        assert_eq!(frame.background, sketchgraph_core::SerializableColor::new(0, 0, 128, 255));
    }
}

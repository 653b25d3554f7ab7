//! Drawing surface abstraction.
//!
//! The field issues a handful of immediate-mode draw calls per frame. Any
//! backend that can fill a disc, fill a radial glow and stroke a line can
//! display it:
//!
//! - [`GpuCanvas`](crate::gpu::GpuCanvas) draws into a window with wgpu.
//! - [`RasterCanvas`](crate::raster::RasterCanvas) rasterises into an image.
//! - [`RecordingCanvas`] keeps the calls for inspection.
//! - [`NullCanvas`] drops them.
//!
//! Colours are straight (non-premultiplied) RGBA with components in 0.0-1.0.

use glam::{Vec2, Vec4};

/// Immediate-mode drawing target for one frame.
pub trait Canvas {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Fill a solid disc.
    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4);

    /// Fill a radial gradient from `color` at the centre to transparent at `radius`.
    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Vec4);

    /// Stroke a straight line of the given width.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4) {
        (**self).fill_disc(center, radius, color);
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Vec4) {
        (**self).fill_glow(center, radius, color);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        (**self).stroke_line(from, to, width, color);
    }
}

/// A single recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear,
    Disc { center: Vec2, radius: f32, color: Vec4 },
    Glow { center: Vec2, radius: f32, color: Vec4 },
    Line { from: Vec2, to: Vec2, width: f32, color: Vec4 },
}

/// Canvas that records every call in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since creation or the last [`take`](Self::take).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Remove and return the recorded calls.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded line strokes.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Recorded disc fills.
    pub fn discs(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.commands.push(DrawCommand::Disc { center, radius, color });
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.commands.push(DrawCommand::Glow { center, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }
}

/// Canvas that discards everything. Useful for headless stepping and benchmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn clear(&mut self) {}
    fn fill_disc(&mut self, _center: Vec2, _radius: f32, _color: Vec4) {}
    fn fill_glow(&mut self, _center: Vec2, _radius: f32, _color: Vec4) {}
    fn stroke_line(&mut self, _from: Vec2, _to: Vec2, _width: f32, _color: Vec4) {}
}

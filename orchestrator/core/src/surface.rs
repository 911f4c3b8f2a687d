//! Drawable Surface Contract
//!
//! The minimal 2-D drawing API the particle animators need from a host:
//! integer pixel dimensions, a full-surface fill (used for trail fading),
//! filled circles and stroked lines. The terminal surface implements this
//! on a cell grid; [`RecordingSurface`] captures operations for tests.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of a surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl SurfaceSize {
    /// Create a new size
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether anything can be drawn at this size
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Center point in pixel coordinates
    #[must_use]
    pub fn center(self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Whether a point lies strictly inside the drawable area
    #[must_use]
    pub fn contains(self, x: f32, y: f32) -> bool {
        x.is_finite()
            && y.is_finite()
            && x >= 0.0
            && y >= 0.0
            && x < self.width as f32
            && y < self.height as f32
    }
}

/// Straight (non-premultiplied) color with alpha
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha (0.0 = transparent, 1.0 = opaque)
    pub a: f32,
}

impl Rgba {
    /// Opaque color
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha, clamped to 0..=1
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Solid black
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Solid white
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// The signature cyan of the warp streaks (#0ed8d9)
    pub const COSMIC_CYAN: Self = Self::rgb(14, 216, 217);
}

/// Host-provided 2-D drawing surface
pub trait DrawSurface {
    /// Current pixel dimensions
    fn size(&self) -> SurfaceSize;

    /// Fill the whole surface. A translucent color fades previous content.
    fn fill(&mut self, color: Rgba);

    /// Draw a filled circle centred at (x, y)
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);

    /// Draw a stroked line segment
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba);
}

/// A single recorded drawing call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Full-surface fill
    Fill(Rgba),
    /// Filled circle
    Circle {
        /// Center x
        x: f32,
        /// Center y
        y: f32,
        /// Radius in pixels
        radius: f32,
        /// Fill color
        color: Rgba,
    },
    /// Stroked line
    Line {
        /// Start point
        from: (f32, f32),
        /// End point
        to: (f32, f32),
        /// Stroke width
        width: f32,
        /// Stroke color
        color: Rgba,
    },
}

/// A surface that records every drawing call instead of rasterizing
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    size: SurfaceSize,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Create a recording surface of the given size
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            ops: Vec::new(),
        }
    }

    /// All recorded operations, oldest first
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop recorded operations
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Change the reported size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = SurfaceSize::new(width, height);
    }

    /// Number of circle and line primitives recorded
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| !matches!(op, DrawOp::Fill(_)))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Fill(color));
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::Circle {
            x,
            y,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }
}

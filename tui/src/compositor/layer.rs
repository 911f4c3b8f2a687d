//! Layer - A single compositable layer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::LayerId;

/// A single layer in the compositor
pub struct Layer {
    /// Unique identifier
    pub id: LayerId,
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Position and size
    pub bounds: Rect,
    /// Whether the layer is visible
    pub visible: bool,
    /// The layer's render buffer
    pub buffer: Buffer,
    /// Share of cells drawn (0.0 = invisible, 1.0 = solid), dithered
    pub opacity: f32,
    /// Opaque layers also copy blank cells, hiding everything below
    pub opaque: bool,
}

impl Layer {
    /// Create a new layer
    pub fn new(id: LayerId, bounds: Rect, z_index: i32) -> Self {
        // Buffer uses origin coordinates (0,0) internally
        // The bounds store the screen position for compositing
        let buffer_area = Rect::new(0, 0, bounds.width, bounds.height);
        Self {
            id,
            z_index,
            bounds,
            visible: true,
            buffer: Buffer::empty(buffer_area),
            opacity: 1.0,
            opaque: false,
        }
    }

    /// Check if a point is within this layer's bounds
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.bounds.x
            && x < self.bounds.x.saturating_add(self.bounds.width)
            && y >= self.bounds.y
            && y < self.bounds.y.saturating_add(self.bounds.height)
    }

    /// Whether the cell at screen position `(x, y)` survives the dither
    pub fn covers(&self, x: u16, y: u16) -> bool {
        if self.opacity >= 1.0 {
            return true;
        }
        if self.opacity <= 0.0 {
            return false;
        }
        let threshold = BAYER_4X4[usize::from(y % 4)][usize::from(x % 4)];
        (f32::from(threshold) + 0.5) / 16.0 < self.opacity
    }
}

/// Ordered-dither thresholds
const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(opacity: f32) -> Layer {
        let mut layer = Layer::new(LayerId(0), Rect::new(2, 2, 8, 8), 0);
        layer.opacity = opacity;
        layer
    }

    fn covered(layer: &Layer) -> usize {
        (0..4u16)
            .flat_map(|y| (0..4u16).map(move |x| (x, y)))
            .filter(|&(x, y)| layer.covers(x, y))
            .count()
    }

    #[test]
    fn test_contains() {
        let layer = layer(1.0);
        assert!(layer.contains(2, 2));
        assert!(layer.contains(9, 9));
        assert!(!layer.contains(10, 9));
        assert!(!layer.contains(1, 5));
    }

    #[test]
    fn test_dither_tracks_opacity() {
        assert_eq!(covered(&layer(1.0)), 16);
        assert_eq!(covered(&layer(0.5)), 8);
        assert_eq!(covered(&layer(0.25)), 4);
        assert_eq!(covered(&layer(0.0)), 0);
    }
}

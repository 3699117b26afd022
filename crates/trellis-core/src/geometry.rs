// crates/trellis-core/src/geometry.rs
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in panel-local coordinates.
///
/// Width and height are never negative. A zero-area rect is legal and is
/// treated like any other by the overlap test.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn from_pos_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Two rects overlap unless one lies entirely left of, right of, above
    /// or below the other. Shared edges do not count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(other.x >= self.right()
            || other.right() <= self.x
            || other.y >= self.bottom()
            || other.bottom() <= self.y)
    }
}

/// `(max right, max bottom)` over all rects, or zero for an empty slice.
pub fn bounding_extent(rects: &[Rect]) -> Vec2 {
    rects.iter().fold(Vec2::ZERO, |extent, rect| {
        Vec2::new(extent.x.max(rect.right()), extent.y.max(rect.bottom()))
    })
}

/// Replace non-finite axes of `size` with the matching axis of `fallback`.
pub fn resolve_unbounded(size: Vec2, fallback: Vec2) -> Vec2 {
    Vec2::new(
        if size.x.is_finite() { size.x } else { fallback.x },
        if size.y.is_finite() { size.y } else { fallback.y },
    )
}

// crates/trellis-layout/src/constraints.rs

use glam::Vec2;

/// The space offered to a panel by its host for one layout pass.
/// Either axis may be unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintBox {
    pub max_width: f32,
    pub max_height: f32,
}

impl Default for ConstraintBox {
    fn default() -> Self {
        Self {
            max_width: f32::INFINITY,
            max_height: f32::INFINITY,
        }
    }
}

impl ConstraintBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_size(width: f32, height: f32) -> Self {
        Self {
            max_width: width,
            max_height: height,
        }
    }

    pub fn from_available(available: Vec2) -> Self {
        Self::with_max_size(available.x, available.y)
    }

    pub fn available(&self) -> Vec2 {
        Vec2::new(self.max_width, self.max_height)
    }

    pub fn is_width_constrained(&self) -> bool {
        self.max_width.is_finite()
    }

    pub fn is_height_constrained(&self) -> bool {
        self.max_height.is_finite()
    }

    /// Available size with unbounded axes replaced by `fallback`.
    pub fn resolve(&self, fallback: Vec2) -> Vec2 {
        trellis_core::resolve_unbounded(self.available(), fallback)
    }

    /// Final size for the arrange pass that follows a measure: bounded axes
    /// keep the offered extent, unbounded axes take what measure asked for.
    pub fn arrange_size(&self, desired: Vec2) -> Vec2 {
        Vec2::new(
            if self.is_width_constrained() { self.max_width } else { desired.x },
            if self.is_height_constrained() { self.max_height } else { desired.y },
        )
    }
}

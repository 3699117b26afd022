// crates/trellis-layout/src/orientation.rs

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Extent of `size` along this orientation.
    pub fn main(&self, size: Vec2) -> f32 {
        match self {
            Orientation::Horizontal => size.x,
            Orientation::Vertical => size.y,
        }
    }

    pub fn cross(&self, size: Vec2) -> f32 {
        match self {
            Orientation::Horizontal => size.y,
            Orientation::Vertical => size.x,
        }
    }

    /// Build a vector from main-axis and cross-axis components.
    pub fn compose(&self, main: f32, cross: f32) -> Vec2 {
        match self {
            Orientation::Horizontal => Vec2::new(main, cross),
            Orientation::Vertical => Vec2::new(cross, main),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_round_trip() {
        let size = Vec2::new(400.0, 300.0);
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let main = orientation.main(size);
            let cross = orientation.cross(size);
            assert_eq!(orientation.compose(main, cross), size);
        }
        assert_eq!(Orientation::Vertical.main(size), 300.0);
    }
}

// crates/trellis-layout/src/vanishing_point.rs
//! Perspective stack: children shrink (or grow) geometrically toward a
//! vanishing point at the top of the panel.

use glam::Vec2;
use trellis_core::{LayoutChild, LayoutError, Rect, Result};

use crate::{ConstraintBox, LayoutResult, MeasureResult, Panel, PanelKind};

/// Back-to-front position of the child at `input_index`: the last child is
/// drawn first (farthest), the first child last (nearest).
pub fn render_index(input_index: usize, child_count: usize) -> usize {
    child_count - 1 - input_index
}

/// Rect for the child at render index `k`.
pub fn perspective_rect(panel_size: Vec2, z_factor: f32, item_height: f32, k: usize) -> Rect {
    let scale = z_factor.powi(k as i32);
    let item_size = Vec2::new(panel_size.x * scale, item_height * scale);
    let left = (panel_size.x - item_size.x) * 0.5;

    let stacked: f32 = (0..=k).map(|j| z_factor.powi(j as i32) * item_height).sum();
    let top = panel_size.y - stacked;

    Rect::from_pos_size(Vec2::new(left, top), item_size)
}

/// Rects for `child_count` children, returned in input order.
pub fn stack(child_count: usize, panel_size: Vec2, z_factor: f32, item_height: f32) -> Vec<Rect> {
    (0..child_count)
        .map(|index| perspective_rect(panel_size, z_factor, item_height, render_index(index, child_count)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct VanishingPointPanel {
    z_factor: f32,
    item_height: f32,
}

impl Default for VanishingPointPanel {
    fn default() -> Self {
        Self {
            z_factor: 1.0,
            item_height: 0.0,
        }
    }
}

impl VanishingPointPanel {
    pub fn new(z_factor: f32, item_height: f32) -> Result<Self> {
        let mut panel = Self::default();
        panel.set_z_factor(z_factor)?;
        panel.set_item_height(item_height)?;
        Ok(panel)
    }

    pub fn z_factor(&self) -> f32 {
        self.z_factor
    }

    pub fn set_z_factor(&mut self, z_factor: f32) -> Result<()> {
        if !z_factor.is_finite() || z_factor < 0.0 {
            return Err(LayoutError::invalid_property(
                "z_factor",
                format!("{} is not a finite, non-negative scale", z_factor),
            ));
        }
        self.z_factor = z_factor;
        Ok(())
    }

    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    pub fn set_item_height(&mut self, item_height: f32) -> Result<()> {
        if !item_height.is_finite() || item_height < 0.0 {
            return Err(LayoutError::invalid_property(
                "item_height",
                format!("{} is not a finite, non-negative height", item_height),
            ));
        }
        self.item_height = item_height;
        Ok(())
    }
}

impl Panel for VanishingPointPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::VanishingPoint
    }

    /// Every child is measured at the unscaled item size; perspective is
    /// applied only when arranging.
    fn measure(&mut self, children: &[LayoutChild], available: Vec2) -> Result<MeasureResult> {
        let width = ConstraintBox::from_available(available).resolve(Vec2::ZERO).x;
        let child_size = Vec2::new(width, self.item_height);

        Ok(MeasureResult {
            desired_size: Vec2::new(width, self.item_height * children.len() as f32),
            child_sizes: vec![child_size; children.len()],
        })
    }

    fn arrange(&mut self, children: &[LayoutChild], final_size: Vec2) -> Result<LayoutResult> {
        let rects = stack(children.len(), final_size, self.z_factor, self.item_height);
        Ok(LayoutResult::from_rects(children, rects, final_size))
    }
}

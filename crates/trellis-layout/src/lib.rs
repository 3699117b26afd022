// crates/trellis-layout/src/lib.rs

use glam::Vec2;
use serde::Serialize;
use trellis_core::{ChildId, LayoutChild, Rect, Result};

pub mod adaptive_grid;
pub mod config;
pub mod constraints;
pub mod flow_grid;
pub mod host;
pub mod orientation;
pub mod trigger;
pub mod vanishing_point;
pub mod variable_grid;
pub mod weighted;

pub use adaptive_grid::*;
pub use config::*;
pub use constraints::*;
pub use flow_grid::*;
pub use host::*;
pub use orientation::*;
pub use trigger::*;
pub use vanishing_point::*;
pub use variable_grid::*;
pub use weighted::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelKind {
    FlowGrid,
    Weighted,
    VanishingPoint,
    VariableSizedGrid,
    AdaptiveGrid,
}

/// Outcome of a measure pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureResult {
    /// Size the panel asks its container for.
    pub desired_size: Vec2,
    /// Size each child was measured with, in input order.
    pub child_sizes: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub id: ChildId,
    pub rect: Rect,
}

/// Outcome of an arrange pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LayoutResult {
    /// One placement per child, in input order.
    pub placements: Vec<Placement>,
    /// Size the panel reports back after arranging.
    pub size: Vec2,
}

impl LayoutResult {
    pub fn from_rects(children: &[LayoutChild], rects: Vec<Rect>, size: Vec2) -> Self {
        let placements = children
            .iter()
            .zip(rects)
            .map(|(child, rect)| Placement { id: child.id, rect })
            .collect();
        Self { placements, size }
    }

    pub fn rect_of(&self, id: ChildId) -> Option<Rect> {
        self.placements
            .iter()
            .find(|placement| placement.id == id)
            .map(|placement| placement.rect)
    }

    pub fn rects(&self) -> Vec<Rect> {
        self.placements.iter().map(|placement| placement.rect).collect()
    }
}

/// A two-pass layout algorithm.
///
/// `arrange` must be called with the same children, in the same order, as
/// the measure that precedes it. Panels may cache whatever measure resolved
/// and reuse it in arrange; [`Panel::invalidate`] drops any such cache.
pub trait Panel {
    fn kind(&self) -> PanelKind;

    fn measure(&mut self, children: &[LayoutChild], available: Vec2) -> Result<MeasureResult>;

    fn arrange(&mut self, children: &[LayoutChild], final_size: Vec2) -> Result<LayoutResult>;

    fn invalidate(&mut self) {}
}

impl<P: Panel + ?Sized> Panel for Box<P> {
    fn kind(&self) -> PanelKind {
        (**self).kind()
    }

    fn measure(&mut self, children: &[LayoutChild], available: Vec2) -> Result<MeasureResult> {
        (**self).measure(children, available)
    }

    fn arrange(&mut self, children: &[LayoutChild], final_size: Vec2) -> Result<LayoutResult> {
        (**self).arrange(children, final_size)
    }

    fn invalidate(&mut self) {
        (**self).invalidate()
    }
}

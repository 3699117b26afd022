// crates/trellis-layout/src/weighted.rs

use glam::Vec2;
use tracing::trace;
use trellis_core::{LayoutChild, LayoutError, Rect, Result};

use crate::{ConstraintBox, LayoutResult, MeasureResult, Orientation, Panel, PanelKind};

/// Each weight divided by the total. Fails on a negative or non-finite
/// weight, or when the total is not positive.
pub fn normalize_weights(children: &[LayoutChild]) -> Result<Vec<f32>> {
    let mut weights = Vec::with_capacity(children.len());
    for child in children {
        let weight = child.hints.weight().ok_or_else(|| LayoutError::InvalidHint {
            child: child.id,
            key: trellis_core::HintKey::Weight,
            reason: "expected a number".to_string(),
        })?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(LayoutError::DegenerateWeights {
                child: Some(child.id),
                sum: weight,
            });
        }
        weights.push(weight);
    }

    let sum: f32 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(LayoutError::DegenerateWeights { child: None, sum });
    }

    Ok(weights.into_iter().map(|weight| weight / sum).collect())
}

/// Split `extent` along `orientation` in proportion to each child's weight.
/// Each child gets the full extent on the cross axis.
pub fn partition(children: &[LayoutChild], orientation: Orientation, extent: Vec2) -> Result<Vec<Rect>> {
    if children.is_empty() {
        return Ok(Vec::new());
    }

    let fractions = normalize_weights(children)?;
    let main_extent = orientation.main(extent);
    let cross_extent = orientation.cross(extent);
    let mut offset = 0.0;

    let rects = fractions
        .into_iter()
        .map(|fraction| {
            let length = main_extent * fraction;
            let rect = Rect::from_pos_size(
                orientation.compose(offset, 0.0),
                orientation.compose(length, cross_extent),
            );
            offset += length;
            rect
        })
        .collect();

    trace!(?orientation, main_extent, "partitioned weights");
    Ok(rects)
}

/// Splitter-style panel sharing its extent between children by weight.
#[derive(Debug, Clone, Default)]
pub struct WeightedPanel {
    orientation: Orientation,
}

impl WeightedPanel {
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }
}

impl Panel for WeightedPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Weighted
    }

    fn measure(&mut self, children: &[LayoutChild], available: Vec2) -> Result<MeasureResult> {
        let rects = partition(children, self.orientation, available)?;
        Ok(MeasureResult {
            desired_size: ConstraintBox::from_available(available).resolve(Vec2::ZERO),
            child_sizes: rects.iter().map(Rect::size).collect(),
        })
    }

    fn arrange(&mut self, children: &[LayoutChild], final_size: Vec2) -> Result<LayoutResult> {
        let rects = partition(children, self.orientation, final_size)?;
        Ok(LayoutResult::from_rects(children, rects, final_size))
    }
}

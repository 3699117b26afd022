// crates/trellis-layout/src/adaptive_grid.rs
//! Grid whose column and row definitions are rebuilt from its width:
//! fewer columns below a breakpoint, more above it.

use glam::Vec2;
use serde::Serialize;
use tracing::debug;
use trellis_core::{HintKey, LayoutChild, LayoutError, Rect, Result};

use crate::{ConstraintBox, LayoutResult, MeasureResult, Panel, PanelKind};

/// One grid track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Track {
    /// Proportional share of the space left over by pixel tracks.
    Star(f32),
    /// Fixed length.
    Pixel(f32),
}

impl Track {
    fn fixed(&self) -> f32 {
        match self {
            Track::Pixel(length) => *length,
            Track::Star(_) => 0.0,
        }
    }

    fn stars(&self) -> f32 {
        match self {
            Track::Star(weight) => *weight,
            Track::Pixel(_) => 0.0,
        }
    }
}

/// `(offset, length)` of each track laid out along `extent`.
pub fn track_spans(tracks: &[Track], extent: f32) -> Vec<(f32, f32)> {
    let fixed: f32 = tracks.iter().map(Track::fixed).sum();
    let stars: f32 = tracks.iter().map(Track::stars).sum();
    let remaining = (extent - fixed).max(0.0);
    let per_star = if stars > 0.0 { remaining / stars } else { 0.0 };

    let mut offset = 0.0;
    tracks
        .iter()
        .map(|track| {
            let length = match track {
                Track::Pixel(length) => *length,
                Track::Star(weight) => weight * per_star,
            };
            let span = (offset, length);
            offset += length;
            span
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridDefinitions {
    pub columns: Vec<Track>,
    pub rows: Vec<Track>,
}

impl GridDefinitions {
    /// Sum of the fixed row lengths.
    pub fn fixed_height(&self) -> f32 {
        self.rows.iter().map(Track::fixed).sum()
    }
}

#[derive(Debug, Clone)]
pub struct AdaptiveGrid {
    pub breakpoint: f32,
    pub aspect_ratio: f32,
    pub row_count: u32,
    pub narrow_columns: u32,
    pub wide_columns: u32,
    current: Option<GridDefinitions>,
}

impl Default for AdaptiveGrid {
    fn default() -> Self {
        Self {
            breakpoint: 500.0,
            aspect_ratio: 0.5,
            row_count: 2,
            narrow_columns: 2,
            wide_columns: 3,
            current: None,
        }
    }
}

impl AdaptiveGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.narrow_columns == 0 || self.wide_columns == 0 {
            return Err(LayoutError::invalid_property("columns", "column counts must be at least 1"));
        }
        if !self.aspect_ratio.is_finite() || self.aspect_ratio < 0.0 {
            return Err(LayoutError::invalid_property(
                "aspect_ratio",
                format!("{} is not a finite, non-negative ratio", self.aspect_ratio),
            ));
        }
        Ok(())
    }

    /// Definitions for a grid `width` wide, or `None` when the width is not
    /// positive and the current definitions should stay as they are.
    pub fn definitions(&self, width: f32) -> Option<GridDefinitions> {
        if width.is_nan() || width <= 0.0 {
            return None;
        }

        let columns = if width < self.breakpoint {
            self.narrow_columns
        } else {
            self.wide_columns
        };
        let item_height = width / columns.max(1) as f32 * self.aspect_ratio;

        Some(GridDefinitions {
            columns: vec![Track::Star(1.0); columns as usize],
            rows: vec![Track::Pixel(item_height); self.row_count as usize],
        })
    }

    /// Definitions currently applied.
    pub fn current(&self) -> Option<&GridDefinitions> {
        self.current.as_ref()
    }

    fn refresh(&mut self, width: f32) {
        if let Some(definitions) = self.definitions(width) {
            if self.current.as_ref() != Some(&definitions) {
                debug!(width, columns = definitions.columns.len(), "rebuilt adaptive grid definitions");
            }
            self.current = Some(definitions);
        }
    }

    fn cell_index(child: &LayoutChild, key: HintKey, track_count: usize) -> Result<usize> {
        let Some(value) = child.hints.get(key) else {
            return Ok(0);
        };
        let index = value.as_int().ok_or_else(|| LayoutError::InvalidHint {
            child: child.id,
            key,
            reason: format!("expected an integer, got {:?}", value),
        })?;
        Ok(index.clamp(0, track_count.saturating_sub(1) as i64) as usize)
    }

    fn place(&self, children: &[LayoutChild], size: Vec2) -> Result<Vec<Rect>> {
        let Some(definitions) = &self.current else {
            return Ok(vec![Rect::ZERO; children.len()]);
        };
        let columns = track_spans(&definitions.columns, size.x);
        let rows = track_spans(&definitions.rows, size.y);
        if columns.is_empty() || rows.is_empty() {
            return Ok(vec![Rect::ZERO; children.len()]);
        }

        children
            .iter()
            .map(|child| {
                let (x, width) = columns[Self::cell_index(child, HintKey::GridColumn, columns.len())?];
                let (y, height) = rows[Self::cell_index(child, HintKey::GridRow, rows.len())?];
                Ok(Rect::new(x, y, width, height))
            })
            .collect()
    }
}

impl Panel for AdaptiveGrid {
    fn kind(&self) -> PanelKind {
        PanelKind::AdaptiveGrid
    }

    fn measure(&mut self, children: &[LayoutChild], available: Vec2) -> Result<MeasureResult> {
        self.validate()?;
        let width = ConstraintBox::from_available(available).resolve(Vec2::ZERO).x;
        self.refresh(width);

        let height = self.current.as_ref().map_or(0.0, GridDefinitions::fixed_height);
        let desired_size = if self.current.is_some() { Vec2::new(width, height) } else { Vec2::ZERO };
        let rects = self.place(children, desired_size)?;

        Ok(MeasureResult {
            desired_size,
            child_sizes: rects.iter().map(Rect::size).collect(),
        })
    }

    /// Definitions follow the arranged width, the way they would follow the
    /// grid's bounds once it is placed.
    fn arrange(&mut self, children: &[LayoutChild], final_size: Vec2) -> Result<LayoutResult> {
        self.validate()?;
        self.refresh(final_size.x);
        let rects = self.place(children, final_size)?;
        Ok(LayoutResult::from_rects(children, rects, final_size))
    }
}

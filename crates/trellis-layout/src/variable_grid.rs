// crates/trellis-layout/src/variable_grid.rs
//! Variable-sized grid: children of mixed spans dropped into the first free
//! cell, scanning row-major (horizontal) or column-major (vertical).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trellis_core::{bounding_extent, ChildId, HintKey, LayoutChild, LayoutError, Rect, Result};

use crate::{resolve_span, ConstraintBox, LayoutResult, MeasureResult, Orientation, Panel, PanelKind, ResolvedSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyItem {
    pub id: ChildId,
    pub span: ResolvedSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GreedyPacking {
    /// Placed rects in input order.
    pub rects: Vec<Rect>,
    /// `(max right, max bottom)` over all placed rects.
    pub extent: Vec2,
}

fn bounded_span(span: ResolvedSpan, orientation: Orientation) -> u32 {
    match orientation {
        Orientation::Horizontal => span.column_span,
        Orientation::Vertical => span.row_span,
    }
}

fn unbounded_span(span: ResolvedSpan, orientation: Orientation) -> u32 {
    match orientation {
        Orientation::Horizontal => span.row_span,
        Orientation::Vertical => span.column_span,
    }
}

/// Place each item at the first cell where it overlaps nothing placed so far.
///
/// Horizontal scans rows (unbounded) then `max_rows_or_columns` columns;
/// vertical scans columns then rows. A candidate must lie within the bounded
/// dimension. Every item is checked against the
/// bounded dimension up front, which makes the scan provably finite: an item
/// always fits at the start of the line just past everything already placed.
pub fn pack_greedy(
    items: &[GreedyItem],
    max_rows_or_columns: u32,
    orientation: Orientation,
    cell_size: Vec2,
) -> Result<GreedyPacking> {
    if max_rows_or_columns == 0 {
        return Err(LayoutError::invalid_property(
            "max_rows_or_columns",
            "must be at least 1",
        ));
    }

    for item in items {
        let span = bounded_span(item.span, orientation);
        if span > max_rows_or_columns {
            return Err(LayoutError::SpanExceedsCapacity {
                child: item.id,
                span,
                capacity: max_rows_or_columns,
            });
        }
    }

    let line_bound = items
        .iter()
        .map(|item| unbounded_span(item.span, orientation) as u64)
        .sum::<u64>()
        + 1;

    let mut occupancy: Vec<Rect> = Vec::with_capacity(items.len());
    for item in items {
        let size = Vec2::new(
            cell_size.x * item.span.column_span as f32,
            cell_size.y * item.span.row_span as f32,
        );
        let reach = bounded_span(item.span, orientation) as u64;
        let rect = first_fit(&occupancy, max_rows_or_columns, orientation, cell_size, size, reach, line_bound)
            .ok_or(LayoutError::SpanExceedsCapacity {
                child: item.id,
                span: bounded_span(item.span, orientation),
                capacity: max_rows_or_columns,
            })?;
        occupancy.push(rect);
    }

    let extent = bounding_extent(&occupancy);
    Ok(GreedyPacking {
        rects: occupancy,
        extent,
    })
}

fn first_fit(
    occupancy: &[Rect],
    max_rows_or_columns: u32,
    orientation: Orientation,
    cell_size: Vec2,
    size: Vec2,
    reach: u64,
    line_bound: u64,
) -> Option<Rect> {
    let capacity = max_rows_or_columns as u64;
    for line in 0..line_bound {
        for slot in (0..capacity).take_while(|slot| slot + reach <= capacity) {
            let (column, row) = match orientation {
                Orientation::Horizontal => (slot, line),
                Orientation::Vertical => (line, slot),
            };
            let origin = Vec2::new(column as f32 * cell_size.x, row as f32 * cell_size.y);
            let candidate = Rect::from_pos_size(origin, size);
            if !occupancy.iter().any(|placed| placed.overlaps(&candidate)) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Cell size from the panel size: the bounded dimension is split into
/// `max_rows_or_columns` cells and the other side follows from the aspect
/// ratio. Both sides are rounded to whole units.
pub fn cell_size(panel_size: Vec2, max_rows_or_columns: u32, orientation: Orientation, aspect_ratio: f32) -> Result<Vec2> {
    if max_rows_or_columns == 0 {
        return Err(LayoutError::invalid_property(
            "max_rows_or_columns",
            "must be at least 1",
        ));
    }
    if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
        return Err(LayoutError::invalid_property(
            "aspect_ratio",
            format!("{} is not a finite, positive ratio", aspect_ratio),
        ));
    }

    let count = max_rows_or_columns as f32;
    let (width, height) = match orientation {
        Orientation::Horizontal => {
            let width = panel_size.x / count;
            (width, width * aspect_ratio)
        }
        Orientation::Vertical => {
            let height = panel_size.y / count;
            (height / aspect_ratio, height)
        }
    };
    Ok(Vec2::new(width.round(), height.round()))
}

/// Where a variable-sized grid takes each child's span from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpanSource {
    /// The child's `ColumnSpan` / `RowSpan` hints (first entry of a list).
    #[default]
    Hints,
    /// Every third child, starting with the first, is 2x2; the rest are 1x1.
    EveryThirdLarge,
}

impl SpanSource {
    pub fn span_for(&self, index: usize, child: &LayoutChild) -> Result<ResolvedSpan> {
        match self {
            SpanSource::Hints => Ok(ResolvedSpan {
                column_span: first_span(child, HintKey::ColumnSpan)?,
                row_span: first_span(child, HintKey::RowSpan)?,
            }),
            SpanSource::EveryThirdLarge => {
                let span = if index % 3 == 0 { 2 } else { 1 };
                Ok(ResolvedSpan {
                    column_span: span,
                    row_span: span,
                })
            }
        }
    }
}

fn first_span(child: &LayoutChild, key: HintKey) -> Result<u32> {
    let entries = child
        .hints
        .get(key)
        .and_then(|value| value.list_len())
        .unwrap_or(1);
    resolve_span(child, key, 0, entries)
}

#[derive(Debug, Clone)]
pub struct VariableSizedGridPanel {
    orientation: Orientation,
    max_rows_or_columns: u32,
    aspect_ratio: f32,
    span_source: SpanSource,
    parent_bounds: Vec2,
    measured: Option<Vec<Rect>>,
}

impl VariableSizedGridPanel {
    pub fn new(max_rows_or_columns: u32) -> Result<Self> {
        let mut panel = Self {
            orientation: Orientation::Horizontal,
            max_rows_or_columns: 1,
            aspect_ratio: 1.0,
            span_source: SpanSource::default(),
            parent_bounds: Vec2::ZERO,
            measured: None,
        };
        panel.set_max_rows_or_columns(max_rows_or_columns)?;
        Ok(panel)
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self.measured = None;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Result<Self> {
        self.set_aspect_ratio(aspect_ratio)?;
        Ok(self)
    }

    pub fn with_span_source(mut self, span_source: SpanSource) -> Self {
        self.span_source = span_source;
        self.measured = None;
        self
    }

    /// Size used in place of an unbounded available axis.
    pub fn with_parent_bounds(mut self, parent_bounds: Vec2) -> Self {
        self.parent_bounds = parent_bounds;
        self
    }

    pub fn set_max_rows_or_columns(&mut self, max_rows_or_columns: u32) -> Result<()> {
        if max_rows_or_columns == 0 {
            return Err(LayoutError::invalid_property(
                "max_rows_or_columns",
                "must be at least 1",
            ));
        }
        self.max_rows_or_columns = max_rows_or_columns;
        self.measured = None;
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<()> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(LayoutError::invalid_property(
                "aspect_ratio",
                format!("{} is not a finite, positive ratio", aspect_ratio),
            ));
        }
        self.aspect_ratio = aspect_ratio;
        self.measured = None;
        Ok(())
    }

    pub fn set_parent_bounds(&mut self, parent_bounds: Vec2) {
        self.parent_bounds = parent_bounds;
    }

    fn place(&self, children: &[LayoutChild], panel_size: Vec2) -> Result<GreedyPacking> {
        let size = ConstraintBox::from_available(panel_size).resolve(self.parent_bounds);
        let cell = cell_size(size, self.max_rows_or_columns, self.orientation, self.aspect_ratio)?;
        let items = children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                Ok(GreedyItem {
                    id: child.id,
                    span: self.span_source.span_for(index, child)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let packing = pack_greedy(&items, self.max_rows_or_columns, self.orientation, cell)?;
        debug!(?cell, extent = ?packing.extent, "packed variable-sized grid");
        Ok(packing)
    }
}

impl Panel for VariableSizedGridPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::VariableSizedGrid
    }

    fn measure(&mut self, children: &[LayoutChild], available: Vec2) -> Result<MeasureResult> {
        self.measured = None;
        if children.is_empty() {
            self.measured = Some(Vec::new());
            return Ok(MeasureResult {
                desired_size: Vec2::ZERO,
                child_sizes: Vec::new(),
            });
        }

        let packing = self.place(children, available)?;
        let child_sizes = packing.rects.iter().map(Rect::size).collect();
        self.measured = Some(packing.rects);

        Ok(MeasureResult {
            desired_size: packing.extent,
            child_sizes,
        })
    }

    /// Copies the cells found by measure. Placement depends on the measured
    /// size, so arrange only recomputes when no matching measure exists.
    fn arrange(&mut self, children: &[LayoutChild], final_size: Vec2) -> Result<LayoutResult> {
        let rects = match &self.measured {
            Some(rects) if rects.len() == children.len() => rects.clone(),
            _ => {
                debug!("arranging variable-sized grid without a matching measure");
                let rects = self.place(children, final_size)?.rects;
                self.measured = Some(rects.clone());
                rects
            }
        };

        let size = bounding_extent(&rects);
        Ok(LayoutResult::from_rects(children, rects, size))
    }

    fn invalidate(&mut self) {
        self.measured = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{plain_children, ErrorKind};

    fn items(spans: &[(u32, u32)]) -> Vec<GreedyItem> {
        spans
            .iter()
            .enumerate()
            .map(|(id, &(column_span, row_span))| GreedyItem {
                id: id as ChildId,
                span: ResolvedSpan { column_span, row_span },
            })
            .collect()
    }

    fn assert_no_overlap(rects: &[Rect]) {
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_horizontal_first_fit() {
        let cell = Vec2::new(100.0, 100.0);
        let packing = pack_greedy(&items(&[(2, 2), (1, 1), (1, 1), (2, 2), (1, 1)]), 3, Orientation::Horizontal, cell).unwrap();
        assert_eq!(
            packing.rects,
            vec![
                Rect::new(0.0, 0.0, 200.0, 200.0),
                Rect::new(200.0, 0.0, 100.0, 100.0),
                Rect::new(200.0, 100.0, 100.0, 100.0),
                Rect::new(0.0, 200.0, 200.0, 200.0),
                Rect::new(200.0, 200.0, 100.0, 100.0),
            ]
        );
        assert_eq!(packing.extent, Vec2::new(300.0, 400.0));
    }

    #[test]
    fn test_vertical_scans_columns() {
        let cell = Vec2::new(50.0, 50.0);
        let packing = pack_greedy(&items(&[(1, 2), (1, 1), (1, 1)]), 2, Orientation::Vertical, cell).unwrap();
        assert_eq!(packing.rects[1], Rect::new(50.0, 0.0, 50.0, 50.0));
        assert_eq!(packing.rects[2], Rect::new(50.0, 50.0, 50.0, 50.0));
        assert_eq!(packing.extent, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_backfills_earlier_gaps() {
        let cell = Vec2::new(10.0, 10.0);
        let packing = pack_greedy(&items(&[(1, 1), (2, 1), (1, 1)]), 2, Orientation::Horizontal, cell).unwrap();
        assert_eq!(packing.rects[1], Rect::new(0.0, 10.0, 20.0, 10.0));
        assert_eq!(packing.rects[2], Rect::new(10.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_no_overlap_and_grid_aligned() {
        let spans: Vec<(u32, u32)> = (0..40).map(|i| (1 + i % 3, 1 + (i * 7) % 2)).collect();
        let cell = Vec2::new(30.0, 20.0);
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let packing = pack_greedy(&items(&spans), 4, orientation, cell).unwrap();
            assert_no_overlap(&packing.rects);
            for rect in &packing.rects {
                assert_eq!(rect.x % cell.x, 0.0);
                assert_eq!(rect.y % cell.y, 0.0);
                assert_eq!(rect.width % cell.x, 0.0);
                assert_eq!(rect.height % cell.y, 0.0);
            }
        }
    }

    #[test]
    fn test_span_exceeding_capacity_fails_fast() {
        let err = pack_greedy(&items(&[(1, 1), (4, 1)]), 3, Orientation::Horizontal, Vec2::ONE).unwrap_err();
        assert_eq!(err, LayoutError::SpanExceedsCapacity { child: 1, span: 4, capacity: 3 });
        assert_eq!(err.kind(), ErrorKind::SpanExceedsCapacity);

        // Row spans are unbounded when scanning rows.
        assert!(pack_greedy(&items(&[(1, 9)]), 3, Orientation::Horizontal, Vec2::ONE).is_ok());
        assert!(pack_greedy(&items(&[(1, 9)]), 3, Orientation::Vertical, Vec2::ONE).is_err());
    }

    #[test]
    fn test_zero_capacity_is_configuration_error() {
        let err = pack_greedy(&items(&[(1, 1)]), 0, Orientation::Horizontal, Vec2::ONE).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_zero_span_child_is_placed() {
        let packing = pack_greedy(&items(&[(1, 1), (0, 0)]), 1, Orientation::Horizontal, Vec2::new(10.0, 10.0)).unwrap();
        assert_eq!(packing.rects[1].size(), Vec2::ZERO);
        assert_eq!(packing.extent, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_cell_size_rounding() {
        assert_eq!(cell_size(Vec2::new(1000.0, 0.0), 3, Orientation::Horizontal, 1.0).unwrap(), Vec2::new(333.0, 333.0));
        assert_eq!(cell_size(Vec2::new(0.0, 600.0), 4, Orientation::Vertical, 0.5).unwrap(), Vec2::new(300.0, 150.0));
        assert!(cell_size(Vec2::new(100.0, 100.0), 2, Orientation::Vertical, 0.0).is_err());
    }

    #[test]
    fn test_panel_every_third_large() {
        let mut panel = VariableSizedGridPanel::new(4)
            .unwrap()
            .with_span_source(SpanSource::EveryThirdLarge);
        let children = plain_children(6);

        let measured = panel.measure(&children, Vec2::new(400.0, f32::INFINITY)).unwrap();
        assert_eq!(measured.child_sizes[0], Vec2::new(200.0, 200.0));
        assert_eq!(measured.child_sizes[1], Vec2::new(100.0, 100.0));

        let arranged = panel.arrange(&children, measured.desired_size).unwrap();
        assert_eq!(arranged.size, measured.desired_size);
        assert_eq!(arranged.rect_of(3), Some(Rect::new(200.0, 100.0, 200.0, 200.0)));
        assert_eq!(arranged.rect_of(5), Some(Rect::new(100.0, 200.0, 100.0, 100.0)));
        assert_eq!(arranged.size, Vec2::new(400.0, 300.0));
        assert_no_overlap(&arranged.rects());
    }

    #[test]
    fn test_panel_reads_span_hints() {
        let mut panel = VariableSizedGridPanel::new(2).unwrap();
        let children = vec![
            LayoutChild::new(10).with_spans(2i64, 1i64),
            LayoutChild::new(11).with_spans(vec![1i64, 2], vec![2i64, 1]),
        ];
        let measured = panel.measure(&children, Vec2::new(200.0, 500.0)).unwrap();
        assert_eq!(measured.desired_size, Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_unbounded_width_uses_parent_bounds() {
        let mut panel = VariableSizedGridPanel::new(2)
            .unwrap()
            .with_parent_bounds(Vec2::new(300.0, 300.0));
        let measured = panel.measure(&plain_children(2), Vec2::new(f32::INFINITY, f32::INFINITY)).unwrap();
        assert_eq!(measured.desired_size, Vec2::new(300.0, 150.0));
    }

    #[test]
    fn test_arrange_without_measure() {
        let mut panel = VariableSizedGridPanel::new(2).unwrap();
        let arranged = panel.arrange(&plain_children(3), Vec2::new(100.0, 100.0)).unwrap();
        assert_eq!(arranged.rect_of(2), Some(Rect::new(0.0, 50.0, 50.0, 50.0)));
        assert_eq!(arranged.size, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_empty_panel_is_zero_sized() {
        let mut panel = VariableSizedGridPanel::new(3).unwrap();
        assert_eq!(panel.measure(&[], Vec2::new(100.0, 100.0)).unwrap().desired_size, Vec2::ZERO);
        assert_eq!(panel.arrange(&[], Vec2::new(100.0, 100.0)).unwrap().size, Vec2::ZERO);
    }

    #[test]
    fn test_invalid_properties() {
        assert!(VariableSizedGridPanel::new(0).is_err());
        assert!(VariableSizedGridPanel::new(2).unwrap().with_aspect_ratio(f32::NAN).is_err());
    }
}

// crates/trellis-layout/src/flow_grid.rs
//! Responsive flow grid: column count picked from the container width,
//! children flowed left to right, top to bottom.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trellis_core::{LayoutChild, Rect, Result};

use crate::{
    resolve_spans, ConstraintBox, LayoutResult, LayoutSelection, MeasureResult, Panel, PanelKind,
    ResolvedSpan, TriggerTable,
};

/// How a flow grid derives its row height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", content = "value")]
pub enum ItemHeightPolicy {
    /// `item_width * ratio`.
    AspectRatio(f32),
    /// Split the container height between the rows. An empty or unbounded
    /// height falls back to square cells.
    #[default]
    FillHeight,
    /// Use the container's own short/long side ratio. Degenerate containers
    /// fall back to square cells.
    PanelAspect,
}

impl From<Option<f32>> for ItemHeightPolicy {
    fn from(aspect_ratio: Option<f32>) -> Self {
        match aspect_ratio {
            Some(ratio) if !ratio.is_nan() => ItemHeightPolicy::AspectRatio(ratio),
            _ => ItemHeightPolicy::FillHeight,
        }
    }
}

pub fn derive_item_height(policy: ItemHeightPolicy, item_width: f32, panel_size: Vec2, total_rows: u32) -> f32 {
    let height = panel_size.y;
    let unusable_height = height == 0.0 || !height.is_finite();

    match policy {
        ItemHeightPolicy::AspectRatio(ratio) => item_width * ratio,
        ItemHeightPolicy::FillHeight if unusable_height => item_width,
        ItemHeightPolicy::FillHeight if total_rows == 0 => 0.0,
        ItemHeightPolicy::FillHeight => height / total_rows as f32,
        ItemHeightPolicy::PanelAspect => {
            let width = panel_size.x;
            if unusable_height || width <= 0.0 || !width.is_finite() {
                item_width
            } else {
                item_width * (width.min(height) / width.max(height))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackedCell {
    pub column: u32,
    pub row: u32,
    pub column_span: u32,
    pub row_span: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowPacking {
    pub cells: Vec<PackedCell>,
    /// Rows touched by any child, including a trailing partial row.
    pub total_rows: u32,
}

impl FlowPacking {
    pub fn rects(&self, item_size: Vec2) -> Vec<Rect> {
        self.cells
            .iter()
            .map(|cell| {
                Rect::new(
                    cell.column as f32 * item_size.x,
                    cell.row as f32 * item_size.y,
                    cell.column_span as f32 * item_size.x,
                    cell.row_span as f32 * item_size.y,
                )
            })
            .collect()
    }
}

/// Flow cells left to right, wrapping once the running column reaches
/// `column_count`. A span that overflows the remaining columns stays on the
/// current row; nothing is pushed down or backtracked.
pub fn pack(spans: &[ResolvedSpan], column_count: u32) -> FlowPacking {
    let column_count = column_count.max(1);
    let mut current_column = 0;
    let mut row = 0;
    let mut row_increment = 1;
    let mut cells = Vec::with_capacity(spans.len());

    for span in spans {
        cells.push(PackedCell {
            column: current_column,
            row,
            column_span: span.column_span,
            row_span: span.row_span,
        });

        row_increment = row_increment.max(span.row_span);
        current_column += span.column_span;

        if current_column >= column_count {
            current_column = 0;
            row += row_increment;
            row_increment = 1;
        }
    }

    let total_rows = if current_column > 0 { row + row_increment } else { row };
    FlowPacking { cells, total_rows }
}

/// Geometry of one flow-grid pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowGeometry {
    pub item_size: Vec2,
    pub rects: Vec<Rect>,
    pub size: Vec2,
}

pub fn flow_geometry(packing: &FlowPacking, columns: u32, panel_size: Vec2, policy: ItemHeightPolicy) -> FlowGeometry {
    let width = panel_size.x;
    let item_width = width / columns.max(1) as f32;
    let item_height = derive_item_height(policy, item_width, panel_size, packing.total_rows);
    FlowGeometry::with_item_size(packing, width, Vec2::new(item_width, item_height))
}

impl FlowGeometry {
    /// Geometry for cells of a known size.
    pub fn with_item_size(packing: &FlowPacking, width: f32, item_size: Vec2) -> Self {
        Self {
            item_size,
            rects: packing.rects(item_size),
            size: Vec2::new(width, item_size.y * packing.total_rows as f32),
        }
    }
}

#[derive(Debug, Clone)]
struct MeasuredFlow {
    width: f32,
    child_count: usize,
    selection: LayoutSelection,
    packing: FlowPacking,
    /// Cell size and height reported by measure, once measure has run.
    item_size: Option<Vec2>,
    desired_height: f32,
}

/// Responsive grid panel. Covers both the strict variant (validated trigger
/// table) and the free-aspect variant (via [`ItemHeightPolicy`]).
#[derive(Debug, Clone)]
pub struct FlowGridPanel {
    triggers: TriggerTable,
    item_height: ItemHeightPolicy,
    measured: Option<MeasuredFlow>,
}

impl FlowGridPanel {
    pub fn new(triggers: TriggerTable) -> Self {
        Self {
            triggers,
            item_height: ItemHeightPolicy::default(),
            measured: None,
        }
    }

    pub fn with_item_height(mut self, policy: ItemHeightPolicy) -> Self {
        self.item_height = policy;
        self.measured = None;
        self
    }

    pub fn triggers(&self) -> &TriggerTable {
        &self.triggers
    }

    pub fn set_triggers(&mut self, triggers: TriggerTable) {
        self.triggers = triggers;
        self.measured = None;
    }

    pub fn item_height(&self) -> ItemHeightPolicy {
        self.item_height
    }

    pub fn set_item_height(&mut self, policy: ItemHeightPolicy) {
        self.item_height = policy;
        self.measured = None;
    }

    /// Selection made by the last measure, if it is still valid.
    pub fn measured_selection(&self) -> Option<LayoutSelection> {
        self.measured.as_ref().map(|measured| measured.selection)
    }

    fn resolve(&self, children: &[LayoutChild], width: f32) -> Result<MeasuredFlow> {
        let selection = self.triggers.select(width);
        let spans = resolve_spans(children, selection, self.triggers.len())?;
        let packing = pack(&spans, selection.columns);
        debug!(
            width,
            layout_index = selection.index,
            columns = selection.columns,
            rows = packing.total_rows,
            "packed flow grid"
        );
        Ok(MeasuredFlow {
            width,
            child_count: children.len(),
            selection,
            packing,
            item_size: None,
            desired_height: 0.0,
        })
    }
}

impl Panel for FlowGridPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::FlowGrid
    }

    fn measure(&mut self, children: &[LayoutChild], available: Vec2) -> Result<MeasureResult> {
        self.measured = None;
        if children.is_empty() {
            return Ok(MeasureResult {
                desired_size: Vec2::ZERO,
                child_sizes: Vec::new(),
            });
        }

        let width = ConstraintBox::from_available(available).resolve(Vec2::ZERO).x;
        let mut measured = self.resolve(children, width)?;
        let geometry = flow_geometry(
            &measured.packing,
            measured.selection.columns,
            Vec2::new(width, available.y),
            self.item_height,
        );
        measured.item_size = Some(geometry.item_size);
        measured.desired_height = geometry.size.y;
        self.measured = Some(measured);

        Ok(MeasureResult {
            desired_size: geometry.size,
            child_sizes: geometry.rects.iter().map(Rect::size).collect(),
        })
    }

    fn arrange(&mut self, children: &[LayoutChild], final_size: Vec2) -> Result<LayoutResult> {
        if children.is_empty() {
            return Ok(LayoutResult::default());
        }

        let width = ConstraintBox::from_available(final_size).resolve(Vec2::ZERO).x;
        let measured = match self.measured.take() {
            Some(measured) if measured.width == width && measured.child_count == children.len() => {
                debug!(width, "reusing measured flow packing");
                measured
            }
            _ => self.resolve(children, width)?,
        };

        // Arranged at the height measure asked for: keep the measured cells so
        // the arranged size matches the desired size.
        let geometry = match measured.item_size {
            Some(item_size) if final_size.y == measured.desired_height => {
                FlowGeometry::with_item_size(&measured.packing, width, item_size)
            }
            _ => flow_geometry(
                &measured.packing,
                measured.selection.columns,
                Vec2::new(width, final_size.y),
                self.item_height,
            ),
        };
        self.measured = Some(measured);

        Ok(LayoutResult::from_rects(children, geometry.rects, geometry.size))
    }

    fn invalidate(&mut self) {
        self.measured = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_rect_eq, assert_vec_eq};
    use trellis_core::{bounding_extent, plain_children, HintKey, LayoutError};

    fn unit_spans(count: usize) -> Vec<ResolvedSpan> {
        vec![ResolvedSpan { column_span: 1, row_span: 1 }; count]
    }

    fn three_column_panel() -> FlowGridPanel {
        FlowGridPanel::new(TriggerTable::from_pairs(&[(0.0, 1), (500.0, 2), (900.0, 3)]).unwrap())
    }

    #[test]
    fn test_pack_wraps_rows() {
        let packing = pack(&unit_spans(5), 2);
        let positions: Vec<(u32, u32)> = packing.cells.iter().map(|cell| (cell.column, cell.row)).collect();
        assert_eq!(positions, vec![(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(packing.total_rows, 3);
    }

    #[test]
    fn test_pack_exact_fill_has_no_trailing_row() {
        assert_eq!(pack(&unit_spans(4), 2).total_rows, 2);
        assert_eq!(pack(&[], 3).total_rows, 0);
    }

    #[test]
    fn test_row_span_pushes_next_row_down() {
        let spans = vec![
            ResolvedSpan { column_span: 1, row_span: 2 },
            ResolvedSpan { column_span: 1, row_span: 1 },
            ResolvedSpan { column_span: 1, row_span: 1 },
        ];
        let packing = pack(&spans, 2);
        assert_eq!(packing.cells[2].row, 2);
        assert_eq!(packing.total_rows, 3);
    }

    #[test]
    fn test_overflowing_span_stays_on_row() {
        let spans = vec![
            ResolvedSpan { column_span: 1, row_span: 1 },
            ResolvedSpan { column_span: 3, row_span: 1 },
            ResolvedSpan { column_span: 1, row_span: 1 },
        ];
        let packing = pack(&spans, 2);
        assert_eq!(packing.cells[1], PackedCell { column: 1, row: 0, column_span: 3, row_span: 1 });
        assert_eq!(packing.cells[2], PackedCell { column: 0, row: 1, column_span: 1, row_span: 1 });
    }

    #[test]
    fn test_rows_never_exceed_slot_count() {
        for columns in 1..5u32 {
            for count in 0..12usize {
                let packing = pack(&unit_spans(count), columns);
                let mut per_row = vec![0u32; packing.total_rows as usize];
                for cell in &packing.cells {
                    per_row[cell.row as usize] += cell.column_span;
                }
                assert!(per_row.iter().all(|&used| used <= columns));
                assert!(count as u32 <= packing.total_rows * columns);
            }
        }
    }

    #[test]
    fn test_zero_span_children_do_not_crash() {
        let spans = vec![ResolvedSpan { column_span: 0, row_span: 0 }; 3];
        let packing = pack(&spans, 2);
        let rects = packing.rects(Vec2::new(100.0, 50.0));
        assert!(rects.iter().all(|rect| rect.width == 0.0 && rect.height == 0.0));
    }

    #[test]
    fn test_item_height_policies() {
        let panel = Vec2::new(700.0, 400.0);
        assert_eq!(derive_item_height(ItemHeightPolicy::AspectRatio(0.5), 350.0, panel, 3), 175.0);
        assert_eq!(derive_item_height(ItemHeightPolicy::FillHeight, 350.0, panel, 4), 100.0);
        assert_eq!(
            derive_item_height(ItemHeightPolicy::FillHeight, 350.0, Vec2::new(700.0, f32::INFINITY), 4),
            350.0
        );
        assert_eq!(derive_item_height(ItemHeightPolicy::FillHeight, 350.0, Vec2::new(700.0, 0.0), 4), 350.0);
        assert_eq!(derive_item_height(ItemHeightPolicy::FillHeight, 350.0, panel, 0), 0.0);
        assert_eq!(derive_item_height(ItemHeightPolicy::PanelAspect, 350.0, Vec2::new(800.0, 400.0), 1), 175.0);
    }

    #[test]
    fn test_nan_aspect_means_fill_height() {
        assert_eq!(ItemHeightPolicy::from(Some(f32::NAN)), ItemHeightPolicy::FillHeight);
        assert_eq!(ItemHeightPolicy::from(None), ItemHeightPolicy::FillHeight);
        assert_eq!(ItemHeightPolicy::from(Some(0.5)), ItemHeightPolicy::AspectRatio(0.5));
    }

    #[test]
    fn test_measure_end_to_end() {
        let mut panel = three_column_panel().with_item_height(ItemHeightPolicy::AspectRatio(0.5));
        let children = plain_children(5);

        let measured = panel.measure(&children, Vec2::new(700.0, f32::INFINITY)).unwrap();
        assert_vec_eq(measured.desired_size, Vec2::new(700.0, 525.0));
        assert_eq!(panel.measured_selection(), Some(LayoutSelection { index: 1, columns: 2 }));
        assert!(measured.child_sizes.iter().all(|size| *size == Vec2::new(350.0, 175.0)));

        let arranged = panel.arrange(&children, Vec2::new(700.0, 525.0)).unwrap();
        assert_rect_eq(arranged.rect_of(4).unwrap(), Rect::new(0.0, 350.0, 350.0, 175.0));
        assert_rect_eq(arranged.rect_of(3).unwrap(), Rect::new(350.0, 175.0, 350.0, 175.0));
        assert_vec_eq(arranged.size, measured.desired_size);
    }

    #[test]
    fn test_fill_height_splits_rows() {
        let mut panel = three_column_panel();
        let children = plain_children(6);
        let arranged = panel.arrange(&children, Vec2::new(1000.0, 600.0)).unwrap();
        assert_rect_eq(arranged.rects()[5], Rect::new(666.6667, 300.0, 333.3333, 300.0));
        assert_vec_eq(arranged.size, Vec2::new(1000.0, 600.0));
    }

    #[test]
    fn test_empty_children_measure_to_zero() {
        let mut panel = three_column_panel();
        let measured = panel.measure(&[], Vec2::new(700.0, 400.0)).unwrap();
        assert_eq!(measured.desired_size, Vec2::ZERO);
        assert_eq!(panel.arrange(&[], Vec2::new(700.0, 400.0)).unwrap(), LayoutResult::default());
    }

    #[test]
    fn test_unbounded_width_is_not_an_error() {
        let mut panel = three_column_panel().with_item_height(ItemHeightPolicy::AspectRatio(1.0));
        let measured = panel
            .measure(&plain_children(3), Vec2::new(f32::INFINITY, f32::INFINITY))
            .unwrap();
        assert_eq!(measured.desired_size, Vec2::ZERO);
    }

    #[test]
    fn test_span_mismatch_fails_the_pass() {
        let mut panel = three_column_panel();
        let children = vec![LayoutChild::new(9).with_hint(HintKey::ColumnSpan, vec![1i64, 2])];
        let err = panel.measure(&children, Vec2::new(700.0, 400.0)).unwrap_err();
        assert!(matches!(err, LayoutError::SpanTableMismatch { child: 9, .. }));
        assert_eq!(panel.measured_selection(), None);
    }

    #[test]
    fn test_arrange_reuses_measured_packing() {
        let mut panel = three_column_panel().with_item_height(ItemHeightPolicy::AspectRatio(1.0));
        let mut children = plain_children(3);
        panel.measure(&children, Vec2::new(1000.0, 800.0)).unwrap();

        // A hint change without invalidation keeps the measured packing.
        children[0].hints.set(HintKey::ColumnSpan, 3i64);
        let arranged = panel.arrange(&children, Vec2::new(1000.0, 800.0)).unwrap();
        assert_eq!(arranged.rects()[0].width, arranged.rects()[1].width);

        panel.invalidate();
        let arranged = panel.arrange(&children, Vec2::new(1000.0, 800.0)).unwrap();
        assert_rect_eq(arranged.rects()[0], Rect::new(0.0, 0.0, 1000.0, 333.3333));
        assert_eq!(arranged.rects()[1].y, arranged.rects()[0].height);
    }

    #[test]
    fn test_host_layout_matches_measure_for_every_policy() {
        let policies = [
            ItemHeightPolicy::AspectRatio(0.5),
            ItemHeightPolicy::FillHeight,
            ItemHeightPolicy::PanelAspect,
        ];
        for policy in policies {
            let available = Vec2::new(700.0, f32::INFINITY);
            let mut host = crate::LayoutHost::new(three_column_panel().with_item_height(policy), plain_children(5));
            let desired = host.measure(available).unwrap().desired_size;
            let arranged = host.layout(available).unwrap();

            assert_vec_eq(arranged.size, desired);
            assert_vec_eq(bounding_extent(&arranged.rects()), desired);
        }
    }

    #[test]
    fn test_panel_aspect_keeps_measured_cells() {
        let mut panel = three_column_panel().with_item_height(ItemHeightPolicy::PanelAspect);
        let children = plain_children(5);
        let measured = panel.measure(&children, Vec2::new(700.0, f32::INFINITY)).unwrap();
        assert_eq!(measured.desired_size, Vec2::new(700.0, 1050.0));

        let arranged = panel.arrange(&children, measured.desired_size).unwrap();
        assert_eq!(arranged.size, Vec2::new(700.0, 1050.0));
        assert_eq!(arranged.rect_of(4), Some(Rect::new(0.0, 700.0, 350.0, 350.0)));
    }

    #[test]
    fn test_per_trigger_spans_follow_selection() {
        let mut panel = three_column_panel().with_item_height(ItemHeightPolicy::AspectRatio(1.0));
        let children = vec![
            LayoutChild::new(0).with_spans(vec![1i64, 2, 2], vec![1i64, 1, 2]),
            LayoutChild::new(1),
        ];

        let narrow = panel.arrange(&children, Vec2::new(300.0, 0.0)).unwrap();
        assert_rect_eq(narrow.rects()[0], Rect::new(0.0, 0.0, 300.0, 300.0));

        let wide = panel.arrange(&children, Vec2::new(960.0, 0.0)).unwrap();
        assert_rect_eq(wide.rects()[0], Rect::new(0.0, 0.0, 640.0, 640.0));
        assert_rect_eq(wide.rects()[1], Rect::new(640.0, 0.0, 320.0, 320.0));
        assert_vec_eq(wide.size, Vec2::new(960.0, 640.0));
    }
}

// crates/trellis-layout/src/config.rs
//! Serializable descriptions of panels and layout scenarios.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use trellis_core::{ChildHints, ChildId, HintKey, LayoutChild, Result};

use crate::{
    AdaptiveGrid, FlowGridPanel, ItemHeightPolicy, Orientation, Panel, SpanSource, TriggerTable,
    VanishingPointPanel, VariableSizedGridPanel, WeightedPanel,
};

fn default_one() -> f32 {
    1.0
}

fn default_breakpoint() -> f32 {
    500.0
}

fn default_adaptive_aspect() -> f32 {
    0.5
}

fn default_row_count() -> u32 {
    2
}

fn default_narrow_columns() -> u32 {
    2
}

fn default_wide_columns() -> u32 {
    3
}

fn default_count() -> usize {
    1
}

/// A panel and its properties. Omitted properties take the panel's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelConfig {
    FlowGrid {
        #[serde(default)]
        triggers: TriggerTable,
        #[serde(default)]
        item_height: ItemHeightPolicy,
    },
    Weighted {
        #[serde(default)]
        orientation: Orientation,
    },
    VanishingPoint {
        #[serde(default = "default_one")]
        z_factor: f32,
        #[serde(default)]
        item_height: f32,
    },
    VariableSizedGrid {
        max_rows_or_columns: u32,
        #[serde(default)]
        orientation: Orientation,
        #[serde(default = "default_one")]
        aspect_ratio: f32,
        #[serde(default)]
        span_source: SpanSource,
        #[serde(default)]
        parent_bounds: Vec2,
    },
    AdaptiveGrid {
        #[serde(default = "default_breakpoint")]
        breakpoint: f32,
        #[serde(default = "default_adaptive_aspect")]
        aspect_ratio: f32,
        #[serde(default = "default_row_count")]
        row_count: u32,
        #[serde(default = "default_narrow_columns")]
        narrow_columns: u32,
        #[serde(default = "default_wide_columns")]
        wide_columns: u32,
    },
}

impl PanelConfig {
    pub fn build(&self) -> Result<Box<dyn Panel>> {
        let panel: Box<dyn Panel> = match self {
            PanelConfig::FlowGrid { triggers, item_height } => {
                Box::new(FlowGridPanel::new(triggers.clone()).with_item_height(*item_height))
            }
            PanelConfig::Weighted { orientation } => Box::new(WeightedPanel::new(*orientation)),
            PanelConfig::VanishingPoint { z_factor, item_height } => {
                Box::new(VanishingPointPanel::new(*z_factor, *item_height)?)
            }
            PanelConfig::VariableSizedGrid {
                max_rows_or_columns,
                orientation,
                aspect_ratio,
                span_source,
                parent_bounds,
            } => Box::new(
                VariableSizedGridPanel::new(*max_rows_or_columns)?
                    .with_orientation(*orientation)
                    .with_aspect_ratio(*aspect_ratio)?
                    .with_span_source(*span_source)
                    .with_parent_bounds(*parent_bounds),
            ),
            PanelConfig::AdaptiveGrid {
                breakpoint,
                aspect_ratio,
                row_count,
                narrow_columns,
                wide_columns,
            } => {
                let mut grid = AdaptiveGrid::default();
                grid.breakpoint = *breakpoint;
                grid.aspect_ratio = *aspect_ratio;
                grid.row_count = *row_count;
                grid.narrow_columns = *narrow_columns;
                grid.wide_columns = *wide_columns;
                grid.validate()?;
                Box::new(grid)
            }
        };
        Ok(panel)
    }
}

/// `count` identical children sharing `hints`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildConfig {
    #[serde(default)]
    pub hints: ChildHints,
    #[serde(default = "default_count")]
    pub count: usize,
}

impl ChildConfig {
    pub fn plain(count: usize) -> Self {
        Self {
            hints: ChildHints::new(),
            count,
        }
    }

    pub fn with_hints(hints: ChildHints) -> Self {
        Self { hints, count: 1 }
    }
}

/// Offered size; a missing axis is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AvailableSize {
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

impl AvailableSize {
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(
            self.width.unwrap_or(f32::INFINITY),
            self.height.unwrap_or(f32::INFINITY),
        )
    }
}

/// A panel, its children and the size offered to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub panel: PanelConfig,
    #[serde(default)]
    pub children: Vec<ChildConfig>,
    #[serde(default)]
    pub available: AvailableSize,
}

impl Scenario {
    /// Children with ids assigned in order.
    pub fn layout_children(&self) -> Vec<LayoutChild> {
        self.children
            .iter()
            .flat_map(|config| std::iter::repeat(&config.hints).take(config.count))
            .enumerate()
            .map(|(id, hints)| LayoutChild {
                id: id as ChildId,
                hints: hints.clone(),
            })
            .collect()
    }

    /// One of the built-in demo scenarios, by name.
    pub fn demo(name: &str) -> Option<Self> {
        let scenario = match name {
            "flow-grid" => Scenario {
                panel: PanelConfig::FlowGrid {
                    triggers: TriggerTable::from_pairs(&[(0.0, 1), (500.0, 2), (900.0, 3)]).ok()?,
                    item_height: ItemHeightPolicy::AspectRatio(0.5),
                },
                children: vec![ChildConfig::plain(5)],
                available: AvailableSize {
                    width: Some(700.0),
                    height: None,
                },
            },
            "weighted" => Scenario {
                panel: PanelConfig::Weighted {
                    orientation: Orientation::Horizontal,
                },
                children: vec![
                    ChildConfig::with_hints(ChildHints::new().with(HintKey::Weight, 1.0f32)),
                    ChildConfig::with_hints(ChildHints::new().with(HintKey::Weight, 1.0f32)),
                    ChildConfig::with_hints(ChildHints::new().with(HintKey::Weight, 2.0f32)),
                ],
                available: AvailableSize {
                    width: Some(400.0),
                    height: Some(100.0),
                },
            },
            "vanishing-point" => Scenario {
                panel: PanelConfig::VanishingPoint {
                    z_factor: 0.8,
                    item_height: 100.0,
                },
                children: vec![ChildConfig::plain(4)],
                available: AvailableSize {
                    width: Some(400.0),
                    height: Some(600.0),
                },
            },
            "variable-grid" => Scenario {
                panel: PanelConfig::VariableSizedGrid {
                    max_rows_or_columns: 4,
                    orientation: Orientation::Horizontal,
                    aspect_ratio: 1.0,
                    span_source: SpanSource::EveryThirdLarge,
                    parent_bounds: Vec2::ZERO,
                },
                children: vec![ChildConfig::plain(9)],
                available: AvailableSize {
                    width: Some(400.0),
                    height: None,
                },
            },
            "adaptive-grid" => Scenario {
                panel: PanelConfig::AdaptiveGrid {
                    breakpoint: default_breakpoint(),
                    aspect_ratio: default_adaptive_aspect(),
                    row_count: default_row_count(),
                    narrow_columns: default_narrow_columns(),
                    wide_columns: default_wide_columns(),
                },
                children: (0..6i64)
                    .map(|cell| {
                        ChildConfig::with_hints(
                            ChildHints::new()
                                .with(HintKey::GridRow, cell / 3)
                                .with(HintKey::GridColumn, cell % 3),
                        )
                    })
                    .collect(),
                available: AvailableSize {
                    width: Some(600.0),
                    height: None,
                },
            },
            _ => return None,
        };
        Some(scenario)
    }
}

/// Names accepted by [`Scenario::demo`].
pub const DEMO_NAMES: &[&str] = &["flow-grid", "weighted", "vanishing-point", "variable-grid", "adaptive-grid"];

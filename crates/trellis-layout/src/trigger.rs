// crates/trellis-layout/src/trigger.rs
//! Width breakpoints and the per-child spans that go with them.

use serde::{Deserialize, Serialize};
use tracing::trace;
use trellis_core::{HintKey, LayoutChild, LayoutError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub width: f32,
    pub columns: u32,
}

/// Ordered `(width threshold, column count)` pairs. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Trigger>", into = "Vec<Trigger>")]
pub struct TriggerTable {
    entries: Vec<Trigger>,
}

/// The trigger entry chosen for a container width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutSelection {
    pub index: usize,
    pub columns: u32,
}

impl Default for LayoutSelection {
    fn default() -> Self {
        Self { index: 0, columns: 1 }
    }
}

impl TriggerTable {
    pub fn new(entries: Vec<Trigger>) -> Result<Self> {
        if entries.is_empty() {
            return Err(LayoutError::EmptyTriggerTable);
        }
        if let Some(index) = entries.iter().position(|entry| entry.columns == 0) {
            return Err(LayoutError::ZeroColumnCount { index });
        }
        Ok(Self { entries })
    }

    /// Build from `(threshold, columns)` pairs.
    pub fn from_pairs(pairs: &[(f32, u32)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|&(width, columns)| Trigger { width, columns })
                .collect(),
        )
    }

    /// Build from the two parallel lists a panel exposes as properties.
    pub fn from_parallel(width_triggers: &[f32], column_hints: &[u32]) -> Result<Self> {
        if width_triggers.is_empty() {
            return Err(LayoutError::EmptyTriggerTable);
        }
        if column_hints.is_empty() {
            return Err(LayoutError::EmptyColumnHints);
        }
        if width_triggers.len() != column_hints.len() {
            return Err(LayoutError::TriggerCountMismatch {
                triggers: width_triggers.len(),
                hints: column_hints.len(),
            });
        }
        Self::new(
            width_triggers
                .iter()
                .zip(column_hints)
                .map(|(&width, &columns)| Trigger { width, columns })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick the last entry whose threshold is strictly below `width`.
    ///
    /// Entries are not required to be sorted; with ascending thresholds this
    /// is the largest bucket whose floor is exceeded.
    pub fn select(&self, width: f32) -> LayoutSelection {
        let mut selection = LayoutSelection::default();
        for (index, entry) in self.entries.iter().enumerate() {
            if width > entry.width {
                selection = LayoutSelection {
                    index,
                    columns: entry.columns,
                };
            }
        }
        trace!(width, ?selection, "selected trigger");
        selection
    }
}

impl Default for TriggerTable {
    fn default() -> Self {
        Self {
            entries: vec![Trigger { width: 0.0, columns: 1 }],
        }
    }
}

impl TryFrom<Vec<Trigger>> for TriggerTable {
    type Error = LayoutError;

    fn try_from(entries: Vec<Trigger>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<TriggerTable> for Vec<Trigger> {
    fn from(table: TriggerTable) -> Self {
        table.entries
    }
}

pub fn select_layout(width: f32, table: &TriggerTable) -> LayoutSelection {
    table.select(width)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedSpan {
    pub column_span: u32,
    pub row_span: u32,
}

/// Spans of every child for the selected layout variant.
pub fn resolve_spans(
    children: &[LayoutChild],
    selection: LayoutSelection,
    table_len: usize,
) -> Result<Vec<ResolvedSpan>> {
    children
        .iter()
        .map(|child| {
            Ok(ResolvedSpan {
                column_span: resolve_span(child, HintKey::ColumnSpan, selection.index, table_len)?,
                row_span: resolve_span(child, HintKey::RowSpan, selection.index, table_len)?,
            })
        })
        .collect()
}

/// Span of `child` for `key` at `index`. An unset hint is 1 for every index;
/// an explicit list must have exactly one entry per trigger.
pub fn resolve_span(child: &LayoutChild, key: HintKey, index: usize, table_len: usize) -> Result<u32> {
    let Some(value) = child.hints.get(key) else {
        return Ok(1);
    };

    if let Some(actual) = value.list_len() {
        if actual != table_len {
            return Err(LayoutError::SpanTableMismatch {
                child: child.id,
                key,
                expected: table_len,
                actual,
            });
        }
    }

    let span = value.int_at(index).ok_or_else(|| LayoutError::InvalidHint {
        child: child.id,
        key,
        reason: format!("expected an integer or a list of integers, got {:?}", value),
    })?;

    u32::try_from(span).map_err(|_| LayoutError::InvalidHint {
        child: child.id,
        key,
        reason: format!("span {} is out of range", span),
    })
}

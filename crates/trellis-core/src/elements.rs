// crates/trellis-core/src/elements.rs
use crate::{ChildHints, HintKey, HintValue};
use serde::{Deserialize, Serialize};

pub type ChildId = u32;

/// A child as seen by a panel: a stable identity plus its hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutChild {
    pub id: ChildId,
    #[serde(default)]
    pub hints: ChildHints,
}

impl LayoutChild {
    pub fn new(id: ChildId) -> Self {
        Self {
            id,
            hints: ChildHints::new(),
        }
    }

    pub fn with_hint(mut self, key: HintKey, value: impl Into<HintValue>) -> Self {
        self.hints.set(key, value);
        self
    }

    pub fn with_spans(self, column_span: impl Into<HintValue>, row_span: impl Into<HintValue>) -> Self {
        self.with_hint(HintKey::ColumnSpan, column_span)
            .with_hint(HintKey::RowSpan, row_span)
    }

    pub fn with_weight(self, weight: f32) -> Self {
        self.with_hint(HintKey::Weight, weight)
    }
}

/// `count` hint-less children with ids `0..count`.
pub fn plain_children(count: usize) -> Vec<LayoutChild> {
    (0..count as ChildId).map(LayoutChild::new).collect()
}

// crates/trellis-core/src/properties.rs
use crate::Invalidation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Per-child layout hints a panel may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintKey {
    /// Column span, one entry per trigger-table entry. Unset means 1.
    ColumnSpan,
    /// Row span, one entry per trigger-table entry. Unset means 1.
    RowSpan,
    /// Relative share of the weighted panel's extent. Unset means 1.0.
    Weight,
    /// Row track index in an adaptive grid. Unset means 0.
    GridRow,
    /// Column track index in an adaptive grid. Unset means 0.
    GridColumn,
}

impl HintKey {
    pub fn default_value(&self) -> HintValue {
        match self {
            HintKey::ColumnSpan | HintKey::RowSpan => HintValue::Int(1),
            HintKey::Weight => HintValue::Float(1.0),
            HintKey::GridRow | HintKey::GridColumn => HintValue::Int(0),
        }
    }

    /// Which passes must be redone when this hint changes on a child.
    pub fn invalidation(&self) -> Invalidation {
        Invalidation::MEASURE
            | Invalidation::ARRANGE
            | Invalidation::PARENT_MEASURE
            | Invalidation::PARENT_ARRANGE
    }
}

impl fmt::Display for HintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintValue {
    Int(i64),
    Float(f32),
    IntList(Vec<i64>),
}

impl HintValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            HintValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            HintValue::Float(f) => Some(*f),
            HintValue::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    /// Value for a given layout index. A scalar applies to every index;
    /// a list must be indexed explicitly.
    pub fn int_at(&self, index: usize) -> Option<i64> {
        match self {
            HintValue::Int(i) => Some(*i),
            HintValue::IntList(list) => list.get(index).copied(),
            HintValue::Float(_) => None,
        }
    }

    /// Number of per-trigger entries, `None` for scalars.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            HintValue::IntList(list) => Some(list.len()),
            _ => None,
        }
    }
}

impl From<i64> for HintValue {
    fn from(value: i64) -> Self {
        HintValue::Int(value)
    }
}

impl From<f32> for HintValue {
    fn from(value: f32) -> Self {
        HintValue::Float(value)
    }
}

impl From<Vec<i64>> for HintValue {
    fn from(value: Vec<i64>) -> Self {
        HintValue::IntList(value)
    }
}

/// Typed hint map attached to one child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildHints {
    values: HashMap<HintKey, HintValue>,
}

impl ChildHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: HintKey, value: impl Into<HintValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: HintKey, value: impl Into<HintValue>) -> Option<HintValue> {
        self.values.insert(key, value.into())
    }

    pub fn clear(&mut self, key: HintKey) -> Option<HintValue> {
        self.values.remove(&key)
    }

    /// Explicitly set value, without falling back to the default.
    pub fn get(&self, key: HintKey) -> Option<&HintValue> {
        self.values.get(&key)
    }

    pub fn is_set(&self, key: HintKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Set value or the key's documented default.
    pub fn value_or_default(&self, key: HintKey) -> HintValue {
        self.values
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_value())
    }

    pub fn weight(&self) -> Option<f32> {
        self.value_or_default(HintKey::Weight).as_float()
    }
}

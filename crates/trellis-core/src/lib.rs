// crates/trellis-core/src/lib.rs
pub mod elements;
pub mod geometry;
pub mod invalidation;
pub mod properties;

pub use elements::*;
pub use geometry::*;
pub use invalidation::*;
pub use properties::*;

/// Broad classes of layout failure. Every [`LayoutError`] belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or mismatched trigger/span tables, invalid panel properties.
    Configuration,
    /// Inputs that would divide by zero, such as a zero total weight.
    DegenerateInput,
    /// A child that can never fit inside the bounded scan dimension.
    SpanExceedsCapacity,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("No width trigger specified in the trigger table")]
    EmptyTriggerTable,

    #[error("No column hints specified for the trigger table")]
    EmptyColumnHints,

    #[error("Number of width triggers ({triggers}) must be equal to the number of column hints ({hints})")]
    TriggerCountMismatch { triggers: usize, hints: usize },

    #[error("Trigger entry {index} has a column count of zero")]
    ZeroColumnCount { index: usize },

    #[error("Child {child} has {actual} {key} entries but the trigger table has {expected}")]
    SpanTableMismatch {
        child: ChildId,
        key: HintKey,
        expected: usize,
        actual: usize,
    },

    #[error("Child {child} has an invalid {key} value: {reason}")]
    InvalidHint {
        child: ChildId,
        key: HintKey,
        reason: String,
    },

    #[error("Invalid panel property {property}: {reason}")]
    InvalidProperty {
        property: &'static str,
        reason: String,
    },

    #[error("Weights must be non-negative and sum to a positive value (child {child:?}, sum {sum})")]
    DegenerateWeights { child: Option<ChildId>, sum: f32 },

    #[error("Child {child} spans {span} cells but only {capacity} fit in the bounded dimension")]
    SpanExceedsCapacity {
        child: ChildId,
        span: u32,
        capacity: u32,
    },
}

impl LayoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::DegenerateWeights { .. } => ErrorKind::DegenerateInput,
            LayoutError::SpanExceedsCapacity { .. } => ErrorKind::SpanExceedsCapacity,
            _ => ErrorKind::Configuration,
        }
    }

    pub fn invalid_property(property: &'static str, reason: impl Into<String>) -> Self {
        LayoutError::InvalidProperty {
            property,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;

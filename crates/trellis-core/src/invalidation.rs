// crates/trellis-core/src/invalidation.rs

bitflags::bitflags! {
    /// Passes that must be redone after a hint or panel property changes.
    ///
    /// The `PARENT_*` flags are not acted on by the panel itself; the host
    /// hands them up to whatever contains the panel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Invalidation: u8 {
        const NONE = 0;
        const MEASURE = 1 << 0;
        const ARRANGE = 1 << 1;
        const PARENT_MEASURE = 1 << 2;
        const PARENT_ARRANGE = 1 << 3;
    }
}

impl Invalidation {
    /// Flags acted on by the panel that owns the change.
    pub fn local(self) -> Self {
        self & (Invalidation::MEASURE | Invalidation::ARRANGE)
    }

    /// Flags that must be forwarded to the enclosing container.
    pub fn parent(self) -> Self {
        self & (Invalidation::PARENT_MEASURE | Invalidation::PARENT_ARRANGE)
    }
}

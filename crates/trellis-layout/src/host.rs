// crates/trellis-layout/src/host.rs
//! Sequencing of the two layout passes for one panel and its children.

use glam::Vec2;
use tracing::{debug, trace, warn};
use trellis_core::{ChildId, HintKey, HintValue, Invalidation, LayoutChild, Result};

use crate::{ConstraintBox, LayoutResult, MeasureResult, Panel, PanelKind};

/// Owns a panel and its children and decides when each pass has to run.
///
/// A measure is reused until a change marks it dirty or the available size
/// changes. Arranging always follows a measure; if none is current, one is
/// performed at the final size first.
pub struct LayoutHost<P: Panel = Box<dyn Panel>> {
    panel: P,
    children: Vec<LayoutChild>,
    dirty: Invalidation,
    parent_pending: Invalidation,
    measured: Option<(Vec2, MeasureResult)>,
}

impl<P: Panel> LayoutHost<P> {
    pub fn new(panel: P, children: Vec<LayoutChild>) -> Self {
        Self {
            panel,
            children,
            dirty: Invalidation::MEASURE | Invalidation::ARRANGE,
            parent_pending: Invalidation::NONE,
            measured: None,
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.panel.kind()
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn children(&self) -> &[LayoutChild] {
        &self.children
    }

    /// Passes still to be redone.
    pub fn dirty(&self) -> Invalidation {
        self.dirty
    }

    pub fn measure(&mut self, available: Vec2) -> Result<MeasureResult> {
        if !self.dirty.contains(Invalidation::MEASURE) {
            if let Some((size, result)) = &self.measured {
                if *size == available {
                    trace!(?available, "reusing measure");
                    return Ok(result.clone());
                }
            }
        }

        let result = self.panel.measure(&self.children, available)?;
        debug!(
            kind = ?self.panel.kind(),
            ?available,
            desired = ?result.desired_size,
            "measured"
        );
        self.measured = Some((available, result.clone()));
        self.dirty.remove(Invalidation::MEASURE);
        self.dirty.insert(Invalidation::ARRANGE);
        Ok(result)
    }

    pub fn arrange(&mut self, final_size: Vec2) -> Result<LayoutResult> {
        if self.dirty.contains(Invalidation::MEASURE) || self.measured.is_none() {
            debug!(?final_size, "arrange requested before measure");
            self.measure(final_size)?;
        }

        let result = self.panel.arrange(&self.children, final_size)?;
        debug!(kind = ?self.panel.kind(), ?final_size, size = ?result.size, "arranged");
        self.dirty.remove(Invalidation::ARRANGE);
        Ok(result)
    }

    /// Measure at `available`, then arrange at the offered size with
    /// unbounded axes taken from the desired size.
    pub fn layout(&mut self, available: Vec2) -> Result<LayoutResult> {
        let measured = self.measure(available)?;
        let final_size = ConstraintBox::from_available(available).arrange_size(measured.desired_size);
        self.arrange(final_size)
    }

    /// Like [`LayoutHost::layout`], but a failing panel yields an empty layout
    /// so the rest of the tree can still be laid out.
    pub fn layout_or_empty(&mut self, available: Vec2) -> LayoutResult {
        match self.layout(available) {
            Ok(result) => result,
            Err(err) => {
                warn!(kind = ?self.panel.kind(), error_kind = ?err.kind(), "layout failed, using empty layout: {}", err);
                LayoutResult::default()
            }
        }
    }

    /// Set a hint on the child with `id`. Returns `false` if no such child.
    pub fn set_hint(&mut self, id: ChildId, key: HintKey, value: impl Into<HintValue>) -> bool {
        let Some(child) = self.children.iter_mut().find(|child| child.id == id) else {
            return false;
        };
        child.hints.set(key, value);
        self.invalidate(key.invalidation());
        true
    }

    pub fn clear_hint(&mut self, id: ChildId, key: HintKey) -> bool {
        let Some(child) = self.children.iter_mut().find(|child| child.id == id) else {
            return false;
        };
        if child.hints.clear(key).is_some() {
            self.invalidate(key.invalidation());
        }
        true
    }

    /// Change panel properties through `update`. Any change is treated as
    /// affecting measure.
    pub fn update_panel<R>(&mut self, update: impl FnOnce(&mut P) -> Result<R>) -> Result<R> {
        let result = update(&mut self.panel);
        self.invalidate(Invalidation::all());
        result
    }

    pub fn set_children(&mut self, children: Vec<LayoutChild>) {
        self.children = children;
        self.invalidate(Invalidation::all());
    }

    pub fn invalidate(&mut self, flags: Invalidation) {
        let local = flags.local();
        self.dirty |= local;
        self.parent_pending |= flags.parent();
        if local.contains(Invalidation::MEASURE) {
            self.panel.invalidate();
        }
        trace!(?flags, "invalidated");
    }

    /// Flags the enclosing container has to act on; cleared once taken.
    pub fn take_parent_invalidation(&mut self) -> Invalidation {
        std::mem::take(&mut self.parent_pending)
    }
}

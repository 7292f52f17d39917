use std::fmt;
use std::rc::Rc;

use crate::dom::NodeId;
use crate::{Error, Page, Result};

pub(crate) type ObserverCallback =
    Rc<dyn Fn(&mut Page, &[IntersectionEntry], ObserverId) -> Result<()>>;

pub(crate) const DEFAULT_VIEWPORT_HEIGHT: i64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

/// Vertical document region currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_top: i64,
    pub height: i64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_top: 0,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn bottom(&self) -> i64 {
        self.scroll_top.saturating_add(self.height)
    }

    /// Zero-height boxes count as intersecting when they touch the viewport,
    /// matching edge-adjacent intersection for empty targets.
    pub fn intersects(&self, layout: &LayoutBox) -> bool {
        if layout.height <= 0 {
            return layout.top >= self.scroll_top && layout.top <= self.bottom();
        }
        layout.top < self.bottom()
            && layout.top.saturating_add(layout.height) > self.scroll_top
    }
}

/// Vertical placement of a rendered element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutBox {
    pub top: i64,
    pub height: i64,
}

impl LayoutBox {
    pub fn new(top: i64, height: i64) -> Result<Self> {
        if height < 0 {
            return Err(Error::InvalidConfig(format!(
                "layout box height must not be negative: {height}"
            )));
        }
        Ok(Self { top, height })
    }
}

#[derive(Debug, Clone, Copy)]
struct ObservedTarget {
    node: NodeId,
    last_reported: Option<bool>,
}

struct ObserverRecord {
    callback: ObserverCallback,
    targets: Vec<ObservedTarget>,
}

impl fmt::Debug for ObserverRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRecord")
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    observers: Vec<ObserverRecord>,
}

impl ObserverRegistry {
    pub(crate) fn create(&mut self, callback: ObserverCallback) -> ObserverId {
        self.observers.push(ObserverRecord {
            callback,
            targets: Vec::new(),
        });
        ObserverId(self.observers.len() - 1)
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    fn record_mut(&mut self, id: ObserverId) -> Result<&mut ObserverRecord> {
        self.observers
            .get_mut(id.0)
            .ok_or_else(|| Error::Dom(format!("unknown intersection observer #{}", id.0)))
    }

    /// Observing an already observed target is a no-op.
    pub(crate) fn observe(&mut self, id: ObserverId, node: NodeId) -> Result<bool> {
        let record = self.record_mut(id)?;
        if record.targets.iter().any(|target| target.node == node) {
            return Ok(false);
        }
        record.targets.push(ObservedTarget {
            node,
            last_reported: None,
        });
        Ok(true)
    }

    pub(crate) fn unobserve(&mut self, id: ObserverId, node: NodeId) -> Result<bool> {
        let record = self.record_mut(id)?;
        let before = record.targets.len();
        record.targets.retain(|target| target.node != node);
        Ok(record.targets.len() != before)
    }

    pub(crate) fn disconnect(&mut self, id: ObserverId) -> Result<()> {
        self.record_mut(id)?.targets.clear();
        Ok(())
    }

    pub(crate) fn observed_targets(&self, id: ObserverId) -> Vec<NodeId> {
        self.observers
            .get(id.0)
            .map(|record| record.targets.iter().map(|target| target.node).collect())
            .unwrap_or_default()
    }

    /// Collects the entries whose intersection state changed since they were
    /// last reported, and marks them as reported.
    pub(crate) fn take_changes<F>(
        &mut self,
        index: usize,
        is_intersecting: F,
    ) -> Option<(ObserverId, ObserverCallback, Vec<IntersectionEntry>)>
    where
        F: Fn(NodeId) -> bool,
    {
        let record = self.observers.get_mut(index)?;
        let mut entries = Vec::new();
        for target in &mut record.targets {
            let now = is_intersecting(target.node);
            if target.last_reported != Some(now) {
                target.last_reported = Some(now);
                entries.push(IntersectionEntry {
                    target: target.node,
                    is_intersecting: now,
                });
            }
        }
        if entries.is_empty() {
            return None;
        }
        Some((ObserverId(index), Rc::clone(&record.callback), entries))
    }
}

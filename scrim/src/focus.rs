//! Focus management.
//!
//! The host (a terminal UI, a DOM bridge, a test harness) owns the notion of
//! which element is focused. Overlays only need to read it, move it and check
//! whether a previously focused element still exists.

use std::collections::HashSet;
use std::sync::Mutex;

/// Identifier of a focusable element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusTarget(pub String);

impl FocusTarget {
    /// Create a new focus target.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The element id.
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FocusTarget {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FocusTarget {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Focus operations provided by the host.
pub trait FocusHost: Send + Sync {
    /// The element that currently holds focus.
    fn active(&self) -> Option<FocusTarget>;

    /// Move focus to an element.
    fn focus(&self, target: &FocusTarget);

    /// Whether an element is still part of the document.
    fn is_attached(&self, target: &FocusTarget) -> bool;

    /// Insert an element into the document.
    fn attach(&self, target: &FocusTarget);

    /// Remove an element from the document. Clears focus if it held it.
    fn detach(&self, target: &FocusTarget);
}

#[derive(Debug, Default)]
struct TrackerState {
    current: Option<FocusTarget>,
    attached: HashSet<FocusTarget>,
}

/// In-memory focus host.
#[derive(Debug, Default)]
pub struct FocusTracker {
    state: Mutex<TrackerState>,
}

impl FocusTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut TrackerState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Clear focus.
    pub fn blur(&self) {
        self.with_state(|s| s.current = None);
    }
}

impl FocusHost for FocusTracker {
    fn active(&self) -> Option<FocusTarget> {
        self.with_state(|s| s.current.clone())
    }

    fn focus(&self, target: &FocusTarget) {
        self.with_state(|s| {
            s.attached.insert(target.clone());
            s.current = Some(target.clone());
        });
    }

    fn is_attached(&self, target: &FocusTarget) -> bool {
        self.with_state(|s| s.attached.contains(target))
    }

    fn attach(&self, target: &FocusTarget) {
        self.with_state(|s| {
            s.attached.insert(target.clone());
        });
    }

    fn detach(&self, target: &FocusTarget) {
        self.with_state(|s| {
            s.attached.remove(target);
            if s.current.as_ref() == Some(target) {
                s.current = None;
            }
        });
    }
}

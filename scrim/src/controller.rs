//! Overlay stack management.
//!
//! The controller keeps a registry of mounted overlays in stacking order. It
//! hands out stacking indices, answers "which overlay is on top", and routes
//! the close key to the top-most overlay only.
//!
//! Entries refer to their overlay weakly until it is presented. From then on
//! the entry holds a strong reference until the overlay is dismissed, so a
//! visible overlay stays mounted even after its creator drops every handle.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};

use serde_json::Value;

use crate::event::ROLE_CANCEL;
use crate::overlay::{Overlay, OverlayId, OverlayShared};

/// Base z-index of overlays. The overlay index is added to it.
pub const Z_INDEX_BASE: u32 = 40000;

/// Stacking z-index of an overlay index.
pub fn z_index(index: u64) -> u32 {
    Z_INDEX_BASE.saturating_add(u32::try_from(index).unwrap_or(u32::MAX))
}

struct Entry {
    id: OverlayId,
    index: u64,
    overlay: Weak<OverlayShared>,
    pinned: Option<Arc<OverlayShared>>,
}

#[derive(Default)]
struct ControllerInner {
    next_index: AtomicU64,
    entries: Mutex<Vec<Entry>>,
}

/// Registry of mounted overlays.
///
/// Cheap to clone; clones share the registry.
#[derive(Clone, Default)]
pub struct OverlayController {
    inner: Arc<ControllerInner>,
}

static GLOBAL: OnceLock<OverlayController> = OnceLock::new();

impl OverlayController {
    /// Create an empty controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide controller.
    pub fn global() -> &'static OverlayController {
        GLOBAL.get_or_init(OverlayController::new)
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, Vec<Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Register an overlay and assign its index.
    ///
    /// Indices increase monotonically for the controller's lifetime and are
    /// never reused.
    pub(crate) fn register(&self, id: OverlayId, overlay: Weak<OverlayShared>) -> u64 {
        let index = self.inner.next_index.fetch_add(1, Ordering::SeqCst) + 1;
        self.entries().push(Entry {
            id,
            index,
            overlay,
            pinned: None,
        });
        log::debug!("Registered overlay {} with index {}", id, index);
        index
    }

    /// Keep a presenting overlay alive until it is deregistered.
    pub(crate) fn pin(&self, id: OverlayId, overlay: Arc<OverlayShared>) {
        let mut overlay = Some(overlay);
        {
            let mut entries = self.entries();
            if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
                entry.pinned = overlay.take();
            }
        }
        if overlay.is_some() {
            log::warn!("Cannot pin overlay {}: not registered", id);
        }
    }

    /// Remove an overlay from the registry, releasing its pin. Unknown ids
    /// are ignored.
    pub(crate) fn deregister(&self, id: OverlayId) {
        let removed = {
            let mut entries = self.entries();
            let position = entries.iter().position(|entry| entry.id == id);
            position.map(|i| entries.remove(i))
        };
        // The pin may be the last reference; its drop re-enters `deregister`,
        // so it must happen after the lock is released.
        if let Some(entry) = removed {
            log::debug!("Deregistered overlay {}", id);
            drop(entry);
        }
    }

    /// Number of mounted overlays.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of mounted overlays, lowest first.
    pub fn overlays(&self) -> Vec<Overlay> {
        // Upgrade outside the lock: dropping the last handle deregisters.
        let weak: Vec<Weak<OverlayShared>> =
            self.entries().iter().map(|e| e.overlay.clone()).collect();
        weak.iter()
            .filter_map(Weak::upgrade)
            .map(Overlay::from_shared)
            .collect()
    }

    /// Indices of mounted overlays, lowest first.
    pub fn indices(&self) -> Vec<u64> {
        self.entries().iter().map(|e| e.index).collect()
    }

    /// Look up a mounted overlay by id.
    pub fn get(&self, id: OverlayId) -> Option<Overlay> {
        let weak = self
            .entries()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.overlay.clone())?;
        weak.upgrade().map(Overlay::from_shared)
    }

    /// Top-most presented overlay.
    pub fn top(&self) -> Option<Overlay> {
        self.overlays()
            .into_iter()
            .rev()
            .find(Overlay::is_presented)
    }

    /// Overlay that currently owns focus.
    pub fn focus_owner(&self) -> Option<OverlayId> {
        self.top().map(|overlay| overlay.id())
    }

    /// Deliver the close key.
    ///
    /// Only the top-most presented overlay may intercept it, and only if it
    /// has keyboard close enabled. It is dismissed with the cancel role.
    pub async fn handle_close_key(&self) -> bool {
        let Some(top) = self.top() else {
            return false;
        };
        if !top.config().keyboard_close {
            log::trace!("Close key ignored: top overlay {} has keyboard close off", top.id());
            return false;
        }
        top.dismiss(None, Some(ROLE_CANCEL.to_string())).await
    }

    /// Dismiss an overlay by element id, or the top-most presented one.
    pub async fn dismiss_top(
        &self,
        data: Option<Value>,
        role: Option<String>,
        element_id: Option<&str>,
    ) -> bool {
        let target = match element_id {
            Some(element_id) => self
                .overlays()
                .into_iter()
                .find(|o| o.element_id() == element_id),
            None => self.top(),
        };
        match target {
            Some(overlay) => overlay.dismiss(data, role).await,
            None => {
                log::warn!("dismiss_top: no overlay to dismiss ({:?})", element_id);
                false
            }
        }
    }
}

impl fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayController")
            .field("indices", &self.indices())
            .finish()
    }
}

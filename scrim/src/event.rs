//! Lifecycle events.
//!
//! Every overlay owns an [`EventEmitter`]. Listeners either subscribe to the
//! whole stream or wait once for the next event of a given kind.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::overlay::OverlayKind;

/// Role passed when the overlay was dismissed by tapping the backdrop.
pub const ROLE_BACKDROP: &str = "backdrop";
/// Role of cancel buttons and of the close key.
pub const ROLE_CANCEL: &str = "cancel";

/// Returns true for roles that cancel the overlay.
pub fn is_cancel(role: Option<&str>) -> bool {
    matches!(role, Some(ROLE_CANCEL) | Some(ROLE_BACKDROP))
}

/// Payload of the dismiss events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayEventDetail {
    pub data: Option<Value>,
    pub role: Option<String>,
}

impl OverlayEventDetail {
    /// Create a detail from data and role.
    pub fn new(data: Option<Value>, role: Option<String>) -> Self {
        Self { data, role }
    }
}

/// Lifecycle event emitted by an overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    WillPresent,
    DidPresent,
    WillDismiss(OverlayEventDetail),
    DidDismiss(OverlayEventDetail),
}

/// Discriminant of [`OverlayEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayEventKind {
    WillPresent,
    DidPresent,
    WillDismiss,
    DidDismiss,
}

impl OverlayEvent {
    /// The event's kind.
    pub fn kind(&self) -> OverlayEventKind {
        match self {
            OverlayEvent::WillPresent => OverlayEventKind::WillPresent,
            OverlayEvent::DidPresent => OverlayEventKind::DidPresent,
            OverlayEvent::WillDismiss(_) => OverlayEventKind::WillDismiss,
            OverlayEvent::DidDismiss(_) => OverlayEventKind::DidDismiss,
        }
    }

    /// Dismiss payload, if this is a dismiss event.
    pub fn detail(&self) -> Option<&OverlayEventDetail> {
        match self {
            OverlayEvent::WillDismiss(detail) | OverlayEvent::DidDismiss(detail) => Some(detail),
            _ => None,
        }
    }

    /// Public event name for an overlay kind, e.g. `loadingDidDismiss`.
    pub fn name(&self, kind: OverlayKind) -> String {
        let suffix = match self.kind() {
            OverlayEventKind::WillPresent => "WillPresent",
            OverlayEventKind::DidPresent => "DidPresent",
            OverlayEventKind::WillDismiss => "WillDismiss",
            OverlayEventKind::DidDismiss => "DidDismiss",
        };
        format!("{}{}", kind.as_str(), suffix)
    }
}

/// Broadcasts lifecycle events to any number of listeners.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<OverlayEvent>,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEmitter {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Send an event. Having no listeners is not an error.
    pub fn emit(&self, event: OverlayEvent) {
        let _ = self.tx.send(event);
    }

    /// Subscribe to every subsequent event.
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.tx.subscribe()
    }

    /// Wait for the next event of `kind` and return its payload.
    ///
    /// The subscription is taken when this is called, not when the future is
    /// first polled, so events emitted in between are not missed. The future
    /// never resolves if the emitter goes away first.
    pub fn next(&self, kind: OverlayEventKind) -> BoxFuture<'static, OverlayEventDetail> {
        let rx = self.subscribe();
        wait_for(rx, kind).boxed()
    }
}

async fn wait_for(
    mut rx: broadcast::Receiver<OverlayEvent>,
    kind: OverlayEventKind,
) -> OverlayEventDetail {
    loop {
        match rx.recv().await {
            Ok(event) if event.kind() == kind => {
                return event.detail().cloned().unwrap_or_default();
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("Event listener lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => {
                return std::future::pending().await;
            }
        }
    }
}

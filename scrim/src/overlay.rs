//! Overlay instances and their present/dismiss protocol.
//!
//! An [`Overlay`] is one physical dialog. It is registered with the
//! controller when created, presented at most once, and dismissed at most
//! once. From the start of presentation until dismissal the controller holds
//! the overlay alive, so dropping every handle never tears down a visible
//! overlay. Components such as the loading indicator and the alert wrap an
//! `Overlay` and add their own content on top.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::animation::{Animation, AnimationBuilder, presets};
use crate::content::Message;
use crate::context::OverlayContext;
use crate::controller;
use crate::event::{EventEmitter, OverlayEvent, OverlayEventDetail, OverlayEventKind, ROLE_BACKDROP};
use crate::focus::FocusTarget;
use crate::platform::{Mode, resolve_mode};

/// Extra delay added to auto-dismiss durations.
pub const AUTO_DISMISS_SKEW: Duration = Duration::from_millis(10);

/// Unique identifier for an overlay instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(Uuid);

impl OverlayId {
    /// Create a new random overlay ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OverlayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which component an overlay belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Loading,
    Alert,
}

impl OverlayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayKind::Loading => "loading",
            OverlayKind::Alert => "alert",
        }
    }
}

/// Lifecycle phase of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Registered, not yet presented.
    Mounted,
    /// Enter animation running.
    Presenting,
    /// Visible and interactive.
    Presented,
    /// Leave animation running.
    Dismissing,
    /// Gone. Terminal.
    Dismissed,
}

/// Per-instance configuration, fixed at creation.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Custom element id. Defaults to `{kind}-overlay-{index}`.
    pub id: Option<String>,
    pub message: Option<Message>,
    /// Auto-dismiss delay. Zero disables auto-dismiss.
    pub duration: Duration,
    pub backdrop_dismiss: bool,
    pub show_backdrop: bool,
    pub translucent: bool,
    pub animated: bool,
    pub keyboard_close: bool,
    /// Style override. Resolved from config and platform when unset.
    pub mode: Option<Mode>,
    pub enter_animation: Option<AnimationBuilder>,
    pub leave_animation: Option<AnimationBuilder>,
    pub html_attributes: BTreeMap<String, String>,
    pub css_class: Vec<String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            id: None,
            message: None,
            duration: Duration::ZERO,
            backdrop_dismiss: false,
            show_backdrop: true,
            translucent: false,
            animated: true,
            keyboard_close: true,
            mode: None,
            enter_animation: None,
            leave_animation: None,
            html_attributes: BTreeMap::new(),
            css_class: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct LifecycleState {
    phase: Phase,
    last_focus: Option<FocusTarget>,
    duration_timeout: Option<CancellationToken>,
    will_dismiss: Option<OverlayEventDetail>,
    did_dismiss: Option<OverlayEventDetail>,
}

/// Awaited after `WillDismiss` is emitted and before the leave animation.
pub(crate) type WillDismissHook =
    Arc<dyn Fn(OverlayEventDetail) -> BoxFuture<'static, ()> + Send + Sync>;

pub(crate) struct OverlayShared {
    id: OverlayId,
    kind: OverlayKind,
    index: u64,
    element_id: String,
    mode: Mode,
    config: OverlayConfig,
    ctx: OverlayContext,
    events: EventEmitter,
    state: Mutex<LifecycleState>,
    will_dismiss_hook: OnceLock<WillDismissHook>,
}

// Presented overlays are pinned by the controller, so this only runs for
// overlays that were never presented or are already dismissed.
impl Drop for OverlayShared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = state.duration_timeout.take() {
            token.cancel();
        }
        if state.phase != Phase::Dismissed {
            log::debug!("Overlay {} dropped in phase {:?}", self.element_id, state.phase);
            self.ctx.focus().detach(&FocusTarget::new(self.element_id.clone()));
        }
        self.ctx.controller().deregister(self.id);
    }
}

enum Transition {
    Enter,
    Leave,
}

/// Handle to an overlay instance. Clones refer to the same overlay.
#[derive(Clone)]
pub struct Overlay {
    shared: Arc<OverlayShared>,
}

impl Overlay {
    /// Create an overlay and register it with the context's controller.
    pub fn new(ctx: &OverlayContext, kind: OverlayKind, config: OverlayConfig) -> Self {
        let id = OverlayId::new();
        let mode = resolve_mode(config.mode, ctx.config(), ctx.platform());
        let shared = Arc::new_cyclic(|weak| {
            let index = ctx.controller().register(id, weak.clone());
            let element_id = config
                .id
                .clone()
                .unwrap_or_else(|| format!("{}-overlay-{}", kind.as_str(), index));
            OverlayShared {
                id,
                kind,
                index,
                element_id,
                mode,
                config,
                ctx: ctx.clone(),
                events: EventEmitter::new(),
                state: Mutex::new(LifecycleState {
                    phase: Phase::Mounted,
                    last_focus: None,
                    duration_timeout: None,
                    will_dismiss: None,
                    did_dismiss: None,
                }),
                will_dismiss_hook: OnceLock::new(),
            }
        });
        ctx.focus()
            .attach(&FocusTarget::new(shared.element_id.clone()));
        Self { shared }
    }

    pub(crate) fn from_shared(shared: Arc<OverlayShared>) -> Self {
        Self { shared }
    }

    /// Install the hook run on every dismissal. Only the first call has an
    /// effect.
    pub(crate) fn set_will_dismiss_hook(&self, hook: WillDismissHook) {
        if self.shared.will_dismiss_hook.set(hook).is_err() {
            log::warn!("Will-dismiss hook of {} already set", self.shared.element_id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, LifecycleState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn id(&self) -> OverlayId {
        self.shared.id
    }

    pub fn kind(&self) -> OverlayKind {
        self.shared.kind
    }

    /// Stacking index assigned at registration.
    pub fn index(&self) -> u64 {
        self.shared.index
    }

    pub fn element_id(&self) -> &str {
        &self.shared.element_id
    }

    pub fn z_index(&self) -> u32 {
        controller::z_index(self.shared.index)
    }

    pub fn mode(&self) -> Mode {
        self.shared.mode
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.shared.config
    }

    pub fn context(&self) -> &OverlayContext {
        &self.shared.ctx
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// True between the end of presentation and the start of dismissal.
    pub fn is_presented(&self) -> bool {
        self.phase() == Phase::Presented
    }

    /// Whether an auto-dismiss timer is currently armed.
    pub fn has_pending_auto_dismiss(&self) -> bool {
        self.lock().duration_timeout.is_some()
    }

    /// Element that held focus before presentation.
    pub fn last_focus(&self) -> Option<FocusTarget> {
        self.lock().last_focus.clone()
    }

    /// Subscribe to every lifecycle event from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.shared.events.subscribe()
    }

    /// Resolves with the payload of the next `WillDismiss` event.
    ///
    /// Resolves immediately if the overlay has already started dismissing.
    pub fn on_will_dismiss(&self) -> BoxFuture<'static, OverlayEventDetail> {
        let state = self.lock();
        match &state.will_dismiss {
            Some(detail) => futures::future::ready(detail.clone()).boxed(),
            None => self.shared.events.next(OverlayEventKind::WillDismiss),
        }
    }

    /// Resolves with the payload of the next `DidDismiss` event.
    ///
    /// Resolves immediately if the overlay has already been dismissed.
    pub fn on_did_dismiss(&self) -> BoxFuture<'static, OverlayEventDetail> {
        let state = self.lock();
        match &state.did_dismiss {
            Some(detail) => futures::future::ready(detail.clone()).boxed(),
            None => self.shared.events.next(OverlayEventKind::DidDismiss),
        }
    }

    fn emit(&self, event: OverlayEvent) {
        log::trace!("{} {}", self.shared.element_id, event.name(self.shared.kind));
        self.shared.events.emit(event);
    }

    fn animation(&self, transition: Transition) -> Animation {
        let config = &self.shared.config;
        let (kind, mode) = (self.shared.kind, self.shared.mode);
        let builder = match transition {
            Transition::Enter => config
                .enter_animation
                .clone()
                .unwrap_or_else(|| presets::enter(kind, mode)),
            Transition::Leave => config
                .leave_animation
                .clone()
                .unwrap_or_else(|| presets::leave(kind, mode)),
        };
        let animation = builder.build(&self.shared.element_id);
        if config.animated && self.shared.ctx.animations_enabled() {
            animation
        } else {
            animation.with_duration(Duration::ZERO)
        }
    }

    /// Present the overlay.
    ///
    /// Does nothing unless the overlay is freshly mounted.
    pub async fn present(&self) {
        {
            let mut state = self.lock();
            if state.phase != Phase::Mounted {
                log::debug!(
                    "present() on {} ignored in phase {:?}",
                    self.shared.element_id,
                    state.phase
                );
                return;
            }
            state.phase = Phase::Presenting;
        }
        self.shared
            .ctx
            .controller()
            .pin(self.shared.id, Arc::clone(&self.shared));

        self.emit(OverlayEvent::WillPresent);

        let focus = self.shared.ctx.focus();
        let previous = focus.active();
        self.lock().last_focus = previous;

        let animation = self.animation(Transition::Enter);
        self.shared
            .ctx
            .animator()
            .run(animation, self.shared.mode)
            .await;

        self.lock().phase = Phase::Presented;
        focus.focus(&FocusTarget::new(self.shared.element_id.clone()));
        self.emit(OverlayEvent::DidPresent);

        let duration = self.shared.config.duration;
        if !duration.is_zero() {
            self.arm_auto_dismiss(duration);
        }
    }

    fn arm_auto_dismiss(&self, duration: Duration) {
        let token = CancellationToken::new();
        {
            let mut state = self.lock();
            if state.phase != Phase::Presented {
                return;
            }
            if let Some(previous) = state.duration_timeout.replace(token.clone()) {
                previous.cancel();
            }
        }

        let weak = Arc::downgrade(&self.shared);
        let delay = duration + AUTO_DISMISS_SKEW;
        log::debug!("Auto-dismiss of {} armed for {:?}", self.shared.element_id, delay);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Some(shared) = weak.upgrade() {
                        Overlay::from_shared(shared).dismiss(None, None).await;
                    }
                }
            }
        });
    }

    /// Cancel a pending auto-dismiss without dismissing.
    pub fn cancel_auto_dismiss(&self) {
        if let Some(token) = self.lock().duration_timeout.take() {
            token.cancel();
            log::trace!("Auto-dismiss of {} cancelled", self.shared.element_id);
        }
    }

    /// Dismiss the overlay.
    ///
    /// Returns `true` if a presentation was ended, `false` if there was
    /// nothing to dismiss. The auto-dismiss timer is cancelled in either case.
    pub async fn dismiss(&self, data: Option<Value>, role: Option<String>) -> bool {
        let detail = OverlayEventDetail::new(data, role);
        {
            let mut state = self.lock();
            if let Some(token) = state.duration_timeout.take() {
                token.cancel();
            }
            if state.phase != Phase::Presented {
                log::debug!(
                    "dismiss() on {} ignored in phase {:?}",
                    self.shared.element_id,
                    state.phase
                );
                return false;
            }
            state.phase = Phase::Dismissing;
            // Recorded and emitted under the lock so late awaiters see one or the other.
            state.will_dismiss = Some(detail.clone());
            self.emit(OverlayEvent::WillDismiss(detail.clone()));
        }

        if let Some(hook) = self.shared.will_dismiss_hook.get() {
            hook(detail.clone()).await;
        }

        let animation = self.animation(Transition::Leave);
        self.shared
            .ctx
            .animator()
            .run(animation, self.shared.mode)
            .await;

        let last_focus = {
            let mut state = self.lock();
            state.phase = Phase::Dismissed;
            state.last_focus.take()
        };

        let focus = self.shared.ctx.focus();
        focus.detach(&FocusTarget::new(self.shared.element_id.clone()));
        if let Some(previous) = last_focus {
            if focus.is_attached(&previous) {
                focus.focus(&previous);
            } else {
                log::trace!("Previous focus {} is gone, not restoring", previous.id());
            }
        }

        // Releases the pin taken in `present()`.
        self.shared.ctx.controller().deregister(self.shared.id);

        {
            let mut state = self.lock();
            state.did_dismiss = Some(detail.clone());
            self.emit(OverlayEvent::DidDismiss(detail));
        }
        true
    }

    /// Handle a tap on the backdrop.
    ///
    /// Dismisses with the backdrop role only if backdrop dismissal is enabled.
    pub async fn on_backdrop_tap(&self) -> bool {
        if !self.shared.config.backdrop_dismiss {
            log::trace!("Backdrop tap on {} ignored", self.shared.element_id);
            return false;
        }
        self.dismiss(None, Some(ROLE_BACKDROP.to_string())).await
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("id", &self.shared.id)
            .field("kind", &self.shared.kind)
            .field("index", &self.shared.index)
            .field("phase", &self.phase())
            .finish()
    }
}

//! Loading indicator overlay.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::animation::AnimationBuilder;
use crate::content::Message;
use crate::context::OverlayContext;
use crate::event::OverlayEventDetail;
use crate::overlay::{Overlay, OverlayConfig, OverlayKind, Phase};
use crate::platform::Mode;
use crate::spinner::{Choice, SpinnerKind, resolve_loading_spinner};
use crate::view::{HostView, ViewNode};

/// Options for creating a [`Loading`].
#[derive(Debug, Clone)]
pub struct LoadingOptions {
    pub id: Option<String>,
    pub message: Option<Message>,
    pub css_class: Vec<String>,
    /// Auto-dismiss after this long. Zero keeps the indicator up until dismissed.
    pub duration: Duration,
    pub backdrop_dismiss: bool,
    pub show_backdrop: bool,
    pub spinner: Choice<SpinnerKind>,
    pub translucent: bool,
    pub animated: bool,
    pub keyboard_close: bool,
    pub html_attributes: BTreeMap<String, String>,
    pub mode: Option<Mode>,
    pub enter_animation: Option<AnimationBuilder>,
    pub leave_animation: Option<AnimationBuilder>,
}

impl Default for LoadingOptions {
    fn default() -> Self {
        let base = OverlayConfig::default();
        Self {
            id: None,
            message: None,
            css_class: Vec::new(),
            duration: Duration::ZERO,
            backdrop_dismiss: false,
            show_backdrop: base.show_backdrop,
            spinner: Choice::Unset,
            translucent: base.translucent,
            animated: base.animated,
            keyboard_close: base.keyboard_close,
            html_attributes: BTreeMap::new(),
            mode: None,
            enter_animation: None,
            leave_animation: None,
        }
    }
}

impl LoadingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn spinner(mut self, spinner: Choice<SpinnerKind>) -> Self {
        self.spinner = spinner;
        self
    }

    pub fn backdrop_dismiss(mut self, enabled: bool) -> Self {
        self.backdrop_dismiss = enabled;
        self
    }

    pub fn show_backdrop(mut self, visible: bool) -> Self {
        self.show_backdrop = visible;
        self
    }

    pub fn translucent(mut self, enabled: bool) -> Self {
        self.translucent = enabled;
        self
    }

    pub fn animated(mut self, enabled: bool) -> Self {
        self.animated = enabled;
        self
    }

    pub fn keyboard_close(mut self, enabled: bool) -> Self {
        self.keyboard_close = enabled;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class.push(class.into());
        self
    }

    pub fn html_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.html_attributes.insert(name.into(), value.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn enter_animation(mut self, builder: AnimationBuilder) -> Self {
        self.enter_animation = Some(builder);
        self
    }

    pub fn leave_animation(mut self, builder: AnimationBuilder) -> Self {
        self.leave_animation = Some(builder);
        self
    }

    fn into_parts(self) -> (OverlayConfig, Choice<SpinnerKind>) {
        let config = OverlayConfig {
            id: self.id,
            message: self.message,
            duration: self.duration,
            backdrop_dismiss: self.backdrop_dismiss,
            show_backdrop: self.show_backdrop,
            translucent: self.translucent,
            animated: self.animated,
            keyboard_close: self.keyboard_close,
            mode: self.mode,
            enter_animation: self.enter_animation,
            leave_animation: self.leave_animation,
            html_attributes: self.html_attributes,
            css_class: self.css_class,
        };
        (config, self.spinner)
    }
}

/// A loading indicator.
///
/// ```ignore
/// let loading = Loading::create(&ctx, LoadingOptions::new()
///     .message("Syncing...")
///     .duration(Duration::from_secs(3)));
/// loading.present().await;
/// let detail = loading.on_did_dismiss().await;
/// ```
#[derive(Debug, Clone)]
pub struct Loading {
    overlay: Overlay,
    spinner_choice: Choice<SpinnerKind>,
    spinner: Arc<OnceLock<Option<SpinnerKind>>>,
}

impl Loading {
    /// Create and register a loading indicator. It is not shown until
    /// [`present`](Self::present) is called.
    pub fn create(ctx: &OverlayContext, options: LoadingOptions) -> Self {
        let (config, spinner_choice) = options.into_parts();
        Self {
            overlay: Overlay::new(ctx, OverlayKind::Loading, config),
            spinner_choice,
            spinner: Arc::new(OnceLock::new()),
        }
    }

    /// The underlying overlay.
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub async fn present(&self) {
        self.overlay.present().await
    }

    pub async fn dismiss(&self, data: Option<Value>, role: Option<String>) -> bool {
        self.overlay.dismiss(data, role).await
    }

    pub fn on_did_dismiss(&self) -> BoxFuture<'static, OverlayEventDetail> {
        self.overlay.on_did_dismiss()
    }

    pub fn on_will_dismiss(&self) -> BoxFuture<'static, OverlayEventDetail> {
        self.overlay.on_will_dismiss()
    }

    pub async fn on_backdrop_tap(&self) -> bool {
        self.overlay.on_backdrop_tap().await
    }

    /// Spinner to show, resolved on first read.
    pub fn spinner(&self) -> Option<SpinnerKind> {
        *self.spinner.get_or_init(|| {
            resolve_loading_spinner(
                &self.spinner_choice,
                self.overlay.mode(),
                self.overlay.context().config(),
            )
        })
    }

    /// Element id of the message, which labels the dialog.
    pub fn message_id(&self) -> String {
        format!("loading-{}-msg", self.overlay.index())
    }

    /// Describe the current view.
    pub fn render(&self) -> HostView {
        let overlay = &self.overlay;
        let config = overlay.config();
        let ctx = overlay.context();
        let msg_id = self.message_id();
        let hidden = matches!(overlay.phase(), Phase::Mounted | Phase::Dismissed);

        let mut host = HostView::new()
            .attr("id", overlay.element_id())
            .attr("role", "dialog")
            .attr("aria-modal", "true")
            .attr("tabindex", "-1");
        if config.message.is_some() {
            host = host.attr("aria-labelledby", msg_id.clone());
        }
        let host = host
            .attrs(&config.html_attributes)
            .z_index(overlay.z_index())
            .classes(config.css_class.iter().cloned())
            .class_if(overlay.mode().as_str(), true)
            .class_if("overlay-hidden", hidden)
            .class_if("loading-translucent", config.translucent);

        let mut wrapper = Vec::new();
        if let Some(kind) = self.spinner() {
            wrapper.push(ViewNode::container(
                "loading-spinner",
                vec![ViewNode::Spinner {
                    kind,
                    paused: false,
                }],
            ));
        }
        if let Some(message) = &config.message {
            wrapper.push(ViewNode::Content {
                class: "loading-content".to_string(),
                id: Some(msg_id),
                content: ctx.content_gate().render(message, ctx.sanitizer()),
            });
        }

        host.child(ViewNode::Backdrop {
            visible: config.show_backdrop,
            tappable: config.backdrop_dismiss,
        })
        .child(ViewNode::FocusSentinel)
        .child(ViewNode::container(
            "loading-wrapper overlay-wrapper",
            wrapper,
        ))
        .child(ViewNode::FocusSentinel)
    }
}

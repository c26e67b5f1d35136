//! Content shown inside a pull-to-refresh area.

use std::sync::{Arc, OnceLock};

use crate::content::Message;
use crate::context::OverlayContext;
use crate::platform::{Mode, resolve_mode};
use crate::spinner::{
    CARET_BACK_SHARP_ICON, Choice, PullingIcon, SpinnerKind, resolve_pulling_icon,
    resolve_refreshing_spinner,
};
use crate::view::{HostView, ViewNode};

/// Options for [`RefresherContent`].
#[derive(Debug, Clone, Default)]
pub struct RefresherContentOptions {
    pub pulling_icon: Choice<PullingIcon>,
    pub pulling_text: Option<Message>,
    pub refreshing_spinner: Choice<SpinnerKind>,
    pub refreshing_text: Option<Message>,
    pub mode: Option<Mode>,
}

impl RefresherContentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pulling_icon(mut self, icon: Choice<PullingIcon>) -> Self {
        self.pulling_icon = icon;
        self
    }

    pub fn pulling_text(mut self, text: impl Into<Message>) -> Self {
        self.pulling_text = Some(text.into());
        self
    }

    pub fn refreshing_spinner(mut self, spinner: Choice<SpinnerKind>) -> Self {
        self.refreshing_spinner = spinner;
        self
    }

    pub fn refreshing_text(mut self, text: impl Into<Message>) -> Self {
        self.refreshing_text = Some(text.into());
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }
}

#[derive(Debug, Default)]
struct Resolved {
    pulling_icon: OnceLock<Option<PullingIcon>>,
    refreshing_spinner: OnceLock<Option<SpinnerKind>>,
}

/// Pulling and refreshing indicators of a refresher.
#[derive(Debug, Clone)]
pub struct RefresherContent {
    ctx: OverlayContext,
    mode: Mode,
    options: RefresherContentOptions,
    resolved: Arc<Resolved>,
}

impl RefresherContent {
    pub fn new(ctx: &OverlayContext, options: RefresherContentOptions) -> Self {
        let mode = resolve_mode(options.mode, ctx.config(), ctx.platform());
        Self {
            ctx: ctx.clone(),
            mode,
            options,
            resolved: Arc::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Icon shown while pulling, resolved on first read.
    pub fn pulling_icon(&self) -> Option<PullingIcon> {
        self.resolved
            .pulling_icon
            .get_or_init(|| {
                resolve_pulling_icon(
                    &self.options.pulling_icon,
                    self.mode,
                    self.ctx.platform(),
                    self.ctx.config(),
                )
            })
            .clone()
    }

    /// Spinner shown while refreshing, resolved on first read.
    pub fn refreshing_spinner(&self) -> Option<SpinnerKind> {
        *self.resolved.refreshing_spinner.get_or_init(|| {
            resolve_refreshing_spinner(
                &self.options.refreshing_spinner,
                self.mode,
                self.ctx.config(),
            )
        })
    }

    fn text(&self, class: &str, message: &Option<Message>) -> Option<ViewNode> {
        message.as_ref().map(|message| ViewNode::Content {
            class: class.to_string(),
            id: None,
            content: self
                .ctx
                .content_gate()
                .render(message, self.ctx.sanitizer()),
        })
    }

    fn pulling_section(&self) -> ViewNode {
        let mut icon = Vec::new();
        match self.pulling_icon() {
            Some(PullingIcon::Spinner(kind)) => {
                icon.push(ViewNode::container(
                    "spinner-pulling",
                    vec![ViewNode::Spinner { kind, paused: true }],
                ));
                // md draws an arrow head next to the circular spinner
                if self.mode == Mode::Md && kind == SpinnerKind::Circular {
                    icon.push(ViewNode::container(
                        "arrow-container",
                        vec![ViewNode::Icon {
                            name: CARET_BACK_SHARP_ICON.to_string(),
                        }],
                    ));
                }
            }
            Some(PullingIcon::Icon(name)) => icon.push(ViewNode::Icon { name }),
            None => {}
        }

        let mut children = vec![ViewNode::container("refresher-pulling-icon", icon)];
        children.extend(self.text("refresher-pulling-text", &self.options.pulling_text));
        ViewNode::container("refresher-pulling", children)
    }

    fn refreshing_section(&self) -> ViewNode {
        let spinner = self
            .refreshing_spinner()
            .map(|kind| ViewNode::Spinner {
                kind,
                paused: false,
            })
            .into_iter()
            .collect();

        let mut children = vec![ViewNode::container("refresher-refreshing-icon", spinner)];
        children.extend(self.text("refresher-refreshing-text", &self.options.refreshing_text));
        ViewNode::container("refresher-refreshing", children)
    }

    /// Describe the current view.
    pub fn render(&self) -> HostView {
        HostView::new()
            .class_if(self.mode.as_str(), true)
            .child(self.pulling_section())
            .child(self.refreshing_section())
    }
}

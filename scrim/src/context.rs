//! Collaborators shared by every overlay.

use std::fmt;
use std::sync::Arc;

use crate::animation::{AnimationRunner, TimedRunner};
use crate::config::{self, Config, keys};
use crate::content::{AllowListSanitizer, ContentGate, Sanitizer};
use crate::controller::OverlayController;
use crate::focus::{FocusHost, FocusTracker};
use crate::platform::{Platform, StaticPlatform};

/// Everything an overlay needs from its surroundings.
///
/// Cheap to clone. The default context uses the process-wide controller and
/// config, a [`TimedRunner`], an in-memory [`FocusTracker`], a desktop
/// platform and the [`AllowListSanitizer`].
#[derive(Clone)]
pub struct OverlayContext {
    controller: OverlayController,
    animator: Arc<dyn AnimationRunner>,
    focus: Arc<dyn FocusHost>,
    platform: Arc<dyn Platform>,
    config: Arc<Config>,
    sanitizer: Arc<dyn Sanitizer>,
}

impl Default for OverlayContext {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayContext {
    /// Context backed by the process-wide controller and config.
    pub fn new() -> Self {
        Self {
            controller: OverlayController::global().clone(),
            animator: Arc::new(TimedRunner),
            focus: Arc::new(FocusTracker::new()),
            platform: Arc::new(StaticPlatform::desktop()),
            config: Arc::new(config::global().clone()),
            sanitizer: Arc::new(AllowListSanitizer),
        }
    }

    /// Fully isolated context: its own controller and an empty config.
    pub fn isolated() -> Self {
        Self::new()
            .with_controller(OverlayController::new())
            .with_config(Config::new())
    }

    pub fn with_controller(mut self, controller: OverlayController) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_animator(mut self, animator: impl AnimationRunner + 'static) -> Self {
        self.animator = Arc::new(animator);
        self
    }

    pub fn with_focus(mut self, focus: Arc<dyn FocusHost>) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Arc::new(platform);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizer = Arc::new(sanitizer);
        self
    }

    pub fn controller(&self) -> &OverlayController {
        &self.controller
    }

    pub fn animator(&self) -> &dyn AnimationRunner {
        self.animator.as_ref()
    }

    pub fn focus(&self) -> &dyn FocusHost {
        self.focus.as_ref()
    }

    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitizer(&self) -> &dyn Sanitizer {
        self.sanitizer.as_ref()
    }

    /// The custom-markup gate for this context's config.
    pub fn content_gate(&self) -> ContentGate {
        ContentGate::from_config(&self.config)
    }

    /// Global animation switch.
    pub fn animations_enabled(&self) -> bool {
        self.config.get_bool(keys::ANIMATED, true)
    }
}

impl fmt::Debug for OverlayContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayContext")
            .field("controller", &self.controller)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

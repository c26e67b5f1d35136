//! Overlay lifecycle for dialog-style UI components.
//!
//! Overlays are registered with an [`OverlayController`](controller::OverlayController),
//! presented with an enter animation, and dismissed at most once by the
//! caller, a timer, the backdrop or the close key. The loading indicator and
//! alert components are built on top of [`Overlay`](overlay::Overlay).

pub mod animation;
pub mod components;
pub mod config;
pub mod content;
pub mod context;
pub mod controller;
pub mod error;
pub mod event;
pub mod focus;
pub mod overlay;
pub mod platform;
pub mod spinner;
pub mod view;

pub use context::OverlayContext;
pub use controller::OverlayController;
pub use error::OverlayError;
pub use overlay::Overlay;

pub mod prelude {
    pub use crate::animation::{
        Animation, AnimationBuilder, AnimationRunner, FrameRunner, FrameSink, ImmediateRunner,
        TimedRunner,
    };
    pub use crate::components::{
        Alert, AlertButton, AlertInput, AlertInputType, AlertOptions, HandlerOutcome, Loading,
        LoadingOptions, RefresherContent, RefresherContentOptions,
    };
    pub use crate::config::{Config, keys};
    pub use crate::content::{Message, RenderedContent, SafeString, Sanitizer};
    pub use crate::context::OverlayContext;
    pub use crate::controller::OverlayController;
    pub use crate::error::{ConfigError, HandlerError, OverlayError};
    pub use crate::event::{OverlayEvent, OverlayEventDetail, ROLE_BACKDROP, ROLE_CANCEL};
    pub use crate::focus::{FocusHost, FocusTarget, FocusTracker};
    pub use crate::overlay::{Overlay, OverlayConfig, OverlayId, OverlayKind, Phase};
    pub use crate::platform::{Mode, Platform, PlatformKind, StaticPlatform};
    pub use crate::spinner::{Choice, PullingIcon, SpinnerKind};
    pub use crate::view::{HostView, ViewNode};
}

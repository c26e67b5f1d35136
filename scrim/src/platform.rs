//! Platform detection and style mode.

use std::collections::HashSet;
use std::fmt;

use crate::config::{Config, keys};

/// Platform style used to pick animations and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// iOS look.
    Ios,
    /// Material look (default).
    #[default]
    Md,
}

impl Mode {
    /// Class/attribute name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ios => "ios",
            Mode::Md => "md",
        }
    }

    /// Parse a mode name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ios" => Some(Mode::Ios),
            "md" => Some(Mode::Md),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of platform a host may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Ios,
    Android,
    Mobile,
    Tablet,
    Desktop,
    Hybrid,
    Pwa,
}

/// Platform queries consumed by the components.
pub trait Platform: Send + Sync {
    /// Whether the host matches the given platform kind.
    fn is_platform(&self, kind: PlatformKind) -> bool;

    /// Whether the host exposes the legacy overflow-scrolling style hint.
    fn has_legacy_overflow_scrolling(&self) -> bool {
        false
    }
}

/// A platform with a fixed set of kinds.
#[derive(Debug, Clone, Default)]
pub struct StaticPlatform {
    kinds: HashSet<PlatformKind>,
    overflow_scrolling: bool,
}

impl StaticPlatform {
    /// Desktop host.
    pub fn desktop() -> Self {
        Self::default().with(PlatformKind::Desktop)
    }

    /// iPhone-like host.
    pub fn ios_mobile() -> Self {
        Self::default()
            .with(PlatformKind::Ios)
            .with(PlatformKind::Mobile)
    }

    /// Android phone host.
    pub fn android_mobile() -> Self {
        Self::default()
            .with(PlatformKind::Android)
            .with(PlatformKind::Mobile)
    }

    /// Add a platform kind.
    pub fn with(mut self, kind: PlatformKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    /// Report the legacy overflow-scrolling hint.
    pub fn with_overflow_scrolling(mut self, enabled: bool) -> Self {
        self.overflow_scrolling = enabled;
        self
    }
}

impl Platform for StaticPlatform {
    fn is_platform(&self, kind: PlatformKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn has_legacy_overflow_scrolling(&self) -> bool {
        self.overflow_scrolling
    }
}

/// Resolve the effective mode: explicit override, then config, then platform.
pub fn resolve_mode(explicit: Option<Mode>, config: &Config, platform: &dyn Platform) -> Mode {
    if let Some(mode) = explicit {
        return mode;
    }
    if let Some(mode) = Mode::parse(config.get_str(keys::MODE, "")) {
        return mode;
    }
    if platform.is_platform(PlatformKind::Ios) {
        Mode::Ios
    } else {
        Mode::Md
    }
}

//! Spinner registry and one-time default resolution.
//!
//! Components that show a spinner or pull icon resolve it from layered
//! sources the first time it is read: the instance value, then specific and
//! general config keys, then a hard default that depends on the mode and
//! platform.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::config::{Config, keys};
use crate::error::SpinnerParseError;
use crate::platform::{Mode, Platform, PlatformKind};

/// Icon shown while pulling when no spinner is used.
pub const ARROW_DOWN_ICON: &str = "arrow-down";
/// Icon drawn next to the circular spinner on md.
pub const CARET_BACK_SHARP_ICON: &str = "caret-back-sharp";

/// Known spinner kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpinnerKind {
    Bubbles,
    Circles,
    Circular,
    Crescent,
    Dots,
    Lines,
    LinesSharp,
    LinesSharpSmall,
    LinesSmall,
}

impl SpinnerKind {
    /// All registered spinners.
    pub const ALL: [SpinnerKind; 9] = [
        SpinnerKind::Bubbles,
        SpinnerKind::Circles,
        SpinnerKind::Circular,
        SpinnerKind::Crescent,
        SpinnerKind::Dots,
        SpinnerKind::Lines,
        SpinnerKind::LinesSharp,
        SpinnerKind::LinesSharpSmall,
        SpinnerKind::LinesSmall,
    ];

    /// Registry name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpinnerKind::Bubbles => "bubbles",
            SpinnerKind::Circles => "circles",
            SpinnerKind::Circular => "circular",
            SpinnerKind::Crescent => "crescent",
            SpinnerKind::Dots => "dots",
            SpinnerKind::Lines => "lines",
            SpinnerKind::LinesSharp => "lines-sharp",
            SpinnerKind::LinesSharpSmall => "lines-sharp-small",
            SpinnerKind::LinesSmall => "lines-small",
        }
    }
}

impl fmt::Display for SpinnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpinnerKind {
    type Err = SpinnerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpinnerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SpinnerParseError(s.to_string()))
    }
}

/// An instance-level setting that may be left for defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice<T> {
    /// Resolve from config and defaults.
    #[default]
    Unset,
    /// Explicitly show nothing.
    Hidden,
    /// Explicit value.
    Set(T),
}

/// Icon shown while the user pulls a refresher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullingIcon {
    /// A spinner that reveals its ticks as the user pulls.
    Spinner(SpinnerKind),
    /// A static icon by name.
    Icon(String),
}

impl PullingIcon {
    /// Spinner names become spinners; anything else is an icon name.
    pub fn from_name(name: &str) -> Self {
        match name.parse() {
            Ok(kind) => PullingIcon::Spinner(kind),
            Err(_) => PullingIcon::Icon(name.to_string()),
        }
    }
}

/// Walk `keys` in order. A missing key falls through, an explicit `null`
/// hides, a parseable string wins. Anything else is logged and skipped.
fn layered<T>(
    config: &Config,
    keys: &[&str],
    parse: impl Fn(&str) -> Option<T>,
    fallback: impl FnOnce() -> Option<T>,
) -> Option<T> {
    for key in keys {
        match config.get(key) {
            None => continue,
            Some(Value::Null) => return None,
            Some(Value::String(name)) => match parse(name) {
                Some(value) => return Some(value),
                None => log::warn!("Ignoring unknown spinner '{}' in config key '{}'", name, key),
            },
            Some(other) => log::warn!("Ignoring non-string config value {} for '{}'", other, key),
        }
    }
    fallback()
}

fn parse_spinner(name: &str) -> Option<SpinnerKind> {
    name.parse().ok()
}

/// Resolve the loading indicator's spinner.
pub fn resolve_loading_spinner(
    choice: &Choice<SpinnerKind>,
    mode: Mode,
    config: &Config,
) -> Option<SpinnerKind> {
    match choice {
        Choice::Set(kind) => Some(*kind),
        Choice::Hidden => None,
        Choice::Unset => layered(
            config,
            &[keys::LOADING_SPINNER, keys::SPINNER],
            parse_spinner,
            || match mode {
                Mode::Ios => Some(SpinnerKind::Lines),
                Mode::Md => Some(SpinnerKind::Crescent),
            },
        ),
    }
}

/// Resolve the refresher's pulling icon.
pub fn resolve_pulling_icon(
    choice: &Choice<PullingIcon>,
    mode: Mode,
    platform: &dyn Platform,
    config: &Config,
) -> Option<PullingIcon> {
    match choice {
        Choice::Set(icon) => Some(icon.clone()),
        Choice::Hidden => None,
        Choice::Unset => layered(
            config,
            &[keys::REFRESHING_ICON],
            |name| Some(PullingIcon::from_name(name)),
            || {
                if mode == Mode::Ios && platform.is_platform(PlatformKind::Mobile) {
                    layered(
                        config,
                        &[keys::SPINNER],
                        |name| parse_spinner(name).map(PullingIcon::Spinner),
                        || {
                            if platform.has_legacy_overflow_scrolling() {
                                Some(PullingIcon::Spinner(SpinnerKind::Lines))
                            } else {
                                Some(PullingIcon::Icon(ARROW_DOWN_ICON.to_string()))
                            }
                        },
                    )
                } else {
                    Some(PullingIcon::Spinner(SpinnerKind::Circular))
                }
            },
        ),
    }
}

/// Resolve the refresher's refreshing spinner.
pub fn resolve_refreshing_spinner(
    choice: &Choice<SpinnerKind>,
    mode: Mode,
    config: &Config,
) -> Option<SpinnerKind> {
    match choice {
        Choice::Set(kind) => Some(*kind),
        Choice::Hidden => None,
        Choice::Unset => layered(
            config,
            &[keys::REFRESHING_SPINNER, keys::SPINNER],
            parse_spinner,
            || match mode {
                Mode::Ios => Some(SpinnerKind::Lines),
                Mode::Md => Some(SpinnerKind::Circular),
            },
        ),
    }
}

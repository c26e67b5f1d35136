//! Message content and the custom-markup gate.
//!
//! Message strings may contain markup. When custom markup is enabled (the
//! default) they are passed through a [`Sanitizer`] and inserted as markup;
//! when it is disabled they are inserted as literal text.

use std::sync::LazyLock;

use crate::config::{Config, HTML_CONTENT_ENABLED_DEFAULT, keys};

/// Markup the caller vouches for. Inserted without sanitizing when markup is
/// enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeString(pub String);

impl SafeString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

/// Text content of a message-bearing element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Untrusted string, sanitized before insertion as markup.
    Text(String),
    /// Trusted markup.
    Safe(SafeString),
}

impl Message {
    /// The raw string.
    pub fn as_str(&self) -> &str {
        match self {
            Message::Text(s) => s,
            Message::Safe(safe) => &safe.0,
        }
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

impl From<SafeString> for Message {
    fn from(safe: SafeString) -> Self {
        Message::Safe(safe)
    }
}

/// Content ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedContent {
    /// Interpreted as markup.
    Markup(String),
    /// Inserted verbatim, no markup interpretation.
    Text(String),
}

/// Neutralizes executable markup.
pub trait Sanitizer: Send + Sync {
    /// Return a safe version of `markup`.
    fn clean(&self, markup: &str) -> String;
}

static ALLOW_LIST: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::default();
    builder.link_rel(None);
    builder
});

/// Default sanitizer.
///
/// Allow-list based: only known formatting elements and attributes survive,
/// URLs are limited to safe schemes after entity decoding, and the contents
/// of `script` and `style` elements are dropped entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowListSanitizer;

impl Sanitizer for AllowListSanitizer {
    fn clean(&self, markup: &str) -> String {
        let out = ALLOW_LIST.clean(markup).to_string();
        if out != markup {
            log::debug!("Sanitizer removed unsafe markup");
        }
        out
    }
}

/// Process-wide switch between sanitized markup and plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentGate {
    html_enabled: bool,
}

impl ContentGate {
    pub fn new(html_enabled: bool) -> Self {
        Self { html_enabled }
    }

    /// Read the gate from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.get_bool(keys::HTML_CONTENT_ENABLED, HTML_CONTENT_ENABLED_DEFAULT))
    }

    pub fn html_enabled(&self) -> bool {
        self.html_enabled
    }

    /// Prepare a message for insertion.
    pub fn render(&self, message: &Message, sanitizer: &dyn Sanitizer) -> RenderedContent {
        if !self.html_enabled {
            return RenderedContent::Text(message.as_str().to_string());
        }
        match message {
            Message::Text(text) => RenderedContent::Markup(sanitizer.clean(text)),
            Message::Safe(safe) => RenderedContent::Markup(safe.0.clone()),
        }
    }
}

impl Default for ContentGate {
    fn default() -> Self {
        Self::new(HTML_CONTENT_ENABLED_DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_and_handlers() {
        let cleaned = AllowListSanitizer.clean(
            r#"<b>Hi</b><script>alert(1)</script><img src="x.png" onerror="steal()"><a href="javascript:go()">x</a>"#,
        );
        assert_eq!(cleaned, r#"<b>Hi</b><img src="x.png"><a>x</a>"#);
    }

    #[test]
    fn keeps_formatting() {
        let markup = "<em>Loading</em> <strong>data</strong>";
        assert_eq!(AllowListSanitizer.clean(markup), markup);
    }

    #[test]
    fn handler_without_whitespace_is_removed() {
        let cleaned = AllowListSanitizer.clean("<svg/onload=alert(1)>");
        assert!(!cleaned.contains("onload"));
        assert!(!cleaned.contains("alert"));
    }

    #[test]
    fn entity_encoded_scheme_is_removed() {
        let cleaned = AllowListSanitizer.clean(r#"<a href="jav&#x61;script:alert(1)">x</a>"#);
        assert!(!cleaned.contains("href"));
        assert!(!cleaned.to_lowercase().contains("script"));
        assert_eq!(cleaned, "<a>x</a>");
    }

    #[test]
    fn unknown_url_attributes_are_removed() {
        let cleaned = AllowListSanitizer.clean("<button formaction=javascript:alert(1)>Go</button>");
        assert!(!cleaned.contains("formaction"));
        assert!(!cleaned.contains("javascript"));
        assert!(cleaned.contains("Go"));
    }
}

//! Error types for the overlay library.

use thiserror::Error;

/// Boxed error returned by user-supplied alert handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by overlay components.
///
/// Lifecycle misuse (presenting twice, dismissing something that is not
/// presented) is never an error; those calls are no-ops.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// An alert button handler failed. The alert stays presented.
    #[error("handler for button '{button}' failed: {source}")]
    Handler {
        /// Text of the button whose handler failed.
        button: String,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },

    /// An alert was given inputs of incompatible kinds.
    #[error("alert cannot mix input types: {0}")]
    MixedInputTypes(String),

    /// A button or input index was out of range.
    #[error("no {kind} at index {index}")]
    IndexOutOfRange {
        /// "button" or "input".
        kind: &'static str,
        /// The requested index.
        index: usize,
    },
}

/// Errors that can occur while loading or installing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config already initialized")]
    AlreadyInitialized,
    #[error("config must be a JSON object")]
    NotAnObject,
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// A spinner name that is not in the spinner registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown spinner '{0}'")]
pub struct SpinnerParseError(pub String);

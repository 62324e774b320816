use markups_core::SourceLocation;
use thiserror::Error;

/// Errors that can occur while converting markup to HTML.
#[derive(Debug, Error)]
pub enum RenderError {
    /// markdown-rs rejected the document.
    #[error("Markdown error at {location}: {message}")]
    Markdown {
        /// Parser message.
        message: String,
        /// Source location.
        location: SourceLocation,
    },
    /// No engine is registered under the requested name.
    #[error("Unknown markup: {0}")]
    UnknownMarkup(String),
}

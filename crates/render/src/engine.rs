//! The engine seam shared by every markup language.

use crate::RenderError;
use serde::Serialize;

/// Result of converting one document.
///
/// Every engine returns the same shape; parts an engine does not produce
/// are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertedMarkup {
    /// Document title, empty when the document has none.
    pub title: String,
    /// HTML body fragment.
    pub body: String,
    /// CSS needed by the body.
    pub stylesheet: String,
    /// Script markup needed by the body.
    pub javascript: String,
}

impl ConvertedMarkup {
    /// A result with only a body and title.
    pub fn new(body: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// The title, or `fallback` when the document has none.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.title.is_empty() {
            fallback
        } else {
            &self.title
        }
    }
}

/// A markup language that converts source text to HTML.
pub trait MarkupEngine: Send + Sync {
    /// Human-readable language name, e.g. `Markdown`.
    fn name(&self) -> &'static str;

    /// File name suffixes handled by this engine, leading dot included.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Suffix used when saving new documents.
    fn default_extension(&self) -> &'static str {
        self.file_extensions().first().copied().unwrap_or_default()
    }

    /// Converts a whole document.
    fn convert(&self, text: &str) -> Result<ConvertedMarkup, RenderError>;

    /// Converts `text` and keeps only the HTML body.
    fn document_body(&self, text: &str) -> Result<String, RenderError> {
        self.convert(text).map(|converted| converted.body)
    }

    /// Converts `text` and keeps only the title.
    fn document_title(&self, text: &str) -> Result<String, RenderError> {
        self.convert(text).map(|converted| converted.title)
    }
}

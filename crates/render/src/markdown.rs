//! Markdown engine backed by markdown-rs.

use crate::engine::{ConvertedMarkup, MarkupEngine};
use crate::verbatim::verbatim_ranges;
use crate::RenderError;
use markdown::message::{Message, Place};
use markups_core::{FixerSet, SourceLocation, educate_with_verbatim, extract_metadata};
use serde::Deserialize;
use std::borrow::Cow;

const FILE_EXTENSIONS: &[&str] = &[".md", ".mkd", ".mkdn", ".mdwn", ".mdown", ".markdown"];

/// Options for the Markdown engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Enable math constructs (`$inline$` and `$$block$$`).
    pub math: bool,
    /// Read a leading YAML block for the title instead of rendering it.
    pub frontmatter: bool,
    /// Parse raw HTML and pass it through to the output.
    pub raw_html: bool,
    /// Smart punctuation applied to the source before rendering.
    pub fixers: FixerSet,
}

impl MarkdownOptions {
    /// GFM with raw HTML, metadata and every fixer.
    pub const fn new() -> Self {
        Self {
            gfm: true,
            math: false,
            frontmatter: true,
            raw_html: true,
            fixers: FixerSet::all(),
        }
    }

    /// Plain CommonMark: no GFM, no metadata block, no smart punctuation.
    pub const fn commonmark() -> Self {
        Self {
            gfm: false,
            math: false,
            frontmatter: false,
            raw_html: true,
            fixers: FixerSet::none(),
        }
    }

    /// Convert to markdown-rs `Options`.
    ///
    /// Frontmatter is never handed to markdown-rs; the engine strips it
    /// before rendering.
    pub fn to_markdown(self) -> markdown::Options {
        let mut constructs = if self.gfm {
            markdown::Constructs::gfm()
        } else {
            markdown::Constructs::default()
        };
        constructs.frontmatter = false;
        constructs.html_flow = self.raw_html;
        constructs.html_text = self.raw_html;
        constructs.math_flow = self.math;
        constructs.math_text = self.math;

        markdown::Options {
            parse: markdown::ParseOptions {
                constructs,
                math_text_single_dollar: self.math,
                ..markdown::ParseOptions::default()
            },
            compile: markdown::CompileOptions {
                allow_dangerous_html: self.raw_html,
                gfm_tagfilter: self.gfm,
                ..markdown::CompileOptions::default()
            },
        }
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Markdown to HTML with smart punctuation on the source text.
#[derive(Clone, Debug, Default)]
pub struct MarkdownMarkup {
    options: MarkdownOptions,
}

impl MarkdownMarkup {
    /// Creates an engine with the given options.
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    /// Options this engine renders with.
    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Splits off the metadata block, returning the title and the body.
    fn split_metadata<'a>(&self, text: &'a str) -> (String, &'a str) {
        if !self.options.frontmatter {
            return (String::new(), text);
        }
        match extract_metadata(text) {
            Ok(meta) => {
                let body = meta.body(text);
                (meta.title.unwrap_or_default(), body)
            }
            // A leading `---` that does not open a YAML mapping is a
            // thematic break.
            Err(err) => {
                log::debug!("no metadata block ({err}); rendering as Markdown");
                (String::new(), text)
            }
        }
    }

    /// Educates the prose of `source`, leaving Markdown syntax alone.
    fn educate_source<'a>(
        &self,
        source: &'a str,
        parse: &markdown::ParseOptions,
    ) -> Result<Cow<'a, str>, RenderError> {
        if self.options.fixers.is_empty() {
            return Ok(Cow::Borrowed(source));
        }
        let tree = markdown::to_mdast(source, parse).map_err(|err| markdown_error(&err))?;
        let verbatim = verbatim_ranges(source, &tree);
        Ok(Cow::Owned(educate_with_verbatim(
            source,
            self.options.fixers,
            &verbatim,
        )))
    }
}

impl MarkupEngine for MarkdownMarkup {
    fn name(&self) -> &'static str {
        "Markdown"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        FILE_EXTENSIONS
    }

    fn default_extension(&self) -> &'static str {
        ".mkd"
    }

    fn convert(&self, text: &str) -> Result<ConvertedMarkup, RenderError> {
        log::debug!(
            "converting {} bytes of Markdown (fixers: {:?})",
            text.len(),
            self.options.fixers
        );

        let options = self.options.to_markdown();
        let (title, source) = self.split_metadata(text);
        let source = self.educate_source(source, &options.parse)?;

        let mut body = markdown::to_html_with_options(&source, &options)
            .map_err(|err| markdown_error(&err))?;
        if !body.ends_with('\n') {
            body.push('\n');
        }

        Ok(ConvertedMarkup::new(body, title))
    }
}

fn markdown_error(message: &Message) -> RenderError {
    RenderError::Markdown {
        message: message.reason.clone(),
        location: message_location(message),
    }
}

fn message_location(message: &Message) -> SourceLocation {
    match message.place.as_deref() {
        Some(Place::Point(point)) => SourceLocation::new(point.line, point.column),
        Some(Place::Position(position)) => {
            SourceLocation::new(position.start.line, position.start.column)
        }
        None => SourceLocation::new(1, 1),
    }
}

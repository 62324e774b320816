//! Builtin engines and lookup by file name or language name.

use crate::engine::{ConvertedMarkup, MarkupEngine};
use crate::markdown::MarkdownMarkup;
use crate::RenderError;
use once_cell::sync::Lazy;

static BUILTIN_MARKUPS: Lazy<Vec<Box<dyn MarkupEngine>>> =
    Lazy::new(|| vec![Box::new(MarkdownMarkup::default())]);

/// Every builtin engine, with default options.
pub fn builtin_markups() -> &'static [Box<dyn MarkupEngine>] {
    &BUILTIN_MARKUPS
}

/// The engine handling `file_name`, judged by its suffix.
///
/// When several engines claim a suffix, the last registered one wins.
pub fn markup_for_file_name(file_name: &str) -> Option<&'static dyn MarkupEngine> {
    builtin_markups()
        .iter()
        .rev()
        .find(|engine| {
            engine
                .file_extensions()
                .iter()
                .any(|extension| file_name.ends_with(extension))
        })
        .map(|engine| &**engine)
}

/// The engine whose name matches `name`, ignoring ASCII case.
pub fn find_markup_by_name(name: &str) -> Option<&'static dyn MarkupEngine> {
    builtin_markups()
        .iter()
        .find(|engine| engine.name().eq_ignore_ascii_case(name))
        .map(|engine| &**engine)
}

/// Converts `text` with the engine named `name`.
pub fn convert_by_name(name: &str, text: &str) -> Result<ConvertedMarkup, RenderError> {
    let engine =
        find_markup_by_name(name).ok_or_else(|| RenderError::UnknownMarkup(name.to_string()))?;
    engine.convert(text)
}

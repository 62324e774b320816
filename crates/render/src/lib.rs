#![deny(missing_docs)]
//! markups render: engines turning markup text into HTML, with smart
//! punctuation from `markups-core` applied to the source.

pub mod batch;
pub mod engine;
/// Render error type.
pub mod error;
pub mod markdown;
pub mod registry;
mod verbatim;

pub use batch::{BatchInput, BatchOptions, BatchOutcome, BatchResult, BatchStats, convert_batch};
pub use engine::{ConvertedMarkup, MarkupEngine};
pub use error::RenderError;
pub use crate::markdown::{MarkdownMarkup, MarkdownOptions};
pub use markups_core::{Fixer, FixerSet, educate};
pub use registry::{builtin_markups, convert_by_name, find_markup_by_name, markup_for_file_name};

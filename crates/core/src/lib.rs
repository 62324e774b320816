#![deny(missing_docs)]
//! markups core: HTML-aware tokenizer, typographic educator, fixer
//! configuration and document metadata.

/// Shared error and location types.
pub mod error;
pub mod fixers;
pub mod metadata;
pub mod smartypants;
pub mod tokenize;

pub use error::{FixerParseError, SourceLocation};
pub use fixers::{Fixer, FixerSet};
pub use metadata::{Metadata, MetadataError, extract_metadata};
pub use smartypants::{educate, educate_with_verbatim};
pub use tokenize::{Token, tokenize};

//! Document metadata from a leading YAML block.

use crate::error::SourceLocation;
use serde_json::Value as JsonValue;
use thiserror::Error;

const FENCE: &str = "---";
const BOM: char = '\u{feff}';

/// Metadata found at the top of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// All fields, as a JSON mapping (empty when there is no block).
    pub fields: JsonValue,
    /// The `title` field; a list of strings is joined with spaces.
    pub title: Option<String>,
    /// Byte offset where the document body starts.
    pub body_start: usize,
}

impl Metadata {
    fn empty() -> Self {
        Self {
            fields: JsonValue::Object(Default::default()),
            title: None,
            body_start: 0,
        }
    }

    /// The part of `input` after the metadata block.
    pub fn body<'a>(&self, input: &'a str) -> &'a str {
        input.get(self.body_start..).unwrap_or_default()
    }
}

/// Errors from reading a metadata block.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// An opening `---` with no closing fence.
    #[error("Metadata block opened on line {line} is never closed with '---'")]
    Unterminated {
        /// Line of the opening fence (1-indexed).
        line: usize,
    },
    /// The block is not valid YAML.
    #[error("Metadata parse error: {message}")]
    Parse {
        /// Parser message.
        message: String,
        /// Position in the document, when the parser reports one.
        location: Option<SourceLocation>,
    },
    /// The block parsed, but not to a mapping.
    #[error("Metadata must be a YAML mapping at the top level")]
    NotAMapping,
}

/// Reads a `---` fenced YAML block at the start of `input`.
///
/// A byte-order mark and blank lines may precede the opening fence. Input
/// without a block yields empty metadata with `body_start == 0`.
///
/// ```
/// use markups_core::extract_metadata;
///
/// let doc = "---\ntitle: Hello\n---\nBody";
/// let meta = extract_metadata(doc).unwrap();
/// assert_eq!(meta.title.as_deref(), Some("Hello"));
/// assert_eq!(meta.body(doc), "Body");
/// ```
pub fn extract_metadata(input: &str) -> Result<Metadata, MetadataError> {
    let bom_len = if input.starts_with(BOM) {
        BOM.len_utf8()
    } else {
        0
    };
    let mut offset = bom_len;
    let mut lines = input[bom_len..].split_inclusive('\n').enumerate();

    let (fence_line, block_start) = loop {
        let Some((index, line)) = lines.next() else {
            return Ok(Metadata::empty());
        };
        offset += line.len();
        if line.trim().is_empty() {
            continue;
        }
        if !is_fence(line) {
            return Ok(Metadata::empty());
        }
        break (index + 1, offset);
    };

    for (_, line) in lines {
        let line_start = offset;
        offset += line.len();
        if is_fence(line) {
            let block = input[block_start..line_start].trim_end_matches(['\r', '\n']);
            let fields = parse_block(block, fence_line)?;
            let title = title_of(&fields);
            return Ok(Metadata {
                fields,
                title,
                body_start: offset,
            });
        }
    }

    Err(MetadataError::Unterminated { line: fence_line })
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == FENCE
}

/// Parses the YAML between the fences; `fence_line` maps YAML lines back
/// onto document lines.
fn parse_block(block: &str, fence_line: usize) -> Result<JsonValue, MetadataError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| MetadataError::Parse {
            message: err.to_string(),
            location: err
                .location()
                .map(|loc| SourceLocation::new(fence_line + loc.line(), loc.column())),
        })?;
    let fields = serde_json::to_value(yaml).map_err(|err| MetadataError::Parse {
        message: err.to_string(),
        location: None,
    })?;

    match fields {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(fields),
        _ => Err(MetadataError::NotAMapping),
    }
}

fn title_of(fields: &JsonValue) -> Option<String> {
    let title = match fields.get("title")? {
        JsonValue::String(title) => title.clone(),
        JsonValue::Array(parts) => parts
            .iter()
            .filter_map(JsonValue::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => return None,
    };
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_block_means_empty_metadata() {
        let meta = extract_metadata("# Title\nBody").unwrap();
        assert_eq!(meta, Metadata::empty());
        assert_eq!(meta.body("# Title\nBody"), "# Title\nBody");
    }

    #[test]
    fn reads_title_and_fields() {
        let input = "---\ntitle: Example\ntags:\n  - rust\n---\nBody text";
        let meta = extract_metadata(input).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Example"));
        assert_eq!(meta.fields["tags"][0], "rust");
        assert_eq!(meta.body(input), "Body text");
    }

    #[test]
    fn joins_title_lists() {
        let meta = extract_metadata("---\ntitle:\n  - Part\n  - One\n---\n").unwrap();
        assert_eq!(meta.title.as_deref(), Some("Part One"));
    }

    #[test]
    fn ignores_non_string_titles() {
        let meta = extract_metadata("---\ntitle: 42\n---\n").unwrap();
        assert_eq!(meta.title, None);
    }

    #[test]
    fn empty_block_is_an_empty_mapping() {
        let input = "---\n---\nBody";
        let meta = extract_metadata(input).unwrap();
        assert_eq!(meta.fields, JsonValue::Object(Default::default()));
        assert_eq!(meta.body(input), "Body");
    }

    #[test]
    fn skips_bom_blank_lines_and_crlf() {
        let input = "\u{feff}\n  \r\n---\r\nfoo: bar\r\n---\r\nBody";
        let meta = extract_metadata(input).unwrap();
        assert_eq!(meta.fields["foo"], "bar");
        assert_eq!(meta.body(input), "Body");
    }

    #[test]
    fn reports_yaml_errors_with_document_lines() {
        let input = "\n---\nok: 1\nbad: [unterminated\n---\n";
        match extract_metadata(input) {
            Err(MetadataError::Parse { location, .. }) => {
                if let Some(location) = location {
                    assert!(location.line >= 3, "{location}");
                }
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_mapping_roots() {
        let err = extract_metadata("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, MetadataError::NotAMapping), "{err:?}");
    }

    #[test]
    fn unterminated_block_names_its_line() {
        let err = extract_metadata("\n\n---\ntitle: x").unwrap_err();
        assert!(matches!(err, MetadataError::Unterminated { line: 3 }), "{err:?}");
    }
}

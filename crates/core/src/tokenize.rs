//! Splits text containing HTML markup into tag and text tokens.
//!
//! The tokenizer is purely syntactic: anything from `<` to its matching `>`
//! is a tag, and `<!-- ... -->` is a single tag regardless of what it
//! contains. Input does not need to be well-formed.

/// Deepest `<...>` nesting accepted inside a single tag, outermost included.
const MAX_TAG_DEPTH: usize = 6;

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &[u8] = b"-->";

/// A unit of input: either markup or the text between markup.
///
/// Tokens borrow from the tokenized input, so concatenating
/// [`Token::as_str`] over all tokens reproduces it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text between tags. Never empty.
    Text(&'a str),
    /// A tag or comment, verbatim.
    Tag(&'a str),
}

impl<'a> Token<'a> {
    /// Raw content of the token.
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Text(text) => text,
            Token::Tag(raw) => raw,
        }
    }

    /// Whether this is a [`Token::Tag`].
    pub fn is_tag(&self) -> bool {
        matches!(self, Token::Tag(_))
    }
}

/// Tokenizes `input` into tags and text.
///
/// ```
/// use markups_core::tokenize::{Token, tokenize};
///
/// let tokens = tokenize("a <b>c</b><!-- d -->");
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Text("a "),
///         Token::Tag("<b>"),
///         Token::Text("c"),
///         Token::Tag("</b>"),
///         Token::Tag("<!-- d -->"),
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Tokens::new(input).collect()
}

/// Lazy token iterator over a string; see [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    pos: usize,
    pending_tag: Option<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Creates an iterator positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending_tag: None,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tag) = self.pending_tag.take() {
            return Some(Token::Tag(tag));
        }
        if self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;
        match next_markup(self.input.as_bytes(), start) {
            Some((tag_start, tag_end)) => {
                self.pos = tag_end;
                let tag = &self.input[tag_start..tag_end];
                if tag_start == start {
                    Some(Token::Tag(tag))
                } else {
                    self.pending_tag = Some(tag);
                    Some(Token::Text(&self.input[start..tag_start]))
                }
            }
            None => {
                self.pos = self.input.len();
                Some(Token::Text(&self.input[start..]))
            }
        }
    }
}

/// Finds the next comment or tag at or after `from`, as a byte range.
///
/// `<` and `>` are ASCII, so every boundary returned here is a char boundary.
fn next_markup(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut cursor = from;
    while let Some(offset) = bytes[cursor..].iter().position(|b| *b == b'<') {
        let start = cursor + offset;
        if let Some(end) = comment_end(bytes, start).or_else(|| tag_end(bytes, start, 1)) {
            return Some((start, end));
        }
        cursor = start + 1;
    }
    None
}

fn comment_end(bytes: &[u8], start: usize) -> Option<usize> {
    let body_start = start + COMMENT_OPEN.len();
    if !bytes[start..].starts_with(COMMENT_OPEN) {
        return None;
    }
    bytes[body_start..]
        .windows(COMMENT_CLOSE.len())
        .position(|window| window == COMMENT_CLOSE)
        .map(|offset| body_start + offset + COMMENT_CLOSE.len())
}

/// End (exclusive) of the tag opened at `start`, balancing nested `<...>`.
fn tag_end(bytes: &[u8], start: usize, depth: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i + 1),
            b'<' if depth < MAX_TAG_DEPTH => i = tag_end(bytes, i, depth + 1)?,
            b'<' => return None,
            _ => i += 1,
        }
    }
    None
}

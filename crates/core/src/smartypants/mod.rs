//! Smart punctuation: curly quotes, en/em dashes and ellipses.
//!
//! [`educate`] walks [`Tokens`](crate::tokenize::Tokens) over the input, rewriting
//! text tokens only. Tags are copied through untouched and feed a stack of
//! open `pre`, `code`, `kbd`, `script` and `math` elements; while it is
//! non-empty, text passes through as is.

mod quotes;

pub use quotes::{Curl, QuoteRule, classify_quote};

use crate::fixers::{Fixer, FixerSet};
use crate::tokenize::{Token, Tokens};
use std::ops::Range;

const EN_DASH: char = '\u{2013}';
const EM_DASH: char = '\u{2014}';
const ELLIPSIS: char = '\u{2026}';

/// Elements whose text content is never educated.
const SKIP_TAGS: [&str; 5] = ["pre", "code", "kbd", "script", "math"];

/// Characters that may be escaped with a backslash to keep them literal.
const ESCAPABLE: [char; 6] = ['\\', '"', '\'', '.', '-', '`'];

/// Replaces ASCII quotes, dashes and ellipses in `input` with their
/// typographic forms, leaving markup and code regions alone.
///
/// Backslash escapes (`\\`, `\"`, `\'`, `\.`, `\-`, `` \` ``) keep the
/// escaped character out of every substitution and are emitted as the
/// plain character.
///
/// ```
/// use markups_core::{FixerSet, educate};
///
/// assert_eq!(
///     educate("\"Isn't this fun?\"", FixerSet::all()),
///     "\u{201c}Isn\u{2019}t this fun?\u{201d}"
/// );
/// assert_eq!(
///     educate("<pre>\"as is\" -- ...</pre>", FixerSet::all()),
///     "<pre>\"as is\" -- ...</pre>"
/// );
/// ```
pub fn educate(input: &str, fixers: FixerSet) -> String {
    educate_with_verbatim(input, fixers, &[])
}

/// Like [`educate`], but copies the byte ranges in `verbatim` through as is.
///
/// Ranges are taken in ascending order; a range that overlaps an earlier
/// one, is empty, or does not fall on character boundaries is ignored.
/// Tags inside a verbatim range never reach the skip stack. Text next to a
/// range sees the neighboring character as context without rewriting it,
/// so `` `x`'s `` keeps its apostrophe when the code span is verbatim.
///
/// ```
/// use markups_core::{FixerSet, smartypants::educate_with_verbatim};
///
/// let source = "Run `git push --force` -- now";
/// assert_eq!(
///     educate_with_verbatim(source, FixerSet::all(), &[4..22]),
///     "Run `git push --force` \u{2013} now"
/// );
/// ```
pub fn educate_with_verbatim(input: &str, fixers: FixerSet, verbatim: &[Range<usize>]) -> String {
    let mut educator = Educator::new(fixers, input.len());
    let mut cursor = 0;

    for range in verbatim {
        let (start, end) = (range.start, range.end);
        if start < cursor
            || start >= end
            || end > input.len()
            || !input.is_char_boundary(start)
            || !input.is_char_boundary(end)
        {
            log::trace!("ignoring verbatim range {range:?}");
            continue;
        }
        let edges = Edges {
            before: input[..cursor].chars().next_back(),
            after: input[start..].chars().next(),
        };
        educator.segment(&input[cursor..start], edges);
        educator.verbatim(&input[start..end]);
        cursor = end;
    }
    let edges = Edges {
        before: input[..cursor].chars().next_back(),
        after: None,
    };
    educator.segment(&input[cursor..], edges);

    educator.finish()
}

/// Characters of neighboring verbatim text, seen as context only.
#[derive(Debug, Clone, Copy)]
struct Edges {
    before: Option<char>,
    after: Option<char>,
}

struct Educator {
    fixers: FixerSet,
    skip: SkipStack,
    lookback: Option<char>,
    out: String,
}

impl Educator {
    fn new(fixers: FixerSet, capacity: usize) -> Self {
        Self {
            fixers,
            skip: SkipStack::default(),
            lookback: None,
            out: String::with_capacity(capacity),
        }
    }

    fn segment(&mut self, segment: &str, edges: Edges) {
        let mut tokens = Tokens::new(segment).peekable();
        let mut first = true;
        while let Some(token) = tokens.next() {
            match token {
                Token::Tag(raw) => {
                    self.skip.observe(raw);
                    self.out.push_str(raw);
                }
                Token::Text(text) => {
                    if self.skip.is_active() {
                        self.out.push_str(text);
                    } else {
                        let edges = Edges {
                            before: edges.before.filter(|_| first),
                            after: edges.after.filter(|_| tokens.peek().is_none()),
                        };
                        educate_text(text, self.fixers, self.lookback, edges, &mut self.out);
                    }
                    self.lookback = text.chars().next_back();
                }
            }
            first = false;
        }
    }

    fn verbatim(&mut self, raw: &str) {
        self.out.push_str(raw);
        self.lookback = raw.chars().next_back();
    }

    fn finish(self) -> String {
        if self.skip.is_active() {
            log::trace!(
                "input ended inside <{}>; trailing text left uneducated",
                self.skip.open.join("> <")
            );
        }
        self.out
    }
}

/// Open skip elements, innermost last.
///
/// A closing tag pops only when it matches the innermost open element;
/// mismatched closing tags are ignored.
#[derive(Debug, Default)]
struct SkipStack {
    open: Vec<&'static str>,
}

impl SkipStack {
    fn is_active(&self) -> bool {
        !self.open.is_empty()
    }

    fn observe(&mut self, tag: &str) {
        let Some((name, closing)) = skip_tag(tag) else {
            return;
        };
        if !closing {
            self.open.push(name);
        } else if self.open.last() == Some(&name) {
            self.open.pop();
        }
    }
}

/// Matches `<name ...>` or `</name>` for a skip element, case-insensitively.
/// Self-closing forms (`<code/>`) open nothing and are ignored.
fn skip_tag(tag: &str) -> Option<(&'static str, bool)> {
    let inner = tag.strip_prefix('<')?.strip_suffix('>')?;
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let (name, rest) = inner.split_at(name_len);
    let name = SKIP_TAGS
        .into_iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(name))?;

    if !(rest.is_empty() || rest.starts_with(|c: char| c.is_ascii_whitespace() || c == '/')) {
        return None;
    }
    if !closing && rest.ends_with('/') {
        return None;
    }
    Some((name, closing))
}

/// One character of a text token, after escape processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    kind: GlyphKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GlyphKind {
    Plain,
    /// Backslash-escaped; never rewritten and reads as punctuation.
    Escaped,
    /// Borrowed from a neighboring verbatim range; never rewritten or
    /// emitted.
    Context,
}

impl Glyph {
    fn plain(ch: char) -> Self {
        Self {
            ch,
            kind: GlyphKind::Plain,
        }
    }

    fn escaped(ch: char) -> Self {
        Self {
            ch,
            kind: GlyphKind::Escaped,
        }
    }

    fn context(ch: char) -> Self {
        Self {
            ch,
            kind: GlyphKind::Context,
        }
    }

    /// An unescaped `ch` that may be rewritten.
    fn is(self, ch: char) -> bool {
        self.kind == GlyphKind::Plain && self.ch == ch
    }

    fn is_escaped(self) -> bool {
        self.kind == GlyphKind::Escaped
    }
}

fn educate_text(
    text: &str,
    fixers: FixerSet,
    lookback: Option<char>,
    edges: Edges,
    out: &mut String,
) {
    if !text.contains(['\\', '"', '\'', '-', '.']) {
        out.push_str(text);
        return;
    }

    let mut glyphs = Vec::with_capacity(text.len() + 2);
    glyphs.extend(edges.before.map(Glyph::context));
    unescape_into(text, &mut glyphs);
    glyphs.extend(edges.after.map(Glyph::context));

    if fixers.contains(Fixer::Dashes) {
        glyphs = collapse_runs(glyphs, '-', &[(3, EM_DASH), (2, EN_DASH)]);
    }
    if fixers.contains(Fixer::Ellipses) {
        glyphs = collapse_runs(glyphs, '.', &[(3, ELLIPSIS)]);
    }
    if fixers.contains(Fixer::Quotes) {
        quotes::educate_quotes(&mut glyphs, lookback);
    }
    out.extend(
        glyphs
            .iter()
            .filter(|glyph| glyph.kind != GlyphKind::Context)
            .map(|glyph| glyph.ch),
    );
}

fn unescape_into(text: &str, glyphs: &mut Vec<Glyph>) {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match chars.peek() {
            Some(&next) if ch == '\\' && ESCAPABLE.contains(&next) => {
                chars.next();
                glyphs.push(Glyph::escaped(next));
            }
            _ => glyphs.push(Glyph::plain(ch)),
        }
    }
}

/// Replaces runs of unescaped `ch`, scanning left to right. `replacements`
/// is ordered longest run first.
fn collapse_runs(glyphs: Vec<Glyph>, ch: char, replacements: &[(usize, char)]) -> Vec<Glyph> {
    let longest = replacements.iter().map(|(len, _)| *len).max().unwrap_or(0);
    let mut out = Vec::with_capacity(glyphs.len());
    let mut i = 0;
    while i < glyphs.len() {
        let run = glyphs[i..]
            .iter()
            .take(longest)
            .take_while(|glyph| glyph.is(ch))
            .count();
        match replacements.iter().find(|(len, _)| *len <= run) {
            Some(&(len, replacement)) => {
                out.push(Glyph::plain(replacement));
                i += len;
            }
            None => {
                out.push(glyphs[i]);
                i += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ed(input: &str) -> String {
        educate(input, FixerSet::all())
    }

    #[test]
    fn curls_quotes_in_a_sentence() {
        assert_eq!(ed("\"Isn't this fun?\""), "“Isn’t this fun?”");
        assert_eq!(
            ed("\"'Quoted' words in a larger quote.\""),
            "“‘Quoted’ words in a larger quote.”"
        );
    }

    #[test]
    fn dates_and_decades() {
        assert_eq!(ed("1440--80's"), "1440–80’s");
        assert_eq!(ed("'80s"), "’80s");
    }

    #[test]
    fn dashes_and_ellipses() {
        assert_eq!(
            ed("em-dashes (---) and ellipses (...)"),
            "em-dashes (—) and ellipses (…)"
        );
        assert_eq!(ed("a----b"), "a—-b");
        assert_eq!(ed("a-----b"), "a—–b");
        assert_eq!(ed("wait...."), "wait….");
    }

    #[test]
    fn fixers_are_independent() {
        let input = "\"a\" -- b...";
        assert_eq!(educate(input, FixerSet::only(Fixer::Dashes)), "\"a\" – b...");
        assert_eq!(educate(input, FixerSet::only(Fixer::Ellipses)), "\"a\" -- b…");
        assert_eq!(educate(input, FixerSet::only(Fixer::Quotes)), "“a” -- b...");
        assert_eq!(educate(input, FixerSet::none()), input);
    }

    #[test]
    fn skip_regions_are_left_alone() {
        assert_eq!(ed("<pre>\"quoted\"</pre>"), "<pre>\"quoted\"</pre>");
        assert_eq!(
            ed("<CODE class=\"x\">'a' -- b...</CODE> 'c'"),
            "<CODE class=\"x\">'a' -- b...</CODE> ‘c’"
        );
        assert_eq!(
            ed("<script>var s = '--';</script>--"),
            "<script>var s = '--';</script>–"
        );
    }

    #[test]
    fn nested_skip_regions_unwind_in_order() {
        assert_eq!(
            ed("<pre><code>--</code>--</pre>--"),
            "<pre><code>--</code>--</pre>–"
        );
    }

    #[test]
    fn mismatched_close_tag_keeps_skipping() {
        assert_eq!(ed("<pre>--</code>--</pre>--"), "<pre>--</code>--</pre>–");
    }

    #[test]
    fn unclosed_skip_region_runs_to_end() {
        assert_eq!(ed("<kbd>-- \"x\" ... <b>--</b>"), "<kbd>-- \"x\" ... <b>--</b>");
    }

    #[test]
    fn stray_close_tag_is_ignored() {
        assert_eq!(ed("</pre>--"), "</pre>–");
    }

    #[test]
    fn similar_tag_names_do_not_skip() {
        assert_eq!(ed("<preview>--</preview>"), "<preview>–</preview>");
        assert_eq!(ed("<code/>--"), "<code/>–");
    }

    #[test]
    fn tag_attributes_are_never_touched() {
        let input = r#"<a title="it's -- here...">"x"</a>"#;
        assert_eq!(ed(input), r#"<a title="it's -- here...">“x”</a>"#);
    }

    #[test]
    fn escapes_yield_plain_characters() {
        assert_eq!(ed(r"\'quoted\'"), "'quoted'");
        assert_eq!(ed(r#"\"a\" \-\- b\.\.\."#), r#""a" -- b..."#);
        assert_eq!(ed(r"a\\b \`c\`"), r"a\b `c`");
        assert_eq!(ed(r"\q"), r"\q");
    }

    #[test]
    fn escaped_backslash_leaves_following_quote_active() {
        assert_eq!(ed(r#"\\ "x""#), "\\ “x”");
    }

    #[test]
    fn escapes_apply_without_fixers() {
        assert_eq!(educate(r"\-\-", FixerSet::none()), "--");
    }

    #[test]
    fn lone_quote_tokens_use_previous_text() {
        assert_eq!(ed("<em>word</em>\"<b>x</b>"), "<em>word</em>”<b>x</b>");
        assert_eq!(ed("say <em>x</em> \"<b>x</b>"), "say <em>x</em> “<b>x</b>");
        assert_eq!(ed("'<b>x</b>"), "‘<b>x</b>");
        assert_eq!(ed("<i>it</i>'<b>s</b>"), "<i>it</i>’<b>s</b>");
    }

    #[test]
    fn lookback_sees_raw_text_inside_skip_regions() {
        assert_eq!(ed("<code>x</code>'<b>s</b>"), "<code>x</code>’<b>s</b>");
        assert_eq!(ed("<code>x </code>'<b>s</b>"), "<code>x </code>‘<b>s</b>");
    }

    #[test]
    fn educating_twice_changes_nothing() {
        let inputs = [
            "\"Isn't this fun?\"",
            "1440--80's and '80s",
            "em-dashes (---) and ellipses (...)",
            "<p>\"quoted\" text and <strong>bold \"quoted\" text</strong></p>",
            "a----b -----c ....",
        ];
        for input in inputs {
            let once = ed(input);
            assert_eq!(ed(&once), once, "second pass over {input:?}");
        }
    }

    #[test]
    fn verbatim_ranges_are_copied_through() {
        let input = "a -- `b -- \"c\"` -- d";
        let start = input.find('`').unwrap();
        let end = input.rfind('`').unwrap() + 1;
        assert_eq!(
            educate_with_verbatim(input, FixerSet::all(), &[start..end]),
            "a – `b -- \"c\"` – d"
        );
    }

    #[test]
    fn verbatim_neighbors_are_context() {
        let input = "`x`'s \"`y`\"";
        let ranges = [0..3, 7..10];
        assert_eq!(
            educate_with_verbatim(input, FixerSet::all(), &ranges),
            "`x`’s “`y`”"
        );
    }

    #[test]
    fn dashes_do_not_join_across_verbatim_ranges() {
        assert_eq!(
            educate_with_verbatim("---\n--", FixerSet::all(), &[0..3]),
            "---\n–"
        );
        assert_eq!(educate_with_verbatim("-|--", FixerSet::all(), &[1..2]), "-|–");
    }

    #[test]
    fn tags_inside_verbatim_ranges_do_not_skip() {
        let input = "`<pre>` \"x\"";
        assert_eq!(
            educate_with_verbatim(input, FixerSet::all(), &[0..7]),
            "`<pre>` “x”"
        );
    }

    #[test]
    fn invalid_verbatim_ranges_are_ignored() {
        let input = "\"é\" --";
        let ranges = [3..2, 2..3, 0..1, 0..4, 7..99];
        assert_eq!(
            educate_with_verbatim(input, FixerSet::all(), &ranges),
            "\"é” –"
        );
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(ed(""), "");
        assert_eq!(ed("'"), "‘");
        assert_eq!(ed("\""), "“");
        assert_eq!(ed("<"), "<");
        assert_eq!(ed("<<<'"), "<<<’");
    }
}

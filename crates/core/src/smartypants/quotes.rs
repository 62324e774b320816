//! Quote classification as an ordered list of rules.
//!
//! Each straight quote is classified on its own against the token's text
//! as it stood before quote substitution (dashes and ellipses already
//! applied). Rules are tried in [`QuoteRule::ORDER`]; the first that
//! claims the quote decides its curl.

use super::Glyph;

const NBSP: char = '\u{a0}';

/// Entities that count as a space or dash before an opening quote.
const OPENING_ENTITIES: [&str; 7] = [
    "&nbsp;", "&ndash;", "&mdash;", "&#8211;", "&#8212;", "&#x2013;", "&#x2014;",
];

/// Direction of a curled quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curl {
    /// `‘` or `“`.
    Opening,
    /// `’` or `”`.
    Closing,
}

impl Curl {
    fn glyph(self, quote: char) -> char {
        match (quote, self) {
            ('\'', Curl::Opening) => '\u{2018}',
            ('\'', Curl::Closing) => '\u{2019}',
            (_, Curl::Opening) => '\u{201c}',
            (_, Curl::Closing) => '\u{201d}',
        }
    }
}

/// Rules deciding whether a straight quote opens or closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteRule {
    /// The whole text token is one quote; the previous token's last raw
    /// character decides (non-whitespace closes).
    LoneToken,
    /// A quote starting the token, followed by punctuation that is not
    /// followed by a word character, closes (`'."` after a tag).
    LeadingPunctuation,
    /// `"'` or `'"` directly before a word opens both quotes.
    NestedPair,
    /// `'` before two digits and an `s` is an apostrophe (`'80s`).
    Decade,
    /// A quote after whitespace, a dash, a dash or space entity, or at the
    /// start of the token, and before a word character, opens.
    Opening,
    /// `"` before whitespace, or after anything but whitespace, `[`, `{`,
    /// `(` or `-`, closes.
    ClosingDouble,
    /// `'` in a word (`isn't`) closes.
    Contraction,
    /// `'` after a word and before whitespace or a lone `s` closes.
    Possessive,
    /// Anything left opens.
    Fallback,
}

impl QuoteRule {
    /// Rules in the order they are tried.
    pub const ORDER: [QuoteRule; 9] = [
        QuoteRule::LoneToken,
        QuoteRule::LeadingPunctuation,
        QuoteRule::NestedPair,
        QuoteRule::Decade,
        QuoteRule::Opening,
        QuoteRule::ClosingDouble,
        QuoteRule::Contraction,
        QuoteRule::Possessive,
        QuoteRule::Fallback,
    ];

    fn apply(self, ctx: &QuoteContext<'_>, i: usize) -> Option<Curl> {
        let quote = ctx.glyphs[i].ch;
        match self {
            QuoteRule::LoneToken => (ctx.glyphs.len() == 1).then(|| {
                match ctx.lookback {
                    Some(prev) if !prev.is_whitespace() => Curl::Closing,
                    _ => Curl::Opening,
                }
            }),
            QuoteRule::LeadingPunctuation => (i == 0
                && ctx.at(i + 1).is_some_and(is_punctuation)
                && !ctx.at(i + 2).is_some_and(is_word))
            .then_some(Curl::Closing),
            QuoteRule::NestedPair => {
                let partner = if quote == '"' { '\'' } else { '"' };
                let leads_pair = ctx.at(i + 1).is_some_and(|g| g.is(partner))
                    && ctx.at(i + 2).is_some_and(is_word);
                let ends_pair = ctx.before(i).is_some_and(|g| g.is(partner))
                    && ctx.at(i + 1).is_some_and(is_word);
                (leads_pair || ends_pair).then_some(Curl::Opening)
            }
            QuoteRule::Decade => (quote == '\''
                && ctx.at(i + 1).is_some_and(is_ascii_digit)
                && ctx.at(i + 2).is_some_and(is_ascii_digit)
                && ctx.at(i + 3).is_some_and(|g| g.is('s')))
            .then_some(Curl::Closing),
            QuoteRule::Opening => (ctx.at(i + 1).is_some_and(is_word)
                && ctx.opens_after(i))
            .then_some(Curl::Opening),
            QuoteRule::ClosingDouble => (quote == '"'
                && (ctx.at(i + 1).is_some_and(is_space)
                    || ctx.before(i).is_some_and(is_closing_context)))
            .then_some(Curl::Closing),
            QuoteRule::Contraction => (quote == '\''
                && ctx.before(i).is_some_and(is_closing_context)
                && !ctx.at(i + 1).is_some_and(is_space)
                && !ctx.s_boundary(i + 1)
                && !ctx.at(i + 1).is_some_and(is_digit))
            .then_some(Curl::Closing),
            QuoteRule::Possessive => (quote == '\''
                && ctx.before(i).is_some_and(is_closing_context)
                && (ctx.at(i + 1).is_some_and(is_space) || ctx.s_boundary(i + 1)))
            .then_some(Curl::Closing),
            QuoteRule::Fallback => Some(Curl::Opening),
        }
    }
}

/// Classifies the quote at `index` of `text`, returning the deciding rule.
///
/// `lookback` is the last raw character of the preceding text token.
/// Returns `None` when `index` is not a straight quote.
///
/// ```
/// use markups_core::smartypants::{Curl, QuoteRule, classify_quote};
///
/// assert_eq!(
///     classify_quote("isn't", 3, None),
///     Some((QuoteRule::Contraction, Curl::Closing))
/// );
/// assert_eq!(
///     classify_quote("'80s", 0, None),
///     Some((QuoteRule::Decade, Curl::Closing))
/// );
/// ```
pub fn classify_quote(text: &str, index: usize, lookback: Option<char>) -> Option<(QuoteRule, Curl)> {
    let glyphs: Vec<Glyph> = text.chars().map(Glyph::plain).collect();
    let glyph = glyphs.get(index)?;
    if !(glyph.is('\'') || glyph.is('"')) {
        return None;
    }
    Some(QuoteContext::new(&glyphs, lookback).classify(index))
}

pub(super) fn educate_quotes(glyphs: &mut [Glyph], lookback: Option<char>) {
    let curls: Vec<(usize, Curl)> = {
        let ctx = QuoteContext::new(glyphs, lookback);
        glyphs
            .iter()
            .enumerate()
            .filter(|(_, glyph)| glyph.is('\'') || glyph.is('"'))
            .map(|(i, _)| (i, ctx.classify(i).1))
            .collect()
    };
    for (i, curl) in curls {
        glyphs[i] = Glyph::plain(curl.glyph(glyphs[i].ch));
    }
}

struct QuoteContext<'a> {
    glyphs: &'a [Glyph],
    lookback: Option<char>,
}

impl<'a> QuoteContext<'a> {
    fn new(glyphs: &'a [Glyph], lookback: Option<char>) -> Self {
        Self { glyphs, lookback }
    }

    fn classify(&self, i: usize) -> (QuoteRule, Curl) {
        QuoteRule::ORDER
            .into_iter()
            .find_map(|rule| rule.apply(self, i).map(|curl| (rule, curl)))
            .unwrap_or((QuoteRule::Fallback, Curl::Opening))
    }

    fn at(&self, i: usize) -> Option<Glyph> {
        self.glyphs.get(i).copied()
    }

    fn before(&self, i: usize) -> Option<Glyph> {
        i.checked_sub(1).and_then(|prev| self.at(prev))
    }

    /// An `s` at `i` not followed by a word character.
    fn s_boundary(&self, i: usize) -> bool {
        self.at(i).is_some_and(|g| g.is('s')) && !self.at(i + 1).is_some_and(is_word)
    }

    /// Whether the text before `i` lets a quote open.
    fn opens_after(&self, i: usize) -> bool {
        let Some(prev) = self.before(i) else {
            return true;
        };
        if is_space(prev)
            || (!prev.is_escaped() && matches!(prev.ch, NBSP | '-' | '\u{2013}' | '\u{2014}'))
        {
            return true;
        }
        OPENING_ENTITIES
            .iter()
            .any(|entity| self.ends_with_before(i, entity))
    }

    fn ends_with_before(&self, i: usize, needle: &str) -> bool {
        let len = needle.chars().count();
        i >= len
            && self.glyphs[i - len..i]
                .iter()
                .zip(needle.chars())
                .all(|(glyph, ch)| glyph.is(ch))
    }
}

fn is_word(glyph: Glyph) -> bool {
    !glyph.is_escaped() && (glyph.ch.is_alphanumeric() || glyph.ch == '_')
}

fn is_space(glyph: Glyph) -> bool {
    !glyph.is_escaped() && glyph.ch.is_whitespace()
}

fn is_digit(glyph: Glyph) -> bool {
    !glyph.is_escaped() && glyph.ch.is_numeric()
}

fn is_ascii_digit(glyph: Glyph) -> bool {
    !glyph.is_escaped() && glyph.ch.is_ascii_digit()
}

/// Escaped characters count as punctuation.
fn is_punctuation(glyph: Glyph) -> bool {
    glyph.is_escaped() || glyph.ch.is_ascii_punctuation()
}

/// A preceding character after which a quote reads as closing.
fn is_closing_context(glyph: Glyph) -> bool {
    glyph.is_escaped() || !matches!(glyph.ch, ' ' | '\t' | '\r' | '\n' | '[' | '{' | '(' | '-')
}

//! Fixer selection: which substitution passes the educator runs.

use crate::error::FixerParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One independently togglable substitution category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixer {
    /// Straight quotes to curly quotes.
    Quotes,
    /// `--` and `---` to en and em dashes.
    Dashes,
    /// `...` to a horizontal ellipsis.
    Ellipses,
}

impl Fixer {
    /// Every fixer, in canonical order.
    pub const ALL: [Fixer; 3] = [Fixer::Quotes, Fixer::Dashes, Fixer::Ellipses];

    /// Legacy single-letter code (`q`, `d`, `e`).
    pub const fn letter(self) -> char {
        match self {
            Fixer::Quotes => 'q',
            Fixer::Dashes => 'd',
            Fixer::Ellipses => 'e',
        }
    }

    /// Lower-case name used in comma-separated configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Fixer::Quotes => "quotes",
            Fixer::Dashes => "dashes",
            Fixer::Ellipses => "ellipses",
        }
    }

    /// Look up a fixer by its letter code.
    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL.into_iter().find(|fixer| fixer.letter() == letter)
    }

    /// Look up a fixer by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|fixer| fixer.name().eq_ignore_ascii_case(name))
    }

    const fn bit(self) -> u8 {
        match self {
            Fixer::Quotes => 0b001,
            Fixer::Dashes => 0b010,
            Fixer::Ellipses => 0b100,
        }
    }
}

/// Set of enabled fixers.
///
/// Parses from the legacy letter string (`"qde"`) or from comma-separated
/// names (`"quotes, dashes"`), and serializes back to the letter string.
///
/// ```
/// use markups_core::{Fixer, FixerSet};
///
/// let set: FixerSet = "qd".parse().unwrap();
/// assert!(set.contains(Fixer::Quotes));
/// assert!(!set.contains(Fixer::Ellipses));
/// assert_eq!(set, "quotes,dashes".parse().unwrap());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FixerSet {
    bits: u8,
}

impl FixerSet {
    /// All fixers enabled (the legacy default).
    pub const fn all() -> Self {
        Self { bits: 0b111 }
    }

    /// No fixers; only escape processing runs.
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    /// A set holding a single fixer.
    pub const fn only(fixer: Fixer) -> Self {
        Self { bits: fixer.bit() }
    }

    /// Returns a copy with `fixer` enabled.
    pub const fn with(self, fixer: Fixer) -> Self {
        Self {
            bits: self.bits | fixer.bit(),
        }
    }

    /// Returns a copy with `fixer` disabled.
    pub const fn without(self, fixer: Fixer) -> Self {
        Self {
            bits: self.bits & !fixer.bit(),
        }
    }

    /// Whether `fixer` is enabled.
    pub const fn contains(self, fixer: Fixer) -> bool {
        self.bits & fixer.bit() != 0
    }

    /// Whether no fixer is enabled.
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Enabled fixers in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Fixer> {
        Fixer::ALL
            .into_iter()
            .filter(move |fixer| self.contains(*fixer))
    }
}

impl Default for FixerSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Fixer> for FixerSet {
    fn from_iter<I: IntoIterator<Item = Fixer>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

impl fmt::Display for FixerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().try_for_each(|fixer| write!(f, "{}", fixer.letter()))
    }
}

impl fmt::Debug for FixerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(Fixer::name))
            .finish()
    }
}

impl FromStr for FixerSet {
    type Err = FixerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Self::none();
        for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            if let Some(fixer) = Fixer::from_name(part) {
                set = set.with(fixer);
                continue;
            }

            let mut letters = part.chars();
            match (letters.next(), letters.next()) {
                (Some(letter), None) => {
                    let fixer =
                        Fixer::from_letter(letter).ok_or(FixerParseError::UnknownFixer(letter))?;
                    set = set.with(fixer);
                }
                _ => {
                    let fixers: Option<Vec<Fixer>> = part.chars().map(Fixer::from_letter).collect();
                    let fixers =
                        fixers.ok_or_else(|| FixerParseError::UnknownName(part.to_string()))?;
                    set = fixers.into_iter().fold(set, Self::with);
                }
            }
        }
        Ok(set)
    }
}

impl TryFrom<String> for FixerSet {
    type Error = FixerParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FixerSet> for String {
    fn from(set: FixerSet) -> Self {
        set.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_everything() {
        let set = FixerSet::default();
        assert!(Fixer::ALL.iter().all(|fixer| set.contains(*fixer)));
        assert_eq!(set.to_string(), "qde");
    }

    #[test]
    fn parses_legacy_letters() {
        let set: FixerSet = "q".parse().unwrap();
        assert_eq!(set, FixerSet::only(Fixer::Quotes));

        let set: FixerSet = "ed".parse().unwrap();
        assert_eq!(set.to_string(), "de");
    }

    #[test]
    fn parses_names_case_insensitively() {
        let set: FixerSet = "Quotes, ELLIPSES".parse().unwrap();
        assert_eq!(set, FixerSet::none().with(Fixer::Quotes).with(Fixer::Ellipses));
    }

    #[test]
    fn empty_string_disables_all() {
        let set: FixerSet = "".parse().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.to_string(), "");
    }

    #[test]
    fn rejects_unknown_entries() {
        assert_eq!(
            "x".parse::<FixerSet>(),
            Err(FixerParseError::UnknownFixer('x'))
        );
        assert_eq!(
            "quotes,apostrophes".parse::<FixerSet>(),
            Err(FixerParseError::UnknownName("apostrophes".to_string()))
        );
    }

    #[test]
    fn without_removes_a_fixer() {
        let set = FixerSet::all().without(Fixer::Dashes);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Fixer::Quotes, Fixer::Ellipses]);
        assert_eq!(format!("{set:?}"), r#"{"quotes", "ellipses"}"#);
    }
}

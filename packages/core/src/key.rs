//! Dotted keys with validated segments.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::Error;

/// Separator used between key segments unless a caller picks another one.
pub const DEFAULT_SEPARATOR: char = '.';

lazy_static! {
    static ref SEGMENT: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Check a single segment against the key grammar.
pub fn is_valid_segment(segment: &str) -> bool {
    SEGMENT.is_match(segment)
}

/// Check a full key, splitting it on `sep` first.
///
/// A key is valid iff every segment is non-empty and made only of ASCII
/// letters, digits, underscores and dashes. Keys are case-sensitive.
///
/// ```rust
/// use zettings_core::is_valid_key;
///
/// assert!(is_valid_key("window.size-x", '.'));
/// assert!(!is_valid_key("window..size", '.'));
/// assert!(!is_valid_key("has space", '.'));
/// ```
pub fn is_valid_key(key: &str, sep: char) -> bool {
    key.split(sep).all(is_valid_segment)
}

/// Raising form of [`is_valid_key`]; the error carries the whole key.
pub fn validate_key(key: &str, sep: char) -> Result<(), Error> {
    if is_valid_key(key, sep) {
        Ok(())
    } else {
        Err(Error::invalid_key(key))
    }
}

/// A validated dotted key.
///
/// Holds the segments of the key along with the separator it was parsed
/// with, so `Display` reproduces the original text.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Key {
    segments: Vec<String>,
    separator: char,
}

impl Key {
    /// Parse a key using [`DEFAULT_SEPARATOR`].
    ///
    /// ```rust
    /// use zettings_core::Key;
    ///
    /// let key = Key::parse("editor.font.size").unwrap();
    /// assert_eq!(key.len(), 3);
    /// assert_eq!(key.last(), "size");
    /// ```
    pub fn parse(s: &str) -> Result<Self, Error> {
        Self::parse_with(s, DEFAULT_SEPARATOR)
    }

    /// Parse a key split on `separator`.
    ///
    /// Empty segments are never normalized away: `a..b`,
    /// a leading or trailing separator and the empty string are all invalid.
    pub fn parse_with(s: &str, separator: char) -> Result<Self, Error> {
        validate_key(s, separator)?;
        Ok(Key {
            segments: s.split(separator).map(str::to_string).collect(),
            separator,
        })
    }

    /// Number of segments. Always at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Keys always have a segment, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate over segments.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// The segments leading up to the last one.
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The final segment.
    pub fn last(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = self.separator.to_string();
        write!(f, "{}", self.segments.join(separator.as_str()))
    }
}

//! Thin regex wrapper around `fancy_regex`, used for the word-splitting pattern and the
//! assembled special-token union pattern.

use std::fmt::{Debug, Display};
use std::ops::Deref;

/// Error returned when a pattern fails to compile.
#[derive(thiserror::Error)]
#[error("{0}")]
pub struct RegexError(String);
impl Debug for RegexError {
    #[inline(never)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("RegexError").field(&self.0).finish()
    }
}

/// A compiled regular expression together with its source pattern.
///
/// Matching is safe to call concurrently from multiple threads: `fancy_regex::Regex` holds no
/// mutable engine state, only the compiled program, so no per-thread cloning is needed.
#[derive(Clone)]
pub struct Regex {
    pattern: String,
    regex:   fancy_regex::Regex,
}
impl Regex {
    #[inline(always)]
    pub fn new(pattern: &str) -> Result<Self, RegexError> {
        Ok(Self {
            pattern: pattern.to_string(),
            regex:   fancy_regex::Regex::new(pattern).map_err(|e| RegexError(e.to_string()))?,
        })
    }

    /// Returns the `(start, end)` byte offsets of every non-overlapping match in `text`.
    #[inline(always)]
    pub(crate) fn find_iter(&self, text: &str) -> Vec<(usize, usize)> {
        self.regex
            .find_iter(text)
            .map(|m| m.expect("regex matching should not fail on valid utf-8 input"))
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    /// Returns the `(start, end)` byte offsets of the first match at or after byte offset `from`.
    #[inline(always)]
    pub(crate) fn find_from_pos(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        self.regex
            .find_from_pos(text, from)
            .expect("regex matching should not fail on valid utf-8 input")
            .map(|m| (m.start(), m.end()))
    }
}
impl PartialEq for Regex {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}
impl Eq for Regex {}
impl Deref for Regex {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &str {
        &self.pattern
    }
}
impl AsRef<str> for Regex {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.deref()
    }
}
impl Display for Regex {
    #[inline(always)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        Display::fmt(&self.pattern, f)
    }
}
impl Debug for Regex {
    #[inline(never)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("Regex").field(&self.pattern).finish()
    }
}

/// Characters that must be backslash-escaped to appear literally inside a regex alternative.
const SPECIAL_CHARS: &[u8] = b".^$|()[]{}*+?\\";

/// Escapes `text` so it matches only itself when spliced into a regex pattern.
///
/// Every occurrence of a character in [`SPECIAL_CHARS`] is preceded by a single backslash.
/// This is used solely to build the special-token union pattern out of literal spellings.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() && SPECIAL_CHARS.contains(&(c as u8)) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

//! The tokenizer object: holds the vocabulary tables and compiled regexes, and implements the
//! split-encode driver that walks input text and dispatches pieces to the byte-pair encoder.

use std::collections::{HashMap, HashSet};

use crate::bytepair::{byte_pair_encode, RankMap};
use crate::error::{DecodeError, EncodeError, InitializationError};
use crate::regex::{self, Regex};

/// A byte-pair encoding tokenizer core.
///
/// Holds an ordinary merge vocabulary (`encoder`/`decoder`) and a set of special tokens
/// (`special_encoder`/`special_decoder`) that are emitted atomically when allow-listed on a
/// given call to [`CoreBpe::encode`]. Everything is immutable after construction, so a
/// `CoreBpe` can be shared across threads and consulted concurrently without synchronization.
#[derive(Debug)]
pub struct CoreBpe {
    encoder: RankMap,
    decoder: HashMap<u32, Vec<u8>>,

    special_encoder: HashMap<Vec<u8>, u32>,
    special_decoder: HashMap<u32, Vec<u8>>,

    regex:         Regex,
    special_regex: Regex,

    sorted_token_bytes: Vec<Vec<u8>>,
}

impl CoreBpe {
    /// Creates a tokenizer from an ordinary vocabulary, a special-token vocabulary, and a
    /// word-splitting regex pattern.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError::InvalidEncoder`] or
    /// [`InitializationError::InvalidSpecialEncoder`] if either table maps more than one
    /// spelling to the same id (the inverse lookup would not be a function).
    ///
    /// Returns [`InitializationError::InvalidUtf8`] if a special spelling is not valid UTF-8,
    /// and [`InitializationError::InvalidRegex`] if `pattern`, or the special-token union built
    /// from the special spellings, fails to compile.
    pub fn new(
        encoder: HashMap<Vec<u8>, u32>, special_encoder: HashMap<Vec<u8>, u32>, pattern: &str,
    ) -> Result<Self, InitializationError> {
        log::debug!(
            "constructing tokenizer with {} ordinary and {} special tokens",
            encoder.len(),
            special_encoder.len()
        );

        let regex = Regex::new(pattern)?;

        // Longest-first so the alternation engine's first-match-wins behavior prefers the
        // longest allowed special spelling whenever two overlap at the same start position.
        let mut special_spellings = special_encoder
            .keys()
            .map(|s| std::str::from_utf8(s))
            .collect::<Result<Vec<_>, _>>()?;
        special_spellings.sort_by_key(|s| std::cmp::Reverse(s.len()));
        let special_pattern = if special_spellings.is_empty() {
            // An empty alternation (`""`) would match the empty string at every position,
            // turning every call to `find_from_pos` into a zero-width "match" instead of
            // reporting that there is no special token left to find. `(?!)` never matches.
            String::from(r"(?!)")
        } else {
            special_spellings.iter().map(|s| regex::escape(s)).collect::<Vec<_>>().join("|")
        };
        let special_regex = Regex::new(&special_pattern)?;

        let decoder: HashMap<u32, Vec<u8>> =
            encoder.iter().map(|(k, v)| (*v, k.clone())).collect();
        if encoder.len() != decoder.len() {
            return Err(InitializationError::InvalidEncoder);
        }

        let special_decoder: HashMap<u32, Vec<u8>> =
            special_encoder.iter().map(|(k, v)| (*v, k.clone())).collect();
        if special_encoder.len() != special_decoder.len() {
            return Err(InitializationError::InvalidSpecialEncoder);
        }

        let mut sorted_token_bytes: Vec<Vec<u8>> = encoder.keys().cloned().collect();
        sorted_token_bytes.sort();

        Ok(Self {
            encoder,
            decoder,
            special_encoder,
            special_decoder,
            regex,
            special_regex,
            sorted_token_bytes,
        })
    }

    /// Encodes `text` into a sequence of token ids.
    ///
    /// `allowed_special` filters which recognized special spellings are honored on this call:
    /// occurrences of a special spelling the tokenizer knows about but that is not in
    /// `allowed_special` are *not* short-circuited, and are instead tokenized as ordinary text.
    ///
    /// # Errors
    ///
    /// Propagates any [`EncodeError`] raised by the byte-pair merger while encoding an ordinary
    /// piece (see [`byte_pair_encode`]).
    pub fn encode(
        &self, text: &str, allowed_special: &HashSet<String>,
    ) -> Result<Vec<u32>, EncodeError> {
        let mut result = Vec::new();
        let mut start = 0usize;

        loop {
            let (next_special, end) = self.find_next_allowed_special(text, start, allowed_special);

            for (piece_start, piece_end) in self.regex.find_iter(&text[start..end]) {
                let piece = &text.as_bytes()[start + piece_start..start + piece_end];
                result.extend(byte_pair_encode(piece, &self.encoder)?);
            }

            match next_special {
                Some((special_start, special_end)) => {
                    let spelling = &text[special_start..special_end];
                    result.push(self.special_encoder[spelling.as_bytes()]);
                    start = special_end;
                }
                None => break,
            }
        }

        Ok(result)
    }

    /// Scans forward from `start` for the next special-token match whose spelling is in
    /// `allowed_special`, rejecting (and skipping past) any recognized-but-not-allowed match
    /// along the way. Returns the match, if any, and the end of the ordinary region that
    /// precedes it (or `text.len()` if no allowed match remains).
    fn find_next_allowed_special(
        &self, text: &str, start: usize, allowed_special: &HashSet<String>,
    ) -> (Option<(usize, usize)>, usize) {
        let mut find_from = start;
        loop {
            match self.special_regex.find_from_pos(text, find_from) {
                Some((match_start, match_end)) => {
                    if allowed_special.contains(&text[match_start..match_end]) {
                        return (Some((match_start, match_end)), match_start);
                    }
                    // Not allowed on this call: treat as ordinary text and keep scanning past
                    // it one character at a time so an overlapping allowed match is never missed.
                    find_from = match_start
                        + text[match_start..].chars().next().map_or(1, |c| c.len_utf8());
                }
                None => return (None, text.len()),
            }
        }
    }

    /// Decodes a sequence of token ids back into bytes by concatenating their spellings.
    ///
    /// Each id is looked up first in the ordinary decoder and then the special decoder; this is
    /// a trivial inverse lookup, not a reconstruction of the merge process.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidToken`] for the first id present in neither table.
    pub fn decode(&self, tokens: &[u32]) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::with_capacity(tokens.len() * 2);
        for &token in tokens {
            let spelling = self
                .decoder
                .get(&token)
                .or_else(|| self.special_decoder.get(&token))
                .ok_or(DecodeError::InvalidToken(token))?;
            out.extend_from_slice(spelling);
        }
        Ok(out)
    }

    /// The ordinary merge vocabulary: token spelling to id.
    pub fn encoder(&self) -> &HashMap<Vec<u8>, u32> { &self.encoder }

    /// The inverse of [`CoreBpe::encoder`]: id to token spelling.
    pub fn decoder(&self) -> &HashMap<u32, Vec<u8>> { &self.decoder }

    /// The special-token vocabulary: spelling to id.
    pub fn special_encoder(&self) -> &HashMap<Vec<u8>, u32> { &self.special_encoder }

    /// The inverse of [`CoreBpe::special_encoder`]: id to spelling.
    pub fn special_decoder(&self) -> &HashMap<u32, Vec<u8>> { &self.special_decoder }

    /// All ordinary vocabulary spellings, sorted lexicographically.
    pub fn sorted_token_bytes(&self) -> &[Vec<u8>] { &self.sorted_token_bytes }

    /// The source pattern of the word-splitting regex.
    pub fn pattern(&self) -> &str { &self.regex }

    /// The source pattern of the compiled special-token union regex.
    pub fn special_pattern(&self) -> &str { &self.special_regex }
}

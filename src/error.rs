//! Error types for tokenizer construction, encoding and decoding.

use std::str::Utf8Error;

use crate::regex::RegexError;

/// Errors encountered while constructing a [`CoreBpe`](crate::CoreBpe).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum InitializationError {
    /// The encoder and decoder must have the same length (the encoder must not have duplicate ids).
    #[error("encoder and decoder must have the same length (encoder must not have duplicate ids)")]
    InvalidEncoder,
    /// The special encoder and decoder must have the same length (the special encoder must not have duplicate ids).
    #[error(
        "special encoder and decoder must have the same length (special encoder must not have duplicate ids)"
    )]
    InvalidSpecialEncoder,
    /// The word-splitting pattern, or the assembled special-token union pattern, failed to compile.
    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] RegexError),
    /// A special token spelling is not valid UTF-8.
    #[error("invalid utf-8 in special token: {0}")]
    InvalidUtf8(#[from] Utf8Error),
}

/// Errors encountered while encoding text.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The byte-pair merger was given an empty piece.
    #[error("empty piece passed to byte_pair_encode")]
    EmptyPiece,
    /// A segment produced by the merger has no entry in the rank table. The vocabulary is
    /// malformed for this input: every single byte must be present for the merge to always
    /// be able to fall back to single-byte tokens.
    #[error("no rank for piece {0:?}")]
    InvalidPiece(Vec<u8>),
}

/// Errors encountered while decoding token ids.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A token id has no entry in either the ordinary or the special decoder.
    #[error("invalid token id {0}")]
    InvalidToken(u32),
}

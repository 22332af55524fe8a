//! **Byte-pair encoding tokenizer core.**
//!
//! Given a piece of text, [`CoreBpe::encode`] produces an ordered sequence of integer token ids
//! suitable for feeding into a large language model. The crate is exactly two pieces of
//! engineering: a merge-by-rank algorithm ([`byte_pair_encode`]) that deterministically reduces
//! a byte string into the token sequence implied by a learned vocabulary, and a split-encode
//! driver ([`CoreBpe::encode`]) that interleaves a word-splitting regex with a set of
//! caller-sanctioned special tokens that must not be fragmented.
//!
//! This crate does not load vocabularies from any particular file format, does not train
//! vocabularies, and does not expose any host-language bindings — it is a pure, synchronous
//! library surface over `(text, allowed_specials) -> token ids`.
//!
//! # Examples
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::collections::{HashMap, HashSet};
//!
//! use corebpe::CoreBpe;
//!
//! let encoder: HashMap<Vec<u8>, u32> = [
//!     (b"a".to_vec(), 0),
//!     (b"b".to_vec(), 1),
//!     (b"ab".to_vec(), 2),
//!     (b" ".to_vec(), 3),
//! ]
//! .into_iter()
//! .collect();
//! let special: HashMap<Vec<u8>, u32> = [(b"<|end|>".to_vec(), 100)].into_iter().collect();
//!
//! let tokenizer = CoreBpe::new(encoder, special, r"\S+|\s+")?;
//!
//! let allowed = HashSet::from(["<|end|>".to_string()]);
//! assert_eq!(tokenizer.encode("a b<|end|>", &allowed)?, vec![0, 3, 1, 100]);
//! # Ok(())
//! # }
//! ```

mod bytepair;
mod error;
mod regex;
mod tokenizer;

pub use crate::bytepair::byte_pair_encode;
pub use crate::error::{DecodeError, EncodeError, InitializationError};
pub use crate::regex::RegexError;
pub use crate::tokenizer::CoreBpe;

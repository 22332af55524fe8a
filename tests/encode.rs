//! Property-based invariants over encoding and decoding, run with `proptest`.

use std::collections::{HashMap, HashSet};

use corebpe::{byte_pair_encode, CoreBpe};
use proptest::prelude::*;

fn vocab(pairs: &[(&str, u32)]) -> HashMap<Vec<u8>, u32> {
    pairs.iter().map(|(s, r)| (s.as_bytes().to_vec(), *r)).collect()
}

fn with_byte_fallback(mut encoder: HashMap<Vec<u8>, u32>) -> HashMap<Vec<u8>, u32> {
    for byte in 0u32..=255 {
        encoder.entry(vec![byte as u8]).or_insert(1000 + byte);
    }
    encoder
}

/// A small hand-built vocabulary covering a two-byte merge, whitespace splitting, and one
/// special token, shared by the property tests below.
fn worked_example_tokenizer() -> CoreBpe {
    let encoder =
        with_byte_fallback(vocab(&[("a", 0), ("b", 1), ("ab", 2), (" ", 3), ("hello", 4)]));
    let special = vocab(&[("<|end|>", 100)]);
    CoreBpe::new(encoder, special, r"\S+|\s+").unwrap()
}

fn allow(specials: &[&str]) -> HashSet<String> {
    specials.iter().map(|s| s.to_string()).collect()
}

/// A reference merge implementation, written independently of [`byte_pair_encode`]'s internal
/// representation, used to check merge canonicity: repeatedly replace the lowest-ranked adjacent
/// pair (leftmost on ties) until no ranked pair remains.
fn reference_merge(piece: &[u8], ranks: &HashMap<Vec<u8>, u32>) -> Vec<u32> {
    let mut segments: Vec<Vec<u8>> = piece.iter().map(|&b| vec![b]).collect();
    loop {
        let mut best: Option<(usize, u32)> = None;
        for i in 0..segments.len().saturating_sub(1) {
            let mut combined = segments[i].clone();
            combined.extend_from_slice(&segments[i + 1]);
            if let Some(&rank) = ranks.get(&combined) {
                let better = match best {
                    Some((_, best_rank)) => rank < best_rank,
                    None => true,
                };
                if better {
                    best = Some((i, rank));
                }
            }
        }
        match best {
            Some((i, _)) => {
                let next = segments.remove(i + 1);
                segments[i].extend_from_slice(&next);
            }
            None => break,
        }
    }
    segments.iter().map(|s| ranks[s]).collect()
}

fn arb_piece_and_ranks() -> impl Strategy<Value = (Vec<u8>, HashMap<Vec<u8>, u32>)> {
    (1usize..12).prop_flat_map(|len| {
        prop::collection::vec(0u8..4, len).prop_map(|piece| {
            // Small alphabet so multi-byte ranked substrings actually occur often.
            let mut ranks = HashMap::new();
            let mut next_rank = 0u32;
            for b in 0u8..4 {
                ranks.insert(vec![b], next_rank);
                next_rank += 1;
            }
            for a in 0u8..4 {
                for b in 0u8..4 {
                    // Half of all two-byte combinations get a rank, to exercise real merging.
                    if (a as u32 + b as u32 * 4) % 2 == 0 {
                        ranks.insert(vec![a, b], next_rank);
                        next_rank += 1;
                    }
                }
            }
            (piece, ranks)
        })
    })
}

proptest! {
    #[test]
    fn merge_canonicity_matches_reference_implementation((piece, ranks) in arb_piece_and_ranks()) {
        let expected = reference_merge(&piece, &ranks);
        let actual = byte_pair_encode(&piece, &ranks).unwrap();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn encode_is_deterministic(text in "[a-zA-Z0-9 ]{0,40}") {
        let t = worked_example_tokenizer();
        let allowed = allow(&["<|end|>"]);
        let first = t.encode(&text, &allowed);
        let second = t.encode(&text, &allowed);
        prop_assert_eq!(first.ok(), second.ok());
    }

    #[test]
    fn reconstruction_round_trips_through_decode(text in "[a-zA-Z0-9 ]{0,40}") {
        let t = worked_example_tokenizer();
        let ids = t.encode(&text, &allow(&["<|end|>"])).unwrap();
        let decoded = t.decode(&ids).unwrap();
        prop_assert_eq!(decoded, text.into_bytes());
    }

    #[test]
    fn allow_list_does_not_affect_text_without_specials(text in "[a-zA-Z0-9 ]{0,40}") {
        let t = worked_example_tokenizer();
        let without = t.encode(&text, &allow(&[])).unwrap();
        let with_allowed = t.encode(&text, &allow(&["<|end|>"])).unwrap();
        prop_assert_eq!(without, with_allowed);
    }
}

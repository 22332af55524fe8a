//! The byte-pair merge algorithm and the single-piece encoder built on top of it.
//!
//! This is the core of the whole crate; everything else exists to feed pieces into
//! [`byte_pair_encode`] in the right order. See [`merge_bpe`] for the merge semantics.

use std::collections::HashMap;

use crate::error::EncodeError;

pub(crate) type RankMap = HashMap<Vec<u8>, u32>;

/// `u32::MAX` is reserved as the "no merge possible here" sentinel rank.
const NO_RANK: u32 = u32::MAX;

/// One boundary of the piece currently being merged.
///
/// `rank` caches the rank of the two-part window starting at this part, i.e. the rank of the
/// substring running from `start` up to (but not including) the start of the part two positions
/// ahead. This is the quantity the merge loop repeatedly minimizes over.
#[derive(Debug, Clone, Copy)]
struct RankedPart {
    start: u32,
    rank:  u32,
}

/// Looks up the rank of the substring spanning from `parts[i].start` to `parts[j].start`,
/// or [`NO_RANK`] if `j` runs off the end of `parts` or the substring has no rank.
#[inline(always)]
fn window_rank(piece: &[u8], parts: &[RankedPart], i: usize, j: usize, ranks: &RankMap) -> u32 {
    if j >= parts.len() {
        return NO_RANK;
    }
    let slice = &piece[parts[i].start as usize..parts[j].start as usize];
    ranks.get(slice).copied().unwrap_or(NO_RANK)
}

/// Runs the byte-pair merge over `piece` and returns the boundary offsets of the final
/// segmentation: `b_0 = 0 < b_1 < … < b_k = piece.len()`.
///
/// Starts with one part per byte plus a trailing sentinel at `piece.len()`. Repeatedly finds the
/// part with the smallest finite rank (leftmost on ties), merges it with its right neighbor, and
/// recomputes the (at most two) ranks this invalidates. Stops once every remaining part has
/// [`NO_RANK`].
fn merge_bpe(piece: &[u8], ranks: &RankMap) -> Vec<u32> {
    debug_assert!(!piece.is_empty());

    let mut parts: Vec<RankedPart> = (0..piece.len() as u32)
        .map(|start| RankedPart { start, rank: NO_RANK })
        .chain(std::iter::once(RankedPart {
            start: piece.len() as u32,
            rank:  NO_RANK,
        }))
        .collect();
    for j in 0..parts.len() - 1 {
        parts[j].rank = window_rank(piece, &parts, j, j + 2, ranks);
    }

    loop {
        let mut min_rank = NO_RANK;
        let mut i = 0;
        for (j, part) in parts[..parts.len() - 1].iter().enumerate() {
            if part.rank < min_rank {
                min_rank = part.rank;
                i = j;
            }
        }
        if min_rank == NO_RANK {
            break;
        }

        if i > 0 {
            parts[i - 1].rank = window_rank(piece, &parts, i - 1, i + 2, ranks);
        }
        parts[i].rank = window_rank(piece, &parts, i, i + 3, ranks);
        parts.remove(i + 1);
    }

    parts.into_iter().map(|p| p.start).collect()
}

/// Encodes a single piece into token ids using the byte-pair merge algorithm.
///
/// If the piece is itself a vocabulary entry, this short-circuits and returns its single id
/// without running the merger. Otherwise the merger is run and every resulting segment is
/// translated through `ranks`.
///
/// # Errors
///
/// Returns [`EncodeError::EmptyPiece`] if `piece` is empty, and
/// [`EncodeError::InvalidPiece`] if a segment produced by the merger has no entry in `ranks` —
/// this indicates a malformed vocabulary (every single byte that can occur as a leftover
/// segment must have a rank).
pub fn byte_pair_encode(piece: &[u8], ranks: &RankMap) -> Result<Vec<u32>, EncodeError> {
    if piece.is_empty() {
        return Err(EncodeError::EmptyPiece);
    }
    if let Some(&rank) = ranks.get(piece) {
        return Ok(vec![rank]);
    }
    let boundaries = merge_bpe(piece, ranks);
    let mut out = Vec::with_capacity(boundaries.len() - 1);
    for window in boundaries.windows(2) {
        let (start, end) = (window[0] as usize, window[1] as usize);
        let segment = &piece[start..end];
        match ranks.get(segment) {
            Some(&rank) => out.push(rank),
            None => return Err(EncodeError::InvalidPiece(segment.to_vec())),
        }
    }
    Ok(out)
}

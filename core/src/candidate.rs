//! Candidate selection.
//!
//! RULE: Selection never touches an RNG. The index is a pure function of
//! the final score vector, so the same answers always land on the same
//! candidate within a fixed pool.

use crate::{archetype::Archetype, catalog::MatchCandidate, score::ScoreVector};

/// Round half toward positive infinity: -2.5 rounds to -2.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Weighted sum of the rounded, multiplied scores in canonical order.
pub fn score_hash(scores: &ScoreVector, multipliers: &[i64; 5]) -> u64 {
    let raw: i64 = scores
        .iter()
        .zip(multipliers.iter())
        .map(|((_, value), m)| round_half_up(value * *m as f64))
        .fold(0i64, |acc, v| acc.wrapping_add(v));
    raw.unsigned_abs()
}

/// Stable index into a pool of `len` entries. 0 for an empty pool.
pub fn stable_index(scores: &ScoreVector, multipliers: &[i64; 5], len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (score_hash(scores, multipliers) % len as u64) as usize
}

/// Pick the candidate for `archetype`. Falls back to the first candidate
/// of the whole pool when the archetype has none; None only when the pool
/// itself is empty.
pub fn select<'a>(
    scores: &ScoreVector,
    archetype: Archetype,
    candidates: &'a [MatchCandidate],
    multipliers: &[i64; 5],
) -> Option<&'a MatchCandidate> {
    let pool: Vec<&MatchCandidate> = candidates
        .iter()
        .filter(|c| c.archetype == archetype)
        .collect();

    if pool.is_empty() {
        log::warn!("No candidates for archetype '{archetype}', falling back to the first entry");
        return candidates.first();
    }

    let index = stable_index(scores, multipliers, pool.len());
    Some(pool[index])
}

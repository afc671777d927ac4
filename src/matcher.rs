//! Per-position match selection (`spec.md` §4.C5): factor vs palindrome vs
//! raw, extension beyond the index depth `H`, and the profitability
//! rewrite back to raw bases.

use crate::base::Base;
use crate::index::KmerIndex;
use crate::integer_codec::{encode_fibonacci, encode_position, position_bound};

/// A single decision made by the matcher for the current cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCandidate {
    /// Copy `len` characters from `pos` in the already-scanned prefix.
    Factor { pos: usize, len: usize },
    /// Copy `len` characters by complementing `out[cursor-rel .. cursor-rel+len)`.
    Palindrome { rel: usize, len: usize },
    /// Emit these bases verbatim (length 1 for a true raw step, longer for
    /// a match rewritten to raw by the profitability check).
    Raw(Vec<Base>),
}

impl MatchCandidate {
    pub fn len(&self) -> usize {
        match self {
            MatchCandidate::Factor { len, .. } => *len,
            MatchCandidate::Palindrome { len, .. } => *len,
            MatchCandidate::Raw(bases) => bases.len(),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, MatchCandidate::Raw(_))
    }
}

/// How many further characters beyond the index depth match, given the
/// kind-specific predicate.
fn extend(seq: &[Base], i: usize, p: usize, height: usize, palindrome: bool) -> usize {
    let mut k = 0;
    loop {
        let qi = i + height + k;
        let pi = p + height + k;
        if qi >= seq.len() {
            return k;
        }
        let matches = if palindrome {
            seq[qi].complement() == seq[pi]
        } else {
            seq[qi] == seq[pi]
        };
        if !matches {
            return k;
        }
        k += 1;
    }
}

struct Extended {
    pos: usize,
    len: usize,
}

/// Among `candidates`, keep the one whose extension beyond `height` is
/// longest; ties keep the first encountered (`spec.md` §4.C5 step 3).
fn best_extension(seq: &[Base], i: usize, candidates: &[usize], height: usize, palindrome: bool) -> Extended {
    let mut best_ext = extend(seq, i, candidates[0], height, palindrome);
    let mut best_pos = candidates[0];
    for &p in &candidates[1..] {
        let ext = extend(seq, i, p, height, palindrome);
        if ext > best_ext {
            best_ext = ext;
            best_pos = p;
        }
    }
    Extended { pos: best_pos, len: height + best_ext }
}

/// Bit cost of emitting a reference with the given position value and
/// match length, against the position field's width bound.
fn reference_cost(position_value: u64, length: usize, bound: u64) -> usize {
    1 + encode_position(position_value, bound).len() + encode_fibonacci(length as u64).len()
}

/// Decide the match candidate for cursor position `i`. Does not mutate the
/// index; the caller must call `index.insert(seq, i)` afterwards regardless
/// of what is returned (`spec.md` §4.C5 step 7).
pub fn find_match(seq: &[Base], i: usize, index: &KmerIndex, height: usize) -> MatchCandidate {
    if i + height > seq.len() {
        return MatchCandidate::Raw(vec![seq[i]]);
    }

    let window = &seq[i..i + height];
    let complement_window: Vec<Base> = window.iter().map(|b| b.complement()).collect();

    let factor = index.lookup(window).and_then(|(positions, depth)| {
        if depth == height {
            let best = best_extension(seq, i, positions, height, false);
            Some((best.pos, best.len))
        } else {
            None
        }
    });

    let palindrome = index.lookup(&complement_window).and_then(|(positions, depth)| {
        if depth == height {
            let best = best_extension(seq, i, positions, height, true);
            Some((i - best.pos, best.len))
        } else if depth > 0 {
            Some((i - positions[0], depth))
        } else {
            None
        }
    });

    let chosen = match (factor, palindrome) {
        (Some((p, flen)), Some((rel, plen))) => {
            if flen >= plen {
                Some(MatchCandidate::Factor { pos: p, len: flen })
            } else {
                Some(MatchCandidate::Palindrome { rel, len: plen })
            }
        }
        (Some((p, flen)), None) => Some(MatchCandidate::Factor { pos: p, len: flen }),
        (None, Some((rel, plen))) => Some(MatchCandidate::Palindrome { rel, len: plen }),
        (None, None) => None,
    };

    match chosen {
        None => MatchCandidate::Raw(vec![seq[i]]),
        Some(candidate) => apply_profitability(seq, i, candidate),
    }
}

fn apply_profitability(seq: &[Base], i: usize, candidate: MatchCandidate) -> MatchCandidate {
    let is_palindrome = matches!(candidate, MatchCandidate::Palindrome { .. });
    let (position_value, length, reconstruct): (u64, usize, Box<dyn Fn() -> Vec<Base>>) = match &candidate {
        MatchCandidate::Factor { pos, len } => {
            let p = *pos;
            let l = *len;
            (p as u64 + 1, l, Box::new(move || seq[p..p + l].to_vec()))
        }
        MatchCandidate::Palindrome { rel, len } => {
            let rel = *rel;
            let l = *len;
            (
                rel as u64 + 1,
                l,
                Box::new(move || seq[i - rel..i - rel + l].iter().map(|b| b.complement()).collect()),
            )
        }
        MatchCandidate::Raw(_) => return candidate,
    };

    let bound = position_bound(i as u64, is_palindrome);
    let cost = reference_cost(position_value, length, bound);
    if cost >= 2 * length {
        MatchCandidate::Raw(reconstruct())
    } else {
        candidate
    }
}

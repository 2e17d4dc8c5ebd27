//! LZ77 longest-previous-factor parsing with an unbounded window.
//!
//! The parse follows Kärkkäinen, Kempa and Puglisi: for every text position `i` the
//! previous positions whose suffixes are lexicographically nearest to suffix `i` are
//! its PSV and NSV (previous/next smaller *position* in suffix-array order). The
//! longest earlier match of suffix `i` is the longer of the matches against those two
//! candidates, so each factor costs `O(length)` comparisons and the whole parse is
//! linear after the `O(n log n)` suffix-array build.
//!
//! Conventions:
//! - Matches may overlap the position being parsed (source + length > start).
//! - A symbol never seen before is a literal factor; a repeated symbol always starts
//!   a match, even of length one.
//! - Among all earlier occurrences of the longest match, the most recent one (smallest
//!   distance) is the source. The factor count does not depend on this choice, so the
//!   count-only path skips the source lookup.

use serde::{Deserialize, Serialize};

use super::suffix_array::{build_suffix_array, inverse_suffix_array, lcp_array};
use crate::error::{ComplexityError, Result};

pub(super) const NONE: usize = usize::MAX;

/// One LZ77 factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Lz77Factor {
    /// First occurrence of a symbol.
    Literal { symbol: u32 },
    /// Copy of `length` symbols starting at the earlier position `source`.
    Match { source: usize, length: usize },
}

impl Lz77Factor {
    /// Number of text symbols covered by this factor.
    pub fn span(&self) -> usize {
        match *self {
            Lz77Factor::Literal { .. } => 1,
            Lz77Factor::Match { length, .. } => length,
        }
    }
}

/// Factor count and sum of `log2(max(length, 1))` over all factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lz77Summary {
    pub factor_count: usize,
    pub sum_log_lengths: f64,
}

//==================================================================================
// 1. Core Logic
//==================================================================================

/// For each text position, the nearest lexicographic neighbours that start earlier.
pub(super) fn previous_neighbours(sa: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let n = sa.len();
    let mut psv = vec![NONE; n];
    let mut nsv = vec![NONE; n];
    let mut stack: Vec<usize> = Vec::with_capacity(64);

    for &p in sa {
        while let Some(&top) = stack.last() {
            if top > p {
                nsv[top] = p;
                stack.pop();
            } else {
                break;
            }
        }
        psv[p] = stack.last().copied().unwrap_or(NONE);
        stack.push(p);
    }
    (psv, nsv)
}

/// Length of the common prefix of `text[i..]` and `text[j..]`, `j < i`.
#[inline]
pub(super) fn match_length(text: &[u32], i: usize, j: usize) -> usize {
    if j == NONE {
        return 0;
    }
    text[i..]
        .iter()
        .zip(&text[j..])
        .take_while(|(a, b)| a == b)
        .count()
}

/// Finds the most recent earlier occurrence of a match whose length is already known.
///
/// Suffixes sharing at least `length` symbols with suffix `i` form one suffix-array
/// interval, bounded by the nearest LCP entries below `length`. A max tree over ranks
/// holds `position + 1` for every position already passed, so the interval maximum is
/// the closest earlier start.
struct RecentOccurrences {
    rank: Vec<usize>,
    /// Min tree over the LCP array; padding leaves are 0.
    lcp_min: Vec<usize>,
    /// Max tree over ranks of `position + 1`; 0 marks "not yet passed".
    seen_max: Vec<usize>,
    size: usize,
    n: usize,
    passed: usize,
}

impl RecentOccurrences {
    fn new(text: &[u32], sa: &[usize]) -> Self {
        let n = sa.len();
        let rank = inverse_suffix_array(sa);
        let lcp = lcp_array(text, sa, &rank);
        let size = n.next_power_of_two();

        let mut lcp_min = vec![0usize; 2 * size];
        lcp_min[size..size + n].copy_from_slice(&lcp);
        for v in (1..size).rev() {
            lcp_min[v] = lcp_min[2 * v].min(lcp_min[2 * v + 1]);
        }

        Self {
            rank,
            lcp_min,
            seen_max: vec![0usize; 2 * size],
            size,
            n,
            passed: 0,
        }
    }

    /// Positions are passed in increasing order, so the new value is a path maximum.
    fn pass(&mut self, position: usize) {
        let mut v = self.size + self.rank[position];
        while v > 0 {
            self.seen_max[v] = position + 1;
            v /= 2;
        }
    }

    /// Largest rank `k <= r` with `lcp[k] < bound`, in the subtree `node` over `[lo, hi)`.
    fn last_below(&self, node: usize, lo: usize, hi: usize, r: usize, bound: usize) -> Option<usize> {
        if lo > r || self.lcp_min[node] >= bound {
            return None;
        }
        if hi - lo == 1 {
            return Some(lo);
        }
        let mid = (lo + hi) / 2;
        self.last_below(2 * node + 1, mid, hi, r, bound)
            .or_else(|| self.last_below(2 * node, lo, mid, r, bound))
    }

    /// Smallest rank `k >= l` with `lcp[k] < bound`, in the subtree `node` over `[lo, hi)`.
    fn first_below(&self, node: usize, lo: usize, hi: usize, l: usize, bound: usize) -> Option<usize> {
        if hi <= l || self.lcp_min[node] >= bound {
            return None;
        }
        if hi - lo == 1 {
            return Some(lo);
        }
        let mid = (lo + hi) / 2;
        self.first_below(2 * node, lo, mid, l, bound)
            .or_else(|| self.first_below(2 * node + 1, mid, hi, l, bound))
    }

    /// Maximum of `seen_max` over the inclusive rank range `[lo, hi]`.
    fn range_max(&self, lo: usize, hi: usize) -> usize {
        let (mut l, mut r) = (lo + self.size, hi + self.size + 1);
        let mut best = 0;
        while l < r {
            if l & 1 == 1 {
                best = best.max(self.seen_max[l]);
                l += 1;
            }
            if r & 1 == 1 {
                r -= 1;
                best = best.max(self.seen_max[r]);
            }
            l /= 2;
            r /= 2;
        }
        best
    }

    /// Latest `j < i` with `text[j..j + length] == text[i..i + length]`, `length >= 1`.
    fn most_recent(&mut self, i: usize, length: usize) -> Option<usize> {
        while self.passed < i {
            self.pass(self.passed);
            self.passed += 1;
        }
        let r = self.rank[i];
        // `lcp[0] == 0`, so a lower boundary always exists.
        let lo = self.last_below(1, 0, self.size, r, length).unwrap_or(0);
        let hi = self
            .first_below(1, 0, self.size, r + 1, length)
            .map_or(self.n - 1, |k| k - 1)
            .min(self.n - 1);
        self.range_max(lo, hi).checked_sub(1)
    }
}

/// Runs the parse and hands every factor to `emit`, in text order.
///
/// With `resolve_sources` unset, match sources are whichever neighbour candidate gave
/// the longest match; only the lengths are guaranteed.
fn parse(text: &[u32], resolve_sources: bool, mut emit: impl FnMut(Lz77Factor)) -> Result<()> {
    if text.is_empty() {
        return Err(ComplexityError::InvalidInput(
            "cannot factorize an empty sequence".to_string(),
        ));
    }

    let sa = build_suffix_array(text);
    let (psv, nsv) = previous_neighbours(&sa);
    let mut recent = resolve_sources.then(|| RecentOccurrences::new(text, &sa));
    drop(sa);

    let n = text.len();
    let mut i = 0;
    while i < n {
        let (a, b) = (psv[i], nsv[i]);
        let la = match_length(text, i, a);
        let lb = match_length(text, i, b);

        let factor = if la == 0 && lb == 0 {
            Lz77Factor::Literal { symbol: text[i] }
        } else {
            let (candidate, length) = if la >= lb { (a, la) } else { (b, lb) };
            let source = match recent.as_mut() {
                Some(index) => index.most_recent(i, length).unwrap_or(candidate),
                None => candidate,
            };
            Lz77Factor::Match { source, length }
        };
        i += factor.span();
        emit(factor);
    }
    Ok(())
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Factor count and sum-of-log-lengths of the LZ77 parse of `text`.
pub fn summarize(text: &[u32]) -> Result<Lz77Summary> {
    let mut factor_count = 0usize;
    let mut sum_log_lengths = 0.0f64;
    parse(text, false, |factor| {
        factor_count += 1;
        sum_log_lengths += (factor.span().max(1) as f64).log2();
    })?;
    crate::log_metric!("event" = "lz77_parse", "n" = text.len(), "factors" = factor_count);
    Ok(Lz77Summary {
        factor_count,
        sum_log_lengths,
    })
}

/// The full LZ77 parse of `text`, each match pointing at its most recent source.
pub fn factors(text: &[u32]) -> Result<Vec<Lz77Factor>> {
    let mut out = Vec::new();
    parse(text, true, |factor| out.push(factor))?;
    Ok(out)
}

/// Expands a parse back into the text it describes.
pub fn expand(factors: &[Lz77Factor]) -> Result<Vec<u32>> {
    let mut text: Vec<u32> = Vec::new();
    for factor in factors {
        match *factor {
            Lz77Factor::Literal { symbol } => text.push(symbol),
            Lz77Factor::Match { source, length } => {
                if source >= text.len() {
                    return Err(ComplexityError::InvalidInput(format!(
                        "match source {} points past decoded length {}",
                        source,
                        text.len()
                    )));
                }
                // Symbol by symbol: the copy may overlap its own output.
                for k in 0..length {
                    let sym = text[source + k];
                    text.push(sym);
                }
            }
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quadratic reference parse: longest match, latest source on ties.
    fn naive_factors(text: &[u32]) -> Vec<Lz77Factor> {
        let n = text.len();
        let mut i = 0;
        let mut out = Vec::new();
        while i < n {
            let mut best = (0usize, 0usize);
            for j in 0..i {
                let len = text[i..]
                    .iter()
                    .zip(&text[j..])
                    .take_while(|(a, b)| a == b)
                    .count();
                if len > 0 && len >= best.1 {
                    best = (j, len);
                }
            }
            let factor = if best.1 == 0 {
                Lz77Factor::Literal { symbol: text[i] }
            } else {
                Lz77Factor::Match {
                    source: best.0,
                    length: best.1,
                }
            };
            i += factor.span();
            out.push(factor);
        }
        out
    }

    fn lcg_text(state: &mut u64, len: usize, alphabet: u32) -> Vec<u32> {
        (0..len)
            .map(|_| {
                *state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                ((*state >> 33) % alphabet as u64) as u32
            })
            .collect()
    }

    #[test]
    fn test_constant_sequence_has_two_factors() {
        let text = vec![0u32; 1000];
        let summary = summarize(&text).unwrap();
        assert_eq!(summary.factor_count, 2);
        assert!((summary.sum_log_lengths - (999f64).log2()).abs() < 1e-12);
        assert_eq!(
            factors(&text).unwrap(),
            vec![
                Lz77Factor::Literal { symbol: 0 },
                Lz77Factor::Match {
                    source: 0,
                    length: 999
                }
            ]
        );
    }

    #[test]
    fn test_single_symbol_is_one_literal() {
        let summary = summarize(&[5]).unwrap();
        assert_eq!(summary.factor_count, 1);
        assert_eq!(summary.sum_log_lengths, 0.0);
    }

    #[test]
    fn test_periodic_sequence() {
        // 0 | 1 | 0101 (overlapping copy of period 2)
        let text = [0, 1, 0, 1, 0, 1];
        assert_eq!(summarize(&text).unwrap().factor_count, 3);
        let parse = factors(&text).unwrap();
        assert_eq!(
            parse[2],
            Lz77Factor::Match {
                source: 0,
                length: 4
            }
        );
    }

    #[test]
    fn test_repeated_symbol_is_a_match_not_a_literal() {
        // 0 | 1 | 1 | 0, where the second `1` and the final `0` are length-1 matches.
        let parse = factors(&[0, 1, 1, 0]).unwrap();
        assert_eq!(parse.len(), 4);
        assert_eq!(
            parse[3],
            Lz77Factor::Match {
                source: 0,
                length: 1
            }
        );
        assert_eq!(
            parse[2],
            Lz77Factor::Match {
                source: 1,
                length: 1
            }
        );
    }

    #[test]
    fn test_parse_matches_naive_parse() {
        let mut state = 12345u64;
        for len in [2usize, 7, 31, 200, 513] {
            for alphabet in [2u32, 3, 5] {
                let text = lcg_text(&mut state, len, alphabet);
                let expected = naive_factors(&text);
                assert_eq!(factors(&text).unwrap(), expected, "len {} alphabet {}", len, alphabet);
                assert_eq!(
                    summarize(&text).unwrap().factor_count,
                    expected.len(),
                    "len {} alphabet {}",
                    len,
                    alphabet
                );
            }
        }
    }

    #[test]
    fn test_tied_match_takes_most_recent_source() {
        // 0 | 1 | 2 | 01 | 3 | 01, where the last `01` occurs at 0 and at 3.
        let parse = factors(&[0, 1, 2, 0, 1, 3, 0, 1]).unwrap();
        assert_eq!(parse.len(), 6);
        assert_eq!(
            parse[3],
            Lz77Factor::Match {
                source: 0,
                length: 2
            }
        );
        assert_eq!(
            parse[5],
            Lz77Factor::Match {
                source: 3,
                length: 2
            }
        );
    }

    #[test]
    fn test_frequent_single_symbol_matches_point_at_last_occurrence() {
        // 0 1 0 2 0 3 ...: every `0` after the first copies the previous `0`.
        let text: Vec<u32> = (0..40u32).flat_map(|k| [0, k + 1]).collect();
        let parse = factors(&text).unwrap();
        let mut start = 0;
        for factor in &parse {
            if let Lz77Factor::Match { source, length } = *factor {
                assert_eq!(length, 1);
                assert_eq!(source, start - 2);
            }
            start += factor.span();
        }
        assert_eq!(parse, naive_factors(&text));
    }

    #[test]
    fn test_parse_expands_back_to_input() {
        let text: Vec<u32> = (0..400u32).map(|i| (i * i + i / 7) % 4).collect();
        let parse = factors(&text).unwrap();
        assert_eq!(expand(&parse).unwrap(), text);
        for (k, f) in parse.iter().enumerate() {
            if let Lz77Factor::Match { source, .. } = f {
                let start: usize = parse[..k].iter().map(|f| f.span()).sum();
                assert!(*source < start);
            }
        }
    }

    #[test]
    fn test_empty_is_invalid_input() {
        assert!(matches!(
            summarize(&[]),
            Err(ComplexityError::InvalidInput(_))
        ));
    }
}

//! Lempel-Ziv 1976 complexity (Kaspar-Schuster counting).
//!
//! Each phrase is the longest prefix of the remaining text that already occurs
//! starting at an earlier position, plus one new symbol. An earlier occurrence may
//! run into the phrase being built. A trailing prefix that is still a copy when the
//! text ends counts as one more phrase.
//!
//! The copy length at `i` is the LZ77 longest-previous-factor length, so the count
//! reuses the LZ77 neighbour arrays and is linear after the suffix-array build.

use super::lz77::{match_length, previous_neighbours};
use super::suffix_array::build_suffix_array;
use crate::error::{ComplexityError, Result};

/// Number of LZ76 phrases in `text`.
pub fn complexity(text: &[u32]) -> Result<usize> {
    if text.is_empty() {
        return Err(ComplexityError::InvalidInput(
            "cannot factorize an empty sequence".to_string(),
        ));
    }

    let sa = build_suffix_array(text);
    let (psv, nsv) = previous_neighbours(&sa);
    drop(sa);

    let n = text.len();
    let mut count = 0usize;
    let mut i = 0usize;
    while i < n {
        let copied = match_length(text, i, psv[i]).max(match_length(text, i, nsv[i]));
        count += 1;
        if i + copied >= n {
            break;
        }
        i += copied + 1;
    }

    crate::log_metric!("event" = "lz76_parse", "n" = n, "phrases" = count);
    Ok(count)
}

//! Block-sorting entropy estimator.
//!
//! The sequence is reversed and Burrows-Wheeler transformed; symbols sharing a right
//! context end up adjacent, so the BWT is close to piecewise memoryless. It is cut into
//! uniform segments of `ceil(sqrt(n))` symbols and each segment is charged its empirical
//! zeroth-order code length `-Σ count · log2(count / len)`. The total divided by `n` is
//! the estimate in bits per symbol.

use hashbrown::HashMap;

use crate::error::{ComplexityError, Result};
use crate::factorize::suffix_array::{build_suffix_array, bwt_from_suffix_array};

/// Zeroth-order code length of one segment, in bits.
fn segment_code_length(segment: &[u32]) -> f64 {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for &s in segment {
        *counts.entry(s).or_insert(0) += 1;
    }
    let len = segment.len() as f64;
    counts
        .values()
        .map(|&c| {
            let c = c as f64;
            -c * (c / len).log2()
        })
        .sum()
}

/// Bits per symbol of `text` under the uniform-segmentation BWT estimator.
pub fn block_sorting_entropy(text: &[u32]) -> Result<f64> {
    if text.is_empty() {
        return Err(ComplexityError::InvalidInput(
            "cannot estimate block-sorting entropy of an empty sequence".to_string(),
        ));
    }
    let n = text.len();
    let reversed: Vec<u32> = text.iter().rev().copied().collect();
    let sa = build_suffix_array(&reversed);
    let bwt = bwt_from_suffix_array(&reversed, &sa);

    let segment_len = (n as f64).sqrt().ceil() as usize;
    let bits: f64 = bwt.chunks(segment_len.max(1)).map(segment_code_length).sum();

    log::debug!(
        "block sorting: n={} segment_len={} bits={:.3}",
        n,
        segment_len,
        bits
    );
    Ok((bits / n as f64).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_sequence_costs_nothing() {
        assert_eq!(block_sorting_entropy(&[1; 400]).unwrap(), 0.0);
    }

    #[test]
    fn test_segment_code_length() {
        // Two symbols at equal frequency: one bit each.
        assert!((segment_code_length(&[0, 1, 1, 0]) - 4.0).abs() < 1e-12);
        assert_eq!(segment_code_length(&[7, 7, 7]), 0.0);
    }

    #[test]
    fn test_periodic_sequence_is_cheap() {
        let text: Vec<u32> = (0..4096).map(|i| i % 2).collect();
        assert!(block_sorting_entropy(&text).unwrap() < 0.05);
    }

    #[test]
    fn test_pseudo_random_binary_is_near_one_bit() {
        let mut state = 99u64;
        let text: Vec<u32> = (0..16_384)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state & 1) as u32
            })
            .collect();
        let h = block_sorting_entropy(&text).unwrap();
        assert!(h > 0.9 && h <= 1.0 + 1e-9, "h = {}", h);
    }

    #[test]
    fn test_empty_is_invalid_input() {
        assert!(block_sorting_entropy(&[]).is_err());
    }
}

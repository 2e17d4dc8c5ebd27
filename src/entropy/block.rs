//! Empirical block entropy over overlapping windows.
//!
//! Windows are counted in a hash map keyed by the window slice itself, so memory is
//! bounded by the number of distinct windows that actually occur (at most `n`), never by
//! `alphabet^k`.

use hashbrown::HashMap;

use crate::error::{ComplexityError, Result};

/// `H(k) = -Σ p(w) log2 p(w)` over the `n - k + 1` windows of length `k`.
pub fn block_entropy(text: &[u32], block_size: usize) -> Result<f64> {
    if text.is_empty() {
        return Err(ComplexityError::InvalidInput(
            "cannot compute block entropy of an empty sequence".to_string(),
        ));
    }
    if block_size == 0 {
        return Err(ComplexityError::InvalidInput(
            "block size must be at least 1".to_string(),
        ));
    }
    if block_size > text.len() {
        return Err(ComplexityError::InsufficientData {
            block_size,
            len: text.len(),
        });
    }

    let windows = text.len() - block_size + 1;
    let mut counts: HashMap<&[u32], usize> = HashMap::with_capacity(windows.min(1 << 16));
    for window in text.windows(block_size) {
        *counts.entry(window).or_insert(0) += 1;
    }

    let total = windows as f64;
    let entropy = counts
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>();

    crate::log_metric!(
        "event" = "block_entropy",
        "k" = block_size,
        "distinct_windows" = counts.len(),
        "entropy" = entropy
    );
    Ok(entropy.max(0.0))
}

/// Conditional entropy estimate `H(k+1) - H(k)`.
pub fn block_entropy_rate(text: &[u32], block_size: usize) -> Result<f64> {
    if block_size == 0 {
        return Err(ComplexityError::InvalidInput(
            "block size must be at least 1".to_string(),
        ));
    }
    if block_size + 1 > text.len() {
        return Err(ComplexityError::InsufficientData {
            block_size,
            len: text.len(),
        });
    }
    let upper = block_entropy(text, block_size + 1)?;
    let lower = block_entropy(text, block_size)?;
    Ok(upper - lower)
}

//! Frequency-counting entropy estimators.
//!
//! This module provides:
//! - Block entropy `H(k)` and the conditional estimate `H(k+1) - H(k)`
//! - The block-sorting (BWT segment) estimator

pub mod block;
pub mod block_sorting;

use crate::error::Result;
use crate::sequence::SymbolSequence;

/// Empirical block entropy of `sequence` at window length `block_size`, in bits.
pub fn block_entropy(sequence: &SymbolSequence, block_size: usize) -> Result<f64> {
    block::block_entropy(sequence.symbols(), block_size)
}

/// Entropy-rate estimate `H(k+1) - H(k)` in bits per symbol.
pub fn block_entropy_rate(sequence: &SymbolSequence, block_size: usize) -> Result<f64> {
    block::block_entropy_rate(sequence.symbols(), block_size)
}

/// Block-sorting estimate in bits per symbol.
pub fn block_sorting_entropy(sequence: &SymbolSequence) -> Result<f64> {
    block_sorting::block_sorting_entropy(sequence.symbols())
}

// In: src/sequence.rs

//! Symbol sequences and lattices: the data every estimator consumes.
//!
//! A `SymbolSequence` is validated once at construction (non-empty, alphabet of at
//! least two symbols, every value below the alphabet size) and is immutable afterwards,
//! so the factorizers and entropy estimators never re-check the alphabet contract.

use ndarray::{ArrayD, IxDyn};
use rand::Rng;

use crate::config::{HilbertPolicy, ScanOrder};
use crate::error::{ComplexityError, Result};
use crate::hilbert;

//==================================================================================
// 1. SymbolSequence
//==================================================================================

/// An ordered, non-empty sequence of symbols drawn from `0..alphabet_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSequence {
    symbols: Vec<u32>,
    alphabet_size: u32,
}

impl SymbolSequence {
    pub fn new(symbols: Vec<u32>, alphabet_size: u32) -> Result<Self> {
        if alphabet_size < 2 {
            return Err(ComplexityError::InvalidInput(format!(
                "alphabet size must be at least 2, got {}",
                alphabet_size
            )));
        }
        if symbols.is_empty() {
            return Err(ComplexityError::InvalidInput(
                "symbol sequence is empty".to_string(),
            ));
        }
        if let Some(pos) = symbols.iter().position(|&s| s >= alphabet_size) {
            return Err(ComplexityError::InvalidInput(format!(
                "symbol {} at position {} is outside the alphabet of size {}",
                symbols[pos], pos, alphabet_size
            )));
        }
        Ok(Self {
            symbols,
            alphabet_size,
        })
    }

    /// Builds a sequence whose alphabet is inferred as `max + 1` (at least 2).
    pub fn with_inferred_alphabet(symbols: Vec<u32>) -> Result<Self> {
        let max = symbols.iter().copied().max().unwrap_or(0);
        let alphabet = max.checked_add(1).ok_or_else(|| {
            ComplexityError::InvalidInput("symbol value u32::MAX leaves no room for an alphabet".to_string())
        })?;
        Self::new(symbols, alphabet.max(2))
    }

    pub fn symbols(&self) -> &[u32] {
        &self.symbols
    }

    pub fn alphabet_size(&self) -> u32 {
        self.alphabet_size
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: construction rejects empty sequences.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn into_symbols(self) -> Vec<u32> {
        self.symbols
    }
}

impl AsRef<[u32]> for SymbolSequence {
    fn as_ref(&self) -> &[u32] {
        &self.symbols
    }
}

/// Draws `len` i.i.d. uniform symbols from `0..alphabet_size`.
///
/// The generator is always supplied by the caller; there is no ambient RNG state.
pub fn random_sequence<R: Rng + ?Sized>(
    len: usize,
    alphabet_size: u32,
    rng: &mut R,
) -> Result<SymbolSequence> {
    if alphabet_size < 2 {
        return Err(ComplexityError::InvalidInput(format!(
            "alphabet size must be at least 2, got {}",
            alphabet_size
        )));
    }
    let symbols = (0..len).map(|_| rng.random_range(0..alphabet_size)).collect();
    SymbolSequence::new(symbols, alphabet_size)
}

/// Reorders `sequence` so that output position `k` holds `sequence[permutation[k]]`.
pub fn apply_permutation(sequence: &SymbolSequence, permutation: &[usize]) -> Result<SymbolSequence> {
    if permutation.len() != sequence.len() {
        return Err(ComplexityError::InvalidInput(format!(
            "permutation covers {} cells but the sequence has {}",
            permutation.len(),
            sequence.len()
        )));
    }
    let symbols = sequence.symbols();
    let reordered = permutation
        .iter()
        .map(|&idx| {
            symbols.get(idx).copied().ok_or_else(|| {
                ComplexityError::InvalidInput(format!("permutation index {} out of range", idx))
            })
        })
        .collect::<Result<Vec<u32>>>()?;
    Ok(SymbolSequence {
        symbols: reordered,
        alphabet_size: sequence.alphabet_size,
    })
}

//==================================================================================
// 2. Lattice
//==================================================================================

/// A d-dimensional lattice of symbols in ndarray's standard (row-major) layout.
#[derive(Debug, Clone)]
pub struct Lattice {
    cells: ArrayD<u32>,
    alphabet_size: u32,
}

impl Lattice {
    pub fn new(shape: &[usize], symbols: Vec<u32>, alphabet_size: u32) -> Result<Self> {
        let cells = ArrayD::from_shape_vec(IxDyn(shape), symbols)
            .map_err(|e| ComplexityError::InvalidShape(e.to_string()))?;
        Self::from_array(cells, alphabet_size)
    }

    pub fn from_array(cells: ArrayD<u32>, alphabet_size: u32) -> Result<Self> {
        if cells.ndim() == 0 {
            return Err(ComplexityError::InvalidShape(
                "lattice needs at least one dimension".to_string(),
            ));
        }
        if let Some(&sym) = cells.iter().find(|&&s| s >= alphabet_size) {
            return Err(ComplexityError::InvalidInput(format!(
                "lattice symbol {} is outside the alphabet of size {}",
                sym, alphabet_size
            )));
        }
        Ok(Self {
            cells,
            alphabet_size,
        })
    }

    /// Uniform i.i.d. lattice of the given shape.
    pub fn random<R: Rng + ?Sized>(shape: &[usize], alphabet_size: u32, rng: &mut R) -> Result<Self> {
        let n = shape.iter().product();
        let seq = random_sequence(n, alphabet_size, rng)?;
        Self::new(shape, seq.into_symbols(), alphabet_size)
    }

    pub fn shape(&self) -> &[usize] {
        self.cells.shape()
    }

    pub fn alphabet_size(&self) -> u32 {
        self.alphabet_size
    }

    pub fn cells(&self) -> &ArrayD<u32> {
        &self.cells
    }

    /// Flattens the lattice in the requested scan order.
    pub fn linearize(&self, order: ScanOrder, policy: HilbertPolicy) -> Result<SymbolSequence> {
        // `iter` walks in logical row-major order whatever the memory layout.
        let raster = SymbolSequence::new(self.cells.iter().copied().collect(), self.alphabet_size)?;
        match order {
            ScanOrder::Raster => Ok(raster),
            ScanOrder::Hilbert => {
                let permutation = hilbert::cached_permutation(self.shape(), policy)?;
                log::debug!("hilbert scan of lattice {:?}", self.shape());
                apply_permutation(&raster, &permutation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_out_of_alphabet_symbol() {
        let err = SymbolSequence::new(vec![0, 1, 2], 2).unwrap_err();
        assert!(matches!(err, ComplexityError::InvalidInput(msg) if msg.contains("position 2")));
    }

    #[test]
    fn test_rejects_empty_and_unary_alphabet() {
        assert!(SymbolSequence::new(vec![], 2).is_err());
        assert!(SymbolSequence::new(vec![0, 0], 1).is_err());
    }

    #[test]
    fn test_inferred_alphabet() {
        assert_eq!(SymbolSequence::with_inferred_alphabet(vec![0, 0]).unwrap().alphabet_size(), 2);
        assert_eq!(SymbolSequence::with_inferred_alphabet(vec![3, 1]).unwrap().alphabet_size(), 4);
    }

    #[test]
    fn test_random_sequence_is_seed_reproducible() {
        let a = random_sequence(1000, 4, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = random_sequence(1000, 4, &mut StdRng::seed_from_u64(7)).unwrap();
        let c = random_sequence(1000, 4, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.symbols().iter().all(|&s| s < 4));
    }

    #[test]
    fn test_apply_permutation() {
        let seq = SymbolSequence::new(vec![10, 11, 12, 13], 16).unwrap();
        let out = apply_permutation(&seq, &[3, 0, 2, 1]).unwrap();
        assert_eq!(out.symbols(), &[13, 10, 12, 11]);
        assert!(apply_permutation(&seq, &[0, 1]).is_err());
    }

    #[test]
    fn test_lattice_raster_is_row_major() {
        let lattice = Lattice::new(&[2, 3], vec![0, 1, 2, 3, 4, 5], 6).unwrap();
        let seq = lattice.linearize(ScanOrder::Raster, HilbertPolicy::Clip).unwrap();
        assert_eq!(seq.symbols(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_lattice_shape_mismatch_is_error() {
        let err = Lattice::new(&[2, 2], vec![0, 1, 0], 2).unwrap_err();
        assert!(matches!(err, ComplexityError::InvalidShape(_)));
    }

    #[test]
    fn test_lattice_hilbert_scan_of_2x2() {
        // Cell values equal their raster index, so the scan reveals the traversal.
        let lattice = Lattice::new(&[2, 2], vec![0, 1, 2, 3], 4).unwrap();
        let seq = lattice.linearize(ScanOrder::Hilbert, HilbertPolicy::Strict).unwrap();
        let mut sorted = seq.symbols().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        assert_eq!(seq.symbols()[0], 0);
        // The diagonal cell 3 is never adjacent to 0 on a Hilbert walk.
        assert_eq!(seq.symbols()[2], 3);
    }
}

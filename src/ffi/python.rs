// In: src/ffi/python.rs

//! Thin `pyo3` wrappers: parse Python arguments into Rust types, call the library,
//! and map `ComplexityError` onto `ValueError` through `?`.

use log::LevelFilter;
use pyo3::prelude::*;
use std::path::Path;
use std::str::FromStr;

use crate::config::{CodecSpec, EstimatorConfig, HilbertPolicy, Method};
use crate::entropy;
use crate::error::ComplexityError;
use crate::estimator::estimate_with_config;
use crate::factorize::{self, Factorization, FactorizationMethod};
use crate::hilbert;
use crate::kernels;
use crate::observability;
use crate::sequence::SymbolSequence;

fn parse_policy(policy: &str) -> Result<HilbertPolicy, ComplexityError> {
    match policy.to_lowercase().as_str() {
        "strict" => Ok(HilbertPolicy::Strict),
        "clip" => Ok(HilbertPolicy::Clip),
        other => Err(ComplexityError::InvalidInput(format!(
            "unknown Hilbert policy '{}', expected 'strict' or 'clip'",
            other
        ))),
    }
}

fn sequence_from(symbols: Vec<u32>, alphabet_size: Option<u32>) -> Result<SymbolSequence, ComplexityError> {
    match alphabet_size {
        Some(a) => SymbolSequence::new(symbols, a),
        None => SymbolSequence::with_inferred_alphabet(symbols),
    }
}

//==================================================================================
// I. Core Functions
//==================================================================================

/// Returns `(factor_count, sum_log_lengths)`; the second entry is `None` except for LZ77.
#[pyfunction]
#[pyo3(name = "lempel_ziv_complexity", signature = (sequence, method = "lz77"))]
pub fn lempel_ziv_complexity_py(sequence: Vec<u32>, method: &str) -> PyResult<(usize, Option<f64>)> {
    let method = FactorizationMethod::from_str(method)?;
    let seq = SymbolSequence::with_inferred_alphabet(sequence)?;
    let result: Factorization = factorize::factorize(&seq, method)?;
    Ok((result.factor_count(), result.sum_log_lengths()))
}

/// Hilbert traversal order of a lattice, as raster indices.
#[pyfunction]
#[pyo3(name = "hilbert_mask", signature = (shape, policy = "clip"))]
pub fn hilbert_mask_py(shape: Vec<usize>, policy: &str) -> PyResult<Vec<usize>> {
    let permutation = hilbert::cached_permutation(&shape, parse_policy(policy)?)?;
    Ok(permutation.to_vec())
}

/// Distance of `(x, y)` along the level-`level` Gosper curve, `None` outside the island.
#[pyfunction]
#[pyo3(name = "gosper_distance")]
pub fn gosper_distance_py(x: f64, y: f64, level: i32) -> PyResult<Option<u64>> {
    Ok(hilbert::gosper_distance((x, y), level)?)
}

/// Axial `(q, r)` coordinates of the level-`level` hexagonal patch in Gosper order.
#[pyfunction]
#[pyo3(name = "gosper_order")]
pub fn gosper_order_py(level: i32) -> PyResult<Vec<(i64, i64)>> {
    Ok(hilbert::gosper_order(level)?
        .into_iter()
        .map(|cell| (cell.q, cell.r))
        .collect())
}

#[pyfunction]
#[pyo3(name = "block_entropy", signature = (sequence, block_size = 6))]
pub fn block_entropy_py(sequence: Vec<u32>, block_size: usize) -> PyResult<f64> {
    let seq = SymbolSequence::with_inferred_alphabet(sequence)?;
    Ok(entropy::block_entropy(&seq, block_size)?)
}

/// Entropy rate by any method name (`lz76`, `lz77`, `lz78`, `block_entropy`, `block_sorting`,
/// or a codec name such as `zstd`).
#[pyfunction]
#[pyo3(
    name = "entropy_rate",
    signature = (sequence, alphabet_size = None, method = "lz77", extrapolate = true, a = None, seed = 0, trials = 1)
)]
pub fn entropy_rate_py(
    sequence: Vec<u32>,
    alphabet_size: Option<u32>,
    method: &str,
    extrapolate: bool,
    a: Option<f64>,
    seed: u64,
    trials: usize,
) -> PyResult<f64> {
    let seq = sequence_from(sequence, alphabet_size)?;
    let config = EstimatorConfig {
        method: Method::from_str(method)?,
        extrapolate,
        convergence_rate: a,
        seed,
        baseline_trials: trials,
        ..EstimatorConfig::default()
    };
    Ok(estimate_with_config(&seq, &config)?.value)
}

/// Full estimate from a JSON `EstimatorConfig`, returned as a JSON report.
#[pyfunction]
#[pyo3(name = "estimate_json", signature = (sequence, config_json, alphabet_size = None))]
pub fn estimate_json_py(sequence: Vec<u32>, config_json: &str, alphabet_size: Option<u32>) -> PyResult<String> {
    let config = EstimatorConfig::from_json_str(config_json)?;
    let seq = sequence_from(sequence, alphabet_size)?;
    let estimate = estimate_with_config(&seq, &config)?;
    Ok(serde_json::to_string(&estimate).map_err(ComplexityError::from)?)
}

/// Returns `(size, passes, first_pass_size)` for a byte buffer.
#[pyfunction]
#[pyo3(
    name = "compressed_size",
    signature = (data, algorithm = "deflate", level = None, rle = false, recompress = true)
)]
pub fn compressed_size_py(
    data: Vec<u8>,
    algorithm: &str,
    level: Option<i32>,
    rle: bool,
    recompress: bool,
) -> PyResult<(usize, usize, usize)> {
    let spec = CodecSpec {
        algorithm: algorithm.parse()?,
        level,
        rle,
        recompress,
    };
    let size = kernels::compressed_size(&spec, &data)?;
    Ok((size.size, size.passes, size.first_pass_size))
}

#[pyfunction]
#[pyo3(name = "pack_bits", signature = (sequence, bits_per_symbol = None))]
pub fn pack_bits_py(sequence: Vec<u32>, bits_per_symbol: Option<u8>) -> PyResult<Vec<u8>> {
    let bits = match bits_per_symbol {
        Some(b) => b,
        None => {
            let max = sequence.iter().copied().max().unwrap_or(0);
            kernels::minimal_bits(max.saturating_add(1))
        }
    };
    Ok(kernels::pack_bits(&sequence, bits)?)
}

//==================================================================================
// II. Logging
//==================================================================================

#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) -> PyResult<()> {
    observability::init_logging(LevelFilter::Debug, log_file.as_deref().map(Path::new))?;
    Ok(())
}

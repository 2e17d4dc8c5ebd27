// In: src/config.rs

//! The single source of truth for all estimator configuration.
//!
//! `EstimatorConfig` is created once at the application boundary (from a JSON file,
//! a Python call, or plain Rust) and then handed to an `EntropyRateEstimator`, which
//! never mutates it. Every field carries a serde default so partial documents are
//! accepted.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{ComplexityError, Result};

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// The general-purpose compressors the estimator can delegate to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Raw DEFLATE stream (no zlib/gzip container).
    Deflate,
    Bzip2,
    /// Legacy LZMA ("alone" format).
    Lzma,
    Zstd,
    Brotli,
    /// Zopfli-optimised DEFLATE in a zlib container. `level` is the iteration count.
    Zopfli,
    /// Raw DEFLATE followed by bzip2, both at the same level.
    #[serde(rename = "deflate+bzip2")]
    DeflateBzip2,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Deflate,
        Algorithm::Bzip2,
        Algorithm::Lzma,
        Algorithm::Zstd,
        Algorithm::Brotli,
        Algorithm::Zopfli,
        Algorithm::DeflateBzip2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Deflate => "deflate",
            Algorithm::Bzip2 => "bzip2",
            Algorithm::Lzma => "lzma",
            Algorithm::Zstd => "zstd",
            Algorithm::Brotli => "brotli",
            Algorithm::Zopfli => "zopfli",
            Algorithm::DeflateBzip2 => "deflate+bzip2",
        }
    }

    /// The level used when a `CodecSpec` asks for "highest".
    pub fn highest_level(self) -> i32 {
        match self {
            Algorithm::Deflate | Algorithm::Bzip2 | Algorithm::Lzma | Algorithm::DeflateBzip2 => 9,
            Algorithm::Zstd => 22,
            Algorithm::Brotli => 11,
            Algorithm::Zopfli => 15,
        }
    }

    /// Inclusive range of accepted levels.
    pub fn level_range(self) -> (i32, i32) {
        match self {
            Algorithm::Deflate | Algorithm::Lzma => (0, 9),
            Algorithm::Bzip2 | Algorithm::DeflateBzip2 => (1, 9),
            Algorithm::Zstd => (1, 22),
            Algorithm::Brotli => (0, 11),
            Algorithm::Zopfli => (1, 1000),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ComplexityError;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s.to_lowercase())
            .ok_or_else(|| ComplexityError::UnsupportedMethod(s.to_string()))
    }
}

/// Settings for one external-compressor collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecSpec {
    pub algorithm: Algorithm,
    /// `None` selects `Algorithm::highest_level`.
    #[serde(default)]
    pub level: Option<i32>,
    /// Run-length encode the packed bytes before compressing.
    #[serde(default)]
    pub rle: bool,
    /// Keep recompressing the output for as long as it keeps shrinking.
    #[serde(default)]
    pub recompress: bool,
}

impl CodecSpec {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            level: None,
            rle: false,
            recompress: false,
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// The concrete level after resolving "highest" and validating the range.
    pub fn effective_level(&self) -> Result<i32> {
        let level = self.level.unwrap_or_else(|| self.algorithm.highest_level());
        let (lo, hi) = self.algorithm.level_range();
        if level < lo || level > hi {
            return Err(ComplexityError::InvalidInput(format!(
                "{} level {} outside [{}, {}]",
                self.algorithm.name(),
                level,
                lo,
                hi
            )));
        }
        Ok(level)
    }
}

/// Which raw complexity statistic the estimator computes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Method {
    /// Kaspar-Schuster LZ76 phrase count, `c·log2 n / n`.
    Lz76,
    /// Longest-previous-factor count with the LZ77 closed-form rate.
    Lz77,
    /// Incremental-dictionary phrase count with the LZ78 closed-form rate.
    Lz78,
    /// Conditional entropy `H(k+1) - H(k)` of overlapping windows.
    BlockEntropy {
        #[serde(default = "default_block_size")]
        block_size: usize,
    },
    /// Segment-wise zeroth-order entropy of the Burrows-Wheeler transform.
    BlockSorting,
    /// `8 * compressed_bytes / n` through an external compressor.
    Compressor(CodecSpec),
}

impl Default for Method {
    fn default() -> Self {
        Method::Lz77
    }
}

impl Method {
    pub fn name(&self) -> String {
        match self {
            Method::Lz76 => "lz76".to_string(),
            Method::Lz77 => "lz77".to_string(),
            Method::Lz78 => "lz78".to_string(),
            Method::BlockEntropy { block_size } => format!("block_entropy(k={})", block_size),
            Method::BlockSorting => "block_sorting".to_string(),
            Method::Compressor(spec) => spec.algorithm.name().to_string(),
        }
    }

    /// The finite-size convergence parameter used when the caller gives none.
    pub fn default_convergence_rate(&self) -> f64 {
        match self {
            Method::Lz78 => 1.0,
            _ => 1.5,
        }
    }
}

impl FromStr for Method {
    type Err = ComplexityError;

    /// Parses a method name. Codec names select that compressor at its highest level.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lz76" => Ok(Method::Lz76),
            "lz77" => Ok(Method::Lz77),
            "lz78" => Ok(Method::Lz78),
            "block_entropy" => Ok(Method::BlockEntropy {
                block_size: default_block_size(),
            }),
            "block_sorting" => Ok(Method::BlockSorting),
            other => Algorithm::from_str(other)
                .map(|a| Method::Compressor(CodecSpec::new(a)))
                .map_err(|_| ComplexityError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// How a multi-dimensional lattice is flattened into a symbol sequence.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    /// Row-major (C) order: the last axis varies fastest.
    #[default]
    Raster,
    Hilbert,
}

/// What the Hilbert traversal does with a non-hypercube lattice.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HilbertPolicy {
    /// Every side must be the same power of two.
    Strict,
    /// Tile the lattice with cubes of the shortest side and chain their curves.
    #[default]
    Clip,
}

//==================================================================================
// II. The Unified EstimatorConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct EstimatorConfig {
    #[serde(default)]
    pub method: Method,

    /// Normalize against a random sequence of identical length and alphabet.
    #[serde(default = "default_true")]
    pub extrapolate: bool,

    /// The `a` parameter of the finite-size correction. Must lie in `[0, 2]`.
    #[serde(default)]
    pub convergence_rate: Option<f64>,

    /// Seed for the baseline generator used by the convenience API.
    #[serde(default)]
    pub seed: u64,

    /// Number of independent baseline draws averaged when extrapolating.
    #[serde(default = "default_baseline_trials")]
    pub baseline_trials: usize,

    #[serde(default)]
    pub scan_order: ScanOrder,

    #[serde(default)]
    pub hilbert_policy: HilbertPolicy,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            extrapolate: true,
            convergence_rate: None,
            seed: 0,
            baseline_trials: default_baseline_trials(),
            scan_order: ScanOrder::default(),
            hilbert_policy: HilbertPolicy::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// The convergence parameter, falling back to the method's default.
    pub fn convergence_rate(&self) -> f64 {
        self.convergence_rate
            .unwrap_or_else(|| self.method.default_convergence_rate())
    }

    pub fn validate(&self) -> Result<()> {
        let a = self.convergence_rate();
        if !(0.0..=2.0).contains(&a) {
            return Err(ComplexityError::InvalidInput(format!(
                "convergence_rate must lie in [0, 2], got {}",
                a
            )));
        }
        if self.baseline_trials == 0 {
            return Err(ComplexityError::InvalidInput(
                "baseline_trials must be at least 1".to_string(),
            ));
        }
        match self.method {
            Method::BlockEntropy { block_size: 0 } => Err(ComplexityError::InvalidInput(
                "block_size must be at least 1".to_string(),
            )),
            Method::Compressor(spec) => spec.effective_level().map(|_| ()),
            _ => Ok(()),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_baseline_trials() -> usize {
    1
}

fn default_block_size() -> usize {
    6
}

// In: src/estimator/core.rs

//! The `EntropyRateEstimator` orchestrator.
//!
//! An estimate is computed in two halves that run the same code path:
//! 1. The raw statistic of the input (a corrected LZ rate, a block-entropy difference,
//!    a block-sorting rate, or `8 · compressed_bytes / n`).
//! 2. When extrapolating, the same statistic on freshly drawn uniform sequences of the
//!    same length and alphabet, averaged over the requested number of draws.
//!
//! The result is `raw / baseline`, so an incompressible input maps to about 1 and a
//! highly regular one towards 0. The random generator is always supplied by the
//! caller.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::formulas::{corrected_rate, ensure_finite, normalize};
use crate::config::{EstimatorConfig, Method};
use crate::entropy;
use crate::error::{ComplexityError, Result};
use crate::factorize::{factorize, FactorizationMethod};
use crate::kernels::{self, Compressor};
use crate::sequence::{random_sequence, Lattice, SymbolSequence};

//==================================================================================
// 1. Result Types
//==================================================================================

/// The raw statistic of one sequence, before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawStatistic {
    /// Bits per symbol.
    pub value: f64,
    /// Number of LZ factors, for the LZ methods.
    pub factor_count: Option<usize>,
}

/// A complete, serializable estimation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyEstimate {
    pub method: String,
    /// Raw statistic of the input, in bits per symbol.
    pub raw: f64,
    /// Mean raw statistic of the random baselines, if extrapolating.
    pub baseline: Option<f64>,
    /// The final estimate: `raw / baseline` or just `raw`.
    pub value: f64,
    pub factor_count: Option<usize>,
    pub length: usize,
}

//==================================================================================
// 2. The Estimator
//==================================================================================

#[derive(Debug, Clone)]
pub struct EntropyRateEstimator {
    config: EstimatorConfig,
}

impl EntropyRateEstimator {
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_method(method: Method) -> Result<Self> {
        Self::new(EstimatorConfig::with_method(method))
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Computes the method's raw statistic on one sequence.
    pub fn raw_statistic(&self, sequence: &SymbolSequence) -> Result<RawStatistic> {
        let n = sequence.len();
        let statistic = match &self.config.method {
            Method::Lz76 | Method::Lz77 | Method::Lz78 => {
                let method = match self.config.method {
                    Method::Lz76 => FactorizationMethod::Lz76,
                    Method::Lz78 => FactorizationMethod::Lz78,
                    _ => FactorizationMethod::Lz77,
                };
                let factorization = factorize(sequence, method)?;
                let c = factorization.factor_count();
                RawStatistic {
                    value: corrected_rate(
                        method,
                        c,
                        n,
                        sequence.alphabet_size(),
                        self.config.convergence_rate(),
                    )?,
                    factor_count: Some(c),
                }
            }
            Method::BlockEntropy { block_size } => RawStatistic {
                value: entropy::block_entropy_rate(sequence, *block_size)?,
                factor_count: None,
            },
            Method::BlockSorting => RawStatistic {
                value: entropy::block_sorting_entropy(sequence)?,
                factor_count: None,
            },
            Method::Compressor(spec) => {
                let packed = kernels::pack_bits(
                    sequence.symbols(),
                    kernels::minimal_bits(sequence.alphabet_size()),
                )?;
                let size = kernels::compressed_size(spec, &packed)?;
                RawStatistic {
                    value: 8.0 * size.size as f64 / n as f64,
                    factor_count: None,
                }
            }
        };
        ensure_finite(statistic.value, "raw statistic")?;
        Ok(statistic)
    }

    /// Mean raw statistic over `trials` uniform sequences of length `n`.
    pub fn baseline<R: Rng + ?Sized>(
        &self,
        n: usize,
        alphabet_size: u32,
        rng: &mut R,
        trials: usize,
    ) -> Result<f64> {
        if trials == 0 {
            return Err(ComplexityError::InvalidInput(
                "at least one baseline draw is required".to_string(),
            ));
        }
        let mut total = 0.0;
        for trial in 0..trials {
            let random = random_sequence(n, alphabet_size, rng)?;
            let stat = self.raw_statistic(&random)?;
            log::debug!(
                "baseline draw {}/{}: {:.6} bits/symbol",
                trial + 1,
                trials,
                stat.value
            );
            total += stat.value;
        }
        ensure_finite(total / trials as f64, "baseline mean")
    }

    /// Estimates with the configured number of baseline draws.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        sequence: &SymbolSequence,
        rng: &mut R,
    ) -> Result<EntropyEstimate> {
        self.estimate_averaged(sequence, rng, self.config.baseline_trials)
    }

    /// Estimates, normalizing by the mean of `trials` independent baselines.
    pub fn estimate_averaged<R: Rng + ?Sized>(
        &self,
        sequence: &SymbolSequence,
        rng: &mut R,
        trials: usize,
    ) -> Result<EntropyEstimate> {
        let n = sequence.len();
        log::debug!(
            "estimating {} on {} symbols (alphabet {}, extrapolate {})",
            self.config.method.name(),
            n,
            sequence.alphabet_size(),
            self.config.extrapolate
        );

        let raw = self.raw_statistic(sequence)?;
        let (baseline, value) = if self.config.extrapolate {
            let baseline = self.baseline(n, sequence.alphabet_size(), rng, trials)?;
            (Some(baseline), normalize(raw.value, baseline)?)
        } else {
            (None, raw.value)
        };

        log_metric!(
            "event" = "estimate",
            "method" = self.config.method.name(),
            "n" = n,
            "raw" = raw.value,
            "baseline" = baseline.unwrap_or(f64::NAN),
            "value" = value
        );

        Ok(EntropyEstimate {
            method: self.config.method.name(),
            raw: raw.value,
            baseline,
            value,
            factor_count: raw.factor_count,
            length: n,
        })
    }

    /// Linearizes `lattice` with the configured scan order, then estimates.
    pub fn estimate_lattice<R: Rng + ?Sized>(
        &self,
        lattice: &Lattice,
        rng: &mut R,
    ) -> Result<EntropyEstimate> {
        let sequence = lattice.linearize(self.config.scan_order, self.config.hilbert_policy)?;
        self.estimate(&sequence, rng)
    }
}

//==================================================================================
// 3. Convenience API
//==================================================================================

/// Tuning knobs for `entropy_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationParams {
    /// `None` selects the method's default.
    #[serde(default)]
    pub convergence_rate: Option<f64>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_trials")]
    pub baseline_trials: usize,
}

impl Default for EstimationParams {
    fn default() -> Self {
        Self {
            convergence_rate: None,
            seed: 0,
            baseline_trials: default_trials(),
        }
    }
}

fn default_trials() -> usize {
    1
}

/// One-call estimate with a baseline generator seeded from `params.seed`.
pub fn entropy_rate(
    sequence: &SymbolSequence,
    method: Method,
    extrapolate: bool,
    params: &EstimationParams,
) -> Result<f64> {
    let config = EstimatorConfig {
        method,
        extrapolate,
        convergence_rate: params.convergence_rate,
        seed: params.seed,
        baseline_trials: params.baseline_trials,
        ..EstimatorConfig::default()
    };
    estimate_with_config(sequence, &config).map(|e| e.value)
}

/// Runs a full estimate from a config, seeding the generator from `config.seed`.
pub fn estimate_with_config(
    sequence: &SymbolSequence,
    config: &EstimatorConfig,
) -> Result<EntropyEstimate> {
    let estimator = EntropyRateEstimator::new(config.clone())?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    estimator.estimate(sequence, &mut rng)
}

/// `8 · |compress(pack(sequence))| / n` for an arbitrary compressor, single pass.
pub fn compression_rate(sequence: &SymbolSequence, compressor: &dyn Compressor) -> Result<f64> {
    let packed = kernels::pack_bits(
        sequence.symbols(),
        kernels::minimal_bits(sequence.alphabet_size()),
    )?;
    let compressed = compressor.compress(&packed)?;
    ensure_finite(
        8.0 * compressed.len() as f64 / sequence.len() as f64,
        "compression rate",
    )
}

/// Compressor-based estimate against a caller-drawn baseline sequence.
pub fn estimate_with_compressor<R: Rng + ?Sized>(
    sequence: &SymbolSequence,
    compressor: &dyn Compressor,
    rng: &mut R,
) -> Result<f64> {
    let baseline = random_sequence(sequence.len(), sequence.alphabet_size(), rng)?;
    let raw = compression_rate(sequence, compressor)?;
    let reference = compression_rate(&baseline, compressor)?;
    log::debug!(
        "{}: input {:.4} bits/symbol, baseline {:.4}",
        compressor.name(),
        raw,
        reference
    );
    normalize(raw, reference)
}

//! Entropy-rate estimation: closed-form LZ rates, finite-size correction, and
//! normalization against uniform random baselines.

pub mod core;
pub mod formulas;


pub use self::core::{
    compression_rate, entropy_rate, estimate_with_compressor, estimate_with_config,
    EntropyEstimate, EntropyRateEstimator, EstimationParams, RawStatistic,
};
pub use self::formulas::{finite_size_correction, lz76_rate, lz77_rate, lz78_rate};

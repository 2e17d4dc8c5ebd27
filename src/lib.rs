//! This file is the root of the `sweetsourcod` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`factorize`, `estimator`,
//!     `kernels`, etc.) and re-exporting the operations most callers need.
//! 2.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python (`python` feature only).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod config;
pub mod entropy;
pub mod error;
pub mod estimator;
pub mod factorize;
pub mod hilbert;
pub mod kernels;
pub mod sequence;

#[cfg(feature = "python")]
mod ffi;

pub use config::{Algorithm, CodecSpec, EstimatorConfig, HilbertPolicy, Method, ScanOrder};
pub use entropy::{block_entropy, block_entropy_rate, block_sorting_entropy};
pub use error::{ComplexityError, Result};
pub use estimator::{entropy_rate, EntropyEstimate, EntropyRateEstimator, EstimationParams};
pub use factorize::{factorize, lz77_factors, Factorization, FactorizationMethod, Lz77Factor};
pub use hilbert::{gosper_order, hilbert_permutation, HexCell};
pub use kernels::{compressed_size, pack_bits, CompressedSize, Compressor};
pub use sequence::{random_sequence, Lattice, SymbolSequence};

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `sweetsourcod` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn sweetsourcod(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use ffi::python;

    m.add_function(wrap_pyfunction!(python::lempel_ziv_complexity_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::hilbert_mask_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::gosper_distance_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::gosper_order_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::block_entropy_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::entropy_rate_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::estimate_json_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::compressed_size_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::pack_bits_py, m)?)?;

    // --- Expose the error type ---
    m.add(
        "ComplexityError",
        m.py().get_type_bound::<pyo3::exceptions::PyValueError>(),
    )?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    // --- Logging ---
    m.add_function(wrap_pyfunction!(python::enable_verbose_logging_py, m)?)?;

    Ok(())
}

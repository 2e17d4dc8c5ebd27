// In: src/error.rs

//! This module defines the single, unified error type for the entire sweetsourcod library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every estimator operation is an all-or-nothing pure function: an error is surfaced
//! synchronously to the caller and no partial result is ever returned.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComplexityError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to the estimator's contract)
    // =========================================================================
    /// Empty sequence, out-of-alphabet symbol, bad parameter, or malformed input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A lattice shape the Hilbert traversal cannot handle.
    #[error("Invalid lattice shape: {0}")]
    InvalidShape(String),

    #[error("Insufficient data: block size {block_size} needs at least {needed} symbols, got {len}", needed = .block_size + 1)]
    InsufficientData { block_size: usize, len: usize },

    #[error("Unsupported method: '{0}'")]
    UnsupportedMethod(String),

    /// A numeric result would be NaN, infinite, or otherwise outside its domain.
    #[error("Arithmetic domain error: {0}")]
    ArithmeticDomain(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g. reading a config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically during config (de)serialization.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    // =========================================================================
    // === Low-Level Kernel Errors
    // =========================================================================
    #[error("{algorithm} operation failed: {message}")]
    Codec { algorithm: String, message: String },

    #[error("RLE decoding error: {0}")]
    RleDecodeError(String),

    #[error("LEB128 decoding error: {0}")]
    Leb128DecodeError(String),

    #[error("Bitpack decoding failed due to truncated buffer or data corruption")]
    BitpackDecodeError,

    #[error("Bitpack encoding error: value {0} exceeds bit width {1}")]
    BitpackEncodeError(u64, u8),
}

/// A specialized `Result` type for sweetsourcod operations.
pub type Result<T> = std::result::Result<T, ComplexityError>;

impl ComplexityError {
    /// Builds a `Codec` error from any displayable backend failure.
    pub(crate) fn codec(algorithm: &str, err: impl std::fmt::Display) -> Self {
        ComplexityError::Codec {
            algorithm: algorithm.to_string(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

#[cfg(feature = "python")]
impl From<ComplexityError> for pyo3::PyErr {
    fn from(err: ComplexityError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message_names_required_length() {
        let err = ComplexityError::InsufficientData {
            block_size: 4,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: block size 4 needs at least 5 symbols, got 3"
        );
    }

    #[test]
    fn test_io_error_converts_via_from() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(ComplexityError::Io(_))));
    }
}

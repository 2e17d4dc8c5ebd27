//! Brotli through the pure-Rust `brotli` crate.

use brotli::enc::BrotliEncoderParams;

use crate::error::ComplexityError;

const NAME: &str = "brotli";

/// Largest window brotli's standard format allows.
const LG_WINDOW: i32 = 24;

//==================================================================================
// 1. Public API
//==================================================================================

/// `level` is the brotli quality, `0..=11`.
pub fn encode(input: &[u8], level: i32) -> Result<Vec<u8>, ComplexityError> {
    let params = BrotliEncoderParams {
        quality: level,
        lgwin: LG_WINDOW,
        ..Default::default()
    };
    let mut output = Vec::new();
    brotli::BrotliCompress(&mut &input[..], &mut output, &params)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    Ok(output)
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>, ComplexityError> {
    let mut output = Vec::new();
    brotli::BrotliDecompress(&mut &input[..], &mut output)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    Ok(output)
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

//! Zstandard through the `zstd` crate.
//!
//! A plain single frame with no length prefix, content-size field, or checksum: the
//! measured size is the coded data plus the minimal frame header.

use std::io::Write;
use zstd::stream::Encoder;

use crate::error::ComplexityError;

const NAME: &str = "zstd";

//==================================================================================
// 1. Core Logic
//==================================================================================

fn compress_slice(input: &[u8], output: &mut Vec<u8>, level: i32) -> Result<(), ComplexityError> {
    let mut encoder = Encoder::new(output, level).map_err(|e| ComplexityError::codec(NAME, e))?;
    // A known source size lets high levels shrink their tables to fit the input.
    encoder
        .set_pledged_src_size(Some(input.len() as u64))
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    encoder
        .include_contentsize(false)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    encoder
        .write_all(input)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    // `finish` writes the frame epilogue.
    encoder.finish().map_err(|e| ComplexityError::codec(NAME, e))?;
    Ok(())
}

//==================================================================================
// 2. Public API
//==================================================================================

pub fn encode(input: &[u8], level: i32) -> Result<Vec<u8>, ComplexityError> {
    let mut output = Vec::with_capacity(input.len() / 2 + 64);
    compress_slice(input, &mut output, level)?;
    Ok(output)
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>, ComplexityError> {
    zstd::stream::decode_all(input).map_err(|e| ComplexityError::codec(NAME, e))
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zstd_roundtrip_simple_text() {
        let original =
            b"hello world, this is a test of zstd compression. hello world, this is a test.".to_vec();
        let compressed = encode(&original, 3).unwrap();
        assert!(compressed.len() < original.len());
        assert_eq!(decode(&compressed).unwrap(), original);
    }

    #[test]
    fn test_zstd_roundtrip_highly_compressible_data() {
        let original = vec![42u8; 10_000];
        let compressed = encode(&original, 22).unwrap();
        assert!(compressed.len() < 50);
        assert_eq!(decode(&compressed).unwrap(), original);
    }

    #[test]
    fn test_zstd_decompress_invalid_data() {
        let err = decode(&[1, 2, 3, 4, 5]).unwrap_err();
        assert!(err.to_string().contains("zstd"));
    }
}

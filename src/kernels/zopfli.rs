//! Zopfli: an exhaustive DEFLATE optimiser, emitted in a zlib container.
//!
//! Only the encoder is zopfli; its output is ordinary zlib, so decoding goes through
//! `flate2`. The "level" is the number of optimisation iterations.

use flate2::read::ZlibDecoder;
use std::io::Read;
use std::num::NonZeroU64;
use zopfli::{Format, Options};

use crate::error::ComplexityError;

const NAME: &str = "zopfli";

//==================================================================================
// 1. Public API
//==================================================================================

pub fn encode(input: &[u8], iterations: i32) -> Result<Vec<u8>, ComplexityError> {
    let iteration_count = u64::try_from(iterations)
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or_else(|| {
            ComplexityError::codec(NAME, format!("iteration count must be positive, got {}", iterations))
        })?;
    let options = Options {
        iteration_count,
        ..Default::default()
    };
    let mut output = Vec::new();
    zopfli::compress(options, Format::Zlib, input, &mut output)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    Ok(output)
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>, ComplexityError> {
    let mut output = Vec::new();
    ZlibDecoder::new(input)
        .read_to_end(&mut output)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    Ok(output)
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zopfli_roundtrip() {
        let original = b"zopfli squeezes deflate streams. zopfli squeezes deflate streams.".repeat(8);
        let compressed = encode(&original, 5).unwrap();
        assert!(compressed.len() < original.len());
        assert_eq!(decode(&compressed).unwrap(), original);
    }

    #[test]
    fn test_zopfli_output_is_zlib_framed() {
        let original: Vec<u8> = (0..4000u32).map(|i| ((i * i) % 13) as u8).collect();
        let compressed = encode(&original, 15).unwrap();
        // CMF byte: deflate with a 32 KiB window.
        assert_eq!(compressed[0], 0x78);
        assert_eq!(decode(&compressed).unwrap(), original);
    }

    #[test]
    fn test_zopfli_rejects_zero_iterations() {
        assert!(encode(b"abc", 0).is_err());
    }
}

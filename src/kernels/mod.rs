//! This module serves as the public API and dispatcher for the external-compressor
//! collaborators and the small byte-level transforms that feed them.
//!
//! Every codec is a pure `encode(bytes, level)` / `decode(bytes)` pair. `CodecSpec`
//! implements the `Compressor` trait by dispatching on its `Algorithm`, optionally
//! wrapping the codec in an RLE pre-pass. `compressed_size` is what the estimator uses:
//! it measures the compressed length and, if requested, keeps recompressing the output
//! while it keeps shrinking.

use serde::{Deserialize, Serialize};

use crate::config::{Algorithm, CodecSpec};
use crate::error::{ComplexityError, Result};

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Pre-passes
pub mod bitpack;
pub mod leb128;
pub mod rle;

/// General-purpose compressors
pub mod brotli;
pub mod bzip2;
pub mod deflate;
pub mod lzma;
pub mod zopfli;
pub mod zstd;

pub use bitpack::{minimal_bits, pack_bits, unpack_bits};

/// Upper bound on recompression passes, in case a codec never stops shrinking.
const MAX_RECOMPRESS_PASSES: usize = 64;

//==================================================================================
// 2. The Compressor Collaborator
//==================================================================================

/// A uniform `compress(bytes) -> bytes` / `decompress(bytes) -> bytes` service.
pub trait Compressor {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
    fn name(&self) -> &'static str;
}

/// Encodes one buffer with `algorithm` at an already-validated `level`.
pub fn dispatch_encode(algorithm: Algorithm, input: &[u8], level: i32) -> Result<Vec<u8>> {
    match algorithm {
        Algorithm::Deflate => deflate::encode(input, level),
        Algorithm::Bzip2 => bzip2::encode(input, level),
        Algorithm::Lzma => lzma::encode(input, level),
        Algorithm::Zstd => zstd::encode(input, level),
        Algorithm::Brotli => brotli::encode(input, level),
        Algorithm::Zopfli => zopfli::encode(input, level),
        Algorithm::DeflateBzip2 => bzip2::encode(&deflate::encode(input, level)?, level),
    }
}

pub fn dispatch_decode(algorithm: Algorithm, input: &[u8]) -> Result<Vec<u8>> {
    match algorithm {
        Algorithm::Deflate => deflate::decode(input),
        Algorithm::Bzip2 => bzip2::decode(input),
        Algorithm::Lzma => lzma::decode(input),
        Algorithm::Zstd => zstd::decode(input),
        Algorithm::Brotli => brotli::decode(input),
        Algorithm::Zopfli => zopfli::decode(input),
        Algorithm::DeflateBzip2 => deflate::decode(&bzip2::decode(input)?),
    }
}

impl Compressor for CodecSpec {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let level = self.effective_level()?;
        if self.rle {
            dispatch_encode(self.algorithm, &rle::encode(input)?, level)
        } else {
            dispatch_encode(self.algorithm, input, level)
        }
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let decoded = dispatch_decode(self.algorithm, input)?;
        if self.rle {
            rle::decode(&decoded)
        } else {
            Ok(decoded)
        }
    }

    fn name(&self) -> &'static str {
        self.algorithm.name()
    }
}

//==================================================================================
// 3. Size Measurement
//==================================================================================

/// Result of measuring a buffer through a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressedSize {
    /// Smallest size reached, in bytes.
    pub size: usize,
    /// Number of compression passes that produced `size`.
    pub passes: usize,
    /// Size after the first pass.
    pub first_pass_size: usize,
}

/// Compressed length of `input` under `spec`.
///
/// With `spec.recompress`, the output is fed back through the bare codec (no RLE) for
/// as long as each pass strictly shrinks it.
pub fn compressed_size(spec: &CodecSpec, input: &[u8]) -> Result<CompressedSize> {
    let first = spec.compress(input)?;
    let first_pass_size = first.len();
    let mut best = first;
    let mut passes = 1;

    if spec.recompress {
        let level = spec.effective_level()?;
        while passes < MAX_RECOMPRESS_PASSES {
            let next = dispatch_encode(spec.algorithm, &best, level)?;
            if next.len() >= best.len() {
                break;
            }
            best = next;
            passes += 1;
        }
    }

    log::debug!(
        "{}: {} -> {} bytes in {} pass(es)",
        spec.name(),
        input.len(),
        best.len(),
        passes
    );
    Ok(CompressedSize {
        size: best.len(),
        passes,
        first_pass_size,
    })
}

/// Round-trips `input` through `compressor` and checks the result.
pub fn verify_roundtrip(compressor: &dyn Compressor, input: &[u8]) -> Result<()> {
    let restored = compressor.decompress(&compressor.compress(input)?)?;
    if restored != input {
        return Err(ComplexityError::codec(
            compressor.name(),
            format!(
                "round trip changed the data ({} bytes in, {} bytes out)",
                input.len(),
                restored.len()
            ),
        ));
    }
    Ok(())
}

//==================================================================================
// 4. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn packed_lattice() -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(17);
        let symbols: Vec<u32> = (0..4096)
            .map(|i| if i % 64 < 40 { 0 } else { rng.random_range(0..2) })
            .collect();
        pack_bits(&symbols, 1).unwrap()
    }

    #[test]
    fn test_every_algorithm_roundtrips_packed_bits() {
        let bytes = packed_lattice();
        for algorithm in Algorithm::ALL {
            // Keep zopfli fast.
            let spec = match algorithm {
                Algorithm::Zopfli => CodecSpec::new(algorithm).with_level(2),
                _ => CodecSpec::new(algorithm),
            };
            verify_roundtrip(&spec, &bytes).unwrap();
            assert_eq!(spec.name(), algorithm.name());
        }
    }

    #[test]
    fn test_deflate_bzip2_chains_both_codecs() {
        let bytes = packed_lattice();
        let chained = dispatch_encode(Algorithm::DeflateBzip2, &bytes, 9).unwrap();
        let deflated = deflate::encode(&bytes, 9).unwrap();
        assert_eq!(chained, bzip2::encode(&deflated, 9).unwrap());
        assert_eq!(&chained[..3], b"BZh");
        assert_eq!(dispatch_decode(Algorithm::DeflateBzip2, &chained).unwrap(), bytes);
        assert_eq!("deflate+bzip2".parse::<Algorithm>().unwrap(), Algorithm::DeflateBzip2);
    }

    #[test]
    fn test_rle_prepass_roundtrips() {
        let bytes = vec![0u8; 3000];
        for algorithm in [Algorithm::Deflate, Algorithm::Zstd, Algorithm::Brotli] {
            let spec = CodecSpec {
                rle: true,
                ..CodecSpec::new(algorithm)
            };
            verify_roundtrip(&spec, &bytes).unwrap();
        }
    }

    #[test]
    fn test_compressed_size_without_recompress_is_single_pass() {
        let bytes = packed_lattice();
        let spec = CodecSpec::new(Algorithm::Deflate);
        let size = compressed_size(&spec, &bytes).unwrap();
        assert_eq!(size.passes, 1);
        assert_eq!(size.size, size.first_pass_size);
        assert_eq!(size.size, spec.compress(&bytes).unwrap().len());
    }

    #[test]
    fn test_recompress_never_grows() {
        let bytes = vec![0u8; 100_000];
        let spec = CodecSpec {
            recompress: true,
            ..CodecSpec::new(Algorithm::Deflate)
        };
        let size = compressed_size(&spec, &bytes).unwrap();
        assert!(size.passes >= 1);
        assert!(size.size <= size.first_pass_size);
    }

    #[test]
    fn test_invalid_level_is_rejected_before_compressing() {
        let spec = CodecSpec::new(Algorithm::Bzip2).with_level(0);
        assert!(matches!(
            spec.compress(b"abc"),
            Err(ComplexityError::InvalidInput(_))
        ));
    }
}

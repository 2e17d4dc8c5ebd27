//! Legacy LZMA ("alone" / `.lzma`) through `xz2` (liblzma bindings).
//!
//! The alone format has a fixed 13-byte header (properties, dictionary size, and an
//! "unknown" uncompressed size), so small inputs are not charged for an `.xz`
//! container. Encoder settings: lc=3, lp=0, pb=2, normal mode, bt4 match finder,
//! nice_len 273, and a dictionary of up to 64 MiB.

use std::io::{Read, Write};
use xz2::read::XzDecoder;
use xz2::stream::{LzmaOptions, MatchFinder, Mode, Stream};
use xz2::write::XzEncoder;

use crate::error::ComplexityError;

const NAME: &str = "lzma";

const MAX_DICT_SIZE: u32 = 64 << 20;
const MIN_DICT_SIZE: u32 = 4096;

//==================================================================================
// 1. Encoder Settings
//==================================================================================

/// A dictionary larger than the input compresses no better, so it is clamped to the
/// input size rounded up to a power of two.
fn dict_size_for(len: usize) -> u32 {
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    len.checked_next_power_of_two()
        .unwrap_or(MAX_DICT_SIZE)
        .clamp(MIN_DICT_SIZE, MAX_DICT_SIZE)
}

fn encoder_options(level: i32, input_len: usize) -> Result<LzmaOptions, ComplexityError> {
    let preset = u32::try_from(level).map_err(|e| ComplexityError::codec(NAME, e))?;
    let mut options = LzmaOptions::new_preset(preset).map_err(|e| ComplexityError::codec(NAME, e))?;
    options
        .dict_size(dict_size_for(input_len))
        .literal_context_bits(3)
        .literal_position_bits(0)
        .position_bits(2)
        .mode(Mode::Normal)
        .match_finder(MatchFinder::BinaryTree4)
        .nice_len(273)
        .depth(0);
    Ok(options)
}

//==================================================================================
// 2. Public API
//==================================================================================

/// `level` is the liblzma preset, `0..=9`.
pub fn encode(input: &[u8], level: i32) -> Result<Vec<u8>, ComplexityError> {
    let stream = Stream::new_lzma_encoder(&encoder_options(level, input.len())?)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    let mut encoder = XzEncoder::new_stream(Vec::new(), stream);
    encoder
        .write_all(input)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    encoder.finish().map_err(|e| ComplexityError::codec(NAME, e))
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>, ComplexityError> {
    let stream = Stream::new_lzma_decoder(u64::MAX).map_err(|e| ComplexityError::codec(NAME, e))?;
    let mut output = Vec::new();
    XzDecoder::new_stream(input, stream)
        .read_to_end(&mut output)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    Ok(output)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

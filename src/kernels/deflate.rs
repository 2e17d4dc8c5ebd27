//! Raw DEFLATE (no zlib or gzip framing) through `flate2`.
//!
//! The raw stream is what a `wbits = -15` zlib compressor produces, so the byte count
//! measures the coded data alone, without a container header or checksum.

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::error::ComplexityError;

const NAME: &str = "deflate";

//==================================================================================
// 1. Public API
//==================================================================================

pub fn encode(input: &[u8], level: i32) -> Result<Vec<u8>, ComplexityError> {
    let level = u32::try_from(level).map_err(|e| ComplexityError::codec(NAME, e))?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(input)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    encoder.finish().map_err(|e| ComplexityError::codec(NAME, e))
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>, ComplexityError> {
    let mut output = Vec::new();
    DeflateDecoder::new(input)
        .read_to_end(&mut output)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    Ok(output)
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

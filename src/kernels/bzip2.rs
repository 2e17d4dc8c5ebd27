//! bzip2 through the `bzip2` crate (libbz2 bindings).

use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::io::{Read, Write};

use crate::error::ComplexityError;

const NAME: &str = "bzip2";

//==================================================================================
// 1. Public API
//==================================================================================

/// `level` is the block size in units of 100k, `1..=9`.
pub fn encode(input: &[u8], level: i32) -> Result<Vec<u8>, ComplexityError> {
    let level = u32::try_from(level).map_err(|e| ComplexityError::codec(NAME, e))?;
    let mut encoder = BzEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(input)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    encoder.finish().map_err(|e| ComplexityError::codec(NAME, e))
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>, ComplexityError> {
    let mut output = Vec::new();
    BzDecoder::new(input)
        .read_to_end(&mut output)
        .map_err(|e| ComplexityError::codec(NAME, e))?;
    Ok(output)
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

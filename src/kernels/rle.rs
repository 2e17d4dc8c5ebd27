//! Byte-level Run-Length Encoding, used as an optional pre-pass before a compressor.
//!
//! The format is a sequence of `(byte, run_length)` pairs, where `run_length` is
//! LEB128-encoded. Packed binary lattices with large uniform regions collapse to a few
//! pairs, which some dictionary coders then compress further.

use std::io::Cursor;

use super::leb128;
use crate::error::ComplexityError;

//==================================================================================
// 1. Public API
//==================================================================================

pub fn encode(input: &[u8]) -> Result<Vec<u8>, ComplexityError> {
    let mut output = Vec::new();
    let Some((&first, rest)) = input.split_first() else {
        return Ok(output);
    };

    let mut current = first;
    let mut run: u64 = 1;
    for &byte in rest {
        if byte == current {
            run += 1;
        } else {
            output.push(current);
            leb128::encode_one(run, &mut output)?;
            current = byte;
            run = 1;
        }
    }
    output.push(current);
    leb128::encode_one(run, &mut output)?;

    Ok(output)
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>, ComplexityError> {
    let mut output = Vec::with_capacity(input.len());
    let mut cursor = Cursor::new(input);

    while (cursor.position() as usize) < input.len() {
        let pos = cursor.position() as usize;
        let value = input[pos];
        cursor.set_position((pos + 1) as u64);

        let run = leb128::decode_one::<u64>(&mut cursor)?;
        if run == 0 {
            return Err(ComplexityError::RleDecodeError(format!(
                "zero-length run at byte offset {}",
                pos
            )));
        }
        let run = usize::try_from(run).map_err(|_| {
            ComplexityError::RleDecodeError(format!("run length {} does not fit in memory", run))
        })?;
        output.resize(output.len() + run, value);
    }

    Ok(output)
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rle_roundtrip_mixed_runs() {
        let original = vec![5u8, 5, 5, 5, 8, 8, 8, 2, 9, 9, 9, 9, 9];
        let encoded = encode(&original).unwrap();
        assert_eq!(encoded, vec![5, 4, 8, 3, 2, 1, 9, 5]);
        assert_eq!(decode(&encoded).unwrap(), original);
    }

    #[test]
    fn test_rle_long_run() {
        let original = vec![42u8; 1000];
        let encoded = encode(&original).unwrap();
        // 1000 = 0b111_1101000 -> two LEB128 bytes.
        assert_eq!(encoded, vec![42, 0xE8, 0x07]);
        assert_eq!(decode(&encoded).unwrap(), original);
    }

    #[test]
    fn test_rle_decode_corrupt_buffer_error() {
        let corrupt = vec![42u8, 0b1000_0001];
        let err = decode(&corrupt).unwrap_err();
        assert!(err.to_string().contains("Unexpected end of buffer"));
        assert!(matches!(
            decode(&[7, 0]),
            Err(ComplexityError::RleDecodeError(_))
        ));
    }

    #[test]
    fn test_empty_roundtrip() {
        assert!(encode(&[]).unwrap().is_empty());
        assert!(decode(&[]).unwrap().is_empty());
    }
}

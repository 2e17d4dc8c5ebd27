//! LEB128 (Little-Endian Base 128) variable-length unsigned integers.
//!
//! Used for the run lengths of the RLE pre-pass: most runs are short, so most lengths
//! cost a single byte. Panic-free on malformed input.

use num_traits::{PrimInt, Unsigned};
use std::io::Cursor;

use crate::error::ComplexityError;

//==================================================================================
// 1. Single-Value Operations
//==================================================================================

/// Appends the LEB128 encoding of `value` to `buffer`.
pub fn encode_one<T>(value: T, buffer: &mut Vec<u8>) -> Result<(), ComplexityError>
where
    T: PrimInt + Unsigned,
{
    let zero = T::zero();
    let low_bits = T::from(0x7F).ok_or_else(|| {
        ComplexityError::Leb128DecodeError("7-bit mask does not fit the integer type".to_string())
    })?;

    let mut current = value;
    loop {
        let payload = (current & low_bits).to_u8().ok_or_else(|| {
            ComplexityError::Leb128DecodeError("payload does not fit in a byte".to_string())
        })?;
        current = current >> 7;
        if current == zero {
            buffer.push(payload);
            return Ok(());
        }
        buffer.push(payload | 0x80);
    }
}

/// Reads one LEB128 integer starting at the cursor position.
pub fn decode_one<T>(cursor: &mut Cursor<&[u8]>) -> Result<T, ComplexityError>
where
    T: PrimInt + Unsigned,
{
    let mut result = T::zero();
    let mut shift = 0usize;
    let total_bits = std::mem::size_of::<T>() * 8;

    loop {
        let pos = cursor.position() as usize;
        let byte = *cursor.get_ref().get(pos).ok_or_else(|| {
            ComplexityError::Leb128DecodeError("Unexpected end of buffer".to_string())
        })?;
        cursor.set_position((pos + 1) as u64);

        if shift >= total_bits {
            return Err(ComplexityError::Leb128DecodeError(
                "Integer overflow during decoding".to_string(),
            ));
        }
        let payload = T::from(byte & 0x7F).ok_or_else(|| {
            ComplexityError::Leb128DecodeError("payload does not fit the integer type".to_string())
        })?;
        result = result | (payload << shift);

        if byte & 0x80 == 0 {
            // The last group must not carry bits beyond the type width.
            if shift + 7 > total_bits && (byte & 0x7F) >> (total_bits - shift) != 0 {
                return Err(ComplexityError::Leb128DecodeError(
                    "Integer overflow during decoding".to_string(),
                ));
            }
            return Ok(result);
        }
        shift += 7;
    }
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: u64) -> (Vec<u8>, u64) {
        let mut buf = Vec::new();
        encode_one(value, &mut buf).unwrap();
        let decoded = decode_one::<u64>(&mut Cursor::new(buf.as_slice())).unwrap();
        (buf, decoded)
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(roundtrip(0).0, vec![0x00]);
        assert_eq!(roundtrip(127).0, vec![0x7F]);
        assert_eq!(roundtrip(128).0, vec![0x80, 0x01]);
        assert_eq!(roundtrip(624_485).0, vec![0xE5, 0x8E, 0x26]);
    }

    #[test]
    fn test_roundtrip_extremes() {
        for v in [1u64, 300, 1 << 35, u64::MAX] {
            assert_eq!(roundtrip(v).1, v);
        }
    }

    #[test]
    fn test_truncated_buffer() {
        let bytes = [0x80u8, 0x80];
        let err = decode_one::<u64>(&mut Cursor::new(&bytes[..])).unwrap_err();
        assert!(err.to_string().contains("Unexpected end of buffer"));
    }

    #[test]
    fn test_decode_overflow_error() {
        // Ten groups whose final byte sets bits above bit 63.
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        let err = decode_one::<u64>(&mut Cursor::new(&bytes[..])).unwrap_err();
        assert!(matches!(err, ComplexityError::Leb128DecodeError(msg) if msg.contains("overflow")));
    }
}

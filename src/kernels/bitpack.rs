//! Minimal fixed-width packing of symbol sequences into bytes.
//!
//! Symbols are written most-significant bit first, back to back, and the final byte is
//! zero-padded. This is the byte image handed to the general-purpose compressors: a
//! binary lattice of `n` cells becomes `ceil(n / 8)` bytes instead of `4n`.

use bitvec::prelude::*;

use crate::error::ComplexityError;

const MAX_BIT_WIDTH: u8 = 32;

/// The fewest bits that can represent every symbol of `0..alphabet_size`.
pub fn minimal_bits(alphabet_size: u32) -> u8 {
    if alphabet_size <= 2 {
        return 1;
    }
    (32 - (alphabet_size - 1).leading_zeros()) as u8
}

//==================================================================================
// 1. Core Logic
//==================================================================================

fn check_width(bit_width: u8) -> Result<(), ComplexityError> {
    if bit_width == 0 || bit_width > MAX_BIT_WIDTH {
        return Err(ComplexityError::InvalidInput(format!(
            "bit width must lie in [1, {}], got {}",
            MAX_BIT_WIDTH, bit_width
        )));
    }
    Ok(())
}

fn encode_slice(symbols: &[u32], bit_width: u8) -> Result<BitVec<u8, Msb0>, ComplexityError> {
    check_width(bit_width)?;
    let width = bit_width as usize;
    let max_val = if bit_width == 32 { u32::MAX } else { (1u32 << bit_width) - 1 };

    let mut bits = BitVec::<u8, Msb0>::with_capacity(symbols.len() * width);
    for &sym in symbols {
        if sym > max_val {
            return Err(ComplexityError::BitpackEncodeError(sym as u64, bit_width));
        }
        bits.extend_from_bitslice(&sym.view_bits::<Msb0>()[32 - width..]);
    }
    Ok(bits)
}

fn decode_slice(
    bits: &BitSlice<u8, Msb0>,
    bit_width: u8,
    count: usize,
) -> Result<Vec<u32>, ComplexityError> {
    check_width(bit_width)?;
    let width = bit_width as usize;
    let needed = count
        .checked_mul(width)
        .ok_or(ComplexityError::BitpackDecodeError)?;
    if bits.len() < needed {
        return Err(ComplexityError::BitpackDecodeError);
    }

    let decoded = bits[..needed]
        .chunks(width)
        .map(|chunk| {
            chunk
                .iter()
                .by_vals()
                .fold(0u32, |acc, bit| (acc << 1) | bit as u32)
        })
        .collect();
    Ok(decoded)
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Packs `symbols` at `bit_width` bits each.
///
/// Fails with `BitpackEncodeError` if any symbol needs more than `bit_width` bits.
pub fn pack_bits(symbols: &[u32], bit_width: u8) -> Result<Vec<u8>, ComplexityError> {
    let mut bits = encode_slice(symbols, bit_width)?;
    bits.set_uninitialized(false);
    Ok(bits.into_vec())
}

/// Reads `count` symbols of `bit_width` bits back out of `bytes`.
pub fn unpack_bits(bytes: &[u8], bit_width: u8, count: usize) -> Result<Vec<u32>, ComplexityError> {
    decode_slice(BitSlice::<u8, Msb0>::from_slice(bytes), bit_width, count)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_bits() {
        assert_eq!(minimal_bits(2), 1);
        assert_eq!(minimal_bits(3), 2);
        assert_eq!(minimal_bits(4), 2);
        assert_eq!(minimal_bits(5), 3);
        assert_eq!(minimal_bits(256), 8);
        assert_eq!(minimal_bits(257), 9);
        assert_eq!(minimal_bits(u32::MAX), 32);
    }

    #[test]
    fn test_binary_packing_is_msb_first() {
        let bytes = pack_bits(&[1, 0, 1, 1, 0, 0, 0, 1, 1, 1], 1).unwrap();
        assert_eq!(bytes, vec![0b1011_0001, 0b1100_0000]);
    }

    #[test]
    fn test_three_bit_roundtrip() {
        let original = vec![5u32, 6, 7, 1, 0, 3];
        let bytes = pack_bits(&original, 3).unwrap();
        assert_eq!(bytes.len(), 3); // 18 bits
        assert_eq!(unpack_bits(&bytes, 3, original.len()).unwrap(), original);
    }

    #[test]
    fn test_full_width_roundtrip() {
        let original = vec![u32::MAX, 0, 123_456_789];
        let bytes = pack_bits(&original, 32).unwrap();
        assert_eq!(bytes[..4], [0xFF; 4]);
        assert_eq!(unpack_bits(&bytes, 32, 3).unwrap(), original);
    }

    #[test]
    fn test_value_exceeds_bit_width_error() {
        let err = pack_bits(&[1, 2, 3, 8], 3).unwrap_err();
        assert!(matches!(err, ComplexityError::BitpackEncodeError(8, 3)));
    }

    #[test]
    fn test_truncated_buffer_error() {
        let mut bytes = pack_bits(&[10, 20, 30], 5).unwrap();
        bytes.pop();
        assert!(matches!(
            unpack_bits(&bytes, 5, 3),
            Err(ComplexityError::BitpackDecodeError)
        ));
    }

    #[test]
    fn test_zero_width_is_invalid() {
        assert!(pack_bits(&[0], 0).is_err());
        assert!(unpack_bits(&[0], 33, 1).is_err());
    }
}

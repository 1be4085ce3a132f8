//! # Bit Packing
//!
//! Bits are stored one per `u8` (always `0` or `1`), most-significant bit of
//! each byte first, matching the order in which they land in the carrier.

use super::error::{Result, StegoError};

/// Expand each byte into 8 bits, MSB first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Pack MSB-first bits back into bytes.
///
/// # Errors
/// - [`StegoError::MalformedBitstream`] if `bits.len()` is not a multiple of 8
pub fn bits_to_bytes(bits: &[u8]) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(StegoError::MalformedBitstream { len: bits.len() });
    }

    Ok(bits
        .chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, bit| (acc << 1) | (bit & 1)))
        .collect())
}

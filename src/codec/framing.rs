//! # Payload Framing
//!
//! The extractor always reads every channel of the carrier, so the payload
//! needs a way to say where it ends. Two framings are supported:
//!
//! - [`FramingMode::Terminator`]: the ciphertext bits are followed by the
//!   16-bit marker `1111111111111110`. This is the format written by the
//!   original desktop tool. The first occurrence of the marker wins, so a
//!   ciphertext that happens to contain it is cut short on decode.
//! - [`FramingMode::LengthPrefixed`]: a 32-bit big-endian byte count precedes
//!   the ciphertext bits. Unambiguous, but not readable by the older tool.
//!
//! Carriers do not record which mode wrote them; decode must be told.

use serde::{Deserialize, Serialize};

use super::bits::bytes_to_bits;
use super::error::{Result, StegoError};

/// End-of-payload marker: fifteen ones and a zero.
pub const TERMINATOR: [u8; 16] = [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0];

/// Width of the length header in [`FramingMode::LengthPrefixed`].
pub const LENGTH_HEADER_BITS: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FramingMode {
    #[default]
    Terminator,
    LengthPrefixed,
}

impl FramingMode {
    /// Bits this framing adds on top of the ciphertext.
    pub fn overhead_bits(self) -> usize {
        match self {
            FramingMode::Terminator => TERMINATOR.len(),
            FramingMode::LengthPrefixed => LENGTH_HEADER_BITS,
        }
    }

    /// Wrap whole-byte payload bits for embedding.
    pub fn frame(self, bits: &[u8]) -> Result<Vec<u8>> {
        match self {
            FramingMode::Terminator => Ok(append_terminator(bits)),
            FramingMode::LengthPrefixed => prepend_length(bits),
        }
    }

    /// Recover the payload bits from a full carrier-length bit sequence.
    pub fn unframe(self, bits: &[u8]) -> Result<&[u8]> {
        match self {
            FramingMode::Terminator => locate_terminator(bits),
            FramingMode::LengthPrefixed => read_length_prefixed(bits),
        }
    }
}

pub fn append_terminator(bits: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(bits.len() + TERMINATOR.len());
    framed.extend_from_slice(bits);
    framed.extend_from_slice(&TERMINATOR);
    framed
}

/// Return everything before the first terminator, at any bit offset.
///
/// # Errors
/// - [`StegoError::TerminatorNotFound`] if the marker never occurs
pub fn locate_terminator(bits: &[u8]) -> Result<&[u8]> {
    bits.windows(TERMINATOR.len())
        .position(|window| window == TERMINATOR)
        .map(|end| &bits[..end])
        .ok_or(StegoError::TerminatorNotFound)
}

/// Prefix whole-byte payload bits with their byte count (u32, big-endian).
///
/// # Errors
/// - [`StegoError::MalformedBitstream`] if `bits` is not whole bytes
/// - [`StegoError::CapacityExceeded`] if the byte count does not fit the header
pub fn prepend_length(bits: &[u8]) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(StegoError::MalformedBitstream { len: bits.len() });
    }
    let byte_len = u32::try_from(bits.len() / 8).map_err(|_| StegoError::CapacityExceeded {
        required: bits.len() + LENGTH_HEADER_BITS,
        available: u32::MAX as usize * 8 + LENGTH_HEADER_BITS,
    })?;

    let mut framed = Vec::with_capacity(bits.len() + LENGTH_HEADER_BITS);
    framed.extend(bytes_to_bits(&byte_len.to_be_bytes()));
    framed.extend_from_slice(bits);
    Ok(framed)
}

/// Read the length header and return exactly that many payload bytes' bits.
///
/// # Errors
/// - [`StegoError::TruncatedPayload`] if the header or the payload it
///   declares runs past the end of `bits`
pub fn read_length_prefixed(bits: &[u8]) -> Result<&[u8]> {
    if bits.len() < LENGTH_HEADER_BITS {
        return Err(StegoError::TruncatedPayload {
            declared: LENGTH_HEADER_BITS,
            available: bits.len(),
        });
    }

    let (header, rest) = bits.split_at(LENGTH_HEADER_BITS);
    let byte_len = header.iter().fold(0u32, |acc, bit| (acc << 1) | u32::from(bit & 1));
    let declared = (byte_len as usize).saturating_mul(8);

    if declared > rest.len() {
        return Err(StegoError::TruncatedPayload {
            declared,
            available: rest.len(),
        });
    }
    Ok(&rest[..declared])
}

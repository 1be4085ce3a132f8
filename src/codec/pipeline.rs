//! # Encode and Decode Pipelines
//!
//! ```text
//! encode: validate -> XOR -> bytes_to_bits -> frame -> capacity check -> embed
//! decode: extract -> unframe -> bits_to_bytes -> XOR
//! ```
//!
//! Any failing step aborts the whole call. The carrier is only written once
//! every check has passed.

use log::debug;

use super::bits::{bits_to_bytes, bytes_to_bits};
use super::channels::PixelChannelStream;
use super::cipher;
use super::error::{Result, StegoError};
use super::framing::FramingMode;
use super::lsb::{self, Parallelism, ProgressFn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    pub framing: FramingMode,
    pub parallelism: Parallelism,
}

/// Hide `message` in `stream`, XORed with `password`.
///
/// # Errors
/// - [`StegoError::InvalidKey`] if `password` is empty
/// - [`StegoError::EmptyMessage`] if `message` is empty
/// - [`StegoError::CapacityExceeded`] if the framed payload does not fit; the
///   stream is left unmodified
pub fn hide(
    stream: &mut PixelChannelStream,
    password: &[u8],
    message: &[u8],
    options: &CodecOptions,
    progress: ProgressFn,
) -> Result<()> {
    if password.is_empty() {
        return Err(StegoError::InvalidKey);
    }
    if message.is_empty() {
        return Err(StegoError::EmptyMessage);
    }

    let ciphertext = cipher::transform(message, password)?;
    let payload = options.framing.frame(&bytes_to_bits(&ciphertext))?;

    debug!(
        "Framed {} message bytes into {} bits ({:?}), carrier holds {} bits",
        message.len(),
        payload.len(),
        options.framing,
        stream.len()
    );

    lsb::embed(stream, &payload, options.parallelism, progress)
}

/// Recover the message bytes hidden in `stream`.
///
/// A wrong password is not detected here; it yields different bytes of the
/// same length.
///
/// # Errors
/// - [`StegoError::InvalidKey`] if `password` is empty
/// - [`StegoError::TerminatorNotFound`] / [`StegoError::TruncatedPayload`] if
///   no payload framed with `options.framing` is present. An empty payload
///   (terminator at bit 0, or a zero length header) counts as absent, since
///   [`hide`] never writes one.
/// - [`StegoError::MalformedBitstream`] if the payload is not whole bytes
pub fn reveal(
    stream: &PixelChannelStream,
    password: &[u8],
    options: &CodecOptions,
    progress: ProgressFn,
) -> Result<Vec<u8>> {
    if password.is_empty() {
        return Err(StegoError::InvalidKey);
    }

    let carrier_bits = lsb::extract(stream, options.parallelism, progress);
    let payload = options.framing.unframe(&carrier_bits)?;
    if payload.is_empty() {
        return Err(StegoError::TerminatorNotFound);
    }
    debug!("Located {} payload bits in {} carrier bits", payload.len(), carrier_bits.len());

    let ciphertext = bits_to_bytes(payload)?;
    cipher::transform(&ciphertext, password)
}

/// Text front-end of [`hide`]: the message is UTF-8 encoded first.
pub fn encode_text(
    stream: &mut PixelChannelStream,
    password: &str,
    message: &str,
    options: &CodecOptions,
    progress: ProgressFn,
) -> Result<()> {
    hide(stream, password.as_bytes(), message.as_bytes(), options, progress)
}

/// Text front-end of [`reveal`].
///
/// # Errors
/// Everything [`reveal`] returns, plus [`StegoError::InvalidUtf8`], which is
/// what a wrong password usually looks like.
pub fn decode_text(
    stream: &PixelChannelStream,
    password: &str,
    options: &CodecOptions,
    progress: ProgressFn,
) -> Result<String> {
    let bytes = reveal(stream, password.as_bytes(), options, progress)?;
    String::from_utf8(bytes).map_err(|_| StegoError::InvalidUtf8)
}

/// Largest message, in bytes, that fits a carrier with `channels` channel
/// values under `framing`.
pub fn capacity_bytes(channels: usize, framing: FramingMode) -> usize {
    channels.saturating_sub(framing.overhead_bits()) / 8
}

//! # XOR Keystream Cipher
//!
//! The keystream byte at position `i` is `key[i % key.len()]`. XOR is its own
//! inverse, so [`transform`] both hides and reveals a message.
//!
//! This is obfuscation, not encryption: a repeating key falls to frequency
//! analysis, and a wrong key cannot be told apart from a right one here.

use super::error::{Result, StegoError};

/// XOR `bytes` against the cycling `key`.
///
/// # Errors
/// - [`StegoError::InvalidKey`] if `key` is empty
pub fn transform(bytes: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(StegoError::InvalidKey);
    }

    Ok(bytes
        .iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect())
}

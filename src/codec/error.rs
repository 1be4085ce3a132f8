//! # Codec Errors
//!
//! Every failure the codec can produce. All of them are deterministic for a
//! given input, so none are worth retrying.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The password is empty, so there is no keystream to XOR with.
    #[error("password must not be empty")]
    InvalidKey,
    #[error("message must not be empty")]
    EmptyMessage,
    /// The framed payload needs more channel bits than the carrier has.
    #[error("image too small for this message: need {required} bits but only {available} bits available")]
    CapacityExceeded { required: usize, available: usize },
    /// A recovered bit sequence does not split into whole bytes.
    #[error("malformed bitstream: {len} bits is not a whole number of bytes")]
    MalformedBitstream { len: usize },
    /// No non-empty payload could be located under the chosen framing.
    #[error("no hidden message found")]
    TerminatorNotFound,
    /// A length header points past the end of the carrier.
    #[error("hidden message header declares {declared} bits but only {available} bits follow it")]
    TruncatedPayload { declared: usize, available: usize },
    #[error("recovered message is not valid UTF-8 (wrong password?)")]
    InvalidUtf8,
}

pub type Result<T> = std::result::Result<T, StegoError>;

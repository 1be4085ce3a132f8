//! # Steganographic Codec
//!
//! Pure, in-memory LSB codec. No I/O and no global state; image loading and
//! saving live in [`crate::processing`].
//!
//! ## Modules
//!
//! - [`cipher`]: XOR keystream over the password bytes
//! - [`bits`]: byte ↔ bit conversion, MSB first
//! - [`framing`]: terminator and length-prefixed payload framing
//! - [`channels`]: flat R,G,B channel view of a carrier image
//! - [`lsb`]: embedding into and extraction from channel LSBs
//! - [`pipeline`]: the full encode and decode chains

pub mod bits;
pub mod channels;
pub mod cipher;
pub mod error;
pub mod framing;
pub mod lsb;
pub mod pipeline;

pub use channels::PixelChannelStream;
pub use error::StegoError;
pub use framing::FramingMode;
pub use lsb::{Parallelism, Progress, ProgressFn};
pub use pipeline::{capacity_bytes, decode_text, encode_text, hide, reveal, CodecOptions};

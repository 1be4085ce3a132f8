//! # Image Processing and Steganography
//!
//! Loads carrier images, runs the [`codec`](crate::codec) over them and writes
//! the result back out in a lossless format.

pub mod steganography;

// Re-export main functions for convenience
pub use steganography::{
    carrier_capacity, embed_text, embed_text_bytes, extract_text, extract_text_bytes, CarrierCapacity,
    CarrierError, CarrierFormat,
};

//! # Carrier Image I/O
//!
//! Glue between encoded image files and the in-memory [`codec`](crate::codec).
//!
//! ## Encoding Process
//! 1. Decode the carrier (any format the `image` crate reads)
//! 2. Normalise to 8-bit RGB, dropping alpha
//! 3. Hide the password-XORed message in the channel LSBs
//! 4. Re-encode in a lossless format (PNG by default)
//!
//! ## Decoding Process
//! 1. Decode the carrier and normalise to 8-bit RGB
//! 2. Read every channel LSB and cut the payload out of it
//! 3. XOR with the password and decode as UTF-8
//!
//! ### Capacity
//! A carrier holds `(width * height * 3 - overhead) / 8` message bytes, where
//! the overhead is 16 bits (terminator) or 32 bits (length header).
//!
//! Example: an 800x600 image can store ~180 KB of text.

use anyhow::{bail, Context, Result};
use image::ImageFormat;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

use crate::codec::{self, CodecOptions, FramingMode, PixelChannelStream, ProgressFn};

/// Image codec failures, split by which side of the codec they happened on.
///
/// `Decode` means the uploaded carrier was unreadable; `Encode` means the
/// modified carrier could not be written back out.
#[derive(Error, Debug)]
pub enum CarrierError {
    #[error("Failed to decode carrier image")]
    Decode(#[source] image::ImageError),
    #[error("Failed to encode carrier image")]
    Encode(#[source] image::ImageError),
}

/// Lossless formats a carrier may be written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierFormat {
    #[default]
    Png,
    Bmp,
    Tiff,
}

impl CarrierFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            CarrierFormat::Png => ImageFormat::Png,
            CarrierFormat::Bmp => ImageFormat::Bmp,
            CarrierFormat::Tiff => ImageFormat::Tiff,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            CarrierFormat::Png => "png",
            CarrierFormat::Bmp => "bmp",
            CarrierFormat::Tiff => "tiff",
        }
    }

    /// Pick the format from an output path's extension.
    ///
    /// Returns `Ok(None)` when the extension is missing or unknown.
    ///
    /// # Errors
    /// If the extension names a format other than PNG, BMP or TIFF. Lossy
    /// formats (JPEG, WebP, GIF, AVIF) get a message saying so.
    pub fn from_path(path: &Path) -> Result<Option<Self>> {
        let Ok(format) = ImageFormat::from_path(path) else {
            return Ok(None);
        };
        match format {
            ImageFormat::Png => Ok(Some(CarrierFormat::Png)),
            ImageFormat::Bmp => Ok(Some(CarrierFormat::Bmp)),
            ImageFormat::Tiff => Ok(Some(CarrierFormat::Tiff)),
            lossy @ (ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Gif | ImageFormat::Avif) => bail!(
                "{} cannot hold a hidden message: {:?} does not preserve exact pixel values (use .png, .bmp or .tiff)",
                path.display(),
                lossy
            ),
            other => bail!(
                "{}: unsupported carrier output format {:?} (use .png, .bmp or .tiff)",
                path.display(),
                other
            ),
        }
    }
}

/// How much a carrier can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarrierCapacity {
    pub width: u32,
    pub height: u32,
    /// One bit per R, G and B channel
    pub channel_bits: usize,
    /// Longest message (UTF-8 bytes) that fits under the chosen framing
    pub message_bytes: usize,
}

fn load_carrier(image_bytes: &[u8]) -> Result<PixelChannelStream> {
    if let Ok(ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Gif) = image::guess_format(image_bytes) {
        warn!("⚠️  Carrier is in a lossy or palette format; any hidden bits it once held are likely gone");
    }
    let img = image::load_from_memory(image_bytes).map_err(CarrierError::Decode)?;
    debug!("Loaded {}x{} carrier ({:?})", img.width(), img.height(), img.color());
    Ok(PixelChannelStream::from_dynamic(img))
}

/// Embed text into an image and return the modified carrier, encoded.
///
/// # Arguments
/// - `image_bytes`: Raw bytes of the input image
/// - `password`: Key for the XOR keystream (non-empty)
/// - `text`: UTF-8 text to hide (non-empty)
/// - `format`: Lossless output encoding
///
/// # Errors
/// - Any [`StegoError`](crate::codec::StegoError) from the codec (recover it
///   with `downcast_ref`)
/// - The input cannot be decoded or the output cannot be encoded
///
/// # Example
/// ```ignore
/// let image_data = std::fs::read("input.jpg")?;
/// let carrier = embed_text_bytes(&image_data, "key", "Secret message", &options, CarrierFormat::Png, None)?;
/// std::fs::write("output.png", carrier)?;
/// ```
pub fn embed_text_bytes(
    image_bytes: &[u8],
    password: &str,
    text: &str,
    options: &CodecOptions,
    format: CarrierFormat,
    progress: ProgressFn,
) -> Result<Vec<u8>> {
    let mut stream = load_carrier(image_bytes)?;
    codec::encode_text(&mut stream, password, text, options, progress)?;

    let mut output_bytes = Vec::new();
    stream
        .into_image()
        .write_to(&mut Cursor::new(&mut output_bytes), format.image_format())
        .map_err(CarrierError::Encode)?;

    Ok(output_bytes)
}

/// Extract text hidden by [`embed_text_bytes`] with the same password and
/// framing.
///
/// # Example
/// ```ignore
/// let carrier = std::fs::read("output.png")?;
/// let secret_text = extract_text_bytes(&carrier, "key", &options, None)?;
/// ```
pub fn extract_text_bytes(
    image_bytes: &[u8],
    password: &str,
    options: &CodecOptions,
    progress: ProgressFn,
) -> Result<String> {
    let stream = load_carrier(image_bytes)?;
    Ok(codec::decode_text(&stream, password, options, progress)?)
}

/// File-based [`embed_text_bytes`]. The output format follows the output
/// path's extension, or `fallback` when it has none.
pub fn embed_text(
    image_path: &Path,
    password: &str,
    text: &str,
    output_path: &Path,
    options: &CodecOptions,
    fallback: CarrierFormat,
    progress: ProgressFn,
) -> Result<()> {
    // Reject lossy outputs before doing any work.
    let format = CarrierFormat::from_path(output_path)?.unwrap_or(fallback);

    let image_bytes = std::fs::read(image_path)
        .with_context(|| format!("Failed to read {}", image_path.display()))?;
    let carrier = embed_text_bytes(&image_bytes, password, text, options, format, progress)?;

    std::fs::write(output_path, carrier)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    Ok(())
}

/// File-based [`extract_text_bytes`].
pub fn extract_text(
    image_path: &Path,
    password: &str,
    options: &CodecOptions,
    progress: ProgressFn,
) -> Result<String> {
    let image_bytes = std::fs::read(image_path)
        .with_context(|| format!("Failed to read {}", image_path.display()))?;
    extract_text_bytes(&image_bytes, password, options, progress)
}

/// Report how much text an encoded image can carry.
pub fn carrier_capacity(image_bytes: &[u8], framing: FramingMode) -> Result<CarrierCapacity> {
    let img = image::load_from_memory(image_bytes).map_err(CarrierError::Decode)?;
    let (width, height) = (img.width(), img.height());
    let channel_bits = width as usize * height as usize * 3;

    Ok(CarrierCapacity {
        width,
        height,
        channel_bits,
        message_bytes: codec::capacity_bytes(channel_bits, framing),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::StegoError;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn rgba_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8 * 7, y as u8 * 5, 99, 128]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_png_round_trip_drops_alpha() {
        let options = CodecOptions::default();
        let carrier =
            embed_text_bytes(&rgba_png(20, 20), "key", "hello there", &options, CarrierFormat::Png, None).unwrap();

        let decoded = image::load_from_memory(&carrier).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
        assert_eq!(extract_text_bytes(&carrier, "key", &options, None).unwrap(), "hello there");
    }

    #[test]
    fn test_bmp_output_round_trips() {
        let options = CodecOptions::default();
        let carrier = embed_text_bytes(&rgba_png(12, 12), "k", "bmp", &options, CarrierFormat::Bmp, None).unwrap();

        assert_eq!(image::guess_format(&carrier).unwrap(), ImageFormat::Bmp);
        assert_eq!(extract_text_bytes(&carrier, "k", &options, None).unwrap(), "bmp");
    }

    #[test]
    fn test_codec_errors_survive_anyhow() {
        let err = embed_text_bytes(&rgba_png(2, 2), "key", "too long", &CodecOptions::default(), CarrierFormat::Png, None)
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<StegoError>(),
            Some(&StegoError::CapacityExceeded { required: 80, available: 12 })
        );
    }

    #[test]
    fn test_lossy_output_extension_rejected() {
        let err = CarrierFormat::from_path(Path::new("out.jpg")).unwrap_err();
        assert!(err.to_string().contains("does not preserve exact pixel values"));
        assert!(CarrierFormat::from_path(Path::new("out.webp")).is_err());

        // Lossless but unsupported formats are not called lossy.
        let err = CarrierFormat::from_path(Path::new("out.tga")).unwrap_err().to_string();
        assert!(err.contains("unsupported carrier output format"));
        assert!(!err.contains("pixel values"));

        assert_eq!(CarrierFormat::from_path(Path::new("out.PNG")).unwrap(), Some(CarrierFormat::Png));
        assert_eq!(CarrierFormat::from_path(Path::new("out.tif")).unwrap(), Some(CarrierFormat::Tiff));
        assert_eq!(CarrierFormat::from_path(Path::new("out")).unwrap(), None);
    }

    #[test]
    fn test_capacity_report() {
        let capacity = carrier_capacity(&rgba_png(10, 10), FramingMode::Terminator).unwrap();
        assert_eq!(capacity.channel_bits, 300);
        assert_eq!(capacity.message_bytes, 35);
    }

    #[test]
    fn test_garbage_input_is_a_decode_error() {
        let err = extract_text_bytes(b"not an image", "key", &CodecOptions::default(), None).unwrap_err();
        assert!(matches!(err.downcast_ref::<CarrierError>(), Some(CarrierError::Decode(_))));

        let err = carrier_capacity(b"still not an image", FramingMode::Terminator).unwrap_err();
        assert!(matches!(err.downcast_ref::<CarrierError>(), Some(CarrierError::Decode(_))));
    }
}

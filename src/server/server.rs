//! # Stego Service
//!
//! Async front door to the codec for the web server. The codec is CPU-bound,
//! so every call runs on tokio's blocking pool and the async runtime keeps
//! serving other requests meanwhile.

use anyhow::Result;
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::common::config::StegoConfig;
use crate::processing::{steganography, CarrierCapacity, CarrierFormat};

/// Runs encode, decode and capacity requests off the async runtime.
///
/// Cheap to share: wrap it in an `Arc` and hand it to every handler.
pub struct StegoService {
    config: Arc<StegoConfig>,
    next_request_id: AtomicU64,
}

impl StegoService {
    pub fn new(config: StegoConfig) -> Self {
        Self {
            config: Arc::new(config),
            next_request_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    fn request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Hide `text` in the uploaded image and return the carrier encoded as
    /// the configured output format.
    ///
    /// # Example
    /// ```ignore
    /// let image_data = std::fs::read("input.jpg")?;
    /// let carrier = service.encode(image_data, "key".into(), "meet at noon".into()).await?;
    /// ```
    pub async fn encode(&self, image_data: Vec<u8>, password: String, text: String) -> Result<Vec<u8>> {
        let request_id = self.request_id();
        info!(
            "📷 Encode request #{}: {} image bytes, {} message bytes",
            request_id,
            image_data.len(),
            text.len()
        );

        let options = self.config.codec.options();
        let format = self.config.output.format;

        // Perform embedding in a blocking thread pool to avoid blocking async runtime
        let carrier = tokio::task::spawn_blocking(move || {
            steganography::embed_text_bytes(&image_data, &password, &text, &options, format, None)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Encode task panicked: {}", e))??;

        info!("✅ Encode request #{} complete ({} bytes)", request_id, carrier.len());
        Ok(carrier)
    }

    /// Recover the text hidden in an uploaded carrier.
    pub async fn decode(&self, image_data: Vec<u8>, password: String) -> Result<String> {
        let request_id = self.request_id();
        info!("🔍 Decode request #{}: {} image bytes", request_id, image_data.len());

        let options = self.config.codec.options();
        let text = tokio::task::spawn_blocking(move || {
            steganography::extract_text_bytes(&image_data, &password, &options, None)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Decode task panicked: {}", e))??;

        info!("✅ Decode request #{} recovered {} bytes", request_id, text.len());
        Ok(text)
    }

    pub async fn capacity(&self, image_data: Vec<u8>) -> Result<CarrierCapacity> {
        let framing = self.config.codec.framing;
        tokio::task::spawn_blocking(move || steganography::carrier_capacity(&image_data, framing))
            .await
            .map_err(|e| anyhow::anyhow!("Capacity task panicked: {}", e))?
    }

    pub fn output_format(&self) -> CarrierFormat {
        self.config.output.format
    }
}

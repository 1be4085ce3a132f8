//! Web server for the steganography API
//!
//! - `POST /api/encode`   multipart `image`, `password`, `message` → base64 carrier
//! - `POST /api/decode`   multipart `image`, `password` → hidden message
//! - `POST /api/capacity` multipart `image` → carrier capacity
//! - `GET  /api/health`

use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use clap::Parser;
use log::{error, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use stego_crypt::codec::StegoError;
use stego_crypt::common::config::StegoConfig;
use stego_crypt::processing::{CarrierCapacity, CarrierError};
use stego_crypt::utils::init_logger;
use stego_crypt::StegoService;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short, long)]
    address: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct EncodeResponse {
    success: bool,
    message: String,
    /// File extension matching the carrier encoding
    format: String,
    carrier_image_base64: String,
}

#[derive(Serialize)]
struct DecodeResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: error.into() }))
}

/// Status code for a failed codec call. Codec errors and undecodable uploads
/// are the caller's fault; failing to write the carrier back out is ours.
fn status_for(e: &anyhow::Error) -> StatusCode {
    if let Some(codec) = e.downcast_ref::<StegoError>() {
        return match codec {
            StegoError::InvalidKey | StegoError::EmptyMessage | StegoError::CapacityExceeded { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
    }
    match e.downcast_ref::<CarrierError>() {
        Some(CarrierError::Decode(_)) => StatusCode::BAD_REQUEST,
        Some(CarrierError::Encode(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn codec_failure(e: anyhow::Error) -> ApiError {
    let status = status_for(&e);

    if status.is_server_error() {
        error!("❌ Request failed: {:#}", e);
    } else {
        warn!("⚠️  Request rejected: {:#}", e);
    }
    api_error(status, format!("{:#}", e))
}

/// Collected multipart fields: the `image` file plus any text fields.
struct Upload {
    image: Option<(String, Vec<u8>)>,
    fields: HashMap<String, String>,
}

impl Upload {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut upload = Upload {
            image: None,
            fields: HashMap::new(),
        };

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Failed to read multipart data: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == "image" {
                let filename = field.file_name().unwrap_or("image").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Failed to read image data: {}", e)))?;
                upload.image = Some((filename, data.to_vec()));
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Failed to read field '{}': {}", name, e)))?;
                upload.fields.insert(name, value);
            }
        }

        Ok(upload)
    }

    fn image(&mut self) -> Result<(String, Vec<u8>), ApiError> {
        self.image
            .take()
            .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No image provided"))
    }

    fn field(&mut self, name: &str) -> Result<String, ApiError> {
        self.fields
            .remove(name)
            .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, format!("Missing field '{}'", name)))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    info!("🚀 Initializing web server...");

    let mut config = StegoConfig::load_or_default(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.web.address = address;
    }
    let addr = config.web.address.clone();
    let body_limit = config.web.max_upload_bytes;

    let service = Arc::new(StegoService::new(config));

    let app = Router::new()
        .route("/api/encode", post(encode_handler))
        .route("/api/decode", post(decode_handler))
        .route("/api/capacity", post(capacity_handler))
        .route("/api/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(service);

    info!("🌐 Web server running on http://{}", addr);
    info!("📡 API endpoints: /api/encode, /api/decode, /api/capacity");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check(State(service): State<Arc<StegoService>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "steganography-api",
        "framing": service.config().codec.framing,
        "output_format": service.output_format(),
    }))
}

async fn encode_handler(
    State(service): State<Arc<StegoService>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut upload = Upload::read(multipart).await?;
    let (filename, image_data) = upload.image()?;
    let password = upload.field("password")?;
    let message = upload.field("message")?;

    info!("📤 Received carrier: {} ({} bytes)", filename, image_data.len());

    let carrier = service
        .encode(image_data, password, message)
        .await
        .map_err(codec_failure)?;

    Ok((
        StatusCode::OK,
        Json(EncodeResponse {
            success: true,
            message: format!("Successfully hid message in {}", filename),
            format: service.output_format().extension().to_string(),
            carrier_image_base64: general_purpose::STANDARD.encode(&carrier),
        }),
    ))
}

async fn decode_handler(
    State(service): State<Arc<StegoService>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut upload = Upload::read(multipart).await?;
    let (filename, image_data) = upload.image()?;
    let password = upload.field("password")?;

    info!("📥 Received carrier to decode: {} ({} bytes)", filename, image_data.len());

    let message = service.decode(image_data, password).await.map_err(codec_failure)?;

    Ok((StatusCode::OK, Json(DecodeResponse { success: true, message })))
}

async fn capacity_handler(
    State(service): State<Arc<StegoService>>,
    multipart: Multipart,
) -> Result<Json<CarrierCapacity>, ApiError> {
    let mut upload = Upload::read(multipart).await?;
    let (_, image_data) = upload.image()?;

    let capacity = service.capacity(image_data).await.map_err(codec_failure)?;
    Ok(Json(capacity))
}

//! # Command-Line Entry Point
//!
//! ## Usage
//!
//! ```bash
//! stego-crypt encode --input photo.jpg --output carrier.png --password key --message "meet at noon"
//! echo "meet at noon" | STEGO_PASSWORD=key stego-crypt encode -i photo.jpg -o carrier.png
//! stego-crypt decode --input carrier.png --password key
//! stego-crypt capacity --input photo.jpg
//! ```
//!
//! Decoding must use the same `--framing` the carrier was written with.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use stego_crypt::codec::{FramingMode, Progress};
use stego_crypt::common::config::StegoConfig;
use stego_crypt::processing::{self, CarrierFormat};
use stego_crypt::utils::init_logger;

/// `--framing` values.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum FramingArg {
    Terminator,
    LengthPrefixed,
}

impl From<FramingArg> for FramingMode {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::Terminator => FramingMode::Terminator,
            FramingArg::LengthPrefixed => FramingMode::LengthPrefixed,
        }
    }
}

/// `--format` values.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Bmp,
    Tiff,
}

impl From<FormatArg> for CarrierFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => CarrierFormat::Png,
            FormatArg::Bmp => CarrierFormat::Bmp,
            FormatArg::Tiff => CarrierFormat::Tiff,
        }
    }
}

/// Hide text in images by XOR-obscuring it and writing it into pixel LSBs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Payload framing, overrides the config file
    #[arg(long, value_enum, global = true)]
    framing: Option<FramingArg>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide a message in an image
    Encode {
        /// Carrier image to hide the message in
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the modified carrier (.png, .bmp or .tiff)
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, env = "STEGO_PASSWORD", hide_env_values = true)]
        password: String,

        /// Message to hide; read from stdin when omitted
        #[arg(short, long)]
        message: Option<String>,

        /// Output format when the output path has no extension
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Recover a hidden message
    Decode {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, env = "STEGO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show how much text an image can hold
    Capacity {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn read_stdin_message() -> Result<String> {
    let mut message = String::new();
    std::io::stdin()
        .read_to_string(&mut message)
        .context("Failed to read message from stdin")?;
    Ok(message.trim().to_string())
}

/// Logs each quarter of the way through the carrier.
fn quarter_logger(label: &'static str) -> impl Fn(Progress) + Sync {
    let last_quarter = AtomicUsize::new(0);
    move |progress: Progress| {
        let quarter = (progress.fraction() * 4.0) as usize;
        if last_quarter.fetch_max(quarter, Ordering::Relaxed) < quarter {
            debug!("{} {}%", label, quarter * 25);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let mut config = StegoConfig::load_or_default(args.config.as_deref())?;
    if let Some(framing) = args.framing {
        config.codec.framing = framing.into();
    }
    let options = config.codec.options();

    match args.command {
        Command::Encode {
            input,
            output,
            password,
            message,
            format,
        } => {
            let message = match message {
                Some(message) => message,
                None => read_stdin_message()?,
            };
            let progress = quarter_logger("Embedding");

            info!("📷 Hiding {} bytes in {}", message.len(), input.display());
            processing::embed_text(
                &input,
                &password,
                &message,
                &output,
                &options,
                format.map(CarrierFormat::from).unwrap_or(config.output.format),
                Some(&progress),
            )?;
            info!("✅ Message hidden in {}", output.display());
        }
        Command::Decode { input, password } => {
            let progress = quarter_logger("Extracting");

            info!("🔍 Extracting message from {}", input.display());
            let message = processing::extract_text(&input, &password, &options, Some(&progress))?;
            println!("{message}");
        }
        Command::Capacity { input } => {
            let image_bytes =
                std::fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
            let capacity = processing::carrier_capacity(&image_bytes, options.framing)?;

            println!(
                "{}x{} pixels, {} channel bits, up to {} message bytes ({:?} framing)",
                capacity.width, capacity.height, capacity.channel_bits, capacity.message_bytes, options.framing
            );
        }
    }

    Ok(())
}

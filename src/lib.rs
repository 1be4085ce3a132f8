pub mod codec;
pub mod common;
pub mod processing;
pub mod server;
pub mod utils;

pub use codec::{CodecOptions, FramingMode, StegoError};
pub use server::StegoService;

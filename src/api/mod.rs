mod client;
mod types;

pub use client::{ConverterClient, ZIP_FILE_NAME};
pub use types::UploadResponse;

//! Error types for the zonerust library

use std::io;
use thiserror::Error;

/// Main error type for zonerust operations
#[derive(Debug, Error)]
pub enum ZmfError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A read or seek went past the end of the input stream
    #[error("Unexpected end of stream")]
    EndOfStream,

    /// Invalid file header
    #[error("Invalid file header: {0}")]
    InvalidHeader(String),

    /// Error parsing file content
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid file format
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Error during decompression of embedded bitmap data
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Error while re-encoding a decoded bitmap
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for zonerust operations
pub type Result<T> = std::result::Result<T, ZmfError>;

impl From<String> for ZmfError {
    fn from(s: String) -> Self {
        ZmfError::Custom(s)
    }
}

impl From<&str> for ZmfError {
    fn from(s: &str) -> Self {
        ZmfError::Custom(s.to_string())
    }
}

// ABOUTME: Error types for the slidegen application
// ABOUTME: Provides structured error handling for each stage of the pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideGenError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Model gateway request failed: {0}")]
    GatewayTransportError(#[from] reqwest::Error),

    #[error("Model gateway returned an error: {0}")]
    GatewayError(String),

    #[error("Failed to serialize or deserialize data: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("No slides found matching pattern: {0}")]
    NoSlidesFoundError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our SlideGenError
impl From<anyhow::Error> for SlideGenError {
    fn from(err: anyhow::Error) -> Self {
        SlideGenError::UnknownError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SlideGenError>;

//! Error types for the vision front-end.
//!
//! The selection logic itself never fails: an object that is not visible is a
//! normal outcome. Everything here belongs to the collaborators around it.

use thiserror::Error;

/// Errors raised by configuration loading and by the segmentation and
/// transport collaborators.
#[derive(Debug, Error)]
pub enum VisionError {
    /// A configuration value is out of range or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The segmentation collaborator could not produce a blob list.
    #[error("segmentation error: {0}")]
    Segmentation(String),

    /// Writing to the serial link (or reading a config file) failed.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A frame could not be decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A per-target worker task panicked or was cancelled.
    #[error("task error: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for VisionError {
    fn from(err: tokio::task::JoinError) -> Self {
        VisionError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VisionError>;

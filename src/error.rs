//! Error types for foldtex

use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Texture error: {0}")]
    Texture(#[from] crate::texture::TextureError),

    #[error("Atlas error: {0}")]
    Atlas(#[from] crate::atlas::AtlasError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure not attributable to a single image. The only variant that
    /// rejects a whole batch.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, EngineError>;

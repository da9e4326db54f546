//! Error types for playlist management

use thiserror::Error;

/// Playlist errors
///
/// Every variant is raised synchronously by the method that detected it.
/// Methods validate before mutating, so a returned error leaves the playlist
/// exactly as it was.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaylistError {
    /// Bad argument type or range (volume, seek time, genre, locator, options)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Index outside the playlist (or genre list) bounds
    #[error("Index {index} is out of range (length {len})")]
    Range { index: usize, len: usize },

    /// Referenced track or genre is not present
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation would leave the playlist without tracks
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Options could not be loaded from file or environment
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for PlaylistError {
    fn from(err: config::ConfigError) -> Self {
        PlaylistError::Config(err.to_string())
    }
}

/// Result type for playlist operations
pub type Result<T> = std::result::Result<T, PlaylistError>;

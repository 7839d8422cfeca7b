//! Error types for badge building, export and persistence

use crate::i18n::{Locale, Text};
use thiserror::Error;

/// Result type alias for badgesmith operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, exporting or persisting badges
#[derive(Error, Debug)]
pub enum Error {
    /// Network error or non-success response while fetching the badge SVG
    #[error("Failed to fetch badge: {0}")]
    FetchFailed(String),

    /// The fetched vector content could not be decoded
    #[error("Failed to decode badge SVG: {0}")]
    DecodeFailed(String),

    /// The pixel surface could not be allocated or encoded
    #[error("Failed to encode PNG: {0}")]
    EncodeFailed(String),

    /// Platform clipboard refused the write or is not available
    #[error("Clipboard unavailable: {0}")]
    ClipboardDenied(String),

    /// Persistence read/write failed (disabled storage, quota, I/O)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The exported file could not be written
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Short, user-facing title used when the error is surfaced as a toast.
    pub fn title(&self, locale: Locale) -> &'static str {
        let text = match self {
            Error::FetchFailed(_) => Text::FetchFailed,
            Error::DecodeFailed(_) => Text::InvalidImage,
            Error::EncodeFailed(_) => Text::ExportFailed,
            Error::ClipboardDenied(_) => Text::CopyFailed,
            Error::StorageUnavailable(_) => Text::StorageUnavailable,
            Error::DownloadFailed(_) => Text::DownloadFailed,
            Error::ConfigError(_) => Text::ConfigurationError,
            Error::Other(_) => Text::Error,
        };
        locale.t(text)
    }
}

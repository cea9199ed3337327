/// Error types for the gallery
///
/// Every failure here degrades a single feature (an empty catalog, a
/// placeholder tile, default settings); none of them stop the window.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// The catalog directory does not exist or is not a directory
    #[error("catalog directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// Enumerating the catalog directory failed part way
    #[error("catalog enumeration failed: {0}")]
    Catalog(#[from] walkdir::Error),

    /// An image source could not be decoded
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem error outside of decoding
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file exists but is not valid JSON for `Settings`
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GalleryError>;

// src/error.rs
//! Error types for the web viewer generator

use std::fmt;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, MapGenError>;

#[derive(Debug)]
pub enum MapGenError {
    /// Filesystem failure tied to a specific path
    File { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    Image(image::ImageError),
    /// Invalid quadtree set or build options, detected before any file is touched
    Config(String),
    /// Persisted store written by an incompatible format version
    UnsupportedVersion { path: PathBuf, found: u32, expected: u32 },
    Other(String),
}

impl MapGenError {
    /// Wrap an I/O error with the path it occurred on
    pub fn file(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        MapGenError::File {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        MapGenError::Config(msg.into())
    }
}

impl fmt::Display for MapGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapGenError::File { path, source } => {
                write!(f, "IO error on {}: {}", path.display(), source)
            }
            MapGenError::Json(e) => write!(f, "JSON error: {}", e),
            MapGenError::Image(e) => write!(f, "Image error: {}", e),
            MapGenError::Config(msg) => write!(f, "Configuration error: {}", msg),
            MapGenError::UnsupportedVersion { path, found, expected } => write!(
                f,
                "Persistent data {} has format version {}, expected {}",
                path.display(),
                found,
                expected
            ),
            MapGenError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for MapGenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapGenError::File { source, .. } => Some(source),
            MapGenError::Json(e) => Some(e),
            MapGenError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MapGenError {
    fn from(error: serde_json::Error) -> Self {
        MapGenError::Json(error)
    }
}

impl From<image::ImageError> for MapGenError {
    fn from(error: image::ImageError) -> Self {
        MapGenError::Image(error)
    }
}

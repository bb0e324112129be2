//! Crate-level error type.
//!
//! Each stage keeps its own `thiserror` enum; this one aggregates them for
//! the pipeline entry points and `main`.

use crate::config::ConfigError;
use crate::imaging::MediaError;
use crate::remote::TransferError;
use crate::video::TranscodeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Listing, download or upload against remote storage
    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// Photo decode/encode
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// External transcoder
    #[error("Transcode error: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local directory walk
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

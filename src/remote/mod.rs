//! Remote storage access.
//!
//! The pipeline only needs three operations from the cloud side, captured by
//! [`RemoteStorage`]. [`YandexDisk`] implements them over the Yandex Disk REST
//! API; tests use an in-memory tree instead.
//!
//! A single client is built in `main` and passed by reference to the mirror
//! and the uploader.

mod yandex;

pub use yandex::{DEFAULT_API_URL, YandexDisk};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status} for {path}: {message}")]
    Api {
        status: u16,
        path: String,
        message: String,
    },
    #[error("OAuth token contains characters not allowed in an HTTP header")]
    InvalidToken,
    #[error("{0} is not a directory")]
    NotADirectory(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Entry kind as reported by the listing endpoint (`"dir"` / `"file"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

/// One child of a listed remote directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl RemoteEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// The operations the pipeline consumes from cloud storage.
pub trait RemoteStorage {
    /// Immediate children of `dir`, in whatever order the service returns.
    fn list(&self, dir: &str) -> Result<Vec<RemoteEntry>, TransferError>;

    /// Download `remote_path` to `local_path`, replacing any existing file.
    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), TransferError>;

    /// Upload `local_path` to `remote_path`.
    fn upload(&self, local_path: &Path, remote_path: &str, overwrite: bool)
    -> Result<(), TransferError>;
}

impl<T: RemoteStorage + ?Sized> RemoteStorage for &T {
    fn list(&self, dir: &str) -> Result<Vec<RemoteEntry>, TransferError> {
        (**self).list(dir)
    }

    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), TransferError> {
        (**self).download(remote_path, local_path)
    }

    fn upload(
        &self,
        local_path: &Path,
        remote_path: &str,
        overwrite: bool,
    ) -> Result<(), TransferError> {
        (**self).upload(local_path, remote_path, overwrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_deserializes_from_listing_item() {
        let json = r#"{
            "name": "a.jpg",
            "path": "disk:/root/a.jpg",
            "type": "file",
            "size": 1024,
            "mime_type": "image/jpeg"
        }"#;
        let entry: RemoteEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "a.jpg");
        assert_eq!(entry.path, "disk:/root/a.jpg");
        assert_eq!(entry.kind, EntryKind::File);
        assert!(!entry.is_dir());
    }

    #[test]
    fn dir_entry_is_dir() {
        let entry: RemoteEntry =
            serde_json::from_str(r#"{"name":"sub","path":"disk:/root/sub","type":"dir"}"#)
                .unwrap();
        assert!(entry.is_dir());
    }

    #[test]
    fn api_error_message_includes_status_and_path() {
        let err = TransferError::Api {
            status: 403,
            path: "disk:/x".to_string(),
            message: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "API error 403 for disk:/x: Forbidden");
    }
}

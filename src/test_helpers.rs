//! Shared test utilities for the disk-media-sync test suite.
//!
//! Provides synthetic photo fixtures and [`MemoryStorage`], an in-memory
//! remote tree with failure injection, so no test needs the network.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let storage = MemoryStorage::new("disk:/Shop")
//!     .with_file("disk:/Shop/a.jpg", jpeg_bytes(40, 30))
//!     .with_dir("disk:/Shop/Empty")
//!     .failing("disk:/Shop/broken.jpg");
//!
//! assert_eq!(storage.uploaded(), Vec::<String>::new());
//! ```

use crate::remote::{EntryKind, RemoteEntry, RemoteStorage, TransferError};
use image::{ImageBuffer, ImageFormat, Rgb, Rgba};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io::Cursor;
use std::path::Path;

// =========================================================================
// Photo fixtures
// =========================================================================

fn gradient(width: u32, height: u32) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a gradient JPEG of the given size.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

/// Write a half-transparent RGBA PNG of the given size.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, _| {
        Rgba([200, (x % 256) as u8, 40, 128])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

const MARKER: Rgb<u8> = Rgb([230, 20, 20]);
const BACKGROUND: Rgb<u8> = Rgb([20, 20, 230]);

/// Write a JPEG whose top-left quadrant is red and the rest blue, so a
/// rotation or flip shows up as the red block moving to another corner.
pub fn create_marked_jpeg(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        if x < width / 2 && y < height / 2 {
            MARKER
        } else {
            BACKGROUND
        }
    });
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

/// Whether the pixel at `(x, y)` of an image file is the red marker colour.
/// Tolerant of JPEG noise.
pub fn is_marker_at(path: &Path, x: u32, y: u32) -> bool {
    let Rgb([r, _, b]) = *image::open(path).unwrap().to_rgb8().get_pixel(x, y);
    r > 150 && b < 100
}

/// In-memory JPEG bytes, for seeding [`MemoryStorage`].
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    gradient(width, height)
        .write_to(&mut buf, ImageFormat::Jpeg)
        .unwrap();
    buf.into_inner()
}

/// Splice a minimal EXIF APP1 segment carrying only an Orientation tag
/// right after the SOI marker of an existing JPEG.
pub fn with_exif_orientation(path: &Path, orientation: u8) {
    let data = fs::read(path).unwrap();
    assert_eq!(&data[..2], &[0xFF, 0xD8], "not a JPEG: {}", path.display());

    #[rustfmt::skip]
    let app1: [u8; 36] = [
        0xFF, 0xE1, 0x00, 0x22,                 // APP1, length 34
        b'E', b'x', b'i', b'f', 0x00, 0x00,
        b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // little-endian TIFF, IFD0 at 8
        0x01, 0x00,                             // one entry
        0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, // 0x0112 Orientation, SHORT, 1
        orientation, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,                 // no next IFD
    ];

    let mut out = Vec::with_capacity(data.len() + app1.len());
    out.extend_from_slice(&data[..2]);
    out.extend_from_slice(&app1);
    out.extend_from_slice(&data[2..]);
    fs::write(path, out).unwrap();
}

// =========================================================================
// Local tree helpers
// =========================================================================

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =========================================================================
// In-memory remote storage
// =========================================================================

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if path[..idx].ends_with(':') => &path[..=idx],
        Some(idx) => &path[..idx],
        None => "",
    }
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Remote tree held in memory. Paths use the `disk:/...` form.
///
/// Uploads land in the same tree, so a test can assert on the final remote
/// state as well as on the recorded upload order.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    dirs: RefCell<BTreeSet<String>>,
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    uploads: RefCell<Vec<String>>,
    failing: HashSet<String>,
}

impl MemoryStorage {
    pub fn new(root: &str) -> Self {
        let storage = Self::default();
        storage.dirs.borrow_mut().insert(root.to_string());
        storage
    }

    /// Add a directory and all of its ancestors.
    pub fn with_dir(self, path: &str) -> Self {
        self.add_dir(path);
        self
    }

    pub fn with_file(self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.add_dir(parent_of(path));
        self.files
            .borrow_mut()
            .insert(path.to_string(), content.into());
        self
    }

    /// Make every operation on `path` fail with an API error.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    fn add_dir(&self, path: &str) {
        let mut current = path;
        while !current.is_empty() && !current.ends_with(':') {
            self.dirs.borrow_mut().insert(current.to_string());
            if current.ends_with(":/") {
                break;
            }
            current = parent_of(current);
        }
    }

    fn check(&self, path: &str) -> Result<(), TransferError> {
        if self.failing.contains(path) {
            return Err(TransferError::Api {
                status: 503,
                path: path.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    /// Remote paths uploaded so far, in call order.
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.borrow().clone()
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }
}

impl RemoteStorage for MemoryStorage {
    fn list(&self, dir: &str) -> Result<Vec<RemoteEntry>, TransferError> {
        self.check(dir)?;
        if self.files.borrow().contains_key(dir) {
            return Err(TransferError::NotADirectory(dir.to_string()));
        }
        if !self.dirs.borrow().contains(dir) {
            return Err(TransferError::NotFound(dir.to_string()));
        }

        let dirs = self.dirs.borrow();
        let files = self.files.borrow();
        let entry = |path: &String, kind| RemoteEntry {
            path: path.clone(),
            name: name_of(path).to_string(),
            kind,
        };
        let children = dirs
            .iter()
            .filter(|d| d.as_str() != dir && parent_of(d) == dir)
            .map(|d| entry(d, EntryKind::Dir))
            .chain(
                files
                    .keys()
                    .filter(|f| parent_of(f) == dir)
                    .map(|f| entry(f, EntryKind::File)),
            )
            .collect();
        Ok(children)
    }

    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), TransferError> {
        self.check(remote_path)?;
        let content = self
            .file(remote_path)
            .ok_or_else(|| TransferError::NotFound(remote_path.to_string()))?;
        fs::write(local_path, content).map_err(|source| TransferError::Io {
            path: local_path.to_path_buf(),
            source,
        })
    }

    fn upload(
        &self,
        local_path: &Path,
        remote_path: &str,
        overwrite: bool,
    ) -> Result<(), TransferError> {
        self.check(remote_path)?;
        if !overwrite && self.files.borrow().contains_key(remote_path) {
            return Err(TransferError::Api {
                status: 409,
                path: remote_path.to_string(),
                message: "resource already exists".to_string(),
            });
        }
        let content = fs::read(local_path).map_err(|source| TransferError::Io {
            path: local_path.to_path_buf(),
            source,
        })?;
        self.add_dir(parent_of(remote_path));
        self.files
            .borrow_mut()
            .insert(remote_path.to_string(), content);
        self.uploads.borrow_mut().push(remote_path.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_keeps_disk_root_slash() {
        assert_eq!(parent_of("disk:/a.jpg"), "disk:/");
        assert_eq!(parent_of("disk:/Shop/a.jpg"), "disk:/Shop");
    }

    #[test]
    fn memory_storage_lists_children_only() {
        let storage = MemoryStorage::new("disk:/Shop")
            .with_file("disk:/Shop/a.jpg", b"a".to_vec())
            .with_file("disk:/Shop/Bags/b.jpg", b"b".to_vec());

        let mut names: Vec<String> = storage
            .list("disk:/Shop")
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();
        assert_eq!(names, ["Bags", "a.jpg"]);
        assert!(matches!(
            storage.list("disk:/Missing"),
            Err(TransferError::NotFound(_))
        ));
    }
}

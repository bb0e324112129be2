//! File naming conventions shared by the walker and the uploader.
//!
//! - Media is classified by extension, case-insensitively.
//! - Staged photos are numbered per directory: `sj_1.jpg`, `sj_2.jpg`, …
//! - A transcoded video keeps its source stem: `IMG_0042.mov` → `IMG_0042.mp4`.
//! - Remote paths always use `/`, whatever the local separator.

use std::path::{Component, Path, PathBuf};

/// What the walker does with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Other,
}

/// Lowercased extension of `path`, if it has one.
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn has_extension_in(path: &Path, extensions: &[String]) -> bool {
    extension_lower(path).is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
}

/// Classify `path` against the configured photo and video extension lists.
pub fn classify(path: &Path, photo_exts: &[String], video_exts: &[String]) -> MediaKind {
    if has_extension_in(path, photo_exts) {
        MediaKind::Photo
    } else if has_extension_in(path, video_exts) {
        MediaKind::Video
    } else {
        MediaKind::Other
    }
}

/// Extensions uploaded from a staging directory, whatever `photos.extensions`
/// holds. Staged outputs are always `.jpg`.
pub const UPLOAD_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Whether `path` should be uploaded from a staging directory.
pub fn is_uploadable(path: &Path) -> bool {
    extension_lower(path).is_some_and(|ext| UPLOAD_EXTENSIONS.contains(&ext.as_str()))
}

/// Name of the `index`-th (1-based) normalized photo in a directory.
pub fn staged_photo_name(prefix: &str, index: usize) -> String {
    format!("{prefix}_{index}.jpg")
}

/// Whether `name` has the `<prefix>_<N>.jpg` shape of a staged photo.
pub fn is_staged_photo(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(".jpg"))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Output path for a transcoded video: same directory, same stem.
pub fn transcoded_video_path(source: &Path, container: &str) -> PathBuf {
    source.with_extension(container)
}

/// Append a local relative path onto a remote directory.
///
/// `.` and empty paths map to `remote_root` itself.
pub fn join_remote(remote_root: &str, relative: &Path) -> String {
    let mut joined = remote_root.trim_end_matches('/').to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            joined.push('/');
            joined.push_str(&part.to_string_lossy());
        }
    }
    if joined.is_empty() || joined.ends_with(':') {
        // `disk:/` trimmed to `disk:`
        joined.push('/');
    }
    joined
}

/// Remote path of a file named `name` inside `remote_dir`.
pub fn remote_child(remote_dir: &str, name: &str) -> String {
    if remote_dir.ends_with('/') {
        format!("{remote_dir}{name}")
    } else {
        format!("{remote_dir}/{name}")
    }
}

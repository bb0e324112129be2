//! Folder walker and uploader.
//!
//! Walks a local mirror depth-first, sorted by name, and for every directory
//! (the root included):
//!
//! 1. creates its staging folder (`resize/` by default);
//! 2. normalizes each photo into staging as `sj_1.jpg`, `sj_2.jpg`, ... and
//!    transcodes each video next to its source (`IMG_1.mov` -> `IMG_1.mp4`);
//! 3. uploads the staged photos to the matching remote folder, overwriting.
//!
//! ## Output Structure
//!
//! ```text
//! convert/                        disk:/Shop/
//! ├── a.jpg                       ├── a.jpg
//! ├── b.mov                       ├── b.mov
//! ├── b.mp4                       ├── sj_1.jpg   (uploaded)
//! ├── resize/                     └── Bags/
//! │   └── sj_1.jpg                    └── sj_1.jpg   (uploaded)
//! └── Bags/
//!     ├── c.png
//!     └── resize/
//!         └── sj_1.jpg
//! ```
//!
//! Staging folders are never walked themselves and are left on disk. This
//! applies to any folder carrying the staging name, including one that came
//! from the remote tree: its files are neither processed nor uploaded, and a
//! warning names it when it holds anything besides staged photos.
//! Transcoded videos stay local. Numbering restarts at 1 in every directory
//! and only advances when a photo was actually written.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::imaging::{BoundingBox, ImageBackend, NormalizeConfig, Quality, normalize};
use crate::naming::{
    MediaKind, classify, is_staged_photo, is_uploadable, join_remote, remote_child,
    staged_photo_name, transcoded_video_path,
};
use crate::remote::RemoteStorage;
use crate::report::{RunReport, Stage};
use crate::video::Transcoder;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Settings for the walk, taken from [`Config`].
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub staging_dir: String,
    pub photo_prefix: String,
    pub photo_extensions: Vec<String>,
    pub video_extensions: Vec<String>,
    pub video_container: String,
    pub normalize: NormalizeConfig,
}

impl ProcessConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            staging_dir: config.local.staging_dir.clone(),
            photo_prefix: config.photos.prefix.clone(),
            photo_extensions: config.photos.extensions.clone(),
            video_extensions: config.videos.extensions.clone(),
            video_container: config.videos.container.clone(),
            normalize: NormalizeConfig {
                bounds: BoundingBox::from(config.photos.bounding_box),
                quality: Quality::new(config.photos.quality),
            },
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Process every directory under `local_root` and upload the results to the
/// mirrored location under `remote_root`.
pub fn process_and_upload(
    storage: &impl RemoteStorage,
    transcoder: &impl Transcoder,
    backend: &impl ImageBackend,
    local_root: &Path,
    remote_root: &str,
    config: &ProcessConfig,
    report: &mut RunReport,
) -> Result<()> {
    for dir in collect_directories(local_root, &config.staging_dir, &config.photo_prefix)? {
        let relative = dir.strip_prefix(local_root).unwrap_or(Path::new(""));
        let remote_dir = join_remote(remote_root, relative);
        info!(local = %dir.display(), remote = %remote_dir, "processing folder");

        let staging = dir.join(&config.staging_dir);
        fs::create_dir_all(&staging).map_err(Error::io(&staging))?;

        process_directory(transcoder, backend, &dir, &staging, config, report)?;
        upload_staging(storage, &staging, &remote_dir, report)?;
    }
    Ok(())
}

/// Every directory under `root`, parents before children, siblings by name.
/// Staging folders and their contents are skipped.
fn collect_directories(root: &Path, staging_dir: &str, prefix: &str) -> Result<Vec<PathBuf>> {
    let staging = OsStr::new(staging_dir);
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let skip = e.depth() > 0 && e.file_type().is_dir() && e.file_name() == staging;
            if skip {
                let foreign = foreign_files(e.path(), prefix);
                if foreign > 0 {
                    warn!(
                        dir = %e.path().display(),
                        files = foreign,
                        "skipping folder named like the staging folder; its own files are not processed"
                    );
                }
            }
            !skip
        });

    let mut dirs = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Files inside a staging-named folder that this tool did not stage.
fn foreign_files(dir: &Path, prefix: &str) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .filter(|e| !e.file_name().to_str().is_some_and(|n| is_staged_photo(n, prefix)))
        .count()
}

/// Regular files directly inside `dir`, sorted by name.
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(Error::io(dir))? {
        let entry = entry.map_err(Error::io(dir))?;
        if entry.file_type().map_err(Error::io(entry.path()))?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn process_directory(
    transcoder: &impl Transcoder,
    backend: &impl ImageBackend,
    dir: &Path,
    staging: &Path,
    config: &ProcessConfig,
    report: &mut RunReport,
) -> Result<()> {
    let mut photo_index = 0;

    for file in sorted_files(dir)? {
        let subject = file.display().to_string();
        match classify(&file, &config.photo_extensions, &config.video_extensions) {
            MediaKind::Photo => {
                let output = staging.join(staged_photo_name(&config.photo_prefix, photo_index + 1));
                let written = report.settle(
                    Stage::Normalize,
                    subject,
                    normalize(backend, &file, &output, &config.normalize),
                )?;
                if written.is_some() {
                    photo_index += 1;
                }
            }
            MediaKind::Video => {
                let output = transcoded_video_path(&file, &config.video_container);
                info!(source = %file.display(), output = %output.display(), "transcoding");
                report.settle(
                    Stage::Transcode,
                    subject,
                    transcoder.transcode(&file, &output),
                )?;
            }
            MediaKind::Other => debug!(file = %subject, "skipping"),
        }
    }
    Ok(())
}

fn upload_staging(
    storage: &impl RemoteStorage,
    staging: &Path,
    remote_dir: &str,
    report: &mut RunReport,
) -> Result<()> {
    for file in sorted_files(staging)? {
        if !is_uploadable(&file) {
            continue;
        }
        let Some(name) = file.file_name().and_then(OsStr::to_str) else {
            continue;
        };
        let remote_path = remote_child(remote_dir, name);
        info!(local = %file.display(), remote = %remote_path, "uploading");
        report.settle(
            Stage::Upload,
            remote_path.clone(),
            storage.upload(&file, &remote_path, true),
        )?;
    }
    Ok(())
}

//! Remote folder mirror.
//!
//! Recreates a remote directory tree under a local directory: every remote
//! folder becomes a local folder of the same name, every remote file is
//! downloaded next to its siblings. Nothing is filtered, nothing remote is
//! touched.
//!
//! ```text
//! disk:/Shop/                 convert/
//! ├── a.jpg          ──►      ├── a.jpg
//! └── Bags/                   └── Bags/
//!     └── b.mov                   └── b.mov
//! ```
//!
//! Only the root listing is fatal. A subfolder that fails to list is
//! recorded and its subtree skipped; a failed download is recorded and the
//! mirror moves on (unless the report is in fail-fast mode).

use crate::error::{Error, Result};
use crate::remote::{EntryKind, RemoteEntry, RemoteStorage};
use crate::report::{RunReport, Stage};
use std::fs;
use std::path::Path;
use tracing::info;

/// Mirror `remote_dir` into `local_dir`, creating it if absent.
pub fn mirror(
    storage: &impl RemoteStorage,
    remote_dir: &str,
    local_dir: &Path,
    report: &mut RunReport,
) -> Result<()> {
    info!(remote = remote_dir, local = %local_dir.display(), "mirroring");
    let entries = storage.list(remote_dir)?;
    fs::create_dir_all(local_dir).map_err(Error::io(local_dir))?;
    mirror_entries(storage, entries, local_dir, report)
}

fn mirror_entries(
    storage: &impl RemoteStorage,
    entries: Vec<RemoteEntry>,
    local_dir: &Path,
    report: &mut RunReport,
) -> Result<()> {
    for entry in entries {
        let local_path = local_dir.join(&entry.name);
        match entry.kind {
            EntryKind::Dir => {
                info!(remote = %entry.path, "entering folder");
                fs::create_dir_all(&local_path).map_err(Error::io(&local_path))?;
                let Some(children) =
                    report.settle(Stage::List, &entry.path, storage.list(&entry.path))?
                else {
                    continue;
                };
                mirror_entries(storage, children, &local_path, report)?;
            }
            EntryKind::File => {
                info!(remote = %entry.path, local = %local_path.display(), "downloading");
                report.settle(
                    Stage::Download,
                    &entry.path,
                    storage.download(&entry.path, &local_path),
                )?;
            }
        }
    }
    Ok(())
}

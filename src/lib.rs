//! # disk-media-sync
//!
//! Mirrors a Yandex Disk folder to the local filesystem, normalizes the
//! photos and videos found there, and uploads the normalized photos back next
//! to their originals.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Mirror    disk:/Shop  →  convert/          (remote tree → local tree)
//! 2. Process   convert/    →  resize/ + disk:/  (normalize, transcode, upload)
//! ```
//!
//! Both stages can run on their own (`mirror`, `process`) or back to back
//! (`sync`). The local tree is the hand-off between them, so a mirror can be
//! inspected or reprocessed without downloading again.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`mirror`] | Stage 1: recreate a remote tree locally |
//! | [`process`] | Stage 2: walk the local tree, normalize, transcode, upload |
//! | [`remote`] | `RemoteStorage` trait and the Yandex Disk REST client |
//! | [`imaging`] | Pure-Rust photo normalization: EXIF orientation, fit, JPEG |
//! | [`video`] | `Transcoder` trait and the ffmpeg subprocess implementation |
//! | [`naming`] | File classification, staged names, remote path joining |
//! | [`config`] | TOML config loading, validation and stock defaults |
//! | [`report`] | Per-run outcome report and the failure-isolation policy |
//! | [`output`] | CLI formatting of the run report |
//! | [`error`] | Crate-level error aggregation |
//!
//! # Design Decisions
//!
//! ## Injected Components
//!
//! The storage client, the image backend and the transcoder are traits. `main`
//! builds one of each and passes them by reference into both stages; tests
//! pass in-memory and recording doubles instead, so nothing in the test suite
//! needs the network or ffmpeg.
//!
//! ## Per-File Isolation
//!
//! A broken photo or a flaky upload should not cost the rest of a large
//! folder. Every per-file step goes through [`report::RunReport::settle`],
//! which records the outcome and keeps going. `--fail-fast` switches back to
//! stopping at the first failure. Either way the run ends with a report and a
//! non-zero exit status when anything failed.
//!
//! ## Photos Go Back, Videos Stay
//!
//! Normalized photos are uploaded as `sj_N.jpg` into the folder they came
//! from. Transcoded videos are written next to their source (`IMG_1.mov` →
//! `IMG_1.mp4`) and are not uploaded.

pub mod config;
pub mod error;
pub mod imaging;
pub mod mirror;
pub mod naming;
pub mod output;
pub mod process;
pub mod remote;
pub mod report;
pub mod video;

#[cfg(test)]
pub(crate) mod test_helpers;

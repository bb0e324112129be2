//! Run configuration.
//!
//! Loaded once at process start: stock defaults, then an optional TOML file,
//! then command-line overrides. The result is validated before anything
//! touches the network.
//!
//! ## Config File Location
//!
//! `--config <path>` names the file explicitly. Without it,
//! `disk-media-sync.toml` in the working directory is used when present.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [remote]
//! source = "disk:/"          # Remote folder to mirror and write back to
//! token_env = "API_KEY_YADISK"
//! api_url = "https://cloud-api.yandex.net/v1/disk"
//! page_size = 100            # Items per listing request
//! timeout_secs = 300         # Per HTTP request, including transfers
//!
//! [local]
//! root = "convert"           # Local mirror root
//! staging_dir = "resize"     # Per-directory staging folder name
//!
//! [photos]
//! bounding_box = [1080, 1440]
//! quality = 75               # JPEG quality (1-100)
//! prefix = "sj"              # sj_1.jpg, sj_2.jpg, ...
//! extensions = ["jpg", "jpeg", "png"]
//!
//! [videos]
//! ffmpeg = "ffmpeg"
//! video_codec = "h264"
//! audio_codec = "aac"
//! container = "mp4"          # IMG_1.mov -> IMG_1.mp4
//! extensions = ["mov"]
//!
//! [run]
//! fail_fast = false          # Abort on the first failed file
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::remote::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "disk-media-sync.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Environment variable {0} is not set; it must hold the Yandex Disk OAuth token")]
    MissingToken(String),
}

/// Full run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub remote: RemoteConfig,
    pub local: LocalConfig,
    pub photos: PhotosConfig,
    pub videos: VideosConfig,
    pub run: RunConfig,
}

/// Remote storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    /// Remote folder to mirror, e.g. `disk:/Photos/2024`.
    pub source: String,
    /// Name of the environment variable holding the OAuth token.
    pub token_env: String,
    pub api_url: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            source: "disk:/".to_string(),
            token_env: "API_KEY_YADISK".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 100,
            timeout_secs: 300,
        }
    }
}

/// Local mirror settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalConfig {
    pub root: PathBuf,
    /// Name of the staging folder created inside every visited directory.
    pub staging_dir: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("convert"),
            staging_dir: "resize".to_string(),
        }
    }
}

/// Photo normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotosConfig {
    /// `[width, height]` no normalized photo may exceed.
    pub bounding_box: [u32; 2],
    pub quality: u32,
    pub prefix: String,
    pub extensions: Vec<String>,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            bounding_box: [1080, 1440],
            quality: 75,
            prefix: "sj".to_string(),
            extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
        }
    }
}

/// Video transcoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideosConfig {
    pub ffmpeg: PathBuf,
    pub video_codec: String,
    pub audio_codec: String,
    /// Output file extension.
    pub container: String,
    pub extensions: Vec<String>,
}

impl Default for VideosConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            video_codec: "h264".to_string(),
            audio_codec: "aac".to_string(),
            container: "mp4".to_string(),
            extensions: vec!["mov".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub fail_fast: bool,
}

/// Values given on the command line; each one replaces its config key.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub remote_source: Option<String>,
    pub local_root: Option<PathBuf>,
    pub fail_fast: bool,
}

fn non_empty(value: &str, key: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    Ok(())
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty(&self.remote.source, "remote.source")?;
        non_empty(&self.remote.token_env, "remote.token_env")?;
        if !(1..=1000).contains(&self.remote.page_size) {
            return Err(ConfigError::Validation(
                "remote.page_size must be 1-1000".into(),
            ));
        }

        non_empty(&self.local.staging_dir, "local.staging_dir")?;
        let staging = self.local.staging_dir.as_str();
        if staging.contains(['/', '\\']) || matches!(staging, "." | "..") {
            return Err(ConfigError::Validation(
                "local.staging_dir must be a plain folder name".into(),
            ));
        }

        let [w, h] = self.photos.bounding_box;
        if w == 0 || h == 0 {
            return Err(ConfigError::Validation(
                "photos.bounding_box values must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.photos.quality) {
            return Err(ConfigError::Validation(
                "photos.quality must be 1-100".into(),
            ));
        }
        non_empty(&self.photos.prefix, "photos.prefix")?;
        if self.photos.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "photos.extensions must not be empty".into(),
            ));
        }

        non_empty(&self.videos.video_codec, "videos.video_codec")?;
        non_empty(&self.videos.audio_codec, "videos.audio_codec")?;
        non_empty(&self.videos.container, "videos.container")?;
        let is_video_ext = |ext: &str| {
            self.videos
                .extensions
                .iter()
                .any(|v| v.eq_ignore_ascii_case(ext))
        };
        if is_video_ext(&self.videos.container) {
            return Err(ConfigError::Validation(
                "videos.container must differ from every source extension in videos.extensions"
                    .into(),
            ));
        }
        if let Some(ext) = self.photos.extensions.iter().find(|e| is_video_ext(e)) {
            return Err(ConfigError::Validation(format!(
                "extension {ext:?} is listed as both photo and video"
            )));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(source) = &overrides.remote_source {
            self.remote.source = source.clone();
        }
        if let Some(root) = &overrides.local_root {
            self.local.root = root.clone();
        }
        if overrides.fail_fast {
            self.run.fail_fast = true;
        }
    }

    /// Read the OAuth token from the configured environment variable.
    pub fn token(&self) -> Result<String, ConfigError> {
        std::env::var(&self.remote.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingToken(self.remote.token_env.clone()))
    }
}

/// Parse a config file body. Missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load the configuration for this run.
///
/// - `Some(path)`: the file must exist.
/// - `None`: [`DEFAULT_CONFIG_FILE`] in `cwd` if present, else stock defaults.
///
/// Overrides are applied before validation.
pub fn load_config(
    explicit: Option<&Path>,
    cwd: &Path,
    overrides: &Overrides,
) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(cwd.join(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            parse_config(&content)?
        }
        None => Config::default(),
    };

    config.apply_overrides(overrides);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# disk-media-sync configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Remote storage (Yandex Disk)
# ---------------------------------------------------------------------------
[remote]
# Remote folder to mirror, process and write back to.
source = "disk:/"
# Environment variable holding the OAuth token. A .env file in the
# working directory is read first.
token_env = "API_KEY_YADISK"
api_url = "https://cloud-api.yandex.net/v1/disk"
# Items requested per listing page.
page_size = 100
# Timeout in seconds for each HTTP request, transfers included.
timeout_secs = 300

# ---------------------------------------------------------------------------
# Local mirror
# ---------------------------------------------------------------------------
[local]
# Where the remote tree is downloaded to.
root = "convert"
# Folder created inside every directory to hold normalized photos.
staging_dir = "resize"

# ---------------------------------------------------------------------------
# Photos
# ---------------------------------------------------------------------------
[photos]
# Maximum [width, height]. Smaller photos are never upscaled.
bounding_box = [1080, 1440]
# JPEG quality (1 = worst, 100 = best).
quality = 75
# Staged names: <prefix>_1.jpg, <prefix>_2.jpg, ...
prefix = "sj"
# Extensions treated as photos (case-insensitive).
extensions = ["jpg", "jpeg", "png"]

# ---------------------------------------------------------------------------
# Videos
# ---------------------------------------------------------------------------
[videos]
# ffmpeg binary, looked up on PATH unless absolute.
ffmpeg = "ffmpeg"
video_codec = "h264"
audio_codec = "aac"
# Output extension; the source stem is kept (IMG_1.mov -> IMG_1.mp4).
container = "mp4"
# Extensions treated as videos (case-insensitive).
extensions = ["mov"]

# ---------------------------------------------------------------------------
# Run policy
# ---------------------------------------------------------------------------
[run]
# Stop at the first failed download/normalize/transcode/upload instead of
# recording it and moving on.
fail_fast = false
"##
}

//! Video transcoding through an external `ffmpeg` process.
//!
//! Only the codec pair is requested; no scale or crop filter is passed, so
//! ffmpeg keeps the source frame geometry and aspect ratio.
//!
//! ```text
//! ffmpeg -nostdin -hide_banner -loglevel error -y \
//!        -i IMG_0042.mov -vcodec h264 -acodec aac IMG_0042.mp4
//! ```
//!
//! Success means exit code 0 and nothing more: the output is not probed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status} for {}: {stderr}", input.display())]
    Failed {
        program: String,
        input: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

/// Requested output codecs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecPair {
    pub video: String,
    pub audio: String,
}

impl Default for CodecPair {
    fn default() -> Self {
        Self {
            video: "h264".to_string(),
            audio: "aac".to_string(),
        }
    }
}

/// Anything that can turn one video file into another.
pub trait Transcoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

/// Transcoder backed by the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    codecs: CodecPair,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>, codecs: CodecPair) -> Self {
        Self {
            program: program.into(),
            codecs,
        }
    }

    /// Build the argument list for one transcode. Pure, for testing.
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-nostdin", "-hide_banner", "-loglevel", "error", "-y"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push("-i".into());
        args.push(input.into());
        args.push("-vcodec".into());
        args.push(self.codecs.video.as_str().into());
        args.push("-acodec".into());
        args.push(self.codecs.audio.as_str().into());
        args.push(output.into());
        args
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg", CodecPair::default())
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let program = self.program.display().to_string();
        tracing::debug!(%program, input = %input.display(), output = %output.display(), "spawning transcoder");

        let result = Command::new(&self.program)
            .args(self.args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| TranscodeError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(TranscodeError::Failed {
                program,
                input: input.to_path_buf(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records transcode calls and writes an empty output file.
    #[derive(Default)]
    pub struct RecordingTranscoder {
        pub fail_on: Option<String>,
        pub calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl RecordingTranscoder {
        pub fn failing_on(fragment: &str) -> Self {
            Self {
                fail_on: Some(fragment.to_string()),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transcoder for RecordingTranscoder {
        fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
            self.calls
                .lock()
                .unwrap()
                .push((input.to_path_buf(), output.to_path_buf()));
            if let Some(fragment) = &self.fail_on
                && input.to_string_lossy().contains(fragment.as_str())
            {
                return Err(TranscodeError::Spawn {
                    program: "mock".to_string(),
                    source: std::io::Error::other("mock transcode failure"),
                });
            }
            std::fs::write(output, b"").map_err(|source| TranscodeError::Spawn {
                program: "mock".to_string(),
                source,
            })
        }
    }

    #[test]
    fn args_request_codec_pair_without_scaling() {
        let ffmpeg = FfmpegTranscoder::default();
        let args = ffmpeg.args(Path::new("/v/b.mov"), Path::new("/v/b.mp4"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            [
                "-nostdin",
                "-hide_banner",
                "-loglevel",
                "error",
                "-y",
                "-i",
                "/v/b.mov",
                "-vcodec",
                "h264",
                "-acodec",
                "aac",
                "/v/b.mp4"
            ]
        );
        assert!(!args.iter().any(|a| a == "-vf" || a == "-s"));
    }

    #[test]
    fn args_use_configured_codecs() {
        let ffmpeg = FfmpegTranscoder::new(
            "/opt/ffmpeg",
            CodecPair {
                video: "hevc".to_string(),
                audio: "opus".to_string(),
            },
        );
        let args = ffmpeg.args(Path::new("in.mov"), Path::new("in.mp4"));
        assert!(args.windows(2).any(|w| w[0] == "-vcodec" && w[1] == "hevc"));
        assert!(args.windows(2).any(|w| w[0] == "-acodec" && w[1] == "opus"));
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let ffmpeg = FfmpegTranscoder::new("/nonexistent/ffmpeg-binary", CodecPair::default());
        let err = ffmpeg
            .transcode(Path::new("in.mov"), Path::new("out.mp4"))
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_failure_with_status() {
        // `false` ignores its arguments and exits 1.
        let transcoder = FfmpegTranscoder::new("false", CodecPair::default());
        let err = transcoder
            .transcode(Path::new("in.mov"), Path::new("out.mp4"))
            .unwrap_err();
        match err {
            TranscodeError::Failed { status, input, .. } => {
                assert_eq!(status.code(), Some(1));
                assert_eq!(input, PathBuf::from("in.mov"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let transcoder = FfmpegTranscoder::new("true", CodecPair::default());
        assert!(
            transcoder
                .transcode(Path::new("in.mov"), Path::new("out.mp4"))
                .is_ok()
        );
    }
}

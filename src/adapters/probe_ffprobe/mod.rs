//! FFprobe adapter for media file probing
//!
//! ffprobe is looked up next to the configured transcoder first (same
//! directory, same extension), then on PATH.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::adapters::process_tools::{capture, tail};
use crate::domain::errors::{ProbeError, ToolError};
use crate::domain::model::{MediaInfo, DEFAULT_FRAME_RATE};
use crate::ports::{ProbePort, SettingsPort};

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    #[serde(default)]
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    settings: Arc<dyn SettingsPort>,
}

impl FfprobeAdapter {
    pub fn new(settings: Arc<dyn SettingsPort>) -> Self {
        Self { settings }
    }

    /// ffprobe beside `transcoder`, or the bare name for a PATH lookup
    pub fn locate(transcoder: &Path) -> PathBuf {
        let sibling = transcoder.parent().map(|dir| {
            let mut name = OsString::from("ffprobe");
            if let Some(ext) = transcoder.extension() {
                name.push(".");
                name.push(ext);
            }
            dir.join(name)
        });

        match sibling {
            Some(candidate) if !transcoder.as_os_str().is_empty() && candidate.exists() => {
                candidate
            }
            _ => PathBuf::from("ffprobe"),
        }
    }

    /// Parse ffprobe's `-print_format json` output
    pub fn parse(source: &Path, json: &[u8]) -> Result<MediaInfo, ProbeError> {
        let output: FfprobeOutput = serde_json::from_slice(json)?;

        let video = output
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| ProbeError::NoVideoStream(source.to_path_buf()))?;

        let frame_rate = video
            .r_frame_rate
            .as_deref()
            .and_then(parse_frame_rate)
            .or_else(|| video.avg_frame_rate.as_deref().and_then(parse_frame_rate))
            .unwrap_or(DEFAULT_FRAME_RATE);

        let duration = video
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok())
            .or_else(|| {
                output
                    .format
                    .as_ref()
                    .and_then(|f| f.duration.as_deref())
                    .and_then(|d| d.parse::<f64>().ok())
            })
            .filter(|s| *s > 0.0)
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
            .ok_or_else(|| ProbeError::UnknownDuration(source.to_path_buf()))?;

        Ok(MediaInfo {
            path: source.to_path_buf(),
            duration,
            frame_rate,
            width: video.width.unwrap_or(0),
            height: video.height.unwrap_or(0),
            codec: video
                .codec_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

/// `"30000/1001"` or `"25"`; `None` for `0/0` and garbage
fn parse_frame_rate(value: &str) -> Option<f64> {
    let rate = match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.trim().parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

impl ProbePort for FfprobeAdapter {
    fn probe(&self, source: &Path) -> Result<MediaInfo, ProbeError> {
        if !source.exists() {
            return Err(ProbeError::NotFound(source.to_path_buf()));
        }

        let transcoder = match self.settings.load() {
            Ok(settings) => settings.transcoder_path,
            Err(e) => {
                warn!(error = %e, "Could not read settings, probing with ffprobe from PATH");
                PathBuf::new()
            }
        };
        let ffprobe = Self::locate(&transcoder);
        debug!(ffprobe = %ffprobe.display(), source = %source.display(), "Probing media");

        let output = capture(
            ffprobe.as_os_str(),
            [
                OsStr::new("-v"),
                OsStr::new("quiet"),
                OsStr::new("-print_format"),
                OsStr::new("json"),
                OsStr::new("-show_format"),
                OsStr::new("-show_streams"),
                source.as_os_str(),
            ],
        )?;

        if !output.status.success() {
            return Err(ProbeError::Tool(ToolError::NonZeroExit {
                program: ffprobe.display().to_string(),
                code: output.status.code(),
                stderr_tail: tail(&String::from_utf8_lossy(&output.stderr), 12),
            }));
        }

        Self::parse(source, &output.stdout)
    }
}

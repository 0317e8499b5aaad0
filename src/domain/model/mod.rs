// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::domain::errors::ExportWarning;

/// Smallest gap kept between trim start and trim end
pub const MIN_TRIM_DELTA: Duration = Duration::from_millis(10);

/// Palette size handed to the optimizer unless configured otherwise
pub const DEFAULT_OPTIMIZER_COLORS: u16 = 256;

/// Frame rate assumed when a source does not report one
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Extension of the exported animated image
pub const ANIMATED_IMAGE_EXTENSION: &str = "gif";

/// In/out points on a single source timeline
///
/// Only [`TrimSelector`] hands these out, so `start < end <= duration` holds
/// for every value observed outside this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimRange {
    start: Duration,
    end: Duration,
}

impl TrimRange {
    pub fn start(&self) -> Duration {
        self.start
    }

    pub fn end(&self) -> Duration {
        self.end
    }

    /// Length of the selection, always derived from the bounds
    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for TrimRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}s - {:.3}s ({:.3}s)",
            self.start.as_secs_f64(),
            self.end.as_secs_f64(),
            self.length().as_secs_f64()
        )
    }
}

/// Tracks the trim range of the loaded media and keeps it well-formed
#[derive(Debug, Clone, PartialEq)]
pub struct TrimSelector {
    duration: Duration,
    range: TrimRange,
}

impl TrimSelector {
    /// Create a selector spanning the whole media
    pub fn new(duration: Duration) -> Self {
        let duration = duration.max(MIN_TRIM_DELTA);
        Self {
            duration,
            range: TrimRange {
                start: Duration::ZERO,
                end: duration,
            },
        }
    }

    /// Select `[0, duration]` for newly loaded media
    pub fn reset(&mut self, duration: Duration) {
        *self = Self::new(duration);
    }

    /// Move the in point, pinned to at most `end - MIN_TRIM_DELTA`
    pub fn set_start(&mut self, candidate: Duration) -> Duration {
        let limit = self.range.end.saturating_sub(MIN_TRIM_DELTA);
        self.range.start = candidate.min(limit);
        self.range.start
    }

    /// Move the out point, pinned to at least `start + MIN_TRIM_DELTA`
    pub fn set_end(&mut self, candidate: Duration) -> Duration {
        let floor = self.range.start + MIN_TRIM_DELTA;
        self.range.end = candidate.min(self.duration).max(floor);
        self.range.end
    }

    pub fn range(&self) -> TrimRange {
        self.range
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn length(&self) -> Duration {
        self.range.length()
    }
}

/// What probing reports about a source video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub duration: Duration,
    pub frame_rate: f64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
}

impl MediaInfo {
    /// Frame rate handed to the tools, rounded to whole frames per second
    pub fn export_frame_rate(&self) -> u32 {
        crate::domain::rules::FrameTiming::export_rate(self.frame_rate)
    }
}

/// The external tools the pipeline drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// Video transcoder (ffmpeg)
    Transcoder,
    /// Image-sequence converter (ImageMagick convert)
    FrameSequence,
    /// GIF optimizer (gifsicle)
    Optimizer,
}

impl ToolKind {
    pub fn program_name(&self) -> &'static str {
        match self {
            ToolKind::Transcoder => "ffmpeg",
            ToolKind::FrameSequence => "convert",
            ToolKind::Optimizer => "gifsicle",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program_name())
    }
}

/// How the intermediate animated image is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportStrategy {
    /// One transcoder run straight to an animated image
    Direct,
    /// Transcoder emits stills, the image tool assembles them
    FrameSequence,
}

impl ExportStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "direct" => Some(ExportStrategy::Direct),
            "frame-sequence" | "frames" | "convert" => Some(ExportStrategy::FrameSequence),
            _ => None,
        }
    }
}

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub last_opened_directory: PathBuf,
    pub use_frame_sequence: bool,
    pub use_optimizer: bool,
    pub transcoder_path: PathBuf,
    pub frame_sequence_tool_path: PathBuf,
    pub optimizer_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_directory: Option<PathBuf>,
    pub auto_close: bool,
    pub optimizer_colors: u16,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            last_opened_directory: PathBuf::new(),
            use_frame_sequence: false,
            use_optimizer: false,
            transcoder_path: PathBuf::new(),
            frame_sequence_tool_path: PathBuf::new(),
            optimizer_path: PathBuf::new(),
            export_directory: None,
            auto_close: false,
            optimizer_colors: DEFAULT_OPTIMIZER_COLORS,
        }
    }
}

impl ExportSettings {
    /// Defaults for a first run, starting file dialogs in `home`
    pub fn first_run(home: Option<PathBuf>) -> Self {
        Self {
            last_opened_directory: home.filter(|dir| dir.exists()).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn strategy(&self) -> ExportStrategy {
        if self.use_frame_sequence {
            ExportStrategy::FrameSequence
        } else {
            ExportStrategy::Direct
        }
    }

    pub fn tool_path(&self, tool: ToolKind) -> &Path {
        match tool {
            ToolKind::Transcoder => &self.transcoder_path,
            ToolKind::FrameSequence => &self.frame_sequence_tool_path,
            ToolKind::Optimizer => &self.optimizer_path,
        }
    }
}

/// Tool locations and switches for one export
#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    pub transcoder: PathBuf,
    pub frame_sequence_tool: PathBuf,
    pub optimizer: PathBuf,
    pub strategy: ExportStrategy,
    pub optimize: bool,
    pub colors: u16,
}

impl From<&ExportSettings> for ToolConfig {
    fn from(settings: &ExportSettings) -> Self {
        Self {
            transcoder: settings.transcoder_path.clone(),
            frame_sequence_tool: settings.frame_sequence_tool_path.clone(),
            optimizer: settings.optimizer_path.clone(),
            strategy: settings.strategy(),
            optimize: settings.use_optimizer,
            colors: settings.optimizer_colors,
        }
    }
}

impl ToolConfig {
    pub fn path(&self, tool: ToolKind) -> &Path {
        match tool {
            ToolKind::Transcoder => &self.transcoder,
            ToolKind::FrameSequence => &self.frame_sequence_tool,
            ToolKind::Optimizer => &self.optimizer,
        }
    }
}

/// One export request, alive from trigger until the pipeline returns
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub source: PathBuf,
    pub range: TrimRange,
    pub frame_rate: u32,
    pub output: PathBuf,
}

/// States of the export pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    ValidatingTools,
    Transcoding,
    FrameSequenceConversion,
    Optimizing,
    Finalizing,
    Aborted,
}

impl PipelineState {
    /// Edges of the export state machine
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        match (self, next) {
            (Idle, ValidatingTools) => true,
            (ValidatingTools, Transcoding) => true,
            (Transcoding, FrameSequenceConversion | Optimizing | Finalizing) => true,
            (FrameSequenceConversion, Optimizing | Finalizing) => true,
            (Optimizing, Finalizing) => true,
            (Finalizing, Idle) => true,
            (Idle | Aborted, Aborted) => false,
            (_, Aborted) => true,
            _ => false,
        }
    }
}

/// What a finished export produced
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub output: PathBuf,
    pub range: TrimRange,
    pub strategy: ExportStrategy,
    pub optimized: bool,
    #[serde(serialize_with = "serialize_warnings")]
    pub warnings: Vec<ExportWarning>,
    pub states: Vec<PipelineState>,
    pub finished_at: DateTime<Local>,
}

fn serialize_warnings<S>(warnings: &[ExportWarning], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(warnings.iter().map(|w| w.to_string()))
}

#[cfg(test)]
mod tests;

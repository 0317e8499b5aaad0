// Domain errors - Error types for the domain layer

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::model::{PipelineState, ToolKind};

/// Failures of a single external tool invocation
#[derive(Error, Debug)]
pub enum ToolError {
    /// The process could not be started at all
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully
    #[error("{program} exited with {}", describe_exit(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr_tail: String,
    },

    /// The process reported success but its output file is missing
    #[error("{program} did not produce {}", .expected.display())]
    MissingOutput { program: String, expected: PathBuf },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Fatal export failures, grouped the way the user sees them
#[derive(Error, Debug)]
pub enum ExportError {
    /// A required tool path is unset or does not exist
    #[error("Invalid {tool} path! Please set the location of {tool} in the settings")]
    MissingTool { tool: ToolKind, path: PathBuf },

    /// A required step (transcoding or frame assembly) failed
    #[error("{tool} failed! {source}")]
    StepFailed {
        tool: ToolKind,
        #[source]
        source: ToolError,
    },

    /// The frame-sequence strategy produced no frames to assemble
    #[error("{tool} produced no frames in {}", .directory.display())]
    NoFrames { tool: ToolKind, directory: PathBuf },

    /// The finished file could not be placed at its destination
    #[error("Failed to write {}: {source}", .path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The per-job scratch directory could not be created
    #[error("Failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),

    /// The state machine was driven along an edge it does not have
    #[error("Export pipeline cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: PipelineState,
        to: PipelineState,
    },

    /// No step left a file to move into place
    #[error("Export produced no output file")]
    NothingToFinalize,

    /// Export requested without a loaded source
    #[error("No video loaded. Open a video before exporting")]
    NoMedia,
}

impl ExportError {
    /// Configuration errors happen before any filesystem side effect
    pub fn is_configuration(&self) -> bool {
        matches!(self, ExportError::MissingTool { .. } | ExportError::NoMedia)
    }
}

/// Non-fatal problems that still let the export finish
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportWarning {
    #[error("Invalid {tool} path! Please set the location of {tool} in the settings! Exported UNOPTIMIZED .gif")]
    OptimizerMissing { tool: ToolKind, path: PathBuf },

    #[error("{tool} failed! Exported UNOPTIMIZED .gif ({reason})")]
    OptimizerFailed { tool: ToolKind, reason: String },

    #[error("Could not remove scratch directory {}: {reason}", .path.display())]
    ScratchCleanup { path: PathBuf, reason: String },
}

/// Settings record persistence failures
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Media probing failures
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Video file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("ffprobe failed: {0}")]
    Tool(#[from] ToolError),

    #[error("Failed to parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No video stream found in {}", .0.display())]
    NoVideoStream(PathBuf),

    #[error("Could not determine duration of {}", .0.display())]
    UnknownDuration(PathBuf),
}

/// Shell ("Open with") integration failures
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Launch giffer as admin to change the right click shortcut!")]
    PermissionDenied,

    #[error("Right click shortcut is not supported on this platform")]
    Unsupported,

    #[error("Registry command failed: {0}")]
    Command(String),

    #[error("Failed to run registry tool: {0}")]
    Io(#[from] std::io::Error),
}

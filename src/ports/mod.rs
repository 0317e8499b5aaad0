// Ports - Interface definitions (contracts)

use std::path::Path;
use std::time::Duration;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::scratch::ScratchDir;
use crate::planner::invocation::ToolInvocation;

/// Port for running one external tool to completion
///
/// Implementations block until the child exits. A nonzero exit or a launch
/// failure is the only failure signal; tool output is never parsed.
pub trait ToolRunner: Send + Sync {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutcome, ToolError>;
}

/// Result of a successful tool run
#[derive(Debug, Clone, Default)]
pub struct ToolOutcome {
    pub elapsed: Duration,
    pub stderr_tail: String,
}

/// Port for reading media properties
pub trait ProbePort: Send + Sync {
    fn probe(&self, source: &Path) -> Result<MediaInfo, ProbeError>;
}

/// Port for the file system work the export does
pub trait FsPort: Send + Sync {
    /// Check if file exists
    fn file_exists(&self, path: &Path) -> bool;

    /// Create a fresh, uniquely named scratch directory for one job
    fn create_scratch_dir(&self) -> std::io::Result<ScratchDir>;

    /// Create directory (including parent directories)
    fn create_directory(&self, path: &Path) -> std::io::Result<()>;

    /// Count files with the given extension directly inside `dir`
    fn count_files(&self, dir: &Path, extension: &str) -> std::io::Result<usize>;

    /// Put `candidate` at `destination`, removing whatever was there
    fn replace_file(&self, candidate: &Path, destination: &Path) -> std::io::Result<()>;
}

/// Called with the new record after every save
pub type SettingsListener = Box<dyn Fn(&ExportSettings) + Send + Sync>;

/// Port for the persisted settings record
pub trait SettingsPort: Send + Sync {
    /// Load the record, creating and persisting defaults when absent
    fn load(&self) -> Result<ExportSettings, SettingsError>;

    /// Overwrite the whole record and notify listeners
    fn save(&self, settings: &ExportSettings) -> Result<(), SettingsError>;

    /// Where the record lives
    fn location(&self) -> &Path;

    /// Register a refresh callback
    fn subscribe(&self, listener: SettingsListener);
}

/// Port for the platform "open with" shortcut keys
pub trait ShellIntegrationPort: Send + Sync {
    fn exists(&self, key: &str) -> Result<bool, ShellError>;

    fn create(&self, key: &str, value: &str) -> Result<(), ShellError>;

    fn delete(&self, key: &str) -> Result<(), ShellError>;
}

/// Port for the media playback primitive behind the player
pub trait PlaybackPort: Send {
    fn load(&mut self, media: &MediaInfo);

    fn position(&self) -> Duration;

    fn duration(&self) -> Duration;

    fn is_playing(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn set_position(&mut self, position: Duration);
}

/// Severity of a user-facing status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Port for the user-facing status area
pub trait StatusPort: Send + Sync {
    /// Replace the status line
    fn show(&self, level: StatusLevel, message: &str);

    /// Empty the status line
    fn clear(&self);

    /// Show the blocking "busy" indicator; cancels any pending clear
    fn begin_busy(&self, label: &str);

    /// Hide the busy indicator
    fn end_busy(&self);

    /// Show a success message that clears itself after a delay
    fn finished(&self, message: &str);
}

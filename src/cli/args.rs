//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::domain::model::ExportStrategy;

fn parse_strategy(value: &str) -> Result<ExportStrategy, String> {
    ExportStrategy::parse(value)
        .ok_or_else(|| format!("unknown strategy '{}', use direct or frame-sequence", value))
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Trim start (HH:MM:SS.ms, MM:SS.ms, or seconds; default: beginning)
    #[arg(short, long)]
    pub start: Option<String>,

    /// Trim end (HH:MM:SS.ms, MM:SS.ms, or seconds; default: end of video)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Save as this path (".gif" is appended when missing)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export strategy for this run: direct or frame-sequence
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<ExportStrategy>,

    /// Run the optimizer for this export
    #[arg(long, conflicts_with = "no_optimize")]
    pub optimize: bool,

    /// Skip the optimizer for this export
    #[arg(long)]
    pub no_optimize: bool,

    /// Optimizer palette size for this export
    #[arg(long)]
    pub colors: Option<u16>,

    /// Frame rate override (default: detected from the video)
    #[arg(long)]
    pub fps: Option<u32>,

    /// Print the export report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExportArgs {
    pub fn optimize_override(&self) -> Option<bool> {
        match (self.optimize, self.no_optimize) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the session command
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Video to open on start
    pub video: Option<PathBuf>,
}

/// Settings panel actions
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the current settings
    Show {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Print the settings file location
    Path,
    /// Change one setting, e.g. `set ffmpeg C:\ffmpeg\bin\ffmpeg.exe`
    Set {
        /// Setting name (transcoder_path, use_optimizer, optimizer_colors, ...)
        key: String,
        /// New value
        value: String,
    },
    /// Export next to the source video again
    ClearExportDir,
}

/// Right click shortcut actions
#[derive(Subcommand, Debug)]
pub enum ShortcutAction {
    /// Add "Open with Giffer" to the Explorer context menu
    Install {
        /// Executable the shortcut launches (default: this executable)
        #[arg(long)]
        exe: Option<PathBuf>,
    },
    /// Remove the context menu entry
    Remove,
    /// Report whether the entry is installed
    Status,
}

//! CLI module for giffer
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;
pub mod session;

/// giffer
///
/// Trim a video and export the range as an optimized animated GIF, using
/// ffmpeg, ImageMagick convert and gifsicle.
#[derive(Parser, Debug)]
#[command(name = "giffer")]
#[command(about = "giffer - Trim videos into optimized GIFs")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Logging level (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Log output format: pretty, compact or json
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Settings file
    #[arg(long, global = true, env = "GIFFER_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Video to open in an interactive session
    pub video: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a range of a video as a GIF
    Export(args::ExportArgs),
    /// Show detected video information
    Probe(args::ProbeArgs),
    /// Interactive player: mark in/out points and export
    Session(args::SessionArgs),
    /// View or change settings
    Settings {
        #[command(subcommand)]
        action: args::SettingsAction,
    },
    /// Manage the "Open with Giffer" right click shortcut
    Shortcut {
        #[command(subcommand)]
        action: args::ShortcutAction,
    },
}

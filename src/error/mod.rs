//! Error handling module for giffer

use thiserror::Error;

use crate::domain::errors::{ExportError, ProbeError, SettingsError, ShellError};

/// Main error type for giffer operations
#[derive(Error, Debug)]
pub enum GifferError {
    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Export pipeline failure
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Settings could not be read or written
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Source media could not be probed
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Right click shortcut could not be changed
    #[error(transparent)]
    Shell(#[from] ShellError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for giffer operations
pub type GifferResult<T> = std::result::Result<T, GifferError>;

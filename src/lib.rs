//! giffer library
//!
//! Trim a video and export the selected range as an optimized animated GIF by
//! driving ffmpeg, ImageMagick `convert` and `gifsicle` as child processes.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{ExportError, ExportWarning};
pub use domain::model::{ExportReport, ExportSettings, MediaInfo, TrimRange, TrimSelector};
pub use error::{GifferError, GifferResult};

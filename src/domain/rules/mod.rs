// Domain rules - Business logic and policies

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::model::*;

/// Frame-rate derived timings used by the player and the tools
pub struct FrameTiming;

impl FrameTiming {
    /// Longest jump the skip keys make
    pub const MAX_SKIP: Duration = Duration::from_millis(5000);

    /// Whole frames per second handed to the tools (never zero)
    pub fn export_rate(detected: f64) -> u32 {
        if !detected.is_finite() || detected <= 0.0 {
            return DEFAULT_FRAME_RATE as u32;
        }
        (detected.round() as u32).max(1)
    }

    /// Duration of one frame, used for frame stepping
    pub fn frame_step(detected: f64) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(Self::export_rate(detected)))
    }

    /// Skip distance: a tenth of the media, at most five seconds
    pub fn skip_range(duration: Duration) -> Duration {
        (duration / 10).min(Self::MAX_SKIP)
    }

    /// Inter-frame delay for the image-sequence tool, in ticks of `1/fps` s
    pub fn sequence_delay(frame_rate: u32) -> String {
        format!("1x{}", frame_rate.max(1))
    }
}

/// Decides where the exported file goes
pub struct OutputPathResolver;

impl OutputPathResolver {
    /// `<export dir or source dir>/<source stem>.gif`
    pub fn derive(source: &Path, export_directory: Option<&Path>) -> Option<PathBuf> {
        let stem = source.file_stem()?;
        let directory = match export_directory {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(ANIMATED_IMAGE_EXTENSION);
        Some(directory.join(file_name))
    }

    /// Explicit save-as path, with `.gif` appended when missing
    pub fn with_extension(path: &Path) -> PathBuf {
        let has_extension = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(ANIMATED_IMAGE_EXTENSION))
            .unwrap_or(false);

        if has_extension {
            path.to_path_buf()
        } else {
            let mut raw = path.as_os_str().to_os_string();
            raw.push(".");
            raw.push(ANIMATED_IMAGE_EXTENSION);
            PathBuf::from(raw)
        }
    }
}

/// One-off overrides of the persisted strategy switches
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExportOverrides {
    pub strategy: Option<ExportStrategy>,
    pub optimize: Option<bool>,
    pub colors: Option<u16>,
}

/// Resolves the tool configuration used for a single export
pub struct ExportStrategySelector;

impl ExportStrategySelector {
    pub fn select(settings: &ExportSettings, overrides: &ExportOverrides) -> ToolConfig {
        let mut tools = ToolConfig::from(settings);
        if let Some(strategy) = overrides.strategy {
            tools.strategy = strategy;
        }
        if let Some(optimize) = overrides.optimize {
            tools.optimize = optimize;
        }
        if let Some(colors) = overrides.colors {
            tools.colors = colors;
        }
        tools
    }
}

/// Tool path validation shared by the pipeline and the session
pub struct ToolValidator;

impl ToolValidator {
    /// A tool is usable when its configured path exists on disk
    pub fn is_present(path: &Path) -> bool {
        !path.as_os_str().is_empty() && path.exists()
    }
}

#[cfg(test)]
mod tests;

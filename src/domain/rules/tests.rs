// Unit tests for business rules

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::model::*;
use crate::domain::rules::*;

#[test]
fn test_export_rate_rounds_and_defaults() {
    assert_eq!(FrameTiming::export_rate(29.97), 30);
    assert_eq!(FrameTiming::export_rate(23.976), 24);
    assert_eq!(FrameTiming::export_rate(0.2), 1);
    assert_eq!(FrameTiming::export_rate(0.0), 30);
    assert_eq!(FrameTiming::export_rate(f64::NAN), 30);
}

#[test]
fn test_skip_range_is_capped() {
    assert_eq!(
        FrameTiming::skip_range(Duration::from_secs(600)),
        Duration::from_secs(5)
    );
    assert_eq!(
        FrameTiming::skip_range(Duration::from_secs(20)),
        Duration::from_secs(2)
    );
}

#[test]
fn test_frame_step_and_delay() {
    assert_eq!(FrameTiming::frame_step(25.0), Duration::from_millis(40));
    assert_eq!(FrameTiming::sequence_delay(24), "1x24");
}

#[test]
fn test_output_path_next_to_source() {
    let derived = OutputPathResolver::derive(Path::new("/videos/holiday.mp4"), None);
    assert_eq!(derived, Some(PathBuf::from("/videos/holiday.gif")));
}

#[test]
fn test_output_path_in_export_directory() {
    let derived = OutputPathResolver::derive(
        Path::new("/videos/holiday.mp4"),
        Some(Path::new("/exports")),
    );
    assert_eq!(derived, Some(PathBuf::from("/exports/holiday.gif")));
}

#[test]
fn test_output_path_empty_export_directory_falls_back() {
    let derived =
        OutputPathResolver::derive(Path::new("/videos/holiday.mp4"), Some(Path::new("")));
    assert_eq!(derived, Some(PathBuf::from("/videos/holiday.gif")));
}

#[test]
fn test_save_as_appends_extension() {
    assert_eq!(
        OutputPathResolver::with_extension(Path::new("/tmp/clip")),
        PathBuf::from("/tmp/clip.gif")
    );
    assert_eq!(
        OutputPathResolver::with_extension(Path::new("/tmp/clip.GIF")),
        PathBuf::from("/tmp/clip.GIF")
    );
    assert_eq!(
        OutputPathResolver::with_extension(Path::new("/tmp/clip.v2")),
        PathBuf::from("/tmp/clip.v2.gif")
    );
}

#[test]
fn test_strategy_selector_applies_overrides() {
    let settings = ExportSettings {
        use_optimizer: true,
        ..ExportSettings::default()
    };

    let untouched = ExportStrategySelector::select(&settings, &ExportOverrides::default());
    assert_eq!(untouched.strategy, ExportStrategy::Direct);
    assert!(untouched.optimize);

    let overrides = ExportOverrides {
        strategy: Some(ExportStrategy::FrameSequence),
        optimize: Some(false),
        colors: Some(32),
    };
    let tools = ExportStrategySelector::select(&settings, &overrides);
    assert_eq!(tools.strategy, ExportStrategy::FrameSequence);
    assert!(!tools.optimize);
    assert_eq!(tools.colors, 32);
}

#[test]
fn test_tool_validator_rejects_empty_path() {
    assert!(!ToolValidator::is_present(Path::new("")));
    assert!(!ToolValidator::is_present(Path::new("/no/such/ffmpeg")));
}

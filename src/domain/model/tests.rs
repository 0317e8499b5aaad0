// Unit tests for domain models

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::model::*;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_trim_selector_starts_with_full_range() {
    let selector = TrimSelector::new(ms(10_000));
    assert_eq!(selector.range().start(), Duration::ZERO);
    assert_eq!(selector.range().end(), ms(10_000));
    assert_eq!(selector.length(), ms(10_000));
}

#[test]
fn test_trim_selector_scenario_from_player() {
    let mut selector = TrimSelector::new(ms(10_000));
    selector.set_start(ms(2_000));
    selector.set_end(ms(8_000));
    assert_eq!(selector.length().as_secs_f64(), 6.0);

    // Start past the out point gets pinned just before it
    let start = selector.set_start(ms(9_000));
    assert_eq!(start, ms(7_990));
    assert_eq!(selector.range().end(), ms(8_000));
}

#[test]
fn test_trim_selector_end_before_start_is_pinned() {
    let mut selector = TrimSelector::new(ms(10_000));
    selector.set_start(ms(4_000));
    let end = selector.set_end(ms(1_000));
    assert_eq!(end, ms(4_010));
}

#[test]
fn test_trim_selector_end_clamped_to_duration() {
    let mut selector = TrimSelector::new(ms(10_000));
    assert_eq!(selector.set_end(ms(60_000)), ms(10_000));
}

#[test]
fn test_trim_selector_set_start_idempotent() {
    let mut selector = TrimSelector::new(ms(10_000));
    selector.set_start(ms(3_500));
    let first = selector.range();
    selector.set_start(ms(3_500));
    assert_eq!(selector.range(), first);
}

#[test]
fn test_trim_selector_invariant_holds_for_any_sequence() {
    let mut selector = TrimSelector::new(ms(5_000));
    let candidates = [0, 1, 9, 10, 11, 2_500, 4_990, 4_995, 5_000, 5_001, 99_999];

    for (i, a) in candidates.iter().enumerate() {
        for b in candidates.iter().skip(i % 3) {
            selector.set_start(ms(*a));
            assert!(selector.range().start() < selector.range().end());
            selector.set_end(ms(*b));
            assert!(selector.range().start() < selector.range().end());
            assert!(selector.range().end() <= selector.duration());
        }
    }
}

#[test]
fn test_trim_selector_reset_restores_full_range() {
    let mut selector = TrimSelector::new(ms(10_000));
    selector.set_start(ms(1_000));
    selector.set_end(ms(2_000));
    selector.reset(ms(3_000));
    assert_eq!(selector.range().start(), Duration::ZERO);
    assert_eq!(selector.range().end(), ms(3_000));
}

#[test]
fn test_trim_selector_zero_duration_keeps_order() {
    let selector = TrimSelector::new(Duration::ZERO);
    assert!(selector.range().start() < selector.range().end());
}

#[test]
fn test_pipeline_transitions() {
    use PipelineState::*;
    assert!(Idle.can_transition_to(ValidatingTools));
    assert!(Transcoding.can_transition_to(FrameSequenceConversion));
    assert!(Transcoding.can_transition_to(Finalizing));
    assert!(Optimizing.can_transition_to(Aborted));
    assert!(Finalizing.can_transition_to(Idle));

    assert!(!Idle.can_transition_to(Transcoding));
    assert!(!Idle.can_transition_to(Aborted));
    assert!(!Aborted.can_transition_to(ValidatingTools));
    assert!(!Optimizing.can_transition_to(Transcoding));
}

#[test]
fn test_settings_defaults() {
    let settings = ExportSettings::default();
    assert!(!settings.use_frame_sequence);
    assert!(!settings.use_optimizer);
    assert!(!settings.auto_close);
    assert_eq!(settings.export_directory, None);
    assert_eq!(settings.optimizer_colors, 256);
    assert_eq!(settings.strategy(), ExportStrategy::Direct);
}

#[test]
fn test_settings_first_run_ignores_missing_home() {
    let settings = ExportSettings::first_run(Some(PathBuf::from("/definitely/not/here")));
    assert_eq!(settings.last_opened_directory, PathBuf::new());
}

#[test]
fn test_tool_config_from_settings() {
    let settings = ExportSettings {
        transcoder_path: PathBuf::from("/opt/ffmpeg"),
        use_frame_sequence: true,
        use_optimizer: true,
        optimizer_colors: 64,
        ..ExportSettings::default()
    };
    let tools = ToolConfig::from(&settings);
    assert_eq!(tools.path(ToolKind::Transcoder), PathBuf::from("/opt/ffmpeg"));
    assert_eq!(tools.strategy, ExportStrategy::FrameSequence);
    assert!(tools.optimize);
    assert_eq!(tools.colors, 64);
}

#[test]
fn test_export_strategy_parse() {
    assert_eq!(ExportStrategy::parse("direct"), Some(ExportStrategy::Direct));
    assert_eq!(ExportStrategy::parse("Frame-Sequence"), Some(ExportStrategy::FrameSequence));
    assert_eq!(ExportStrategy::parse("bogus"), None);
}

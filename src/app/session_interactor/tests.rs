use std::fs;

use super::*;
use crate::adapters::{FsLocalAdapter, TomlSettingsStore};
use crate::app::status::StatusBoard;
use crate::domain::errors::{ProbeError, ToolError};
use crate::error::GifferError;
use crate::planner::invocation::ToolInvocation;

struct FixedProbe;

impl ProbePort for FixedProbe {
    fn probe(&self, source: &Path) -> Result<MediaInfo, ProbeError> {
        if source.file_name().and_then(|n| n.to_str()) == Some("missing.mp4") {
            return Err(ProbeError::NotFound(source.to_path_buf()));
        }
        Ok(MediaInfo {
            path: source.to_path_buf(),
            duration: Duration::from_secs(10),
            frame_rate: 25.0,
            width: 320,
            height: 240,
            codec: "h264".to_string(),
        })
    }
}

#[derive(Default)]
struct ManualPlayback {
    duration: Duration,
    position: Duration,
    playing: bool,
}

impl PlaybackPort for ManualPlayback {
    fn load(&mut self, media: &MediaInfo) {
        self.duration = media.duration;
        self.position = Duration::ZERO;
        self.playing = false;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_position(&mut self, position: Duration) {
        self.position = position;
    }
}

/// Writes the tool name into whatever file the call is expected to produce
struct MarkerRunner;

impl ToolRunner for MarkerRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutcome, ToolError> {
        if let Some(output) = &invocation.expected_output {
            fs::write(output, invocation.tool.program_name()).unwrap();
        }
        Ok(ToolOutcome::default())
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    settings: Arc<TomlSettingsStore>,
    status: Arc<StatusBoard>,
    session: Session,
}

fn fixture(configure: impl FnOnce(&mut ExportSettings, &Path)) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let tool = dir.path().join("ffmpeg");
    fs::write(&tool, b"").unwrap();
    fs::create_dir(dir.path().join("scratch")).unwrap();

    let settings = Arc::new(TomlSettingsStore::new(dir.path().join("settings.toml")));
    let mut record = ExportSettings::default();
    record.transcoder_path = tool;
    configure(&mut record, dir.path());
    settings.save(&record).unwrap();

    let status = Arc::new(StatusBoard::new());
    let exporter = Arc::new(ExportInteractor::new(
        settings.clone(),
        Arc::new(MarkerRunner),
        Arc::new(FsLocalAdapter::with_scratch_root(dir.path().join("scratch"))),
        status.clone(),
    ));
    let session = Session::new(
        Arc::new(FixedProbe),
        settings.clone(),
        exporter,
        status.clone(),
        Box::new(ManualPlayback::default()),
    );

    Fixture {
        dir,
        settings,
        status,
        session,
    }
}

#[test]
fn test_open_resets_trim_and_remembers_directory() {
    let mut f = fixture(|_, _| {});
    let source = f.dir.path().join("videos").join("clip.mp4");

    f.session.set_start(Duration::from_secs(3));
    f.session.open(&source).unwrap();

    assert_eq!(f.session.trim().range().start(), Duration::ZERO);
    assert_eq!(f.session.trim().range().end(), Duration::from_secs(10));
    assert_eq!(
        f.settings.load().unwrap().last_opened_directory,
        f.dir.path().join("videos")
    );
}

#[test]
fn test_open_failure_reports_status() {
    let mut f = fixture(|_, _| {});
    let err = f.session.open(Path::new("missing.mp4")).unwrap_err();
    assert!(matches!(err, GifferError::Probe(ProbeError::NotFound(_))));
    assert_eq!(f.status.current().unwrap().level, StatusLevel::Error);
    assert!(f.session.media().is_none());
}

#[test]
fn test_mark_points_from_playhead() {
    let mut f = fixture(|_, _| {});
    f.session.open(&f.dir.path().join("clip.mp4")).unwrap();

    f.session.player_mut().seek(Duration::from_millis(2_000));
    f.session.mark_start();
    f.session.player_mut().seek(Duration::from_millis(8_000));
    f.session.mark_end();
    assert_eq!(f.session.trim().length().as_secs_f64(), 6.0);

    f.session.player_mut().seek(Duration::from_millis(9_000));
    assert_eq!(f.session.mark_start(), Duration::from_millis(7_990));
}

#[test]
fn test_navigation_keys() {
    let mut f = fixture(|_, _| {});
    f.session.open(&f.dir.path().join("clip.mp4")).unwrap();

    // Skip range is a tenth of 10 s
    f.session.handle_key(SessionKey::SkipForward);
    assert_eq!(f.session.player().position(), Duration::from_secs(1));

    f.session.handle_key(SessionKey::TogglePlay);
    assert!(f.session.player().is_playing());
    f.session.handle_key(SessionKey::SkipBackward);
    assert!(f.session.player().is_playing());
    assert_eq!(f.session.player().position(), Duration::ZERO);

    // Frame steps pause first; 25 fps is 40 ms per frame
    f.session.handle_key(SessionKey::FrameForward);
    assert!(!f.session.player().is_playing());
    assert_eq!(f.session.player().position(), Duration::from_millis(40));
    f.session.handle_key(SessionKey::FrameBackward);
    f.session.handle_key(SessionKey::FrameBackward);
    assert_eq!(f.session.player().position(), Duration::ZERO);

    f.session.player_mut().seek(Duration::from_secs(30));
    assert_eq!(f.session.player().position(), Duration::from_secs(10));
    f.session.handle_key(SessionKey::Rewind);
    assert_eq!(f.session.player().position(), Duration::ZERO);
}

#[test]
fn test_export_without_media() {
    let mut f = fixture(|_, _| {});
    let err = f.session.export().unwrap_err();
    assert!(matches!(err, GifferError::Export(ExportError::NoMedia)));
    assert_eq!(f.status.current().unwrap().level, StatusLevel::Error);
}

#[test]
fn test_export_next_to_source_and_auto_close() {
    let mut f = fixture(|s, _| s.auto_close = true);
    let source = f.dir.path().join("clip.mp4");
    f.session.open(&source).unwrap();

    assert_eq!(f.session.export_path().unwrap(), f.dir.path().join("clip.gif"));
    let report = f.session.export().unwrap();

    assert_eq!(report.output, f.dir.path().join("clip.gif"));
    assert_eq!(fs::read_to_string(&report.output).unwrap(), "ffmpeg");
    assert!(f.session.should_close());
    assert_eq!(
        f.status.current().unwrap().message,
        crate::app::export_interactor::FINISHED_MESSAGE
    );
}

#[test]
fn test_export_to_appends_extension() {
    let mut f = fixture(|s, root| s.export_directory = Some(root.join("ignored")));
    f.session.open(&f.dir.path().join("clip.mp4")).unwrap();

    let target = f.dir.path().join("out").join("party");
    let report = f.session.export_to(&target).unwrap();
    assert_eq!(report.output, f.dir.path().join("out").join("party.gif"));
    assert!(report.output.is_file());
    assert!(!f.session.should_close());
}

#[test]
fn test_startup_check_flags_missing_transcoder() {
    let f = fixture(|s, root| s.transcoder_path = root.join("nope").join("ffmpeg"));
    assert!(!f.session.startup_check());
    let line = f.status.current().unwrap();
    assert_eq!(line.level, StatusLevel::Error);
    assert!(line.message.starts_with("Invalid ffmpeg path!"));

    let ok = fixture(|_, _| {});
    assert!(ok.session.startup_check());
}

#[test]
fn test_toggle_after_clip_finishes_plays_again() {
    let mut player = PlaybackController::new(Box::new(crate::adapters::ClockPlayback::new()));
    player.load(&MediaInfo {
        path: PathBuf::from("short.mp4"),
        duration: Duration::from_millis(30),
        frame_rate: 30.0,
        width: 320,
        height: 240,
        codec: "h264".to_string(),
    });
    player.toggle();
    std::thread::sleep(Duration::from_millis(60));
    assert!(!player.is_playing());

    player.toggle();
    assert!(player.is_playing());
}

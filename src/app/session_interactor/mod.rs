// Session interactor - Player, trim points and export for one open video

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::app::export_interactor::{ExportInteractor, ExportRequest};
use crate::domain::errors::ExportError;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::error::GifferResult;
use crate::ports::*;

/// Keyboard shortcuts of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    /// D
    TogglePlay,
    /// E
    Rewind,
    /// Left
    SkipBackward,
    /// Right
    SkipForward,
    /// Comma
    FrameBackward,
    /// Period
    FrameForward,
}

impl SessionKey {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'd' => Some(SessionKey::TogglePlay),
            'e' => Some(SessionKey::Rewind),
            ',' => Some(SessionKey::FrameBackward),
            '.' => Some(SessionKey::FrameForward),
            _ => None,
        }
    }
}

/// Thin wrapper over the playback primitive; every move is clamped to the media
pub struct PlaybackController {
    playback: Box<dyn PlaybackPort>,
    frame_rate: f64,
}

impl PlaybackController {
    pub fn new(playback: Box<dyn PlaybackPort>) -> Self {
        Self {
            playback,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }

    pub fn load(&mut self, media: &MediaInfo) {
        self.playback.load(media);
        self.frame_rate = media.frame_rate;
    }

    pub fn position(&self) -> Duration {
        self.playback.position()
    }

    pub fn duration(&self) -> Duration {
        self.playback.duration()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn play(&mut self) {
        self.playback.play();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn seek(&mut self, position: Duration) {
        self.playback.set_position(position.min(self.duration()));
    }

    pub fn step_forward(&mut self, delta: Duration) {
        let target = self.position().saturating_add(delta);
        self.seek(target);
    }

    pub fn step_backward(&mut self, delta: Duration) {
        let target = self.position().saturating_sub(delta);
        self.seek(target);
    }

    pub fn rewind(&mut self) {
        self.seek(Duration::ZERO);
    }

    pub fn skip_range(&self) -> Duration {
        FrameTiming::skip_range(self.duration())
    }

    pub fn frame_step(&self) -> Duration {
        FrameTiming::frame_step(self.frame_rate)
    }

    /// Pause, then move one frame forward
    pub fn frame_forward(&mut self) {
        self.pause();
        let step = self.frame_step();
        self.step_forward(step);
    }

    /// Pause, then move one frame back
    pub fn frame_backward(&mut self) {
        self.pause();
        let step = self.frame_step();
        self.step_backward(step);
    }
}

/// One interactive editing session
pub struct Session {
    probe: Arc<dyn ProbePort>,
    settings: Arc<dyn SettingsPort>,
    exporter: Arc<ExportInteractor>,
    status: Arc<dyn StatusPort>,
    player: PlaybackController,
    media: Option<MediaInfo>,
    trim: TrimSelector,
    closed: bool,
}

impl Session {
    pub fn new(
        probe: Arc<dyn ProbePort>,
        settings: Arc<dyn SettingsPort>,
        exporter: Arc<ExportInteractor>,
        status: Arc<dyn StatusPort>,
        playback: Box<dyn PlaybackPort>,
    ) -> Self {
        Self {
            probe,
            settings,
            exporter,
            status,
            player: PlaybackController::new(playback),
            media: None,
            trim: TrimSelector::new(Duration::ZERO),
            closed: false,
        }
    }

    /// Warn up front when the transcoder is not configured; returns whether it is
    pub fn startup_check(&self) -> bool {
        let transcoder = match self.settings.load() {
            Ok(settings) => settings.transcoder_path,
            Err(e) => {
                self.status.show(StatusLevel::Error, &e.to_string());
                return false;
            }
        };

        if ToolValidator::is_present(&transcoder) {
            return true;
        }
        let error = ExportError::MissingTool {
            tool: ToolKind::Transcoder,
            path: transcoder,
        };
        self.status.show(StatusLevel::Error, &error.to_string());
        false
    }

    /// Load a video, reset the trim range and remember its directory
    pub fn open(&mut self, path: &Path) -> GifferResult<&MediaInfo> {
        let media = match self.probe.probe(path) {
            Ok(media) => media,
            Err(e) => {
                self.status.show(StatusLevel::Error, &e.to_string());
                return Err(e.into());
            }
        };
        info!(
            path = %media.path.display(),
            duration_ms = media.duration.as_millis() as u64,
            fps = media.frame_rate,
            "Opened video"
        );

        self.player.load(&media);
        self.trim.reset(media.duration);
        self.remember_directory(path);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.status.show(StatusLevel::Info, &format!("Loaded {}", name));
        Ok(self.media.insert(media))
    }

    fn remember_directory(&self, path: &Path) {
        let directory = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(directory) => directory.to_path_buf(),
            None => return,
        };
        let result = self.settings.load().and_then(|mut settings| {
            settings.last_opened_directory = directory;
            self.settings.save(&settings)
        });
        if let Err(e) = result {
            warn!(error = %e, "Could not record last opened directory");
        }
    }

    pub fn media(&self) -> Option<&MediaInfo> {
        self.media.as_ref()
    }

    pub fn trim(&self) -> &TrimSelector {
        &self.trim
    }

    pub fn player(&self) -> &PlaybackController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlaybackController {
        &mut self.player
    }

    /// Set the in point at the playhead
    pub fn mark_start(&mut self) -> Duration {
        let position = self.player.position();
        self.set_start(position)
    }

    /// Set the out point at the playhead
    pub fn mark_end(&mut self) -> Duration {
        let position = self.player.position();
        self.set_end(position)
    }

    pub fn set_start(&mut self, candidate: Duration) -> Duration {
        let start = self.trim.set_start(candidate);
        debug!(start_ms = start.as_millis() as u64, "Trim start");
        start
    }

    pub fn set_end(&mut self, candidate: Duration) -> Duration {
        let end = self.trim.set_end(candidate);
        debug!(end_ms = end.as_millis() as u64, "Trim end");
        end
    }

    pub fn handle_key(&mut self, key: SessionKey) {
        match key {
            SessionKey::TogglePlay => self.player.toggle(),
            SessionKey::Rewind => self.player.rewind(),
            SessionKey::SkipBackward => {
                let range = self.player.skip_range();
                self.player.step_backward(range);
            }
            SessionKey::SkipForward => {
                let range = self.player.skip_range();
                self.player.step_forward(range);
            }
            SessionKey::FrameBackward => self.player.frame_backward(),
            SessionKey::FrameForward => self.player.frame_forward(),
        }
    }

    /// Where `export` would write
    pub fn export_path(&self) -> GifferResult<PathBuf> {
        let media = self.media.as_ref().ok_or(ExportError::NoMedia)?;
        self.exporter.default_output(&media.path)
    }

    /// Export the trim range to the derived path
    pub fn export(&mut self) -> GifferResult<ExportReport> {
        self.run_export(None)
    }

    /// Export the trim range to `path`, appending `.gif` when missing
    pub fn export_to(&mut self, path: &Path) -> GifferResult<ExportReport> {
        self.run_export(Some(path.to_path_buf()))
    }

    fn run_export(&mut self, output: Option<PathBuf>) -> GifferResult<ExportReport> {
        let media = match self.media.as_ref() {
            Some(media) => media,
            None => {
                let error = ExportError::NoMedia;
                self.status.show(StatusLevel::Error, &error.to_string());
                return Err(error.into());
            }
        };

        self.player.pause();
        let mut request =
            ExportRequest::new(media.path.clone(), self.trim.range(), media.export_frame_rate());
        request.output = output;

        let report = self.exporter.execute(&request)?;
        match self.settings.load() {
            Ok(settings) if settings.auto_close => {
                info!("Auto close enabled, ending session");
                self.closed = true;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not read auto close setting"),
        }
        Ok(report)
    }

    /// Set once a successful export hits the auto close setting
    pub fn should_close(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests;

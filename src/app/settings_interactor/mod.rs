// Settings interactor - Settings panel operations and the shell shortcut

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::SettingsError;
use crate::domain::model::*;
use crate::error::GifferResult;
use crate::ports::*;
use crate::utils::path::PathUtils;

/// Explorer context-menu verb
pub const SHORTCUT_KEY: &str = r"*\shell\Open with Giffer";

/// Command run by the verb
pub const SHORTCUT_COMMAND_KEY: &str = r"*\shell\Open with Giffer\Command";

/// Menu text of the verb
pub const SHORTCUT_LABEL: &str = "Open with Giffer";

/// `"<exe>" "%1"`
pub fn shortcut_command(exe: &Path) -> String {
    format!("\"{}\" \"%1\"", exe.display())
}

/// Settings addressable by name from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    TranscoderPath,
    FrameSequenceToolPath,
    OptimizerPath,
    UseFrameSequence,
    UseOptimizer,
    ExportDirectory,
    AutoClose,
    OptimizerColors,
    LastOpenedDirectory,
}

impl SettingKey {
    pub const ALL: [SettingKey; 9] = [
        SettingKey::TranscoderPath,
        SettingKey::FrameSequenceToolPath,
        SettingKey::OptimizerPath,
        SettingKey::UseFrameSequence,
        SettingKey::UseOptimizer,
        SettingKey::ExportDirectory,
        SettingKey::AutoClose,
        SettingKey::OptimizerColors,
        SettingKey::LastOpenedDirectory,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::TranscoderPath => "transcoder_path",
            SettingKey::FrameSequenceToolPath => "frame_sequence_tool_path",
            SettingKey::OptimizerPath => "optimizer_path",
            SettingKey::UseFrameSequence => "use_frame_sequence",
            SettingKey::UseOptimizer => "use_optimizer",
            SettingKey::ExportDirectory => "export_directory",
            SettingKey::AutoClose => "auto_close",
            SettingKey::OptimizerColors => "optimizer_colors",
            SettingKey::LastOpenedDirectory => "last_opened_directory",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        let alias = match key.as_str() {
            "ffmpeg" => Some(SettingKey::TranscoderPath),
            "convert" => Some(SettingKey::FrameSequenceToolPath),
            "gifsicle" => Some(SettingKey::OptimizerPath),
            "colors" => Some(SettingKey::OptimizerColors),
            _ => None,
        };
        alias
            .or_else(|| SettingKey::ALL.into_iter().find(|k| k.name() == key))
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

fn parse_bool(key: SettingKey, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Palette sizes gifsicle accepts as a power of two
fn parse_colors(value: &str) -> Result<u16, SettingsError> {
    let invalid = || SettingsError::InvalidValue {
        key: SettingKey::OptimizerColors.to_string(),
        value: value.to_string(),
    };
    let colors: u16 = value.trim().parse().map_err(|_| invalid())?;
    if !(2..=256).contains(&colors) || !colors.is_power_of_two() {
        return Err(invalid());
    }
    Ok(colors)
}

/// Interactor behind the settings panel
pub struct SettingsInteractor {
    settings: Arc<dyn SettingsPort>,
    shell: Arc<dyn ShellIntegrationPort>,
}

impl SettingsInteractor {
    pub fn new(settings: Arc<dyn SettingsPort>, shell: Arc<dyn ShellIntegrationPort>) -> Self {
        Self { settings, shell }
    }

    pub fn load(&self) -> GifferResult<ExportSettings> {
        Ok(self.settings.load()?)
    }

    pub fn location(&self) -> PathBuf {
        self.settings.location().to_path_buf()
    }

    /// Call `listener` with the new record after every save
    pub fn on_change(&self, listener: SettingsListener) {
        self.settings.subscribe(listener);
    }

    /// Load, modify, save
    fn update<F>(&self, change: F) -> GifferResult<ExportSettings>
    where
        F: FnOnce(&mut ExportSettings),
    {
        let mut settings = self.settings.load()?;
        change(&mut settings);
        self.settings.save(&settings)?;
        Ok(settings)
    }

    pub fn set_tool_path(&self, tool: ToolKind, raw: &str) -> GifferResult<ExportSettings> {
        let path = PathUtils::clean_user_path(raw);
        info!(%tool, path = %path.display(), "Setting tool path");
        self.update(|s| match tool {
            ToolKind::Transcoder => s.transcoder_path = path,
            ToolKind::FrameSequence => s.frame_sequence_tool_path = path,
            ToolKind::Optimizer => s.optimizer_path = path,
        })
    }

    pub fn set_use_frame_sequence(&self, enabled: bool) -> GifferResult<ExportSettings> {
        self.update(|s| s.use_frame_sequence = enabled)
    }

    pub fn set_use_optimizer(&self, enabled: bool) -> GifferResult<ExportSettings> {
        self.update(|s| s.use_optimizer = enabled)
    }

    /// `None` exports next to the source again
    pub fn set_export_directory(&self, directory: Option<&str>) -> GifferResult<ExportSettings> {
        let directory = directory
            .map(PathUtils::clean_user_path)
            .filter(|p| !p.as_os_str().is_empty());
        self.update(|s| s.export_directory = directory)
    }

    pub fn set_auto_close(&self, enabled: bool) -> GifferResult<ExportSettings> {
        self.update(|s| s.auto_close = enabled)
    }

    pub fn set_colors(&self, colors: &str) -> GifferResult<ExportSettings> {
        let colors = parse_colors(colors)?;
        self.update(|s| s.optimizer_colors = colors)
    }

    /// Record the directory media was last opened from
    pub fn remember_directory(&self, directory: &Path) -> GifferResult<ExportSettings> {
        let directory = directory.to_path_buf();
        self.update(|s| s.last_opened_directory = directory)
    }

    /// Set any setting from its textual form
    pub fn set(&self, key: &str, value: &str) -> GifferResult<ExportSettings> {
        let key: SettingKey = key.parse()?;
        match key {
            SettingKey::TranscoderPath => self.set_tool_path(ToolKind::Transcoder, value),
            SettingKey::FrameSequenceToolPath => self.set_tool_path(ToolKind::FrameSequence, value),
            SettingKey::OptimizerPath => self.set_tool_path(ToolKind::Optimizer, value),
            SettingKey::UseFrameSequence => self.set_use_frame_sequence(parse_bool(key, value)?),
            SettingKey::UseOptimizer => self.set_use_optimizer(parse_bool(key, value)?),
            SettingKey::ExportDirectory => self.set_export_directory(Some(value)),
            SettingKey::AutoClose => self.set_auto_close(parse_bool(key, value)?),
            SettingKey::OptimizerColors => self.set_colors(value),
            SettingKey::LastOpenedDirectory => {
                self.remember_directory(&PathUtils::clean_user_path(value))
            }
        }
    }

    /// Whether the "Open with Giffer" shortcut is installed
    pub fn shortcut_installed(&self) -> GifferResult<bool> {
        Ok(self.shell.exists(SHORTCUT_COMMAND_KEY)?)
    }

    /// Install the shortcut pointing at `exe`
    pub fn install_shortcut(&self, exe: &Path) -> GifferResult<()> {
        self.shell.create(SHORTCUT_KEY, SHORTCUT_LABEL)?;
        self.shell
            .create(SHORTCUT_COMMAND_KEY, &shortcut_command(exe))?;
        info!(exe = %exe.display(), "Installed right click shortcut");
        Ok(())
    }

    /// Remove the shortcut; keys that are already gone are skipped
    pub fn remove_shortcut(&self) -> GifferResult<()> {
        for key in [SHORTCUT_COMMAND_KEY, SHORTCUT_KEY] {
            if self.shell.exists(key)? {
                self.shell.delete(key)?;
            }
        }
        info!("Removed right click shortcut");
        Ok(())
    }
}

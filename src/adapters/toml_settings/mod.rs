// TOML settings adapter - Persists the settings record as a TOML file

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::domain::errors::SettingsError;
use crate::domain::model::ExportSettings;
use crate::ports::{SettingsListener, SettingsPort};

/// Settings file name inside the configuration directory
pub const SETTINGS_FILE_NAME: &str = "giffer_settings.toml";

/// TOML-backed settings store
pub struct TomlSettingsStore {
    path: PathBuf,
    listeners: Mutex<Vec<SettingsListener>>,
}

impl TomlSettingsStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            listeners: Mutex::new(Vec::new()),
        }
    }

    fn write(&self, settings: &ExportSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, content).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn notify(&self, settings: &ExportSettings) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for listener in listeners.iter() {
            listener(settings);
        }
    }
}

impl SettingsPort for TomlSettingsStore {
    fn load(&self) -> Result<ExportSettings, SettingsError> {
        if !self.path.exists() {
            let settings = ExportSettings::first_run(dirs::home_dir());
            info!(path = %self.path.display(), "Creating default settings file");
            self.write(&settings)?;
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| SettingsError::Read {
            path: self.path.clone(),
            source,
        })?;
        let settings = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Loaded settings");
        Ok(settings)
    }

    fn save(&self, settings: &ExportSettings) -> Result<(), SettingsError> {
        self.write(settings)?;
        debug!(path = %self.path.display(), "Saved settings");
        self.notify(settings);
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }

    fn subscribe(&self, listener: SettingsListener) {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_load_creates_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);
        let store = TomlSettingsStore::new(&path);

        let settings = store.load().unwrap();
        assert!(path.exists());
        assert!(!settings.use_optimizer);
        assert!(!settings.use_frame_sequence);
        assert_eq!(settings.transcoder_path, PathBuf::new());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::new(dir.path().join(SETTINGS_FILE_NAME));

        let mut settings = store.load().unwrap();
        settings.use_optimizer = true;
        settings.optimizer_path = PathBuf::from("/usr/bin/gifsicle");
        settings.export_directory = Some(PathBuf::from("/tmp/gifs"));
        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "use_optimizer = true\n").unwrap();

        let settings = TomlSettingsStore::new(&path).load().unwrap();
        assert!(settings.use_optimizer);
        assert_eq!(settings.optimizer_colors, 256);
        assert_eq!(settings.export_directory, None);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "use_optimizer = [").unwrap();

        let err = TomlSettingsStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_listeners_fire_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlSettingsStore::new(dir.path().join(SETTINGS_FILE_NAME));
        let calls = Arc::new(AtomicUsize::new(0));

        let seen = calls.clone();
        store.subscribe(Box::new(move |settings: &ExportSettings| {
            assert!(settings.auto_close);
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        let mut settings = store.load().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        settings.auto_close = true;
        store.save(&settings).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

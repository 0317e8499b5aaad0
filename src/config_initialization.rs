//! Settings file location and precedence

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapters::toml_settings::SETTINGS_FILE_NAME;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "GIFFER_SETTINGS";

/// Resolve the settings file: CLI > environment > config dir > working dir
pub fn resolve_settings_path(cli_path: Option<&Path>) -> PathBuf {
    let env_path = std::env::var_os(SETTINGS_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let path = settings_path_from(cli_path, env_path, dirs::config_dir());
    debug!(path = %path.display(), "Resolved settings file");
    path
}

fn settings_path_from(
    cli_path: Option<&Path>,
    env_path: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = cli_path {
        return path.to_path_buf();
    }
    if let Some(path) = env_path {
        return path;
    }
    match config_dir {
        Some(dir) => dir.join("giffer").join(SETTINGS_FILE_NAME),
        None => PathBuf::from(SETTINGS_FILE_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        let cli = PathBuf::from("/cli/settings.toml");
        let env = PathBuf::from("/env/settings.toml");
        let config = PathBuf::from("/home/u/.config");

        assert_eq!(
            settings_path_from(Some(&cli), Some(env.clone()), Some(config.clone())),
            cli
        );
        assert_eq!(
            settings_path_from(None, Some(env.clone()), Some(config.clone())),
            env
        );
        assert_eq!(
            settings_path_from(None, None, Some(config.clone())),
            config.join("giffer").join(SETTINGS_FILE_NAME)
        );
        assert_eq!(
            settings_path_from(None, None, None),
            PathBuf::from(SETTINGS_FILE_NAME)
        );
    }
}

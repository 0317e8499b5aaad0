//! Path utilities for user-entered locations

use std::path::PathBuf;

/// Path helpers
pub struct PathUtils;

impl PathUtils {
    /// Clean a path typed or pasted by the user
    ///
    /// Strips surrounding whitespace and one pair of matching quotes (as
    /// Explorer's "Copy as path" adds), then expands a leading `~`.
    pub fn clean_user_path(raw: &str) -> PathBuf {
        let trimmed = raw.trim();
        let unquoted = ['"', '\'']
            .iter()
            .find_map(|q| {
                trimmed
                    .strip_prefix(*q)
                    .and_then(|rest| rest.strip_suffix(*q))
            })
            .unwrap_or(trimmed);

        Self::expand_home(unquoted)
    }

    fn expand_home(path: &str) -> PathBuf {
        let rest = match path.strip_prefix('~') {
            Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
            _ => return PathBuf::from(path),
        };
        match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
            None => PathBuf::from(path),
        }
    }
}

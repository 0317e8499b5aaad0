// Local filesystem adapter - File system operations for the export pipeline

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::engine::scratch::ScratchDir;
use crate::ports::FsPort;

/// Local filesystem adapter
#[derive(Debug, Clone)]
pub struct FsLocalAdapter {
    scratch_root: PathBuf,
}

impl Default for FsLocalAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FsLocalAdapter {
    /// Scratch directories go under the system temp directory
    pub fn new() -> Self {
        Self {
            scratch_root: std::env::temp_dir(),
        }
    }

    /// Scratch directories go under `root` instead
    pub fn with_scratch_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            scratch_root: root.into(),
        }
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    fn has_extension(path: &Path, extension: &str) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false)
    }
}

impl FsPort for FsLocalAdapter {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_scratch_dir(&self) -> io::Result<ScratchDir> {
        fs::create_dir_all(&self.scratch_root)?;
        ScratchDir::create_in(&self.scratch_root)
    }

    fn create_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn count_files(&self, dir: &Path, extension: &str) -> io::Result<usize> {
        let mut count = 0;
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() && Self::has_extension(entry.path(), extension) {
                count += 1;
            }
        }
        Ok(count)
    }

    fn replace_file(&self, candidate: &Path, destination: &Path) -> io::Result<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if destination.exists() {
            debug!(destination = %destination.display(), "Removing existing file");
            fs::remove_file(destination)?;
        }

        if let Err(e) = fs::rename(candidate, destination) {
            // Scratch and destination on different volumes
            warn!(error = %e, "Rename failed, copying instead");
            fs::copy(candidate, destination)?;
            fs::remove_file(candidate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_dir_under_configured_root() {
        let root = tempfile::tempdir().unwrap();
        let fs_port = FsLocalAdapter::with_scratch_root(root.path().join("scratch"));

        let scratch = fs_port.create_scratch_dir().unwrap();
        assert!(scratch.path().starts_with(root.path().join("scratch")));
        assert!(scratch.path().is_dir());
    }

    #[test]
    fn test_count_files_matches_extension_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["temp_image0001.png", "temp_image0002.PNG", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let fs_port = FsLocalAdapter::new();
        assert_eq!(fs_port.count_files(dir.path(), "png").unwrap(), 2);
    }

    #[test]
    fn test_replace_file_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("Temp.gif");
        let destination = dir.path().join("out").join("clip.gif");
        fs::write(&candidate, b"new").unwrap();
        fs::create_dir_all(destination.parent().unwrap()).unwrap();
        fs::write(&destination, b"old").unwrap();

        let fs_port = FsLocalAdapter::new();
        fs_port.replace_file(&candidate, &destination).unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"new");
        assert!(!candidate.exists());
    }

    #[test]
    fn test_replace_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = dir.path().join("Temp.gif");
        let destination = dir.path().join("a").join("b").join("clip.gif");
        fs::write(&candidate, b"gif").unwrap();

        FsLocalAdapter::new()
            .replace_file(&candidate, &destination)
            .unwrap();
        assert!(destination.is_file());
    }
}

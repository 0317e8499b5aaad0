//! Per-job scratch directory

use std::path::Path;

use tempfile::TempDir;

/// Uniquely named working directory owned by exactly one export job
///
/// [`ScratchDir::close`] removes it and consumes the guard, so removal happens
/// once. If the guard is dropped without closing (a panic mid-export), the
/// inner `TempDir` still removes the directory.
#[derive(Debug)]
pub struct ScratchDir {
    inner: TempDir,
}

impl ScratchDir {
    pub const PREFIX: &'static str = "giffer-";

    /// Create a fresh directory under `root`
    pub fn create_in(root: &Path) -> std::io::Result<Self> {
        let inner = tempfile::Builder::new()
            .prefix(Self::PREFIX)
            .tempdir_in(root)?;
        Ok(Self { inner })
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Remove the directory and everything in it
    pub fn close(self) -> std::io::Result<()> {
        self.inner.close()
    }
}

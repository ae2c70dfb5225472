//! The session-scoped cache directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::item::default_image_path;

const BACKGROUND_FILE: &str = "background.jpg";

/// Owns the cache directory for one run.  Items remove their own files; the
/// session removes what is shared (the fallback image and the background)
/// and then the directory itself.
#[derive(Debug)]
pub struct CacheSession {
    dir: PathBuf,
}

impl CacheSession {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        tracing::info!(dir = %dir.display(), "cache directory ready");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn background_path(&self) -> PathBuf {
        self.dir.join(BACKGROUND_FILE)
    }

    pub fn default_image_path(&self) -> PathBuf {
        default_image_path(&self.dir)
    }

    /// Remove the shared files and the directory.  Call after the carousel
    /// has been torn down.
    pub fn close(self) -> Result<()> {
        for path in [self.background_path(), self.default_image_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        if let Err(e) = fs::remove_dir(&self.dir) {
            // Anything still in there was not ours to delete.
            tracing::warn!(dir = %self.dir.display(), error = %e, "cache directory left behind");
            return Err(e.into());
        }
        tracing::info!(dir = %self.dir.display(), "cache directory removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_removes_shared_files_and_directory() {
        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().join("cache");
        let session = CacheSession::open(&dir).unwrap();
        fs::write(session.background_path(), b"bg").unwrap();
        fs::write(session.default_image_path(), b"default").unwrap();

        session.close().unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn close_tolerates_missing_shared_files() {
        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().join("cache");
        CacheSession::open(&dir).unwrap().close().unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn close_keeps_foreign_files() {
        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().join("cache");
        let session = CacheSession::open(&dir).unwrap();
        fs::write(dir.join("notes.txt"), b"keep me").unwrap();

        assert!(session.close().is_err());
        assert!(dir.join("notes.txt").exists());
    }
}

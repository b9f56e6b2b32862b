//! Read-only filesystem store for images referenced by posts and tool cards.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid media path")]
    InvalidPath,
    #[error("media file not found")]
    NotFound,
    #[error(transparent)]
    Io(std::io::Error),
}

impl From<std::io::Error> for MediaError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => MediaError::NotFound,
            _ => MediaError::Io(err),
        }
    }
}

/// Media rooted at `site.media_dir`; URLs map one-to-one onto files below it.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn read(&self, path: &str) -> Result<Bytes, MediaError> {
        let absolute = self.resolve(path)?;
        let metadata = fs::metadata(&absolute).await?;
        if !metadata.is_file() {
            return Err(MediaError::NotFound);
        }
        let data = fs::read(absolute).await?;
        Ok(Bytes::from(data))
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, MediaError> {
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(MediaError::InvalidPath);
        }
        let relative = Path::new(trimmed);
        if relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(MediaError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_files_below_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("blog")).expect("mkdir");
        std::fs::write(dir.path().join("blog/cover.png"), b"png").expect("write");

        let store = MediaStore::new(dir.path());
        let bytes = store.read("/blog/cover.png").await.expect("read");
        assert_eq!(&bytes[..], b"png");
    }

    #[tokio::test]
    async fn rejects_traversal_and_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("blog")).expect("mkdir");
        let store = MediaStore::new(dir.path().join("blog"));

        assert!(matches!(
            store.read("../secret.txt").await,
            Err(MediaError::InvalidPath)
        ));
        assert!(matches!(store.read("").await, Err(MediaError::InvalidPath)));
        assert!(matches!(
            store.read("missing.png").await,
            Err(MediaError::NotFound)
        ));
    }

    #[tokio::test]
    async fn directories_are_not_served() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("logos")).expect("mkdir");
        let store = MediaStore::new(dir.path());
        assert!(matches!(store.read("logos").await, Err(MediaError::NotFound)));
    }
}

use std::{
    io,
    path::{Path, PathBuf},
};

/// Flat directory of downloaded images, keyed by file name.
///
/// A file's presence is the only cache signal: nothing is hashed or expired.
#[derive(Clone, Debug)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    pub async fn contains(&self, filename: &str) -> bool {
        tokio::fs::try_exists(self.path_for(filename))
            .await
            .unwrap_or(false)
    }

    pub async fn ensure(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    pub async fn write(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub async fn read(&self, filename: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.path_for(filename)).await
    }

    /// Delete the whole directory. Returns whether anything was removed.
    pub async fn purge(&self) -> io::Result<bool> {
        remove_dir_if_present(&self.root).await
    }
}

/// Recursively remove `path`, treating an absent directory as success.
pub async fn remove_dir_if_present(path: &Path) -> io::Result<bool> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_then_contains() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = ImageStore::new(dir.path().join("temp_images"));
        store.ensure().await.unwrap();

        // Act
        store.write("york-map.jpg", b"jpeg").await.unwrap();

        // Assert
        assert!(store.contains("york-map.jpg").await);
        assert!(!store.contains("york-hero-logo.jpg").await);
        assert_eq!(store.read("york-map.jpg").await.unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn purge_is_idempotent() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = ImageStore::new(dir.path().join("temp_images"));
        store.ensure().await.unwrap();
        store.write("a.jpg", b"a").await.unwrap();

        // Act
        let first = store.purge().await.unwrap();
        let second = store.purge().await.unwrap();

        // Assert
        assert!(first);
        assert!(!second);
        assert!(!store.root().exists());
    }
}

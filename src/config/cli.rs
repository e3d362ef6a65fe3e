use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// File-system storage. Relative paths resolve against `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(Path::new(path))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("out/nested/a.kml", b"<kml/>").await.unwrap();

        let data = storage.read_file("out/nested/a.kml").await.unwrap();
        assert_eq!(data, b"<kml/>");
    }

    #[tokio::test]
    async fn test_absolute_paths_ignore_base() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("bts.csv");
        std::fs::write(&file, "site_id\n").unwrap();

        let storage = LocalStorage::new("/nonexistent-base");
        let data = storage.read_file(file.to_str().unwrap()).await.unwrap();
        assert_eq!(data, b"site_id\n");
    }
}

use crate::store::StoreTrait;
use crate::store::error::StoreError;
use crate::store::file::{File, FileMetadata};
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

#[derive(Clone, Debug)]
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    #[must_use]
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Resolves `key` below the base path. Keys must be relative and may
    /// only contain normal components.
    fn sub_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let path = Path::new(key);
        if key.is_empty() || !path.components().all(|component| matches!(component, Component::Normal(_))) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(path))
    }
}

fn not_found(key: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |error| {
        if error.kind() == ErrorKind::NotFound {
            StoreError::NotFound(key.to_string())
        } else {
            error.into()
        }
    }
}

impl StoreTrait for FileSystemStore {
    async fn load_file(&self, key: &str) -> Result<File, StoreError> {
        let path = self.sub_path(key)?;
        tracing::trace!(?path, "Loading file");
        let data = fs::read(&path).await.map_err(not_found(key))?;
        let metadata = self.get_file_metadata(key).await?;
        Ok(File::new(metadata, data))
    }

    async fn store_file(&self, key: &str, content: &[u8]) -> Result<(), StoreError> {
        let path = self.sub_path(key)?;
        tracing::trace!(?path, "Storing file");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        Ok(())
    }

    async fn delete_file(&self, key: &str) -> Result<(), StoreError> {
        let path = self.sub_path(key)?;
        tracing::trace!(?path, "Deleting file");
        fs::remove_file(&path).await.map_err(not_found(key))
    }

    async fn get_file_metadata(&self, key: &str) -> Result<FileMetadata, StoreError> {
        let path = self.sub_path(key)?;
        let metadata = fs::metadata(&path).await.map_err(not_found(key))?;
        let last_modified = metadata.modified().ok().map(DateTime::<Utc>::from);
        Ok(FileMetadata {
            key: key.to_string(),
            last_modified,
            size: metadata.len(),
        })
    }
}

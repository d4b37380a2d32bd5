use crate::store::error::StoreError;
use crate::store::file::{File, FileMetadata};
use crate::store::file_system::FileSystemStore;
use url::Url;

pub mod error;
pub mod file;
pub mod file_system;

/// Blob storage addressed by relative keys such as `12/3f1c.pdf`.
#[derive(Clone, Debug)]
pub enum Store {
    FileSystem(FileSystemStore),
}

impl Store {
    /// Builds the store a location url points to. Only `file://` is supported.
    pub fn from_url(url: &Url) -> Result<Self, StoreError> {
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|()| StoreError::InvalidURL(url.to_string()))?;
                Ok(Store::FileSystem(FileSystemStore::new(path)))
            }
            scheme => Err(StoreError::UnsupportedScheme(scheme.to_string())),
        }
    }
}

impl StoreTrait for Store {
    async fn load_file(&self, key: &str) -> Result<File, StoreError> {
        match self {
            Store::FileSystem(store) => store.load_file(key).await,
        }
    }

    async fn store_file(&self, key: &str, content: &[u8]) -> Result<(), StoreError> {
        match self {
            Store::FileSystem(store) => store.store_file(key, content).await,
        }
    }

    async fn delete_file(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Store::FileSystem(store) => store.delete_file(key).await,
        }
    }

    async fn get_file_metadata(&self, key: &str) -> Result<FileMetadata, StoreError> {
        match self {
            Store::FileSystem(store) => store.get_file_metadata(key).await,
        }
    }
}

pub trait StoreTrait {
    fn load_file(&self, key: &str) -> impl Future<Output = Result<File, StoreError>> + Send;
    fn store_file(&self, key: &str, content: &[u8]) -> impl Future<Output = Result<(), StoreError>> + Send;
    fn delete_file(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_file_metadata(&self, key: &str) -> impl Future<Output = Result<FileMetadata, StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_scheme() {
        let url = Url::parse("s3://bucket/certificates").unwrap();
        assert!(matches!(Store::from_url(&url), Err(StoreError::UnsupportedScheme(scheme)) if scheme == "s3"));
    }

    #[test]
    fn builds_file_system_store() {
        let url = Url::parse("file:///var/lib/studia/uploads").unwrap();
        assert!(matches!(Store::from_url(&url), Ok(Store::FileSystem(_))));
    }
}

use crate::v01::config::{StudiaConfigV01, default_allowed_extensions, default_max_file_size};
use schemars::JsonSchema;
use serde::Deserialize;
use studia_utils::store::error::StoreError;
use studia_utils::store::{Store, StoreTrait};
use thiserror::Error;
use url::Url;

pub mod v01;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
#[serde(tag = "version")]
pub enum VersionConfig {
    #[serde(rename = "0.1")]
    V01 { studia: StudiaConfigV01 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Yaml(#[from] serde_yml::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub location: String,
    pub allowed_extensions: Vec<String>,
    pub max_file_size: u64,
    pub notify_admins: bool,
}

impl UploadConfig {
    /// Whether `extension` is on the allow-list, ignoring case.
    #[must_use]
    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }

    pub fn store(&self) -> Result<Store, ConfigError> {
        let url = Url::parse(&self.location)?;
        Ok(Store::from_url(&url)?)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            location: "file:///var/lib/studia/certificates".to_string(),
            allowed_extensions: default_allowed_extensions(),
            max_file_size: default_max_file_size(),
            notify_admins: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct StudiaConfig {
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
}

impl From<StudiaConfigV01> for StudiaConfig {
    fn from(value: StudiaConfigV01) -> Self {
        Self {
            database: DatabaseConfig {
                url: value.database.url,
            },
            uploads: UploadConfig {
                location: value.uploads.location,
                allowed_extensions: value.uploads.allowed_extensions,
                max_file_size: value.uploads.max_file_size,
                notify_admins: value.uploads.notify_admins,
            },
        }
    }
}

impl StudiaConfig {
    #[must_use]
    pub fn database(&self) -> &DatabaseConfig {
        &self.database
    }

    #[must_use]
    pub fn uploads(&self) -> &UploadConfig {
        &self.uploads
    }
}

pub fn parse(content: &[u8]) -> Result<StudiaConfig, ConfigError> {
    let VersionConfig::V01 { studia } = serde_yml::from_slice::<VersionConfig>(content)?;
    Ok(studia.into())
}

pub async fn load(store: &Store, key: &str) -> Result<StudiaConfig, ConfigError> {
    tracing::debug!(key, "Loading config");
    let file = store.load_file(key).await?;
    parse(&file.content)
}

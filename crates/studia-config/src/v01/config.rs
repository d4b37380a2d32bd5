use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct StudiaConfigV01 {
    /// # Database connection
    pub(crate) database: DatabaseConfigV01,
    /// # Certificate uploads
    pub(crate) uploads: UploadConfigV01,
}

#[derive(Deserialize, Clone, Debug, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct DatabaseConfigV01 {
    /// # Connection url, e.g. `sqlite://studia.db?mode=rwc`
    pub(crate) url: String,
}

#[derive(Deserialize, Clone, Debug, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct UploadConfigV01 {
    /// # Location of the certificate store
    /// Only `file://` urls are supported.
    pub(crate) location: String,
    #[serde(default = "default_allowed_extensions")]
    /// # Accepted file extensions
    /// Compared case-insensitively.
    pub(crate) allowed_extensions: Vec<String>,
    #[serde(default = "default_max_file_size")]
    /// # Maximum upload size in bytes
    pub(crate) max_file_size: u64,
    #[serde(default = "default_notify_admins")]
    /// # Notify every admin about new uploads
    pub(crate) notify_admins: bool,
}

pub(crate) fn default_allowed_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "pdf", "doc", "docx"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_max_file_size() -> u64 {
    16 * 1024 * 1024
}

fn default_notify_admins() -> bool {
    true
}

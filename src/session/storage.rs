use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Cookies captured from the HTTP client, scoped to the backend they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub base_url: String,
    pub cookies: String,
    pub saved_at: DateTime<Local>,
}

/// Trait for credential storage backends
pub trait CredentialStore: Send + Sync {
    /// Load credentials saved for `base_url`, if any
    fn load(&self, base_url: &str) -> Option<StoredCredentials>;

    /// Save credentials, replacing whatever was stored
    fn save(&self, credentials: &StoredCredentials) -> anyhow::Result<()>;

    /// Forget stored credentials
    fn clear(&self) -> anyhow::Result<()>;
}

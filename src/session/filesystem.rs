use super::storage::{CredentialStore, StoredCredentials};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

const CREDENTIALS_FILE: &str = "credentials.json";

/// Keeps the cookie jar between CLI invocations under `~/.cache/eventmates`.
pub struct FilesystemCredentialStore {
    dir: PathBuf,
}

impl FilesystemCredentialStore {
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::in_dir(home.join(".cache").join("eventmates"))
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }
}

impl CredentialStore for FilesystemCredentialStore {
    fn load(&self, base_url: &str) -> Option<StoredCredentials> {
        let content = fs::read_to_string(self.file()).ok()?;
        let stored: StoredCredentials = serde_json::from_str(&content).ok()?;

        // Cookies from another backend are useless here
        if stored.base_url != base_url || stored.cookies.trim().is_empty() {
            return None;
        }
        Some(stored)
    }

    fn save(&self, credentials: &StoredCredentials) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let content = serde_json::to_string_pretty(credentials)?;
        fs::write(self.file(), content)
            .with_context(|| format!("Failed to write {}", self.file().display()))?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        let file = self.file();
        if file.exists() {
            fs::remove_file(&file)
                .with_context(|| format!("Failed to remove {}", file.display()))?;
        }
        Ok(())
    }
}

impl Default for FilesystemCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

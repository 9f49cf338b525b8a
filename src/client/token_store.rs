//! On-disk store for the session token.
//!
//! Holds a single opaque bearer token. A missing file means "logged out".

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location under the user's home directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lodgr")
            .join("token")
    }

    /// Read the stored token. Returns None when logged out.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let token = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file: {}", self.path.display()))?;
        let token = token.trim().to_string();
        Ok(if token.is_empty() { None } else { Some(token) })
    }

    /// Persist a token, replacing any previous one.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&self.path, token)
            .with_context(|| format!("Failed to write token file: {}", self.path.display()))
    }

    /// Remove the stored token, if any.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove token file: {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = TokenStore::new(dir.path().join("nested").join("token"));

        assert_eq!(store.load().unwrap(), None);

        store.save("abc123").unwrap();
        assert_eq!(store.load().unwrap(), Some("abc123".to_string()));

        store.save("def456").unwrap();
        assert_eq!(store.load().unwrap(), Some("def456".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_whitespace_only_file_counts_as_logged_out() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = TokenStore::new(dir.path().join("token"));

        std::fs::write(dir.path().join("token"), "\n  \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = TokenStore::new(dir.path().join("token"));

        store.clear().unwrap();
        store.clear().unwrap();
    }
}

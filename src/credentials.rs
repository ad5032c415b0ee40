// file: src/credentials.rs
// description: local key/value store holding the external classifier credential
// reference: https://docs.rs/serde_json

use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const API_KEY_STORAGE_KEY: &str = "healthcare-triage-llm-api-key";

/// JSON object on disk; only [`API_KEY_STORAGE_KEY`] is used.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<Option<String>> {
        Ok(self
            .read_entries()?
            .remove(API_KEY_STORAGE_KEY)
            .filter(|key| !key.trim().is_empty()))
    }

    pub fn has(&self) -> Result<bool> {
        Ok(self.get()?.is_some())
    }

    pub fn save(&self, api_key: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(API_KEY_STORAGE_KEY.to_string(), api_key.trim().to_string());
        self.write_entries(&entries)
    }

    pub fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(API_KEY_STORAGE_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&raw)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        debug!("Credential store written to {}", self.path.display());
        Ok(())
    }
}

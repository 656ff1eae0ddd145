use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

pub const DEFAULT_CATALOG_BASE_URL: &str = "https://openlibrary.org";
pub const DEFAULT_COVERS_BASE_URL: &str = "https://covers.openlibrary.org";
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SummarySettings {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the bearer key; the key itself
    /// is never written to disk.
    pub api_key_env: String,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-3.5-turbo".into(),
            api_key_env: "BOOKVERSE_SUMMARY_API_KEY".into(),
        }
    }
}

impl SummarySettings {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppSettings {
    pub catalog_base_url: String,
    pub covers_base_url: String,
    pub min_password_len: usize,
    pub summary: SummarySettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.into(),
            covers_base_url: DEFAULT_COVERS_BASE_URL.into(),
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
            summary: SummarySettings::default(),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    /// Loads `path`; a missing or unparsable file yields defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> AppSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update_catalog_base_url(&self, url: impl Into<String>) -> Result<()> {
        self.update(|settings| settings.catalog_base_url = url.into())
    }

    pub fn update_min_password_len(&self, len: usize) -> Result<()> {
        self.update(|settings| settings.min_password_len = len)
    }

    pub fn update_summary(&self, summary: SummarySettings) -> Result<()> {
        self.update(|settings| settings.summary = summary)
    }

    fn update(&self, apply: impl FnOnce(&mut AppSettings)) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get(), AppSettings::default());
        assert_eq!(store.get().catalog_base_url, "https://openlibrary.org");
        assert_eq!(store.get().min_password_len, 6);
    }

    #[test]
    fn updates_persist_across_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store.update_catalog_base_url("http://localhost:9000").unwrap();
        store.update_min_password_len(10).unwrap();

        let reloaded = SettingsStore::new(path).unwrap().get();
        assert_eq!(reloaded.catalog_base_url, "http://localhost:9000");
        assert_eq!(reloaded.min_password_len, 10);
        assert_eq!(reloaded.covers_base_url, DEFAULT_COVERS_BASE_URL);
    }

    #[test]
    fn corrupt_or_partial_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(SettingsStore::new(path.clone()).unwrap().get(), AppSettings::default());

        fs::write(&path, r#"{ "min_password_len": 8 }"#).unwrap();
        let partial = SettingsStore::new(path).unwrap().get();
        assert_eq!(partial.min_password_len, 8);
        assert_eq!(partial.summary, SummarySettings::default());
    }
}

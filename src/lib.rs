pub mod auth;
pub mod catalog;
pub mod db;
pub mod games;
pub mod models;
pub mod notify;
pub mod screens;
pub mod session;
pub mod settings;
pub mod shelf;
pub mod speed;
pub mod summary;
pub mod utils;

#[cfg(test)]
mod testing;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};

use auth::LocalIdentityProvider;
use catalog::{CatalogAdapter, HttpCatalogTransport};
use db::Database;
use notify::Notifier;
use screens::ScreenContext;
use session::Navigator;
use settings::SettingsStore;
use summary::{ChatCompletionGenerator, SummaryGenerator, SummaryService};

const ENABLE_LOGS: bool = true;

const DATABASE_FILE: &str = "bookverse.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

/// `BOOKVERSE_DATA_DIR`, else `~/.bookverse`, else `./.bookverse`.
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("BOOKVERSE_DATA_DIR").filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookverse")
}

/// Long-lived services shared by every screen.
pub struct AppContext {
    pub db: Database,
    pub settings: SettingsStore,
    pub identity: Arc<LocalIdentityProvider>,
    pub catalog: CatalogAdapter,
    pub summaries: SummaryService,
    pub notifier: Notifier,
}

impl AppContext {
    pub async fn bootstrap(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
        let config = settings.get();

        let db = Database::new(data_dir.join(DATABASE_FILE))?;
        let identity = LocalIdentityProvider::open(db.clone(), config.min_password_len).await?;

        let transport = HttpCatalogTransport::new(config.catalog_base_url.clone())?;
        let catalog = CatalogAdapter::new(Arc::new(transport));

        let generator: Option<Arc<dyn SummaryGenerator>> = match config.summary.api_key() {
            Some(api_key) => Some(Arc::new(ChatCompletionGenerator::new(
                config.summary.endpoint.clone(),
                api_key,
                config.summary.model.clone(),
            )?)),
            None => {
                crate::log_debug!(
                    "{} not set; summaries use the template",
                    config.summary.api_key_env
                );
                None
            }
        };

        crate::log_info!("BookVerse data in {}", data_dir.display());

        Ok(Self {
            db,
            settings,
            identity: Arc::new(identity),
            catalog,
            summaries: SummaryService::new(generator),
            notifier: Notifier::new(),
        })
    }

    pub fn screens(&self, navigator: Arc<dyn Navigator>) -> ScreenContext {
        let config = self.settings.get();
        ScreenContext {
            identity: self.identity.clone(),
            navigator,
            catalog: self.catalog.clone(),
            summaries: self.summaries.clone(),
            documents: Arc::new(self.db.clone()),
            notifier: self.notifier.clone(),
            covers_base_url: config.covers_base_url,
            min_password_len: config.min_password_len,
        }
    }
}

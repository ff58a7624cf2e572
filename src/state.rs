use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::{AppConfig, StorageConfig};
use crate::dashboard::DashboardSummary;
use crate::directory::{StaticUserDirectory, UserDirectory};
use crate::error::Result;
use crate::inventory::InventoryStore;
use crate::session::SessionManager;
use crate::storage::{FileStorage, MemoryStorage, PersistentStorage};

/// Everything a request handler may touch, built once at start and injected.
#[derive(Debug)]
pub struct AppState {
    pub sessions: SessionManager,
    pub storage: Arc<dyn PersistentStorage>,
    pub inventory: RwLock<InventoryStore>,
    pub page_size: usize,
    pub low_stock_threshold: u32,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        storage: Arc<dyn PersistentStorage>,
        inventory: InventoryStore,
        config: &AppConfig,
    ) -> Self {
        Self {
            sessions: SessionManager::new(directory, storage.clone()),
            storage,
            inventory: RwLock::new(inventory),
            page_size: config.page_size,
            low_stock_threshold: config.low_stock_threshold,
            secure_cookies: config.secure_cookies,
        }
    }

    /// Seed users and products, storage picked by `config`, and any
    /// previously persisted session restored.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let storage: Arc<dyn PersistentStorage> = match &config.storage {
            StorageConfig::Memory => Arc::new(MemoryStorage::new()),
            StorageConfig::File(path) => {
                tracing::info!("Using persistent storage at {}", path.display());
                Arc::new(FileStorage::new(path))
            }
        };
        let state = Self::new(
            Arc::new(StaticUserDirectory::seeded()),
            storage,
            InventoryStore::seeded(),
            config,
        );
        if let Some(session) = state.sessions.restore_session().await? {
            tracing::info!("Resumed session for {}", session.email);
        }
        Ok(state)
    }

    /// In-memory state with defaults. Handy for tests and benches.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(StaticUserDirectory::seeded()),
            Arc::new(MemoryStorage::new()),
            InventoryStore::seeded(),
            &AppConfig::default(),
        )
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let active_users = self.sessions.directory().count().await?;
        let inventory = self.inventory.read().await;
        Ok(DashboardSummary::build(&inventory, active_users, self.low_stock_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Theme;
    use crate::storage::THEME_KEY;
    use crate::theme::load_theme;
    use std::path::PathBuf;

    #[tokio::test]
    async fn starts_over_a_broken_storage_file() {
        let dir = std::env::temp_dir().join(format!("slooze-state-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path: PathBuf = dir.join("local_storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let config = AppConfig {
            storage: StorageConfig::File(path),
            ..AppConfig::default()
        };
        let state = AppState::from_config(&config).await.unwrap();
        assert!(state.sessions.current().is_none());
        assert_eq!(state.storage.get_item(THEME_KEY).await.unwrap(), None);
        assert_eq!(load_theme(state.storage.as_ref()).await.unwrap(), Theme::Light);

        let _ = std::fs::remove_dir_all(&dir);
    }
}

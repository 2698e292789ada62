use async_trait::async_trait;
use budget_core::store::{KeyValueStore, StoreConfig, StoreError, StoreFactory};

use crate::store::SqliteStore;

/// [`StoreFactory`] for SQLite.
///
/// ```rust,no_run
/// use budget_core::store::StoreRegistry;
/// use budget_store_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens `config.connection_string` (a file path or `:memory:`) and
    /// runs migrations.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, StoreError> {
        let store = SqliteStore::connect(&config.connection_string)
            .await
            .map_err(|e| StoreError::Connection(format!("{e:#}")))?;
        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Storage(format!("{e:#}")))?;
        Ok(Box::new(store))
    }
}

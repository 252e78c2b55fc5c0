use std::sync::Arc;

use super::{DocumentStore, InMemoryStore, MongoStore};
use crate::{
    config::{DatabaseConfig, StoreBackend},
    error::Result,
};

pub async fn create_store(config: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::MongoDb => Arc::new(MongoStore::connect(config).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory document store; data is lost on exit");
            Arc::new(InMemoryStore::new(config.name.clone()))
        }
    };

    tracing::info!(
        "Document store ready: backend={} database={}",
        store.backend_name(),
        store.database_name()
    );

    Ok(store)
}

pub async fn check_health(store: &dyn DocumentStore) -> Result<()> {
    store.ping().await
}

//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;
pub mod timed;

pub use in_memory::InMemoryStore;
#[cfg(feature = "mongodb_backend")]
pub use mongodb::MongoStore;
pub use timed::{DEFAULT_STORE_DEADLINE, TimedStore};

use crate::config::{StoreBackend, StoreConfig};
use crate::core::RecordStore;
use anyhow::Result;
use std::sync::Arc;

/// Build the configured backend, bounded by the configured deadline
///
/// This is the single place a process creates its store client; services
/// receive the returned handle at construction.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    let deadline = config.deadline();
    let store: Arc<dyn RecordStore> = match config.backend {
        StoreBackend::InMemory => Arc::new(TimedStore::new(InMemoryStore::new(), deadline)),
        #[cfg(feature = "mongodb_backend")]
        StoreBackend::Mongodb => {
            let mongo = MongoStore::connect(&config.uri, &config.database).await?;
            Arc::new(TimedStore::new(mongo, deadline))
        }
        #[cfg(not(feature = "mongodb_backend"))]
        StoreBackend::Mongodb => {
            anyhow::bail!("store.backend is 'mongodb' but the `mongodb_backend` feature is disabled")
        }
    };

    tracing::info!(
        backend = store.backend(),
        deadline_secs = deadline.as_secs(),
        "record store ready"
    );
    Ok(store)
}

//! Record store clients.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::{PostgresStore, StoreCredentials};
pub use store::RecordStore;

use crate::infra::config::{StoreBackend, StoreEndpoint, StoreSettings};
use std::sync::Arc;

/// Opens the store described by `settings`. Connection failures are returned,
/// never swallowed; callers treat them as fatal at startup.
pub async fn connect(settings: &StoreSettings) -> StoreResult<Arc<dyn RecordStore>> {
    match settings.backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory record store; data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let store = match &settings.endpoint {
                StoreEndpoint::Url(url) => PostgresStore::connect_url(url).await?,
                StoreEndpoint::Parts {
                    host,
                    port,
                    credentials,
                } => {
                    tracing::info!(%host, port, "connecting to record store");
                    PostgresStore::connect(host, *port, credentials).await?
                }
            };
            Ok(Arc::new(store))
        }
    }
}

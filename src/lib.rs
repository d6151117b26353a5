pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ProductRepository, RepositoryError, SellOutcome};
pub use domain::{Product, ValidationError};
pub use infra::config::Settings;
pub use storage::{MemoryStore, PostgresStore, RecordStore, StoreError};

pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use quotedesk_core::config::StoreConfig;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{DemoDataset, SeedResult, VerificationResult};
pub use repositories::{
    CustomerRepository, ProductRepository, QuotationRepository, RepositoryError,
    SalesPersonRepository,
};
pub use store::{
    diff_records, ChangeEvent, ChangeKind, Collection, InMemoryRecordStore, RecordDiff,
    RecordStore, SqlRecordStore, StoreError,
};

/// Opens the store named by `config`, running pending migrations for SQLite.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    if config.is_in_memory() {
        return Ok(Arc::new(InMemoryRecordStore::new()));
    }

    let pool = connect_with_settings(&config.url, config.max_connections, config.timeout_secs)
        .await?;
    migrations::run_pending(&pool).await?;
    Ok(Arc::new(SqlRecordStore::new(pool)))
}

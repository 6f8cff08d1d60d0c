use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use quotedesk_core::DomainError;

use crate::store::{ChangeEvent, Collection, RecordStore, StoreError};

pub mod customer;
pub mod product;
pub mod quotation;

pub use customer::{CustomerRepository, SalesPersonRepository};
pub use product::ProductRepository;
pub use quotation::QuotationRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("no record `{key}` in `{collection}`")]
    NotFound { collection: Collection, key: String },
}

/// Typed view over one collection of the record store.
///
/// Writes always go through a whole-collection diff so subscribers see the
/// same change events an authoring screen would produce.
pub(crate) struct Documents {
    store: Arc<dyn RecordStore>,
    collection: Collection,
}

impl Documents {
    pub(crate) fn new(store: Arc<dyn RecordStore>, collection: Collection) -> Self {
        Self { store, collection }
    }

    pub(crate) async fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>, RepositoryError> {
        self.store
            .get(self.collection)
            .await?
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(RepositoryError::from))
            .collect()
    }

    pub(crate) async fn upsert<T: Serialize>(
        &self,
        document: &T,
    ) -> Result<Vec<ChangeEvent>, RepositoryError> {
        let record = serde_json::to_value(document)?;
        let key = self.key_of(&record)?;
        let previous = self.store.get(self.collection).await?;

        let mut next = previous.clone();
        let position = next
            .iter()
            .position(|existing| {
                self.collection.record_key(existing).as_deref() == Some(key.as_str())
            });
        match position {
            Some(index) => next[index] = record,
            None => next.push(record),
        }
        Ok(self.store.set(self.collection, &previous, &next).await?)
    }

    pub(crate) async fn remove(&self, key: &str) -> Result<Vec<ChangeEvent>, RepositoryError> {
        let previous = self.store.get(self.collection).await?;
        let next: Vec<Value> = previous
            .iter()
            .filter(|record| self.collection.record_key(record).as_deref() != Some(key))
            .cloned()
            .collect();
        if next.len() == previous.len() {
            return Err(RepositoryError::NotFound {
                collection: self.collection,
                key: key.to_owned(),
            });
        }
        Ok(self.store.set(self.collection, &previous, &next).await?)
    }

    fn key_of(&self, record: &Value) -> Result<String, RepositoryError> {
        self.collection.record_key(record).ok_or_else(|| {
            RepositoryError::Store(StoreError::MissingKey {
                collection: self.collection,
                field: self.collection.primary_key(),
            })
        })
    }
}

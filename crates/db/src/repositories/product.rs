use std::sync::Arc;

use tracing::info;

use quotedesk_core::pricing::Catalog;
use quotedesk_core::{restamp_bands, Product, ProductId};

use super::{Documents, RepositoryError};
use crate::store::{ChangeEvent, Collection, RecordStore};

pub struct ProductRepository {
    documents: Documents,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { documents: Documents::new(store, Collection::Products) }
    }

    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        self.documents.load().await
    }

    pub async fn catalog(&self) -> Result<Catalog, RepositoryError> {
        Ok(Catalog::new(self.list().await?))
    }

    pub async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.list().await?.into_iter().find(|product| &product.id == id))
    }

    /// Saves a product after re-deriving its band end dates from the start
    /// dates, so stored bands never overlap or leave gaps.
    pub async fn save(&self, mut product: Product) -> Result<Vec<ChangeEvent>, RepositoryError> {
        product.bands = restamp_bands(std::mem::take(&mut product.bands))?;
        let events = self.documents.upsert(&product).await?;
        info!(
            event_name = "product.saved",
            product_id = %product.id.0,
            band_count = product.bands.len(),
            "product saved"
        );
        Ok(events)
    }

    pub async fn delete(&self, id: &ProductId) -> Result<Vec<ChangeEvent>, RepositoryError> {
        self.documents.remove(&id.0).await
    }
}

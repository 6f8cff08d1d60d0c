use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use quotedesk_core::{next_quotation_id, CustomerRef, Quotation, QuotationId};

use super::{Documents, RepositoryError};
use crate::store::{ChangeEvent, Collection, RecordStore};

pub struct QuotationRepository {
    documents: Documents,
}

impl QuotationRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { documents: Documents::new(store, Collection::Quotations) }
    }

    /// All quotations, lowest id first.
    pub async fn list(&self) -> Result<Vec<Quotation>, RepositoryError> {
        let mut quotations: Vec<Quotation> = self.documents.load().await?;
        quotations.sort_by_key(|quotation| quotation.id);
        Ok(quotations)
    }

    pub async fn find_by_id(&self, id: QuotationId) -> Result<Option<Quotation>, RepositoryError> {
        Ok(self.list().await?.into_iter().find(|quotation| quotation.id == id))
    }

    /// Opens a new quotation numbered one past the highest existing id.
    pub async fn create(
        &self,
        document_date: NaiveDate,
        customer: CustomerRef,
    ) -> Result<Quotation, RepositoryError> {
        let existing = self.list().await?;
        let quotation = Quotation::new(next_quotation_id(&existing), document_date, customer);
        self.documents.upsert(&quotation).await?;

        info!(
            event_name = "quotation.created",
            quotation_id = %quotation.id,
            customer = %quotation.customer.name,
            "quotation created"
        );
        Ok(quotation)
    }

    /// Writes the whole document. A quotation saved with no lines gets a
    /// single blank line back.
    pub async fn save(
        &self,
        mut quotation: Quotation,
    ) -> Result<Vec<ChangeEvent>, RepositoryError> {
        quotation.ensure_lines();
        let events = self.documents.upsert(&quotation).await?;
        info!(
            event_name = "quotation.saved",
            quotation_id = %quotation.id,
            status = quotation.status.as_str(),
            line_count = quotation.lines.len(),
            "quotation saved"
        );
        Ok(events)
    }

    pub async fn delete(&self, id: QuotationId) -> Result<Vec<ChangeEvent>, RepositoryError> {
        let events = self.documents.remove(&id.to_string()).await?;
        info!(event_name = "quotation.deleted", quotation_id = %id, "quotation deleted");
        Ok(events)
    }
}

use std::sync::Arc;

use quotedesk_core::{Customer, CustomerId, SalesPerson, SalesPersonId};

use super::{Documents, RepositoryError};
use crate::store::{ChangeEvent, Collection, RecordStore};

pub struct CustomerRepository {
    documents: Documents,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { documents: Documents::new(store, Collection::Customers) }
    }

    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let mut customers: Vec<Customer> = self.documents.load().await?;
        customers.sort_by_key(|customer| customer.id);
        Ok(customers)
    }

    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.list().await?.into_iter().find(|customer| customer.id == id))
    }

    pub async fn save(&self, customer: &Customer) -> Result<Vec<ChangeEvent>, RepositoryError> {
        self.documents.upsert(customer).await
    }
}

pub struct SalesPersonRepository {
    documents: Documents,
}

impl SalesPersonRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { documents: Documents::new(store, Collection::SalesPersons) }
    }

    pub async fn list(&self) -> Result<Vec<SalesPerson>, RepositoryError> {
        let mut people: Vec<SalesPerson> = self.documents.load().await?;
        people.sort_by_key(|person| person.id);
        Ok(people)
    }

    pub async fn find_by_id(
        &self,
        id: SalesPersonId,
    ) -> Result<Option<SalesPerson>, RepositoryError> {
        Ok(self.list().await?.into_iter().find(|person| person.id == id))
    }

    pub async fn save(&self, person: &SalesPerson) -> Result<Vec<ChangeEvent>, RepositoryError> {
        self.documents.upsert(person).await
    }
}

//! Tabular record store behind the authoring screens.
//!
//! Screens keep a working copy of a whole collection and hand the store both
//! the copy they started from and the copy they want. The store writes the
//! difference (upserts plus deletes keyed by the collection's primary key)
//! and announces each applied change on a broadcast feed. Concurrent writers
//! are not reconciled; the last write wins.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

pub mod memory;
pub mod sql;

pub use memory::InMemoryRecordStore;
pub use sql::SqlRecordStore;

pub(crate) const CHANGE_FEED_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Quotations,
    Products,
    Customers,
    SalesPersons,
    DeliveryChallans,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Quotations,
        Collection::Products,
        Collection::Customers,
        Collection::SalesPersons,
        Collection::DeliveryChallans,
        Collection::Users,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Quotations => "quotations",
            Self::Products => "products",
            Self::Customers => "customers",
            Self::SalesPersons => "sales_persons",
            Self::DeliveryChallans => "delivery_challans",
            Self::Users => "users",
        }
    }

    /// Field holding the primary key. User records are keyed by login name.
    pub fn primary_key(self) -> &'static str {
        match self {
            Self::Users => "name",
            _ => "id",
        }
    }

    pub fn record_key(self, record: &Value) -> Option<String> {
        match record.get(self.primary_key())? {
            Value::String(key) if !key.trim().is_empty() => Some(key.clone()),
            Value::Number(key) => Some(key.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record body could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("record in `{collection}` has no usable `{field}` key")]
    MissingKey { collection: Collection, field: &'static str },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordDiff {
    pub upserts: Vec<(String, Value)>,
    pub deletes: Vec<String>,
}

impl RecordDiff {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}

/// Works out which records to write and which to remove when a collection
/// moves from `previous` to `next`. Unchanged records are skipped.
pub fn diff_records(
    collection: Collection,
    previous: &[Value],
    next: &[Value],
) -> Result<RecordDiff, StoreError> {
    let missing_key = || StoreError::MissingKey { collection, field: collection.primary_key() };

    let mut before: BTreeMap<String, &Value> = BTreeMap::new();
    for record in previous {
        let key = collection.record_key(record).ok_or_else(missing_key)?;
        before.insert(key, record);
    }

    let mut diff = RecordDiff::default();
    let mut kept = BTreeSet::new();
    for record in next {
        let key = collection.record_key(record).ok_or_else(missing_key)?;
        if before.get(&key) != Some(&record) {
            diff.upserts.push((key.clone(), record.clone()));
        }
        kept.insert(key);
    }

    diff.deletes = before.into_keys().filter(|key| !kept.contains(key)).collect();
    Ok(diff)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub event_id: String,
    pub collection: Collection,
    pub kind: ChangeKind,
    pub key: String,
    pub record: Option<Value>,
}

impl ChangeEvent {
    pub fn new(
        collection: Collection,
        kind: ChangeKind,
        key: String,
        record: Option<Value>,
    ) -> Self {
        Self { event_id: Uuid::new_v4().to_string(), collection, kind, key, record }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    /// Applies a precomputed diff and returns the changes that took effect.
    async fn apply(
        &self,
        collection: Collection,
        diff: RecordDiff,
    ) -> Result<Vec<ChangeEvent>, StoreError>;

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;

    async fn set(
        &self,
        collection: Collection,
        previous: &[Value],
        next: &[Value],
    ) -> Result<Vec<ChangeEvent>, StoreError> {
        let diff = diff_records(collection, previous, next)?;
        if diff.is_empty() {
            return Ok(Vec::new());
        }
        self.apply(collection, diff).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{diff_records, Collection, StoreError};

    #[test]
    fn users_are_keyed_by_name_and_everything_else_by_id() {
        assert_eq!(Collection::Users.record_key(&json!({"name": "asha"})), Some("asha".into()));
        assert_eq!(Collection::Quotations.record_key(&json!({"id": 12})), Some("12".into()));
        assert_eq!(
            Collection::Products.record_key(&json!({"id": "FRLS-2.5"})),
            Some("FRLS-2.5".into())
        );
        assert_eq!(Collection::Customers.record_key(&json!({"name": "no id"})), None);
        assert_eq!(Collection::Customers.record_key(&json!({"id": "  "})), None);
    }

    #[test]
    fn diff_upserts_new_and_changed_records_and_deletes_dropped_keys() {
        let previous = vec![
            json!({"id": 1, "status": "Open"}),
            json!({"id": 2, "status": "Open"}),
            json!({"id": 3, "status": "Lost"}),
        ];
        let next = vec![
            json!({"id": 1, "status": "Open"}),
            json!({"id": 2, "status": "PO Received"}),
            json!({"id": 4, "status": "Open"}),
        ];

        let diff = diff_records(Collection::Quotations, &previous, &next).expect("keyed records");

        let upserted: Vec<&str> = diff.upserts.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(upserted, vec!["2", "4"]);
        assert_eq!(diff.deletes, vec!["3".to_string()]);
    }

    #[test]
    fn identical_collections_produce_an_empty_diff() {
        let records = vec![json!({"name": "asha", "role": "Admin"})];
        let diff = diff_records(Collection::Users, &records, &records).expect("keyed records");
        assert!(diff.is_empty());
    }

    #[test]
    fn records_without_keys_are_rejected() {
        let error = diff_records(Collection::Users, &[], &[json!({"role": "Viewer"})])
            .expect_err("missing name");
        assert!(matches!(
            error,
            StoreError::MissingKey { collection: Collection::Users, field: "name" }
        ));
    }
}

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use super::{
    ChangeEvent, ChangeKind, Collection, RecordDiff, RecordStore, StoreError,
    CHANGE_FEED_CAPACITY,
};

/// Process-local store used by tests and the `memory://` store URL.
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<Collection, BTreeMap<String, Value>>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self { collections: RwLock::new(HashMap::new()), changes }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn apply(
        &self,
        collection: Collection,
        diff: RecordDiff,
    ) -> Result<Vec<ChangeEvent>, StoreError> {
        let mut collections = self.collections.write().await;
        let records = collections.entry(collection).or_default();
        let mut events = Vec::with_capacity(diff.upserts.len() + diff.deletes.len());

        for (key, record) in diff.upserts {
            let kind = match records.insert(key.clone(), record.clone()) {
                Some(_) => ChangeKind::Update,
                None => ChangeKind::Insert,
            };
            events.push(ChangeEvent::new(collection, kind, key, Some(record)));
        }
        for key in diff.deletes {
            if records.remove(&key).is_some() {
                events.push(ChangeEvent::new(collection, ChangeKind::Delete, key, None));
            }
        }
        drop(collections);

        for event in &events {
            // No subscribers is not an error.
            let _ = self.changes.send(event.clone());
        }
        Ok(events)
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::InMemoryRecordStore;
    use crate::store::{ChangeKind, Collection, RecordStore};

    #[tokio::test]
    async fn set_writes_the_difference_and_reports_each_change() {
        let store = InMemoryRecordStore::new();
        let first = vec![json!({"id": 1, "name": "Apex Electricals"})];
        store.set(Collection::Customers, &[], &first).await.expect("initial write");

        let mut feed = store.subscribe();
        let second = vec![
            json!({"id": 1, "name": "Apex Electricals Pvt Ltd"}),
            json!({"id": 2, "name": "Bharat Switchgear"}),
        ];
        let events = store.set(Collection::Customers, &first, &second).await.expect("update");

        let kinds: Vec<ChangeKind> = events.iter().map(|event| event.kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Update, ChangeKind::Insert]);
        assert_eq!(feed.recv().await.expect("first event").key, "1");
        assert_eq!(feed.recv().await.expect("second event").key, "2");

        let stored = store.get(Collection::Customers).await.expect("read back");
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn removed_records_are_deleted_and_other_collections_untouched() {
        let store = InMemoryRecordStore::new();
        let users = vec![json!({"name": "asha"}), json!({"name": "ravi"})];
        store.set(Collection::Users, &[], &users).await.expect("seed users");
        store
            .set(Collection::Products, &[], &[json!({"id": "P-1"})])
            .await
            .expect("seed products");

        let events = store
            .set(Collection::Users, &users, &users[..1])
            .await
            .expect("drop ravi");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Delete);
        assert_eq!(events[0].key, "ravi");
        assert_eq!(store.get(Collection::Users).await.expect("users").len(), 1);
        assert_eq!(store.get(Collection::Products).await.expect("products").len(), 1);
    }

    #[tokio::test]
    async fn unchanged_collections_emit_nothing() {
        let store = InMemoryRecordStore::new();
        let records = vec![json!({"id": 7})];
        store.set(Collection::SalesPersons, &[], &records).await.expect("seed");

        let events = store.set(Collection::SalesPersons, &records, &records).await.expect("noop");

        assert!(events.is_empty());
    }
}

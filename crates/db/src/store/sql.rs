use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::Row;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{
    ChangeEvent, ChangeKind, Collection, RecordDiff, RecordStore, StoreError,
    CHANGE_FEED_CAPACITY,
};
use crate::DbPool;

/// SQLite-backed store. Every collection shares the `record` table and keeps
/// each record as a JSON document under its primary key.
pub struct SqlRecordStore {
    pool: DbPool,
    changes: broadcast::Sender<ChangeEvent>,
}

impl SqlRecordStore {
    pub fn new(pool: DbPool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self { pool, changes }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqlRecordStore {
    async fn get(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let rows = sqlx::query(
            "SELECT body FROM record WHERE collection = ? ORDER BY rowid",
        )
        .bind(collection.name())
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let body: String = row.try_get("body")?;
            records.push(serde_json::from_str(&body)?);
        }
        debug!(
            event_name = "store.collection.read",
            collection = collection.name(),
            record_count = records.len(),
            "collection loaded"
        );
        Ok(records)
    }

    async fn apply(
        &self,
        collection: Collection,
        diff: RecordDiff,
    ) -> Result<Vec<ChangeEvent>, StoreError> {
        let updated_at = Utc::now().to_rfc3339();
        let mut events = Vec::with_capacity(diff.upserts.len() + diff.deletes.len());
        let mut tx = self.pool.begin().await?;

        for (key, record) in diff.upserts {
            let existing =
                sqlx::query("SELECT 1 FROM record WHERE collection = ? AND record_key = ?")
                    .bind(collection.name())
                    .bind(&key)
                    .fetch_optional(&mut *tx)
                    .await?;
            let body = serde_json::to_string(&record)?;

            sqlx::query(
                "INSERT INTO record (collection, record_key, body, updated_at)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT(collection, record_key) DO UPDATE SET
                     body = excluded.body,
                     updated_at = excluded.updated_at",
            )
            .bind(collection.name())
            .bind(&key)
            .bind(body)
            .bind(&updated_at)
            .execute(&mut *tx)
            .await?;

            let kind = if existing.is_some() { ChangeKind::Update } else { ChangeKind::Insert };
            events.push(ChangeEvent::new(collection, kind, key, Some(record)));
        }

        for key in diff.deletes {
            let result = sqlx::query("DELETE FROM record WHERE collection = ? AND record_key = ?")
                .bind(collection.name())
                .bind(&key)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() > 0 {
                events.push(ChangeEvent::new(collection, ChangeKind::Delete, key, None));
            }
        }

        tx.commit().await?;
        info!(
            event_name = "store.collection.written",
            collection = collection.name(),
            change_count = events.len(),
            "collection changes applied"
        );

        for event in &events {
            let _ = self.changes.send(event.clone());
        }
        Ok(events)
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

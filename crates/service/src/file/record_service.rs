use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::records::RecordStore;
use crate::storage::document::{record_id, Collection, Record};
use crate::storage::document_store::DocumentStore;

/// Collection-scoped CRUD over the shared document store.
///
/// Every operation is one read-modify-write pass over the whole persisted
/// document; mutating operations hold the store's write lock for the full
/// cycle so concurrent requests cannot interleave their load/save.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<DocumentStore>,
    collection: Collection,
}

impl RecordService {
    pub fn new(store: Arc<DocumentStore>, collection: Collection) -> Arc<Self> {
        Arc::new(Self { store, collection })
    }

    /// The full collection in stored order, unfiltered.
    pub async fn list(&self) -> Result<Vec<Record>, ServiceError> {
        let doc = self.store.load().await?;
        Ok(self.collection.records(&doc).clone())
    }

    /// Append a record built from the request body and a freshly assigned
    /// id (a body-supplied `id` is overwritten). Returns the new record.
    pub async fn create(&self, body: Record) -> Result<Record, ServiceError> {
        let _guard = self.store.lock().await;

        // Snapshot first, allocate second: the allocation writes its own
        // counter bump, which the final save of this stale snapshot then
        // overwrites with the length-based advance. Counters run
        // 1, 2, 4, 7, ... over repeated creates; reordering these steps
        // changes the on-disk sequence.
        let mut doc = self.store.load().await?;
        let id = self.allocate_id().await?;

        let mut record = body;
        record.insert("id".to_string(), Value::from(id));
        self.collection.records_mut(&mut doc).push(record.clone());

        if let Err(err) = self.store.save(&mut doc).await {
            warn!(%err, collection = self.collection.label(), "failed to persist created record");
        }
        debug!(id, collection = self.collection.label(), "record created");
        Ok(record)
    }

    /// Replace the matching record with the shallow merge of its fields
    /// and the body's fields (body wins, absent fields preserved).
    pub async fn update(&self, id: &str, body: Record) -> Result<Record, ServiceError> {
        let _guard = self.store.lock().await;
        let mut doc = self.store.load().await?;

        let target = parse_id(id);
        let records = self.collection.records_mut(&mut doc);
        let Some(existing) = records
            .iter_mut()
            .find(|rec| target.is_some() && record_id(rec) == target)
        else {
            return Err(ServiceError::not_found(self.collection.label()));
        };

        for (key, value) in body {
            existing.insert(key, value);
        }
        let merged = existing.clone();

        if let Err(err) = self.store.save(&mut doc).await {
            warn!(%err, collection = self.collection.label(), "failed to persist updated record");
        }
        Ok(merged)
    }

    /// Remove any record matching the path id. Idempotent: deleting an
    /// absent id succeeds, and the document is rewritten either way.
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let _guard = self.store.lock().await;
        let mut doc = self.store.load().await?;

        let target = parse_id(id);
        self.collection
            .records_mut(&mut doc)
            .retain(|rec| target.is_none() || record_id(rec) != target);

        if let Err(err) = self.store.save(&mut doc).await {
            warn!(%err, collection = self.collection.label(), "failed to persist delete");
        }
        debug!(id, collection = self.collection.label(), "record deleted");
        Ok(())
    }

    /// Take the collection's counter as the new id, bump it by one and
    /// persist the whole document. Caller must hold the store lock.
    async fn allocate_id(&self) -> Result<i64, ServiceError> {
        let mut doc = self.store.load().await?;
        let id = self.collection.next_id(&doc);
        self.collection.set_next_id(&mut doc, id + 1);
        if let Err(err) = self.store.save(&mut doc).await {
            warn!(%err, collection = self.collection.label(), "failed to persist id allocation");
        }
        Ok(id)
    }
}

/// Strict integer parse; anything else never matches a record.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

#[async_trait::async_trait]
impl RecordStore for RecordService {
    async fn list(&self) -> Result<Vec<Record>, ServiceError> { self.list().await }
    async fn create(&self, body: Record) -> Result<Record, ServiceError> { self.create(body).await }
    async fn update(&self, id: &str, body: Record) -> Result<Record, ServiceError> { self.update(id, body).await }
    async fn delete(&self, id: &str) -> Result<(), ServiceError> { self.delete(id).await }
}

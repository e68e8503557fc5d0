use std::{path::PathBuf, sync::Arc};

use tokio::{
    fs,
    sync::{Mutex, MutexGuard},
};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::document::Document;

/// Durable load/save of the whole [`Document`] as pretty-printed JSON.
///
/// Nothing is cached between requests: every operation reads the file and
/// every mutation rewrites it wholesale. The store only carries the path
/// and a mutex that mutating callers hold across their whole
/// read-modify-write cycle; overlapping cycles would otherwise lose
/// updates or hand out duplicate ids.
pub struct DocumentStore {
    file_path: PathBuf,
    write_gate: Mutex<()>,
}

impl DocumentStore {
    /// Open the store, creating the parent directory and, when the file is
    /// absent, an empty document with both counters at 1. Idempotent.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        if fs::metadata(&file_path).await.is_err() {
            info!(file = %file_path.display(), "initializing data file");
            let data = serde_json::to_vec_pretty(&Document::empty())
                .map_err(|e| ServiceError::StorageWrite(e.to_string()))?;
            fs::write(&file_path, data)
                .await
                .map_err(|e| ServiceError::StorageWrite(e.to_string()))?;
        }

        Ok(Arc::new(Self { file_path, write_gate: Mutex::new(()) }))
    }

    /// Read and parse the document. A missing or unparsable file is a fatal
    /// per-request error, never a retry condition.
    pub async fn load(&self) -> Result<Document, ServiceError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::StorageRead(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::StorageRead(e.to_string()))
    }

    /// Persist the document, advancing each counter by its collection's
    /// current length first. The length increment is part of the persisted
    /// counter contract; callers must not re-apply it.
    pub async fn save(&self, doc: &mut Document) -> Result<(), ServiceError> {
        doc.next_scenario_id += doc.scenarios.len() as i64;
        doc.next_vehicle_id += doc.vehicles.len() as i64;

        let data = serde_json::to_vec_pretty(doc)
            .map_err(|e| ServiceError::StorageWrite(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::StorageWrite(e.to_string()))
    }

    /// Guard serializing a full load-mutate-save cycle. Held by mutating
    /// record operations for their whole duration.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("document_store_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn new_initializes_missing_file_with_empty_document() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = DocumentStore::new(&tmp).await?;

        let doc = store.load().await?;
        assert!(doc.scenarios.is_empty());
        assert!(doc.vehicles.is_empty());
        assert_eq!(doc.next_scenario_id, 1);
        assert_eq!(doc.next_vehicle_id, 1);

        // pretty-printed on disk
        let raw = tokio::fs::read_to_string(&tmp).await?;
        assert!(raw.contains('\n'));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn new_leaves_existing_file_untouched() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let seeded = json!({
            "scenarios": [{"id": 1, "name": "demo"}],
            "vehicles": [],
            "nextScenarioId": 2,
            "nextVehicleId": 1
        });
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&seeded)?).await?;

        let store = DocumentStore::new(&tmp).await?;
        let doc = store.load().await?;
        assert_eq!(doc.scenarios.len(), 1);
        assert_eq!(doc.next_scenario_id, 2);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn load_rejects_missing_and_corrupt_files() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = DocumentStore::new(&tmp).await?;

        tokio::fs::write(&tmp, b"{ not json").await?;
        assert!(matches!(store.load().await, Err(ServiceError::StorageRead(_))));

        tokio::fs::remove_file(&tmp).await?;
        assert!(matches!(store.load().await, Err(ServiceError::StorageRead(_))));
        Ok(())
    }

    // Known quirk: save advances each counter by its collection's length,
    // so counters drift upward on every write whether or not a record was
    // added. Intentional; do not "fix" without changing the wire contract.
    #[tokio::test]
    async fn counters_advance_by_collection_length_on_save() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let store = DocumentStore::new(&tmp).await?;

        let mut doc = store.load().await?;
        doc.scenarios.push(serde_json::from_str(r#"{"id": 1}"#)?);
        doc.scenarios.push(serde_json::from_str(r#"{"id": 2}"#)?);
        doc.vehicles.push(serde_json::from_str(r#"{"id": 1}"#)?);
        store.save(&mut doc).await?;

        let reloaded = store.load().await?;
        assert_eq!(reloaded.next_scenario_id, 3); // 1 + 2 scenarios
        assert_eq!(reloaded.next_vehicle_id, 2); // 1 + 1 vehicle

        // a save with no mutation still drifts
        let mut doc = store.load().await?;
        store.save(&mut doc).await?;
        let reloaded = store.load().await?;
        assert_eq!(reloaded.next_scenario_id, 5);
        assert_eq!(reloaded.next_vehicle_id, 3);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn counters_persisted_as_strings_load_as_integers() -> Result<(), anyhow::Error> {
        let tmp = temp_path();
        let seeded = json!({
            "scenarios": [],
            "vehicles": [],
            "nextScenarioId": "41",
            "nextVehicleId": "7"
        });
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&seeded)?).await?;

        let store = DocumentStore::new(&tmp).await?;
        let doc = store.load().await?;
        assert_eq!(doc.next_scenario_id, 41);
        assert_eq!(doc.next_vehicle_id, 7);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}

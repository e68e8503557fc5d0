use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::storage::document::Record;

/// Trait abstraction for collection-scoped record storage (CRUD over one
/// array of the persisted document).
///
/// Path ids arrive as raw strings; implementations parse them as strict
/// integers, and an unparsable id never matches any record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Record>, ServiceError>;
    async fn create(&self, body: Record) -> Result<Record, ServiceError>;
    async fn update(&self, id: &str, body: Record) -> Result<Record, ServiceError>;
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

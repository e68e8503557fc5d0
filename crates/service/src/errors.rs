use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage read error: {0}")]
    StorageRead(String),
    #[error("storage write error: {0}")]
    StorageWrite(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

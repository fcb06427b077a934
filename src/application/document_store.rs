// Server-side storage for the opaque dashboard document
use crate::application::dashboard_repository::RepositoryError;
use async_trait::async_trait;
use serde_json::Value;

/// Backing store of the persistence endpoint. Documents are kept as
/// opaque JSON: the server never interprets dashboard shapes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read(&self) -> Result<Vec<Value>, RepositoryError>;

    async fn write(&self, documents: &[Value]) -> Result<(), RepositoryError>;
}

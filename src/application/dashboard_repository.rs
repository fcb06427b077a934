// Repository trait for the persisted dashboard document
use crate::domain::Collection;
use crate::domain::schema::DashboardRecord;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("request to persistence endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("persistence endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("dashboard document I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("dashboard document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// Full-document store: every read returns the whole collection and every
/// write replaces it. There is no partial update and no version token.
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Fetch every dashboard as stored, before any schema upgrade.
    async fn fetch_all(&self) -> Result<Vec<DashboardRecord>, RepositoryError>;

    /// Replace the stored document with `collection`.
    async fn replace_all(&self, collection: &Collection) -> Result<(), RepositoryError>;
}

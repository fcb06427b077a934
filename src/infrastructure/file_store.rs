// JSON file document store
use crate::application::dashboard_repository::RepositoryError;
use crate::application::document_store::DocumentStore;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, creating the directory and an empty `[]`
    /// document if they do not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        if !fs::try_exists(&path).await? {
            tracing::info!("Creating empty dashboard document at {}", path.display());
            fs::write(&path, "[]").await?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn read(&self) -> Result<Vec<Value>, RepositoryError> {
        let data = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&data)?)
    }

    async fn write(&self, documents: &[Value]) -> Result<(), RepositoryError> {
        let data = serde_json::to_string_pretty(documents)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.path).await?;
        tracing::debug!("Wrote {} dashboards to {}", documents.len(), self.path.display());
        Ok(())
    }
}

// HTTP dashboard repository - GET/POST of the whole collection
use crate::application::dashboard_repository::{DashboardRepository, RepositoryError};
use crate::domain::Collection;
use crate::domain::schema::DashboardRecord;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpDashboardRepository {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDashboardRepository {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RepositoryError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(RepositoryError::Status { status, body })
    }
}

#[async_trait]
impl DashboardRepository for HttpDashboardRepository {
    async fn fetch_all(&self) -> Result<Vec<DashboardRecord>, RepositoryError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let body = Self::check(response).await?.bytes().await?;
        let records: Vec<DashboardRecord> = serde_json::from_slice(&body)?;
        tracing::debug!("Fetched {} dashboards from {}", records.len(), self.endpoint);
        Ok(records)
    }

    async fn replace_all(&self, collection: &Collection) -> Result<(), RepositoryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(collection)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::document_store::DocumentStore;
    use crate::domain::{Dashboard, NewWidget};
    use crate::infrastructure::file_store::JsonFileStore;
    use crate::presentation::{AppState, build_router};
    use std::sync::Arc;

    async fn serve(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(Arc::new(state))).await.unwrap();
        });
        format!("http://{}/api/dashboards", addr)
    }

    #[tokio::test]
    async fn test_replace_then_fetch_against_server() {
        let dir = tempfile::tempdir().unwrap();
        let documents = JsonFileStore::open(dir.path().join("dashboards.json")).await.unwrap();
        let endpoint = serve(AppState::new(Arc::new(documents))).await;
        let repo = HttpDashboardRepository::new(format!("{}/", endpoint));
        assert_eq!(repo.endpoint(), endpoint);

        assert!(repo.fetch_all().await.unwrap().is_empty());

        let mut dashboard = Dashboard::new("Office", 2, "/office");
        dashboard.sections[0]
            .widgets
            .push(NewWidget::entity_card("light.desk").with_id("w1".into()));
        repo.replace_all(&Collection::new(vec![dashboard.clone()]))
            .await
            .unwrap();

        let records = repo.fetch_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, dashboard.id);
        let sections = records[0].sections.as_ref().unwrap();
        assert_eq!(sections[0].widgets[0].entity_id, "light.desk");
    }

    #[tokio::test]
    async fn test_transport_error_surfaces() {
        // nothing listens on port 9 locally
        let repo = HttpDashboardRepository::new("http://127.0.0.1:9/api/dashboards");
        let err = repo.fetch_all().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Transport(_)));
    }

    #[tokio::test]
    async fn test_undecodable_document_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let documents = JsonFileStore::open(dir.path().join("dashboards.json")).await.unwrap();
        documents
            .write(&[serde_json::json!({ "name": "No id" })])
            .await
            .unwrap();
        let endpoint = serve(AppState::new(Arc::new(documents))).await;

        let err = HttpDashboardRepository::new(endpoint).fetch_all().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Json(_)));
    }
}

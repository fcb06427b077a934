// Home automation hub REST client - entity states and service calls
use crate::application::entity_feed::EntityFeed;
use crate::domain::entity::{EntityMap, EntityState, ServiceCall};
use crate::infrastructure::config::HubSettings;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("request to hub failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("hub returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub struct HubClient {
    client: reqwest::Client,
    host: String,
    token: String,
    entities: watch::Sender<Arc<EntityMap>>,
}

impl HubClient {
    pub fn new(settings: HubSettings) -> Self {
        let (entities, _) = watch::channel(Arc::new(EntityMap::new()));
        Self {
            client: reqwest::Client::new(),
            host: settings.host.trim_end_matches('/').to_string(),
            token: settings.token,
            entities,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<EntityMap>> {
        self.entities.subscribe()
    }

    /// Pull every entity state and publish the new map. Returns the
    /// number of entities.
    pub async fn refresh(&self) -> Result<usize, HubError> {
        let response = self
            .client
            .get(format!("{}/api/states", self.host))
            .bearer_auth(&self.token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let states = Self::check(response)
            .await?
            .json::<Vec<EntityState>>()
            .await?;

        let map: EntityMap = states
            .into_iter()
            .map(|e| (e.entity_id.clone(), e))
            .collect();
        let count = map.len();
        self.entities.send_replace(Arc::new(map));
        tracing::debug!("Refreshed {} entities from hub", count);
        Ok(count)
    }

    async fn post_service(&self, call: &ServiceCall) -> Result<(), HubError> {
        let url = format!(
            "{}/api/services/{}/{}",
            self.host,
            urlencoding::encode(&call.domain),
            urlencoding::encode(&call.service)
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&call.payload)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, HubError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(HubError::Status { status, body })
    }
}

#[async_trait]
impl EntityFeed for HubClient {
    fn entities(&self) -> Arc<EntityMap> {
        self.entities.borrow().clone()
    }

    async fn call_service(&self, call: ServiceCall) {
        tracing::debug!("Calling {}.{}", call.domain, call.service);
        if let Err(e) = self.post_service(&call).await {
            tracing::error!("Error calling service {}.{}: {}", call.domain, call.service, e);
        }
    }
}

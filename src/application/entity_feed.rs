// Entity feed trait - read-only live entity states plus service calls
use crate::domain::entity::{EntityMap, ServiceCall};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait EntityFeed: Send + Sync {
    /// Latest known state of every entity.
    fn entities(&self) -> Arc<EntityMap>;

    /// Fire-and-forget service invocation. Failures are logged by the
    /// implementation and never surfaced to the caller.
    async fn call_service(&self, call: ServiceCall);
}

// Application state for HTTP handlers
use crate::application::document_store::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }
}

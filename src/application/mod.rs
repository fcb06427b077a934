// Application layer - State store, drag engine and the ports they depend on
pub mod dashboard_repository;
pub mod dashboard_store;
pub mod document_store;
pub mod drag;
pub mod entity_feed;
pub mod session;

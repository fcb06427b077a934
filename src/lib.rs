//! Dashboard builder for a home automation hub.
//!
//! Dashboards hold ordered sections, sections hold ordered widgets, and each
//! widget is bound to one hub entity. [`DashboardStore`] owns the live
//! collection and every mutation on it, saving the whole collection through
//! a [`DashboardRepository`] after each change. [`DragEngine`] turns a
//! drag gesture into one widget move.
//!
//! The binary serves the persistence endpoint (`GET`/`POST /api/dashboards`)
//! from a JSON file.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::dashboard_repository::{DashboardRepository, RepositoryError};
pub use application::dashboard_store::{DashboardStore, StoreError, Unsaved};
pub use application::drag::{DragEngine, DragPhase, MoveRequest, resolve_container};
pub use application::session::Session;
pub use domain::{
    Collection, Dashboard, DashboardId, NewWidget, Section, SectionId, Widget, WidgetId,
    WidgetKind, WidgetLayout,
};

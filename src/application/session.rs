// Per-session UI state: which dashboard is showing and whether edit mode is on
use crate::domain::{Collection, DashboardId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub active_dashboard_id: Option<DashboardId>,
    pub editing: bool,
}

impl Session {
    /// Select the first dashboard when nothing is selected yet.
    pub fn select_default(&mut self, collection: &Collection) -> bool {
        if self.active_dashboard_id.is_some() {
            return self.reconcile(collection);
        }
        self.active_dashboard_id = collection.first_id().cloned();
        self.active_dashboard_id.is_some()
    }

    /// A selection whose dashboard is gone moves to the first dashboard,
    /// or to none. Returns `true` if the selection changed.
    pub fn reconcile(&mut self, collection: &Collection) -> bool {
        match &self.active_dashboard_id {
            Some(id) if !collection.contains(id) => {
                self.active_dashboard_id = collection.first_id().cloned();
                true
            }
            _ => false,
        }
    }
}

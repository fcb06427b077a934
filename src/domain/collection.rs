// Dashboard collection - the unit of persistence
use super::dashboard::Dashboard;
use super::ids::DashboardId;
use serde::Serialize;

/// Ordered list of every dashboard. Reads and writes always move the
/// whole collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection(Vec<Dashboard>);

impl Collection {
    pub fn new(dashboards: Vec<Dashboard>) -> Self {
        Self(dashboards)
    }

    pub fn dashboards(&self) -> &[Dashboard] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &DashboardId) -> Option<&Dashboard> {
        self.0.iter().find(|d| &d.id == id)
    }

    pub fn get_mut(&mut self, id: &DashboardId) -> Option<&mut Dashboard> {
        self.0.iter_mut().find(|d| &d.id == id)
    }

    pub fn contains(&self, id: &DashboardId) -> bool {
        self.get(id).is_some()
    }

    pub fn first_id(&self) -> Option<&DashboardId> {
        self.0.first().map(|d| &d.id)
    }

    /// Dashboard mounted at `path`; a missing leading slash is tolerated.
    pub fn find_by_path(&self, path: &str) -> Option<&Dashboard> {
        let path = super::dashboard::normalize_path(path);
        self.0.iter().find(|d| d.path == path)
    }

    pub fn push(&mut self, dashboard: Dashboard) {
        self.0.push(dashboard);
    }

    pub fn remove(&mut self, id: &DashboardId) -> bool {
        let before = self.0.len();
        self.0.retain(|d| &d.id != id);
        self.0.len() != before
    }

    /// Swap in `dashboard` for the entry with the same id.
    pub fn replace(&mut self, dashboard: Dashboard) -> bool {
        match self.get_mut(&dashboard.id) {
            Some(slot) => {
                *slot = dashboard;
                true
            }
            None => false,
        }
    }
}

impl From<Vec<Dashboard>> for Collection {
    fn from(dashboards: Vec<Dashboard>) -> Self {
        Self(dashboards)
    }
}

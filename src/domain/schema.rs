// Stored document shape and the upgrade into the current model
use super::collection::Collection;
use super::dashboard::{DEFAULT_COLUMNS, Dashboard, fallback_column, normalize_path, slugify};
use super::ids::{DashboardId, SectionId};
use super::section::{MIGRATED_SECTION_TITLE, Section};
use super::widget::Widget;
use serde::{Deserialize, Serialize};

/// A dashboard exactly as it sits in the persisted document. Older
/// documents hold a flat `widgets` list instead of `sections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRecord {
    pub id: DashboardId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets: Option<Vec<Widget>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Flat widget list, no sections.
    Legacy,
    Sectioned,
}

impl SchemaVersion {
    pub fn detect(record: &DashboardRecord) -> Self {
        if record.sections.is_none() && record.widgets.is_some() {
            SchemaVersion::Legacy
        } else {
            SchemaVersion::Sectioned
        }
    }
}

/// Bring a loaded document up to the current shape. Pure and idempotent:
/// upgrading an already-upgraded collection returns it unchanged.
pub fn upgrade(records: Vec<DashboardRecord>) -> Collection {
    records.into_iter().map(upgrade_dashboard).collect::<Vec<_>>().into()
}

fn upgrade_dashboard(record: DashboardRecord) -> Dashboard {
    let version = SchemaVersion::detect(&record);
    let columns = record.columns.unwrap_or(DEFAULT_COLUMNS).max(1);
    let path = match record.path {
        Some(path) => normalize_path(&path),
        None => normalize_path(&slugify(&record.name)),
    };

    let mut sections = match (version, record.sections, record.widgets) {
        (SchemaVersion::Legacy, _, Some(widgets)) => {
            tracing::debug!(
                "Migrating dashboard {} ({} widgets) into a single section",
                record.id,
                widgets.len()
            );
            vec![Section {
                id: SectionId::generate(),
                title: MIGRATED_SECTION_TITLE.to_string(),
                column: None,
                widgets,
            }]
        }
        (_, Some(sections), stray) => {
            if stray.is_some_and(|w| !w.is_empty()) {
                tracing::warn!(
                    "Dashboard {} carries both sections and a legacy widget list; dropping the legacy list",
                    record.id
                );
            }
            sections
        }
        (_, None, _) => Vec::new(),
    };

    for (index, section) in sections.iter_mut().enumerate() {
        if section.column.is_none() {
            section.column = Some(fallback_column(index, columns));
        }
    }

    Dashboard {
        id: record.id,
        name: record.name,
        icon: record.icon,
        columns,
        path,
        sections,
    }
}

impl From<Dashboard> for DashboardRecord {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            id: dashboard.id,
            name: dashboard.name,
            icon: dashboard.icon,
            columns: Some(dashboard.columns),
            path: Some(dashboard.path),
            sections: Some(dashboard.sections),
            widgets: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<DashboardRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_legacy_widgets_become_main_section() {
        let collection = upgrade(records(json!([{
            "id": "d1",
            "name": "Home",
            "icon": "layout-dashboard",
            "widgets": [
                { "id": "w1", "type": "entity-card", "entityId": "light.a" },
                { "id": "w2", "type": "entity-card", "entityId": "light.b" }
            ]
        }])));

        let dashboard = &collection.dashboards()[0];
        assert_eq!(dashboard.sections.len(), 1);
        let section = &dashboard.sections[0];
        assert_eq!(section.title, "Main Section");
        let ids: Vec<&str> = section.widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["w1", "w2"]);
        assert_eq!(dashboard.columns, 3);
        assert_eq!(dashboard.path, "/home");

        let value = serde_json::to_value(&collection).unwrap();
        assert!(value[0].get("widgets").is_none());
        assert_eq!(value[0]["icon"], "layout-dashboard");
    }

    #[test]
    fn test_missing_sections_and_widgets_yield_empty_sections() {
        let collection = upgrade(records(json!([{ "id": "d1", "name": "Empty" }])));
        assert!(collection.dashboards()[0].sections.is_empty());
        assert_eq!(
            SchemaVersion::detect(&records(json!([{ "id": "d1", "name": "Empty" }]))[0]),
            SchemaVersion::Sectioned
        );
    }

    #[test]
    fn test_sections_take_precedence_over_stray_widgets() {
        let collection = upgrade(records(json!([{
            "id": "d1",
            "name": "Both",
            "sections": [{ "id": "s1", "title": "Top", "widgets": [] }],
            "widgets": [{ "id": "w9", "type": "entity-card", "entityId": "light.z" }]
        }])));
        let dashboard = &collection.dashboards()[0];
        assert_eq!(dashboard.sections.len(), 1);
        assert_eq!(dashboard.sections[0].title, "Top");
    }

    #[test]
    fn test_upgrade_is_idempotent() {
        let first = upgrade(records(json!([
            {
                "id": "d1",
                "name": "Legacy",
                "widgets": [{ "id": "w1", "type": "climate", "entityId": "climate.hall" }]
            },
            {
                "id": "d2",
                "name": "Current",
                "columns": 2,
                "path": "/current",
                "sections": [
                    { "id": "s1", "title": "A", "widgets": [] },
                    { "id": "s2", "title": "B", "widgets": [] },
                    { "id": "s3", "title": "C", "column": 0, "widgets": [] }
                ]
            }
        ])));

        let reloaded: Vec<DashboardRecord> =
            serde_json::from_value(serde_json::to_value(&first).unwrap()).unwrap();
        let second = upgrade(reloaded);
        assert_eq!(first, second);

        let columns: Vec<Option<u32>> =
            first.dashboards()[1].sections.iter().map(|s| s.column).collect();
        assert_eq!(columns, vec![Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_zero_columns_clamped() {
        let collection = upgrade(records(json!([{ "id": "d1", "name": "Z", "columns": 0, "sections": [] }])));
        assert_eq!(collection.dashboards()[0].columns, 1);
    }

    #[test]
    fn test_record_from_dashboard_has_no_legacy_field() {
        let record = DashboardRecord::from(Dashboard::new("New", 3, "/new"));
        assert_eq!(SchemaVersion::detect(&record), SchemaVersion::Sectioned);
        assert!(record.widgets.is_none());
    }
}

// Dashboard domain model
use super::ids::{DashboardId, SectionId, WidgetId};
use super::section::{DEFAULT_SECTION_TITLE, Section};
use super::widget::Widget;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLUMNS: u32 = 3;

/// A named, routed page of sections laid out in `columns` columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: DashboardId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub columns: u32,
    pub path: String,
    pub sections: Vec<Section>,
}

impl Dashboard {
    /// New dashboard holding one empty default section.
    pub fn new(name: impl Into<String>, columns: u32, path: impl AsRef<str>) -> Self {
        Self {
            id: DashboardId::generate(),
            name: name.into(),
            icon: None,
            columns: columns.max(1),
            path: normalize_path(path.as_ref()),
            sections: vec![Section::new(DEFAULT_SECTION_TITLE, Some(0))],
        }
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    pub fn section_mut(&mut self, id: &SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| &s.id == id)
    }

    pub fn widget(&self, widget_id: &WidgetId) -> Option<&Widget> {
        self.sections
            .iter()
            .flat_map(|s| s.widgets.iter())
            .find(|w| &w.id == widget_id)
    }

    /// Append a section. An unset column is pinned to the slot the
    /// section would otherwise fall back to, so later deletions never
    /// reshuffle it.
    pub fn add_section(&mut self, title: impl Into<String>, column: Option<u32>) -> SectionId {
        let column = column.unwrap_or_else(|| fallback_column(self.sections.len(), self.columns));
        let section = Section::new(title, Some(column));
        let id = section.id.clone();
        self.sections.push(section);
        id
    }

    /// Drops the section and every widget in it.
    pub fn remove_section(&mut self, id: &SectionId) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| &s.id != id);
        self.sections.len() != before
    }

    pub fn remove_widget(&mut self, section_id: &SectionId, widget_id: &WidgetId) -> bool {
        self.section_mut(section_id)
            .and_then(|s| s.take_widget(widget_id))
            .is_some()
    }

    /// Move a widget between (or within) sections.
    ///
    /// `new_index` is local to the destination. For a same-section move it
    /// applies to the sequence after the widget was taken out, so moving an
    /// item forward shifts the ones behind it left by one first. Indexes past
    /// the end append. Returns `false`, leaving the dashboard untouched, when
    /// the widget is not in `source` or either section is missing.
    pub fn move_widget(
        &mut self,
        source: &SectionId,
        destination: &SectionId,
        widget_id: &WidgetId,
        new_index: usize,
    ) -> bool {
        let Some(src_idx) = self.sections.iter().position(|s| &s.id == source) else {
            return false;
        };
        let Some(dst_idx) = self.sections.iter().position(|s| &s.id == destination) else {
            return false;
        };
        let Some(widget) = self.sections[src_idx].take_widget(widget_id) else {
            return false;
        };
        self.sections[dst_idx].insert_widget(new_index, widget);
        true
    }

    /// Section buckets per layout column. See [`column_for`].
    pub fn column_layout(&self) -> Vec<Vec<&Section>> {
        let columns = self.columns.max(1);
        let mut buckets: Vec<Vec<&Section>> = (0..columns).map(|_| Vec::new()).collect();
        for (index, section) in self.sections.iter().enumerate() {
            let column = column_for(section.column, index, columns);
            buckets[column as usize].push(section);
        }
        buckets
    }

    /// Grid tracks per section row for this dashboard.
    pub fn grid_columns(&self) -> u32 {
        grid_columns(self.columns)
    }
}

/// Column a section renders in: its own column clamped into range, or
/// `index mod columns` when unset.
pub fn column_for(column: Option<u32>, index: usize, columns: u32) -> u32 {
    let columns = columns.max(1);
    match column {
        Some(c) => c.min(columns - 1),
        None => fallback_column(index, columns),
    }
}

pub fn fallback_column(index: usize, columns: u32) -> u32 {
    (index % columns.max(1) as usize) as u32
}

/// Widget grid tracks inside a section: six shared across the dashboard
/// columns, never fewer than one.
pub fn grid_columns(columns: u32) -> u32 {
    if columns == 0 {
        return 1;
    }
    (6 / columns).max(1)
}

/// Route slug for a dashboard name, e.g. "Living Room!" -> "living-room".
pub fn slugify(text: &str) -> String {
    let mut dashed = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_space {
                dashed.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_alphanumeric() || ch == '_' || ch == '-' {
            dashed.push(ch);
        }
    }

    let mut slug = String::with_capacity(dashed.len());
    for ch in dashed.chars() {
        if ch == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(ch);
    }
    slug
}

pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

// Section domain model
use super::ids::{SectionId, WidgetId};
use super::widget::Widget;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SECTION_TITLE: &str = "Default Section";
pub const MIGRATED_SECTION_TITLE: &str = "Main Section";

/// Titled, ordered group of widgets rendered in one layout column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Section {
    pub fn new(title: impl Into<String>, column: Option<u32>) -> Self {
        Self {
            id: SectionId::generate(),
            title: title.into(),
            column,
            widgets: Vec::new(),
        }
    }

    pub fn position_of(&self, widget_id: &WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| &w.id == widget_id)
    }

    /// Remove a widget by id, returning the full record.
    pub fn take_widget(&mut self, widget_id: &WidgetId) -> Option<Widget> {
        let idx = self.position_of(widget_id)?;
        Some(self.widgets.remove(idx))
    }

    /// Insert at `index`, appending when `index` is past the end.
    pub fn insert_widget(&mut self, index: usize, widget: Widget) {
        let index = index.min(self.widgets.len());
        self.widgets.insert(index, widget);
    }
}

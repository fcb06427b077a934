// Drag/reorder engine - resolves a pointer drag into a single widget move
use crate::domain::{Dashboard, DashboardId, Section, SectionId, WidgetId};

/// A resolved drop, ready to hand to the store's move operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub dashboard_id: DashboardId,
    pub source_section: SectionId,
    pub destination_section: SectionId,
    pub widget_id: WidgetId,
    /// Destination-local insertion index.
    pub new_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging {
        active: WidgetId,
        /// Draggable or droppable id under the pointer: a widget id or a
        /// section id.
        over: Option<String>,
    },
}

/// Section that either is `item_id` or holds a widget with that id.
pub fn resolve_container<'a>(dashboard: &'a Dashboard, item_id: &str) -> Option<&'a Section> {
    dashboard
        .sections
        .iter()
        .find(|s| s.id == *item_id || s.widgets.iter().any(|w| w.id == *item_id))
}

/// Transient drag state. Holds nothing that is persisted; only a
/// completed drop turns into a store mutation.
#[derive(Debug, Default)]
pub struct DragEngine {
    phase: DragPhase,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn active(&self) -> Option<&WidgetId> {
        match &self.phase {
            DragPhase::Dragging { active, .. } => Some(active),
            DragPhase::Idle => None,
        }
    }

    pub fn over(&self) -> Option<&str> {
        match &self.phase {
            DragPhase::Dragging { over, .. } => over.as_deref(),
            DragPhase::Idle => None,
        }
    }

    pub fn pick_up(&mut self, widget_id: WidgetId) {
        tracing::debug!("Drag started for widget {}", widget_id);
        self.phase = DragPhase::Dragging {
            active: widget_id,
            over: None,
        };
    }

    /// Track the item under the pointer. Ignored while idle.
    pub fn hover(&mut self, item_id: Option<&str>) {
        if let DragPhase::Dragging { over, .. } = &mut self.phase {
            *over = item_id.map(str::to_string);
        }
    }

    /// Whether `section` should render as the current drop target.
    pub fn is_section_highlighted(&self, section: &Section) -> bool {
        match self.over() {
            Some(over) => section.id == *over || section.widgets.iter().any(|w| w.id == *over),
            None => false,
        }
    }

    /// Release without a target.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }

    /// Finish the gesture over `over` (or over nothing). The engine always
    /// returns to idle; a move is produced only when both the source and
    /// destination sections resolve and the widget was not dropped onto
    /// itself.
    ///
    /// Dropping onto a widget targets that widget's position; dropping onto
    /// the section container targets one past its length, which the store
    /// treats as append.
    pub fn drop(&mut self, dashboard: &Dashboard, over: Option<&str>) -> Option<MoveRequest> {
        let phase = std::mem::take(&mut self.phase);
        let DragPhase::Dragging { active, .. } = phase else {
            return None;
        };
        let over = over?;
        if active == *over {
            return None;
        }

        let source = resolve_container(dashboard, active.as_str())?;
        let destination = resolve_container(dashboard, over)?;

        let new_index = match destination.widgets.iter().position(|w| w.id == *over) {
            Some(index) => index,
            None => destination.widgets.len() + 1,
        };

        Some(MoveRequest {
            dashboard_id: dashboard.id.clone(),
            source_section: source.id.clone(),
            destination_section: destination.id.clone(),
            widget_id: active,
            new_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewWidget;

    fn dashboard() -> Dashboard {
        let section = |id: &str, widgets: &[&str]| Section {
            id: SectionId::from(id),
            title: id.to_string(),
            column: Some(0),
            widgets: widgets
                .iter()
                .map(|w| NewWidget::entity_card(format!("light.{w}")).with_id(WidgetId::from(*w)))
                .collect(),
        };
        Dashboard {
            id: DashboardId::from("d1"),
            name: "Home".to_string(),
            icon: None,
            columns: 2,
            path: "/".to_string(),
            sections: vec![section("s1", &["w1", "w2", "w3"]), section("s2", &["wa"]), section("s3", &[])],
        }
    }

    #[test]
    fn test_resolve_container() {
        let d = dashboard();
        assert_eq!(resolve_container(&d, "w2").unwrap().id.as_str(), "s1");
        assert_eq!(resolve_container(&d, "s3").unwrap().id.as_str(), "s3");
        assert!(resolve_container(&d, "nope").is_none());
    }

    #[test]
    fn test_drop_on_widget_targets_its_index() {
        let d = dashboard();
        let mut engine = DragEngine::new();
        engine.pick_up(WidgetId::from("w3"));
        engine.hover(Some("w1"));

        let request = engine.drop(&d, Some("w1")).unwrap();
        assert_eq!(request.source_section.as_str(), "s1");
        assert_eq!(request.destination_section.as_str(), "s1");
        assert_eq!(request.widget_id.as_str(), "w3");
        assert_eq!(request.new_index, 0);
        assert_eq!(engine.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_drop_on_section_container_appends() {
        let d = dashboard();
        let mut engine = DragEngine::new();
        engine.pick_up(WidgetId::from("w1"));

        let request = engine.drop(&d, Some("s2")).unwrap();
        assert_eq!(request.destination_section.as_str(), "s2");
        assert_eq!(request.new_index, 2);

        engine.pick_up(WidgetId::from("w1"));
        let request = engine.drop(&d, Some("s3")).unwrap();
        assert_eq!(request.new_index, 1);
    }

    #[test]
    fn test_drop_without_target_discards() {
        let d = dashboard();
        let mut engine = DragEngine::new();
        engine.pick_up(WidgetId::from("w1"));
        engine.hover(Some("s2"));

        assert!(engine.drop(&d, None).is_none());
        assert!(!engine.is_dragging());
        assert!(engine.over().is_none());
    }

    #[test]
    fn test_drop_on_unknown_target_or_self_is_noop() {
        let d = dashboard();
        let mut engine = DragEngine::new();
        engine.pick_up(WidgetId::from("w1"));
        assert!(engine.drop(&d, Some("elsewhere")).is_none());
        assert!(!engine.is_dragging());

        engine.pick_up(WidgetId::from("w1"));
        assert!(engine.drop(&d, Some("w1")).is_none());

        engine.pick_up(WidgetId::from("ghost"));
        assert!(engine.drop(&d, Some("s1")).is_none());
    }

    #[test]
    fn test_drop_while_idle_does_nothing() {
        let d = dashboard();
        let mut engine = DragEngine::new();
        engine.hover(Some("s1"));
        assert!(engine.over().is_none());
        assert!(engine.drop(&d, Some("s1")).is_none());
    }

    #[test]
    fn test_section_highlight_follows_hover() {
        let d = dashboard();
        let mut engine = DragEngine::new();
        engine.pick_up(WidgetId::from("w1"));

        engine.hover(Some("wa"));
        assert!(engine.is_section_highlighted(&d.sections[1]));
        assert!(!engine.is_section_highlighted(&d.sections[0]));

        engine.hover(Some("s3"));
        assert!(engine.is_section_highlighted(&d.sections[2]));

        engine.cancel();
        assert!(!engine.is_section_highlighted(&d.sections[2]));
    }
}

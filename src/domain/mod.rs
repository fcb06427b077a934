// Domain layer - Dashboard model and pure operations over it
pub mod climate;
pub mod collection;
pub mod dashboard;
pub mod entity;
pub mod ids;
pub mod schema;
pub mod section;
pub mod widget;

pub use collection::Collection;
pub use dashboard::Dashboard;
pub use ids::{DashboardId, SectionId, WidgetId};
pub use section::Section;
pub use widget::{NewWidget, Widget, WidgetKind, WidgetLayout};

// Widget domain model
use super::ids::WidgetId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const ENTITY_CARD_TYPE: &str = "entity-card";
pub const CLIMATE_TYPE: &str = "climate";

/// Grid placement for newly added widgets. Stored layouts are reserved and
/// kept as opaque JSON, since placement is driven by sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetLayout {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Default for WidgetLayout {
    fn default() -> Self {
        Self { x: 0, y: 0, w: 1, h: 1 }
    }
}

impl WidgetLayout {
    pub fn to_value(self) -> Value {
        json!({ "x": self.x, "y": self.y, "w": self.w, "h": self.h })
    }
}

/// Widget type together with the options that type understands.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    EntityCard,
    Climate {
        sensor_entity_id: Option<String>,
    },
    /// Unknown type tag, kept verbatim so it survives a save.
    Custom {
        type_tag: String,
        options: Option<Value>,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ClimateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sensor_entity_id: Option<String>,
}

impl WidgetKind {
    pub fn type_tag(&self) -> &str {
        match self {
            WidgetKind::EntityCard => ENTITY_CARD_TYPE,
            WidgetKind::Climate { .. } => CLIMATE_TYPE,
            WidgetKind::Custom { type_tag, .. } => type_tag,
        }
    }

    /// Resolve a wire `type` + `options` pair into a typed variant.
    pub fn resolve(type_tag: String, options: Option<Value>) -> Self {
        match type_tag.as_str() {
            ENTITY_CARD_TYPE if options.as_ref().is_none_or(is_blank) => WidgetKind::EntityCard,
            CLIMATE_TYPE => {
                let parsed = match options.as_ref().filter(|v| !v.is_null()) {
                    None => Some(ClimateOptions::default()),
                    Some(v) => serde_json::from_value::<ClimateOptions>(v.clone()).ok(),
                };
                match parsed {
                    Some(opts) => WidgetKind::Climate {
                        sensor_entity_id: opts.sensor_entity_id,
                    },
                    None => WidgetKind::Custom { type_tag, options },
                }
            }
            _ => WidgetKind::Custom { type_tag, options },
        }
    }

    fn options_value(&self) -> Option<Value> {
        match self {
            WidgetKind::EntityCard => None,
            WidgetKind::Climate { sensor_entity_id } => {
                let opts = ClimateOptions {
                    sensor_entity_id: sensor_entity_id.clone(),
                };
                serde_json::to_value(opts).ok().filter(|v| !is_empty_object(v))
            }
            WidgetKind::Custom { options, .. } => options.clone(),
        }
    }
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|m| m.is_empty())
}

/// `null` or `{}`: options that carry nothing.
fn is_blank(value: &Value) -> bool {
    value.is_null() || is_empty_object(value)
}

/// Keep an explicit `null` distinct from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A dashboard tile bound to one hub entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WidgetRecord", into = "WidgetRecord")]
pub struct Widget {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub entity_id: String,
    /// Reserved placement, stored as-is.
    pub layout: Option<Value>,
    /// Blank `options` as stored for a typed kind, written back unchanged.
    blank_options: Option<Value>,
}

/// Widget before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWidget {
    pub kind: WidgetKind,
    pub entity_id: String,
    pub layout: Option<Value>,
}

impl NewWidget {
    pub fn entity_card(entity_id: impl Into<String>) -> Self {
        Self {
            kind: WidgetKind::EntityCard,
            entity_id: entity_id.into(),
            layout: Some(WidgetLayout::default().to_value()),
        }
    }

    pub fn climate(entity_id: impl Into<String>, sensor_entity_id: Option<String>) -> Self {
        Self {
            kind: WidgetKind::Climate { sensor_entity_id },
            entity_id: entity_id.into(),
            layout: Some(WidgetLayout::default().to_value()),
        }
    }

    pub fn with_id(self, id: WidgetId) -> Widget {
        Widget {
            id,
            kind: self.kind,
            entity_id: self.entity_id,
            layout: self.layout,
            blank_options: None,
        }
    }
}

/// Wire shape. Everything but the id is lenient so a widget written by
/// another client still loads.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WidgetRecord {
    id: WidgetId,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    type_tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    entity_id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    options: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    layout: Option<Value>,
}

impl From<WidgetRecord> for Widget {
    fn from(record: WidgetRecord) -> Self {
        let blank = record.options.clone().filter(is_blank);
        let kind = WidgetKind::resolve(record.type_tag, record.options);
        let blank_options = match kind {
            WidgetKind::Custom { .. } => None,
            _ => blank,
        };
        Self {
            id: record.id,
            kind,
            entity_id: record.entity_id,
            layout: record.layout,
            blank_options,
        }
    }
}

impl From<Widget> for WidgetRecord {
    fn from(widget: Widget) -> Self {
        Self {
            id: widget.id,
            type_tag: widget.kind.type_tag().to_string(),
            options: widget.kind.options_value().or(widget.blank_options),
            entity_id: widget.entity_id,
            layout: widget.layout,
        }
    }
}

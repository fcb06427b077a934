// Hub entity states and service calls
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Live entity map keyed by entity id.
pub type EntityMap = BTreeMap<String, EntityState>;

const ACTIVE_STATES: [&str; 3] = ["on", "home", "open"];
const TOGGLEABLE_DOMAINS: [&str; 3] = ["light", "switch", "input_boolean"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    /// Domain prefix of the entity id, e.g. `light` for `light.kitchen`.
    pub fn domain(&self) -> &str {
        self.entity_id
            .split_once('.')
            .map_or(self.entity_id.as_str(), |(domain, _)| domain)
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn friendly_name(&self) -> &str {
        self.attribute("friendly_name")
            .and_then(Value::as_str)
            .unwrap_or(&self.entity_id)
    }

    pub fn unit(&self) -> Option<&str> {
        self.attribute("unit_of_measurement").and_then(Value::as_str)
    }

    pub fn is_active(&self) -> bool {
        ACTIVE_STATES.contains(&self.state.as_str())
    }

    pub fn is_toggleable(&self) -> bool {
        TOGGLEABLE_DOMAINS.contains(&self.domain())
    }

    /// `toggle` call for lights and switches.
    pub fn toggle_call(&self) -> Option<ServiceCall> {
        match self.domain() {
            "light" | "switch" => Some(ServiceCall::for_entity(
                self.domain(),
                "toggle",
                &self.entity_id,
                Map::new(),
            )),
            _ => None,
        }
    }
}

/// A `domain.service` invocation with its data payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub payload: Value,
}

impl ServiceCall {
    pub fn new(domain: impl Into<String>, service: impl Into<String>, payload: Value) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            payload,
        }
    }

    /// Call targeting one entity; `extra` is merged next to `entity_id`.
    pub fn for_entity(
        domain: &str,
        service: &str,
        entity_id: &str,
        extra: Map<String, Value>,
    ) -> Self {
        let mut payload = Map::new();
        payload.insert("entity_id".to_string(), json!(entity_id));
        payload.extend(extra);
        Self::new(domain, service, Value::Object(payload))
    }
}

/// Entities offered by the add-widget picker: same domain, and the query
/// matched case-insensitively against the id or friendly name.
pub fn filter_entities<'a>(
    entities: &'a EntityMap,
    domain: &str,
    query: &str,
) -> Vec<&'a EntityState> {
    let query = query.to_lowercase();
    entities
        .values()
        .filter(|e| e.domain() == domain)
        .filter(|e| {
            e.entity_id.to_lowercase().contains(&query)
                || e.friendly_name().to_lowercase().contains(&query)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, state: &str, attrs: Value) -> EntityState {
        EntityState {
            entity_id: id.to_string(),
            state: state.to_string(),
            attributes: attrs.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_domain_and_names() {
        let e = entity("sensor.hall_temp", "21.5", json!({
            "friendly_name": "Hall Temperature",
            "unit_of_measurement": "°C"
        }));
        assert_eq!(e.domain(), "sensor");
        assert_eq!(e.friendly_name(), "Hall Temperature");
        assert_eq!(e.unit(), Some("°C"));
        assert!(!e.is_toggleable());

        let bare = entity("weird", "on", json!({}));
        assert_eq!(bare.domain(), "weird");
        assert_eq!(bare.friendly_name(), "weird");
        assert!(bare.is_active());
    }

    #[test]
    fn test_toggle_call_only_for_lights_and_switches() {
        let light = entity("light.desk", "off", json!({}));
        let call = light.toggle_call().unwrap();
        assert_eq!(call.domain, "light");
        assert_eq!(call.service, "toggle");
        assert_eq!(call.payload, json!({ "entity_id": "light.desk" }));

        let boolean = entity("input_boolean.guest_mode", "on", json!({}));
        assert!(boolean.is_toggleable());
        assert!(boolean.toggle_call().is_none());
    }

    #[test]
    fn test_filter_entities_matches_domain_and_query() {
        let mut map = EntityMap::new();
        for e in [
            entity("light.kitchen", "on", json!({ "friendly_name": "Kitchen Ceiling" })),
            entity("light.porch", "off", json!({ "friendly_name": "Front Porch" })),
            entity("switch.kitchen_fan", "off", json!({})),
        ] {
            map.insert(e.entity_id.clone(), e);
        }

        let hits: Vec<&str> = filter_entities(&map, "light", "KITCHEN")
            .iter()
            .map(|e| e.entity_id.as_str())
            .collect();
        assert_eq!(hits, vec!["light.kitchen"]);

        let hits = filter_entities(&map, "light", "front");
        assert_eq!(hits.len(), 1);
        assert_eq!(filter_entities(&map, "light", "").len(), 2);
    }
}

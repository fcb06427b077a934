// Climate entity controls
use super::entity::{EntityState, ServiceCall};
use serde_json::{Map, Value, json};

const DEFAULT_MIN_TEMP: f64 = 7.0;
const DEFAULT_MAX_TEMP: f64 = 35.0;
const DOMAIN: &str = "climate";

/// Thermostat view over a `climate.*` entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateControl {
    pub entity_id: String,
    pub hvac_mode: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub current_temperature: Option<f64>,
    pub target_temperature: f64,
    pub hvac_modes: Vec<String>,
    pub fan_modes: Vec<String>,
    pub fan_mode: String,
}

impl ClimateControl {
    pub fn from_entity(entity: &EntityState) -> Self {
        let number = |key: &str| entity.attribute(key).and_then(Value::as_f64);
        let strings = |key: &str| -> Vec<String> {
            entity
                .attribute(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default()
        };

        let min_temp = number("min_temp").unwrap_or(DEFAULT_MIN_TEMP);
        // a hub-supplied floor above the default ceiling raises the ceiling
        let max_temp = number("max_temp").unwrap_or(DEFAULT_MAX_TEMP).max(min_temp);
        let target_temperature = number("temperature")
            .or_else(|| number("target_temp_low"))
            .unwrap_or(min_temp);

        Self {
            entity_id: entity.entity_id.clone(),
            hvac_mode: entity.state.clone(),
            min_temp,
            max_temp,
            current_temperature: number("current_temperature"),
            target_temperature,
            hvac_modes: strings("hvac_modes"),
            fan_modes: strings("fan_modes"),
            fan_mode: entity
                .attribute("fan_mode")
                .and_then(Value::as_str)
                .unwrap_or("auto")
                .to_string(),
        }
    }

    /// Bound `temperature` to the thermostat range. Never panics, even with
    /// inverted bounds, where the ceiling wins.
    pub fn clamp(&self, temperature: f64) -> f64 {
        temperature.max(self.min_temp).min(self.max_temp)
    }

    /// Step the setpoint by `delta` degrees, staying within range.
    pub fn adjust(&mut self, delta: f64) -> ServiceCall {
        self.set_temperature(self.target_temperature + delta)
    }

    pub fn set_temperature(&mut self, temperature: f64) -> ServiceCall {
        self.target_temperature = self.clamp(temperature);
        self.call("set_temperature", "temperature", json!(self.target_temperature))
    }

    pub fn set_hvac_mode(&self, mode: &str) -> ServiceCall {
        self.call("set_hvac_mode", "hvac_mode", json!(mode))
    }

    pub fn set_fan_mode(&self, mode: &str) -> ServiceCall {
        self.call("set_fan_mode", "fan_mode", json!(mode))
    }

    fn call(&self, service: &str, key: &str, value: Value) -> ServiceCall {
        let mut extra = Map::new();
        extra.insert(key.to_string(), value);
        ServiceCall::for_entity(DOMAIN, service, &self.entity_id, extra)
    }
}

//! Service call — a command addressed to the host, e.g. `switch.turn_on`.

use serde::{Deserialize, Serialize};

/// A command to invoke on the host's command surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCall {
    /// Namespace the verb belongs to, e.g. `"climate"`.
    pub namespace: String,
    /// Verb, e.g. `"set_hvac_mode"`.
    pub verb: String,
    /// Parameters, always including the target `entity_id`.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ServiceCall {
    /// Build a call targeting a single entity.
    #[must_use]
    pub fn for_entity(namespace: &str, verb: &str, entity_ref: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            verb: verb.to_string(),
            params: serde_json::json!({ "entity_id": entity_ref }),
        }
    }

    /// Add a parameter to the call.
    #[must_use]
    pub fn with_param(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        if let Some(params) = self.params.as_object_mut() {
            params.insert(name.to_string(), value.into());
        }
        self
    }

    /// Target entity, if the call names one.
    #[must_use]
    pub fn entity_ref(&self) -> Option<&str> {
        self.params.get("entity_id").and_then(serde_json::Value::as_str)
    }
}

impl std::fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.verb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_target_entity_in_params() {
        let call = ServiceCall::for_entity("switch", "turn_on", "switch.a");
        assert_eq!(call.entity_ref(), Some("switch.a"));
        assert_eq!(call.to_string(), "switch.turn_on");
    }

    #[test]
    fn should_add_extra_parameter() {
        let call = ServiceCall::for_entity("climate", "set_hvac_mode", "climate.b")
            .with_param("hvac_mode", "heat");
        assert_eq!(
            call.params,
            serde_json::json!({"entity_id": "climate.b", "hvac_mode": "heat"})
        );
    }
}

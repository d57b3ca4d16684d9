//! Entity states — a read-only snapshot of the host's live device states.
//!
//! Entities are addressed by `namespace.object_id` references such as
//! `switch.boiler` or `binary_sensor.front_door`. The engine reads one
//! snapshot per evaluation and never caches it beyond that.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Split an entity reference into its namespace prefix.
///
/// `"climate.living_room"` → `"climate"`. A reference without a dot is its
/// own namespace.
#[must_use]
pub fn namespace_of(entity_ref: &str) -> &str {
    entity_ref
        .split_once('.')
        .map_or(entity_ref, |(namespace, _)| namespace)
}

/// Point-in-time map of entity reference → raw state string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityStates(HashMap<String, String>);

impl EntityStates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw state of an entity, if the registry knows it.
    #[must_use]
    pub fn get(&self, entity_ref: &str) -> Option<&str> {
        self.0.get(entity_ref).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, entity_ref: &str) -> bool {
        self.0.contains_key(entity_ref)
    }

    /// Record or overwrite an entity's state.
    pub fn insert(&mut self, entity_ref: impl Into<String>, state: impl Into<String>) {
        self.0.insert(entity_ref.into(), state.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EntityStates {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_extract_namespace_before_first_dot() {
        assert_eq!(namespace_of("climate.living_room"), "climate");
        assert_eq!(namespace_of("input_boolean.guest.mode"), "input_boolean");
    }

    #[test]
    fn should_treat_reference_without_dot_as_namespace() {
        assert_eq!(namespace_of("sun"), "sun");
    }

    #[test]
    fn should_collect_states_from_pairs() {
        let states: EntityStates = [("switch.a", "on"), ("light.b", "off")]
            .into_iter()
            .collect();
        assert_eq!(states.len(), 2);
        assert_eq!(states.get("switch.a"), Some("on"));
        assert!(!states.contains("script.c"));
    }

    #[test]
    fn should_overwrite_state_on_insert() {
        let mut states = EntityStates::new();
        states.insert("switch.a", "off");
        states.insert("switch.a", "on");
        assert_eq!(states.get("switch.a"), Some("on"));
    }
}

//! Card configuration — the validated settings of one widget instance.
//!
//! Raw configuration arrives as an untyped JSON document. Each known field
//! is checked on its own: a malformed field is dropped and replaced by its
//! default, unknown fields are ignored. Only a document that is not an
//! object at all is rejected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigIssue;
use crate::storage_key;

/// Default title shown when the configuration has none.
pub const DEFAULT_TITLE: &str = "24 Hour Timer";

/// How sensor contributions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HomeLogic {
    /// Every sensor must report presence.
    And,
    /// At least one sensor must report presence.
    #[default]
    Or,
}

impl HomeLogic {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }

    /// Fold sensor contributions. An empty input folds to the identity
    /// (`true` for AND, `false` for OR).
    pub fn combine(self, mut contributions: impl Iterator<Item = bool>) -> bool {
        match self {
            Self::And => contributions.all(|value| value),
            Self::Or => contributions.any(|value| value),
        }
    }
}

/// Validated configuration of one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardConfig {
    pub title: String,
    pub home_logic: HomeLogic,
    /// Actuators driven by the verdict.
    pub entities: Vec<String>,
    /// Sensors gating the schedule.
    pub home_sensors: Vec<String>,
    /// Whether the remote copy is periodically pulled back in.
    pub save_state: bool,
    pub storage_key: String,
    pub allow_local_fallback: bool,
    /// Whether a missing storage key is generated (and later cleaned up).
    pub auto_create_helper: bool,
}

/// Result of parsing a raw configuration document.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    pub config: CardConfig,
    /// Fields that were present but malformed and fell back to defaults.
    pub dropped: Vec<ConfigIssue>,
}

impl CardConfig {
    /// Configuration offered to a freshly added widget.
    #[must_use]
    pub fn stub() -> Self {
        Self {
            title: "Timer 24H".to_string(),
            home_logic: HomeLogic::Or,
            entities: Vec::new(),
            home_sensors: Vec::new(),
            save_state: true,
            storage_key: storage_key::generate(),
            allow_local_fallback: true,
            auto_create_helper: true,
        }
    }

    /// Parse a raw document, generating a storage key when needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIssue::NotAnObject`] when `raw` is not a JSON object.
    pub fn from_value(raw: &Value) -> Result<ParsedConfig, ConfigIssue> {
        Self::from_value_with(raw, storage_key::generate)
    }

    /// Same as [`from_value`](Self::from_value) with an explicit key
    /// generator, called only when the document supplies no key and
    /// `auto_create_helper` is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigIssue::NotAnObject`] when `raw` is not a JSON object.
    pub fn from_value_with(
        raw: &Value,
        generate_key: impl FnOnce() -> String,
    ) -> Result<ParsedConfig, ConfigIssue> {
        let map = raw.as_object().ok_or(ConfigIssue::NotAnObject)?;
        let mut dropped = Vec::new();

        let title = field(map, "title", &mut dropped, |value| {
            value.as_str().map(|title| (!title.is_empty()).then(|| title.to_string()))
        })
        .flatten()
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let home_logic = field(map, "home_logic", &mut dropped, |value| {
            value.as_str().and_then(HomeLogic::parse)
        })
        .unwrap_or_default();

        let entities = string_list(map, "entities", &mut dropped);
        let home_sensors = string_list(map, "home_sensors", &mut dropped);

        let save_state = flag(map, "save_state", &mut dropped).unwrap_or(true);
        let allow_local_fallback =
            flag(map, "allow_local_fallback", &mut dropped).unwrap_or(true);
        let auto_create_helper = flag(map, "auto_create_helper", &mut dropped).unwrap_or(true);

        let explicit_key = field(map, "storage_key", &mut dropped, non_empty_string)
            .or_else(|| field(map, "storage_entity_id", &mut dropped, non_empty_string));
        let storage_key = match explicit_key {
            Some(key) => key,
            None if auto_create_helper => generate_key(),
            None => storage_key::DEFAULT_KEY.to_string(),
        };

        Ok(ParsedConfig {
            config: Self {
                title,
                home_logic,
                entities,
                home_sensors,
                save_state,
                storage_key,
                allow_local_fallback,
                auto_create_helper,
            },
            dropped,
        })
    }
}

/// Read one field through `parse`; a present-but-unparseable value is
/// recorded in `dropped`.
fn field<T>(
    map: &Map<String, Value>,
    name: &'static str,
    dropped: &mut Vec<ConfigIssue>,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = map.get(name)?;
    let parsed = parse(value);
    if parsed.is_none() && !value.is_null() {
        dropped.push(ConfigIssue::InvalidField(name));
    }
    parsed
}

fn flag(
    map: &Map<String, Value>,
    name: &'static str,
    dropped: &mut Vec<ConfigIssue>,
) -> Option<bool> {
    field(map, name, dropped, Value::as_bool)
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Keep only the non-empty string elements of a list field.
fn string_list(
    map: &Map<String, Value>,
    name: &'static str,
    dropped: &mut Vec<ConfigIssue>,
) -> Vec<String> {
    let items = match map.get(name) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(_) => {
            dropped.push(ConfigIssue::InvalidField(name));
            return Vec::new();
        }
    };
    let kept: Vec<String> = items.iter().filter_map(non_empty_string).collect();
    if kept.len() != items.len() {
        dropped.push(ConfigIssue::InvalidField(name));
    }
    kept
}

//! Activation — whether "now" should be considered active.
//!
//! The verdict is the conjunction of two parts:
//! - the **schedule** verdict: the armed flag of the slot containing now;
//! - the **sensor** verdict: the configured sensors folded with
//!   [`HomeLogic`]. No sensors means the schedule alone decides.
//!
//! Sensors can only suppress an armed slot, never arm an unarmed one.

use chrono::Timelike;
use serde::Serialize;

use crate::config::CardConfig;
use crate::entity::EntityStates;
use crate::slot::SlotGrid;

/// Sensor whose `on` state marks a restricted period that keeps the system
/// active.
// TODO: replace with a per-sensor polarity field in `CardConfig`.
pub const RESTRICTION_SENSOR: &str = "binary_sensor.jewish_calendar_issur_melacha_in_effect";

/// Lower-cased states counted as presence.
pub const PRESENCE_STATES: [&str; 5] = ["on", "home", "true", "active", "detected"];

/// How a sensor's raw state is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorPolarity {
    /// Any presence token counts.
    Presence,
    /// Only a literal `on` counts.
    Restriction,
}

impl SensorPolarity {
    #[must_use]
    pub fn of(sensor_ref: &str) -> Self {
        if sensor_ref == RESTRICTION_SENSOR {
            Self::Restriction
        } else {
            Self::Presence
        }
    }

    /// Normalise a raw state into a contribution.
    #[must_use]
    pub fn contribution(self, raw_state: &str) -> bool {
        let state = raw_state.to_lowercase();
        match self {
            Self::Restriction => state == "on",
            Self::Presence => PRESENCE_STATES.contains(&state.as_str()),
        }
    }
}

/// Contribution of a single sensor; unknown sensors count as `false`.
#[must_use]
pub fn sensor_contribution(sensor_ref: &str, states: &EntityStates) -> bool {
    states
        .get(sensor_ref)
        .is_some_and(|state| SensorPolarity::of(sensor_ref).contribution(state))
}

/// Verdict of the configured sensors alone.
#[must_use]
pub fn sensor_verdict(config: &CardConfig, states: &EntityStates) -> bool {
    if config.home_sensors.is_empty() {
        return true;
    }
    config.home_logic.combine(
        config
            .home_sensors
            .iter()
            .map(|sensor| sensor_contribution(sensor, states)),
    )
}

/// Verdict of the schedule alone.
#[must_use]
pub fn schedule_verdict(grid: &SlotGrid, now: &impl Timelike) -> bool {
    grid.current_slot(now).active
}

/// Both halves of a verdict, kept apart for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub schedule: bool,
    pub sensors: bool,
    pub active: bool,
}

/// Evaluate the full verdict for `now`.
#[must_use]
pub fn evaluate(
    grid: &SlotGrid,
    config: &CardConfig,
    states: &EntityStates,
    now: &impl Timelike,
) -> Verdict {
    let schedule = schedule_verdict(grid, now);
    let sensors = sensor_verdict(config, states);
    Verdict {
        schedule,
        sensors,
        active: schedule && sensors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HomeLogic;
    use chrono::NaiveTime;

    fn config(logic: HomeLogic, sensors: &[&str]) -> CardConfig {
        let mut config = CardConfig::stub();
        config.home_logic = logic;
        config.home_sensors = sensors.iter().map(ToString::to_string).collect();
        config
    }

    fn ten_am() -> NaiveTime {
        NaiveTime::from_hms_opt(10, 12, 0).unwrap()
    }

    fn armed_at_ten() -> SlotGrid {
        let mut grid = SlotGrid::new();
        grid.toggle(10, 0);
        grid
    }

    #[test]
    fn should_follow_schedule_when_no_sensors_configured() {
        let config = config(HomeLogic::And, &[]);
        let states = EntityStates::new();
        assert!(evaluate(&armed_at_ten(), &config, &states, &ten_am()).active);
        assert!(!evaluate(&SlotGrid::new(), &config, &states, &ten_am()).active);
    }

    #[test]
    fn should_be_inactive_when_slot_unarmed_regardless_of_sensors() {
        let states: EntityStates = [("person.a", "home"), ("person.b", "home")]
            .into_iter()
            .collect();
        for logic in [HomeLogic::And, HomeLogic::Or] {
            let config = config(logic, &["person.a", "person.b"]);
            let verdict = evaluate(&SlotGrid::new(), &config, &states, &ten_am());
            assert!(verdict.sensors);
            assert!(!verdict.active);
        }
    }

    #[test]
    fn should_require_all_sensors_with_and_logic() {
        let config = config(HomeLogic::And, &["person.a", "person.b"]);
        let grid = armed_at_ten();

        let both: EntityStates = [("person.a", "home"), ("person.b", "on")]
            .into_iter()
            .collect();
        assert!(evaluate(&grid, &config, &both, &ten_am()).active);

        let one: EntityStates = [("person.a", "home"), ("person.b", "not_home")]
            .into_iter()
            .collect();
        assert!(!evaluate(&grid, &config, &one, &ten_am()).active);
    }

    #[test]
    fn should_accept_any_sensor_with_or_logic() {
        let config = config(HomeLogic::Or, &["person.a", "person.b"]);
        let grid = armed_at_ten();

        let one: EntityStates = [("person.a", "away"), ("person.b", "Detected")]
            .into_iter()
            .collect();
        assert!(evaluate(&grid, &config, &one, &ten_am()).active);

        let none: EntityStates = [("person.a", "away"), ("person.b", "off")]
            .into_iter()
            .collect();
        assert!(!evaluate(&grid, &config, &none, &ten_am()).active);
    }

    #[test]
    fn should_count_missing_sensor_as_false() {
        let config = config(HomeLogic::Or, &["person.ghost"]);
        assert!(!sensor_verdict(&config, &EntityStates::new()));
    }

    #[test]
    fn should_read_restriction_sensor_as_literal_on() {
        let polarity = SensorPolarity::of(RESTRICTION_SENSOR);
        assert_eq!(polarity, SensorPolarity::Restriction);
        assert!(polarity.contribution("ON"));
        assert!(!polarity.contribution("home"));
        assert!(!polarity.contribution("off"));
    }

    #[test]
    fn should_normalise_presence_tokens_case_insensitively() {
        let polarity = SensorPolarity::of("binary_sensor.motion");
        for state in ["on", "Home", "TRUE", "active", "detected"] {
            assert!(polarity.contribution(state), "{state} should count");
        }
        for state in ["off", "not_home", "unavailable", ""] {
            assert!(!polarity.contribution(state), "{state} should not count");
        }
    }
}

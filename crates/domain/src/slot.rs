//! Slot grid — the 48 half-hour intervals of a day and their armed flags.
//!
//! The grid always holds exactly one [`TimeSlot`] per `(hour, minute)` pair,
//! in ascending order. Only the `active` flag of a slot ever changes; the
//! set of pairs is fixed for the lifetime of the grid.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of half-hour slots in a day.
pub const SLOTS_PER_DAY: usize = 48;

/// Length of a slot in minutes.
pub const SLOT_MINUTES: u8 = 30;

/// One half-hour interval `[hour:minute, hour:minute + 30)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub hour: u8,
    pub minute: u8,
    pub active: bool,
}

impl TimeSlot {
    /// Minute of the day at which this slot starts.
    #[must_use]
    pub fn start_minute(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Whether `minute_of_day` falls inside this slot's half-open window.
    #[must_use]
    pub fn contains(&self, minute_of_day: u16) -> bool {
        let start = self.start_minute();
        minute_of_day >= start && minute_of_day < start + u16::from(SLOT_MINUTES)
    }
}

/// Canonical position of `(hour, minute)` in the grid, if it names a slot.
#[must_use]
pub fn slot_index(hour: u8, minute: u8) -> Option<usize> {
    if hour >= 24 || (minute != 0 && minute != SLOT_MINUTES) {
        return None;
    }
    Some(usize::from(hour) * 2 + usize::from(minute / SLOT_MINUTES))
}

/// Index of the slot containing a wall-clock time.
///
/// Total over the day: every minute maps to exactly one slot.
#[must_use]
pub fn index_for_time(time: &impl Timelike) -> usize {
    // hour() < 24 and minute() < 60 by construction
    let hour = time.hour() as usize;
    let bucket = time.minute() as usize / usize::from(SLOT_MINUTES);
    hour * 2 + bucket
}

/// The full day schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlotGrid {
    slots: Vec<TimeSlot>,
}

impl Default for SlotGrid {
    fn default() -> Self {
        let slots = (0..24u8)
            .flat_map(|hour| {
                [0, SLOT_MINUTES].map(|minute| TimeSlot {
                    hour,
                    minute,
                    active: false,
                })
            })
            .collect();
        Self { slots }
    }
}

impl SlotGrid {
    /// A fresh grid with every slot unarmed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the slot at `(hour, minute)`.
    ///
    /// Returns the new flag, or `None` when no slot matches (the grid is left
    /// untouched).
    pub fn toggle(&mut self, hour: u8, minute: u8) -> Option<bool> {
        let slot = self.slots.get_mut(slot_index(hour, minute)?)?;
        slot.active = !slot.active;
        Some(slot.active)
    }

    /// Look up a slot by its start time.
    #[must_use]
    pub fn slot(&self, hour: u8, minute: u8) -> Option<&TimeSlot> {
        self.slots.get(slot_index(hour, minute)?)
    }

    /// The slot containing the given wall-clock time.
    #[must_use]
    pub fn current_slot(&self, time: &impl Timelike) -> &TimeSlot {
        &self.slots[index_for_time(time)]
    }

    /// Copy of the slots in canonical order, for serialization.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TimeSlot> {
        self.slots.clone()
    }

    /// Borrow the slots in canonical order.
    #[must_use]
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Number of armed slots.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    /// Replace every flag at once from a slot sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `slots` is not exactly the 48
    /// canonical slots; the grid keeps its previous state in that case.
    pub fn replace(&mut self, slots: Vec<TimeSlot>) -> Result<(), ValidationError> {
        *self = Self::try_from(slots)?;
        Ok(())
    }
}

impl TryFrom<Vec<TimeSlot>> for SlotGrid {
    type Error = ValidationError;

    fn try_from(slots: Vec<TimeSlot>) -> Result<Self, Self::Error> {
        if slots.len() != SLOTS_PER_DAY {
            return Err(ValidationError::SlotCount {
                expected: SLOTS_PER_DAY,
                actual: slots.len(),
            });
        }
        let canonical = Self::default();
        for (index, (slot, expected)) in slots.iter().zip(&canonical.slots).enumerate() {
            if slot.hour != expected.hour || slot.minute != expected.minute {
                return Err(ValidationError::SlotOutOfOrder {
                    index,
                    hour: slot.hour,
                    minute: slot.minute,
                    expected_hour: expected.hour,
                    expected_minute: expected.minute,
                });
            }
        }
        Ok(Self { slots })
    }
}

impl<'de> Deserialize<'de> for SlotGrid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slots = Vec::<TimeSlot>::deserialize(deserializer)?;
        Self::try_from(slots).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn should_create_48_inactive_slots_in_canonical_order() {
        let grid = SlotGrid::new();
        assert_eq!(grid.slots().len(), SLOTS_PER_DAY);
        assert_eq!(grid.active_count(), 0);
        assert_eq!(grid.slots()[0], TimeSlot { hour: 0, minute: 0, active: false });
        assert_eq!(grid.slots()[1].minute, 30);
        assert_eq!(grid.slots()[47].hour, 23);
        assert_eq!(grid.slots()[47].minute, 30);
    }

    #[test]
    fn should_map_every_minute_of_the_day_to_exactly_one_slot() {
        let grid = SlotGrid::new();
        let mut hits = [0u16; SLOTS_PER_DAY];
        for minute_of_day in 0..1440u16 {
            let time = at(u32::from(minute_of_day / 60), u32::from(minute_of_day % 60));
            let containing: Vec<_> = grid
                .slots()
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.contains(minute_of_day))
                .map(|(index, _)| index)
                .collect();
            assert_eq!(containing, vec![index_for_time(&time)]);
            hits[index_for_time(&time)] += 1;
        }
        assert!(hits.iter().all(|count| *count == 30));
    }

    #[test]
    fn should_pick_slot_by_half_open_window() {
        let grid = SlotGrid::new();
        assert_eq!(grid.current_slot(&at(10, 29)).minute, 0);
        assert_eq!(grid.current_slot(&at(10, 30)).minute, 30);
        assert_eq!(grid.current_slot(&at(23, 59)).hour, 23);
        assert_eq!(grid.current_slot(&at(0, 0)).hour, 0);
    }

    #[test]
    fn should_restore_flag_when_toggled_twice() {
        let mut grid = SlotGrid::new();
        assert_eq!(grid.toggle(7, 30), Some(true));
        assert_eq!(grid.toggle(7, 30), Some(false));
        assert_eq!(grid, SlotGrid::new());
    }

    #[test]
    fn should_ignore_toggle_when_no_slot_matches() {
        let mut grid = SlotGrid::new();
        assert_eq!(grid.toggle(7, 15), None);
        assert_eq!(grid.toggle(24, 0), None);
        assert_eq!(grid.active_count(), 0);
    }

    #[test]
    fn should_replace_all_flags_from_valid_sequence() {
        let mut source = SlotGrid::new();
        source.toggle(10, 0);
        source.toggle(22, 30);

        let mut grid = SlotGrid::new();
        grid.replace(source.snapshot()).unwrap();
        assert_eq!(grid, source);
    }

    #[test]
    fn should_keep_previous_state_when_replacement_is_too_short() {
        let mut grid = SlotGrid::new();
        grid.toggle(6, 0);
        let before = grid.clone();

        let mut short = SlotGrid::new().snapshot();
        short.truncate(47);
        let result = grid.replace(short);

        assert!(matches!(
            result,
            Err(ValidationError::SlotCount { expected: 48, actual: 47 })
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn should_reject_replacement_with_shuffled_slots() {
        let mut grid = SlotGrid::new();
        let mut slots = SlotGrid::new().snapshot();
        slots.swap(0, 1);
        let result = grid.replace(slots);
        assert!(matches!(
            result,
            Err(ValidationError::SlotOutOfOrder { index: 0, .. })
        ));
    }

    #[test]
    fn should_reject_deserialization_of_incomplete_grid() {
        let json = serde_json::json!([{"hour": 0, "minute": 0, "active": true}]);
        let result: Result<SlotGrid, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}

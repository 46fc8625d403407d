//! Timetables and their time slots.
//!
//! A [`Timetable`] is a named, ordered list of [`Slot`]s describing one
//! daily plan. Slots keep their `time` as a free-form display string; the
//! [`clock`] module extracts wall-clock boundaries from it and the
//! [`resolver`] module turns a schedule into a sorted interval list.

pub mod clock;
pub mod resolver;
pub mod store;
pub mod validate;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub use clock::{format_clock, format_range, format_remaining, parse_clock, TimeRange};
pub use resolver::{
    resolve, resolve_at, upcoming, CurrentSlot, Interval, IntervalList, Resolution, UpcomingSlot,
    FREE_TIME,
};
pub use store::{TimetableDocument, TimetableStore, STORAGE_KEY};
pub use validate::{validate, ScheduleIssue};

/// Slot priority used by the timetable editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// How a slot repeats across days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    Never,
    Daily,
    Weekdays,
    Weekends,
    Weekly,
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{other}' (expected low, medium or high)")),
        }
    }
}

impl std::str::FromStr for Repeat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "never" => Ok(Self::Never),
            "daily" => Ok(Self::Daily),
            "weekdays" => Ok(Self::Weekdays),
            "weekends" => Ok(Self::Weekends),
            "weekly" => Ok(Self::Weekly),
            other => Err(format!("unknown repeat rule '{other}'")),
        }
    }
}

/// One scheduled activity.
///
/// Only `time` and `activity` are required in stored documents; every other
/// field falls back to its empty/false/"never" value on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Display string such as `"5:00 AM – 6:30 AM"`.
    pub time: String,
    pub activity: String,
    #[serde(default)]
    pub note: String,
    /// Planned duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub color: String,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Priority,
    #[serde(default)]
    pub is_flexible: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub reminder: bool,
    /// Minutes before start at which the reminder fires.
    #[serde(default)]
    pub reminder_time: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub repeat: Repeat,
    #[serde(default)]
    pub custom_style: BTreeMap<String, String>,
}

impl Slot {
    pub fn new(time: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            activity: activity.into(),
            note: String::new(),
            duration: None,
            color: String::new(),
            priority: Priority::default(),
            is_flexible: false,
            is_private: false,
            reminder: false,
            reminder_time: 0,
            repeat: Repeat::default(),
            custom_style: BTreeMap::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::parse(&self.time)
    }

    /// Start in minutes since midnight, `None` when `time` has no valid token.
    pub fn start(&self) -> Option<u32> {
        parse_clock(&self.time)
    }
}

/// A named daily plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    /// Stable identifier. Empty when read from a document written without
    /// ids; the store assigns and saves one on load.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub schedule: Vec<Slot>,
}

impl Timetable {
    pub fn new(name: impl Into<String>, schedule: Vec<Slot>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            schedule,
        }
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Unknown enum strings read back as the default instead of failing the
/// whole document.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_slot_fills_defaults() {
        let slot: Slot =
            serde_json::from_str(r#"{"time":"5:00 AM – 6:30 AM","activity":"Math"}"#).unwrap();
        assert_eq!(slot.note, "");
        assert_eq!(slot.duration, None);
        assert_eq!(slot.priority, Priority::Medium);
        assert_eq!(slot.repeat, Repeat::Never);
        assert!(!slot.is_flexible && !slot.is_private && !slot.reminder);
        assert!(slot.custom_style.is_empty());
    }

    #[test]
    fn extended_fields_use_camel_case() {
        let mut slot = Slot::new("6:30 AM", "Mind Time");
        slot.is_flexible = true;
        slot.reminder_time = 10;
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["isFlexible"], true);
        assert_eq!(json["reminderTime"], 10);
        assert_eq!(json["repeat"], "never");
        assert!(json.get("duration").is_none());
    }

    #[test]
    fn unknown_enum_values_fall_back() {
        let slot: Slot = serde_json::from_str(
            r#"{"time":"7:00 AM","activity":"Run","priority":"urgent","repeat":"fortnightly"}"#,
        )
        .unwrap();
        assert_eq!(slot.priority, Priority::Medium);
        assert_eq!(slot.repeat, Repeat::Never);
    }

    #[test]
    fn timetable_without_id_reads_empty() {
        let t: Timetable = serde_json::from_str(r#"{"name":"Plan A","schedule":[]}"#).unwrap();
        assert!(t.id.is_empty());
        assert_ne!(Timetable::new("Plan A", vec![]).id, new_id());
    }

    #[test]
    fn slot_start_uses_first_token() {
        assert_eq!(Slot::new("6:30 AM – 8:00 AM", "x").start(), Some(390));
        assert_eq!(Slot::new("Morning", "x").start(), None);
    }

    #[test]
    fn priority_and_repeat_parse_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("Weekdays".parse::<Repeat>().unwrap(), Repeat::Weekdays);
        assert!("sometimes".parse::<Repeat>().is_err());
    }
}

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Category presets offered by the event form.
pub const CATEGORIES: [&str; 4] = ["work", "personal", "family", "other"];

/// Reminder offsets (minutes) offered by the event form.
pub const NOTIFICATION_PRESETS: [u32; 5] = [1, 10, 60, 120, 1440];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatType {
    pub fn is_repeating(self) -> bool {
        self != RepeatType::None
    }
}

impl fmt::Display for RepeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepeatType::None => "none",
            RepeatType::Daily => "daily",
            RepeatType::Weekly => "weekly",
            RepeatType::Monthly => "monthly",
            RepeatType::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid repeat type: {0}")]
pub struct ParseRepeatTypeError(String);

impl FromStr for RepeatType {
    type Err = ParseRepeatTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(RepeatType::None),
            "daily" => Ok(RepeatType::Daily),
            "weekly" => Ok(RepeatType::Weekly),
            "monthly" => Ok(RepeatType::Monthly),
            "yearly" => Ok(RepeatType::Yearly),
            _ => Err(ParseRepeatTypeError(s.to_string())),
        }
    }
}

/// A recurrence rule: how often an event repeats and until when.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RepeatInfo {
    #[serde(rename = "type")]
    pub repeat_type: RepeatType,
    pub interval: u32,
    /// Inclusive bound; `None` falls back to the expander's default end date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RepeatInfo {
    /// The non-repeating rule, `{none, 0}`.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn every(repeat_type: RepeatType, interval: u32) -> Self {
        Self {
            repeat_type,
            interval,
            end_date: None,
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat_type.is_repeating()
    }
}

/// A persisted calendar event. The `id` is assigned by the remote store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub repeat: RepeatInfo,
    #[serde(rename = "notificationTime")]
    pub notification_offset_minutes: u32,
}

impl Event {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }

    /// Drops the id, producing the draft this event would be created from.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description.clone(),
            location: self.location.clone(),
            category: self.category.clone(),
            repeat: self.repeat.clone(),
            notification_offset_minutes: self.notification_offset_minutes,
        }
    }
}

/// An event that has not been saved yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub repeat: RepeatInfo,
    #[serde(rename = "notificationTime")]
    pub notification_offset_minutes: u32,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            title: title.into(),
            date,
            start_time,
            end_time,
            description: String::new(),
            location: String::new(),
            category: String::new(),
            repeat: RepeatInfo::none(),
            notification_offset_minutes: 10,
        }
    }

    pub fn with_id(self, id: Uuid) -> Event {
        Event {
            id,
            title: self.title,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
            location: self.location,
            category: self.category,
            repeat: self.repeat,
            notification_offset_minutes: self.notification_offset_minutes,
        }
    }
}

/// What the caller hands to [`crate::sync::EventSyncCoordinator::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventInput {
    /// A brand new event; the store assigns ids.
    New(EventDraft),
    /// An edit of an event that already has an id.
    Existing(Event),
}

impl EventInput {
    pub fn is_edit(&self) -> bool {
        matches!(self, EventInput::Existing(_))
    }
}

impl From<EventDraft> for EventInput {
    fn from(draft: EventDraft) -> Self {
        EventInput::New(draft)
    }
}

impl From<Event> for EventInput {
    fn from(event: Event) -> Self {
        EventInput::Existing(event)
    }
}

/// `HH:MM` on the wire. `HH:MM:SS` is accepted when reading.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(raw, FORMAT).or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> Event {
        Event {
            id: Uuid::now_v7(),
            title: "Team sync".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            description: "Weekly team meeting".to_string(),
            location: "Room A".to_string(),
            category: "work".to_string(),
            repeat: RepeatInfo::every(RepeatType::Weekly, 1),
            notification_offset_minutes: 10,
        }
    }

    #[test]
    fn test_repeat_type_from_str() {
        assert_eq!("Monthly".parse::<RepeatType>(), Ok(RepeatType::Monthly));
        assert_eq!("none".parse::<RepeatType>(), Ok(RepeatType::None));
        assert!("fortnightly".parse::<RepeatType>().is_err());
    }

    #[test]
    fn test_event_wire_format() {
        let event = sample_event();
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["startTime"], "09:00");
        assert_eq!(value["endTime"], "10:00");
        assert_eq!(value["date"], "2024-10-15");
        assert_eq!(value["notificationTime"], 10);
        assert_eq!(value["repeat"], json!({ "type": "weekly", "interval": 1 }));
    }

    #[test]
    fn test_event_accepts_seconds_and_missing_optionals() {
        let raw = json!({
            "id": "0190a7b4-1c2d-7e3f-8a9b-0c1d2e3f4a5b",
            "title": "Dentist",
            "date": "2024-11-02",
            "startTime": "14:30:00",
            "endTime": "15:00",
            "repeat": { "type": "none", "interval": 0 },
            "notificationTime": 60
        });

        let event: Event = serde_json::from_value(raw).unwrap();
        assert_eq!(event.start_time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(event.location, "");
        assert_eq!(event.repeat, RepeatInfo::none());
    }

    #[test]
    fn test_draft_round_trip_keeps_fields() {
        let event = sample_event();
        let id = event.id;
        let back = event.to_draft().with_id(id);
        assert_eq!(back, event);
    }

    #[test]
    fn test_starts_at_combines_date_and_time() {
        let event = sample_event();
        assert_eq!(
            event.starts_at(),
            NaiveDate::from_ymd_opt(2024, 10, 15).unwrap().and_hms_opt(9, 0, 0).unwrap()
        );
    }
}

//! Event data extracted from a flyer.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// One of the text fields an extractor can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    Name,
    Location,
    DateText,
    Time,
    Description,
    Hosts,
}

impl EventField {
    /// All fields in declaration order.
    pub const ALL: [EventField; 6] = [
        EventField::Name,
        EventField::Location,
        EventField::DateText,
        EventField::Time,
        EventField::Description,
        EventField::Hosts,
    ];

    /// Key used in serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            EventField::Name => "event_name",
            EventField::Location => "event_location",
            EventField::DateText => "event_date_text",
            EventField::Time => "event_time",
            EventField::Description => "event_description",
            EventField::Hosts => "event_hosts",
        }
    }
}

/// Text fields extracted from recognized flyer text.
///
/// Every value is either absent or non-empty and trimmed. The record is
/// built by threading it through each extractor with [`ExtractedFields::with`];
/// nothing mutates it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub event_name: Option<String>,
    pub event_location: Option<String>,
    pub event_date_text: Option<String>,
    pub event_time: Option<String>,
    pub event_description: Option<String>,
    pub event_hosts: Option<String>,
}

impl ExtractedFields {
    /// Return a copy of this record with `field` set to `value`.
    ///
    /// Blank values are stored as absent.
    pub fn with(self, field: EventField, value: Option<String>) -> Self {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let mut next = self;
        *next.slot_mut(field) = value;
        next
    }

    /// Get a field value.
    pub fn get(&self, field: EventField) -> Option<&str> {
        match field {
            EventField::Name => self.event_name.as_deref(),
            EventField::Location => self.event_location.as_deref(),
            EventField::DateText => self.event_date_text.as_deref(),
            EventField::Time => self.event_time.as_deref(),
            EventField::Description => self.event_description.as_deref(),
            EventField::Hosts => self.event_hosts.as_deref(),
        }
    }

    /// Fields that were not extracted.
    pub fn missing(&self) -> Vec<EventField> {
        EventField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    fn slot_mut(&mut self, field: EventField) -> &mut Option<String> {
        match field {
            EventField::Name => &mut self.event_name,
            EventField::Location => &mut self.event_location,
            EventField::DateText => &mut self.event_date_text,
            EventField::Time => &mut self.event_time,
            EventField::Description => &mut self.event_description,
            EventField::Hosts => &mut self.event_hosts,
        }
    }
}

/// Final output of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredEvent {
    /// Full recognized text.
    pub raw_text: String,

    /// Extracted text fields.
    #[serde(flatten)]
    pub fields: ExtractedFields,

    /// Calendar date derived from `event_date_text`, if it could be read.
    pub event_date: Option<NaiveDate>,
}

impl StructuredEvent {
    /// Apply a user edit and return the edited event.
    pub fn apply(&self, update: &EventUpdate) -> StructuredEvent {
        let edits = [
            (EventField::Name, &update.event_name),
            (EventField::Location, &update.event_location),
            (EventField::Time, &update.event_time),
            (EventField::Description, &update.event_description),
            (EventField::Hosts, &update.event_hosts),
        ];

        let fields = edits
            .into_iter()
            .fold(self.fields.clone(), |fields, (field, value)| match value {
                Some(v) => fields.with(field, v.clone()),
                None => fields,
            });

        let event_date = match update.event_date.as_deref() {
            Some(raw) => match parse_date_override(raw) {
                Some(date) => Some(date),
                None => {
                    debug!("Ignoring malformed date override {:?}", raw);
                    self.event_date
                }
            },
            None => self.event_date,
        };

        StructuredEvent {
            raw_text: self.raw_text.clone(),
            fields,
            event_date,
        }
    }
}

/// A partial edit of an extracted event.
///
/// Absent keys leave the field unchanged. A `null` or empty string clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventUpdate {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub event_name: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub event_location: Option<Option<String>>,
    /// Pre-normalized date in `YYYY-MM-DD` form. Anything else, `null`
    /// included, leaves the date unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub event_time: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub event_description: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub event_hosts: Option<Option<String>>,
}

/// A key that is present, even as `null`, becomes `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Parse a literal `YYYY-MM-DD` date supplied by an editing client.
pub fn parse_date_override(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

//! Calendar service insert payloads built from extracted events.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::rules::patterns::CLOCK_PARTS;
use crate::models::config::CalendarConfig;
use crate::models::event::StructuredEvent;

/// Event body accepted by the calendar service's insert call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub summary: Option<String>,
    pub location: Option<String>,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    pub reminders: Reminders,
}

/// Start or end of a calendar event: timed, or all-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    #[serde(rename_all = "camelCase")]
    Timed {
        date_time: NaiveDateTime,
        time_zone: String,
    },
    AllDay { date: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<Reminder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub method: String,
    pub minutes: u32,
}

impl CalendarEvent {
    /// Build the payload for `event`.
    ///
    /// Events without a date become all-day events on `today`.
    pub fn from_event(event: &StructuredEvent, config: &CalendarConfig, today: NaiveDate) -> Self {
        let fields = &event.fields;

        let description = format!(
            "{}\n\nHosts/DJs: {}",
            fields.event_description.as_deref().unwrap_or(""),
            fields.event_hosts.as_deref().unwrap_or("Not specified")
        );

        let (start, end) = match event.event_date {
            Some(date) => {
                let (start_time, end_time) = fields
                    .event_time
                    .as_deref()
                    .and_then(|text| start_end_times(text, config.duration_hours))
                    .unwrap_or((config.default_start, config.default_end));

                let timed = |time: NaiveTime| EventTime::Timed {
                    date_time: date.and_time(time),
                    time_zone: config.timezone.clone(),
                };
                (timed(start_time), timed(end_time))
            }
            None => (
                EventTime::AllDay { date: today },
                EventTime::AllDay { date: today },
            ),
        };

        Self {
            summary: fields.event_name.clone(),
            location: fields.event_location.clone(),
            description,
            start,
            end,
            reminders: Reminders {
                use_default: false,
                overrides: vec![
                    Reminder {
                        method: "popup".to_string(),
                        minutes: config.popup_reminder_minutes,
                    },
                    Reminder {
                        method: "email".to_string(),
                        minutes: config.email_reminder_minutes,
                    },
                ],
            },
        }
    }
}

/// Read a start time from text like `9:30 pm` and derive the end time.
///
/// The end wraps around midnight onto the same date.
fn start_end_times(text: &str, duration_hours: u32) -> Option<(NaiveTime, NaiveTime)> {
    let lower = text.to_lowercase();
    let (meridiem, stripped) = if lower.contains("pm") {
        ("pm", lower.replace("pm", ""))
    } else if lower.contains("am") {
        ("am", lower.replace("am", ""))
    } else {
        return None;
    };

    let caps = CLOCK_PARTS.captures(&stripped)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    match meridiem {
        "pm" if hour < 12 => hour += 12,
        "am" if hour == 12 => hour = 0,
        _ => {}
    }

    let start = NaiveTime::from_hms_opt(hour, minute, 0);
    let end = NaiveTime::from_hms_opt((hour + duration_hours % 24) % 24, minute, 0);
    if start.is_none() {
        debug!("Unreadable event time {:?}, using defaults", text);
    }

    Some((start?, end?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{EventField, ExtractedFields};
    use pretty_assertions::assert_eq;

    fn event(time: Option<&str>, date: Option<NaiveDate>) -> StructuredEvent {
        StructuredEvent {
            raw_text: String::new(),
            fields: ExtractedFields::default()
                .with(EventField::Name, Some("Rooftop Party".to_string()))
                .with(EventField::Location, Some("The Skyline Lounge".to_string()))
                .with(EventField::Time, time.map(str::to_string))
                .with(EventField::Description, Some("Cocktails and views".to_string())),
            event_date: date,
        }
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn june_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn timed(date_time: NaiveDateTime) -> EventTime {
        EventTime::Timed {
            date_time,
            time_zone: "America/New_York".to_string(),
        }
    }

    #[test]
    fn test_pm_time() {
        let payload = CalendarEvent::from_event(
            &event(Some("9:30 pm"), Some(june_15())),
            &CalendarConfig::default(),
            today(),
        );

        assert_eq!(payload.summary.as_deref(), Some("Rooftop Party"));
        assert_eq!(payload.location.as_deref(), Some("The Skyline Lounge"));
        assert_eq!(payload.description, "Cocktails and views\n\nHosts/DJs: Not specified");
        assert_eq!(payload.start, timed(at(june_15(), 21, 30)));
        assert_eq!(payload.end, timed(at(june_15(), 0, 30)));
    }

    #[test]
    fn test_am_times() {
        let config = CalendarConfig::default();

        let payload = CalendarEvent::from_event(&event(Some("10 AM"), Some(june_15())), &config, today());
        assert_eq!(payload.start, timed(at(june_15(), 10, 0)));
        assert_eq!(payload.end, timed(at(june_15(), 13, 0)));

        let payload = CalendarEvent::from_event(&event(Some("12 am"), Some(june_15())), &config, today());
        assert_eq!(payload.start, timed(at(june_15(), 0, 0)));
    }

    #[test]
    fn test_default_times() {
        let config = CalendarConfig::default();

        for time in [None, Some("late"), Some("pm")] {
            let payload = CalendarEvent::from_event(&event(time, Some(june_15())), &config, today());
            assert_eq!(payload.start, timed(at(june_15(), 19, 0)));
            assert_eq!(payload.end, timed(at(june_15(), 22, 0)));
        }
    }

    #[test]
    fn test_long_duration_wraps() {
        let config = CalendarConfig {
            duration_hours: u32::MAX,
            ..CalendarConfig::default()
        };

        // u32::MAX hours is 15 hours past a whole number of days.
        let payload = CalendarEvent::from_event(&event(Some("9 pm"), Some(june_15())), &config, today());
        assert_eq!(payload.start, timed(at(june_15(), 21, 0)));
        assert_eq!(payload.end, timed(at(june_15(), 12, 0)));
    }

    #[test]
    fn test_all_day_without_date() {
        let payload =
            CalendarEvent::from_event(&event(Some("9 pm"), None), &CalendarConfig::default(), today());

        assert_eq!(payload.start, EventTime::AllDay { date: today() });
        assert_eq!(payload.end, EventTime::AllDay { date: today() });
    }

    #[test]
    fn test_serialized_shape() {
        let payload = CalendarEvent::from_event(
            &event(Some("9 pm"), Some(june_15())),
            &CalendarConfig::default(),
            today(),
        );
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["start"]["dateTime"], "2024-06-15T21:00:00");
        assert_eq!(json["start"]["timeZone"], "America/New_York");
        assert_eq!(json["reminders"]["useDefault"], false);
        assert_eq!(json["reminders"]["overrides"][0]["method"], "popup");
        assert_eq!(json["reminders"]["overrides"][0]["minutes"], 60);
        assert_eq!(json["reminders"]["overrides"][1]["minutes"], 1440);

        let all_day = CalendarEvent::from_event(&event(None, None), &CalendarConfig::default(), today());
        let json = serde_json::to_value(&all_day).unwrap();
        assert_eq!(json["start"]["date"], "2024-05-01");
    }
}

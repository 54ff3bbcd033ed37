//! Time extraction for event flyers.

use super::patterns::{TIME_CLOCK, TIME_CLOCK_RANGE, TIME_HOUR, TIME_HOUR_RANGE};
use super::{first_family_matches, ExtractionMatch, FieldExtractor, PatternFamily};
use crate::models::event::EventField;

/// Time extractor.
///
/// Single times are tried before ranges, so "9:00 - 11:00 pm" yields
/// "11:00 pm".
pub struct TimeExtractor {
    families: Vec<PatternFamily>,
}

impl TimeExtractor {
    pub fn new() -> Self {
        Self {
            families: vec![
                PatternFamily::new("clock", &TIME_CLOCK),
                PatternFamily::new("hour", &TIME_HOUR),
                PatternFamily::new("clock-range", &TIME_CLOCK_RANGE),
                PatternFamily::new("hour-range", &TIME_HOUR_RANGE),
            ],
        }
    }
}

impl Default for TimeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TimeExtractor {
    fn field(&self) -> EventField {
        EventField::Time
    }

    fn extract(&self, text: &str) -> Option<String> {
        self.extract_all(text).into_iter().next().map(|m| m.value)
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch> {
        first_family_matches(&self.families, text)
    }
}

/// Extract the event time.
pub fn extract_time(text: &str) -> Option<String> {
    TimeExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_single_time() {
        assert_eq!(
            extract_time("Doors 9:00 pm, ends 1:00 am").as_deref(),
            Some("9:00 pm")
        );
    }

    #[test]
    fn test_clock_beats_earlier_hour() {
        // The hour family is only consulted when no clock time exists.
        assert_eq!(extract_time("Opens 8pm\nShow 10:30PM").as_deref(), Some("10:30PM"));
    }

    #[test]
    fn test_hour_only() {
        assert_eq!(extract_time("Starts at 7 PM sharp").as_deref(), Some("7 PM"));
    }

    #[test]
    fn test_range_yields_single_time() {
        let extractor = TimeExtractor::new();
        let matches = extractor.extract_all("9:00 - 11:00 pm");

        assert_eq!(matches[0].value, "11:00 pm");
        assert_eq!(matches[0].family, 0);
    }

    #[test]
    fn test_no_time() {
        assert_eq!(extract_time("All day long"), None);
        assert_eq!(extract_time("Room 12:30"), None);
    }
}

//! Date text extraction for event flyers.

use super::patterns::{DATE_MONTH_DAY_YEAR, DATE_NUMERIC, DATE_WEEKDAY_MONTH_DAY};
use super::{first_family_matches, ExtractionMatch, FieldExtractor, PatternFamily};
use crate::models::event::EventField;

/// Date text extractor.
///
/// Families, in priority order: "March 9th, 2024", "03/09/2024",
/// "Saturday, March 9". The first family that matches anywhere wins even
/// when a later family matches earlier in the text.
pub struct DateTextExtractor {
    families: Vec<PatternFamily>,
}

impl DateTextExtractor {
    pub fn new() -> Self {
        Self {
            families: vec![
                PatternFamily::new("month-day-year", &DATE_MONTH_DAY_YEAR),
                PatternFamily::new("numeric", &DATE_NUMERIC),
                PatternFamily::new("weekday-month-day", &DATE_WEEKDAY_MONTH_DAY),
            ],
        }
    }
}

impl Default for DateTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateTextExtractor {
    fn field(&self) -> EventField {
        EventField::DateText
    }

    fn extract(&self, text: &str) -> Option<String> {
        self.extract_all(text).into_iter().next().map(|m| m.value)
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch> {
        first_family_matches(&self.families, text)
    }
}

/// Extract the free-form event date text.
pub fn extract_date_text(text: &str) -> Option<String> {
    DateTextExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name_family_wins() {
        let text = "Tickets on sale 12/25/2024\nChristmas Bash\nDecember 25, 2024";
        assert_eq!(extract_date_text(text).as_deref(), Some("December 25, 2024"));
    }

    #[test]
    fn test_abbreviated_month_with_ordinal() {
        assert_eq!(
            extract_date_text("Join us Dec 25th, 2024 at noon").as_deref(),
            Some("Dec 25th, 2024")
        );
        assert_eq!(
            extract_date_text("SEPT. is not matched but sep 3 2025 is").as_deref(),
            Some("sep 3 2025")
        );
    }

    #[test]
    fn test_numeric_family() {
        assert_eq!(extract_date_text("Doors 7/4/24 and 8/1/24").as_deref(), Some("7/4/24"));
        assert_eq!(extract_date_text("on 04-20-2025").as_deref(), Some("04-20-2025"));
    }

    #[test]
    fn test_weekday_family() {
        assert_eq!(
            extract_date_text("Saturday, March 9th - all night").as_deref(),
            Some("Saturday, March 9th")
        );
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date_text("Date TBD"), None);
    }

    #[test]
    fn test_deterministic() {
        let text = "Friday, June 7\n6/7/24";
        let first = extract_date_text(text);
        assert_eq!(first, extract_date_text(text));
        // Numeric family outranks the weekday family.
        assert_eq!(first.as_deref(), Some("6/7/24"));
    }
}

//! Location extraction for event flyers.

use super::patterns::{STREET_ADDRESS, VENUE};
use super::{first_family_matches, ExtractionMatch, FieldExtractor, PatternFamily};
use crate::models::event::EventField;

/// Location extractor.
///
/// A street address ("123 Main Street") is preferred over a venue mention
/// ("at The Grand Hall"). Venue matches keep only the venue name.
pub struct LocationExtractor {
    families: Vec<PatternFamily>,
}

impl LocationExtractor {
    pub fn new() -> Self {
        Self {
            families: vec![
                PatternFamily::new("street-address", &STREET_ADDRESS),
                PatternFamily::new("venue", &VENUE).with_group(1),
            ],
        }
    }
}

impl Default for LocationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LocationExtractor {
    fn field(&self) -> EventField {
        EventField::Location
    }

    fn extract(&self, text: &str) -> Option<String> {
        self.extract_all(text).into_iter().next().map(|m| m.value)
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch> {
        first_family_matches(&self.families, text)
    }
}

/// Extract the event location.
pub fn extract_location(text: &str) -> Option<String> {
    LocationExtractor::new().extract(text)
}

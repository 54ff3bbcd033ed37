//! Rule-based flyer parser combining the field extractors.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::models::event::{EventField, ExtractedFields, StructuredEvent};

use super::rules::{
    synthesize_description, DateNormalizer, DateTextExtractor, FieldExtractor, HostsExtractor,
    LocationExtractor, NameExtractor, TimeExtractor,
};
use super::EventParser;

/// Result of event extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted event.
    pub event: StructuredEvent,
    /// Fields that could not be extracted.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Flyer parser running every field extractor over the recognized text.
pub struct FlyerParser {
    extractors: Vec<Box<dyn FieldExtractor + Send + Sync>>,
    normalizer: DateNormalizer,
}

impl FlyerParser {
    /// Create a parser that resolves partial dates against today.
    pub fn new() -> Self {
        Self::with_normalizer(DateNormalizer::today())
    }

    /// Create a parser with a fixed reference date for partial dates.
    pub fn with_reference_date(reference: NaiveDate) -> Self {
        Self::with_normalizer(DateNormalizer::new(reference))
    }

    fn with_normalizer(normalizer: DateNormalizer) -> Self {
        Self {
            extractors: vec![
                Box::new(NameExtractor::new()),
                Box::new(DateTextExtractor::new()),
                Box::new(TimeExtractor::new()),
                Box::new(LocationExtractor::new()),
                Box::new(HostsExtractor::new()),
            ],
            normalizer,
        }
    }

    /// Run every extractor, then derive the description from the leftovers.
    pub fn extract_fields(&self, text: &str) -> ExtractedFields {
        let fields = self
            .extractors
            .iter()
            .fold(ExtractedFields::default(), |fields, extractor| {
                let value = extractor.extract(text);
                debug!("{}: {:?}", extractor.field().key(), value);
                fields.with(extractor.field(), value)
            });

        let description = synthesize_description(text, &fields);
        fields.with(EventField::Description, description)
    }

    /// Describe fields that were not found and dates that could not be read.
    pub fn warnings(fields: &ExtractedFields, event_date: Option<NaiveDate>) -> Vec<String> {
        let mut warnings: Vec<String> = fields
            .missing()
            .into_iter()
            .map(|field| format!("Could not extract {}", field.key()))
            .collect();

        if fields.event_date_text.is_some() && event_date.is_none() {
            warnings.push("Could not normalize event date".to_string());
        }

        warnings
    }

    /// Normalize the extracted date text, if any.
    pub fn normalize_date(&self, fields: &ExtractedFields) -> Option<NaiveDate> {
        fields
            .event_date_text
            .as_deref()
            .and_then(|text| self.normalizer.normalize(text))
    }
}

impl Default for FlyerParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EventParser for FlyerParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing event from {} characters of text", text.len());

        let fields = self.extract_fields(text);
        let event_date = self.normalize_date(&fields);

        let warnings = Self::warnings(&fields, event_date);

        debug!(
            "Extracted {} of {} fields",
            EventField::ALL.len() - fields.missing().len(),
            EventField::ALL.len()
        );

        ExtractionResult {
            event: StructuredEvent {
                raw_text: text.to_string(),
                fields,
                event_date,
            },
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FLYER: &str = "\
GRAND OPENING
Summer Rooftop Party With Friends
Saturday, June 15th
9:00 pm - late
at The Skyline Lounge
DJ Max
featuring Luna
Enjoy cocktails and a view over the whole city
Free entry before ten";

    fn parser() -> FlyerParser {
        FlyerParser::with_reference_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[test]
    fn test_parse_full_flyer() {
        let result = parser().parse(FLYER);
        let fields = &result.event.fields;

        assert_eq!(fields.event_name.as_deref(), Some("Summer Rooftop Party With Friends"));
        assert_eq!(fields.event_date_text.as_deref(), Some("Saturday, June 15th"));
        assert_eq!(fields.event_time.as_deref(), Some("9:00 pm"));
        assert_eq!(fields.event_location.as_deref(), Some("The Skyline Lounge"));
        assert_eq!(fields.event_hosts.as_deref(), Some("Max, Luna"));
        assert_eq!(
            fields.event_description.as_deref(),
            Some("Enjoy cocktails and a view over the whole city Free entry before ten")
        );
        assert_eq!(result.event.event_date, NaiveDate::from_ymd_opt(2024, 6, 15));
        assert_eq!(result.event.raw_text, FLYER);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let result = parser().parse("");

        assert_eq!(result.event.fields, ExtractedFields::default());
        assert_eq!(result.event.event_date, None);
        assert_eq!(result.warnings.len(), 6);
    }

    #[test]
    fn test_unreadable_date_warns() {
        let result = parser().parse("Garage Sale\n2/30/2024");

        assert_eq!(result.event.fields.event_date_text.as_deref(), Some("2/30/2024"));
        assert_eq!(result.event.event_date, None);
        assert!(result
            .warnings
            .iter()
            .any(|w| w == "Could not normalize event date"));
    }

    #[test]
    fn test_deterministic() {
        let parser = parser();
        assert_eq!(parser.extract_fields(FLYER), parser.extract_fields(FLYER));
    }
}

//! Host and performer extraction for event flyers.

use super::patterns::{HOST_DJ, HOST_FEATURING, HOST_HOSTED_BY, HOST_PRESENTED_BY};
use super::{ExtractionMatch, FieldExtractor, PatternFamily};
use crate::models::event::EventField;

/// Separator between host names.
const HOST_SEPARATOR: &str = ", ";

/// Host extractor.
///
/// Unlike the other extractors every pattern is applied. Names are collected
/// pattern by pattern, so "featuring" names always follow "DJ" names
/// regardless of where they appear in the text.
pub struct HostsExtractor {
    patterns: Vec<PatternFamily>,
}

impl HostsExtractor {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                PatternFamily::new("dj", &HOST_DJ).with_group(1),
                PatternFamily::new("featuring", &HOST_FEATURING).with_group(1),
                PatternFamily::new("presented-by", &HOST_PRESENTED_BY).with_group(1),
                PatternFamily::new("hosted-by", &HOST_HOSTED_BY).with_group(1),
            ],
        }
    }
}

impl Default for HostsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for HostsExtractor {
    fn field(&self) -> EventField {
        EventField::Hosts
    }

    fn extract(&self, text: &str) -> Option<String> {
        let names: Vec<String> = self.extract_all(text).into_iter().map(|m| m.value).collect();

        if names.is_empty() {
            None
        } else {
            Some(names.join(HOST_SEPARATOR))
        }
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch> {
        self.patterns
            .iter()
            .enumerate()
            .flat_map(|(index, pattern)| pattern.matches(index, text))
            .collect()
    }
}

/// Extract hosts, DJs and featured performers as one comma-separated string.
pub fn extract_hosts(text: &str) -> Option<String> {
    HostsExtractor::new().extract(text)
}

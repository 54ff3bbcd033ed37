//! Rule-based field extractors for event flyers.

pub mod dates;
pub mod description;
pub mod hosts;
pub mod location;
pub mod name;
pub mod normalize;
pub mod patterns;
pub mod times;

pub use dates::{extract_date_text, DateTextExtractor};
pub use description::synthesize_description;
pub use hosts::{extract_hosts, HostsExtractor};
pub use location::{extract_location, LocationExtractor};
pub use name::{extract_name, NameExtractor};
pub use normalize::{normalize_date, DateNormalizer};
pub use times::{extract_time, TimeExtractor};

use regex::Regex;

use crate::models::event::EventField;

/// Trait for field extractors.
///
/// Extractors are pure: the same text always yields the same value.
pub trait FieldExtractor {
    /// The event field this extractor fills.
    fn field(&self) -> EventField;

    /// Extract the field value from text.
    fn extract(&self, text: &str) -> Option<String>;

    /// Extract all candidate matches the field value is chosen from.
    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch>;
}

/// A single pattern match in recognized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch {
    /// Matched value.
    pub value: String,
    /// Index of the pattern family that produced the match.
    pub family: usize,
    /// Byte span of the value in the source text.
    pub position: (usize, usize),
}

impl ExtractionMatch {
    pub fn new(value: impl Into<String>, family: usize, start: usize, end: usize) -> Self {
        Self {
            value: value.into(),
            family,
            position: (start, end),
        }
    }
}

/// One pattern in an ordered list of alternatives.
pub struct PatternFamily {
    /// Short label used in logs.
    pub label: &'static str,
    /// The compiled pattern.
    pub pattern: &'static Regex,
    /// Capture group holding the value (0 for the whole match).
    pub group: usize,
}

impl PatternFamily {
    pub fn new(label: &'static str, pattern: &'static Regex) -> Self {
        Self {
            label,
            pattern,
            group: 0,
        }
    }

    pub fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// All matches of this pattern, in textual order.
    pub fn matches(&self, index: usize, text: &str) -> Vec<ExtractionMatch> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(self.group).or_else(|| caps.get(0)))
            .map(|m| ExtractionMatch::new(m.as_str(), index, m.start(), m.end()))
            .collect()
    }
}

/// Matches of the first family that matches anywhere in `text`.
///
/// Later families are not consulted once one has matched.
pub fn first_family_matches(families: &[PatternFamily], text: &str) -> Vec<ExtractionMatch> {
    for (index, family) in families.iter().enumerate() {
        let matches = family.matches(index, text);
        if !matches.is_empty() {
            tracing::trace!("{} matched {} time(s)", family.label, matches.len());
            return matches;
        }
    }

    Vec::new()
}

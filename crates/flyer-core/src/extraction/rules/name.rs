//! Event name extraction.

use super::{ExtractionMatch, FieldExtractor};
use crate::models::event::EventField;

/// A line qualifies as a title when it has more than this many words...
const MIN_TITLE_WORDS: usize = 2;
/// ...and more than this many characters.
const MIN_TITLE_CHARS: usize = 10;

/// Event name extractor.
///
/// Picks the first line that reads like a title, falling back to the first
/// non-empty line.
pub struct NameExtractor;

impl NameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    fn field(&self) -> EventField {
        EventField::Name
    }

    fn extract(&self, text: &str) -> Option<String> {
        let lines = self.extract_all(text);

        lines
            .iter()
            .find(|m| is_title_like(&m.value))
            .or_else(|| lines.first())
            .map(|m| m.value.clone())
    }

    /// Every non-empty trimmed line, in order.
    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch> {
        let mut offset = 0;
        let mut lines = Vec::new();

        for line in text.split_inclusive('\n') {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                let start = offset + (line.len() - line.trim_start().len());
                lines.push(ExtractionMatch::new(trimmed, 0, start, start + trimmed.len()));
            }
            offset += line.len();
        }

        lines
    }
}

fn is_title_like(line: &str) -> bool {
    line.split_whitespace().count() > MIN_TITLE_WORDS && line.chars().count() > MIN_TITLE_CHARS
}

/// Extract the event name from recognized text.
pub fn extract_name(text: &str) -> Option<String> {
    NameExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_title_like_line() {
        let text = "Hi\nSummer Rooftop Party With Friends\nDJ Bob";
        assert_eq!(
            extract_name(text).as_deref(),
            Some("Summer Rooftop Party With Friends")
        );
    }

    #[test]
    fn test_falls_back_to_first_line() {
        let text = "\n   \nGALA\nJune 1\nDJ Bob";
        assert_eq!(extract_name(text).as_deref(), Some("GALA"));
    }

    #[test]
    fn test_three_short_words_do_not_qualify() {
        // Three words but only ten characters.
        let text = "Art Fair\nab cd efgh\nThe Big Summer Art Fair";
        assert_eq!(extract_name(text).as_deref(), Some("The Big Summer Art Fair"));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extract_name(""), None);
        assert_eq!(extract_name(" \n\t\n"), None);
    }

    #[test]
    fn test_positions_point_into_source() {
        let text = "  Title Line Here Today \nnext";
        let lines = NameExtractor::new().extract_all(text);
        let (start, end) = lines[0].position;
        assert_eq!(&text[start..end], "Title Line Here Today");
    }
}

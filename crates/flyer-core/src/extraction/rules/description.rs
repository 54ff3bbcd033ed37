//! Description synthesis from text left over after field extraction.

use crate::models::event::{EventField, ExtractedFields};

/// A leftover line is kept when it has more than this many words.
const MIN_DESCRIPTION_WORDS: usize = 3;

/// Fields removed from the text before building the description, in order.
const CONSUMED_FIELDS: [EventField; 5] = [
    EventField::Name,
    EventField::DateText,
    EventField::Time,
    EventField::Location,
    EventField::Hosts,
];

/// Build a description from the recognized text not used by other fields.
///
/// The first literal occurrence of each extracted value is cut from a
/// working copy of the text. Values are plain strings without source spans,
/// so a short value can be cut from the wrong place, and a joined hosts list
/// usually is not found at all.
pub fn synthesize_description(raw_text: &str, fields: &ExtractedFields) -> Option<String> {
    let remaining = CONSUMED_FIELDS
        .iter()
        .filter_map(|field| fields.get(*field))
        .fold(raw_text.to_string(), |text, used| text.replacen(used, "", 1));

    let kept: Vec<&str> = remaining
        .split('\n')
        .map(str::trim)
        .filter(|line| line.split_whitespace().count() > MIN_DESCRIPTION_WORDS)
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(name: &str, date: &str, time: &str) -> ExtractedFields {
        ExtractedFields::default()
            .with(EventField::Name, Some(name.to_string()))
            .with(EventField::DateText, Some(date.to_string()))
            .with(EventField::Time, Some(time.to_string()))
    }

    #[test]
    fn test_leftover_long_lines() {
        let text = "Summer Rooftop Party Tonight\n\
                    June 1, 2024 8 pm\n\
                    Bring your friends and good vibes\n\
                    Free entry\n\
                    Drinks and snacks on the house";
        let fields = fields("Summer Rooftop Party Tonight", "June 1, 2024", "8 pm");

        assert_eq!(
            synthesize_description(text, &fields).as_deref(),
            Some("Bring your friends and good vibes Drinks and snacks on the house")
        );
    }

    #[test]
    fn test_removes_first_occurrence_only() {
        let text = "Rock Night\nRock Night is back with three bands";
        let fields = ExtractedFields::default()
            .with(EventField::Name, Some("Rock Night".to_string()));

        assert_eq!(
            synthesize_description(text, &fields).as_deref(),
            Some("Rock Night is back with three bands")
        );
    }

    #[test]
    fn test_nothing_left() {
        let text = "Bake Sale\nMay 4, 2024";
        let fields = fields("Bake Sale", "May 4, 2024", "10 am");
        assert_eq!(synthesize_description(text, &fields), None);
    }

    #[test]
    fn test_idempotent() {
        let text = "Poetry Slam at the Old Library\nOpen to all poets and listeners alike";
        let fields = ExtractedFields::default()
            .with(EventField::Name, Some("Poetry Slam at the Old Library".to_string()));

        let first = synthesize_description(text, &fields);
        let second = synthesize_description(text, &fields);
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("Open to all poets and listeners alike"));
    }
}

//! Common regex patterns for event flyer extraction.
//!
//! Free-text captures (street text, venue and host names) are limited to a
//! single line so a value never spans two lines of the flyer.

use lazy_static::lazy_static;
use regex::Regex;

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

const WEEKDAY: &str = r"(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)";

const ORDINAL: &str = r"(?:st|nd|rd|th)?";

const STREET_SUFFIX: &str = r"(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Plaza|Plz|Square|Sq|Highway|Hwy|Broadway|Parkway|Pkwy)";

const VENUE_KIND: &str = r"(?:Club|Venue|Bar|Lounge|Hall|Center|Theatre|Theater|Arena|Stadium|Gallery|Museum|Cafe|Restaurant)";

/// Letters, digits, blanks and ampersands on one line.
const NAME_CHARS: &str = r"[A-Za-z0-9 \t&]+";

lazy_static! {
    // Date patterns, in priority order
    pub static ref DATE_MONTH_DAY_YEAR: Regex = Regex::new(&format!(
        r"(?i)\b{MONTH}\s+\d{{1,2}}{ORDINAL},?\s+\d{{4}}\b"
    )).unwrap();

    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b"
    ).unwrap();

    pub static ref DATE_WEEKDAY_MONTH_DAY: Regex = Regex::new(&format!(
        r"(?i)\b{WEEKDAY},?\s+{MONTH}\s+\d{{1,2}}{ORDINAL}\b"
    )).unwrap();

    // Time patterns, in priority order
    pub static ref TIME_CLOCK: Regex = Regex::new(
        r"(?i)\b\d{1,2}:\d{2}\s*(?:am|pm)\b"
    ).unwrap();

    pub static ref TIME_HOUR: Regex = Regex::new(
        r"(?i)\b\d{1,2}\s*(?:am|pm)\b"
    ).unwrap();

    pub static ref TIME_CLOCK_RANGE: Regex = Regex::new(
        r"(?i)\b\d{1,2}:\d{2}\s*(?:-|to|–)\s*\d{1,2}:\d{2}\s*(?:am|pm)\b"
    ).unwrap();

    pub static ref TIME_HOUR_RANGE: Regex = Regex::new(
        r"(?i)\b\d{1,2}\s*(?:am|pm)\s*(?:-|to|–)\s*\d{1,2}\s*(?:am|pm)\b"
    ).unwrap();

    // Location patterns, in priority order
    pub static ref STREET_ADDRESS: Regex = Regex::new(&format!(
        r"(?i)\b\d+[ \t]+[A-Za-z0-9 \t,]+{STREET_SUFFIX}\b"
    )).unwrap();

    /// Group 1 is the venue name without the `at`/`@` lead-in.
    pub static ref VENUE: Regex = Regex::new(&format!(
        r"(?i)(?:\bat|@)[ \t]+([A-Za-z0-9 \t&]+{VENUE_KIND})\b"
    )).unwrap();

    // Host patterns, all applied; group 1 is the name
    pub static ref HOST_DJ: Regex = Regex::new(&format!(
        r"(?i)\bDJ[ \t]+({NAME_CHARS})\b"
    )).unwrap();

    pub static ref HOST_FEATURING: Regex = Regex::new(&format!(
        r"(?i)\bfeaturing[ \t]+({NAME_CHARS})\b"
    )).unwrap();

    pub static ref HOST_PRESENTED_BY: Regex = Regex::new(&format!(
        r"(?i)\bpresented[ \t]+by[ \t]+({NAME_CHARS})\b"
    )).unwrap();

    pub static ref HOST_HOSTED_BY: Regex = Regex::new(&format!(
        r"(?i)\bhosted[ \t]+by[ \t]+({NAME_CHARS})\b"
    )).unwrap();

    // Leading clock time inside an extracted time string
    pub static ref CLOCK_PARTS: Regex = Regex::new(
        r"^\s*(\d{1,2})(?::(\d{2}))?"
    ).unwrap();

    // Numeric and ISO dates for normalization
    pub static ref NUMERIC_DATE_PARTS: Regex = Regex::new(
        r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{2,4})\b"
    ).unwrap();

    pub static ref ISO_DATE_PARTS: Regex = Regex::new(
        r"\b(\d{4})[/.-](\d{1,2})[/.-](\d{1,2})\b"
    ).unwrap();

    // Word and number tokens for fuzzy date parsing
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"(?i)[a-z]+|\d+(?:st|nd|rd|th)?"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for pattern in [
            &*DATE_MONTH_DAY_YEAR,
            &*DATE_NUMERIC,
            &*DATE_WEEKDAY_MONTH_DAY,
            &*TIME_CLOCK,
            &*TIME_HOUR,
            &*TIME_CLOCK_RANGE,
            &*TIME_HOUR_RANGE,
            &*STREET_ADDRESS,
            &*VENUE,
            &*HOST_DJ,
            &*HOST_FEATURING,
            &*HOST_PRESENTED_BY,
            &*HOST_HOSTED_BY,
        ] {
            assert!(!pattern.as_str().is_empty());
        }
    }

    #[test]
    fn test_venue_accepts_at_sign() {
        let caps = VENUE.captures("Live @ Blue Note Club tonight").unwrap();
        assert_eq!(&caps[1], "Blue Note Club");
    }

    #[test]
    fn test_host_name_stops_at_line_end() {
        let caps = HOST_DJ.captures("DJ Max\nfeaturing Luna").unwrap();
        assert_eq!(&caps[1], "Max");
    }
}

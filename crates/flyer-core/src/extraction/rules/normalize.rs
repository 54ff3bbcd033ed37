//! Fuzzy conversion of extracted date text into a calendar date.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use tracing::debug;

use super::patterns::{DATE_TOKEN, ISO_DATE_PARTS, NUMERIC_DATE_PARTS};
use crate::error::DateParseError;

/// Converts free-form date text into a calendar date.
///
/// Unknown words are skipped. Components the text does not mention are
/// taken from the reference date, so "Saturday, March 9" lands in the
/// reference year. A weekday on its own means the next such day on or
/// after the reference date.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    reference: NaiveDate,
}

/// Date components read from the text.
#[derive(Debug, Default)]
struct DateParts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    weekday: Option<Weekday>,
}

impl DateNormalizer {
    /// Create a normalizer that fills gaps from `reference`.
    pub fn new(reference: NaiveDate) -> Self {
        Self { reference }
    }

    /// Create a normalizer anchored on the local date.
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// Normalize date text. Parse failures yield `None`.
    pub fn normalize(&self, text: &str) -> Option<NaiveDate> {
        match self.parse(text) {
            Ok(date) => Some(date),
            Err(e) => {
                debug!("Date text {:?} not normalized: {}", text, e);
                None
            }
        }
    }

    /// Parse date text, reporting why it could not be read.
    pub fn parse(&self, text: &str) -> Result<NaiveDate, DateParseError> {
        let parts = match self.numeric_parts(text) {
            Some(parts) => parts,
            None => self.token_parts(text)?,
        };

        if parts.year.is_none()
            && parts.month.is_none()
            && parts.day.is_none()
            && parts.weekday.is_none()
        {
            return Err(DateParseError::NoComponents(text.to_string()));
        }

        self.resolve(parts)
    }

    /// "2024-12-25", "12/25/2024", "25.12.24".
    fn numeric_parts(&self, text: &str) -> Option<DateParts> {
        if let Some(caps) = ISO_DATE_PARTS.captures(text) {
            return Some(DateParts {
                year: caps[1].parse().ok(),
                month: caps[2].parse().ok(),
                day: caps[3].parse().ok(),
                weekday: None,
            });
        }

        let caps = NUMERIC_DATE_PARTS.captures(text)?;
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = self.expand_year(&caps[3])?;

        // Month first unless that cannot be right.
        let (month, day) = if first > 12 && second <= 12 {
            (second, first)
        } else {
            (first, second)
        };

        Some(DateParts {
            year: Some(year),
            month: Some(month),
            day: Some(day),
            weekday: None,
        })
    }

    fn token_parts(&self, text: &str) -> Result<DateParts, DateParseError> {
        let mut parts = DateParts::default();

        for token in DATE_TOKEN.find_iter(text).map(|m| m.as_str().to_lowercase()) {
            if token.starts_with(|c: char| c.is_ascii_digit()) {
                let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
                let Ok(value) = digits.parse::<u32>() else {
                    continue;
                };

                if value == 0 {
                    return Err(DateParseError::InvalidComponent(token));
                }

                if digits.len() == 4 || value > 31 || parts.day.is_some() {
                    // Only one number may claim the year.
                    if parts.year.is_some() {
                        return Err(DateParseError::ConflictingYear(text.to_string()));
                    }
                    parts.year = self.expand_year(digits);
                } else {
                    parts.day = Some(value);
                }
            } else if let Some(month) = month_from_name(&token) {
                parts.month.get_or_insert(month);
            } else if let Some(weekday) = weekday_from_name(&token) {
                parts.weekday.get_or_insert(weekday);
            }
        }

        Ok(parts)
    }

    fn resolve(&self, parts: DateParts) -> Result<NaiveDate, DateParseError> {
        let reference = self.reference;

        if let (Some(weekday), None, None, None) = (parts.weekday, parts.year, parts.month, parts.day) {
            return Ok(next_weekday(reference, weekday));
        }

        let year = parts.year.unwrap_or(reference.year());
        let month = parts.month.unwrap_or(reference.month());
        let day = match parts.day {
            Some(day) => day,
            None => reference.day().min(days_in_month(year, month).unwrap_or(28)),
        };

        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(DateParseError::OutOfRange { year, month, day })
    }

    /// Two-digit years land within fifty years of the reference year.
    fn expand_year(&self, digits: &str) -> Option<i32> {
        let year: i32 = digits.parse().ok()?;
        if digits.len() > 2 {
            return Some(year);
        }

        let current = self.reference.year();
        let mut expanded = current - current.rem_euclid(100) + year;
        if expanded >= current + 50 {
            expanded -= 100;
        } else if expanded < current - 50 {
            expanded += 100;
        }
        Some(expanded)
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::today()
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let month = match name {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let weekday = match name {
        "mon" | "monday" => Weekday::Mon,
        "tue" | "tues" | "tuesday" => Weekday::Tue,
        "wed" | "wednesday" => Weekday::Wed,
        "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        "sun" | "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(chrono::Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

fn next_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from.checked_add_days(Days::new(ahead as u64)).unwrap_or(from)
}

/// Normalize date text against a reference date.
pub fn normalize_date(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    DateNormalizer::new(reference).normalize(text)
}

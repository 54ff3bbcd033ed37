//! Event field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, FlyerParser};

/// Trait for turning recognized flyer text into an event.
///
/// Extraction never fails: fields that cannot be found are left absent.
pub trait EventParser {
    /// Parse an event from recognized text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

//! Error types for the flyer-core library.

use thiserror::Error;

/// Main error type for the flyer library.
///
/// Only [`FlyerError::Image`] and [`FlyerError::Ocr`] are produced by a
/// pipeline run. Extraction misses and date parse failures never surface as
/// errors; they show up as absent fields on the event.
#[derive(Error, Debug)]
pub enum FlyerError {
    /// Source image could not be read, decoded or normalized.
    #[error("image error: {0}")]
    Image(#[from] ImageError),

    /// Text recognition failed.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while loading or normalizing the source image.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The source image could not be decoded.
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    /// The normalized image could not be written.
    #[error("failed to write normalized image: {0}")]
    Encode(String),

    /// The file extension is not an accepted flyer format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// Errors raised at the text recognizer boundary.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The recognition engine could not be started or loaded.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The engine ran but reported a failure.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Reasons date text could not be turned into a calendar date.
///
/// These never leave the core; the date is left absent instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DateParseError {
    /// No month, day, year or weekday was found.
    #[error("no date components in {0:?}")]
    NoComponents(String),

    /// More than one number could be the year.
    #[error("conflicting year candidates in {0:?}")]
    ConflictingYear(String),

    /// A number that can be neither a day nor a year.
    #[error("{0:?} is not a day or year")]
    InvalidComponent(String),

    /// The components do not form a real date.
    #[error("no such date: {year}-{month:02}-{day:02}")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

/// Result type for the flyer library.
pub type Result<T> = std::result::Result<T, FlyerError>;

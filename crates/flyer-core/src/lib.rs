//! Core library for event flyer OCR processing.
//!
//! This crate provides:
//! - Image normalization (grayscale + Otsu binarization)
//! - Text recognition behind the [`TextRecognizer`] trait (tesseract, optional ONNX)
//! - Rule-based event field extraction (name, date, time, location, hosts, description)
//! - Fuzzy date normalization
//! - Calendar payload export

pub mod calendar;
pub mod error;
pub mod extraction;
pub mod models;
pub mod ocr;
#[cfg(feature = "native")]
pub mod pipeline;

pub use calendar::CalendarEvent;
pub use error::{DateParseError, FlyerError, ImageError, OcrError, Result};
pub use extraction::{EventParser, ExtractionResult, FlyerParser};
pub use extraction::rules::{normalize_date, DateNormalizer};
pub use models::config::FlyerConfig;
pub use models::event::{EventField, EventUpdate, ExtractedFields, StructuredEvent};
pub use ocr::{is_supported_image, ImageNormalizer, TextRecognizer};
#[cfg(feature = "native")]
pub use ocr::{create_recognizer, TesseractRecognizer};
#[cfg(feature = "native")]
pub use pipeline::{FlyerPipeline, PipelineOutput, PipelineState};

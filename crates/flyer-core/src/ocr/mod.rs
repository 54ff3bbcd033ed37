//! Image normalization and the text recognizer boundary.

mod preprocessing;
#[cfg(feature = "onnx")]
mod pure_engine;
#[cfg(feature = "native")]
mod tesseract;

pub use preprocessing::{is_supported_image, otsu_threshold, ImageNormalizer, SUPPORTED_EXTENSIONS};
#[cfg(feature = "native")]
pub use preprocessing::NormalizedImage;
#[cfg(feature = "onnx")]
pub use pure_engine::OnnxRecognizer;
#[cfg(feature = "native")]
pub use tesseract::TesseractRecognizer;

use std::path::Path;

use crate::error::OcrError;
#[cfg(feature = "native")]
use crate::models::config::{OcrConfig, OcrEngineKind};

/// Turns a normalized image into text.
///
/// Implementations are called once per run and must not keep per-run state.
/// An image without text yields an empty string, not an error.
pub trait TextRecognizer: Send + Sync {
    /// Engine name for logs.
    fn name(&self) -> &str;

    /// Recognize all text in the image at `image`.
    fn recognize(&self, image: &Path) -> Result<String, OcrError>;
}

impl<F> TextRecognizer for F
where
    F: Fn(&Path) -> Result<String, OcrError> + Send + Sync,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        self(image)
    }
}

/// Create the recognizer selected in the configuration.
#[cfg(feature = "native")]
pub fn create_recognizer(config: &OcrConfig) -> Result<Box<dyn TextRecognizer>, OcrError> {
    match config.engine {
        OcrEngineKind::Tesseract => Ok(Box::new(TesseractRecognizer::from_config(config))),
        #[cfg(feature = "onnx")]
        OcrEngineKind::Onnx => Ok(Box::new(OnnxRecognizer::from_dir(&config.model_dir)?)),
        #[cfg(not(feature = "onnx"))]
        OcrEngineKind::Onnx => Err(OcrError::EngineUnavailable(
            "built without the `onnx` feature".to_string(),
        )),
    }
}

//! Recognizer driving the `tesseract` command-line tool.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::TextRecognizer;

/// Runs `tesseract <image> stdout` and returns its output.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    language: String,
    page_segmentation_mode: u8,
}

impl TesseractRecognizer {
    /// Create a recognizer from OCR configuration.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            binary: config.tesseract_binary.clone(),
            language: config.language.clone(),
            page_segmentation_mode: config.page_segmentation_mode,
        }
    }

    /// Use a different executable.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    fn command(&self, image: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.page_segmentation_mode.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::from_config(&OcrConfig::default())
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        debug!(
            "Running {} on {} (lang {}, psm {})",
            self.binary.display(),
            image.display(),
            self.language,
            self.page_segmentation_mode
        );

        let output = self.command(image).output().map_err(|e| {
            OcrError::EngineUnavailable(format!(
                "{} could not be started ({}); is tesseract installed and on PATH?",
                self.binary.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("{} exited with {}: {}", self.binary.display(), output.status, stderr.trim());
            return Err(OcrError::Recognition(stderr.trim().to_string()));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.trim_end_matches(['\u{c}', '\n', '\r']).to_string())
    }
}

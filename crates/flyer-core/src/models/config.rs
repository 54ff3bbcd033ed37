//! Configuration structures for the flyer pipeline.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the flyer pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyerConfig {
    /// Text recognizer configuration.
    pub ocr: OcrConfig,

    /// Image normalization configuration.
    pub preprocessing: PreprocessingConfig,

    /// Where transient artifacts are written.
    pub storage: StorageConfig,

    /// Date normalization configuration.
    pub dates: DateConfig,

    /// Calendar payload export configuration.
    pub calendar: CalendarConfig,
}

/// Which recognition engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrEngineKind {
    /// The `tesseract` command-line tool.
    #[default]
    Tesseract,
    /// Pure Rust ONNX models (requires the `onnx` feature).
    Onnx,
}

/// Text recognizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Recognition engine.
    pub engine: OcrEngineKind,

    /// Path or name of the tesseract executable.
    pub tesseract_binary: PathBuf,

    /// Recognition language.
    pub language: String,

    /// Tesseract page segmentation mode.
    pub page_segmentation_mode: u8,

    /// Directory containing ONNX model files (det.onnx, latin_rec.onnx, latin_dict.txt).
    pub model_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::Tesseract,
            tesseract_binary: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            page_segmentation_mode: 3,
            model_dir: PathBuf::from("models"),
        }
    }
}

/// Image normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Fixed binarization threshold, superseded by Otsu when enabled.
    pub seed_threshold: u8,

    /// Pick the threshold automatically with Otsu's method.
    pub use_otsu: bool,

    /// Suffix added to the source file stem for the normalized image.
    pub processed_suffix: String,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            seed_threshold: 150,
            use_otsu: true,
            processed_suffix: "_processed".to_string(),
        }
    }
}

/// Storage configuration for transient artifacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for normalized images. Defaults to the source image's directory.
    pub work_dir: Option<PathBuf>,
}

/// Date normalization configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Fixed "today" used to fill in missing date components.
    /// Uses the local date when unset.
    pub reference_date: Option<NaiveDate>,
}

impl DateConfig {
    /// The date missing components are taken from.
    pub fn reference(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Calendar payload export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// IANA timezone attached to timed events.
    pub timezone: String,

    /// Start time used when the event time is missing or unreadable.
    pub default_start: NaiveTime,

    /// End time used when the event time is missing or unreadable.
    pub default_end: NaiveTime,

    /// Event length when a start time was read from the flyer.
    pub duration_hours: u32,

    /// Popup reminder lead time.
    pub popup_reminder_minutes: u32,

    /// Email reminder lead time.
    pub email_reminder_minutes: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: "America/New_York".to_string(),
            default_start: NaiveTime::from_hms_opt(19, 0, 0).unwrap_or_default(),
            default_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            duration_hours: 3,
            popup_reminder_minutes: 60,
            email_reminder_minutes: 24 * 60,
        }
    }
}

impl FlyerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FlyerConfig::default();
        assert_eq!(config.preprocessing.seed_threshold, 150);
        assert!(config.preprocessing.use_otsu);
        assert_eq!(config.ocr.engine, OcrEngineKind::Tesseract);
        assert_eq!(config.calendar.duration_hours, 3);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: FlyerConfig = serde_json::from_str(
            r#"{ "ocr": { "language": "deu" }, "dates": { "reference_date": "2024-06-01" } }"#,
        )
        .unwrap();

        assert_eq!(config.ocr.language, "deu");
        assert_eq!(config.ocr.page_segmentation_mode, 3);
        assert_eq!(
            config.dates.reference(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(config.calendar.timezone, "America/New_York");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FlyerConfig::default();
        config.preprocessing.seed_threshold = 128;
        config.save(&path).unwrap();

        let loaded = FlyerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.preprocessing.seed_threshold, 128);
    }
}

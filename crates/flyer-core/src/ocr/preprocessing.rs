//! Image normalization for OCR.

use std::path::Path;
#[cfg(feature = "native")]
use std::path::PathBuf;

use image::{DynamicImage, GrayImage, Luma};
#[cfg(feature = "native")]
use tracing::debug;

#[cfg(feature = "native")]
use crate::error::ImageError;
use crate::models::config::{PreprocessingConfig, StorageConfig};

/// Extensions accepted as flyer uploads.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Converts flyer photos into two-tone images for the text recognizer.
pub struct ImageNormalizer {
    /// Fixed threshold, used when Otsu is disabled.
    seed_threshold: u8,
    /// Pick the threshold from the image histogram.
    use_otsu: bool,
    /// Suffix added to the source file stem.
    processed_suffix: String,
    /// Directory for normalized images (source directory when unset).
    #[cfg_attr(not(feature = "native"), allow(dead_code))]
    work_dir: Option<std::path::PathBuf>,
}

impl ImageNormalizer {
    /// Create a normalizer with default settings.
    pub fn new() -> Self {
        Self::from_config(&PreprocessingConfig::default(), &StorageConfig::default())
    }

    /// Create a normalizer from configuration.
    pub fn from_config(preprocessing: &PreprocessingConfig, storage: &StorageConfig) -> Self {
        Self {
            seed_threshold: preprocessing.seed_threshold,
            use_otsu: preprocessing.use_otsu,
            processed_suffix: preprocessing.processed_suffix.clone(),
            work_dir: storage.work_dir.clone(),
        }
    }

    /// Set the fixed threshold.
    pub fn with_seed_threshold(mut self, threshold: u8) -> Self {
        self.seed_threshold = threshold;
        self
    }

    /// Enable or disable Otsu thresholding.
    pub fn with_otsu(mut self, enabled: bool) -> Self {
        self.use_otsu = enabled;
        self
    }

    /// Grayscale and binarize an image.
    ///
    /// Returns the two-tone image and the threshold that was applied.
    pub fn binarize(&self, image: &DynamicImage) -> (GrayImage, u8) {
        let gray = image.to_luma8();

        let threshold = if self.use_otsu {
            otsu_threshold(&gray)
        } else {
            self.seed_threshold
        };

        (apply_threshold(&gray, threshold), threshold)
    }

    /// Decode `source`, binarize it and write the result next to it.
    ///
    /// The normalized file is removed when the returned value is dropped.
    #[cfg(feature = "native")]
    pub fn normalize(&self, source: &Path) -> Result<NormalizedImage, ImageError> {
        let image = image::open(source).map_err(|e| ImageError::Decode {
            path: source.display().to_string(),
            reason: e.to_string(),
        })?;

        let (binary, threshold) = self.binarize(&image);
        debug!(
            "Binarized {} ({}x{}) at threshold {}",
            source.display(),
            binary.width(),
            binary.height(),
            threshold
        );

        let file = self.transient_file(source)?;
        binary
            .save_with_format(file.path(), image::ImageFormat::Png)
            .map_err(|e| ImageError::Encode(e.to_string()))?;

        debug!("Wrote normalized image to {}", file.path().display());

        Ok(NormalizedImage { file, threshold })
    }

    /// Create a run-unique `<stem><suffix>-XXXXXX.png` file.
    #[cfg(feature = "native")]
    fn transient_file(&self, source: &Path) -> Result<tempfile::NamedTempFile, ImageError> {
        let dir: PathBuf = match &self.work_dir {
            Some(dir) => dir.clone(),
            None => source
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("flyer");

        tempfile::Builder::new()
            .prefix(&format!("{}{}-", stem, self.processed_suffix))
            .suffix(".png")
            .tempfile_in(&dir)
            .map_err(|e| ImageError::Encode(format!("{}: {}", dir.display(), e)))
    }
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// A binarized flyer image on disk, deleted on drop.
#[cfg(feature = "native")]
#[derive(Debug)]
pub struct NormalizedImage {
    file: tempfile::NamedTempFile,
    threshold: u8,
}

#[cfg(feature = "native")]
impl NormalizedImage {
    /// Location of the normalized image.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Threshold used for binarization.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Delete the file now, reporting failures.
    pub fn close(self) -> std::io::Result<()> {
        self.file.close()
    }
}

/// Whether the file extension is an accepted flyer format.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Global threshold maximizing between-class variance (Otsu's method).
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0f64;
    let mut best_variance = 0f64;
    let mut best_threshold = 0u8;

    for (value, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }

        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += value as f64 * count as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight as f64;

        let variance = background_weight as f64
            * foreground_weight as f64
            * (background_mean - foreground_mean).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_threshold = value as u8;
        }
    }

    best_threshold
}

/// Pixels above `threshold` become white, the rest black.
fn apply_threshold(image: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut result = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let output = if pixel[0] > threshold { 255 } else { 0 };
        result.put_pixel(x, y, Luma([output]));
    }

    result
}

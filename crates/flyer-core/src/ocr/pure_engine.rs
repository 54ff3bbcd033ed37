//! Pure Rust recognizer using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::OcrError;

use super::TextRecognizer;

/// Vertical band height used to group regions into lines.
const LINE_BAND: f64 = 20.0;

/// Recognizer backed by `pure-onnx-ocr` (no external ONNX Runtime).
pub struct OnnxRecognizer {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

impl OnnxRecognizer {
    /// Load `det.onnx`, `latin_rec.onnx` and `latin_dict.txt` from a directory.
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!("missing {}", path.display())));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr models from {}", model_dir.display());

        Ok(Self { engine })
    }
}

impl TextRecognizer for OnnxRecognizer {
    fn name(&self) -> &str {
        "onnx"
    }

    fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let start = Instant::now();

        let decoded = image::open(image)
            .map_err(|e| OcrError::Recognition(format!("{}: {}", image.display(), e)))?;

        let results = self
            .engine
            .run_from_image(&decoded)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut regions: Vec<((f64, f64), String)> = results
            .iter()
            .map(|r| (top_left(&r.bounding_box), r.text.replace("[UNK]", " ")))
            .collect();

        // Reading order: bands top to bottom, then left to right.
        regions.sort_by(|((ax, ay), _), ((bx, by), _)| {
            let band_a = (ay / LINE_BAND) as i64;
            let band_b = (by / LINE_BAND) as i64;
            band_a
                .cmp(&band_b)
                .then(ax.partial_cmp(bx).unwrap_or(std::cmp::Ordering::Equal))
        });

        let text = regions
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n");

        info!(
            "Recognized {} characters in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Smallest x and y over the first four polygon points.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f64::MAX, f64::MAX), |(x, y), coord| {
            (x.min(coord.x), y.min(coord.y))
        })
}

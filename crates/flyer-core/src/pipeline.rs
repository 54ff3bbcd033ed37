//! Image-to-event pipeline.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{ImageError, Result};
use crate::extraction::FlyerParser;
use crate::models::config::FlyerConfig;
use crate::models::event::StructuredEvent;
use crate::ocr::{create_recognizer, is_supported_image, ImageNormalizer, TextRecognizer};

/// Stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Created,
    Normalized,
    Recognized,
    Extracted,
    Dated,
    Complete,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Normalized => "normalized",
            Self::Recognized => "recognized",
            Self::Extracted => "extracted",
            Self::Dated => "dated",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The extracted event.
    pub event: StructuredEvent,
    /// Fields that could not be extracted.
    pub warnings: Vec<String>,
    /// Threshold used to binarize the image.
    pub threshold: u8,
    /// States visited, in order.
    pub states: Vec<PipelineState>,
    /// Total run time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs normalization, recognition, extraction and date normalization.
///
/// Holds no per-run state; one pipeline can serve concurrent runs.
pub struct FlyerPipeline {
    normalizer: ImageNormalizer,
    recognizer: Box<dyn TextRecognizer>,
    parser: FlyerParser,
}

impl FlyerPipeline {
    /// Create a pipeline with the recognizer selected in `config`.
    pub fn new(config: &FlyerConfig) -> Result<Self> {
        let recognizer = create_recognizer(&config.ocr)?;
        Ok(Self::with_boxed_recognizer(config, recognizer))
    }

    /// Create a pipeline with a custom recognizer.
    pub fn with_recognizer<R: TextRecognizer + 'static>(config: &FlyerConfig, recognizer: R) -> Self {
        Self::with_boxed_recognizer(config, Box::new(recognizer))
    }

    fn with_boxed_recognizer(config: &FlyerConfig, recognizer: Box<dyn TextRecognizer>) -> Self {
        Self {
            normalizer: ImageNormalizer::from_config(&config.preprocessing, &config.storage),
            recognizer,
            parser: FlyerParser::with_reference_date(config.dates.reference()),
        }
    }

    /// Name of the recognizer in use.
    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Process one flyer image.
    pub fn run(&self, source: &Path) -> Result<PipelineOutput> {
        self.run_traced(source).1
    }

    /// Process one flyer image, also returning the states visited.
    ///
    /// A failed run ends in [`PipelineState::Failed`], preceded by the
    /// last stage that completed.
    pub fn run_traced(&self, source: &Path) -> (Vec<PipelineState>, Result<PipelineOutput>) {
        let start = Instant::now();
        let mut run = Run::new(source);

        info!("Processing {}", source.display());

        let (event, warnings, threshold) = match self.run_stages(source, &mut run) {
            Ok(parts) => parts,
            Err(e) => {
                warn!("Failed to process {} while {}: {}", source.display(), run.current(), e);
                run.advance(PipelineState::Failed);
                return (run.states, Err(e));
            }
        };

        run.advance(PipelineState::Complete);

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Processed {} in {}ms ({} warnings)",
            source.display(),
            processing_time_ms,
            warnings.len()
        );

        let output = PipelineOutput {
            event,
            warnings,
            threshold,
            states: run.states.clone(),
            processing_time_ms,
        };
        (run.states, Ok(output))
    }

    fn run_stages(
        &self,
        source: &Path,
        run: &mut Run,
    ) -> Result<(StructuredEvent, Vec<String>, u8)> {
        if !is_supported_image(source) {
            return Err(ImageError::UnsupportedFormat(source.display().to_string()).into());
        }

        let normalized = self.normalizer.normalize(source)?;
        let threshold = normalized.threshold();
        run.advance(PipelineState::Normalized);

        let recognized = self.recognizer.recognize(normalized.path());

        // The normalized image never outlives the recognition stage.
        if let Err(e) = normalized.close() {
            warn!("Could not remove normalized image: {}", e);
        }

        let raw_text = recognized?;
        run.advance(PipelineState::Recognized);
        debug!("{} recognized {} characters", self.recognizer.name(), raw_text.len());

        let fields = self.parser.extract_fields(&raw_text);
        run.advance(PipelineState::Extracted);

        let event_date = self.parser.normalize_date(&fields);
        run.advance(PipelineState::Dated);

        let warnings = FlyerParser::warnings(&fields, event_date);

        Ok((
            StructuredEvent {
                raw_text,
                fields,
                event_date,
            },
            warnings,
            threshold,
        ))
    }
}

/// State history of one run.
struct Run<'a> {
    source: &'a Path,
    states: Vec<PipelineState>,
}

impl<'a> Run<'a> {
    fn new(source: &'a Path) -> Self {
        Self {
            source,
            states: vec![PipelineState::Created],
        }
    }

    fn current(&self) -> PipelineState {
        self.states.last().copied().unwrap_or(PipelineState::Created)
    }

    fn advance(&mut self, next: PipelineState) {
        debug!("{}: {} -> {}", self.source.display(), self.current(), next);
        self.states.push(next);
    }
}

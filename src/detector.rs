use anyhow::{Context, Result};
use image::RgbaImage;

use crate::{
    config::{AppConfig, DetectionConfig},
    ocr_service::OcrService,
    region::{Region, Shape},
};

pub mod collision;
pub mod filter;
pub mod grouping;
pub mod merge;

/// Runs the full detection pipeline: OCR, line grouping, filtering, vertical
/// merging and collision filtering against existing shapes.
pub struct Detector {
    ocr: Box<dyn OcrService>,
    config: DetectionConfig,
}

/// The outcome of one detection run.
///
/// An empty region list is a perfectly valid result (nothing worth occluding
/// on the image); `diagnostic` is only set when the run failed internally
/// and the empty result deserves an explanation.
pub struct Detection {
    pub regions: Vec<Region>,
    pub diagnostic: Option<String>,
}

impl Detector {
    /// Create a new `Detector` with the OCR service specified in the given `AppConfig`.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut ocr = config.ocr_service.create_service();
        ocr.init()
            .with_context(|| format!("Failed to initialise OCR Service `{}`", ocr.name()))?;

        Ok(Self::with_service(ocr, config.detection.clone()))
    }

    /// Build a detector around an already initialised OCR service.
    pub fn with_service(ocr: Box<dyn OcrService>, config: DetectionConfig) -> Self {
        Self { ocr, config }
    }

    /// Detect text regions on `image`, dropping candidates that collide with
    /// shapes already on the canvas.
    ///
    /// Never fails: the caller sits in an interactive editor, so internal
    /// errors are folded into an empty region list with a diagnostic.
    pub fn detect(&mut self, image: &RgbaImage, existing: &[Shape]) -> Detection {
        match self.try_detect(image, existing) {
            Ok(regions) => Detection {
                regions,
                diagnostic: None,
            },
            Err(e) => {
                log::warn!("text detection failed: {e:#}");
                Detection {
                    regions: Vec::new(),
                    diagnostic: Some(format!("{e:#}")),
                }
            }
        }
    }

    fn try_detect(&mut self, image: &RgbaImage, existing: &[Shape]) -> Result<Vec<Region>> {
        let words = self
            .ocr
            .recognize(image, &self.config.language)
            .with_context(|| format!("OCR Service `{}` failed", self.ocr.name()))?;
        log::debug!("OCR returned {} raw words", words.len());

        let lines = grouping::group_words(words);
        let filtered = filter::filter_lines(&lines, image.width(), image.height(), &self.config);
        log::debug!("{} lines, {} survived filtering", lines.len(), filtered.len());

        let merged = merge::merge_vertically_close(filtered, self.config.vertical_merge_factor);
        log::debug!("{} regions after vertical merging", merged.len());

        let regions = if existing.is_empty() {
            merged
        } else {
            collision::drop_colliding(merged, existing, image.width(), image.height())
        };

        Ok(regions)
    }
}

impl Drop for Detector {
    fn drop(&mut self) {
        self.ocr
            .terminate()
            .expect("Failed to terminate OCR Service");
    }
}

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, RgbaImage};
use rusty_tesseract::Args;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    region::Region,
    word::{LineKey, Word},
};

use super::OcrService;

/// OCR service backed by the system `tesseract` binary.
#[derive(Default)]
pub struct TesseractOcr {
    config: TesseractConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// Page segmentation mode. 11 (sparse text) picks up scattered labels
    /// without assuming a page layout.
    psm: i32,
    /// OCR engine mode.
    oem: i32,
    dpi: Option<i32>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            psm: 11,
            oem: 3,
            dpi: None,
        }
    }
}

impl Config for TesseractConfig {
    fn path() -> &'static str {
        "ocr_services/tesseract.json"
    }
}

impl OcrService for TesseractOcr {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn init(&mut self) -> Result<()> {
        self.config =
            TesseractConfig::load().context("Tesseract: Failed to load configuration file")?;

        // probe for the binary up front so a missing engine surfaces at
        // startup rather than on the first detection request
        let version = rusty_tesseract::get_tesseract_version()
            .map_err(|e| anyhow!("Tesseract: The `tesseract` binary is not available: {e}"))?;
        log::debug!("using tesseract {}", version.trim());

        Ok(())
    }

    fn terminate(&mut self) -> Result<()> {
        self.config
            .save()
            .context("Tesseract: Failed to save configuration file")?;
        Ok(())
    }

    fn recognize(&mut self, image: &RgbaImage, language: &str) -> Result<Vec<Word>> {
        let dynamic = DynamicImage::ImageRgba8(image.clone());
        let tess_image = rusty_tesseract::Image::from_dynamic_image(&dynamic)
            .map_err(|e| anyhow!("Tesseract: Failed to convert image for recognition: {e}"))?;

        let args = Args {
            lang: language.to_owned(),
            config_variables: HashMap::new(),
            dpi: self.config.dpi,
            psm: Some(self.config.psm),
            oem: Some(self.config.oem),
        };

        let output = rusty_tesseract::image_to_data(&tess_image, &args)
            .map_err(|e| anyhow!("Tesseract: Text recognition failed: {e}"))?;
        log::debug!("tesseract returned {} data entries", output.data.len());

        let words = output
            .data
            .into_iter()
            .map(|d| Word {
                text: d.text,
                confidence: d.conf as i32,
                bounds: Region::new(
                    d.left as f32,
                    d.top as f32,
                    d.width as f32,
                    d.height as f32,
                ),
                line: LineKey {
                    block: d.block_num,
                    paragraph: d.par_num,
                    line: d.line_num,
                },
            })
            .collect();

        Ok(words)
    }
}

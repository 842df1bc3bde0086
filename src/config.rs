use std::fs::File;

use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::ocr_service::{tesseract::TesseractOcr, DummyOcrService, OcrService};

pub trait Config: Serialize + DeserializeOwned + Default {
    fn path() -> &'static str;

    /// Loads a configuration file, or creates a default configuration struct if the file does not exist.
    fn load() -> Result<Self> {
        let mut config_path = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not find suitable config directory"))?;
        config_path.push(env!("CARGO_PKG_NAME"));
        config_path.push(Self::path());

        if !config_path.exists() {
            Ok(Self::default())
        } else {
            let file = File::open(&config_path).with_context(|| {
                format!(
                    "Could not open configuration file: `{}`",
                    config_path.display()
                )
            })?;

            let config = serde_json::from_reader(file).with_context(|| {
                format!(
                    "Could not read configuration file: `{}`",
                    config_path.display(),
                )
            })?;

            Ok(config)
        }
    }

    fn save(&self) -> Result<()> {
        let mut config_path = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not find suitable config directory"))?;
        config_path.push(env!("CARGO_PKG_NAME"));
        config_path.push(Self::path());

        let mut config_dir = config_path.clone();
        config_dir.pop();
        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Could not create configuration directory: `{}`",
                config_dir.display()
            )
        })?;

        let file = File::create(&config_path).with_context(|| {
            format!(
                "Could not write to configuration file: `{}`",
                config_path.display()
            )
        })?;

        serde_json::to_writer_pretty(file, self).with_context(|| {
            format!(
                "Could not serialise configuration file: `{}`",
                config_path.display()
            )
        })?;

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ocr_service: OcrServiceList,
    pub detection: DetectionConfig,
}

impl Config for AppConfig {
    fn path() -> &'static str {
        "config.json"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ocr_service: OcrServiceList::Tesseract,
            detection: DetectionConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum OcrServiceList {
    Tesseract,
    Dummy,
}

impl OcrServiceList {
    pub fn create_service(self) -> Box<dyn OcrService> {
        match self {
            Self::Tesseract => Box::new(TesseractOcr::default()),
            Self::Dummy => Box::new(DummyOcrService),
        }
    }
}

/// Thresholds controlling how raw OCR detections are filtered and merged
/// into occlusion candidates.
///
/// Every field is optional in the configuration file; absent fields keep
/// their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum mean word confidence (0-100) for a line to survive filtering.
    pub min_confidence: i32,
    /// Minimum bounding box width, in pixels.
    pub min_width: f32,
    /// Minimum bounding box height, in pixels.
    pub min_height: f32,
    /// Minimum bounding box area, as a fraction of the image area.
    pub min_area_percent: f32,
    /// Multiplier on the mean region height when deciding whether two lines
    /// sit close enough to belong to the same label.
    pub vertical_merge_factor: f32,
    /// Language passed to the OCR service.
    pub language: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 48,
            min_width: 4.0,
            min_height: 4.0,
            min_area_percent: 0.0001,
            vertical_merge_factor: 1.5,
            language: "eng".to_owned(),
        }
    }
}

use anyhow::Result;
use image::RgbaImage;

use crate::word::Word;

pub mod tesseract;

pub trait OcrService {
    fn name(&self) -> &'static str;

    /// Initialise the service (ie. load its configuration file, check that the engine is reachable, etc).
    fn init(&mut self) -> Result<()>;
    /// Terminate the service (ie. save its configuration file, etc).
    fn terminate(&mut self) -> Result<()>;

    /// Run text recognition on an image, returning one entry per detected
    /// word. Entries arrive in no particular spatial order and may carry
    /// negative confidences for non-detections; downstream grouping deals
    /// with both.
    fn recognize(&mut self, image: &RgbaImage, language: &str) -> Result<Vec<Word>>;
}

/// An OCR service which never detects anything.
pub struct DummyOcrService;

impl OcrService for DummyOcrService {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn terminate(&mut self) -> Result<()> {
        Ok(())
    }

    fn recognize(&mut self, _image: &RgbaImage, _language: &str) -> Result<Vec<Word>> {
        Ok(Vec::new())
    }
}

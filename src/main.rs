use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use config::{AppConfig, Config};
use detector::Detector;
use region::{Region, Shape};

pub mod config;
pub mod detector;
pub mod ocr_service;
pub mod region;
pub mod word;

/// The response document handed back to the editor layer.
#[derive(Debug, Serialize)]
struct Response {
    regions: Vec<Region>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let mut args = std::env::args().skip(1);
    let image_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: maskocr <image> [shapes.json]"))?;
    let shapes_path = args.next().map(PathBuf::from);

    // failures before and during detection both end up as an error field in
    // the response, never as a crash in the editor's face
    let response = match run(&image_path, shapes_path.as_deref()) {
        Ok(response) => response,
        Err(e) => {
            log::warn!("{e:#}");
            Response {
                regions: Vec::new(),
                error: Some(format!("{e:#}")),
            }
        }
    };

    log::info!("detected {} regions", response.regions.len());
    println!(
        "{}",
        serde_json::to_string(&response).context("Failed to serialise response")?
    );

    Ok(())
}

fn run(image_path: &Path, shapes_path: Option<&Path>) -> Result<Response> {
    let config = AppConfig::load().context("Could not load main configuration file")?;

    let image = image::open(image_path)
        .with_context(|| format!("Could not decode image `{}`", image_path.display()))?
        .to_rgba8();

    let shapes = match shapes_path {
        Some(path) => load_shapes(path)?,
        None => Vec::new(),
    };

    let mut detector = Detector::new(&config)?;
    let detection = detector.detect(&image, &shapes);

    Ok(Response {
        regions: detection.regions,
        error: detection.diagnostic,
    })
}

/// Read the existing occlusion shapes the editor serialised for us.
fn load_shapes(path: &Path) -> Result<Vec<Shape>> {
    let file = File::open(path)
        .with_context(|| format!("Could not open shapes file `{}`", path.display()))?;

    let values: Vec<serde_json::Value> = serde_json::from_reader(file)
        .with_context(|| format!("Could not parse shapes file `{}`", path.display()))?;

    Ok(Shape::parse_list(&values))
}

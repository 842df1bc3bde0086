use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether two rectangles overlap. Edge contact counts as an overlap.
    pub fn intersects(&self, other: &Region) -> bool {
        !(self.bottom() < other.top
            || self.top > other.bottom()
            || self.right() < other.left
            || self.left > other.right())
    }

    /// The smallest rectangle enclosing both `self` and `other`.
    pub fn union(&self, other: &Region) -> Region {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);

        Region {
            left,
            top,
            width: self.right().max(other.right()) - left,
            height: self.bottom().max(other.bottom()) - top,
        }
    }
}

/// An occlusion shape already present on the editor canvas, with position and
/// size normalized to 0-1 of the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Shape {
    /// Scale to the pixel space of an `img_width` x `img_height` image.
    pub fn to_pixels(&self, img_width: u32, img_height: u32) -> Region {
        Region {
            left: self.left * img_width as f32,
            top: self.top * img_height as f32,
            width: self.width * img_width as f32,
            height: self.height * img_height as f32,
        }
    }

    /// Parse a list of shapes from raw JSON values.
    ///
    /// Entries which are missing fields (or are not objects at all) are
    /// skipped rather than failing the whole list; the editor keeps working
    /// with whatever shape data it did manage to hand over.
    pub fn parse_list(values: &[serde_json::Value]) -> Vec<Shape> {
        values
            .iter()
            .filter_map(|value| match serde_json::from_value(value.clone()) {
                Ok(shape) => Some(shape),
                Err(e) => {
                    log::warn!("skipping malformed shape entry: {e}");
                    None
                }
            })
            .collect()
    }
}

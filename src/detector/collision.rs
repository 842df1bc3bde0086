use crate::region::{Region, Shape};

/// Drop candidate regions which intersect any occlusion shape already on the
/// canvas, so detection never stacks a second box over one the user drew.
///
/// Shapes arrive normalized to 0-1 of the image dimensions and are scaled to
/// pixels before testing; edge contact counts as a collision. Input order of
/// the surviving regions is preserved.
pub fn drop_colliding(
    regions: Vec<Region>,
    existing: &[Shape],
    img_width: u32,
    img_height: u32,
) -> Vec<Region> {
    let existing: Vec<Region> = existing
        .iter()
        .map(|shape| shape.to_pixels(img_width, img_height))
        .collect();

    regions
        .into_iter()
        .filter(|region| !existing.iter().any(|shape| region.intersects(shape)))
        .collect()
}

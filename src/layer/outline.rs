//! Alpha-masked flat fill: turns the dilated silhouette into the colored
//! outline layer.

use image::{GrayImage, RgbaImage};
use palette::Srgb;

/// Builds the colored outline layer from a dilated alpha mask.
///
/// Wherever the mask has coverage, the output carries the fill color's RGB
/// exactly and the mask's alpha unchanged. Pixels outside the coverage stay
/// fully transparent with zeroed channels.
pub fn fill_outline(mask: &GrayImage, color: Srgb<u8>) -> RgbaImage {
    let mut layer = RgbaImage::new(mask.width(), mask.height());

    for (src, dst) in mask.pixels().zip(layer.pixels_mut()) {
        let alpha = src.0[0];
        if alpha > 0 {
            dst.0 = [color.red, color.green, color.blue, alpha];
        }
    }

    layer
}

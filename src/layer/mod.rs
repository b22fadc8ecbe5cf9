//! Raster layer primitives for sticker composition.
//!
//! This module provides the compositing building blocks used by the
//! generator:
//!
//! - [`composite_over`]: Porter-Duff "over" for straight-alpha RGBA buffers
//! - [`draw_layer`]: one draw of an image onto the canvas, with the drop
//!   shadow passed as an explicit parameter instead of ambient drawing
//!   state that must be set and reset around each call
//!
//! The effect stages live in submodules: [`wave`] (angular radius
//! perturbation), [`dilate`] (silhouette dilation), [`outline`]
//! (alpha-masked flat fill), and [`shadow`] (alpha blur + shadow layer).

pub mod dilate;
pub mod outline;
pub mod shadow;
pub mod wave;

use image::{Rgba, RgbaImage};

// ============================================================================
// Shadow Parameters
// ============================================================================

/// Fixed drop-shadow parameters for one draw.
///
/// Obtained from [`ShadowStyle::params`](crate::ShadowStyle::params); there
/// are no free shadow parameters on the settings surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    /// Blur radius in the host-canvas `shadowBlur` convention
    /// (Gaussian sigma is `blur / 2`).
    pub blur: f32,

    /// Horizontal shadow offset in pixels (positive = right).
    pub offset_x: i32,

    /// Vertical shadow offset in pixels (positive = down).
    pub offset_y: i32,

    /// Shadow color with alpha, straight (non-premultiplied).
    pub color: [u8; 4],
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites `src` over `canvas` at the given offset (Porter-Duff "over",
/// straight alpha). Pixels falling outside the canvas are clipped.
pub fn composite_over(canvas: &mut RgbaImage, src: &RgbaImage, offset_x: i64, offset_y: i64) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);

    for sy in 0..src.height() {
        let cy = sy as i64 + offset_y;
        if cy < 0 || cy >= ch {
            continue;
        }
        for sx in 0..src.width() {
            let cx = sx as i64 + offset_x;
            if cx < 0 || cx >= cw {
                continue;
            }

            let s = src.get_pixel(sx, sy).0;
            if s[3] == 0 {
                continue;
            }

            let d = canvas.get_pixel(cx as u32, cy as u32).0;
            if d[3] == 0 {
                // Nothing underneath: the source pixel lands unchanged.
                canvas.put_pixel(cx as u32, cy as u32, Rgba(s));
                continue;
            }

            let sa = s[3] as f32 / 255.0;
            let da = d[3] as f32 / 255.0;
            let out_a = sa + da * (1.0 - sa);

            let blend = |sc: u8, dc: u8| -> u8 {
                let v = (sc as f32 * sa + dc as f32 * da * (1.0 - sa)) / out_a;
                v.round().clamp(0.0, 255.0) as u8
            };

            canvas.put_pixel(
                cx as u32,
                cy as u32,
                Rgba([
                    blend(s[0], d[0]),
                    blend(s[1], d[1]),
                    blend(s[2], d[2]),
                    (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
                ]),
            );
        }
    }
}

/// Draws `image` onto `canvas` at `offset`, optionally casting a drop
/// shadow in the same pass.
///
/// The shadow traces the alpha coverage of `image` itself (not whatever is
/// already on the canvas), so a shadowed final draw of the source produces
/// a shadow of the original silhouette, not of the dilated outline.
pub fn draw_layer(
    canvas: &mut RgbaImage,
    image: &RgbaImage,
    offset: (i64, i64),
    shadow: Option<&ShadowParams>,
) {
    if let Some(params) = shadow {
        let layer = shadow::shadow_layer(image, canvas.width(), canvas.height(), offset, params);
        composite_over(canvas, &layer, 0, 0);
    }
    composite_over(canvas, image, offset.0, offset.1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn over_onto_empty_canvas_copies_source() {
        let mut canvas = RgbaImage::new(10, 10);
        let src = solid_image(4, 4, [10, 20, 30, 128]);
        composite_over(&mut canvas, &src, 3, 3);

        assert_eq!(canvas.get_pixel(3, 3).0, [10, 20, 30, 128]);
        assert_eq!(canvas.get_pixel(2, 3).0, [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(6, 6).0, [10, 20, 30, 128]);
        assert_eq!(canvas.get_pixel(7, 7).0, [0, 0, 0, 0]);
    }

    #[test]
    fn opaque_source_replaces_destination() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let src = solid_image(4, 4, [0, 0, 255, 255]);
        composite_over(&mut canvas, &src, 0, 0);
        assert_eq!(canvas.get_pixel(1, 1).0, [0, 0, 255, 255]);
    }

    #[test]
    fn half_alpha_blends_channels() {
        let mut canvas = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let src = solid_image(1, 1, [255, 255, 255, 128]);
        composite_over(&mut canvas, &src, 0, 0);

        let out = canvas.get_pixel(0, 0).0;
        assert_eq!(out[3], 255);
        // 255 * (128/255) over black: ~128.
        assert!((out[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn clips_outside_canvas() {
        let mut canvas = RgbaImage::new(4, 4);
        let src = solid_image(4, 4, [1, 2, 3, 255]);
        composite_over(&mut canvas, &src, -2, -2);

        assert_eq!(canvas.get_pixel(0, 0).0, [1, 2, 3, 255]);
        assert_eq!(canvas.get_pixel(1, 1).0, [1, 2, 3, 255]);
        assert_eq!(canvas.get_pixel(2, 2).0, [0, 0, 0, 0]);
    }

    #[test]
    fn draw_layer_without_shadow_is_plain_composite() {
        let src = solid_image(2, 2, [9, 9, 9, 255]);

        let mut with_draw = RgbaImage::new(6, 6);
        draw_layer(&mut with_draw, &src, (2, 2), None);

        let mut with_composite = RgbaImage::new(6, 6);
        composite_over(&mut with_composite, &src, 2, 2);

        assert_eq!(with_draw.as_raw(), with_composite.as_raw());
    }

    #[test]
    fn draw_layer_with_shadow_darkens_below_source() {
        let src = solid_image(4, 4, [200, 200, 200, 255]);
        let params = ShadowParams {
            blur: 2.0,
            offset_x: 0,
            offset_y: 4,
            color: [0, 0, 0, 128],
        };

        let mut canvas = RgbaImage::new(20, 20);
        draw_layer(&mut canvas, &src, (8, 4), Some(&params));

        // Source pixels unchanged on top.
        assert_eq!(canvas.get_pixel(9, 5).0, [200, 200, 200, 255]);
        // Shadow alpha present below the source footprint.
        let below = canvas.get_pixel(9, 10).0;
        assert!(below[3] > 0);
        assert_eq!([below[0], below[1], below[2]], [0, 0, 0]);
    }
}

//! Sticker generation pipeline.
//!
//! The entry point is [`generate_sticker`]: plan the canvas, dilate the
//! silhouette, fill it with the outline color, then draw the original
//! cutout on top with the shadow parameters active only for that final
//! draw. Synchronous and pure given its inputs: identical `(cutout,
//! settings)` produce byte-identical output.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::canvas::CanvasPlan;
use crate::error::StickerError;
use crate::layer::dilate::dilate_silhouette;
use crate::layer::outline::fill_outline;
use crate::layer::{composite_over, draw_layer};
use crate::session::GenerationToken;
use crate::settings::StickerSettings;

/// Result of a cancellable generation run.
pub(crate) enum Outcome {
    /// The finished composite.
    Done(RgbaImage),
    /// The run observed a newer request at a yield point and stopped;
    /// not an error, and nothing is published.
    Superseded,
}

/// Runs the pipeline with cooperative cancellation checks at the defined
/// yield points: start, after dilation, before the final draw.
pub(crate) fn run(
    cutout: &RgbaImage,
    settings: &StickerSettings,
    token: &GenerationToken,
) -> Result<Outcome, StickerError> {
    if token.is_superseded() {
        return Ok(Outcome::Superseded);
    }

    let plan = CanvasPlan::compute(cutout.width(), cutout.height(), settings)?;
    debug!(
        width = plan.width,
        height = plan.height,
        seq = token.seq(),
        "planned sticker canvas"
    );

    let mut canvas = RgbaImage::new(plan.width, plan.height);

    if settings.outline.width > 0.0 {
        let mask = dilate_silhouette(cutout, &plan, &settings.outline);
        if token.is_superseded() {
            debug!(seq = token.seq(), "generation superseded after dilation");
            return Ok(Outcome::Superseded);
        }
        let outline = fill_outline(&mask, settings.outline.color);
        composite_over(&mut canvas, &outline, 0, 0);
    }

    if token.is_superseded() {
        debug!(seq = token.seq(), "generation superseded before final draw");
        return Ok(Outcome::Superseded);
    }

    let shadow = settings.shadow.params();
    draw_layer(
        &mut canvas,
        cutout,
        (plan.origin_x, plan.origin_y),
        shadow.as_ref(),
    );

    Ok(Outcome::Done(canvas))
}

/// Generates the flattened sticker raster for a cutout and settings.
///
/// # Errors
///
/// Returns [`StickerError::SurfaceUnavailable`] when the planned canvas
/// cannot be created.
pub fn generate_sticker(
    cutout: &RgbaImage,
    settings: &StickerSettings,
) -> Result<RgbaImage, StickerError> {
    match run(cutout, settings, &GenerationToken::detached())? {
        Outcome::Done(image) => Ok(image),
        Outcome::Superseded => unreachable!("detached tokens are never superseded"),
    }
}

/// Generates the sticker and encodes it to PNG bytes (alpha preserved).
///
/// # Errors
///
/// [`StickerError::SurfaceUnavailable`] for geometry failures,
/// [`StickerError::EncodeFailed`] when the final buffer cannot be
/// serialized.
pub fn generate_sticker_png(
    cutout: &RgbaImage,
    settings: &StickerSettings,
) -> Result<Vec<u8>, StickerError> {
    encode_png(&generate_sticker(cutout, settings)?)
}

/// Encodes a raster to PNG bytes with the alpha channel preserved.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, StickerError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(StickerError::EncodeFailed)?;
    Ok(bytes)
}

/// Decodes cutout bytes (PNG, JPEG, BMP, WebP) into an RGBA raster.
///
/// # Errors
///
/// Returns [`StickerError::ImageLoadFailed`] when the bytes cannot be
/// decoded. Degenerate sources are rejected here, not in the geometry
/// stages.
pub fn decode_cutout(bytes: &[u8]) -> Result<RgbaImage, StickerError> {
    Ok(image::load_from_memory(bytes)
        .map_err(StickerError::ImageLoadFailed)?
        .to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{OutlineSpec, OutlineStyle, ShadowStyle};
    use image::Rgba;
    use palette::Srgb;

    fn opaque_square() -> RgbaImage {
        RgbaImage::from_pixel(100, 100, Rgba([40, 80, 120, 255]))
    }

    fn white_solid(width: f32) -> StickerSettings {
        StickerSettings::new(
            OutlineSpec::new(width, Srgb::new(255, 255, 255), OutlineStyle::Solid),
            ShadowStyle::None,
        )
    }

    #[test]
    fn solid_scenario_white_ring_no_shadow_margin() {
        let output = generate_sticker(&opaque_square(), &white_solid(8.0)).unwrap();

        // pad = max(8 + 0 + 4, 4) = 12 -> 124x124.
        assert_eq!((output.width(), output.height()), (124, 124));

        // Source composited opaque in the center.
        assert_eq!(output.get_pixel(62, 62).0, [40, 80, 120, 255]);
        // White ring just outside the source footprint (origin 12).
        assert_eq!(output.get_pixel(8, 62).0, [255, 255, 255, 255]);
        assert_eq!(output.get_pixel(62, 8).0, [255, 255, 255, 255]);
        // Transparent beyond the ring.
        assert_eq!(output.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn wobbly_scenario_canvas_size() {
        let settings = white_solid(8.0).with_outline(OutlineSpec::new(
            8.0,
            Srgb::new(255, 255, 255),
            OutlineStyle::Wobbly,
        ));
        let output = generate_sticker(&opaque_square(), &settings).unwrap();
        assert_eq!((output.width(), output.height()), (198, 198));
    }

    #[test]
    fn zero_width_equals_shadowed_source_alone() {
        let cutout = opaque_square();
        // Wave settings must be irrelevant at width 0.
        let settings = StickerSettings::new(
            OutlineSpec::new(0.0, Srgb::new(255, 0, 0), OutlineStyle::Chaotic),
            ShadowStyle::Soft,
        );

        let output = generate_sticker(&cutout, &settings).unwrap();

        let plan = CanvasPlan::compute(cutout.width(), cutout.height(), &settings).unwrap();
        let mut expected = RgbaImage::new(plan.width, plan.height);
        draw_layer(
            &mut expected,
            &cutout,
            (plan.origin_x, plan.origin_y),
            settings.shadow.params().as_ref(),
        );

        assert_eq!(output.as_raw(), expected.as_raw());
    }

    #[test]
    fn generation_is_byte_identical() {
        let cutout = opaque_square();
        let settings = StickerSettings::new(
            OutlineSpec::new(6.0, Srgb::new(0, 200, 100), OutlineStyle::Wavy),
            ShadowStyle::Hard,
        );

        let a = generate_sticker_png(&cutout, &settings).unwrap();
        let b = generate_sticker_png(&cutout, &settings).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn float_shadow_margin_and_darkening() {
        let cutout = opaque_square();
        let none = generate_sticker(&cutout, &white_solid(8.0)).unwrap();
        let float =
            generate_sticker(&cutout, &white_solid(8.0).with_shadow(ShadowStyle::Float)).unwrap();

        assert_eq!(float.width(), none.width() + 30);
        assert_eq!(float.height(), none.height() + 30);

        // Some shadow coverage exists below the source footprint, outside
        // the outline ring (offset_y 12, blur 28).
        let plan = CanvasPlan::compute(
            cutout.width(),
            cutout.height(),
            &white_solid(8.0).with_shadow(ShadowStyle::Float),
        )
        .unwrap();
        let y_below = (plan.origin_y + 100 + 8 + 6) as u32;
        let x_mid = float.width() / 2;
        assert!(float.get_pixel(x_mid, y_below).0[3] > 0);
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let cutout = opaque_square();
        let settings = white_solid(4.0);
        let image = generate_sticker(&cutout, &settings).unwrap();
        let png = encode_png(&image).unwrap();

        let decoded = decode_cutout(&png).unwrap();
        assert_eq!(decoded.as_raw(), image.as_raw());
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let err = decode_cutout(b"definitely not an image").unwrap_err();
        assert!(matches!(err, StickerError::ImageLoadFailed(_)));
    }
}

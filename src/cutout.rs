//! The background-removal seam.
//!
//! Producing the cutout is an external collaborator's job: a black-box
//! operation that, given an arbitrary photo, returns an equal-size raster
//! whose alpha channel isolates the foreground. This module defines only
//! the seam — the trait and its progress contract — never a model.

use image::RgbaImage;

use crate::error::StickerError;
use crate::generator::decode_cutout;

/// Black-box background removal.
///
/// Implementations receive the encoded photo bytes and a progress sink.
/// Progress updates must be monotonically non-decreasing percentages in
/// `0..=100`; the returned raster must match the photo's dimensions, with
/// alpha marking the foreground.
pub trait BackgroundRemover {
    /// Removes the background from `photo`, reporting progress along the
    /// way.
    ///
    /// # Errors
    ///
    /// Returns [`StickerError::ImageLoadFailed`] when the photo bytes
    /// cannot be decoded.
    fn remove_background(
        &self,
        photo: &[u8],
        progress: &mut dyn FnMut(u8),
    ) -> Result<RgbaImage, StickerError>;
}

/// Trivial remover for inputs that already carry a foreground alpha
/// channel (e.g. pre-cut PNGs): decodes and returns the image unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRemover;

impl BackgroundRemover for PassthroughRemover {
    fn remove_background(
        &self,
        photo: &[u8],
        progress: &mut dyn FnMut(u8),
    ) -> Result<RgbaImage, StickerError> {
        progress(0);
        let image = decode_cutout(photo)?;
        progress(100);
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::encode_png;
    use image::Rgba;

    #[test]
    fn passthrough_keeps_pixels_and_reports_monotone_progress() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 200]));
        let png = encode_png(&image).unwrap();

        let mut reports = Vec::new();
        let out = PassthroughRemover
            .remove_background(&png, &mut |p| reports.push(p))
            .unwrap();

        assert_eq!(out.as_raw(), image.as_raw());
        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(reports.last(), Some(&100));
    }

    #[test]
    fn passthrough_rejects_undecodable_photos() {
        let err = PassthroughRemover
            .remove_background(b"not an image", &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, StickerError::ImageLoadFailed(_)));
    }
}

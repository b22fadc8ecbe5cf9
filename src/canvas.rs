//! Output canvas sizing.
//!
//! A [`CanvasPlan`] is derived once per generation from the source size and
//! the settings. It is never stored across generations.

use crate::error::StickerError;
use crate::settings::{OutlineSpec, ShadowStyle, StickerSettings};

/// Largest canvas dimension a generation will attempt, standing in for the
/// host drawing-surface limit. Exceeding it yields
/// [`StickerError::SurfaceUnavailable`].
pub const MAX_CANVAS_DIM: u32 = 16_384;

/// Fixed margin reserved when any shadow is active, sized to the largest
/// shadow blur radius (28) plus offset.
pub const SHADOW_PAD: u32 = 30;

/// Margin guarding against rounding clipping the stamped mask edge, and the
/// floor of the padding when the outline width is zero.
const EDGE_GUARD: f64 = 4.0;

/// Derived output-buffer geometry for one generation.
///
/// # Rounding rule
///
/// Padding is fractional; each output dimension is
/// `ceil(src + 2 * pad) + shadow_pad`, computed in `f64` with a single
/// ceiling. The source origin is `floor((canvas - src) / 2)` per axis, so
/// the source sits centered to within half a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasPlan {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// X of the source's top-left corner on the canvas.
    pub origin_x: i64,
    /// Y of the source's top-left corner on the canvas.
    pub origin_y: i64,
}

impl CanvasPlan {
    /// Computes the canvas geometry for a source of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`StickerError::SurfaceUnavailable`] when a planned
    /// dimension is zero or exceeds [`MAX_CANVAS_DIM`].
    pub fn compute(
        src_width: u32,
        src_height: u32,
        settings: &StickerSettings,
    ) -> Result<Self, StickerError> {
        let pad = outline_padding(&settings.outline);
        let shadow_pad = if settings.shadow == ShadowStyle::None {
            0
        } else {
            SHADOW_PAD
        };

        let width = planned_dim(src_width, pad, shadow_pad);
        let height = planned_dim(src_height, pad, shadow_pad);

        if width == 0 || height == 0 || width > MAX_CANVAS_DIM as u64 || height > MAX_CANVAS_DIM as u64
        {
            return Err(StickerError::SurfaceUnavailable { width, height });
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
            origin_x: (width as i64 - src_width as i64) / 2,
            origin_y: (height as i64 - src_height as i64) / 2,
        })
    }
}

/// Padding required around the source for the outline, in pixels.
///
/// `width + wobble_extra + 4`, floored at 4. The wobble extra is the worst
/// case radial perturbation: `width * master_amp * (a1 + a2 + a3)`, zero
/// for solid outlines. Monotonic in the width, every wave amplitude, and
/// the master amplitude.
pub fn outline_padding(outline: &OutlineSpec) -> f64 {
    let wobble_extra = if outline.style.is_wavy() {
        outline.width as f64 * outline.master_amp as f64 * outline.amplitude_sum() as f64
    } else {
        0.0
    };
    (outline.width as f64 + wobble_extra + EDGE_GUARD).max(EDGE_GUARD)
}

fn planned_dim(src: u32, pad: f64, shadow_pad: u32) -> u64 {
    (src as f64 + 2.0 * pad).ceil() as u64 + shadow_pad as u64
}

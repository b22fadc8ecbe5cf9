//! Silhouette dilation.
//!
//! Builds an alpha-only mask of the cutout's silhouette enlarged by a
//! radius profile: constant for solid outlines, angle-varying for wave
//! outlines. Conceptually the mask is the union of many translated copies
//! of the source alpha ("stamps"), one per (ring, angle) pair. Union under
//! max is order-independent, so the mask is evaluated per output pixel as
//! the maximum source alpha over all stamp offsets, parallelized by row.
//! The radius profile below is the contract; the stamping strategy is not.

use image::{GrayImage, RgbaImage};
use rayon::prelude::*;

use crate::canvas::CanvasPlan;
use crate::layer::wave::WaveField;
use crate::settings::OutlineSpec;

/// Number of discrete stamp angles per ring (5° steps). A trade-off
/// between silhouette smoothness and stamp count.
pub const ANGLE_STEPS: u32 = 72;

/// Radial distance between consecutive rings, in pixels.
pub const RING_STEP: f32 = 2.0;

/// Floor on the wave radius factor. Prevents the radius from collapsing to
/// zero or inverting sign under large negative wobble, which would fold a
/// stamp back through the origin and corrupt the silhouette.
pub const RADIUS_FLOOR: f32 = 0.05;

/// Wave-style stamp radius for one ring at one angle.
///
/// `base_ring * max(0.05, 1 + wobble(angle) * s)` where the ring scale
/// `s = base_ring / outline_width` tapers the wobble linearly toward zero
/// as rings approach the core, keeping the innermost stamps close to
/// circular.
pub fn ring_radius(base_ring: f32, outline_width: f32, wave: &WaveField, angle: f32) -> f32 {
    let scale = base_ring / outline_width;
    base_ring * (1.0 + wave.wobble(angle) * scale).max(RADIUS_FLOOR)
}

/// Integer stamp offsets for the full ring/angle grid of an outline spec.
///
/// Rings step from the outline width down toward zero in steps of
/// [`RING_STEP`]; each ring contributes [`ANGLE_STEPS`] stamps at
/// `(cos(angle) * r, sin(angle) * r)`, rounded to the nearest pixel.
/// Duplicates are collapsed since the union makes them redundant.
pub fn stamp_offsets(outline: &OutlineSpec) -> Vec<(i64, i64)> {
    let mut offsets = Vec::new();
    if outline.width <= 0.0 {
        return offsets;
    }

    let wave = WaveField::from_outline(outline);
    let wavy = outline.style.is_wavy();

    let mut ring = outline.width;
    while ring > 0.0 {
        for step in 0..ANGLE_STEPS {
            let angle = step as f32 * std::f32::consts::TAU / ANGLE_STEPS as f32;
            let radius = if wavy {
                ring_radius(ring, outline.width, &wave, angle)
            } else {
                ring
            };
            offsets.push((
                (angle.cos() * radius).round() as i64,
                (angle.sin() * radius).round() as i64,
            ));
        }
        ring -= RING_STEP;
    }

    offsets.sort_unstable();
    offsets.dedup();
    offsets
}

/// Dilates the source silhouette onto a canvas-sized alpha mask.
///
/// The source sits at the plan's origin; every stamp offset translates it.
/// Each output pixel holds the maximum source alpha reachable through any
/// offset, i.e. the union of all stamps.
pub fn dilate_silhouette(source: &RgbaImage, plan: &CanvasPlan, outline: &OutlineSpec) -> GrayImage {
    let offsets = stamp_offsets(outline);
    let width = plan.width as usize;
    let (src_w, src_h) = (source.width() as i64, source.height() as i64);
    let src_raw = source.as_raw();

    let mut mask = GrayImage::new(plan.width, plan.height);
    let mask_raw: &mut [u8] = &mut mask;

    mask_raw
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i64;
            for (x, out) in row.iter_mut().enumerate() {
                let x = x as i64;
                let mut best = 0u8;
                for &(ox, oy) in &offsets {
                    let sx = x - plan.origin_x - ox;
                    let sy = y - plan.origin_y - oy;
                    if sx < 0 || sy < 0 || sx >= src_w || sy >= src_h {
                        continue;
                    }
                    let alpha = src_raw[((sy * src_w + sx) as usize) * 4 + 3];
                    if alpha > best {
                        best = alpha;
                        if best == u8::MAX {
                            break;
                        }
                    }
                }
                *out = best;
            }
        });

    mask
}

//! Drop-shadow layer construction.
//!
//! The shadow is the blur of the drawn image's alpha coverage, shifted by
//! the style's offset and colorized. Blur is a separable Gaussian over an
//! f32 alpha plane with edge-clamped sampling, two passes, parallel by row.

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::layer::ShadowParams;

/// Normalized 1D Gaussian kernel covering ±2σ.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    let half = (2.0 * sigma).ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| (-(i * i) as f32 / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Separable Gaussian blur of an alpha plane (`width * height` samples in
/// `[0, 1]`). Sampling clamps at the edges. `sigma <= 0` returns the plane
/// unchanged.
pub fn blur_alpha(plane: &[f32], width: usize, height: usize, sigma: f32) -> Vec<f32> {
    debug_assert_eq!(plane.len(), width * height);
    if sigma <= 0.0 {
        return plane.to_vec();
    }

    let kernel = gaussian_kernel_1d(sigma);
    let half = (kernel.len() / 2) as isize;

    // Horizontal pass.
    let mut temp = vec![0.0f32; plane.len()];
    temp.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let src = &plane[y * width..(y + 1) * width];
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = 0.0f32;
            for (k, &kv) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - half).clamp(0, width as isize - 1) as usize;
                sum += src[sx] * kv;
            }
            *out = sum;
        }
    });

    // Vertical pass.
    let mut result = vec![0.0f32; plane.len()];
    result
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut sum = 0.0f32;
                for (k, &kv) in kernel.iter().enumerate() {
                    let sy = (y as isize + k as isize - half).clamp(0, height as isize - 1) as usize;
                    sum += temp[sy * width + x] * kv;
                }
                *out = sum;
            }
        });

    result
}

/// Builds the canvas-sized shadow layer for one draw of `image` at
/// `offset`.
///
/// The image's alpha is placed on an empty plane at the draw position,
/// blurred with `sigma = blur / 2` (host-canvas `shadowBlur` convention),
/// shifted by the style offset, and colorized with the style color; the
/// style color's alpha scales the blurred coverage.
pub fn shadow_layer(
    image: &RgbaImage,
    canvas_width: u32,
    canvas_height: u32,
    offset: (i64, i64),
    params: &ShadowParams,
) -> RgbaImage {
    let (w, h) = (canvas_width as usize, canvas_height as usize);
    let mut plane = vec![0.0f32; w * h];

    for (sx, sy, px) in image.enumerate_pixels() {
        let cx = sx as i64 + offset.0;
        let cy = sy as i64 + offset.1;
        if cx < 0 || cy < 0 || cx >= canvas_width as i64 || cy >= canvas_height as i64 {
            continue;
        }
        plane[cy as usize * w + cx as usize] = px.0[3] as f32 / 255.0;
    }

    let blurred = blur_alpha(&plane, w, h, params.blur / 2.0);

    let [r, g, b, a] = params.color;
    let opacity = a as f32 / 255.0;
    let mut layer = RgbaImage::new(canvas_width, canvas_height);

    for (x, y, out) in layer.enumerate_pixels_mut() {
        let sx = x as i64 - params.offset_x as i64;
        let sy = y as i64 - params.offset_y as i64;
        if sx < 0 || sy < 0 || sx >= canvas_width as i64 || sy >= canvas_height as i64 {
            continue;
        }
        let coverage = blurred[sy as usize * w + sx as usize];
        let alpha = (coverage * opacity * 255.0).round().clamp(0.0, 255.0) as u8;
        if alpha > 0 {
            *out = Rgba([r, g, b, alpha]);
        }
    }

    layer
}

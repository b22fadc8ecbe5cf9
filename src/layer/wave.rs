//! Angular radius perturbation for wavy outlines.

use crate::settings::OutlineSpec;

/// Phase offset on the third term, decorrelating it from the first two so
/// the three terms never align at angle 0.
pub const THIRD_TERM_PHASE: f32 = 1.5;

/// Pure function mapping an angle to a signed radial perturbation, built
/// from up to three additive sinusoidal terms.
///
/// Identical inputs always yield identical output, which is what makes
/// regeneration deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveField {
    f1: f32,
    a1: f32,
    f2: f32,
    a2: f32,
    f3: f32,
    a3: f32,
    master_amp: f32,
}

impl WaveField {
    /// Builds the wave field from an outline spec's three terms and master
    /// amplitude.
    pub fn from_outline(outline: &OutlineSpec) -> Self {
        Self {
            f1: outline.wave1.freq,
            a1: outline.wave1.amp,
            f2: outline.wave2.freq,
            a2: outline.wave2.amp,
            f3: outline.wave3.freq,
            a3: outline.wave3.amp,
            master_amp: outline.master_amp,
        }
    }

    /// Signed radial perturbation at `angle` (radians, `[0, 2π)`), as a
    /// fraction of the outline width.
    pub fn wobble(&self, angle: f32) -> f32 {
        ((angle * self.f1).sin() * self.a1
            + (angle * self.f2).cos() * self.a2
            + (angle * self.f3 + THIRD_TERM_PHASE).sin() * self.a3)
            * self.master_amp
    }
}

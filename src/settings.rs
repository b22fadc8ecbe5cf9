//! Serializable sticker settings for cross-process communication.
//!
//! A [`StickerSettings`] value captures everything one generation needs
//! beyond the cutout itself: the outline geometry and color, the wave
//! perturbation terms, and the drop-shadow style. Settings serialize to
//! JSON so a frontend can hand them to the rendering backend.
//!
//! # Example
//!
//! ```
//! use sticker_renderer::{OutlineSpec, OutlineStyle, ShadowStyle, StickerSettings};
//!
//! let settings = StickerSettings::new(
//!     OutlineSpec::new(8.0, "#ffffff".parse().unwrap(), OutlineStyle::Wobbly),
//!     ShadowStyle::Soft,
//! );
//!
//! // Serialize for sending to the backend
//! let json = settings.to_json().unwrap();
//!
//! // Deserialize on the other side
//! let restored = StickerSettings::from_json(&json).unwrap();
//! assert_eq!(settings, restored);
//! ```

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::layer::ShadowParams;

// ============================================================================
// Wave Parameters
// ============================================================================

/// One sinusoidal term of the outline wave perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct WaveParams {
    /// Angular frequency in cycles per full turn (positive).
    pub freq: f32,

    /// Amplitude as a fraction of the outline width (non-negative).
    pub amp: f32,
}

impl WaveParams {
    /// Creates a wave term with the given frequency and amplitude.
    pub const fn new(freq: f32, amp: f32) -> Self {
        Self { freq, amp }
    }
}

impl Default for WaveParams {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

// ============================================================================
// Outline Style
// ============================================================================

/// The outline silhouette style.
///
/// Every style except [`Solid`](OutlineStyle::Solid) perturbs the dilation
/// radius with three additive sinusoidal terms. Selecting a style loads its
/// preset wave parameters once (see [`OutlineSpec::with_style`]); each term
/// remains individually editable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum OutlineStyle {
    /// Constant dilation radius; wave terms are ignored.
    #[default]
    Solid,
    /// Gentle low-frequency undulation.
    Wobbly,
    /// High-frequency, high-amplitude noise.
    Chaotic,
    /// Long, slow waves.
    Wavy,
}

/// Preset wave parameters loaded when a style is selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StylePreset {
    pub wave1: WaveParams,
    pub wave2: WaveParams,
    pub wave3: WaveParams,
    pub master_amp: f32,
}

impl OutlineStyle {
    /// Returns the preset wave parameters for this style.
    ///
    /// [`Solid`](OutlineStyle::Solid) carries zero amplitudes so that loading
    /// its preset neutralizes any previous wave tuning.
    pub fn preset(self) -> StylePreset {
        match self {
            OutlineStyle::Solid => StylePreset {
                wave1: WaveParams::new(1.0, 0.0),
                wave2: WaveParams::new(1.0, 0.0),
                wave3: WaveParams::new(1.0, 0.0),
                master_amp: 1.0,
            },
            OutlineStyle::Wobbly => StylePreset {
                wave1: WaveParams::new(2.0, 1.2),
                wave2: WaveParams::new(3.5, 0.8),
                wave3: WaveParams::new(7.0, 0.3),
                master_amp: 2.0,
            },
            OutlineStyle::Chaotic => StylePreset {
                wave1: WaveParams::new(4.0, 1.5),
                wave2: WaveParams::new(9.0, 1.2),
                wave3: WaveParams::new(17.0, 0.8),
                master_amp: 3.0,
            },
            OutlineStyle::Wavy => StylePreset {
                wave1: WaveParams::new(1.5, 1.8),
                wave2: WaveParams::new(2.5, 0.6),
                wave3: WaveParams::new(5.0, 0.2),
                master_amp: 1.5,
            },
        }
    }

    /// Returns true if the dilation radius varies with angle.
    pub fn is_wavy(self) -> bool {
        !matches!(self, OutlineStyle::Solid)
    }
}

// ============================================================================
// Outline Spec
// ============================================================================

/// Outline geometry and color for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct OutlineSpec {
    /// Outline width in pixels (non-negative). Zero disables the outline.
    pub width: f32,

    /// Flat fill color of the outline, serialized as a `#rrggbb` hex string.
    #[serde(with = "hex_color")]
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub color: Srgb<u8>,

    /// The silhouette style.
    pub style: OutlineStyle,

    /// First wave term.
    pub wave1: WaveParams,

    /// Second wave term.
    pub wave2: WaveParams,

    /// Third wave term (phase-offset against the first two).
    pub wave3: WaveParams,

    /// Overall scale applied to the summed wave terms (non-negative).
    pub master_amp: f32,
}

impl OutlineSpec {
    /// Creates an outline spec with the style's preset wave parameters.
    pub fn new(width: f32, color: Srgb<u8>, style: OutlineStyle) -> Self {
        let preset = style.preset();
        Self {
            width: width.max(0.0),
            color,
            style,
            wave1: preset.wave1,
            wave2: preset.wave2,
            wave3: preset.wave3,
            master_amp: preset.master_amp,
        }
    }

    /// Switches to a style, resetting the wave terms to its preset.
    ///
    /// This is a one-shot default loader, not a locked mode: the terms can
    /// be tuned individually afterwards via the `with_wave*` builders.
    pub fn with_style(self, style: OutlineStyle) -> Self {
        let preset = style.preset();
        Self {
            style,
            wave1: preset.wave1,
            wave2: preset.wave2,
            wave3: preset.wave3,
            master_amp: preset.master_amp,
            ..self
        }
    }

    /// Sets the outline width (clamped to non-negative).
    pub fn with_width(self, width: f32) -> Self {
        Self {
            width: width.max(0.0),
            ..self
        }
    }

    /// Sets the outline color.
    pub fn with_color(self, color: Srgb<u8>) -> Self {
        Self { color, ..self }
    }

    /// Overrides the first wave term.
    pub fn with_wave1(self, wave1: WaveParams) -> Self {
        Self { wave1, ..self }
    }

    /// Overrides the second wave term.
    pub fn with_wave2(self, wave2: WaveParams) -> Self {
        Self { wave2, ..self }
    }

    /// Overrides the third wave term.
    pub fn with_wave3(self, wave3: WaveParams) -> Self {
        Self { wave3, ..self }
    }

    /// Overrides the master amplitude (clamped to non-negative).
    pub fn with_master_amp(self, master_amp: f32) -> Self {
        Self {
            master_amp: master_amp.max(0.0),
            ..self
        }
    }

    /// Sum of the three wave amplitudes.
    pub fn amplitude_sum(&self) -> f32 {
        self.wave1.amp + self.wave2.amp + self.wave3.amp
    }
}

impl Default for OutlineSpec {
    fn default() -> Self {
        Self::new(8.0, Srgb::new(255, 255, 255), OutlineStyle::Solid)
    }
}

// ============================================================================
// Shadow Style
// ============================================================================

/// Drop-shadow style. Each style maps to a fixed parameter tuple; there are
/// no free shadow parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ShadowStyle {
    /// No shadow layer.
    #[default]
    None,
    /// Wide, faint shadow directly below.
    Soft,
    /// Tight, dark shadow offset down-right.
    Hard,
    /// Very wide, very faint shadow far below (floating look).
    Float,
}

impl ShadowStyle {
    /// Returns the fixed shadow parameters for this style, or `None` when
    /// no shadow layer is drawn.
    ///
    /// Opacities quantize to u8 alpha as `round(a * 255)`:
    /// 0.20 -> 51, 0.35 -> 89, 0.18 -> 46.
    pub fn params(self) -> Option<ShadowParams> {
        match self {
            ShadowStyle::None => None,
            ShadowStyle::Soft => Some(ShadowParams {
                blur: 16.0,
                offset_x: 0,
                offset_y: 4,
                color: [0, 0, 0, 51],
            }),
            ShadowStyle::Hard => Some(ShadowParams {
                blur: 2.0,
                offset_x: 3,
                offset_y: 5,
                color: [0, 0, 0, 89],
            }),
            ShadowStyle::Float => Some(ShadowParams {
                blur: 28.0,
                offset_x: 0,
                offset_y: 12,
                color: [0, 0, 0, 46],
            }),
        }
    }
}

// ============================================================================
// Sticker Settings
// ============================================================================

/// Complete settings for one sticker generation.
///
/// Immutable per generation: a changed value is a new, independent
/// generation request. See [`StickerSession`](crate::StickerSession) for the
/// debounced regeneration flow.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct StickerSettings {
    /// Outline geometry, style, and color.
    pub outline: OutlineSpec,

    /// Drop-shadow style.
    pub shadow: ShadowStyle,
}

impl StickerSettings {
    /// Creates settings from an outline spec and shadow style.
    pub fn new(outline: OutlineSpec, shadow: ShadowStyle) -> Self {
        Self { outline, shadow }
    }

    /// Replaces the outline spec.
    pub fn with_outline(self, outline: OutlineSpec) -> Self {
        Self { outline, ..self }
    }

    /// Replaces the shadow style.
    pub fn with_shadow(self, shadow: ShadowStyle) -> Self {
        Self { shadow, ..self }
    }

    /// Serializes to a compact JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Hex Color Serialization
// ============================================================================

/// Formats a color as a `#rrggbb` hex string.
pub fn format_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

mod hex_color {
    use palette::Srgb;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Srgb<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Srgb<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<Srgb<u8>>()
            .map_err(|e| D::Error::custom(format!("invalid hex color {s:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wobbly_preset_matches_table() {
        let p = OutlineStyle::Wobbly.preset();
        assert_eq!(p.wave1, WaveParams::new(2.0, 1.2));
        assert_eq!(p.wave2, WaveParams::new(3.5, 0.8));
        assert_eq!(p.wave3, WaveParams::new(7.0, 0.3));
        assert_eq!(p.master_amp, 2.0);
    }

    #[test]
    fn chaotic_preset_matches_table() {
        let p = OutlineStyle::Chaotic.preset();
        assert_eq!(p.wave1, WaveParams::new(4.0, 1.5));
        assert_eq!(p.wave2, WaveParams::new(9.0, 1.2));
        assert_eq!(p.wave3, WaveParams::new(17.0, 0.8));
        assert_eq!(p.master_amp, 3.0);
    }

    #[test]
    fn wavy_preset_matches_table() {
        let p = OutlineStyle::Wavy.preset();
        assert_eq!(p.wave1, WaveParams::new(1.5, 1.8));
        assert_eq!(p.wave2, WaveParams::new(2.5, 0.6));
        assert_eq!(p.wave3, WaveParams::new(5.0, 0.2));
        assert_eq!(p.master_amp, 1.5);
    }

    #[test]
    fn style_switch_loads_preset_once() {
        let spec = OutlineSpec::default()
            .with_style(OutlineStyle::Wobbly)
            .with_wave1(WaveParams::new(10.0, 0.5));

        // The manual tune survives; the other terms keep the preset.
        assert_eq!(spec.wave1, WaveParams::new(10.0, 0.5));
        assert_eq!(spec.wave2, WaveParams::new(3.5, 0.8));
        assert_eq!(spec.master_amp, 2.0);
    }

    #[test]
    fn shadow_params_match_table() {
        assert_eq!(ShadowStyle::None.params(), None);

        let soft = ShadowStyle::Soft.params().unwrap();
        assert_eq!((soft.blur, soft.offset_x, soft.offset_y), (16.0, 0, 4));
        assert_eq!(soft.color, [0, 0, 0, 51]);

        let hard = ShadowStyle::Hard.params().unwrap();
        assert_eq!((hard.blur, hard.offset_x, hard.offset_y), (2.0, 3, 5));
        assert_eq!(hard.color, [0, 0, 0, 89]);

        let float = ShadowStyle::Float.params().unwrap();
        assert_eq!((float.blur, float.offset_x, float.offset_y), (28.0, 0, 12));
        assert_eq!(float.color, [0, 0, 0, 46]);
    }

    #[test]
    fn settings_json_round_trip() {
        let settings = StickerSettings::new(
            OutlineSpec::new(12.5, Srgb::new(255, 0, 128), OutlineStyle::Chaotic),
            ShadowStyle::Float,
        );

        let json = settings.to_json().unwrap();
        let restored = StickerSettings::from_json(&json).unwrap();
        assert_eq!(settings, restored);

        // Color travels as a hex string.
        assert!(json.contains("\"#ff0080\""));
    }

    #[test]
    fn hex_color_format() {
        assert_eq!(format_hex(Srgb::new(255, 255, 255)), "#ffffff");
        assert_eq!(format_hex(Srgb::new(0, 17, 171)), "#0011ab");
    }

    #[test]
    fn negative_width_is_clamped() {
        let spec = OutlineSpec::default().with_width(-3.0);
        assert_eq!(spec.width, 0.0);
    }

    #[test]
    fn amplitude_sum() {
        let spec = OutlineSpec::default().with_style(OutlineStyle::Wobbly);
        assert!((spec.amplitude_sum() - 2.3).abs() < 1e-6);
    }
}

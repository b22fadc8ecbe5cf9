//! sticker-renderer: Sticker effect compositing for foreground cutouts.
//!
//! This crate renders a "sticker" from a cutout image (a raster whose
//! alpha channel isolates the foreground): a colored outline — solid or
//! wave-perturbed — dilated around the silhouette, an optional drop
//! shadow, and the original image composited on top, flattened to a single
//! RGBA raster or PNG byte stream.
//!
//! # Example
//!
//! ```no_run
//! use sticker_renderer::{
//!     generate_sticker_png, OutlineSpec, OutlineStyle, ShadowStyle, StickerSettings,
//! };
//!
//! # fn run(cutout: image::RgbaImage) -> Result<(), sticker_renderer::StickerError> {
//! let settings = StickerSettings::new(
//!     OutlineSpec::new(8.0, "#ffffff".parse().unwrap(), OutlineStyle::Wobbly),
//!     ShadowStyle::Soft,
//! );
//!
//! let png = generate_sticker_png(&cutout, &settings)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Debounced regeneration
//!
//! Interactive callers that regenerate on every settings tweak should use
//! [`StickerSession`]: submissions within a 100 ms window coalesce, a
//! generation superseded mid-flight stops at its next yield point without
//! publishing, and only one output stays live at a time.
//!
//! ```no_run
//! use sticker_renderer::{StickerSession, StickerSettings};
//!
//! # fn run(cutout: image::RgbaImage) {
//! let session = StickerSession::new(cutout);
//! let seq = session.submit(StickerSettings::default());
//! if let Some(output) = session.wait_for(seq, std::time::Duration::from_secs(5)) {
//!     // output.png is ready for download or the clipboard.
//! }
//! # }
//! ```

mod canvas;
mod cutout;
mod error;
mod generator;
mod layer;
mod session;
mod settings;

pub use canvas::{outline_padding, CanvasPlan, MAX_CANVAS_DIM, SHADOW_PAD};
pub use cutout::{BackgroundRemover, PassthroughRemover};
pub use error::StickerError;
pub use generator::{decode_cutout, encode_png, generate_sticker, generate_sticker_png};
pub use layer::dilate::{dilate_silhouette, ring_radius, stamp_offsets, ANGLE_STEPS, RADIUS_FLOOR, RING_STEP};
pub use layer::outline::fill_outline;
pub use layer::shadow::{blur_alpha, gaussian_kernel_1d, shadow_layer};
pub use layer::wave::{WaveField, THIRD_TERM_PHASE};
pub use layer::{composite_over, draw_layer, ShadowParams};
pub use session::{GenerationToken, StickerOutput, StickerSession, DEBOUNCE_MS};
pub use settings::{
    format_hex, OutlineSpec, OutlineStyle, ShadowStyle, StickerSettings, StylePreset, WaveParams,
};

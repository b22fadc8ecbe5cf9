//! Error types for sticker generation.

use thiserror::Error;

/// Failure modes of a sticker generation.
///
/// None of these are retried internally; the caller decides whether to
/// retry with the same or different settings. A superseded generation is
/// not an error — it terminates silently (see
/// [`StickerSession`](crate::StickerSession)).
#[derive(Debug, Error)]
pub enum StickerError {
    /// The source image bytes could not be decoded. Fatal for the
    /// generation; no partial output is produced.
    #[error("failed to decode source image: {0}")]
    ImageLoadFailed(#[source] image::ImageError),

    /// The output canvas cannot be created at the planned size.
    /// Environment-level; not retryable by adjusting settings alone.
    #[error("cannot create a {width}x{height} drawing surface")]
    SurfaceUnavailable {
        /// Planned canvas width in pixels.
        width: u64,
        /// Planned canvas height in pixels.
        height: u64,
    },

    /// The final buffer could not be serialized to PNG.
    #[error("failed to encode sticker output: {0}")]
    EncodeFailed(#[source] image::ImageError),
}

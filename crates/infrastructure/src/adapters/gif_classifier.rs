//! GIF classifier - Implements ContentClassifierPort from the file bytes
//!
//! Two independent checks, neither of which looks at a declared content type:
//!
//! - the byte signature must be recognized as `image/gif` by `infer`
//! - `image`'s GIF decoder must fully decode at least two frames
//!
//! Any decoder failure before the second frame is complete means the file is
//! treated as not animated.

use std::io::Cursor;
use std::path::Path;

use application::error::ApplicationError;
use application::ports::ContentClassifierPort;
use async_trait::async_trait;
use domain::ClassificationVerdict;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder, Limits};
use thiserror::Error;
use tracing::{debug, instrument, warn};

const GIF_MIME: &str = "image/gif";

/// Upper bound on memory the decoder may allocate for one file
const MAX_DECODE_BYTES: u64 = 64 * 1024 * 1024;

/// Largest accepted canvas side in pixels
const MAX_DIMENSION: u32 = 8192;

/// Errors from decoding a GIF stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GifError {
    /// The stream does not start with a GIF header
    #[error("not a GIF stream")]
    NotGif,

    /// The decoder rejected the stream
    #[error("GIF decoding failed: {0}")]
    Decode(String),
}

impl From<image::ImageError> for GifError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Whether the byte signature identifies a GIF image
pub fn sniff_is_gif(bytes: &[u8]) -> bool {
    infer::get(bytes).is_some_and(|kind| kind.mime_type() == GIF_MIME)
}

/// Count the frames of a GIF stream, decoding every one of them
///
/// # Examples
///
/// ```
/// use infrastructure::adapters::gif_classifier::{GifError, count_frames};
///
/// assert_eq!(count_frames(b"not a gif"), Err(GifError::NotGif));
/// ```
pub fn count_frames(bytes: &[u8]) -> Result<usize, GifError> {
    decode_frames(bytes, usize::MAX)
}

/// Whether a GIF stream has two fully decodable frames
pub fn is_animated(bytes: &[u8]) -> bool {
    matches!(decode_frames(bytes, 2), Ok(2))
}

/// Classify raw bytes
///
/// `frame_count` stops at 2; use [`count_frames`] for the total.
pub fn classify_bytes(bytes: &[u8]) -> ClassificationVerdict {
    if !sniff_is_gif(bytes) {
        return ClassificationVerdict::not_gif();
    }

    match decode_frames(bytes, 2) {
        Ok(frames) => ClassificationVerdict::gif(frames),
        Err(e) => {
            warn!(error = %e, "Malformed GIF, treating as not animated");
            ClassificationVerdict::gif(0)
        },
    }
}

/// Decode up to `limit` frames, failing on the first broken one
fn decode_frames(bytes: &[u8], limit: usize) -> Result<usize, GifError> {
    if !(bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a")) {
        return Err(GifError::NotGif);
    }

    let mut decoder = GifDecoder::new(Cursor::new(bytes))?;
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DIMENSION);
    limits.max_image_height = Some(MAX_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_BYTES);
    decoder.set_limits(limits)?;

    let mut frames = 0;
    for frame in decoder.into_frames().take(limit) {
        frame?;
        frames += 1;
    }
    Ok(frames)
}

/// Classifier reading downloaded files from scratch storage
#[derive(Debug, Default, Clone, Copy)]
pub struct GifClassifier;

impl GifClassifier {
    /// Create a new classifier
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentClassifierPort for GifClassifier {
    #[instrument(skip(self, path), fields(path = %path.display()))]
    async fn classify_file(&self, path: &Path) -> Result<ClassificationVerdict, ApplicationError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApplicationError::Classification(format!("cannot read {}: {e}", path.display()))
        })?;

        let verdict = classify_bytes(&bytes);
        debug!(
            size = bytes.len(),
            is_gif = verdict.is_gif,
            frames = verdict.frame_count,
            "Classified file"
        );
        Ok(verdict)
    }
}

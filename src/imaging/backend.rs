//! Image transformer trait and shared types.
//!
//! The [`ImageTransformer`] trait is the capability the preview cache is
//! given at construction. Two implementations exist:
//!
//! - [`ResizingTransformer`](super::rust_backend::ResizingTransformer):
//!   decode, normalize, best-fit resize, re-encode as JPEG.
//! - [`CopyTransformer`](super::copy_backend::CopyTransformer): copies the
//!   source verbatim. Used when decoding/encoding is unavailable, and as the
//!   fallback when a resize fails.
//!
//! Which one runs is decided once, by [`detect_transformer`](super::detect_transformer),
//! not per call.

use super::params::PreviewParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Image transform unavailable: {0}")]
    Unavailable(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Renders a preview file from a source image.
///
/// Implementations write exactly one file at `params.output` and nothing
/// else; the caller owns where that file lands (a temp path that is renamed
/// into place afterwards).
pub trait ImageTransformer: Sync {
    /// Short name for logs and CLI output.
    fn name(&self) -> &'static str;

    /// Whether output respects the size bounds. False for verbatim copies.
    fn resizes(&self) -> bool;

    /// Produce the preview described by `params`.
    fn transform(&self, params: &PreviewParams) -> Result<(), BackendError>;

    /// Read image dimensions without rendering.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;
}

impl<T: ImageTransformer + ?Sized> ImageTransformer for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resizes(&self) -> bool {
        (**self).resizes()
    }

    fn transform(&self, params: &PreviewParams) -> Result<(), BackendError> {
        (**self).transform(params)
    }

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        (**self).identify(path)
    }
}

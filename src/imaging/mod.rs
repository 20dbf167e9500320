//! Image transformation in pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Resize → JPEG** | Lanczos3 + `JpegEncoder` |
//! | **Fallback** | `std::fs::copy` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a preview render
//! - **Backend**: [`ImageTransformer`] trait
//! - **Transformers**: [`ResizingTransformer`] and [`CopyTransformer`]
//!
//! [`detect_transformer`] picks one of the two at startup; the preview cache
//! receives it and never branches on capability again.

pub mod backend;
mod calculations;
pub mod copy_backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageTransformer};
pub use calculations::fit_within;
pub use copy_backend::CopyTransformer;
pub use params::{PreviewParams, Quality};
pub use rust_backend::ResizingTransformer;

use tracing::{info, warn};

/// Choose the transformer for this process.
///
/// `transform_enabled` is the user's switch (`--no-transform` turns it off).
/// Even when enabled, the resizer is only used if a 1x1 JPEG survives an
/// encode/decode round trip; otherwise previews degrade to verbatim copies.
pub fn detect_transformer(transform_enabled: bool) -> Box<dyn ImageTransformer> {
    if !transform_enabled {
        info!("image transform disabled, previews are verbatim copies");
        return Box::new(CopyTransformer::new());
    }
    if !rust_backend::jpeg_roundtrip_supported() {
        warn!("JPEG codec unavailable, previews are verbatim copies");
        return Box::new(CopyTransformer::new());
    }
    info!(
        inputs = ?rust_backend::supported_input_formats(),
        "resizing previews"
    );
    Box::new(ResizingTransformer::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_resizer() {
        let t = detect_transformer(true);
        assert_eq!(t.name(), "resize");
        assert!(t.resizes());
    }

    #[test]
    fn detect_respects_disable_switch() {
        let t = detect_transformer(false);
        assert_eq!(t.name(), "copy");
        assert!(!t.resizes());
    }
}

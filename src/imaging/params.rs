//! Parameter types for preview rendering.
//!
//! These structs describe *what* to produce, not *how*. They are the interface
//! between the [`preview`](crate::preview) cache (which decides when a preview
//! must be rendered and where it goes) and an
//! [`ImageTransformer`](super::ImageTransformer) (which does the pixel work, or
//! just copies bytes). Keeping them separate lets tests swap in a recording
//! transformer without touching cache logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 82). Clamped on construction.
//! - [`PreviewParams`]: source, output path, bounding box, quality, upscale policy.

use std::path::{Path, PathBuf};

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(82)
    }
}

/// Everything needed to render one preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Bounding box; the result fits inside without cropping.
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
    /// When false, sources smaller than the box keep their size.
    pub allow_upscale: bool,
}

impl PreviewParams {
    /// Same job, written somewhere else. Used to target a temp file.
    pub fn with_output(&self, output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_82() {
        assert_eq!(Quality::default().value(), 82);
    }

    #[test]
    fn with_output_changes_only_output() {
        let params = PreviewParams {
            source: "/a/rock01.jpg".into(),
            output: "/a/rock01.preview.jpg".into(),
            max_width: 900,
            max_height: 600,
            quality: Quality::default(),
            allow_upscale: false,
        };
        let moved = params.with_output(Path::new("/a/.tmp"));
        assert_eq!(moved.output, PathBuf::from("/a/.tmp"));
        assert_eq!(moved.source, params.source);
        assert_eq!(moved.max_width, 900);
    }
}

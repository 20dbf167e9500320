//! Verbatim-copy transformer.
//!
//! The degraded preview path: the "preview" is a byte-for-byte copy of the
//! source. It ignores the size bounds and the quality setting, so the result
//! may be large, but it is always a valid image whenever the source is one.

use super::backend::{BackendError, Dimensions, ImageTransformer};
use super::params::PreviewParams;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct CopyTransformer;

impl CopyTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl ImageTransformer for CopyTransformer {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn resizes(&self) -> bool {
        false
    }

    fn transform(&self, params: &PreviewParams) -> Result<(), BackendError> {
        std::fs::copy(&params.source, &params.output)?;
        Ok(())
    }

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        Err(BackendError::Unavailable(format!(
            "cannot decode {} without an image decoder",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Quality;
    use std::fs;

    #[test]
    fn copies_bytes_exactly() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("rock01.jpg");
        let output = tmp.path().join("rock01.preview.jpg");
        fs::write(&source, b"\xFF\xD8 not really decoded \xFF\xD9").unwrap();

        CopyTransformer::new()
            .transform(&PreviewParams {
                source: source.clone(),
                output: output.clone(),
                max_width: 1,
                max_height: 1,
                quality: Quality::default(),
                allow_upscale: false,
            })
            .unwrap();

        assert_eq!(fs::read(&output).unwrap(), fs::read(&source).unwrap());
    }

    #[test]
    fn missing_source_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = CopyTransformer::new().transform(&PreviewParams {
            source: tmp.path().join("gone.jpg"),
            output: tmp.path().join("out.jpg"),
            max_width: 1,
            max_height: 1,
            quality: Quality::default(),
            allow_upscale: false,
        });
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn does_not_resize_or_identify() {
        let t = CopyTransformer::new();
        assert!(!t.resizes());
        assert!(matches!(
            t.identify(Path::new("/x.jpg")),
            Err(BackendError::Unavailable(_))
        ));
    }
}

//! Pure Rust resizing transformer.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Color normalization | `DynamicImage::to_rgb8` (drops alpha, 16-bit → 8-bit, gray → RGB) |
//! | Best-fit resize | [`fit_within`](super::calculations::fit_within) + `resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//!
//! Re-encoding from raw pixels carries no EXIF/IPTC/ICC segments over, so the
//! preview is stripped of source metadata as a side effect.

use super::backend::{BackendError, Dimensions, ImageTransformer};
use super::calculations::fit_within;
use super::params::{PreviewParams, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, ImageFormat, ImageReader, RgbImage};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Formats the resizer reads, listed at startup.
const DECODE_CANDIDATES: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// Encode a 1x1 JPEG in memory and decode it back.
///
/// Fails when either codec is missing from the build or broken at runtime;
/// in that case no preview can be rendered and the copy transformer is used.
pub fn jpeg_roundtrip_supported() -> bool {
    let pixel = RgbImage::from_pixel(1, 1, image::Rgb([128, 64, 32]));
    let mut encoded = Vec::new();
    let wrote = JpegEncoder::new_with_quality(&mut encoded, Quality::default().value() as u8)
        .write_image(pixel.as_raw(), 1, 1, image::ExtendedColorType::Rgb8);
    if let Err(e) = wrote {
        debug!(error = %e, "JPEG encode self-test failed");
        return false;
    }
    match image::load_from_memory_with_format(&encoded, ImageFormat::Jpeg) {
        Ok(img) => (img.width(), img.height()) == (1, 1),
        Err(e) => {
            debug!(error = %e, "JPEG decode self-test failed");
            false
        }
    }
}

/// Decoders compiled into this build, for the startup log.
pub(crate) fn supported_input_formats() -> Vec<ImageFormat> {
    DECODE_CANDIDATES
        .iter()
        .copied()
        .filter(|fmt| fmt.reading_enabled())
        .collect()
}

/// Decode, normalize, best-fit resize and re-encode as JPEG.
///
/// See the [module docs](self) for the crate-to-step mapping.
pub struct ResizingTransformer;

impl ResizingTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResizingTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image, sniffing the real format from its bytes.
///
/// A PNG saved as `.jpg` still decodes.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode and save as baseline JPEG.
fn save_jpeg(img: &RgbImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut writer = std::io::BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality.value() as u8)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    writer.flush().map_err(BackendError::Io)
}

impl ImageTransformer for ResizingTransformer {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn resizes(&self) -> bool {
        true
    }

    fn transform(&self, params: &PreviewParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let source_dims = (img.width(), img.height());
        let (w, h) = fit_within(
            source_dims,
            (params.max_width, params.max_height),
            params.allow_upscale,
        );

        let rgb = if (w, h) == source_dims {
            img.to_rgb8()
        } else {
            img.resize_exact(w, h, FilterType::Lanczos3).to_rgb8()
        };

        save_jpeg(&rgb, &params.output, params.quality)
    }

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        Ok(Dimensions { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_jpeg, write_png};

    fn params(source: &Path, output: &Path, max: (u32, u32)) -> PreviewParams {
        PreviewParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            max_width: max.0,
            max_height: max.1,
            quality: Quality::default(),
            allow_upscale: false,
        }
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg(&path, 200, 150);

        let dims = ResizingTransformer::new().identify(&path).unwrap();
        assert_eq!(dims, Dimensions { width: 200, height: 150 });
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let result = ResizingTransformer::new().identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn downscales_into_bounds() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("big.jpg");
        let output = tmp.path().join("big.preview.jpg");
        write_jpeg(&source, 1600, 1200);

        let t = ResizingTransformer::new();
        t.transform(&params(&source, &output, (900, 900))).unwrap();

        assert_eq!(t.identify(&output).unwrap(), Dimensions { width: 900, height: 675 });
    }

    #[test]
    fn small_source_keeps_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("small.jpg");
        let output = tmp.path().join("small.preview.jpg");
        write_jpeg(&source, 800, 600);

        let t = ResizingTransformer::new();
        t.transform(&params(&source, &output, (900, 900))).unwrap();

        assert_eq!(t.identify(&output).unwrap(), Dimensions { width: 800, height: 600 });
    }

    #[test]
    fn upscale_when_allowed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("small.jpg");
        let output = tmp.path().join("small.preview.jpg");
        write_jpeg(&source, 400, 300);

        let t = ResizingTransformer::new();
        let mut p = params(&source, &output, (800, 800));
        p.allow_upscale = true;
        t.transform(&p).unwrap();

        assert_eq!(t.identify(&output).unwrap(), Dimensions { width: 800, height: 600 });
    }

    #[test]
    fn png_with_alpha_becomes_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        // PNG bytes behind a .jpg name: decoded by sniffing
        let source = tmp.path().join("mislabeled.jpg");
        let output = tmp.path().join("out.jpg");
        write_png(&source, 64, 32);

        let t = ResizingTransformer::new();
        t.transform(&params(&source, &output, (32, 32))).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "output must be JPEG");
        assert_eq!(t.identify(&output).unwrap(), Dimensions { width: 32, height: 16 });
    }

    /// Insert an APP1 (EXIF) segment right after the SOI marker.
    fn add_exif_segment(path: &Path, payload: &[u8]) {
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let len = (payload.len() + 2) as u16;
        let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(&bytes[2..]);
        std::fs::write(path, out).unwrap();
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn source_exif_not_carried_into_preview() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("rock01.jpg");
        let output = tmp.path().join("rock01.preview.jpg");
        write_jpeg(&source, 300, 200);
        add_exif_segment(&source, b"Exif\0\0GPS 51.5N 0.12W");
        assert!(contains(&std::fs::read(&source).unwrap(), b"GPS 51.5N"));

        let t = ResizingTransformer::new();
        t.transform(&params(&source, &output, (100, 100))).unwrap();

        let preview = std::fs::read(&output).unwrap();
        assert!(!contains(&preview, b"GPS 51.5N"));
        assert!(!contains(&preview, b"Exif\0\0"));
        assert_eq!(t.identify(&output).unwrap(), Dimensions { width: 100, height: 67 });
    }

    #[test]
    fn quality_setting_reaches_encoder() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("noisy.png");
        // High-frequency content so quality visibly changes the file size
        RgbImage::from_fn(256, 256, |x, y| {
            let v = (x.wrapping_mul(7919) ^ y.wrapping_mul(104729)).wrapping_mul(2654435761);
            image::Rgb([(v >> 8) as u8, (v >> 16) as u8, (v >> 24) as u8])
        })
        .save_with_format(&source, ImageFormat::Png)
        .unwrap();

        let t = ResizingTransformer::new();
        let default_out = tmp.path().join("q82.jpg");
        t.transform(&params(&source, &default_out, (256, 256))).unwrap();

        let low_out = tmp.path().join("q20.jpg");
        let mut low = params(&source, &low_out, (256, 256));
        low.quality = Quality::new(20);
        t.transform(&low).unwrap();

        let default_size = std::fs::metadata(&default_out).unwrap().len();
        let low_size = std::fs::metadata(&low_out).unwrap().len();
        assert!(
            low_size < default_size,
            "q20 ({low_size} bytes) should be smaller than q82 ({default_size} bytes)"
        );
    }

    #[test]
    fn jpeg_roundtrip_succeeds_and_lists_decoders() {
        assert!(jpeg_roundtrip_supported());
        let formats = supported_input_formats();
        for expected in [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Tiff, ImageFormat::WebP] {
            assert!(formats.contains(&expected), "expected {expected:?} decoder");
        }
    }

    #[test]
    fn corrupt_source_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("broken.jpg");
        let output = tmp.path().join("out.jpg");
        std::fs::write(&source, b"definitely not a jpeg").unwrap();

        let result = ResizingTransformer::new().transform(&params(&source, &output, (100, 100)));
        assert!(result.is_err());
    }
}

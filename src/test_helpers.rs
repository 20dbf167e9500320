//! Shared test utilities for the gallery-shop test suite.
//!
//! Fixture builders for catalog trees, synthetic image writers, and mtime
//! helpers for staleness tests.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let dir = make_item(tmp.path(), "art", "rock01");
//! write_jpeg(&dir.join("rock01.jpg"), 800, 600);
//! ```

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// =========================================================================
// Catalog fixtures
// =========================================================================

/// Create `<root>/<category>/<name>/` and return the item directory.
pub fn make_item(root: &Path, category: &str, name: &str) -> PathBuf {
    let dir = root.join(category).join(name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a gradient JPEG of the given size.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

/// Write a half-transparent PNG, whatever the path's extension says.
pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        Rgba([200, (x % 256) as u8, 50, if x % 2 == 0 { 255 } else { 0 }])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

// =========================================================================
// Modification times
// =========================================================================

pub fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

pub fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

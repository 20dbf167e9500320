//! Per-item metadata extraction.
//!
//! An item directory can carry metadata from two kinds of source:
//!
//! ## Text files
//!
//! - **Description**: `description.txt`, free text, may span lines.
//! - **Price override**: `price.txt`, a single decimal number.
//! - **SKU**: `sku.txt`, a single token.
//!
//! All three go through [`read_text`], the one read-or-default helper: a
//! missing file, an unreadable file, and a whitespace-only file all come back
//! as `None`. Nothing here returns an error: a messy item directory yields a
//! sparse [`ItemMetadata`], never a failed scan.
//!
//! ## Asset files
//!
//! The primary image and the secondary formats are located with the ordered
//! rules in [`crate::naming`], one kind at a time.
//!
//! ## Price parsing
//!
//! Price files are typed by hand, so [`parse_price`] tolerates a leading
//! currency symbol and a decimal comma. Anything else that does not parse as a
//! finite, non-negative number is "no override": the caller's default price
//! applies.

use crate::naming::{self, AssetKind};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything the extractor could find in one item directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemMetadata {
    pub primary_image: Option<PathBuf>,
    pub assets: BTreeMap<AssetKind, PathBuf>,
    /// Empty when `description.txt` is absent.
    pub description: String,
    pub price_override: Option<f64>,
    pub sku: Option<String>,
}

/// Extract metadata from an item directory.
///
/// The item name used for exact-stem asset matching is the directory's
/// basename.
pub fn extract(item_dir: &Path) -> ItemMetadata {
    let item_name = item_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let files = list_files(item_dir);

    let primary_image = naming::resolve_asset(&files, &item_name, AssetKind::PRIMARY);
    let assets = AssetKind::SECONDARY
        .iter()
        .filter_map(|&kind| naming::resolve_asset(&files, &item_name, kind).map(|p| (kind, p)))
        .collect();

    ItemMetadata {
        primary_image,
        assets,
        description: read_text(&item_dir.join(naming::DESCRIPTION_FILE)).unwrap_or_default(),
        price_override: read_text(&item_dir.join(naming::PRICE_FILE)).and_then(|s| parse_price(&s)),
        sku: read_text(&item_dir.join(naming::SKU_FILE)),
    }
}

/// Locate the primary image of a directory: exact stem first, then any JPEG.
pub fn find_primary_image(dir: &Path, item_name: &str) -> Option<PathBuf> {
    naming::resolve_asset(&list_files(dir), item_name, AssetKind::PRIMARY)
}

/// Read a text file, trimmed. `None` if missing, unreadable, or blank.
pub fn read_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content.trim().to_string()).filter(|s| !s.is_empty()),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "unreadable metadata file ignored");
            }
            None
        }
    }
}

/// Parse a hand-written price.
///
/// Accepts `40`, `40.5`, `$40.50`, `€ 12,50`. Rejects `N/A`, empty strings,
/// negative amounts, and `inf`/`NaN`.
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed
        .strip_prefix(['$', '€', '£'])
        .unwrap_or(trimmed)
        .trim_start();

    let normalized = match unsigned.split_once(',') {
        // Decimal comma: one comma, no dot, at most two digits after it
        Some((whole, frac))
            if !unsigned.contains('.')
                && !frac.contains(',')
                && (1..=2).contains(&frac.len()) =>
        {
            format!("{whole}.{frac}")
        }
        _ => unsigned.to_string(),
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Regular, visible files of a directory, sorted by name.
///
/// Unreadable directories yield an empty listing.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot list item directory");
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && !naming::is_hidden(p))
        .collect();
    files.sort();
    files
}

//! Filename conventions for item directories.
//!
//! Every item lives in `<root>/<category>/<item>/` and its files are found by
//! name alone, there is no index. This module holds those conventions:
//!
//! - the fixed text metadata filenames (`description.txt`, `price.txt`, `sku.txt`)
//! - the generated preview name (`<item>.preview.jpg`)
//! - the asset kinds and the ordered rules used to pick one file per kind
//!
//! Everything here is pure: rules operate on a directory listing that the
//! caller has already read (see [`crate::metadata::list_files`]).
//!
//! ## Asset Resolution
//!
//! For each [`AssetKind`] the rules in [`AssetRule::PRIORITY`] are tried in
//! order and the first match wins:
//!
//! ```text
//! rock01/
//! ├── rock01.jpg        ← ExactStem (stem == directory name)
//! ├── alt-angle.jpg     ← AnyWithExtension, only used if rock01.jpg is missing
//! ├── rock01.preview.jpg  (generated, never a candidate)
//! └── rock01.pdf        ← ExactStem for AssetKind::Pdf
//! ```
//!
//! Listings are sorted by filename, so `AnyWithExtension` is deterministic.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DESCRIPTION_FILE: &str = "description.txt";
pub const PRICE_FILE: &str = "price.txt";
pub const SKU_FILE: &str = "sku.txt";

/// Suffix appended to the item name to form the preview artifact filename.
pub const PREVIEW_SUFFIX: &str = ".preview.jpg";

/// File formats an item directory can offer.
///
/// [`AssetKind::Jpeg`] is the primary kind: the source for the preview.
/// The others are secondary formats offered alongside it (e.g. for download).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Jpeg,
    Png,
    Tiff,
    Webp,
    Pdf,
}

impl AssetKind {
    pub const PRIMARY: AssetKind = AssetKind::Jpeg;

    pub const SECONDARY: &'static [AssetKind] = &[
        AssetKind::Png,
        AssetKind::Tiff,
        AssetKind::Webp,
        AssetKind::Pdf,
    ];

    /// Accepted extensions, lowercase. Matching is case-insensitive.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            AssetKind::Jpeg => &["jpg", "jpeg"],
            AssetKind::Png => &["png"],
            AssetKind::Tiff => &["tif", "tiff"],
            AssetKind::Webp => &["webp"],
            AssetKind::Pdf => &["pdf"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Jpeg => "jpeg",
            AssetKind::Png => "png",
            AssetKind::Tiff => "tiff",
            AssetKind::Webp => "webp",
            AssetKind::Pdf => "pdf",
        }
    }

    /// Whether `path` carries one of this kind's extensions.
    ///
    /// Preview artifacts never match, even though they end in `.jpg`.
    pub fn matches(self, path: &Path) -> bool {
        if is_preview_artifact(path) {
            return false;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }
}

/// Filename of the preview artifact for an item: `<base_name>.preview.jpg`.
pub fn preview_file_name(base_name: &str) -> String {
    format!("{base_name}{PREVIEW_SUFFIX}")
}

/// Whether `path` names a generated preview artifact.
pub fn is_preview_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            name.len() > PREVIEW_SUFFIX.len()
                && name.to_ascii_lowercase().ends_with(PREVIEW_SUFFIX)
        })
}

/// Hidden entries (dotfiles, in-flight temp files) are invisible to the catalog.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// One way of picking an asset file out of a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRule {
    /// Stem equals the item directory name: `rock01/rock01.jpg`.
    ExactStem,
    /// First file (in listing order) with a matching extension.
    AnyWithExtension,
}

impl AssetRule {
    /// Rules in the order they are tried.
    pub const PRIORITY: &'static [AssetRule] =
        &[AssetRule::ExactStem, AssetRule::AnyWithExtension];

    /// Apply this rule to a sorted listing. Returns the first match.
    pub fn select<'a>(
        self,
        files: &'a [PathBuf],
        item_name: &str,
        kind: AssetKind,
    ) -> Option<&'a PathBuf> {
        let mut candidates = files.iter().filter(|f| kind.matches(f));
        match self {
            AssetRule::ExactStem => candidates.find(|f| {
                f.file_stem()
                    .is_some_and(|stem| stem.to_string_lossy() == item_name)
            }),
            AssetRule::AnyWithExtension => candidates.next(),
        }
    }
}

/// Resolve one asset of `kind` from a listing, trying every rule in priority order.
pub fn resolve_asset(files: &[PathBuf], item_name: &str, kind: AssetKind) -> Option<PathBuf> {
    AssetRule::PRIORITY
        .iter()
        .find_map(|rule| rule.select(files, item_name, kind))
        .cloned()
}

//! Filesystem scanning.
//!
//! Walks the two-level catalog tree and produces one [`Item`] per item
//! directory. The filesystem is the only source of truth; nothing is cached
//! between scans.
//!
//! ## Directory Structure
//!
//! ```text
//! shop/                              # Catalog root
//! ├── art/                           # Category
//! │   ├── rock01/                    # Item
//! │   │   ├── rock01.jpg             # Primary image
//! │   │   ├── rock01.preview.jpg     # Generated preview (ignored here)
//! │   │   ├── rock01.pdf             # Secondary asset
//! │   │   ├── description.txt
//! │   │   ├── price.txt
//! │   │   └── sku.txt
//! │   └── vase/
//! ├── Prints/
//! │   └── harbour/
//! └── notes.txt                      # Not a directory, ignored
//! ```
//!
//! ## Tolerance
//!
//! A scan never fails. A missing root is an empty catalog; unreadable
//! category or item directories are skipped; hidden entries are ignored at
//! both levels.
//!
//! ## Ordering
//!
//! Items are sorted by `(category, name)` compared case-insensitively, with a
//! case-sensitive comparison breaking ties, so `apple/` sorts before `Banana/`
//! and the order is stable across repeated scans.

use crate::metadata;
use crate::naming::{self, AssetKind};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One cataloged entity: a directory two levels below the root.
///
/// `category` and `name` are always set; every other field is best-effort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub category: String,
    pub name: String,
    pub dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_image: Option<PathBuf>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<AssetKind, PathBuf>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_override: Option<f64>,
    #[serde(rename = "sku_override", skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl Item {
    /// Build an item from its directory, reading all metadata.
    pub fn from_dir(category: &str, dir: &Path) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let meta = metadata::extract(dir);
        Self {
            category: category.to_string(),
            name,
            dir: dir.to_path_buf(),
            primary_image: meta.primary_image,
            assets: meta.assets,
            description: meta.description,
            price_override: meta.price_override,
            sku: meta.sku,
        }
    }

    pub fn has_preview_source(&self) -> bool {
        self.primary_image.is_some()
    }
}

/// Scan the catalog root. Never fails; a missing root yields no items.
pub fn scan(root: &Path) -> Vec<Item> {
    if !root.is_dir() {
        debug!(root = %root.display(), "catalog root missing, empty catalog");
        return Vec::new();
    }

    let mut items: Vec<Item> = subdirectories(root)
        .into_iter()
        .flat_map(|category_dir| {
            let category = category_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            subdirectories(&category_dir)
                .into_iter()
                .map(move |item_dir| Item::from_dir(&category, &item_dir))
        })
        .collect();

    sort_items(&mut items);
    items
}

/// Sort items into catalog order.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(|a, b| {
        catalog_order(
            (a.category.as_str(), a.name.as_str()),
            (b.category.as_str(), b.name.as_str()),
        )
    });
}

/// Case-insensitive `(category, name)` ordering with a case-sensitive tie-break.
pub fn catalog_order(a: (&str, &str), b: (&str, &str)) -> Ordering {
    let fold = |(c, n): (&str, &str)| (c.to_lowercase(), n.to_lowercase());
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(&b))
}

/// Group items by category, keeping first-appearance order.
///
/// Categories differing only in case stay separate groups, even when catalog
/// order interleaves them.
pub fn group_by_category<'a, T>(
    items: &'a [T],
    category: impl Fn(&'a T) -> &'a str,
) -> Vec<(&'a str, Vec<&'a T>)> {
    let mut groups: Vec<(&'a str, Vec<&'a T>)> = Vec::new();
    for item in items {
        let key = category(item);
        match groups.iter_mut().find(|(c, _)| *c == key) {
            Some((_, members)) => members.push(item),
            None => groups.push((key, vec![item])),
        }
    }
    groups
}

/// Immediate visible subdirectories of `dir`. Symlinked directories count.
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .filter(|path| !naming::is_hidden(path))
        .collect()
}

//! # Gallery Shop
//!
//! A product catalog whose database is a directory tree. Categories are
//! directories under a root, items are directories inside a category, and
//! everything known about an item comes from the files it contains.
//!
//! # Architecture: Scan, Resolve, Preview
//!
//! ```text
//! 1. Scan      shop/         →  Vec<Item>         (filesystem → structured data)
//! 2. Resolve   Vec<Item>     →  Vec<CatalogItem>  (default price, derived SKU)
//! 3. Preview   Item          →  <item>.preview.jpg (on demand, per item)
//! ```
//!
//! Scanning and resolving only read. Previews are the one thing written, and
//! only when a consumer asks for them, so a catalog can be listed from a
//! read-only mount and previews warmed separately.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the two-level tree, produces sorted [`scan::Item`]s |
//! | [`metadata`] | Reads `description.txt` / `price.txt` / `sku.txt`, locates asset files |
//! | [`naming`] | File naming conventions and the ordered asset-matching rules |
//! | [`catalog`] | Applies default pricing and SKU derivation, groups by category |
//! | [`preview`] | Keeps `<item>.preview.jpg` in sync with its source (mtime-based) |
//! | [`imaging`] | Image transformers: resize-and-encode, or verbatim copy |
//! | [`config`] | `gallery-shop.toml` loading, merging, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Absence Is Not An Error
//!
//! Every optional file may be missing, empty, unreadable or malformed. None
//! of that fails a scan: the item is listed with whatever could be read, and
//! defaults fill the rest. Only configuration errors stop the program.
//!
//! ## The Filesystem Is The Cache
//!
//! Preview freshness is decided by comparing modification times of source and
//! preview. There is no manifest to drift out of sync, and deleting a preview
//! is always safe: the next request regenerates it.
//!
//! ## Capability Chosen Once
//!
//! [`imaging::detect_transformer`] decides at startup whether previews are
//! resized or copied, and the [`preview::PreviewCache`] is built around that
//! choice. A render that fails at runtime still falls back to a copy.

pub mod catalog;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod preview;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;

//! Catalog assembly.
//!
//! Turns scanned [`Item`]s into sellable [`CatalogItem`]s by resolving the two
//! values every item must have:
//!
//! - **price**: the item's `price.txt` override, else the shop default.
//! - **sku**: the item's `sku.txt`, else `<category>/<name>`.
//!
//! Building a catalog only reads the filesystem. Previews are a separate
//! concern handled by [`crate::preview`], so a catalog can be rendered before
//! (or without) any preview work.

use crate::config::Config;
use crate::scan::{self, Item};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// An item with its price and SKU resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    #[serde(flatten)]
    pub item: Item,
    pub price: f64,
    pub sku: String,
}

impl CatalogItem {
    pub fn category(&self) -> &str {
        &self.item.category
    }

    pub fn name(&self) -> &str {
        &self.item.name
    }
}

/// Scan `root` and resolve every item, in catalog order.
pub fn build(root: &Path, default_price: f64) -> Vec<CatalogItem> {
    scan::scan(root)
        .into_iter()
        .map(|item| resolve(item, default_price))
        .collect()
}

/// Apply default pricing and SKU derivation to one item.
pub fn resolve(item: Item, default_price: f64) -> CatalogItem {
    let price = item.price_override.unwrap_or(default_price);
    let sku = item
        .sku
        .clone()
        .unwrap_or_else(|| derive_sku(&item.category, &item.name));
    CatalogItem { item, price, sku }
}

/// SKU for items without a `sku.txt`.
pub fn derive_sku(category: &str, name: &str) -> String {
    format!("{category}/{name}")
}

/// A built catalog plus the shop-wide values consumers render it with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    pub root: PathBuf,
    /// Passed through from config; never used in price arithmetic.
    pub currency: String,
    pub default_price: f64,
    pub items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn load(config: &Config) -> Self {
        Self {
            root: config.root.clone(),
            currency: config.currency.clone(),
            default_price: config.default_price,
            items: build(&config.root, config.default_price),
        }
    }

    /// Items grouped by category, in catalog order.
    ///
    /// Categories differing only in case stay separate groups.
    pub fn categories(&self) -> Vec<(&str, Vec<&CatalogItem>)> {
        scan::group_by_category(&self.items, CatalogItem::category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with the item's identity (category, position, name) and shows
//! files as indented context lines underneath. The listing reads as a shop
//! inventory while still pointing back at the files that produced it.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! art (2 items)
//!     001 rock01
//!         Image: rock01.jpg
//!         Assets: png, pdf
//!         Price: 40.00
//!         SKU: RK-01
//!         Granite, hand polished.
//!     002 vase
//!         Image: none
//! ```
//!
//! ## Previews
//!
//! ```text
//! art/rock01: generated → rock01.preview.jpg
//! art/vase: fresh → vase.preview.jpg
//! art/sketch: missing
//! Previews: 1 fresh, 1 generated, 0 copied, 1 missing (3 total)
//! ```
//!
//! ## Check
//!
//! ```text
//! art/sketch: no primary image
//! art/broken: unreadable image (Processing failed: ...)
//! 2 of 5 items need attention
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::preview::{PreviewOutcome, PreviewStats, SourceIssue};
use crate::scan::{self, Item};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// `category/name`, the identity shown in one-line reports.
fn item_key(item: &Item) -> String {
    format!("{}/{}", item.category, item.name)
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the scanned catalog tree.
///
/// Prices shown are the item's own overrides; defaults are applied by `build`.
pub fn format_scan_output(items: &[Item]) -> Vec<String> {
    if items.is_empty() {
        return vec!["No items found".to_string()];
    }

    let mut lines = Vec::new();
    for (category, members) in scan::group_by_category(items, |i| i.category.as_str()) {
        lines.push(format!("{} ({})", category, plural(members.len(), "item")));

        for (i, item) in members.iter().enumerate() {
            let ctx = indent(2);
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), item.name));

            match &item.primary_image {
                Some(image) => lines.push(format!("{}Image: {}", ctx, file_name(image))),
                None => lines.push(format!("{}Image: none", ctx)),
            }
            if !item.assets.is_empty() {
                let kinds: Vec<&str> = item.assets.keys().map(|k| k.label()).collect();
                lines.push(format!("{}Assets: {}", ctx, kinds.join(", ")));
            }
            if let Some(price) = item.price_override {
                lines.push(format!("{}Price: {:.2}", ctx, price));
            }
            if let Some(ref sku) = item.sku {
                lines.push(format!("{}SKU: {}", ctx, sku));
            }
            let first_line = item.description.lines().next().unwrap_or("").trim();
            if !first_line.is_empty() {
                lines.push(format!("{}{}", ctx, truncate_desc(first_line, 60)));
            }
        }
    }
    lines
}

pub fn print_scan_output(items: &[Item]) {
    for line in format_scan_output(items) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview output
// ============================================================================

/// One line per item: its key, what happened, and the preview file if any.
pub fn format_preview_line(item: &Item, outcome: &PreviewOutcome) -> String {
    match outcome.path() {
        Some(path) => format!("{}: {} → {}", item_key(item), outcome.label(), file_name(path)),
        None => format!("{}: {}", item_key(item), outcome.label()),
    }
}

pub fn format_preview_output(results: &[(&Item, PreviewOutcome)]) -> Vec<String> {
    let stats: PreviewStats = results.iter().map(|(_, outcome)| outcome).collect();
    let mut lines: Vec<String> = results
        .iter()
        .map(|(item, outcome)| format_preview_line(item, outcome))
        .collect();
    lines.push(format!("Previews: {}", stats));
    lines
}

pub fn print_preview_output(results: &[(&Item, PreviewOutcome)]) {
    for line in format_preview_output(results) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

pub fn format_check_output(total: usize, issues: &[(&Item, SourceIssue)]) -> Vec<String> {
    let mut lines: Vec<String> = issues
        .iter()
        .map(|(item, issue)| match issue {
            SourceIssue::NoImage => format!("{}: no primary image", item_key(item)),
            SourceIssue::Unreadable(reason) => {
                format!("{}: unreadable image ({})", item_key(item), reason)
            }
        })
        .collect();

    if issues.is_empty() {
        lines.push(format!("All {} have a usable image", plural(total, "item")));
    } else {
        lines.push(format!("{} of {} need attention", issues.len(), plural(total, "item")));
    }
    lines
}

pub fn print_check_output(total: usize, issues: &[(&Item, SourceIssue)]) {
    for line in format_check_output(total, issues) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::AssetKind;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn item(category: &str, name: &str) -> Item {
        let dir = PathBuf::from("/shop").join(category).join(name);
        Item {
            category: category.to_string(),
            name: name.to_string(),
            primary_image: Some(dir.join(format!("{name}.jpg"))),
            dir,
            assets: BTreeMap::new(),
            description: String::new(),
            price_override: None,
            sku: None,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_exact() {
        let text = "a".repeat(40);
        assert_eq!(truncate_desc(&text, 40), text);
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        let expected = format!("{}...", "a".repeat(40));
        assert_eq!(truncate_desc(&text, 40), expected);
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("café crème", 4), "café...");
    }

    // =========================================================================
    // Scan
    // =========================================================================

    #[test]
    fn scan_output_empty() {
        assert_eq!(format_scan_output(&[]), vec!["No items found"]);
    }

    #[test]
    fn scan_output_groups_by_category() {
        let mut rock = item("art", "rock01");
        rock.assets.insert(AssetKind::Pdf, PathBuf::from("/shop/art/rock01/rock01.pdf"));
        rock.assets.insert(AssetKind::Png, PathBuf::from("/shop/art/rock01/rock01.png"));
        rock.price_override = Some(40.0);
        rock.sku = Some("RK-01".into());
        rock.description = "Granite, hand polished.\nSecond line".into();
        let mut vase = item("art", "vase");
        vase.primary_image = None;
        let harbour = item("prints", "harbour");

        let lines = format_scan_output(&[rock, vase, harbour]);
        assert_eq!(
            lines,
            vec![
                "art (2 items)",
                "    001 rock01",
                "        Image: rock01.jpg",
                "        Assets: png, pdf",
                "        Price: 40.00",
                "        SKU: RK-01",
                "        Granite, hand polished.",
                "    002 vase",
                "        Image: none",
                "prints (1 item)",
                "    001 harbour",
                "        Image: harbour.jpg",
            ]
        );
    }

    // =========================================================================
    // Previews
    // =========================================================================

    #[test]
    fn preview_lines_and_summary() {
        let rock = item("art", "rock01");
        let vase = item("art", "vase");
        let sketch = item("art", "sketch");
        let results = vec![
            (
                &rock,
                PreviewOutcome::Generated(PathBuf::from("/shop/art/rock01/rock01.preview.jpg")),
            ),
            (
                &vase,
                PreviewOutcome::Fresh(PathBuf::from("/shop/art/vase/vase.preview.jpg")),
            ),
            (&sketch, PreviewOutcome::Missing),
        ];

        assert_eq!(
            format_preview_output(&results),
            vec![
                "art/rock01: generated → rock01.preview.jpg",
                "art/vase: fresh → vase.preview.jpg",
                "art/sketch: missing",
                "Previews: 1 fresh, 1 generated, 0 copied, 1 missing (3 total)",
            ]
        );
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[test]
    fn check_output_all_good() {
        assert_eq!(format_check_output(3, &[]), vec!["All 3 items have a usable image"]);
    }

    #[test]
    fn check_output_lists_issues() {
        let sketch = item("art", "sketch");
        let broken = item("art", "broken");
        let issues = vec![
            (&sketch, SourceIssue::NoImage),
            (&broken, SourceIssue::Unreadable("bad header".into())),
        ];

        assert_eq!(
            format_check_output(5, &issues),
            vec![
                "art/sketch: no primary image",
                "art/broken: unreadable image (bad header)",
                "2 of 5 items need attention",
            ]
        );
    }
}

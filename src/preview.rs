//! Derived preview images with mtime-based invalidation.
//!
//! Each item owns at most one preview, `<item_dir>/<item>.preview.jpg`, kept
//! next to its source. The filesystem is the cache: there is no manifest and
//! nothing in memory survives a call.
//!
//! ## Staleness
//!
//! A preview is regenerated iff it does not exist or the source's mtime is
//! strictly newer than the preview's. An mtime that cannot be read counts as
//! stale, so the worst case is one unnecessary render.
//!
//! ## Fallback chain
//!
//! 1. The configured [`ImageTransformer`] renders the preview.
//! 2. If that fails (corrupt or unsupported source), the source is copied
//!    verbatim.
//! 3. If the copy fails too, there is no preview and callers get `None`.
//!
//! ## Atomic writes
//!
//! Every render goes to a uniquely named hidden temp file in the cache
//! directory, which is renamed over the preview once complete. Readers see
//! either the old file or the new one, never a partial write, and parallel
//! callers on the same item converge on one complete file. Hidden temp files
//! are never picked up as assets by the scanner.

use crate::config::PreviewConfig;
use crate::imaging::{BackendError, CopyTransformer, ImageTransformer, PreviewParams, Quality};
use crate::metadata;
use crate::naming;
use crate::scan::Item;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// What [`PreviewCache::ensure_with_outcome`] did for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// Existing preview is up to date; nothing written.
    Fresh(PathBuf),
    /// Rendered by a resizing transformer.
    Generated(PathBuf),
    /// Verbatim copy of the source, either by configuration or as fallback.
    Copied(PathBuf),
    /// No source image could be found.
    Missing,
    /// A source exists but neither rendering nor copying succeeded.
    Failed,
}

impl PreviewOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Fresh(p) | Self::Generated(p) | Self::Copied(p) => Some(p),
            Self::Missing | Self::Failed => None,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Self::Fresh(p) | Self::Generated(p) | Self::Copied(p) => Some(p),
            Self::Missing | Self::Failed => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fresh(_) => "fresh",
            Self::Generated(_) => "generated",
            Self::Copied(_) => "copied",
            Self::Missing => "missing",
            Self::Failed => "failed",
        }
    }
}

/// Keeps previews in sync with their sources.
///
/// Bounds, quality and upscale policy are fixed at construction.
pub struct PreviewCache<T: ImageTransformer> {
    transformer: T,
    max_width: u32,
    max_height: u32,
    quality: Quality,
    allow_upscale: bool,
}

impl<T: ImageTransformer> PreviewCache<T> {
    pub fn new(transformer: T, config: &PreviewConfig) -> Self {
        Self {
            transformer,
            max_width: config.max_width,
            max_height: config.max_height,
            quality: Quality::new(config.quality),
            allow_upscale: config.allow_upscale,
        }
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    /// Ensure `cache_dir/<base_name>.preview.jpg` is current and return it.
    ///
    /// `None` means no preview can be offered for this item.
    pub fn ensure(&self, source: &Path, cache_dir: &Path, base_name: &str) -> Option<PathBuf> {
        self.ensure_with_outcome(source, cache_dir, base_name)
            .into_path()
    }

    /// [`ensure`](Self::ensure), reporting which path was taken.
    pub fn ensure_with_outcome(
        &self,
        source: &Path,
        cache_dir: &Path,
        base_name: &str,
    ) -> PreviewOutcome {
        let artifact = cache_dir.join(naming::preview_file_name(base_name));

        let Some(source) = resolve_source(source, cache_dir, base_name) else {
            debug!(item = base_name, "no source image, no preview");
            return PreviewOutcome::Missing;
        };

        if !is_stale(&source, &artifact) {
            return PreviewOutcome::Fresh(artifact);
        }

        let params = PreviewParams {
            source,
            output: artifact.clone(),
            max_width: self.max_width,
            max_height: self.max_height,
            quality: self.quality,
            allow_upscale: self.allow_upscale,
        };

        match write_atomically(&self.transformer, &params) {
            Ok(()) if self.transformer.resizes() => PreviewOutcome::Generated(artifact),
            Ok(()) => PreviewOutcome::Copied(artifact),
            Err(e) if self.transformer.resizes() => {
                warn!(
                    source = %params.source.display(),
                    error = %e,
                    "preview render failed, copying source instead"
                );
                copy_fallback(&params)
            }
            Err(e) => {
                warn!(source = %params.source.display(), error = %e, "preview copy failed");
                PreviewOutcome::Failed
            }
        }
    }

    /// Ensure the preview of a scanned item.
    pub fn ensure_item(&self, item: &Item) -> Option<PathBuf> {
        self.ensure_item_with_outcome(item).into_path()
    }

    pub fn ensure_item_with_outcome(&self, item: &Item) -> PreviewOutcome {
        let source = item
            .primary_image
            .clone()
            .unwrap_or_else(|| item.dir.join(format!("{}.jpg", item.name)));
        self.ensure_with_outcome(&source, &item.dir, &item.name)
    }
}

fn copy_fallback(params: &PreviewParams) -> PreviewOutcome {
    match write_atomically(&CopyTransformer::new(), params) {
        Ok(()) => PreviewOutcome::Copied(params.output.clone()),
        Err(e) => {
            warn!(source = %params.source.display(), error = %e, "preview copy failed");
            PreviewOutcome::Failed
        }
    }
}

/// The source to render from.
///
/// `source` itself if it is a file; otherwise the primary image found in its
/// directory, then in `cache_dir`.
fn resolve_source(source: &Path, cache_dir: &Path, base_name: &str) -> Option<PathBuf> {
    if source.is_file() {
        return Some(source.to_path_buf());
    }
    let parent = source.parent().filter(|p| !p.as_os_str().is_empty());
    parent
        .and_then(|dir| metadata::find_primary_image(dir, base_name))
        .or_else(|| {
            if parent == Some(cache_dir) {
                None
            } else {
                metadata::find_primary_image(cache_dir, base_name)
            }
        })
}

/// Whether `artifact` must be (re)generated from `source`.
///
/// Anything other than a regular file at `artifact` counts as absent.
pub fn is_stale(source: &Path, artifact: &Path) -> bool {
    let cached = match fs::metadata(artifact) {
        Ok(meta) if meta.is_file() => meta.modified(),
        _ => return true,
    };
    let src = fs::metadata(source).and_then(|m| m.modified());
    match (src, cached) {
        (Ok(src), Ok(cached)) => src > cached,
        (src, cached) => {
            debug!(
                source = %source.display(),
                source_ok = src.is_ok(),
                cached_ok = cached.is_ok(),
                "unreadable mtime, treating preview as stale"
            );
            true
        }
    }
}

/// Render into a hidden temp file beside the target, then rename it over.
fn write_atomically<B: ImageTransformer + ?Sized>(
    transformer: &B,
    params: &PreviewParams,
) -> Result<(), BackendError> {
    let dir = params.output.parent().unwrap_or_else(|| Path::new("."));
    let target_name = params
        .output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp_file = dir.join(format!(".{}-{}.tmp", target_name, Uuid::new_v4()));

    let result = transformer
        .transform(&params.with_output(&tmp_file))
        .and_then(|()| fs::rename(&tmp_file, &params.output).map_err(BackendError::Io));

    if result.is_err() && tmp_file.exists() {
        let _ = fs::remove_file(&tmp_file);
    }
    result
}

/// Why an item cannot get a rendered preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceIssue {
    NoImage,
    Unreadable(String),
}

/// Find items whose primary image is absent or cannot be decoded.
///
/// Decoding is tested with `transformer`; a transformer that cannot identify
/// images at all reports only absent sources.
pub fn audit<'a, T: ImageTransformer + ?Sized>(
    items: &'a [Item],
    transformer: &T,
) -> Vec<(&'a Item, SourceIssue)> {
    items
        .iter()
        .filter_map(|item| {
            let Some(image) = &item.primary_image else {
                return Some((item, SourceIssue::NoImage));
            };
            match transformer.identify(image) {
                Ok(_) | Err(BackendError::Unavailable(_)) => None,
                Err(e) => Some((item, SourceIssue::Unreadable(e.to_string()))),
            }
        })
        .collect()
}

/// Tally of preview outcomes over a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PreviewStats {
    pub fresh: u32,
    pub generated: u32,
    pub copied: u32,
    pub missing: u32,
    pub failed: u32,
}

impl PreviewStats {
    pub fn record(&mut self, outcome: &PreviewOutcome) {
        match outcome {
            PreviewOutcome::Fresh(_) => self.fresh += 1,
            PreviewOutcome::Generated(_) => self.generated += 1,
            PreviewOutcome::Copied(_) => self.copied += 1,
            PreviewOutcome::Missing => self.missing += 1,
            PreviewOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.fresh + self.generated + self.copied + self.missing + self.failed
    }
}

impl<'a> FromIterator<&'a PreviewOutcome> for PreviewStats {
    fn from_iter<I: IntoIterator<Item = &'a PreviewOutcome>>(iter: I) -> Self {
        let mut stats = Self::default();
        for outcome in iter {
            stats.record(outcome);
        }
        stats
    }
}

impl fmt::Display for PreviewStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fresh, {} generated, {} copied",
            self.fresh, self.generated, self.copied
        )?;
        if self.missing > 0 {
            write!(f, ", {} missing", self.missing)?;
        }
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        write!(f, " ({} total)", self.total())
    }
}

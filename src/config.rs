//! Shop configuration module.
//!
//! Handles loading, validating, and layering configuration. Values come from
//! three layers, each overriding the one before:
//!
//! 1. Stock defaults ([`Config::default`])
//! 2. `gallery-shop.toml` in the working directory (or the file given with `--config`)
//! 3. Command-line flags / `GALLERY_*` environment variables ([`Overrides`])
//!
//! The resolved [`Config`] is immutable from then on: it is handed to the
//! catalog and preview cache at construction time.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! root = "shop"             # Catalog root directory
//! default_price = 25.0      # Used when an item has no price.txt
//! currency = "USD"          # ISO code, passed through to consumers
//!
//! [preview]
//! max_width = 900           # Bounding box for previews
//! max_height = 900
//! quality = 82              # JPEG quality (1-100)
//! allow_upscale = false     # Enlarge sources smaller than the box
//! transform = true          # false = previews are verbatim copies
//!
//! [processing]
//! max_processes = 4         # Parallel preview workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const CONFIG_FILENAME: &str = "gallery-shop.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Shop configuration.
///
/// All fields have defaults; config files only specify what they override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Catalog root directory.
    pub root: PathBuf,
    /// Price applied to items without a usable `price.txt`.
    pub default_price: f64,
    /// Currency code. Not interpreted, only passed through.
    pub currency: String,
    /// Preview rendering settings.
    pub preview: PreviewConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("shop"),
            default_price: 25.0,
            currency: "USD".to_string(),
            preview: PreviewConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_price.is_finite() || self.default_price < 0.0 {
            return Err(ConfigError::Validation(
                "default_price must be a non-negative number".into(),
            ));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Validation(format!(
                "currency must be a three-letter code, got '{}'",
                self.currency
            )));
        }
        if self.preview.max_width == 0 || self.preview.max_height == 0 {
            return Err(ConfigError::Validation(
                "preview.max_width and preview.max_height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.preview.quality) {
            return Err(ConfigError::Validation(
                "preview.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// Apply command-line / environment overrides on top of file values.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(root) = &overrides.root {
            self.root = root.clone();
        }
        if let Some(price) = overrides.default_price {
            self.default_price = price;
        }
        if let Some(currency) = &overrides.currency {
            self.currency = currency.clone();
        }
        if let Some(w) = overrides.max_width {
            self.preview.max_width = w;
        }
        if let Some(h) = overrides.max_height {
            self.preview.max_height = h;
        }
        if overrides.no_transform {
            self.preview.transform = false;
        }
    }
}

/// Preview rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Enlarge sources smaller than the bounding box.
    pub allow_upscale: bool,
    /// Use the resizing transformer when available. `false` forces copies.
    pub transform: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_width: 900,
            max_height: 900,
            quality: 82,
            allow_upscale: false,
            transform: true,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel preview workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Values supplied on the command line or through `GALLERY_*` variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub default_price: Option<f64>,
    pub currency: Option<String>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub no_transform: bool,
}

// =============================================================================
// Layering: stock defaults <- gallery-shop.toml <- overrides
// =============================================================================

/// Overlay the keys a user file sets onto the stock defaults.
///
/// Only `[preview]` and `[processing]` are nested, so a file that sets
/// `preview.quality` alone keeps the stock `preview.max_width`. Any other
/// value in `file` replaces the stock one.
pub fn merge_toml(defaults: toml::Value, file: toml::Value) -> toml::Value {
    match (defaults, file) {
        (toml::Value::Table(mut table), toml::Value::Table(set_keys)) => {
            for (key, value) in set_keys {
                let merged = match table.remove(&key) {
                    Some(stock) => merge_toml(stock, value),
                    None => value,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, file) => file,
    }
}

/// Parse the config file, if there is one to read.
///
/// An implicit `gallery-shop.toml` that does not exist is simply no layer;
/// a path named with `--config` must exist.
fn read_file_layer(path: &Path, explicit: bool) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        if explicit {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", path.display()),
            )));
        }
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Resolve the full configuration: defaults, then file, then overrides.
///
/// Overrides are applied after deserialization, so they are checked by the
/// same [`Config::validate`] pass as file values.
pub fn load_config(
    path: &Path,
    explicit: bool,
    overrides: &Overrides,
) -> Result<Config, ConfigError> {
    let stock = toml::Value::try_from(Config::default())?;
    let layered = match read_file_layer(path, explicit)? {
        Some(file) => merge_toml(stock, file),
        None => stock,
    };
    let mut config: Config = layered.try_into()?;
    config.apply(overrides);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# gallery-shop configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags and GALLERY_* environment variables override this file.
# Unknown keys will cause an error.

# Catalog root: <root>/<category>/<item>/ (GALLERY_ROOT)
root = "shop"

# Price for items without a price.txt, or with one that does not parse
# (GALLERY_DEFAULT_PRICE)
default_price = 25.0

# Three-letter currency code, passed through untouched (GALLERY_CURRENCY)
currency = "USD"

# ---------------------------------------------------------------------------
# Previews: <item>/<item>.preview.jpg, regenerated when the source is newer
# ---------------------------------------------------------------------------
[preview]
# Bounding box in pixels. Aspect ratio is preserved, nothing is cropped.
# (GALLERY_PREVIEW_MAX_WIDTH / GALLERY_PREVIEW_MAX_HEIGHT)
max_width = 900
max_height = 900

# JPEG quality (1 = worst, 100 = best).
quality = 82

# Enlarge sources that are smaller than the bounding box.
allow_upscale = false

# Resize and re-encode previews. When false (or when no JPEG codec is
# available), previews are verbatim copies of the source.
transform = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel preview workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

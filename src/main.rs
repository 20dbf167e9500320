use clap::{Parser, Subcommand};
use gallery_shop::catalog::Catalog;
use gallery_shop::config::{self, Config, Overrides};
use gallery_shop::preview::{self, PreviewCache, PreviewOutcome};
use gallery_shop::scan::{self, Item};
use gallery_shop::{imaging, output};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gallery-shop")]
#[command(about = "Filesystem-backed product catalog with cached previews")]
#[command(long_about = "\
Filesystem-backed product catalog with cached previews

Directories are the database. Each category is a directory under the root,
each item a directory inside its category.

Catalog structure:

  shop/
  ├── art/                         # Category
  │   ├── rock01/                  # Item
  │   │   ├── rock01.jpg           # Primary image (else any .jpg in the item)
  │   │   ├── rock01.pdf           # Secondary assets: .png .tif .webp .pdf
  │   │   ├── description.txt      # Free text
  │   │   ├── price.txt            # Overrides the default price
  │   │   ├── sku.txt              # Overrides the derived SKU (art/rock01)
  │   │   └── rock01.preview.jpg   # Generated, bounded-size preview
  │   └── vase/
  └── prints/

Previews are regenerated only when the source image is newer.

Run 'gallery-shop gen-config' to generate a documented gallery-shop.toml.")]
#[command(version)]
struct Cli {
    /// Config file [default: ./gallery-shop.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog root directory
    #[arg(long, env = "GALLERY_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Price for items without a price.txt
    #[arg(long, env = "GALLERY_DEFAULT_PRICE", global = true)]
    default_price: Option<f64>,

    /// Three-letter currency code
    #[arg(long, env = "GALLERY_CURRENCY", global = true)]
    currency: Option<String>,

    /// Preview bounding box width in pixels
    #[arg(long, env = "GALLERY_PREVIEW_MAX_WIDTH", global = true)]
    max_width: Option<u32>,

    /// Preview bounding box height in pixels
    #[arg(long, env = "GALLERY_PREVIEW_MAX_HEIGHT", global = true)]
    max_height: Option<u32>,

    /// Copy sources verbatim instead of resizing them
    #[arg(long, global = true)]
    no_transform: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List discovered categories and items
    Scan,
    /// Print the resolved catalog as JSON
    Build {
        /// Write the JSON to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Bring every item's preview up to date
    Previews,
    /// Report items without a usable primary image
    Check,
    /// Print a stock gallery-shop.toml with all options documented
    GenConfig,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            default_price: self.default_price,
            currency: self.currency.clone(),
            max_width: self.max_width,
            max_height: self.max_height,
            no_transform: self.no_transform,
        }
    }

    fn load_config(&self) -> Result<Config, config::ConfigError> {
        match &self.config {
            Some(path) => config::load_config(path, true, &self.overrides()),
            None => config::load_config(
                &PathBuf::from(config::CONFIG_FILENAME),
                false,
                &self.overrides(),
            ),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = cli.load_config()?;
    info!(root = %config.root.display(), "configuration loaded");

    match &cli.command {
        Command::Scan => {
            let items = scan::scan(&config.root);
            output::print_scan_output(&items);
        }
        Command::Build { output: target } => {
            let catalog = Catalog::load(&config);
            let json = serde_json::to_string_pretty(&catalog)?;
            match target {
                Some(path) => {
                    std::fs::write(path, json)?;
                    println!("Wrote {} items to {}", catalog.len(), path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Previews => {
            let items = scan::scan(&config.root);
            init_thread_pool(&config.processing);
            let cache = PreviewCache::new(
                imaging::detect_transformer(config.preview.transform),
                &config.preview,
            );
            info!(
                transformer = cache.transformer().name(),
                items = items.len(),
                with_image = items.iter().filter(|i| i.has_preview_source()).count(),
                "ensuring previews"
            );
            let results: Vec<(&Item, PreviewOutcome)> = items
                .par_iter()
                .map(|item| (item, cache.ensure_item_with_outcome(item)))
                .collect();
            output::print_preview_output(&results);
        }
        Command::Check => {
            println!("==> Checking {}", config.root.display());
            let items = scan::scan(&config.root);
            let issues = preview::audit(&items, &imaging::detect_transformer(true));
            output::print_check_output(items.len(), &issues);
            if !issues.is_empty() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => unreachable!("handled before config loading"),
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

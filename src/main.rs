use clap::{Parser, Subcommand};
use showcase::component::BuiltinModules;
use showcase::content::{ContentSource, FileContentSource};
use showcase::generate::{self, DEFAULT_SCREEN_WIDTH};
use showcase::preload::PreloadCache;
use showcase::registry::Registry;
use showcase::resolver::Resolver;
use showcase::sort::SortMode;
use showcase::ssr::{SsrPayloadStore, SsrRegistry};
use showcase::{config, output};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "showcase")]
#[command(about = "Portfolio front-end renderer with SSR project showcases")]
#[command(long_about = "\
Portfolio front-end renderer with SSR project showcases

Renders the landing page and the dynamic student gallery from a content
directory exported from the CMS. Projects with content are pre-rendered and
enhanced on the client; the rest ship as client-only mount points.

Content structure:

  content/
  ├── config.toml            # Site config (optional)
  ├── gallery.json           # Student cards for the dynamic gallery
  ├── icons.json             # Inline SVG icons (optional)
  ├── colors.json            # Accent colors keyed by card alt text (optional)
  └── projects/
      ├── ice-scoop.json     # SSR content for the Ice Cream Scoop pane
      ├── rotary-lamp.json
      ├── data-visualization.json
      └── dynamic-frame.json

Run 'showcase gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the landing page and the dynamic gallery
    Render,
    /// Print the gallery in a given order
    Gallery {
        /// random, titleAsc or titleDesc (anything else is random)
        #[arg(long)]
        sort: Option<String>,
        /// Screen width used to pick the accent color
        #[arg(long, default_value_t = DEFAULT_SCREEN_WIDTH)]
        width: u32,
    },
    /// Show how one project would be rendered, and its markup
    Resolve {
        /// Project key: rotary, scoop, dataviz, game or dynamic
        key: String,
        /// Skip SSR payloads, as if none were prefetched
        #[arg(long)]
        no_ssr: bool,
    },
    /// Validate config and content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Render => {
            let config = config::load_config(&cli.source)?;
            let modules = Arc::new(BuiltinModules::new(config.hydration.clone()));
            println!("==> Rendering {} → {}", cli.source.display(), cli.output.display());
            let report = generate::generate(&cli.source, &cli.output, &config, modules).await?;
            output::print_generate_output(&report);
        }
        Command::Gallery { sort, width } => {
            let config = config::load_config(&cli.source)?;
            let mode = sort
                .as_deref()
                .map(SortMode::parse)
                .unwrap_or(config.gallery.default_sort);
            let source: Arc<dyn ContentSource> = Arc::new(FileContentSource::open(&cli.source)?);
            let cache = PreloadCache::new(Arc::clone(&source));
            let page = generate::build_gallery(source.as_ref(), cache, &config, mode, width).await;
            output::print_gallery_output(&page.items, mode, &page.accent);
        }
        Command::Resolve { key, no_ssr } => {
            let config = config::load_config(&cli.source)?;
            let registry = Arc::new(Registry::standard());
            let meta = registry.find(&key)?.meta.clone();
            let ssr = Arc::new(SsrRegistry::standard());
            let payloads = if no_ssr || !config.hydration.ssr {
                SsrPayloadStore::default()
            } else {
                prefetch(&cli.source, &ssr).await?
            };
            let modules = Arc::new(BuiltinModules::new(config.hydration.clone()));
            let resolver = Resolver::new(registry, ssr, modules);

            let payload = payloads.preloaded(meta.key);
            let strategy = resolver.plan(meta.key, payload)?;
            let loader = resolver.resolve_named(&key, payload)?;
            let markup = loader().await?.render().into_string();
            output::print_resolve_output(&meta, strategy, &markup);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let source: Arc<dyn ContentSource> = Arc::new(FileContentSource::open(&cli.source)?);
            let registry = Arc::new(Registry::standard());
            let ssr = Arc::new(SsrRegistry::standard());
            let payloads = if config.hydration.ssr {
                ssr.prefetch(source.as_ref()).await
            } else {
                SsrPayloadStore::default()
            };
            let modules = Arc::new(BuiltinModules::new(config.hydration.clone()));
            let resolver = Resolver::new(Arc::clone(&registry), ssr, modules);

            let mut projects = Vec::with_capacity(registry.len());
            for project in registry.iter() {
                let key = project.meta.key;
                projects.push((project.meta.clone(), resolver.plan(key, payloads.preloaded(key))?));
            }
            output::print_projects(&projects);

            // Check reads the gallery strictly; render degrades to empty
            let items = source.fetch_gallery().await?;
            println!("Gallery: {} items", items.len());
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

async fn prefetch(
    root: &Path,
    ssr: &SsrRegistry,
) -> Result<SsrPayloadStore, Box<dyn std::error::Error>> {
    let source = FileContentSource::open(root)?;
    Ok(ssr.prefetch(&source).await)
}

//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pagemill_core::{Catalog, PostFilter, fetch_document};
use pagemill_notion::{ClientOptions, NotionClient};
use pagemill_shared::{
    AppConfig, PageId, Profile, config_file_path, init_config, load_config, require_database_id,
    resolve_api_token,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pagemill — read a Notion-backed post catalog as JSON.
#[derive(Parser)]
#[command(
    name = "pagemill",
    version,
    about = "Read posts and nested document trees from a Notion-backed catalog.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Catalog database id (overrides notion.database_id from config).
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List post metadata, optionally filtered.
    Posts {
        /// Only posts in this category (repeatable).
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Only posts marked published.
        #[arg(long)]
        published_only: bool,

        /// Only featured posts.
        #[arg(long)]
        featured: bool,

        /// Sort newest first instead of oldest first.
        #[arg(long)]
        descending: bool,
    },

    /// Show one post's metadata by slug.
    Post {
        /// The post's URL slug.
        slug: String,
    },

    /// Assemble a page's document tree.
    Content {
        /// Page id (hyphenated or compact UUID).
        page_id: String,
    },

    /// Search posts by title.
    Search {
        /// Title substring to search for.
        query: String,
    },

    /// List the catalog's category options.
    Categories,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Create a default config file.
    Init,
    /// Print the effective configuration.
    Show,
    /// Print the config file path.
    Path,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pagemill=info",
        1 => "pagemill=debug",
        _ => "pagemill=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let database = cli.database.clone();
    match cli.command {
        Command::Posts {
            categories,
            published_only,
            featured,
            descending,
        } => {
            let filter = PostFilter {
                categories,
                only_published: published_only,
                featured,
                ascending: !descending,
            };
            cmd_posts(database.as_deref(), &filter).await
        }
        Command::Post { slug } => cmd_post(database.as_deref(), &slug).await,
        Command::Content { page_id } => cmd_content(&page_id).await,
        Command::Search { query } => cmd_search(database.as_deref(), &query).await,
        Command::Categories => cmd_categories(database.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Path => cmd_config_path(),
        },
    }
}

// ---------------------------------------------------------------------------
// Catalog context
// ---------------------------------------------------------------------------

/// Everything a catalog command needs: a client, the database id, the profile.
struct CatalogContext {
    client: NotionClient,
    database_id: String,
    profile: Profile,
}

fn catalog_context(database_flag: Option<&str>) -> Result<CatalogContext> {
    let config = load_config()?;
    let client = build_client(&config)?;
    let profile = config.profile()?;

    let database_id = match database_flag {
        Some(id) => id.to_string(),
        None => require_database_id(&config)?.to_string(),
    };

    Ok(CatalogContext {
        client,
        database_id,
        profile,
    })
}

fn build_client(config: &AppConfig) -> Result<NotionClient> {
    let token = resolve_api_token(config)?;
    Ok(NotionClient::new(
        &token,
        ClientOptions::from(&config.notion),
    )?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_posts(database: Option<&str>, filter: &PostFilter) -> Result<()> {
    let ctx = catalog_context(database)?;
    let catalog = Catalog::new(&ctx.client, &ctx.database_id, ctx.profile);

    info!(
        categories = filter.categories.len(),
        published_only = filter.only_published,
        featured = filter.featured,
        "listing posts"
    );

    let posts = catalog.list(filter).await?;
    print_json(&posts)
}

async fn cmd_post(database: Option<&str>, slug: &str) -> Result<()> {
    let ctx = catalog_context(database)?;
    let catalog = Catalog::new(&ctx.client, &ctx.database_id, ctx.profile);

    info!(slug, "looking up post");

    let post = catalog.by_slug(slug).await?;
    print_json(&post)
}

async fn cmd_content(page_id: &str) -> Result<()> {
    let config = load_config()?;
    let client = build_client(&config)?;
    let page_id = PageId::parse(page_id)?;

    info!(%page_id, "assembling document");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message("Assembling document…");

    let result = fetch_document(&client, &page_id).await;
    spinner.finish_and_clear();

    print_json(&result?)
}

async fn cmd_search(database: Option<&str>, query: &str) -> Result<()> {
    let ctx = catalog_context(database)?;
    let catalog = Catalog::new(&ctx.client, &ctx.database_id, ctx.profile);

    info!(query, "searching posts");

    let posts = catalog.search(query).await?;
    print_json(&posts)
}

async fn cmd_categories(database: Option<&str>) -> Result<()> {
    let ctx = catalog_context(database)?;
    let catalog = Catalog::new(&ctx.client, &ctx.database_id, ctx.profile);

    let categories = catalog.categories().await?;
    print_json(&categories)
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_path() -> Result<()> {
    println!("{}", config_file_path()?.display());
    Ok(())
}

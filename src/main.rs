//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::commands::check::Format;
use folio::commands::new::NewDocument;
use folio::content::DocumentKind;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Read and validate EDN front-matter markdown content", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Validate every post and page
    #[command(alias = "c")]
    Check {
        /// Report format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Fail on warnings as well as errors
        #[arg(long)]
        deny_warnings: bool,

        /// Re-check whenever content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List site content
    List {
        /// Type of content to list (post, page, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Show a document's metadata and outline
    Show {
        /// Document to show
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite metadata blocks in canonical form
    Fmt {
        /// Documents to format
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Report files that would change without writing them
        #[arg(long)]
        check: bool,
    },

    /// Create a new post or page
    New {
        /// Title of the new document
        title: String,

        /// Kind of document (post, page)
        #[arg(short, long, default_value = "post")]
        kind: String,

        /// Layout to use (defaults to the kind)
        #[arg(short, long)]
        layout: Option<String>,

        /// Post tag, may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Page ordering index
        #[arg(short = 'i', long)]
        page_index: Option<u64>,

        /// Hide the page from navigation
        #[arg(long)]
        no_navbar: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::Check {
            format,
            deny_warnings,
            watch,
        } => {
            let site = folio::Folio::new(&base_dir)?;
            let passed = folio::commands::check::run(&site, format, deny_warnings)?;

            if watch {
                folio::commands::check::watch(&site, format, deny_warnings).await?;
            } else if !passed {
                anyhow::bail!("Content check failed");
            }
        }

        Commands::List { r#type } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type)?;
        }

        Commands::Show { file, json } => {
            let site = folio::Folio::new(&base_dir)?;
            let path = base_dir.join(file);
            folio::commands::show::run(&site, &path, json)?;
        }

        Commands::Fmt { files, check } => {
            let site = folio::Folio::new(&base_dir)?;
            let paths: Vec<PathBuf> = files.into_iter().map(|f| base_dir.join(f)).collect();
            let changed = folio::commands::fmt::run(&site, &paths, check)?;
            if check && !changed.is_empty() {
                anyhow::bail!("{} file(s) need formatting", changed.len());
            }
        }

        Commands::New {
            title,
            kind,
            layout,
            tags,
            page_index,
            no_navbar,
        } => {
            let site = folio::Folio::new(&base_dir)?;
            let kind = match kind.as_str() {
                "post" => DocumentKind::Post,
                "page" => DocumentKind::Page,
                _ => anyhow::bail!("Unknown kind: {}. Available: post, page", kind),
            };

            tracing::info!("Creating new {} with title: {}", kind, title);
            let mut options = NewDocument::new(&title, kind);
            options.layout = layout;
            options.tags = tags;
            options.page_index = page_index;
            options.navbar = !no_navbar;

            let path = site.new_document(&options)?;
            println!("Created: {:?}", path);
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

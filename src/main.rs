//! books-crawler - category-by-category product crawler.

use anyhow::Result;
use books_crawler::commands::{CategoriesCommand, CrawlCommand, ProductCommand};
use books_crawler::config::{Config, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "books-crawler",
    version,
    about = "Crawl the books.toscrape.com catalogue into one CSV per category"
)]
struct Cli {
    /// Site root (defaults to http://books.toscrape.com/)
    #[arg(long, global = true, env = "BOOKS_BASE_URL")]
    base_url: Option<String>,

    /// Directory receiving the output files
    #[arg(short, long, global = true, env = "BOOKS_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "BOOKS_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every category and write one file each
    #[command(alias = "c")]
    Crawl {
        /// Also download product images into per-category folders
        #[arg(long)]
        images: bool,

        /// Only crawl these categories (comma-separated, case-insensitive)
        #[arg(long = "category", value_delimiter = ',')]
        categories: Option<Vec<String>>,

        /// Log and skip failed products/categories instead of aborting
        #[arg(long)]
        skip_failed: bool,
    },

    /// List the categories found on the index page
    Categories,

    /// Extract a single product page
    #[command(alias = "p")]
    Product {
        /// Product page URL (absolute or relative to the base URL)
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(base) = cli.base_url {
        config.set_base_url(&base)?;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Crawl { images, categories, skip_failed } => {
            config.download_images |= images;
            config.skip_failed |= skip_failed;
            if let Some(categories) = categories {
                config.categories = categories;
            }

            let summary = CrawlCommand::new(config).execute().await?;
            println!("{}", summary);

            if summary.failed().next().is_some() {
                anyhow::bail!("Some categories produced no output");
            }
        }

        Commands::Categories => {
            let output = CategoriesCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Product { url } => {
            let output = ProductCommand::new(config).execute(&url).await?;
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
    }

    Ok(())
}

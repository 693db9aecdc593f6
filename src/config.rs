//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Public catalogue the crawler is built for.
pub const DEFAULT_BASE_URL: &str = "http://books.toscrape.com/";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site root every relative link is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Index page holding the category navigation, relative to `base_url`
    #[serde(default = "default_index_path")]
    pub index_path: String,

    /// Directory receiving one output file (or folder) per category
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Download product images next to the category output
    #[serde(default)]
    pub download_images: bool,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Only crawl categories with these names (case-insensitive); empty means all
    #[serde(default)]
    pub categories: Vec<String>,

    /// Log and skip failed products/categories instead of aborting the run
    #[serde(default)]
    pub skip_failed: bool,

    /// Which in-page element provides the diagnostic category
    #[serde(default)]
    pub category_source: CategorySource,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn default_index_path() -> String {
    "index.html".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            index_path: default_index_path(),
            output_dir: default_output_dir(),
            download_images: false,
            format: OutputFormat::Csv,
            proxy: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            categories: Vec::new(),
            skip_failed: false,
            category_source: CategorySource::Breadcrumb,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.base_url = normalize_base(config.base_url);
        Ok(config)
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("books-crawler.toml");
        if local_config.exists() {
            debug!("Found books-crawler.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("books-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base) = std::env::var("BOOKS_BASE_URL") {
            if let Ok(url) = Url::parse(&base) {
                self.base_url = normalize_base(url);
            }
        }

        if let Ok(dir) = std::env::var("BOOKS_OUTPUT_DIR") {
            if !dir.is_empty() {
                self.output_dir = PathBuf::from(dir);
            }
        }

        if let Ok(proxy) = std::env::var("BOOKS_PROXY") {
            self.proxy = Some(proxy);
        }

        self
    }

    /// Replaces the base URL, keeping the trailing-slash invariant.
    pub fn set_base_url(&mut self, base: &str) -> Result<()> {
        let url = Url::parse(base).with_context(|| format!("Invalid base URL: {}", base))?;
        self.base_url = normalize_base(url);
        Ok(())
    }

    /// Absolute URL of the index page.
    pub fn index_url(&self) -> Result<Url> {
        self.base_url
            .join(&self.index_path)
            .with_context(|| format!("Invalid index path: {}", self.index_path))
    }

    /// Returns true when `name` passes the category filter.
    pub fn wants_category(&self, name: &str) -> bool {
        let name = name.trim();
        self.categories.is_empty()
            || self.categories.iter().any(|wanted| wanted.trim().eq_ignore_ascii_case(name))
    }
}

/// `Url::join` drops the last path segment unless the base ends in a slash.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Output format for per-category files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// File extension used for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use: csv, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// In-page element read for the (diagnostic) category field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    /// Third link of the breadcrumb trail
    #[default]
    Breadcrumb,
    /// Anchor pointing at the top-level books category
    BooksAnchor,
}

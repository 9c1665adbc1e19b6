//! Application configuration. API endpoint, rate limits, paths.

use serde::Deserialize;

/// Default MediaWiki API endpoint (English Wikipedia).
pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Maximum titles per `prop=revisions` request accepted by the API for regular clients.
pub const API_PAGE_REQUEST_LIMIT: usize = 50;

/// Separator for category lists in config and prompts. MediaWiki titles cannot contain `|`.
pub const CATEGORY_SEPARATOR: char = '|';

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// MediaWiki API endpoint. Read from TALK_GRAPH_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// User-Agent sent with every request (Wikimedia requires a descriptive one).
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Categories to scrape, `|`-separated (e.g. "Category:Epidemics|Category:Viral diseases").
    /// When unset the TUI prompts for them.
    #[serde(default)]
    pub categories: Option<String>,

    /// Output directory for graph files and archives. Read from TALK_GRAPH_OUTPUT_DIR.
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Titles per page-content request (1..=50).
    #[serde(default)]
    pub page_batch_size: Option<usize>,

    /// Max in-flight API requests per stage.
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// Delay in ms before each API request (rate limiting). Read from TALK_GRAPH_REQUEST_DELAY_MS.
    #[serde(default)]
    pub request_delay_ms: Option<u64>,

    /// Retries for 429/5xx responses before giving up.
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Keep raw wikitext as JSONL under `<output_dir>/pages`.
    #[serde(default)]
    pub archive_pages: Option<bool>,

    /// Number of most active users listed in the summary.
    #[serde(default)]
    pub top_users: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TALK_GRAPH").try_parsing(true));
        if let Ok(path) = std::env::var("TALK_GRAPH_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let cfg: Self = c.build()?.try_deserialize()?;
        Ok(cfg)
    }

    pub fn api_url_or_default(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn user_agent_or_default(&self) -> String {
        self.user_agent.clone().unwrap_or_else(|| {
            format!(
                "{}/{} (social graph research)",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            )
        })
    }

    /// Configured categories, trimmed, empty entries dropped.
    pub fn categories_list(&self) -> Vec<String> {
        self.categories
            .as_deref()
            .map(split_categories)
            .unwrap_or_default()
    }

    pub fn output_dir_or_default(&self) -> String {
        self.output_dir.clone().unwrap_or_else(|| "./output".to_string())
    }

    /// Returns the page batch size clamped to 1..=50. Defaults to 50.
    pub fn page_batch_size_or_default(&self) -> usize {
        self.page_batch_size
            .unwrap_or(API_PAGE_REQUEST_LIMIT)
            .clamp(1, API_PAGE_REQUEST_LIMIT)
    }

    /// Returns max concurrency (at least 1). Defaults to 8.
    pub fn max_concurrency_or_default(&self) -> usize {
        self.max_concurrency.unwrap_or(8).max(1)
    }

    /// Returns request delay in milliseconds. Defaults to 0.
    pub fn request_delay_ms_or_default(&self) -> u64 {
        self.request_delay_ms.unwrap_or(0)
    }

    /// Returns max retries. Defaults to 3.
    pub fn max_retries_or_default(&self) -> u32 {
        self.max_retries.unwrap_or(3)
    }

    pub fn archive_pages_or_default(&self) -> bool {
        self.archive_pages.unwrap_or(false)
    }

    /// Returns the summary's top-user count. Defaults to 10.
    pub fn top_users_or_default(&self) -> usize {
        self.top_users.unwrap_or(10)
    }
}

/// Split a `|`-separated category list. Adds the `Category:` namespace when missing.
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(CATEGORY_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with("Category:") {
                s.to_string()
            } else {
                format!("Category:{}", s)
            }
        })
        .collect()
}

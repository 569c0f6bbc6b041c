use serde::Deserialize;

/// Main configuration structure for a crawl run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerSettings,
    pub output: OutputSettings,
    #[serde(default)]
    pub budget: BudgetSettings,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// User agent sent on the first fetch attempt
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Browser-like user agent used on the retry after a blocked response
    #[serde(rename = "browser-user-agent", default = "default_browser_user_agent")]
    pub browser_user_agent: String,

    /// Per-attempt fetch timeout in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Politeness delay applied before each request (milliseconds)
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,

    /// Maximum number of sources collected concurrently
    #[serde(rename = "max-concurrent-sources", default = "default_concurrency")]
    pub max_concurrent_sources: u32,

    /// Whether the rich article-extraction tier is available for this run
    #[serde(rename = "rich-extraction", default = "default_rich_extraction")]
    pub rich_extraction: bool,
}

fn default_rich_extraction() -> bool {
    true
}

fn default_browser_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        .to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_concurrency() -> u32 {
    1
}

/// Output location configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// Root directory for processed document files
    #[serde(rename = "corpus-dir")]
    pub corpus_dir: String,

    /// Path to the append-only JSONL metadata index
    #[serde(rename = "index-path")]
    pub index_path: String,
}

/// Collection budget configuration
///
/// `scope` decides whether one budget is shared by every source in the run
/// or each source gets a fresh copy of these limits.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetSettings {
    #[serde(rename = "target-bytes", default = "default_target_bytes")]
    pub target_bytes: u64,

    #[serde(rename = "max-items", default = "default_max_items")]
    pub max_items: u64,

    #[serde(default)]
    pub scope: BudgetScope,
}

fn default_target_bytes() -> u64 {
    20_000_000_000
}

fn default_max_items() -> u64 {
    100_000
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            target_bytes: default_target_bytes(),
            max_items: default_max_items(),
            scope: BudgetScope::default(),
        }
    }
}

/// Whether budget counters are shared across the run or reset per source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetScope {
    #[default]
    Global,
    PerSource,
}

/// A named category holding an ordered list of sources
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: String,

    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// A single crawlable source within a category
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Stable identifier used in file names and metadata records
    pub key: String,

    /// Human-readable name
    pub name: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// RSS feed URL; takes precedence over `html_index` when both are set
    pub rss: Option<String>,

    /// HTML index (listing) page URL
    #[serde(rename = "html-index")]
    pub html_index: Option<String>,

    /// Regex an absolute candidate URL must match to be crawled
    #[serde(rename = "link-regex")]
    pub link_regex: String,

    /// Cap on candidates collected from this source per run
    #[serde(rename = "max-index", default = "default_max_index")]
    pub max_index: usize,

    /// Pagination policy for the HTML index, if any
    pub paginate: Option<Pagination>,
}

fn default_enabled() -> bool {
    true
}

fn default_max_index() -> usize {
    50
}

/// Pagination policy for paginated HTML indexes
///
/// Only the `query` mode exists: the page number is appended to the index URL
/// as a `param=page` query pair.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub mode: String,

    #[serde(default = "default_page_param")]
    pub param: String,

    #[serde(default = "default_page_start")]
    pub start: u32,

    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    #[serde(rename = "stop-on-empty", default = "default_stop_on_empty")]
    pub stop_on_empty: bool,
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_page_start() -> u32 {
    1
}

fn default_max_pages() -> u32 {
    1
}

fn default_stop_on_empty() -> bool {
    true
}

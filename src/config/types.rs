use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Production endpoint of the Seoul Open Data Plaza API
pub const DEFAULT_BASE_URL: &str = "http://openapi.seoul.go.kr:8088";

/// Upstream maximum rows per call
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarvestConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Upstream endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Scheme, host and port of the API, without a trailing slash
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Response format path segment; only `json` is understood
    #[serde(default = "default_format")]
    pub format: String,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per request, including the first
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Base of the linear retry backoff, in seconds
    #[serde(rename = "retry-delay-secs", default = "default_retry_delay_secs")]
    pub retry_delay_secs: f64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Pagination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PagingConfig {
    /// Rows requested per catalog page
    #[serde(rename = "catalog-page-size", default = "default_catalog_page_size")]
    pub catalog_page_size: u64,

    /// Rows requested per IO-parameter page
    #[serde(rename = "io-page-size", default = "default_io_page_size")]
    pub io_page_size: u64,

    /// Pause between successive calls, in seconds
    #[serde(rename = "delay-secs", default = "default_delay_secs")]
    pub delay_secs: f64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving all output files
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// File stem for the catalog dataset
    #[serde(rename = "catalog-stem", default = "default_catalog_stem")]
    pub catalog_stem: String,

    /// File stem for the IO-parameter dataset
    #[serde(rename = "io-stem", default = "default_io_stem")]
    pub io_stem: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Must only be called on a validated config
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay_secs)
    }
}

impl PagingConfig {
    /// Must only be called on a validated config
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs)
    }
}

impl OutputConfig {
    pub fn catalog_path(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.catalog_stem, extension))
    }

    pub fn io_path(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.io_stem, extension))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            format: default_format(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            catalog_page_size: default_catalog_page_size(),
            io_page_size: default_io_page_size(),
            delay_secs: default_delay_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            catalog_stem: default_catalog_stem(),
            io_stem: default_io_stem(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> f64 {
    0.6
}

fn default_user_agent() -> String {
    format!("seoul-catalog-harvester/{}", env!("CARGO_PKG_VERSION"))
}

fn default_catalog_page_size() -> u64 {
    MAX_PAGE_SIZE
}

fn default_io_page_size() -> u64 {
    200
}

fn default_delay_secs() -> f64 {
    0.25
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_catalog_stem() -> String {
    "seoul_catalog".to_string()
}

fn default_io_stem() -> String {
    "seoul_io_params".to_string()
}

use crate::api::{CATALOG_SERVICE, IO_VALUE_SERVICE};
use crate::config::ApiConfig;
use std::fmt;

/// Optional narrowing of the catalog listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Restrict the listing to one service identifier
    pub service_filter: Option<String>,

    /// Free-text keyword matched by the upstream
    pub keyword: Option<String>,
}

impl CatalogQuery {
    /// Trailing path segments, before encoding
    ///
    /// A keyword without a filter still needs the filter slot, left empty.
    fn segments(&self) -> Vec<String> {
        let filter = self.service_filter.as_deref().unwrap_or("");
        let keyword = self.keyword.as_deref().unwrap_or("");

        let mut segments = Vec::new();
        if !filter.is_empty() || !keyword.is_empty() {
            segments.push(filter.to_string());
        }
        if !keyword.is_empty() {
            segments.push(keyword.to_string());
        }
        segments
    }
}

/// One page request against the upstream
///
/// Renders as
/// `{base}/{key}/{format}/{service}/{start}/{end}/[{segment}/...]`
/// with the key and every trailing segment percent-encoded.
#[derive(Clone, PartialEq, Eq)]
pub struct PageRequest {
    base_url: String,
    key: String,
    format: String,
    service: &'static str,
    start: u64,
    end: u64,
    segments: Vec<String>,
}

impl PageRequest {
    /// Builds a catalog request for rows `start..=end` (1-based)
    pub fn catalog(api: &ApiConfig, key: &str, start: u64, end: u64, query: &CatalogQuery) -> Self {
        Self::new(api, key, CATALOG_SERVICE, start, end, query.segments())
    }

    /// Builds an IO-parameter request for rows `start..=end` of one service
    pub fn io_values(api: &ApiConfig, key: &str, start: u64, end: u64, service_id: &str) -> Self {
        Self::new(
            api,
            key,
            IO_VALUE_SERVICE,
            start,
            end,
            vec![service_id.to_string()],
        )
    }

    fn new(
        api: &ApiConfig,
        key: &str,
        service: &'static str,
        start: u64,
        end: u64,
        segments: Vec<String>,
    ) -> Self {
        Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            format: api.format.clone(),
            service,
            start,
            end,
            segments,
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Trailing segments after the row window, unencoded
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The URL to send, including the API key
    pub fn url(&self) -> String {
        self.render(&urlencoding::encode(&self.key))
    }

    /// The URL with the API key masked, for logs and error messages
    pub fn redacted_url(&self) -> String {
        self.render("***")
    }

    fn render(&self, key: &str) -> String {
        let mut url = format!(
            "{}/{}/{}/{}/{}/{}/",
            self.base_url, key, self.format, self.service, self.start, self.end
        );
        for segment in &self.segments {
            url.push_str(&urlencoding::encode(segment));
            url.push('/');
        }
        url
    }
}

// Debug must not leak the key either
impl fmt::Debug for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRequest")
            .field("url", &self.redacted_url())
            .finish()
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted_url())
    }
}

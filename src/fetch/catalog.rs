//! Catalog fetcher

use crate::api::{CatalogQuery, PageRequest};
use crate::config::HarvestConfig;
use crate::fetch::{paginate, RejectionPolicy, Transport};
use crate::{Record, Result};

/// Fetches every catalog row, page by page
///
/// Any non-success result code aborts the fetch with `HarvestError::Api`;
/// transport failures surface once the transport gives up.
///
/// # Arguments
///
/// * `transport` - Where requests are sent
/// * `config` - Validated configuration (endpoint, page size, delay)
/// * `key` - Upstream API key
/// * `query` - Optional catalog filters
pub async fn fetch_full_catalog<T: Transport>(
    transport: &T,
    config: &HarvestConfig,
    key: &str,
    query: &CatalogQuery,
) -> Result<Vec<Record>> {
    let rows = paginate(
        transport,
        config.paging.catalog_page_size,
        config.paging.delay(),
        RejectionPolicy::Fail,
        |start, end| PageRequest::catalog(&config.api, key, start, end, query),
    )
    .await?;

    tracing::info!("Catalog rows: {}", rows.len());
    Ok(rows)
}

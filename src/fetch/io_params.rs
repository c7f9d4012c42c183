//! IO-parameter fetcher
//!
//! Many services expose no IO metadata, and the upstream reports that with an
//! error-shaped response rather than an empty one. Every non-success result
//! code therefore means "no rows" here. Transport failures still propagate.

use crate::api::PageRequest;
use crate::config::HarvestConfig;
use crate::fetch::{paginate, RejectionPolicy, Transport};
use crate::ids::ServiceId;
use crate::{Record, Result};
use serde_json::Value;

/// Field added to every IO-parameter row naming the service it describes
pub const SERVICE_ID_FIELD: &str = "_service_id";

/// Fetches the IO-parameter rows of one service
pub async fn fetch_io_params<T: Transport>(
    transport: &T,
    config: &HarvestConfig,
    key: &str,
    service_id: &ServiceId,
) -> Result<Vec<Record>> {
    paginate(
        transport,
        config.paging.io_page_size,
        config.paging.delay(),
        RejectionPolicy::TreatAsEmpty,
        |start, end| PageRequest::io_values(&config.api, key, start, end, service_id.as_str()),
    )
    .await
}

/// Tags each row with its originating service, after the upstream fields
pub fn tag_service_id(rows: &mut [Record], service_id: &ServiceId) {
    for row in rows {
        row.insert(
            SERVICE_ID_FIELD.to_string(),
            Value::String(service_id.to_string()),
        );
    }
}

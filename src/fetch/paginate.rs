//! Offset pagination shared by both fetchers

use crate::api::{normalize, PageRequest};
use crate::fetch::Transport;
use crate::{HarvestError, Record, Result};
use std::time::Duration;

/// What to do when a page carries a non-success result code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionPolicy {
    /// Abort the fetch with `HarvestError::Api`
    Fail,

    /// Abandon the fetch and report no rows
    TreatAsEmpty,
}

/// Requests windows of `page_size` rows until the data is exhausted
///
/// `request_for(start, end)` builds the request for the 1-based inclusive
/// window. The loop ends when a page has no rows, or when the accumulated row
/// count reaches the first total the upstream reported. Later totals are not
/// used. `delay` is slept between successive requests.
pub async fn paginate<T, F>(
    transport: &T,
    page_size: u64,
    delay: Duration,
    policy: RejectionPolicy,
    mut request_for: F,
) -> Result<Vec<Record>>
where
    T: Transport,
    F: FnMut(u64, u64) -> PageRequest,
{
    let page_size = page_size.max(1);
    let mut rows: Vec<Record> = Vec::new();
    let mut total: Option<u64> = None;
    let mut start = 1;

    loop {
        let end = start + page_size - 1;
        let request = request_for(start, end);
        tracing::debug!("Requesting {}", request);

        let document = transport.get_json(&request).await?;
        let page = normalize(&document);

        if page.is_rejection() {
            let code = page.code.unwrap_or_default();
            let message = page.message.unwrap_or_default();
            match policy {
                RejectionPolicy::Fail => {
                    return Err(HarvestError::Api {
                        code,
                        message,
                        url: request.redacted_url(),
                    });
                }
                RejectionPolicy::TreatAsEmpty => {
                    tracing::debug!("{} answered {} {}; no rows", request, code, message);
                    return Ok(Vec::new());
                }
            }
        }

        match (total, page.total) {
            (None, reported) => total = reported,
            (Some(known), Some(reported)) if known != reported => {
                tracing::warn!(
                    "{} reported total {} but {} was reported first; keeping {}",
                    request,
                    reported,
                    known,
                    known
                );
            }
            _ => {}
        }

        if page.rows.is_empty() {
            break;
        }
        rows.extend(page.rows);

        if total.is_some_and(|total| rows.len() as u64 >= total) {
            break;
        }

        start = end + 1;
        tokio::time::sleep(delay).await;
    }

    Ok(rows)
}

//! Fetching: transport, pagination and the two upstream fetchers
//!
//! All requests are issued one at a time. A fetch owns its accumulator and
//! returns it whole; nothing is shared between fetches.

mod catalog;
mod io_params;
mod paginate;
mod transport;

pub use catalog::fetch_full_catalog;
pub use io_params::{fetch_io_params, tag_service_id, SERVICE_ID_FIELD};
pub use paginate::{paginate, RejectionPolicy};
pub use transport::{build_http_client, Exhausted, HttpTransport, RetryPolicy, Transport};

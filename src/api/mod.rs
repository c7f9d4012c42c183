//! Upstream wire contract for the Seoul Open Data Plaza API
//!
//! This module knows the shape of request URLs and of response documents, and
//! nothing about how requests are sent.

mod normalize;
mod request;

pub use normalize::{normalize, NormalizedPage};
pub use request::{CatalogQuery, PageRequest};

/// Service listing every registered API
pub const CATALOG_SERVICE: &str = "SearchCatalogService";

/// Service describing one API's input and output fields
pub const IO_VALUE_SERVICE: &str = "SearchOpenAPIIOValueService";

/// Result code reported by a successful call
pub const SUCCESS_CODE: &str = "INFO-000";

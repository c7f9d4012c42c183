//! Service identifiers
//!
//! Every registered API has an identifier of the form `OA-<digits>`. The
//! catalog does not keep it in a fixed column, so identifiers are found by
//! scanning string fields.

use crate::Record;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// An `OA-<digits>` service identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// First identifier occurring anywhere in `text`
    pub fn find_in(text: &str) -> Option<Self> {
        service_id_pattern()
            .find(text)
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn service_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"OA-\d+").expect("service id pattern is valid"))
}

/// Collects the service identifiers referenced by catalog rows
///
/// Each row contributes at most one identifier: the first match in the first
/// string field (in field order) that has one. The result keeps first
/// occurrences only, in row order.
pub fn extract_service_ids(rows: &[Record]) -> Vec<ServiceId> {
    let mut seen = HashSet::new();

    rows.iter()
        .filter_map(first_service_id)
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

fn first_service_id(row: &Record) -> Option<ServiceId> {
    row.values()
        .filter_map(Value::as_str)
        .find_map(ServiceId::find_in)
}

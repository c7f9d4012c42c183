//! Response normalization
//!
//! Upstream wraps every result in an object keyed by the service name:
//!
//! ```text
//! { "SearchCatalogService": { "list_total_count": 2,
//!                             "RESULT": { "CODE": "INFO-000", "MESSAGE": "..." },
//!                             "row": [ {...}, {...} ] } }
//! ```
//!
//! Error responses are often flat (`{"RESULT": {...}}`) and single-row results
//! carry a bare object under `row`. [`normalize`] folds all of these into one
//! [`NormalizedPage`] and never fails.

use crate::api::SUCCESS_CODE;
use crate::Record;
use serde_json::{Map, Value};

/// Keys that mark an object as the service result
const RESULT_MARKERS: [&str; 3] = ["row", "RESULT", "list_total_count"];

/// One page of upstream output in a fixed shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPage {
    /// `list_total_count`, when present and numeric
    pub total: Option<u64>,

    /// `RESULT.CODE`, when present and non-empty
    pub code: Option<String>,

    /// `RESULT.MESSAGE`, when present
    pub message: Option<String>,

    /// Row records in upstream order
    pub rows: Vec<Record>,
}

impl NormalizedPage {
    /// True when the page carries a result code other than the success code
    pub fn is_rejection(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| code != SUCCESS_CODE)
    }
}

/// Maps a raw response document to a [`NormalizedPage`]
///
/// The service result is the first top-level value that is an object holding
/// any of `row`, `RESULT` or `list_total_count`. Without one, the document
/// itself is read as the result.
pub fn normalize(document: &Value) -> NormalizedPage {
    let Some(root) = document.as_object() else {
        return NormalizedPage::default();
    };

    let data = find_service_result(root).unwrap_or(root);
    let result = data.get("RESULT").and_then(Value::as_object);

    NormalizedPage {
        total: data.get("list_total_count").and_then(parse_total),
        code: result
            .and_then(|r| r.get("CODE"))
            .and_then(Value::as_str)
            .filter(|code| !code.is_empty())
            .map(str::to_string),
        message: result
            .and_then(|r| r.get("MESSAGE"))
            .and_then(Value::as_str)
            .map(str::to_string),
        rows: extract_rows(data.get("row")),
    }
}

fn find_service_result(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    root.values()
        .filter_map(Value::as_object)
        .find(|candidate| RESULT_MARKERS.iter().any(|key| candidate.contains_key(*key)))
}

/// Upstream sends a number, occasionally a numeric string
fn parse_total(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn extract_rows(value: Option<&Value>) -> Vec<Record> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .cloned()
            .collect(),
        Some(Value::Object(single)) => vec![single.clone()],
        _ => Vec::new(),
    }
}

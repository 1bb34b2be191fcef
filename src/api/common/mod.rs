//
//  churchtools-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the REST and AJAX surfaces
//!
//! This module provides shared types and utilities used by every endpoint
//! adapter, whichever of the two server surfaces it talks to. It includes the
//! error type, the response classification used for diagnostics, the request
//! description replayed by the transport, and client-side reshaping helpers.
//!
//! # Overview
//!
//! - [`ApiError`] - Failures that are surfaced to the caller as `Err`
//! - [`ServerResponse`] / [`Outcome`] - A completed exchange and its class
//! - [`ApiRequest`] - A replayable request description
//! - [`DateParam`] - Date arguments accepted by date-filtered endpoints
//! - [`index_by_id`] - The `{record.id: record}` reshape for list results
//! - Pagination types (re-exported from the `pagination` submodule)
//!
//! # Example
//!
//! ```rust
//! use churchtools_cli::api::common::{index_by_id, ApiError};
//! use serde_json::json;
//!
//! let groups = vec![json!({"id": 3, "name": "Band"}), json!({"id": 9, "name": "Tech"})];
//! let by_id = index_by_id(groups);
//! assert_eq!(by_id[&9]["name"], "Tech");
//!
//! fn describe(err: &ApiError) -> &'static str {
//!     match err {
//!         ApiError::NotAuthenticated => "log in first",
//!         ApiError::Network(_) => "server unreachable",
//!         _ => "unexpected failure",
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! Server-reported failures never become an [`ApiError`]. Adapters log them
//! through [`ServerResponse::report`] and return `None` or `false`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

mod pagination;
mod request;

pub use pagination::*;
pub use request::*;

/// Errors that propagate to the caller.
///
/// Everything the server reports about a request (missing records, rejected
/// input, permission problems) is logged and mapped to `None`/`false`
/// instead. The variants here cover what the caller cannot recover from
/// by inspecting a return value.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authenticated. Log in before calling the API")]
    NotAuthenticated,

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Classification of a completed HTTP exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NotFound,
    Unexpected,
}

impl Outcome {
    pub fn classify(status: StatusCode) -> Self {
        if status.is_success() {
            Outcome::Success
        } else if status == StatusCode::NOT_FOUND {
            Outcome::NotFound
        } else {
            Outcome::Unexpected
        }
    }
}

/// A completed exchange with its body read into memory.
#[derive(Debug, Clone)]
pub struct ServerResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ServerResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::classify(self.status)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parses the body as JSON. An empty body parses as `null`.
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body).map_err(|e| {
            ApiError::Protocol(format!("response is not valid JSON ({e})"))
        })
    }

    /// Returns the `data` member of the envelope, or the whole document when
    /// the server answered without one.
    pub fn data(&self) -> Result<Value> {
        let mut document = self.json()?;
        match document.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Ok(document),
        }
    }

    /// Logs a failed exchange at the level its class calls for.
    ///
    /// `what` names the thing that was requested, e.g. `"song 777"`.
    pub fn report(&self, what: &str) {
        let message = format_api_error(self.status, &self.body);
        match self.outcome() {
            Outcome::Success => debug!(status = self.status.as_u16(), "{what} succeeded"),
            Outcome::NotFound => info!(status = self.status.as_u16(), "{what} not found: {message}"),
            Outcome::Unexpected => warn!(status = self.status.as_u16(), "{what} failed: {message}"),
        }
    }
}

/// Extracts a readable message from a ChurchTools error body.
///
/// Handles the shapes the server is known to produce:
/// - `{"translatedMessage": "...", "message": "..."}`
/// - `{"message": "...", "errors": [{"message": "..."}]}`
/// - legacy AJAX `{"status": "error", "message": "..."}`
///
/// Falls back to the raw body (truncated) or the status reason phrase.
pub fn format_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let headline = json
            .get("translatedMessage")
            .and_then(|m| m.as_str())
            .or_else(|| json.get("message").and_then(|m| m.as_str()));

        let details: Vec<&str> = json
            .get("errors")
            .and_then(|e| e.as_array())
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        match (headline, details.is_empty()) {
            (Some(headline), true) => return headline.to_string(),
            (Some(headline), false) => return format!("{}: {}", headline, details.join("; ")),
            (None, false) => return details.join("; "),
            (None, true) => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else if trimmed.chars().count() > 200 {
        format!("{}...", trimmed.chars().take(200).collect::<String>())
    } else {
        trimmed.to_string()
    }
}

/// Logs a rejected parameter combination.
pub(crate) fn client_misuse(operation: &str, reason: &str) {
    warn!(operation, "Invalid arguments: {reason}");
}

/// Reads a record's `id`, accepting both numbers and numeric strings.
pub fn record_id(record: &Value) -> Option<i64> {
    id_value(record.get("id")?)
}

pub(crate) fn id_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Wraps a lone object into a one-element list. `null` becomes an empty list.
pub fn into_list(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Turns a list of records into a mapping keyed by each record's `id`.
///
/// Records without a usable id are skipped.
pub fn index_by_id(records: Vec<Value>) -> BTreeMap<i64, Value> {
    index_by_key(records, "id")
}

/// Like [`index_by_id`], keyed by an arbitrary integer field.
pub fn index_by_key(records: Vec<Value>, key: &str) -> BTreeMap<i64, Value> {
    let mut map = BTreeMap::new();
    for record in records {
        match record.get(key).and_then(id_value) {
            Some(id) => {
                map.insert(id, record);
            }
            None => debug!(key, "Skipping record without an integer key"),
        }
    }
    map
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date argument for date-filtered endpoints.
///
/// Strings must be `YYYY-MM-DD`; dates and timestamps are formatted to that
/// shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParam {
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl DateParam {
    /// The query value, or `None` (with a warning) for a malformed string.
    pub fn to_query(&self) -> Option<String> {
        match self {
            DateParam::Text(text) => match NaiveDate::parse_from_str(text.trim(), DATE_FORMAT) {
                Ok(date) => Some(date.format(DATE_FORMAT).to_string()),
                Err(_) => {
                    client_misuse("date parameter", &format!("'{}' is not YYYY-MM-DD, ignoring it", text));
                    None
                }
            },
            DateParam::Date(date) => Some(date.format(DATE_FORMAT).to_string()),
            DateParam::Timestamp(ts) => Some(ts.date_naive().format(DATE_FORMAT).to_string()),
        }
    }
}

impl From<&str> for DateParam {
    fn from(value: &str) -> Self {
        DateParam::Text(value.to_string())
    }
}

impl From<String> for DateParam {
    fn from(value: String) -> Self {
        DateParam::Text(value)
    }
}

impl From<NaiveDate> for DateParam {
    fn from(value: NaiveDate) -> Self {
        DateParam::Date(value)
    }
}

impl From<DateTime<Utc>> for DateParam {
    fn from(value: DateTime<Utc>) -> Self {
        DateParam::Timestamp(value)
    }
}

/// Formats a timestamp as ISO-8601 in UTC with a trailing `Z`.
pub fn format_utc_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

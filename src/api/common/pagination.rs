//
//  churchtools-cli
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for REST Collection Responses
//!
//! Collection endpoints answer with an envelope of the form
//! `{"data": [...], "meta": {"pagination": {"current", "lastPage", "perPage", "total"}}}`.
//! When `meta.pagination` is absent the response is complete. When present,
//! pages are numbered `1..=lastPage` and each one carries a list in `data`.
//!
//! # Overview
//!
//! | Type | Role |
//! |------|------|
//! | [`PaginatedResponse`] | One decoded page |
//! | [`Pagination`] | The `meta.pagination` block |
//! | [`PageCollector`] | Accumulates pages and decides what to fetch next |
//!
//! # Example
//!
//! ```rust
//! use churchtools_cli::api::common::{PageCollector, PaginatedResponse};
//!
//! let first: PaginatedResponse = serde_json::from_str(
//!     r#"{"data":[{"id":1}],"meta":{"pagination":{"current":1,"lastPage":2}}}"#,
//! ).unwrap();
//! let second: PaginatedResponse = serde_json::from_str(
//!     r#"{"data":[{"id":2}],"meta":{"pagination":{"current":2,"lastPage":2}}}"#,
//! ).unwrap();
//!
//! let mut collector = PageCollector::new();
//! assert_eq!(collector.push(first).unwrap(), Some(2));
//! assert_eq!(collector.push(second).unwrap(), None);
//! assert_eq!(collector.finish().len(), 2);
//! ```
//!
//! # Notes
//!
//! The collector refuses a page whose `current` does not move past the
//! previous one, and stops once more pages were read than the server ever
//! announced. Either case is reported as [`ApiError::Protocol`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{into_list, ApiError, Result};

/// Page size sent on the first request of large collections
/// (events, persons, songs).
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// The `meta.pagination` block of a collection response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u32,

    pub last_page: u32,

    #[serde(default)]
    pub per_page: Option<u32>,

    #[serde(default)]
    pub total: Option<u64>,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.current < self.last_page
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// One page of a collection response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginatedResponse {
    #[serde(default)]
    pub data: Value,

    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl PaginatedResponse {
    pub fn pagination(&self) -> Option<Pagination> {
        self.meta.as_ref().and_then(|m| m.pagination)
    }

    /// The page's records; a lone object counts as a one-element page.
    pub fn into_items(self) -> Vec<Value> {
        into_list(self.data)
    }
}

/// Accumulates the pages of one collection in server order.
#[derive(Debug, Default)]
pub struct PageCollector {
    items: Vec<Value>,
    last_seen: Option<u32>,
    pages_read: u32,
    max_last_page: u32,
}

impl PageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page and returns the number of the page to request next,
    /// or `None` when the collection is complete.
    pub fn push(&mut self, page: PaginatedResponse) -> Result<Option<u32>> {
        let pagination = page.pagination();
        self.items.extend(page.into_items());
        self.pages_read += 1;

        let Some(pagination) = pagination else {
            return Ok(None);
        };

        if let Some(previous) = self.last_seen {
            if pagination.current <= previous {
                return Err(ApiError::Protocol(format!(
                    "pagination did not advance (page {} after page {})",
                    pagination.current, previous
                )));
            }
        }
        self.last_seen = Some(pagination.current);
        self.max_last_page = self.max_last_page.max(pagination.last_page);

        if self.pages_read > self.max_last_page.max(1) {
            return Err(ApiError::Protocol(format!(
                "read {} pages but the server announced {}",
                self.pages_read, self.max_last_page
            )));
        }

        Ok(pagination.next_page())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> Vec<Value> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(ids: &[i64], current: u32, last_page: u32) -> PaginatedResponse {
        serde_json::from_value(json!({
            "data": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
            "meta": {"pagination": {"current": current, "lastPage": last_page, "perPage": 50, "total": 3}}
        }))
        .unwrap()
    }

    #[test]
    fn test_unpaginated_response_is_complete() {
        let response: PaginatedResponse =
            serde_json::from_value(json!({"data": [{"id": 1}, {"id": 2}]})).unwrap();
        let mut collector = PageCollector::new();
        assert_eq!(collector.push(response).unwrap(), None);
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_lone_object_becomes_single_item() {
        let response: PaginatedResponse =
            serde_json::from_value(json!({"data": {"id": 7}})).unwrap();
        assert_eq!(response.into_items(), vec![json!({"id": 7})]);
    }

    #[test]
    fn test_pages_concatenate_in_order() {
        let mut collector = PageCollector::new();
        assert_eq!(collector.push(page(&[1], 1, 3)).unwrap(), Some(2));
        assert_eq!(collector.push(page(&[2], 2, 3)).unwrap(), Some(3));
        assert_eq!(collector.push(page(&[3], 3, 3)).unwrap(), None);

        let ids: Vec<i64> = collector
            .finish()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_stalled_pagination_is_a_protocol_error() {
        let mut collector = PageCollector::new();
        collector.push(page(&[1], 1, 3)).unwrap();
        let err = collector.push(page(&[1], 1, 3)).unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[test]
    fn test_pagination_meta_defaults() {
        let p: Pagination = serde_json::from_str(r#"{"current":2,"lastPage":2}"#).unwrap();
        assert!(!p.has_next());
        assert_eq!(p.next_page(), None);
        assert_eq!(p.per_page, None);
    }
}

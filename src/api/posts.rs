//
//  churchtools-cli
//  api/posts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Posts of the group news feed.
//!
//! Time filters are sent as UTC timestamps with a trailing `Z`. The server
//! spells the cursor parameter `last_post_indentifier`; it only has an
//! effect together with `before`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::common::{client_misuse, format_utc_timestamp, ApiRequest, Result};
use super::ChurchToolsClient;

/// Query parameter name of the paging cursor, as the server spells it.
pub const LAST_POST_PARAM: &str = "last_post_indentifier";

/// Filters for [`ChurchToolsClient::get_posts`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostQuery {
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
    pub last_post_identifier: Option<String>,
    pub campus_ids: Vec<i64>,
    pub actor_ids: Vec<i64>,
    pub group_ids: Vec<i64>,
    /// e.g. `hidden`, `intern`, `restricted`, `public`.
    pub group_visibility: Option<String>,
    /// e.g. `group_intern`, `group_visible`.
    pub post_visibility: Vec<String>,
    pub include: Vec<String>,
    pub limit: Option<u32>,
    pub only_my_groups: Option<bool>,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before(mut self, before: DateTime<Utc>) -> Self {
        self.before = Some(before);
        self
    }

    pub fn after(mut self, after: DateTime<Utc>) -> Self {
        self.after = Some(after);
        self
    }

    pub fn last_post(mut self, identifier: impl Into<String>) -> Self {
        self.last_post_identifier = Some(identifier.into());
        self
    }

    pub fn group(mut self, group_id: i64) -> Self {
        self.group_ids.push(group_id);
        self
    }

    pub fn include(mut self, include: impl Into<String>) -> Self {
        self.include.push(include.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn only_my_groups(mut self, only: bool) -> Self {
        self.only_my_groups = Some(only);
        self
    }

    pub fn to_request(&self) -> ApiRequest {
        let mut request = ApiRequest::get("/api/posts");

        if let Some(before) = &self.before {
            request = request.query("before", format_utc_timestamp(before));
        }
        if let Some(after) = &self.after {
            request = request.query("after", format_utc_timestamp(after));
        }
        if let Some(identifier) = &self.last_post_identifier {
            if self.before.is_some() {
                request = request.query(LAST_POST_PARAM, identifier);
            } else {
                client_misuse("get_posts", "'last_post_identifier' requires 'before', ignoring it");
            }
        }

        request
            .query_list("campus_ids[]", &self.campus_ids)
            .query_list("actor_ids[]", &self.actor_ids)
            .query_opt("group_visibility", self.group_visibility.as_ref())
            .query_list("post_visibility[]", &self.post_visibility)
            .query_list("group_ids[]", &self.group_ids)
            .query_list("include[]", &self.include)
            .query_opt("limit", self.limit)
            .query_opt("only_my_groups", self.only_my_groups)
    }
}

impl ChurchToolsClient {
    pub async fn get_posts(&self, query: &PostQuery) -> Result<Option<Vec<Value>>> {
        self.get_paginated(&query.to_request(), "posts").await
    }

    /// Posts from external sources (e.g. other ChurchTools sites).
    pub async fn get_external_posts(&self) -> Result<Option<Vec<Value>>> {
        self.get_paginated(&ApiRequest::get("/api/externalposts"), "external posts")
            .await
    }
}

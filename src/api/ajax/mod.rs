//
//  churchtools-cli
//  api/ajax/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Legacy AJAX Surface
//!
//! Older ChurchTools functionality is only reachable through action-style
//! calls of the form `POST /?q=churchservice/ajax&func=<action>` with a
//! form-encoded body. They require the session's CSRF header and answer with
//! `{"status": "success" | "error" | "fail", "data": ..., "message": ...}`.
//!
//! # Overview
//!
//! | Module | Actions |
//! |--------|---------|
//! | [`songs`] | `getAllSongs`, `addSongTag`, `delSongTag` (backed by [`SongCache`]) |
//! | [`events`] | `getAllEventData`, `addOrRemoveServiceToEvent`, `updateEventInfo` |
//!
//! Song create/edit/delete and arrangement actions live with the REST song
//! adapter in [`crate::api::songs`]; the connection probe (`getAllFacts`) is
//! on the client itself.
//!
//! # Notes
//!
//! The legacy payloads have no published schema. Field names used here are
//! the ones the server is observed to produce; everything else is passed
//! through untouched as `serde_json::Value`.

pub mod events;
pub mod songs;

pub use events::*;
pub use songs::*;

use serde_json::Value;
use tracing::warn;

use super::common::{ApiRequest, Result};
use super::ChurchToolsClient;

impl ChurchToolsClient {
    /// Calls a legacy action and returns its `data` member.
    ///
    /// A missing `status` counts as success; `"error"` and `"fail"` are
    /// logged and yield `Ok(None)`, as do non-2xx answers.
    pub async fn ajax(&self, func: &str, fields: Vec<(String, String)>) -> Result<Option<Value>> {
        let response = self.execute(&ApiRequest::ajax(func, fields)).await?;
        if !response.is_success() {
            response.report(&format!("AJAX {}", func));
            return Ok(None);
        }

        let mut body = response.json()?;
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string);
        match status.as_deref() {
            None | Some("success") => Ok(Some(
                body.get_mut("data").map(Value::take).unwrap_or(Value::Null),
            )),
            Some(status) => {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| body.get("data").map(Value::to_string).unwrap_or_default());
                warn!(func, status, "AJAX call failed: {message}");
                Ok(None)
            }
        }
    }
}

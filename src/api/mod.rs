//
//  churchtools-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! ChurchTools API Module
//!
//! This module provides a unified interface over the two coexisting
//! ChurchTools server APIs:
//!
//! - **REST** (`/api/...`): resource-oriented, JSON envelopes with `data` and
//!   optional `meta.pagination`.
//! - **Legacy AJAX** (`/?q=churchservice/ajax&func=...`): action-oriented,
//!   form-encoded, CSRF-protected.
//!
//! # Architecture
//!
//! - [`client`] - Session, login, CSRF handshake, rate-limited transport,
//!   pagination engine
//! - [`common`] - Errors, request descriptions, response classification,
//!   reshaping helpers
//! - [`ajax`] - Legacy action calls, the song catalog cache, event service
//!   counts
//! - One module per domain (`persons`, `songs`, `events`, `agenda`, `groups`,
//!   `calendars`, `files`, `posts`, `tags`, `resources`, `masterdata`), each
//!   adding methods to [`ChurchToolsClient`]
//!
//! # Result shapes
//!
//! Server records are returned as `serde_json::Value` and never validated.
//! List endpoints return `Option<Vec<Value>>`, single-record endpoints
//! `Option<Value>`, mutations `bool`; `None`/`false` means the server refused
//! and the reason was logged. For a `{id: record}` view of a list use
//! [`common::index_by_id`].
//!
//! # Example
//!
//! ```rust,no_run
//! use churchtools_cli::api::{ChurchToolsClient, ClientOptions};
//! use churchtools_cli::api::common::index_by_id;
//! use churchtools_cli::auth::Credentials;
//!
//! async fn list_groups() -> churchtools_cli::api::Result<()> {
//!     let client = ChurchToolsClient::connect(
//!         "https://church.example",
//!         Some(Credentials::token("my-login-token")),
//!         ClientOptions::default(),
//!     )
//!     .await?;
//!
//!     if let Some(groups) = client.get_groups().await? {
//!         for (id, group) in index_by_id(groups) {
//!             println!("{}: {}", id, group["name"]);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod agenda;
pub mod ajax;
pub mod calendars;
pub mod client;
pub mod common;
pub mod events;
pub mod files;
pub mod groups;
pub mod masterdata;
pub mod persons;
pub mod posts;
pub mod resources;
pub mod songs;
pub mod tags;

pub use client::{ChurchToolsClient, ClientOptions};
pub use common::{ApiError, ApiRequest, Result, ServerResponse};

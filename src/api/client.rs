//
//  churchtools-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # ChurchTools API Client
//!
//! This module provides the session and transport every endpoint adapter
//! runs on. A [`ChurchToolsClient`] owns one cookie-carrying HTTP context,
//! the CSRF token acquired after login, the identity of the logged-in user
//! and the short-lived AJAX song cache.
//!
//! ## Request Pipeline
//!
//! ```text
//! adapter -> ApiRequest -> session (cookies, CSRF-Token) -> transport (429 retry) -> server
//!                                          pagination <- ServerResponse <-
//! ```
//!
//! - Every attempt is rebuilt from the same [`ApiRequest`], so a rate-limited
//!   request is retried verbatim and paginated requests keep their filters.
//! - A `429 Too Many Requests` answer sleeps for
//!   [`ClientOptions::rate_limit_backoff`] and retries, without limit.
//! - Transport failures (DNS, TCP, TLS) surface as [`ApiError::Network`] and
//!   are never retried.
//!
//! ## Example
//!
//! ```rust,no_run
//! use churchtools_cli::api::{ChurchToolsClient, ClientOptions};
//! use churchtools_cli::auth::Credentials;
//!
//! async fn example() -> churchtools_cli::api::Result<()> {
//!     let client = ChurchToolsClient::connect(
//!         "https://church.example",
//!         Some(Credentials::token("my-login-token")),
//!         ClientOptions::default(),
//!     )
//!     .await?;
//!
//!     if let Some(identity) = client.identity().await {
//!         println!("Logged in as {}", identity.display_name());
//!     }
//!
//!     let songs = client.get_songs().await?.unwrap_or_default();
//!     println!("{} songs", songs.len());
//!     Ok(())
//! }
//! ```
//!
//! # Notes
//!
//! Login failures do not produce an `Err`: [`ChurchToolsClient::login`]
//! returns `Ok(None)` and logs the server's answer, so credentials can be
//! probed cheaply. Calls made without a session fail with
//! [`ApiError::NotAuthenticated`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use super::ajax::SongCache;
use super::common::{
    format_api_error, ApiError, ApiRequest, PageCollector, PaginatedResponse, Result,
    ServerResponse,
};
use crate::auth::{Credentials, Identity};

/// Wait between retries of a rate-limited request.
pub const DEFAULT_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(15);

/// How long the AJAX song catalog is considered fresh.
pub const DEFAULT_SONG_CACHE_TTL: Duration = Duration::from_secs(10);

/// Tunables for a [`ChurchToolsClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub rate_limit_backoff: Duration,
    pub song_cache_ttl: Duration,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            rate_limit_backoff: DEFAULT_RATE_LIMIT_BACKOFF,
            song_cache_ttl: DEFAULT_SONG_CACHE_TTL,
            timeout: None,
            user_agent: format!("{}/{}", crate::APP_NAME, crate::VERSION),
        }
    }
}

impl ClientOptions {
    pub fn with_rate_limit_backoff(mut self, backoff: Duration) -> Self {
        self.rate_limit_backoff = backoff;
        self
    }

    pub fn with_song_cache_ttl(mut self, ttl: Duration) -> Self {
        self.song_cache_ttl = ttl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

struct SessionState {
    http: Client,
    csrf_token: Option<String>,
    identity: Option<Identity>,
}

/// An authenticated session against one ChurchTools instance.
///
/// Requests issued through one client are sequential from the caller's
/// point of view; share it behind your own lock if several tasks need it.
pub struct ChurchToolsClient {
    base_url: String,
    options: ClientOptions,
    state: RwLock<SessionState>,
    pub(crate) song_cache: Mutex<SongCache>,
}

impl std::fmt::Debug for ChurchToolsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChurchToolsClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ChurchToolsClient {
    /// Creates a client without logging in.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidUrl`] if `base_url` lacks an `http(s)` scheme or a host.
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http = build_http_client(&options)?;

        Ok(Self {
            base_url,
            options,
            state: RwLock::new(SessionState {
                http,
                csrf_token: None,
                identity: None,
            }),
            song_cache: Mutex::new(SongCache::default()),
        })
    }

    /// Creates a client and logs in when credentials are given.
    ///
    /// A rejected login still yields a client; check
    /// [`is_authenticated`](Self::is_authenticated) or
    /// [`identity`](Self::identity) afterwards.
    pub async fn connect(
        base_url: &str,
        credentials: Option<Credentials>,
        options: ClientOptions,
    ) -> Result<Self> {
        let client = Self::new(base_url, options)?;
        match credentials {
            Some(credentials) => {
                client.login(&credentials).await?;
            }
            None => debug!(base_url = %client.base_url, "No credentials given, session not established"),
        }
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.state.read().await.identity.clone()
    }

    pub async fn csrf_token(&self) -> Option<String> {
        self.state.read().await.csrf_token.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.identity.is_some()
    }

    /// Opens a new session and returns the id of the logged-in user.
    ///
    /// The new session is built on a fresh HTTP context and only replaces
    /// the current one once identity and CSRF token are both acquired. On
    /// failure the previous session stays in place and `Ok(None)` is returned.
    pub async fn login(&self, credentials: &Credentials) -> Result<Option<i64>> {
        let http = build_http_client(&self.options)?;

        let identity = match credentials {
            Credentials::Token(_) => self.login_with_token(&http, credentials).await?,
            Credentials::Password { username, password } => {
                self.login_with_password(&http, username, password).await?
            }
        };
        let Some(identity) = identity else {
            return Ok(None);
        };

        let Some(csrf_token) = self.fetch_csrf_token(&http).await? else {
            warn!(id = identity.id, "Login succeeded but no CSRF token was issued");
            return Ok(None);
        };

        let id = identity.id;
        info!(
            id,
            email = identity.email.as_deref().unwrap_or_default(),
            method = credentials.kind(),
            "Logged in"
        );

        {
            let mut state = self.state.write().await;
            *state = SessionState {
                http,
                csrf_token: Some(csrf_token),
                identity: Some(identity),
            };
        }
        self.song_cache.lock().await.clear();

        Ok(Some(id))
    }

    async fn login_with_token(
        &self,
        http: &Client,
        credentials: &Credentials,
    ) -> Result<Option<Identity>> {
        let mut request = ApiRequest::get("/api/whoami");
        if let Some(header) = credentials.authorization_header() {
            request = request.header("Authorization", header);
        }

        let response = self.roundtrip(http, None, &request).await?;
        if !response.is_success() {
            warn!(
                status = response.status.as_u16(),
                "Token login failed: {}",
                format_api_error(response.status, &response.body)
            );
            return Ok(None);
        }

        let identity = Identity::from_record(response.data()?);
        if identity.is_none() {
            warn!("Token login returned no usable identity");
        }
        Ok(identity)
    }

    async fn login_with_password(
        &self,
        http: &Client,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>> {
        let request = ApiRequest::post("/api/login").form(vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]);

        let response = self.roundtrip(http, None, &request).await?;
        if !response.is_success() {
            warn!(
                status = response.status.as_u16(),
                username,
                "Password login failed: {}",
                format_api_error(response.status, &response.body)
            );
            return Ok(None);
        }

        self.whoami_on(http, None).await
    }

    /// Fetches the logged-in user.
    ///
    /// Succeeds only when the record carries an `email` field; anything else
    /// (anonymous user, error status) yields `Ok(None)`.
    pub async fn whoami(&self) -> Result<Option<Identity>> {
        let (http, csrf) = self.session().await?;
        self.whoami_on(&http, csrf.as_deref()).await
    }

    async fn whoami_on(&self, http: &Client, csrf: Option<&str>) -> Result<Option<Identity>> {
        let response = self
            .roundtrip(http, csrf, &ApiRequest::get("/api/whoami"))
            .await?;
        if !response.is_success() {
            response.report("whoami");
            return Ok(None);
        }

        let record = response.data()?;
        if record.get("email").is_none() {
            warn!("whoami answered without an email, session is not authenticated");
            return Ok(None);
        }
        Ok(Identity::from_record(record))
    }

    async fn fetch_csrf_token(&self, http: &Client) -> Result<Option<String>> {
        let response = self
            .roundtrip(http, None, &ApiRequest::get("/api/csrftoken"))
            .await?;
        if !response.is_success() {
            response.report("CSRF token");
            return Ok(None);
        }

        Ok(response
            .data()?
            .as_str()
            .filter(|token| !token.is_empty())
            .map(str::to_string))
    }

    /// Probes the legacy AJAX surface; `true` iff it answers with 200.
    pub async fn check_connection_ajax(&self) -> Result<bool> {
        let response = self
            .execute(&ApiRequest::ajax("getAllFacts", Vec::new()))
            .await?;
        if response.status != StatusCode::OK {
            response.report("AJAX connection check");
        }
        Ok(response.status == StatusCode::OK)
    }

    /// Ends the session. Cookies, CSRF token, identity and cached songs are
    /// dropped; later calls fail with [`ApiError::NotAuthenticated`].
    pub async fn close(&self) -> Result<()> {
        let http = build_http_client(&self.options)?;
        {
            let mut state = self.state.write().await;
            *state = SessionState {
                http,
                csrf_token: None,
                identity: None,
            };
        }
        self.song_cache.lock().await.clear();
        debug!(base_url = %self.base_url, "Session closed");
        Ok(())
    }

    async fn session(&self) -> Result<(Client, Option<String>)> {
        let state = self.state.read().await;
        if state.identity.is_none() {
            return Err(ApiError::NotAuthenticated);
        }
        Ok((state.http.clone(), state.csrf_token.clone()))
    }

    /// Sends a request, sleeping and retrying while the server answers 429.
    async fn send(&self, http: &Client, csrf: Option<&str>, request: &ApiRequest) -> Result<Response> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let response = request.build(http, &self.base_url, csrf).send().await?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                debug!(
                    method = %request.method(),
                    path = request.path(),
                    status = response.status().as_u16(),
                    attempt,
                    "Request completed"
                );
                return Ok(response);
            }

            warn!(
                method = %request.method(),
                path = request.path(),
                attempt,
                backoff_ms = self.options.rate_limit_backoff.as_millis() as u64,
                "Rate limited by server, retrying"
            );
            tokio::time::sleep(self.options.rate_limit_backoff).await;
        }
    }

    async fn roundtrip(
        &self,
        http: &Client,
        csrf: Option<&str>,
        request: &ApiRequest,
    ) -> Result<ServerResponse> {
        let response = self.send(http, csrf, request).await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(ServerResponse::new(status, body))
    }

    /// Executes one request within the session and reads the whole body.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ServerResponse> {
        let (http, csrf) = self.session().await?;
        self.roundtrip(&http, csrf.as_deref(), request).await
    }

    /// Executes one request within the session without reading the body.
    pub(crate) async fn execute_streaming(&self, request: &ApiRequest) -> Result<Response> {
        let (http, csrf) = self.session().await?;
        self.send(&http, csrf.as_deref(), request).await
    }

    /// Fetches a single resource and returns its `data` member.
    ///
    /// Non-success answers are logged (404 at info, anything else at warn)
    /// and yield `Ok(None)`.
    pub async fn get_data(&self, request: &ApiRequest, what: &str) -> Result<Option<Value>> {
        let response = self.execute(request).await?;
        if !response.is_success() {
            response.report(what);
            return Ok(None);
        }
        response.data().map(Some)
    }

    /// Fetches a collection, following `meta.pagination` to the last page.
    ///
    /// Every page is requested with the original parameters and headers
    /// plus `page=<n>`. A lone object is returned as a one-element list.
    pub async fn get_paginated(&self, request: &ApiRequest, what: &str) -> Result<Option<Vec<Value>>> {
        let mut collector = PageCollector::new();
        let mut page_request = request.clone();

        loop {
            let response = self.execute(&page_request).await?;
            if !response.is_success() {
                response.report(what);
                return Ok(None);
            }

            let page: PaginatedResponse = serde_json::from_value(response.json()?)?;
            match collector.push(page)? {
                Some(next) => {
                    debug!(what, page = next, "Fetching next page");
                    page_request = request.clone().query("page", next);
                }
                None => break,
            }
        }

        Ok(Some(collector.finish()))
    }

    /// Runs a mutation; `true` iff the server answers with a 2xx status.
    pub async fn mutate(&self, request: &ApiRequest, what: &str) -> Result<bool> {
        let response = self.execute(request).await?;
        if !response.is_success() {
            response.report(what);
            return Ok(false);
        }
        Ok(true)
    }
}

/// Validates and normalizes a base URL to `scheme://host[:port][/path]`
/// without a trailing slash.
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|e| ApiError::InvalidUrl(format!("{} ({})", trimmed, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!(
            "{} (scheme must be http or https)",
            trimmed
        )));
    }
    if parsed.host_str().is_none() {
        return Err(ApiError::InvalidUrl(format!("{} (missing host)", trimmed)));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn build_http_client(options: &ClientOptions) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = Client::builder()
        .cookie_store(true)
        .default_headers(headers)
        .user_agent(options.user_agent.clone());
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

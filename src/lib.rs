//
//  churchtools-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # ChurchTools Client Library
//!
//! An async client for ChurchTools church-management sites, and the `ct`
//! command-line tool built on it.
//!
//! ## Overview
//!
//! A [`api::ChurchToolsClient`] is one authenticated session against one
//! site. It speaks both server APIs: the REST API under `/api/...` and the
//! legacy AJAX API behind `/?q=churchservice/ajax`. It owns the cookie jar,
//! the CSRF token and the song catalog cache, and retries rate-limited
//! requests.
//!
//! ## Features
//!
//! - **Session**: login by token or password, CSRF handshake, identity
//! - **Pagination**: every page of a collection, same filters on every page
//! - **Songs**: songs, arrangements, categories and tags, with a short-lived
//!   AJAX catalog cache
//! - **Events**: events, agendas, services, admins and agenda exports for
//!   presentation software
//! - **Groups, calendars, posts, tags, resources, files**
//!
//! ## Module Structure
//!
//! - [`api`]: The session and one module per server domain
//! - [`auth`]: Credentials, token helpers and keyring storage
//! - [`cli`]: Command-line interface definitions using clap
//! - [`config`]: Configuration file management
//! - [`output`]: Output formatting (Table, JSON, Markdown)
//! - [`interactive`]: Interactive prompts
//! - [`util`]: Argument parsing helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use churchtools_cli::api::{ChurchToolsClient, ClientOptions};
//! use churchtools_cli::auth::Credentials;
//!
//! # async fn run() -> churchtools_cli::api::Result<()> {
//! let client = ChurchToolsClient::connect(
//!     "https://church.example",
//!     Some(Credentials::token("my-login-token")),
//!     ClientOptions::default(),
//! )
//! .await?;
//!
//! if let Some(songs) = client.get_songs().await? {
//!     println!("{} songs", songs.len());
//! }
//! # Ok(())
//! # }
//! ```

/// ChurchTools API session and domain endpoints.
///
/// Server failures are logged and surface as `Ok(None)` / `Ok(false)`;
/// only transport, local I/O and protocol problems are errors.
pub mod api;

/// Credentials and token storage.
pub mod auth;

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// Configuration file management.
///
/// Manages the CLI's configuration stored in platform-specific locations:
/// - Linux: `~/.config/ct/config.toml`
/// - macOS: `~/Library/Application Support/ct/config.toml`
/// - Windows: `%APPDATA%\ct\config\config.toml`
pub mod config;

/// Interactive terminal prompts.
pub mod interactive;

/// Output formatting for tables, JSON and Markdown.
pub mod output;

/// Argument parsing helpers.
pub mod util;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use churchtools_cli::Cli;
///
/// let cli = Cli::parse();
/// ```
pub use cli::Cli;

/// Re-export of the configuration struct.
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes, the user agent
/// and configuration paths.
pub const APP_NAME: &str = "ct";

/// Application version constant, taken from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `32+`: External service issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage or arguments.
    pub const USAGE: i32 = 2;

    /// Not logged in, or the stored token was rejected.
    /// Run `ct auth login` to authenticate.
    pub const AUTH_ERROR: i32 = 4;

    /// The server could not reach or parse a response.
    pub const NETWORK_ERROR: i32 = 32;
}

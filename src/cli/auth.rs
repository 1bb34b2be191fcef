//
//  churchtools-cli
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Commands
//!
//! - `ct auth login --host church.example --with-token < token.txt`
//! - `ct auth login --host church.example --user jane@church.example`
//!   (password prompt; a login token is fetched for later sessions)
//! - `ct auth logout`
//! - `ct auth status`
//!
//! Tokens are stored in the system keyring, keyed by host; the host itself
//! is remembered in the config file and becomes the default host.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::api::{ApiRequest, ChurchToolsClient};
use crate::auth::{mask_token, read_token_from_stdin, validate_token, Credentials, KeyringStore};
use crate::config::{host_url, normalize_host, Config};
use crate::interactive::{prompt_input, prompt_password};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in with a login token or username and password
    Login(LoginArgs),

    /// Remove the stored token of a site
    Logout(LogoutArgs),

    /// Show the logged-in user of each configured site
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Read the login token from stdin
    #[arg(long)]
    pub with_token: bool,

    /// Username (email) for a password login
    #[arg(long, short = 'u', conflicts_with = "with_token")]
    pub user: Option<String>,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// Log out of every configured site
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show the stored token (masked)
    #[arg(long, short = 't')]
    pub show_token: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout(args) => logout(args, global),
            AuthSubcommand::Status(args) => status(args, global).await,
        }
    }
}

async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let mut config = Config::load()?;
    let host = match config.resolve_host(global.host.as_deref()) {
        Some(host) => host,
        None => normalize_host(&prompt_input("ChurchTools site (e.g. church.example):")?),
    };
    let url = host_url(&host);

    let credentials = if args.with_token {
        println!("Paste your login token:");
        let token = read_token_from_stdin()?;
        if !validate_token(&token) {
            bail!("Invalid token format");
        }
        Credentials::token(token)
    } else {
        let user = match &args.user {
            Some(user) => user.clone(),
            None => prompt_input("Username:")?,
        };
        let password = prompt_password("Password:")?;
        Credentials::password(user, password)
    };

    println!("Logging in to {}...", url);
    let client = ChurchToolsClient::new(&url, config.client_options())?;
    let Some(identity_id) = client.login(&credentials).await? else {
        bail!("Login to {} failed; check your credentials", host);
    };

    let token = match &credentials {
        Credentials::Token(token) => token.clone(),
        Credentials::Password { .. } => fetch_login_token(&client, identity_id).await?,
    };
    KeyringStore::new().store(&host, &token)?;

    let identity = client.identity().await;
    let name = identity.as_ref().map(|i| i.display_name());
    config.remember_login(&url, identity.and_then(|i| i.email), identity_id);
    config.save()?;
    client.close().await?;

    match name {
        Some(name) => println!("{} Logged in to {} as {}", style("✓").green(), host, name),
        None => println!("{} Logged in to {}", style("✓").green(), host),
    }
    Ok(())
}

/// Sessions opened with a password are turned into a stored login token.
async fn fetch_login_token(client: &ChurchToolsClient, person_id: i64) -> Result<String> {
    let request = ApiRequest::get(format!("/api/persons/{}/logintoken", person_id));
    let token = client
        .get_data(&request, "login token")
        .await?
        .and_then(|data| data.as_str().map(str::to_string))
        .context("Logged in, but the server did not hand out a login token; use --with-token")?;
    Ok(token)
}

fn logout(args: &LogoutArgs, global: &GlobalOptions) -> Result<()> {
    let keyring = KeyringStore::new();
    let mut config = Config::load()?;

    let hosts: Vec<String> = if args.all {
        config.hosts.keys().cloned().collect()
    } else {
        let host = config
            .resolve_host(global.host.as_deref())
            .context("No site selected. Use --host or --all")?;
        vec![host]
    };

    if hosts.is_empty() {
        println!("Not logged in to any site");
        return Ok(());
    }

    for host in &hosts {
        keyring.delete(host)?;
        config.forget_host(host);
        println!("{} Logged out of {}", style("✓").green(), host);
    }
    config.save()?;
    Ok(())
}

async fn status(args: &StatusArgs, global: &GlobalOptions) -> Result<()> {
    let config = Config::load()?;
    let keyring = KeyringStore::new();

    let mut hosts: Vec<String> = match &global.host {
        Some(host) => vec![normalize_host(host)],
        None => config.hosts.keys().cloned().collect(),
    };
    hosts.sort();

    if hosts.is_empty() {
        println!("Not logged in to any site. Run 'ct auth login' to authenticate.");
        return Ok(());
    }

    for host in &hosts {
        let default_marker = if config.core.default_host.as_deref() == Some(host.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", style(host).bold(), default_marker);

        let Some(token) = keyring.get(host)? else {
            println!("  {} No stored token", style("✗").red());
            continue;
        };

        let url = config
            .host_config(host)
            .map(|h| h.url.clone())
            .unwrap_or_else(|| host_url(host));
        let client =
            ChurchToolsClient::connect(&url, Some(Credentials::token(token.clone())), config.client_options())
                .await?;
        match client.identity().await {
            Some(identity) => println!(
                "  {} Logged in as {} (id {})",
                style("✓").green(),
                identity.display_name(),
                identity.id
            ),
            None => println!("  {} Token rejected by the server", style("✗").red()),
        }
        if args.show_token {
            println!("  Token: {}", mask_token(&token));
        }
    }
    Ok(())
}

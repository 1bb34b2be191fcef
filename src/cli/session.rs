//
//  churchtools-cli
//  cli/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Opening a client for a command.
//!
//! The site comes from `--host`/`CT_HOST` or the default host of the config
//! file; the login token from `CT_TOKEN` or the keyring.

use anyhow::{bail, Context, Result};

use crate::api::ChurchToolsClient;
use crate::auth::{Credentials, KeyringStore};
use crate::config::{host_url, Config};

use super::GlobalOptions;

/// Environment variable carrying a login token, bypassing the keyring.
pub const TOKEN_ENV: &str = "CT_TOKEN";

/// Logs in to the selected site.
pub async fn connect(global: &GlobalOptions) -> Result<ChurchToolsClient> {
    let config = Config::load()?;
    let host = config
        .resolve_host(global.host.as_deref())
        .context("No ChurchTools site selected. Use --host or run 'ct auth login' first")?;

    let url = config
        .host_config(&host)
        .map(|h| h.url.clone())
        .unwrap_or_else(|| host_url(&host));

    let token = match std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()) {
        Some(token) => token,
        None => KeyringStore::new().get(&host)?.with_context(|| {
            format!("Not authenticated with {}. Run 'ct auth login' first.", host)
        })?,
    };

    let client = ChurchToolsClient::connect(&url, Some(Credentials::token(token)), config.client_options())
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    if !client.is_authenticated().await {
        bail!(
            "Login to {} failed; the token may have been revoked. Run 'ct auth login' again.",
            host
        );
    }
    Ok(client)
}

/// Unwraps a server answer, turning a refusal into an error. The reason was
/// already logged by the client.
pub fn found<T>(value: Option<T>, what: &str) -> Result<T> {
    value.with_context(|| format!("Could not get {}", what))
}

/// Turns a refused mutation into an error.
pub fn ensure(done: bool, what: &str) -> Result<()> {
    if !done {
        bail!("Failed to {}", what);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_and_ensure() {
        assert_eq!(found(Some(3), "songs").unwrap(), 3);
        let err = found::<i64>(None, "song 7").unwrap_err();
        assert_eq!(err.to_string(), "Could not get song 7");

        assert!(ensure(true, "delete song 7").is_ok());
        assert_eq!(
            ensure(false, "delete song 7").unwrap_err().to_string(),
            "Failed to delete song 7"
        );
    }
}

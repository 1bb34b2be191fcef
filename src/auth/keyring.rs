//
//  churchtools-cli
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Token Storage
//!
//! Login tokens are stored in the platform keyring (Keychain on macOS,
//! Secret Service on Linux, Credential Manager on Windows) under the service
//! name `churchtools-cli`, keyed by host.
//!
//! ## Example
//!
//! ```rust,no_run
//! use churchtools_cli::auth::KeyringStore;
//!
//! fn manage_tokens() -> anyhow::Result<()> {
//!     let store = KeyringStore::new();
//!     store.store("church.example", "login_token_here")?;
//!     if let Some(token) = store.get("church.example")? {
//!         println!("Found stored token ({} chars)", token.len());
//!     }
//!     store.delete("church.example")?;
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use keyring::Entry;

const SERVICE_NAME: &str = "churchtools-cli";

pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    pub fn store(&self, host: &str, token: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        entry.set_password(token)?;
        Ok(())
    }

    pub fn get(&self, host: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, host)?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, host: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

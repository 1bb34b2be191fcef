//
//  churchtools-cli
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! ChurchTools accepts two ways of opening a session, both of which end in a
//! cookie-based session that is then armed with a CSRF token:
//!
//! - **Login token**: a user-scoped token sent once as
//!   `Authorization: Login <token>` on `GET /api/whoami`.
//! - **Username and password**: form-posted to `POST /api/login`.
//!
//! ## Module Structure
//!
//! - [`keyring`]: Secure token storage using the system keyring
//! - [`token`]: Token input, validation and masking helpers
//!
//! ## Example
//!
//! ```rust
//! use churchtools_cli::auth::Credentials;
//!
//! let credentials = Credentials::token("abc123");
//! assert_eq!(credentials.kind(), "token");
//!
//! let credentials = Credentials::password("ada", "s3cret");
//! assert_eq!(credentials.kind(), "password");
//! ```

mod keyring;
mod token;

pub use self::keyring::*;
pub use self::token::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Credentials used to open a session.
#[derive(Clone)]
pub enum Credentials {
    Token(String),
    Password { username: String, password: String },
}

impl Credentials {
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Token(_) => "token",
            Self::Password { .. } => "password",
        }
    }

    /// Value of the `Authorization` header used for token logins.
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Self::Token(token) => Some(format!("Login {}", token)),
            Self::Password { .. } => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(token) => f.debug_tuple("Token").field(&mask_token(token)).finish(),
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"****")
                .finish(),
        }
    }
}

/// The logged-in user as reported by `GET /api/whoami`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identity {
    /// Decodes a whoami record. Records without a positive `id` are rejected.
    pub fn from_record(record: Value) -> Option<Self> {
        let identity: Identity = serde_json::from_value(record).ok()?;
        (identity.id > 0).then_some(identity)
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => self
                .email
                .clone()
                .unwrap_or_else(|| format!("#{}", self.id)),
        }
    }
}

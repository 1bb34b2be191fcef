//
//  churchtools-cli
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Login Token Helpers
//!
//! ChurchTools login tokens are created per user in the web UI under
//! *Profile > Login token*. They never expire on their own and grant the
//! full permissions of the user, so they are kept in the system keyring and
//! only ever displayed masked.
//!
//! ## Example
//!
//! ```rust,no_run
//! use churchtools_cli::auth::{read_token_from_stdin, validate_token};
//!
//! fn read_token() -> anyhow::Result<String> {
//!     println!("Paste your login token:");
//!     let token = read_token_from_stdin()?;
//!     if !validate_token(&token) {
//!         anyhow::bail!("Invalid token format");
//!     }
//!     Ok(token)
//! }
//! ```

use anyhow::Result;

/// Reads a single line from stdin and trims it.
pub fn read_token_from_stdin() -> Result<String> {
    use std::io::{self, BufRead};

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;

    Ok(line.trim().to_string())
}

/// Token should not be empty and should not contain whitespace.
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

/// Shows the first and last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token() {
        assert!(validate_token("abc123"));
        assert!(!validate_token(""));
        assert!(!validate_token("abc 123"));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcdefghijkl"), "abcd...ijkl");
        assert_eq!(mask_token("short"), "*****");
    }
}

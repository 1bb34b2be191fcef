//
//  churchtools-cli
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Host names and site URLs.
//!
//! Hosts are keyed by lowercase `host[:port][/path]` without scheme, so
//! `https://Church.Example/` and `church.example` are the same site.

/// Key of a site URL or host name.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    host.trim_end_matches('/').to_lowercase()
}

/// Base URL of a host; `https` unless a scheme is given.
pub fn host_url(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        let (scheme, rest) = trimmed.split_once("://").unwrap_or(("https", trimmed));
        format!("{}://{}", scheme, rest.to_lowercase())
    } else {
        format!("https://{}", trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("https://Church.Example/"), "church.example");
        assert_eq!(normalize_host("church.example"), "church.example");
        assert_eq!(normalize_host("http://localhost:8080"), "localhost:8080");
    }

    #[test]
    fn test_host_url() {
        assert_eq!(host_url("church.example"), "https://church.example");
        assert_eq!(host_url("http://localhost:8080/"), "http://localhost:8080");
    }
}

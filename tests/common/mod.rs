//
//  churchtools-cli
//  tests/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

#![allow(dead_code)]

use std::time::Duration;

use churchtools_cli::api::{ChurchToolsClient, ClientOptions};
use churchtools_cli::auth::Credentials;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

pub const TOKEN: &str = "T";
pub const CSRF: &str = "C";

/// Options with a backoff short enough for tests.
pub fn test_options() -> ClientOptions {
    ClientOptions::default().with_rate_limit_backoff(Duration::from_millis(200))
}

pub async fn mock_whoami(server: &mut ServerGuard, id: i64, email: &str) -> Mock {
    server
        .mock("GET", "/api/whoami")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": { "id": id, "email": email } }).to_string())
        .create_async()
        .await
}

pub async fn mock_csrf(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/api/csrftoken")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": CSRF }).to_string())
        .create_async()
        .await
}

/// A server plus a client logged in as person 42 by token.
pub async fn logged_in() -> (ServerGuard, ChurchToolsClient) {
    let mut server = Server::new_async().await;
    let whoami = mock_whoami(&mut server, 42, "x@y").await;
    let csrf = mock_csrf(&mut server).await;

    let client = ChurchToolsClient::connect(&server.url(), Some(Credentials::token(TOKEN)), test_options())
        .await
        .unwrap();
    assert!(client.is_authenticated().await);

    whoami.remove_async().await;
    csrf.remove_async().await;
    (server, client)
}

/// Matches a legacy AJAX call by its function name.
pub fn ajax_query(func: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("q".into(), "churchservice/ajax".into()),
        Matcher::UrlEncoded("func".into(), func.into()),
    ])
}

pub fn ajax_success(data: Value) -> String {
    json!({ "status": "success", "data": data }).to_string()
}

pub fn data(value: Value) -> String {
    json!({ "data": value }).to_string()
}

pub fn page(ids: std::ops::Range<i64>, current: u32, last_page: u32) -> String {
    let items: Vec<Value> = ids.map(|id| json!({ "id": id })).collect();
    json!({
        "data": items,
        "meta": { "pagination": { "current": current, "lastPage": last_page, "perPage": 50 } }
    })
    .to_string()
}

//
//  churchtools-cli
//  tests/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

mod common;

use churchtools_cli::api::common::{index_by_id, record_id};
use churchtools_cli::api::ApiError;
use mockito::Matcher;
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_persons_are_collected_from_every_page() {
    let (mut server, client) = logged_in().await;

    let first = server
        .mock("GET", "/api/persons")
        .match_query(Matcher::Regex("^limit=50$".into()))
        .with_status(200)
        .with_body(page(1..51, 1, 3))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/persons")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(page(51..101, 2, 3))
        .expect(1)
        .create_async()
        .await;
    let third = server
        .mock("GET", "/api/persons")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("page".into(), "3".into()),
        ]))
        .with_status(200)
        .with_body(page(101..151, 3, 3))
        .expect(1)
        .create_async()
        .await;

    let persons = client.get_persons().await.unwrap().unwrap();

    assert_eq!(persons.len(), 150);
    let ids: Vec<i64> = persons.iter().filter_map(record_id).collect();
    assert_eq!(ids, (1..151).collect::<Vec<_>>());
    assert_eq!(index_by_id(persons).len(), 150);

    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn test_filters_are_sent_on_every_page() {
    let (mut server, client) = logged_in().await;

    let first = server
        .mock("GET", "/api/persons")
        .match_query(Matcher::Regex(r"^limit=50&ids[^&=]*=4&ids[^&=]*=9$".into()))
        .with_status(200)
        .with_body(page(4..5, 1, 2))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/persons")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ids[]".into(), "9".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(page(9..10, 2, 2))
        .create_async()
        .await;

    let persons = client.get_persons_by_ids(&[4, 9]).await.unwrap().unwrap();
    assert_eq!(persons, vec![json!({ "id": 4 }), json!({ "id": 9 })]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_unpaginated_object_is_a_single_item() {
    let (mut server, client) = logged_in().await;
    let _groups = server
        .mock("GET", "/api/groups")
        .with_status(200)
        .with_body(data(json!({ "id": 5, "name": "Band" })))
        .create_async()
        .await;

    let groups = client.get_groups().await.unwrap().unwrap();
    assert_eq!(groups, vec![json!({ "id": 5, "name": "Band" })]);
}

#[tokio::test]
async fn test_stalled_pagination_is_a_protocol_error() {
    let (mut server, client) = logged_in().await;
    let _stuck = server
        .mock("GET", "/api/persons")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(page(1..3, 1, 3))
        .create_async()
        .await;

    match client.get_persons().await {
        Err(ApiError::Protocol(message)) => assert!(message.contains("did not advance")),
        other => panic!("expected a protocol error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_page_yields_none() {
    let (mut server, client) = logged_in().await;
    let _first = server
        .mock("GET", "/api/persons")
        .match_query(Matcher::Regex("^limit=50$".into()))
        .with_status(200)
        .with_body(page(1..51, 1, 2))
        .create_async()
        .await;
    let _second = server
        .mock("GET", "/api/persons")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(500)
        .with_body(json!({ "message": "Internal error" }).to_string())
        .create_async()
        .await;

    assert!(client.get_persons().await.unwrap().is_none());
}

//
//  churchtools-cli
//  tests/files.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

mod common;

use churchtools_cli::api::files::FileDomain;
use mockito::{Matcher, Server};
use serde_json::json;

use common::*;

const LISTING: &str = "/api/files/song_arrangement/417";

fn domain() -> FileDomain {
    FileDomain::new("song_arrangement", 417)
}

#[tokio::test]
async fn test_upload_with_overwrite_replaces_existing_file() {
    let (mut server, client) = logged_in().await;

    let listing = server
        .mock("GET", LISTING)
        .with_status(200)
        .with_body(data(json!([
            { "id": 9, "name": "pinguin.png" },
            { "id": 10, "name": "chords.pdf" }
        ])))
        .expect(1)
        .create_async()
        .await;
    let delete_old = server
        .mock("DELETE", "/api/files/9")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let delete_other = server
        .mock("DELETE", "/api/files/10")
        .expect(0)
        .create_async()
        .await;
    let upload = server
        .mock("POST", LISTING)
        .match_header("csrf-token", CSRF)
        .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
        .match_body(Matcher::Regex(r#"name="files\[\]"; filename="pinguin\.png""#.into()))
        .with_status(200)
        .with_body(data(json!([{ "id": 11, "name": "pinguin.png" }])))
        .expect(1)
        .create_async()
        .await;

    let uploaded = client
        .upload_file_bytes(b"png-bytes".to_vec(), "pinguin.png", &domain(), true)
        .await
        .unwrap();

    assert!(uploaded);
    listing.assert_async().await;
    delete_old.assert_async().await;
    delete_other.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn test_overwrite_upload_stops_when_old_file_stays() {
    let (mut server, client) = logged_in().await;

    let _listing = server
        .mock("GET", LISTING)
        .with_status(200)
        .with_body(data(json!([{ "id": 9, "name": "pinguin.png" }])))
        .create_async()
        .await;
    let refused = server
        .mock("DELETE", "/api/files/9")
        .with_status(403)
        .with_body(json!({ "message": "Forbidden" }).to_string())
        .expect(1)
        .create_async()
        .await;
    let upload = server
        .mock("POST", LISTING)
        .with_status(200)
        .with_body(data(json!([])))
        .expect(0)
        .create_async()
        .await;

    let uploaded = client
        .upload_file_bytes(b"png-bytes".to_vec(), "pinguin.png", &domain(), true)
        .await
        .unwrap();

    assert!(!uploaded);
    refused.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn test_overwrite_upload_stops_when_listing_fails() {
    let (mut server, client) = logged_in().await;
    let _listing = server
        .mock("GET", LISTING)
        .with_status(500)
        .create_async()
        .await;
    let upload = server
        .mock("POST", LISTING)
        .expect(0)
        .create_async()
        .await;

    assert!(!client
        .upload_file_bytes(b"x".to_vec(), "pinguin.png", &domain(), true)
        .await
        .unwrap());
    upload.assert_async().await;
}

#[tokio::test]
async fn test_uploads_without_overwrite_keep_every_file() {
    let (mut server, client) = logged_in().await;
    let dir = tempfile::tempdir().unwrap();

    let plain = dir.path().join("pinguin.png");
    std::fs::write(&plain, b"first").unwrap();

    let same_name = server
        .mock("POST", LISTING)
        .match_body(Matcher::Regex(r#"filename="pinguin\.png""#.into()))
        .with_status(200)
        .with_body(data(json!([])))
        .expect(2)
        .create_async()
        .await;
    let renamed = server
        .mock("POST", LISTING)
        .match_body(Matcher::Regex(r#"filename="pinguin_shell_rename\.png""#.into()))
        .with_status(200)
        .with_body(data(json!([])))
        .expect(1)
        .create_async()
        .await;
    let listing = server
        .mock("GET", LISTING)
        .expect(0)
        .create_async()
        .await;

    assert!(client.upload_file(&plain, &domain(), None, false).await.unwrap());
    assert!(client
        .upload_file(&plain, &domain(), Some("pinguin_shell_rename.png"), false)
        .await
        .unwrap());
    assert!(client.upload_file(&plain, &domain(), None, false).await.unwrap());

    same_name.assert_async().await;
    renamed.assert_async().await;
    listing.assert_async().await;
}

#[tokio::test]
async fn test_file_names_with_slash_are_rejected() {
    let (mut server, client) = logged_in().await;
    let upload = server
        .mock("POST", LISTING)
        .expect(0)
        .create_async()
        .await;

    let uploaded = client
        .upload_file_bytes(b"x".to_vec(), "../escape.png", &domain(), false)
        .await
        .unwrap();
    assert!(!uploaded);
    upload.assert_async().await;
}

#[tokio::test]
async fn test_download_streams_to_disk() {
    let (mut server, client) = logged_in().await;
    let dir = tempfile::tempdir().unwrap();
    let content: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();

    let _listing = server
        .mock("GET", LISTING)
        .with_status(200)
        .with_body(data(json!([
            { "id": 9, "name": "lead.pdf", "fileUrl": format!("{}/download/9", server.url()) }
        ])))
        .create_async()
        .await;
    let download = server
        .mock("GET", "/download/9")
        .with_status(200)
        .with_body(content.clone())
        .create_async()
        .await;

    let target_dir = dir.path().join("sheets");
    let path = client
        .download_file(&domain(), "lead.pdf", &target_dir)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(path, target_dir.join("lead.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), content);
    download.assert_async().await;

    assert!(client
        .download_file(&domain(), "missing.pdf", &target_dir)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_failed_download_writes_nothing() {
    let (mut server, client) = logged_in().await;
    let dir = tempfile::tempdir().unwrap();
    let _missing = server
        .mock("GET", "/download/404")
        .with_status(404)
        .create_async()
        .await;

    let target = dir.path().join("never.pdf");
    let url = format!("{}/download/404", server.url());
    assert!(!client.download_file_from_url(&url, &target).await.unwrap());
    assert!(!target.exists());
}

#[tokio::test]
async fn test_csrf_token_stays_on_site() {
    let (mut server, client) = logged_in().await;
    let mut other = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let own = server
        .mock("GET", "/download/1")
        .match_header("csrf-token", CSRF)
        .with_status(200)
        .with_body("own")
        .create_async()
        .await;
    let foreign = other
        .mock("GET", "/download/2")
        .match_header("csrf-token", Matcher::Missing)
        .with_status(200)
        .with_body("foreign")
        .create_async()
        .await;

    let own_target = dir.path().join("own.txt");
    let foreign_target = dir.path().join("foreign.txt");
    assert!(client
        .download_file_from_url(&format!("{}/download/1", server.url()), &own_target)
        .await
        .unwrap());
    assert!(client
        .download_file_from_url(&format!("{}/download/2", other.url()), &foreign_target)
        .await
        .unwrap());

    assert_eq!(std::fs::read_to_string(&foreign_target).unwrap(), "foreign");
    own.assert_async().await;
    foreign.assert_async().await;
}

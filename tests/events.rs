//
//  churchtools-cli
//  tests/events.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

mod common;

use chrono::NaiveDate;
use churchtools_cli::api::agenda::{AgendaRef, ExportOptions, ExportTarget};
use churchtools_cli::api::events::{Direction, EventQuery};
use mockito::Matcher;
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_event_by_id_is_a_one_element_list() {
    let (mut server, client) = logged_in().await;
    let _event = server
        .mock("GET", "/api/events/12")
        .with_status(200)
        .with_body(data(json!({ "id": 12, "name": "Sunday Service" })))
        .create_async()
        .await;

    let events = client.get_event_by_id(12).await.unwrap().unwrap();
    assert_eq!(events, vec![json!({ "id": 12, "name": "Sunday Service" })]);
}

#[tokio::test]
async fn test_event_date_range_query() {
    let (mut server, client) = logged_in().await;
    let events = server
        .mock("GET", "/api/events")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("from".into(), "2024-03-01".into()),
            Matcher::UrlEncoded("to".into(), "2024-03-31".into()),
            Matcher::UrlEncoded("limit".into(), "50".into()),
        ]))
        .with_status(200)
        .with_body(data(json!([{ "id": 1 }, { "id": 2 }])))
        .create_async()
        .await;

    let query = EventQuery::new()
        .from_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        .to_date("2024-03-31");
    assert_eq!(client.get_events(&query).await.unwrap().unwrap().len(), 2);
    events.assert_async().await;
}

#[tokio::test]
async fn test_event_direction_query() {
    let (mut server, client) = logged_in().await;
    let events = server
        .mock("GET", "/api/events")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("direction".into(), "backward".into()),
            Matcher::UrlEncoded("limit".into(), "3".into()),
        ]))
        .with_status(200)
        .with_body(data(json!([{ "id": 7 }])))
        .create_async()
        .await;

    let query = EventQuery::new().direction(Direction::Backward).limit(3);
    assert_eq!(client.get_events(&query).await.unwrap().unwrap().len(), 1);
    events.assert_async().await;
}

#[tokio::test]
async fn test_event_by_calendar_appointment() {
    let (mut server, client) = logged_in().await;
    let _events = server
        .mock("GET", "/api/events")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("from".into(), "2024-04-07".into()),
            Matcher::UrlEncoded("to".into(), "2024-04-07".into()),
        ]))
        .with_status(200)
        .with_body(data(json!([
            { "id": 1, "appointmentId": 300 },
            { "id": 2, "appointmentId": 301 }
        ])))
        .create_async()
        .await;

    let event = client
        .get_event_by_calendar_appointment(301, "2024-04-07")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event["id"], 2);
    assert!(client
        .get_event_by_calendar_appointment(999, "2024-04-07")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_persons_with_service() {
    let (mut server, client) = logged_in().await;
    let _event = server
        .mock("GET", "/api/events/12")
        .match_query(Matcher::UrlEncoded("include".into(), "eventServices".into()))
        .with_status(200)
        .with_body(data(json!({
            "id": 12,
            "eventServices": [
                { "personId": 4, "serviceId": 1 },
                { "personId": 5, "serviceId": 2 },
                { "personId": 6, "serviceId": 1 }
            ]
        })))
        .create_async()
        .await;

    let rows = client.get_persons_with_service(12, 1).await.unwrap().unwrap();
    let persons: Vec<_> = rows.iter().map(|row| row["personId"].clone()).collect();
    assert_eq!(persons, vec![json!(4), json!(6)]);
}

#[tokio::test]
async fn test_export_agenda_of_event() {
    let (mut server, client) = logged_in().await;
    let dir = tempfile::tempdir().unwrap();

    let _agenda = server
        .mock("GET", "/api/events/12/agenda")
        .with_status(200)
        .with_body(data(json!({ "id": 88, "items": [] })))
        .create_async()
        .await;
    let export = server
        .mock("POST", "/api/agendas/88/export")
        .match_query(Matcher::UrlEncoded("target".into(), "SONG_BEAMER".into()))
        .match_body(Matcher::Json(json!({
            "appendArrangement": true,
            "exportSongs": true,
            "withCategory": true
        })))
        .with_status(200)
        .with_body(data(json!({ "url": format!("{}/exports/88.zip", server.url()) })))
        .create_async()
        .await;
    let package = server
        .mock("GET", "/exports/88.zip")
        .with_status(200)
        .with_body("PK-zip-content")
        .create_async()
        .await;

    let file = client
        .export_agenda(
            AgendaRef::Event(12),
            ExportTarget::SongBeamer,
            dir.path(),
            &ExportOptions::default(),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(file, dir.path().join("SONG_BEAMER_88.zip"));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "PK-zip-content");
    export.assert_async().await;
    package.assert_async().await;
}

#[tokio::test]
async fn test_export_of_missing_agenda() {
    let (mut server, client) = logged_in().await;
    let dir = tempfile::tempdir().unwrap();
    let _agenda = server
        .mock("GET", "/api/events/13/agenda")
        .with_status(404)
        .create_async()
        .await;
    let export = server
        .mock("POST", Matcher::Regex("^/api/agendas/".into()))
        .expect(0)
        .create_async()
        .await;

    let result = client
        .export_agenda(
            AgendaRef::Event(13),
            ExportTarget::ProPresenter7,
            dir.path(),
            &ExportOptions::default(),
        )
        .await
        .unwrap();
    assert!(result.is_none());
    export.assert_async().await;
}

#[tokio::test]
async fn test_set_service_count_keeps_siblings() {
    let (mut server, client) = logged_in().await;

    let _services = server
        .mock("GET", "/api/services")
        .with_status(200)
        .with_body(data(json!([
            { "id": 1, "name": "Sound", "serviceGroupId": 10 },
            { "id": 2, "name": "Light", "serviceGroupId": 10 },
            { "id": 3, "name": "Guitar", "serviceGroupId": 20 }
        ])))
        .create_async()
        .await;
    let _event = server
        .mock("POST", "/")
        .match_query(ajax_query("getAllEventData"))
        .with_status(200)
        .with_body(ajax_success(json!({
            "12": {
                "id": "12",
                "admin": "4, 9",
                "services": [
                    { "service_id": "1", "valid_yn": "1" },
                    { "service_id": "2", "valid_yn": "1" },
                    { "service_id": "2", "valid_yn": "1" },
                    { "service_id": "3", "valid_yn": "1" }
                ]
            }
        })))
        .create_async()
        .await;
    let update = server
        .mock("POST", "/")
        .match_query(ajax_query("addOrRemoveServiceToEvent"))
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "12".into()),
            Matcher::UrlEncoded("col0".into(), "2".into()),
            Matcher::UrlEncoded("val0".into(), "checked".into()),
            Matcher::UrlEncoded("count0".into(), "2".into()),
            Matcher::UrlEncoded("col1".into(), "1".into()),
            Matcher::UrlEncoded("val1".into(), "checked".into()),
            Matcher::UrlEncoded("count1".into(), "3".into()),
        ]))
        .with_status(200)
        .with_body(ajax_success(json!(null)))
        .create_async()
        .await;

    assert_eq!(client.get_event_service_count(12, 2).await.unwrap(), Some(2));
    assert_eq!(client.get_event_admins(12).await.unwrap(), Some(vec![4, 9]));
    assert!(client.set_event_service_count(12, 1, 3).await.unwrap());
    update.assert_async().await;
}

#[tokio::test]
async fn test_replace_event_admins() {
    let (mut server, client) = logged_in().await;
    let update = server
        .mock("POST", "/")
        .match_query(ajax_query("updateEventInfo"))
        .match_header("csrf-token", CSRF)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "12".into()),
            Matcher::UrlEncoded("admin".into(), "4, 9, 17".into()),
        ]))
        .with_status(200)
        .with_body(ajax_success(json!(null)))
        .create_async()
        .await;
    let _event = server
        .mock("POST", "/")
        .match_query(ajax_query("getAllEventData"))
        .match_body(Matcher::UrlEncoded("id".into(), "12".into()))
        .with_status(200)
        .with_body(ajax_success(json!({ "12": { "id": "12", "admin": "4, 9, 17" } })))
        .create_async()
        .await;

    assert!(client.set_event_admins(12, &[4, 9, 17]).await.unwrap());
    update.assert_async().await;
    assert_eq!(client.get_event_admins(12).await.unwrap(), Some(vec![4, 9, 17]));
}

#[tokio::test]
async fn test_refused_admin_update_is_false() {
    let (mut server, client) = logged_in().await;
    let _refused = server
        .mock("POST", "/")
        .match_query(ajax_query("updateEventInfo"))
        .with_status(200)
        .with_body(json!({ "status": "fail", "data": "No permission" }).to_string())
        .create_async()
        .await;

    assert!(!client.set_event_admins(12, &[4]).await.unwrap());
}

#[tokio::test]
async fn test_service_by_id() {
    let (mut server, client) = logged_in().await;
    let service = server
        .mock("GET", "/api/services/2")
        .with_status(200)
        .with_body(data(json!({ "id": 2, "name": "Light", "serviceGroupId": 10 })))
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/api/services/99")
        .with_status(404)
        .create_async()
        .await;

    assert_eq!(client.get_service(2).await.unwrap().unwrap()["name"], "Light");
    assert!(client.get_service(99).await.unwrap().is_none());
    service.assert_async().await;
}

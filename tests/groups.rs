//
//  churchtools-cli
//  tests/groups.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

mod common;

use churchtools_cli::api::groups::{GroupMembersQuery, Membership, NewGroup};
use churchtools_cli::api::resources::ResourceMasterdata;
use churchtools_cli::api::tags::TagDomain;
use mockito::Matcher;
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_create_group_with_force() {
    let (mut server, client) = logged_in().await;
    let create = server
        .mock("POST", "/api/groups")
        .match_header("csrf-token", CSRF)
        .match_body(Matcher::Json(json!({
            "name": "Youth Band",
            "groupStatusId": 1,
            "groupTypeId": 2,
            "campusId": 0,
            "force": true
        })))
        .with_status(201)
        .with_body(data(json!({ "id": 501, "name": "Youth Band" })))
        .create_async()
        .await;

    let group = NewGroup::new("Youth Band", 1, 2).campus(0).force(true);
    let created = client.create_group(&group).await.unwrap().unwrap();
    assert_eq!(created["id"], 501);
    create.assert_async().await;
}

#[tokio::test]
async fn test_duplicate_group_is_not_created() {
    let (mut server, client) = logged_in().await;
    let _conflict = server
        .mock("POST", "/api/groups")
        .with_status(400)
        .with_body(json!({ "message": "Group name already exists" }).to_string())
        .create_async()
        .await;

    let group = NewGroup::new("Youth Band", 1, 2);
    assert!(client.create_group(&group).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_and_delete_group() {
    let (mut server, client) = logged_in().await;
    let update = server
        .mock("PATCH", "/api/groups/501")
        .match_body(Matcher::Json(json!({ "name": "Youth Band 2" })))
        .with_status(200)
        .with_body(data(json!({ "id": 501, "name": "Youth Band 2" })))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/groups/501")
        .with_status(204)
        .create_async()
        .await;

    let updated = client
        .update_group(501, &json!({ "name": "Youth Band 2" }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated["name"], "Youth Band 2");
    assert!(client.delete_group(501).await.unwrap());
    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_group_members_filtered_by_role() {
    let (mut server, client) = logged_in().await;
    let _members = server
        .mock("GET", "/api/groups/7/members")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(data(json!([
            { "personId": 4, "groupTypeRoleId": 15 },
            { "personId": 5, "groupTypeRoleId": 16 },
            { "personId": 6, "groupTypeRoleId": 15 }
        ])))
        .create_async()
        .await;

    let all = client.get_group_members(7, &[]).await.unwrap().unwrap();
    assert_eq!(all.len(), 3);

    let leaders = client.get_group_members(7, &[15]).await.unwrap().unwrap();
    let persons: Vec<_> = leaders.iter().map(|m| m["personId"].clone()).collect();
    assert_eq!(persons, vec![json!(4), json!(6)]);
}

#[tokio::test]
async fn test_members_across_groups_query() {
    let (mut server, client) = logged_in().await;
    let members = server
        .mock("GET", "/api/groups/members")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("with_deleted".into(), "false".into()),
            Matcher::UrlEncoded("ids[]".into(), "7".into()),
            Matcher::UrlEncoded("grouptype_role_ids[]".into(), "15".into()),
        ]))
        .with_status(200)
        .with_body(data(json!([{ "personId": 4, "groupId": 7 }])))
        .create_async()
        .await;

    let query = GroupMembersQuery {
        group_ids: vec![7],
        role_ids: vec![15],
        ..Default::default()
    };
    assert_eq!(client.get_groups_members(&query).await.unwrap().unwrap().len(), 1);
    members.assert_async().await;
}

#[tokio::test]
async fn test_add_and_remove_group_member() {
    let (mut server, client) = logged_in().await;
    let add = server
        .mock("PUT", "/api/groups/7/members/4")
        .match_body(Matcher::Json(json!({
            "groupTypeRoleId": 15,
            "groupMemberStatus": "active"
        })))
        .with_status(200)
        .with_body(data(json!({ "personId": 4, "groupTypeRoleId": 15 })))
        .create_async()
        .await;
    let remove = server
        .mock("DELETE", "/api/groups/7/members/4")
        .with_status(204)
        .create_async()
        .await;

    let membership = Membership {
        role_id: Some(15),
        status: Some("active".to_string()),
    };
    let added = client.add_group_member(7, 4, &membership).await.unwrap().unwrap();
    assert_eq!(added["groupTypeRoleId"], 15);
    assert!(client.remove_group_member(7, 4).await.unwrap());
    add.assert_async().await;
    remove.assert_async().await;
}

#[tokio::test]
async fn test_hierarchies_are_keyed_by_group() {
    let (mut server, client) = logged_in().await;
    let _hierarchies = server
        .mock("GET", "/api/groups/hierarchies")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(data(json!([
            { "groupId": 7, "parents": [1], "children": [] },
            { "groupId": 1, "parents": [], "children": [7] }
        ])))
        .create_async()
        .await;

    let hierarchies = client.get_group_hierarchies().await.unwrap().unwrap();
    assert_eq!(hierarchies.len(), 2);
    assert_eq!(hierarchies[&7]["parents"], json!([1]));
    assert_eq!(hierarchies[&1]["children"], json!([7]));
}

#[tokio::test]
async fn test_parent_groups() {
    let (mut server, client) = logged_in().await;
    let add = server
        .mock("PUT", "/api/groups/7/parents/1")
        .with_status(201)
        .create_async()
        .await;
    let _remove = server
        .mock("DELETE", "/api/groups/7/parents/1")
        .with_status(404)
        .with_body(json!({ "message": "Relation not found" }).to_string())
        .create_async()
        .await;

    assert!(client.add_parent_group(7, 1).await.unwrap());
    assert!(!client.remove_parent_group(7, 1).await.unwrap());
    add.assert_async().await;
}

#[tokio::test]
async fn test_song_tag_added_by_name_refreshes_song_cache() {
    let (mut server, client) = logged_in().await;
    let catalog = server
        .mock("POST", "/")
        .match_query(ajax_query("getAllSongs"))
        .with_status(200)
        .with_body(ajax_success(json!({
            "songs": { "408": { "id": "408", "bezeichnung": "Amazing Grace", "tags": [] } }
        })))
        .expect(2)
        .create_async()
        .await;
    let tag = server
        .mock("POST", "/api/tags/song/408")
        .match_body(Matcher::Json(json!({ "name": "Easter" })))
        .with_status(201)
        .create_async()
        .await;

    assert_eq!(client.get_song_tags(408).await.unwrap(), Some(vec![]));
    assert!(client.add_tag(TagDomain::Song, 408, "Easter").await.unwrap());
    client.get_song_tags(408).await.unwrap();

    tag.assert_async().await;
    catalog.assert_async().await;
}

#[tokio::test]
async fn test_tag_lookups() {
    let (mut server, client) = logged_in().await;
    let _tags = server
        .mock("GET", "/api/tags/person")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(data(json!([
            { "id": 3, "name": "Volunteer" },
            { "id": 8, "name": "Staff" }
        ])))
        .create_async()
        .await;

    let by_id = client.get_tag_names_by_id(TagDomain::Person).await.unwrap().unwrap();
    assert_eq!(by_id[&8], "Staff");
    let by_name = client.get_tag_ids_by_name(TagDomain::Person).await.unwrap().unwrap();
    assert_eq!(by_name["Volunteer"], 3);
}

#[tokio::test]
async fn test_resource_masterdata_catalogs() {
    let (mut server, client) = logged_in().await;
    let _masterdata = server
        .mock("GET", "/api/resource/masterdata")
        .with_status(200)
        .with_body(data(json!({
            "resourceTypes": [{ "id": 1, "name": "Rooms" }],
            "resources": [
                { "id": 10, "name": "Main Hall", "resourceTypeId": 1 },
                { "id": 11, "name": "Chapel", "resourceTypeId": 1 }
            ]
        })))
        .create_async()
        .await;

    let types = client
        .get_resource_masterdata(ResourceMasterdata::ResourceTypes)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(types.len(), 1);

    let resources = client
        .get_resource_masterdata(ResourceMasterdata::Resources)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resources[1]["name"], "Chapel");
}

#[tokio::test]
async fn test_grouptype_and_group_permissions() {
    let (mut server, client) = logged_in().await;
    let grouptype = server
        .mock("GET", "/api/group/grouptypes/2")
        .with_status(200)
        .with_body(data(json!({ "id": 2, "name": "Team" })))
        .create_async()
        .await;
    let permissions = server
        .mock("GET", "/api/permissions/internal/groups/7")
        .with_status(200)
        .with_body(data(json!({ "churchdb": { "+see group": 2 } })))
        .create_async()
        .await;

    assert_eq!(client.get_grouptype(2).await.unwrap().unwrap()["name"], "Team");
    let granted = client.get_group_permissions(7).await.unwrap().unwrap();
    assert_eq!(granted["churchdb"]["+see group"], 2);
    grouptype.assert_async().await;
    permissions.assert_async().await;
}

#[tokio::test]
async fn test_global_permissions_and_db_fields() {
    let (mut server, client) = logged_in().await;
    let global = server
        .mock("GET", "/api/permissions/global")
        .with_status(200)
        .with_body(data(json!({ "churchservice": { "view": true } })))
        .create_async()
        .await;
    let fields = server
        .mock("GET", "/api/dbfields")
        .match_query(Matcher::UrlEncoded("include[]".into(), "options".into()))
        .with_status(200)
        .with_body(data(json!([
            { "id": 1, "key": "firstName", "options": [] },
            { "id": 2, "key": "sexId", "options": [{ "id": 1 }, { "id": 2 }] }
        ])))
        .create_async()
        .await;

    let permissions = client.get_global_permissions().await.unwrap().unwrap();
    assert_eq!(permissions["churchservice"]["view"], true);

    let db_fields = client.get_db_fields().await.unwrap().unwrap();
    assert_eq!(db_fields.len(), 2);
    assert_eq!(db_fields[1]["key"], "sexId");

    global.assert_async().await;
    fields.assert_async().await;
}

//
//  churchtools-cli
//  api/groups.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Groups, group types, memberships and group hierarchy.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use super::common::{id_value, index_by_key, ApiRequest, Result};
use super::ChurchToolsClient;

/// Fields of a group to create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGroup {
    pub name: String,
    pub group_status_id: i64,
    pub group_type_id: i64,
    pub campus_id: Option<i64>,
    pub superior_group_id: Option<i64>,
    /// Create even when a group with the same name exists.
    pub force: bool,
}

impl NewGroup {
    pub fn new(name: impl Into<String>, group_status_id: i64, group_type_id: i64) -> Self {
        Self {
            name: name.into(),
            group_status_id,
            group_type_id,
            campus_id: None,
            superior_group_id: None,
            force: false,
        }
    }

    pub fn campus(mut self, campus_id: i64) -> Self {
        self.campus_id = Some(campus_id);
        self
    }

    pub fn superior_group(mut self, group_id: i64) -> Self {
        self.superior_group_id = Some(group_id);
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".into(), json!(self.name));
        body.insert("groupStatusId".into(), json!(self.group_status_id));
        body.insert("groupTypeId".into(), json!(self.group_type_id));
        if let Some(campus_id) = self.campus_id {
            body.insert("campusId".into(), json!(campus_id));
        }
        if let Some(superior) = self.superior_group_id {
            body.insert("superiorGroupId".into(), json!(superior));
        }
        body.insert("force".into(), json!(self.force));
        Value::Object(body)
    }
}

/// Filters for [`ChurchToolsClient::get_groups_members`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMembersQuery {
    pub group_ids: Vec<i64>,
    pub role_ids: Vec<i64>,
    pub person_ids: Vec<i64>,
    pub with_deleted: bool,
}

impl GroupMembersQuery {
    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::get("/api/groups/members")
            .query("with_deleted", self.with_deleted)
            .query_list("ids[]", &self.group_ids)
            .query_list("grouptype_role_ids[]", &self.role_ids)
            .query_list("person_ids[]", &self.person_ids)
    }
}

/// Membership fields for [`ChurchToolsClient::add_group_member`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    pub role_id: Option<i64>,
    /// `active`, `requested`, `waiting` or `to_delete`.
    pub status: Option<String>,
}

impl Membership {
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        if let Some(role_id) = self.role_id {
            body.insert("groupTypeRoleId".into(), json!(role_id));
        }
        if let Some(status) = &self.status {
            body.insert("groupMemberStatus".into(), json!(status));
        }
        Value::Object(body)
    }
}

impl ChurchToolsClient {
    pub async fn get_groups(&self) -> Result<Option<Vec<Value>>> {
        self.get_paginated(&ApiRequest::get("/api/groups"), "groups")
            .await
    }

    pub async fn get_group(&self, group_id: i64) -> Result<Option<Value>> {
        let request = ApiRequest::get(format!("/api/groups/{}", group_id));
        self.get_data(&request, &format!("group {}", group_id)).await
    }

    /// Parent/child relations of all groups, keyed by `groupId`.
    pub async fn get_group_hierarchies(&self) -> Result<Option<BTreeMap<i64, Value>>> {
        let request = ApiRequest::get("/api/groups/hierarchies");
        Ok(self
            .get_paginated(&request, "group hierarchies")
            .await?
            .map(|records| index_by_key(records, "groupId")))
    }

    pub async fn get_group_statistics(&self, group_id: i64) -> Result<Option<Value>> {
        let request = ApiRequest::get(format!("/api/groups/{}/statistics", group_id));
        self.get_data(&request, &format!("statistics of group {}", group_id))
            .await
    }

    /// Creates a group and returns it.
    ///
    /// The server rejects a duplicate name unless `force` is set.
    pub async fn create_group(&self, group: &NewGroup) -> Result<Option<Value>> {
        let request = ApiRequest::post("/api/groups").json(group.to_json());
        let response = self.execute(&request).await?;
        if response.is_success() {
            let created = response.data()?;
            info!(name = %group.name, "Group created");
            return Ok(Some(created));
        }

        if !group.force {
            warn!(
                name = %group.name,
                status = response.status.as_u16(),
                "Group not created; a group with this name may already exist (retry with force)"
            );
        }
        response.report(&format!("creation of group '{}'", group.name));
        Ok(None)
    }

    /// Applies a partial update and returns the updated group.
    pub async fn update_group(&self, group_id: i64, changes: &Value) -> Result<Option<Value>> {
        let request = ApiRequest::patch(format!("/api/groups/{}", group_id)).json(changes.clone());
        self.get_data(&request, &format!("update of group {}", group_id))
            .await
    }

    pub async fn delete_group(&self, group_id: i64) -> Result<bool> {
        let request = ApiRequest::delete(format!("/api/groups/{}", group_id));
        self.mutate(&request, &format!("deletion of group {}", group_id))
            .await
    }

    pub async fn get_grouptypes(&self) -> Result<Option<Vec<Value>>> {
        self.get_paginated(&ApiRequest::get("/api/group/grouptypes"), "group types")
            .await
    }

    pub async fn get_grouptype(&self, grouptype_id: i64) -> Result<Option<Value>> {
        let request = ApiRequest::get(format!("/api/group/grouptypes/{}", grouptype_id));
        self.get_data(&request, &format!("group type {}", grouptype_id))
            .await
    }

    /// Permissions of the logged-in user within one group.
    pub async fn get_group_permissions(&self, group_id: i64) -> Result<Option<Value>> {
        let request = ApiRequest::get(format!("/api/permissions/internal/groups/{}", group_id));
        self.get_data(&request, &format!("permissions for group {}", group_id))
            .await
    }

    /// Members of a group, optionally only those holding one of `role_ids`.
    pub async fn get_group_members(&self, group_id: i64, role_ids: &[i64]) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get(format!("/api/groups/{}/members", group_id));
        let Some(members) = self
            .get_paginated(&request, &format!("members of group {}", group_id))
            .await?
        else {
            return Ok(None);
        };

        if role_ids.is_empty() {
            return Ok(Some(members));
        }
        Ok(Some(
            members
                .into_iter()
                .filter(|member| {
                    member
                        .get("groupTypeRoleId")
                        .and_then(id_value)
                        .map(|role| role_ids.contains(&role))
                        .unwrap_or(false)
                })
                .collect(),
        ))
    }

    /// Memberships across groups.
    pub async fn get_groups_members(&self, query: &GroupMembersQuery) -> Result<Option<Vec<Value>>> {
        self.get_paginated(&query.to_request(), "group members")
            .await
    }

    /// Adds a person to a group (or updates the membership) and returns the
    /// membership.
    pub async fn add_group_member(
        &self,
        group_id: i64,
        person_id: i64,
        membership: &Membership,
    ) -> Result<Option<Value>> {
        let request = ApiRequest::put(format!("/api/groups/{}/members/{}", group_id, person_id))
            .json(membership.to_json());
        self.get_data(
            &request,
            &format!("membership of person {} in group {}", person_id, group_id),
        )
        .await
    }

    pub async fn remove_group_member(&self, group_id: i64, person_id: i64) -> Result<bool> {
        let request = ApiRequest::delete(format!("/api/groups/{}/members/{}", group_id, person_id));
        self.mutate(
            &request,
            &format!("removal of person {} from group {}", person_id, group_id),
        )
        .await
    }

    /// Roles available in a group.
    pub async fn get_group_roles(&self, group_id: i64) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get(format!("/api/groups/{}/roles", group_id));
        self.get_paginated(&request, &format!("roles of group {}", group_id))
            .await
    }

    pub async fn add_parent_group(&self, group_id: i64, parent_group_id: i64) -> Result<bool> {
        let request = ApiRequest::put(format!("/api/groups/{}/parents/{}", group_id, parent_group_id));
        self.mutate(
            &request,
            &format!("adding parent {} to group {}", parent_group_id, group_id),
        )
        .await
    }

    pub async fn remove_parent_group(&self, group_id: i64, parent_group_id: i64) -> Result<bool> {
        let request =
            ApiRequest::delete(format!("/api/groups/{}/parents/{}", group_id, parent_group_id));
        self.mutate(
            &request,
            &format!("removing parent {} from group {}", parent_group_id, group_id),
        )
        .await
    }
}

//
//  churchtools-cli
//  api/tags.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Tags of songs, persons and groups.
//!
//! Adding a tag by name creates it on the server when it does not exist
//! yet. Tags of songs are also visible through the legacy song catalog, see
//! [`crate::api::ajax::songs`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use super::common::{id_value, ApiRequest, Result};
use super::ChurchToolsClient;

/// Kind of object a tag is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDomain {
    Song,
    Person,
    Group,
}

impl TagDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagDomain::Song => "song",
            TagDomain::Person => "person",
            TagDomain::Group => "group",
        }
    }
}

impl fmt::Display for TagDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TagDomain {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "song" | "songs" => Ok(TagDomain::Song),
            "person" | "persons" => Ok(TagDomain::Person),
            "group" | "groups" => Ok(TagDomain::Group),
            other => Err(format!("unknown tag domain '{}' (expected song, person or group)", other)),
        }
    }
}

fn id_and_name(tag: &Value) -> Option<(i64, String)> {
    let id = tag.get("id").and_then(id_value)?;
    let name = tag.get("name").and_then(Value::as_str)?;
    Some((id, name.to_string()))
}

/// `{id: name}` view of a tag list.
pub fn tag_names_by_id(tags: &[Value]) -> BTreeMap<i64, String> {
    tags.iter().filter_map(id_and_name).collect()
}

/// `{name: id}` view of a tag list.
pub fn tag_ids_by_name(tags: &[Value]) -> BTreeMap<String, i64> {
    tags.iter()
        .filter_map(id_and_name)
        .map(|(id, name)| (name, id))
        .collect()
}

impl ChurchToolsClient {
    /// All tags of a domain.
    pub async fn get_tags(&self, domain: TagDomain) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get(format!("/api/tags/{}", domain));
        self.get_paginated(&request, &format!("{} tags", domain))
            .await
    }

    pub async fn get_tag_names_by_id(&self, domain: TagDomain) -> Result<Option<BTreeMap<i64, String>>> {
        Ok(self.get_tags(domain).await?.map(|tags| tag_names_by_id(&tags)))
    }

    pub async fn get_tag_ids_by_name(&self, domain: TagDomain) -> Result<Option<BTreeMap<String, i64>>> {
        Ok(self.get_tags(domain).await?.map(|tags| tag_ids_by_name(&tags)))
    }

    /// Tags attached to one object.
    pub async fn get_tags_of(&self, domain: TagDomain, object_id: i64) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get(format!("/api/tags/{}/{}", domain, object_id));
        self.get_paginated(&request, &format!("tags of {} {}", domain, object_id))
            .await
    }

    /// Attaches a tag by name.
    pub async fn add_tag(&self, domain: TagDomain, object_id: i64, name: &str) -> Result<bool> {
        let request = ApiRequest::post(format!("/api/tags/{}/{}", domain, object_id))
            .json(json!({ "name": name }));
        let added = self
            .mutate(&request, &format!("tagging {} {} with '{}'", domain, object_id, name))
            .await?;
        if added && domain == TagDomain::Song {
            self.song_cache.lock().await.invalidate();
        }
        Ok(added)
    }

    pub async fn remove_tag(&self, domain: TagDomain, object_id: i64, tag_id: i64) -> Result<bool> {
        let request = ApiRequest::delete(format!("/api/tags/{}/{}/{}", domain, object_id, tag_id));
        let removed = self
            .mutate(
                &request,
                &format!("removing tag {} from {} {}", tag_id, domain, object_id),
            )
            .await?;
        if removed && domain == TagDomain::Song {
            self.song_cache.lock().await.invalidate();
        }
        Ok(removed)
    }
}

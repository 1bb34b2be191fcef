//
//  churchtools-cli
//  api/songs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Songs and arrangements.
//!
//! Reads go through REST (`/api/songs`). Writes use the legacy AJAX actions
//! (`addNewSong`, `editSong`, `deleteSong`, `addArrangement`,
//! `editArrangement`, `delArrangement`) because REST exposes no song
//! mutations. The legacy actions replace every field they are given, so
//! edits are merged over the current REST record first.
//!
//! Field mapping between the two surfaces:
//!
//! | REST | AJAX |
//! |------|------|
//! | `name` | `bezeichnung` |
//! | `category.id` | `songcategory_id` |
//! | `shouldPractice` | `practice_yn` |
//! | `keyOfArrangement` | `tonality` |
//! | `duration` (seconds) | `length_min` + `length_sec` |
//!
//! Song tags are handled in [`crate::api::ajax::songs`].

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{info, warn};

use super::common::{form_fields, id_value, into_list, record_id, ApiRequest, Result, DEFAULT_PAGE_SIZE};
use super::ChurchToolsClient;

/// A song to create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSong {
    pub title: String,
    pub category_id: i64,
    pub author: String,
    pub copyright: String,
    pub ccli: String,
    pub tonality: String,
    pub bpm: String,
    pub beat: String,
}

impl NewSong {
    pub fn new(title: impl Into<String>, category_id: i64) -> Self {
        Self {
            title: title.into(),
            category_id,
            ..Default::default()
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = copyright.into();
        self
    }

    pub fn ccli(mut self, ccli: impl Into<String>) -> Self {
        self.ccli = ccli.into();
        self
    }

    pub fn tonality(mut self, tonality: impl Into<String>) -> Self {
        self.tonality = tonality.into();
        self
    }

    pub fn bpm(mut self, bpm: impl Into<String>) -> Self {
        self.bpm = bpm.into();
        self
    }

    pub fn beat(mut self, beat: impl Into<String>) -> Self {
        self.beat = beat.into();
        self
    }

    fn to_form(&self) -> Vec<(String, String)> {
        form_fields([
            ("bezeichnung", self.title.clone()),
            ("songcategory_id", self.category_id.to_string()),
            ("author", self.author.clone()),
            ("copyright", self.copyright.clone()),
            ("ccli", self.ccli.clone()),
            ("tonality", self.tonality.clone()),
            ("bpm", self.bpm.clone()),
            ("beat", self.beat.clone()),
        ])
    }
}

/// Fields to change on an existing song. `None` keeps the server's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongChanges {
    pub title: Option<String>,
    pub category_id: Option<i64>,
    pub author: Option<String>,
    pub copyright: Option<String>,
    pub ccli: Option<String>,
    pub should_practice: Option<bool>,
}

impl SongChanges {
    /// Builds the `editSong` form from these changes over the current REST record.
    pub fn merge_over(&self, song_id: i64, current: &Value) -> Vec<(String, String)> {
        let category_id = self
            .category_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| text_field(current.get("category").unwrap_or(&Value::Null), "id"));
        let practice = self
            .should_practice
            .unwrap_or_else(|| current.get("shouldPractice").map(truthy).unwrap_or(false));

        form_fields([
            ("id", song_id.to_string()),
            ("bezeichnung", pick(&self.title, current, "name")),
            ("songcategory_id", category_id),
            ("author", pick(&self.author, current, "author")),
            ("copyright", pick(&self.copyright, current, "copyright")),
            ("ccli", pick(&self.ccli, current, "ccli")),
            ("practice_yn", String::from(if practice { "1" } else { "0" })),
        ])
    }
}

/// Fields to change on an existing arrangement. `None` keeps the server's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrangementChanges {
    pub name: Option<String>,
    pub key: Option<String>,
    pub bpm: Option<String>,
    pub beat: Option<String>,
    pub duration_secs: Option<u32>,
    pub note: Option<String>,
}

impl ArrangementChanges {
    /// Builds the `editArrangement` form from these changes over the current
    /// REST arrangement record.
    pub fn merge_over(&self, song_id: i64, arrangement_id: i64, current: &Value) -> Vec<(String, String)> {
        let duration = self.duration_secs.map(u64::from).unwrap_or_else(|| {
            current
                .get("duration")
                .and_then(|d| d.as_u64().or_else(|| d.as_str().and_then(|s| s.parse().ok())))
                .unwrap_or(0)
        });

        form_fields([
            ("id", arrangement_id.to_string()),
            ("song_id", song_id.to_string()),
            ("bezeichnung", pick(&self.name, current, "name")),
            ("tonality", pick(&self.key, current, "keyOfArrangement")),
            ("bpm", pick(&self.bpm, current, "bpm")),
            ("beat", pick(&self.beat, current, "beat")),
            ("length_min", (duration / 60).to_string()),
            ("length_sec", (duration % 60).to_string()),
            ("note", pick(&self.note, current, "note")),
        ])
    }
}

fn pick(change: &Option<String>, current: &Value, key: &str) -> String {
    change.clone().unwrap_or_else(|| text_field(current, key))
}

/// Reads a field as form text; `null` and missing fields become empty.
fn text_field(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(Value::Bool(b)) => String::from(if *b { "1" } else { "0" }),
        Some(other) => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

impl ChurchToolsClient {
    pub async fn get_songs(&self) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get("/api/songs").query("limit", DEFAULT_PAGE_SIZE);
        self.get_paginated(&request, "songs").await
    }

    pub async fn get_song(&self, song_id: i64) -> Result<Option<Value>> {
        let request = ApiRequest::get(format!("/api/songs/{}", song_id));
        self.get_data(&request, &format!("song {}", song_id)).await
    }

    /// Creates a song and returns its id.
    pub async fn create_song(&self, song: &NewSong) -> Result<Option<i64>> {
        let created = self.ajax("addNewSong", song.to_form()).await?;
        self.song_cache.lock().await.invalidate();

        let Some(data) = created else {
            return Ok(None);
        };
        match id_value(&data) {
            Some(id) => {
                info!(id, title = %song.title, "Song created");
                Ok(Some(id))
            }
            None => {
                warn!(data = %data, "addNewSong answered without a song id");
                Ok(None)
            }
        }
    }

    /// Changes a song, keeping every field not named in `changes`.
    pub async fn edit_song(&self, song_id: i64, changes: &SongChanges) -> Result<bool> {
        let Some(current) = self.get_song(song_id).await? else {
            warn!(song_id, "Cannot edit song that could not be loaded");
            return Ok(false);
        };

        let edited = self
            .ajax("editSong", changes.merge_over(song_id, &current))
            .await?
            .is_some();
        self.song_cache.lock().await.invalidate();
        Ok(edited)
    }

    pub async fn delete_song(&self, song_id: i64) -> Result<bool> {
        let deleted = self
            .ajax("deleteSong", form_fields([("id", song_id)]))
            .await?
            .is_some();
        self.song_cache.lock().await.invalidate();
        Ok(deleted)
    }

    /// Arrangements of a song, as embedded in its REST record.
    pub async fn get_song_arrangements(&self, song_id: i64) -> Result<Option<Vec<Value>>> {
        Ok(self.get_song(song_id).await?.map(|mut song| {
            into_list(song.get_mut("arrangements").map(Value::take).unwrap_or(Value::Null))
        }))
    }

    pub async fn get_song_arrangement(&self, song_id: i64, arrangement_id: i64) -> Result<Option<Value>> {
        let Some(arrangements) = self.get_song_arrangements(song_id).await? else {
            return Ok(None);
        };
        let found = arrangements
            .into_iter()
            .find(|arrangement| record_id(arrangement) == Some(arrangement_id));
        if found.is_none() {
            info!(song_id, arrangement_id, "Arrangement not found");
        }
        Ok(found)
    }

    /// Adds an arrangement to a song and returns its id.
    pub async fn create_song_arrangement(&self, song_id: i64, name: &str) -> Result<Option<i64>> {
        let fields = form_fields([("song_id", song_id.to_string()), ("bezeichnung", name.to_string())]);
        let Some(data) = self.ajax("addArrangement", fields).await? else {
            return Ok(None);
        };
        Ok(id_value(&data))
    }

    pub async fn edit_song_arrangement(
        &self,
        song_id: i64,
        arrangement_id: i64,
        changes: &ArrangementChanges,
    ) -> Result<bool> {
        let Some(current) = self.get_song_arrangement(song_id, arrangement_id).await? else {
            warn!(song_id, arrangement_id, "Cannot edit arrangement that could not be loaded");
            return Ok(false);
        };

        let fields = changes.merge_over(song_id, arrangement_id, &current);
        Ok(self.ajax("editArrangement", fields).await?.is_some())
    }

    pub async fn delete_song_arrangement(&self, song_id: i64, arrangement_id: i64) -> Result<bool> {
        let fields = form_fields([("song_id", song_id), ("id", arrangement_id)]);
        Ok(self.ajax("delArrangement", fields).await?.is_some())
    }

    /// Song categories as `name -> id`.
    pub async fn get_song_category_map(&self) -> Result<Option<BTreeMap<String, i64>>> {
        let Some(categories) = self.get_event_masterdata_of("songCategories").await? else {
            return Ok(None);
        };
        Ok(Some(name_map(&categories, &["name"])))
    }

    /// Song sources as `shortname -> id` (falling back to the name).
    pub async fn get_song_source_map(&self) -> Result<Option<BTreeMap<String, i64>>> {
        let Some(sources) = self.get_event_masterdata_of("songSources").await? else {
            return Ok(None);
        };
        Ok(Some(name_map(&sources, &["shortname", "name"])))
    }

    /// Resolves a song category name (case-insensitive) to its id.
    pub async fn lookup_song_category_id(&self, name: &str) -> Result<Option<i64>> {
        Ok(self
            .get_song_category_map()
            .await?
            .and_then(|map| lookup_ignoring_case(&map, name)))
    }

    /// Resolves a song source shortname or name (case-insensitive) to its id.
    pub async fn lookup_song_source_id(&self, key: &str) -> Result<Option<i64>> {
        let Some(sources) = self.get_event_masterdata_of("songSources").await? else {
            return Ok(None);
        };
        Ok(sources.iter().find_map(|source| {
            let matches = ["shortname", "name", "nameTranslated"].iter().any(|field| {
                source
                    .get(*field)
                    .and_then(Value::as_str)
                    .map(|value| value.eq_ignore_ascii_case(key))
                    .unwrap_or(false)
            });
            matches.then(|| record_id(source)).flatten()
        }))
    }
}

/// Builds `label -> id` from records, taking the label from the first of
/// `fields` that is set.
fn name_map(records: &[Value], fields: &[&str]) -> BTreeMap<String, i64> {
    records
        .iter()
        .filter_map(|record| {
            let label = fields.iter().find_map(|field| {
                record
                    .get(*field)
                    .and_then(Value::as_str)
                    .filter(|label| !label.is_empty())
            })?;
            Some((label.to_string(), record_id(record)?))
        })
        .collect()
}

fn lookup_ignoring_case(map: &BTreeMap<String, i64>, key: &str) -> Option<i64> {
    map.iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(key))
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form_value<'a>(form: &'a [(String, String)], key: &str) -> &'a str {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("<missing>")
    }

    #[test]
    fn test_new_song_form() {
        let form = NewSong::new("t", 13).author("Anon").to_form();
        assert_eq!(form_value(&form, "bezeichnung"), "t");
        assert_eq!(form_value(&form, "songcategory_id"), "13");
        assert_eq!(form_value(&form, "author"), "Anon");
        assert_eq!(form_value(&form, "ccli"), "");
    }

    #[test]
    fn test_song_changes_merge_over_current() {
        let current = json!({
            "id": 777,
            "name": "t",
            "category": {"id": 13, "name": "Worship"},
            "author": "Anon",
            "copyright": "PD",
            "ccli": "12345",
            "shouldPractice": true
        });
        let changes = SongChanges {
            title: Some("t2".to_string()),
            ..Default::default()
        };
        let form = changes.merge_over(777, &current);
        assert_eq!(form_value(&form, "id"), "777");
        assert_eq!(form_value(&form, "bezeichnung"), "t2");
        assert_eq!(form_value(&form, "songcategory_id"), "13");
        assert_eq!(form_value(&form, "author"), "Anon");
        assert_eq!(form_value(&form, "copyright"), "PD");
        assert_eq!(form_value(&form, "ccli"), "12345");
        assert_eq!(form_value(&form, "practice_yn"), "1");
    }

    #[test]
    fn test_arrangement_changes_split_duration() {
        let current = json!({"id": 5, "name": "Standard", "keyOfArrangement": "G", "duration": 245, "note": null});
        let changes = ArrangementChanges {
            key: Some("A".to_string()),
            ..Default::default()
        };
        let form = changes.merge_over(777, 5, &current);
        assert_eq!(form_value(&form, "bezeichnung"), "Standard");
        assert_eq!(form_value(&form, "tonality"), "A");
        assert_eq!(form_value(&form, "length_min"), "4");
        assert_eq!(form_value(&form, "length_sec"), "5");
        assert_eq!(form_value(&form, "note"), "");
    }

    #[test]
    fn test_name_map_and_lookup() {
        let records = vec![
            json!({"id": 1, "name": "Worship", "shortname": ""}),
            json!({"id": 2, "name": "Evangelisches Gesangbuch", "shortname": "EG"}),
        ];
        let by_short = name_map(&records, &["shortname", "name"]);
        assert_eq!(by_short.get("EG"), Some(&2));
        assert_eq!(by_short.get("Worship"), Some(&1));

        let by_name = name_map(&records, &["name"]);
        assert_eq!(lookup_ignoring_case(&by_name, "worship"), Some(1));
    }
}

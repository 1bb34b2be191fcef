//
//  churchtools-cli
//  api/ajax/songs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Song lookups and song tags over the AJAX surface.
//!
//! The REST song records do not carry tags, so tag reads go through the
//! legacy `getAllSongs` catalog. Fetching the whole catalog is expensive,
//! which is why it is kept in a per-session [`SongCache`] for
//! [`ClientOptions::song_cache_ttl`](crate::api::ClientOptions::song_cache_ttl).
//! Any tag mutation resets the cache so the next read sees it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::common::{form_fields, id_value, record_id, Result};
use crate::api::ChurchToolsClient;

/// The AJAX song catalog keyed by song id (as a string, like the server).
#[derive(Debug, Default)]
pub struct SongCache {
    last_update: Option<Instant>,
    entries: HashMap<String, Value>,
}

impl SongCache {
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.last_update
            .map(|updated| updated.elapsed() < ttl)
            .unwrap_or(false)
    }

    /// Replaces all entries with the `songs` member of a `getAllSongs` answer.
    pub fn replace(&mut self, songs: Value) {
        self.entries = match songs {
            Value::Object(map) => map.into_iter().collect(),
            Value::Array(list) => list
                .into_iter()
                .filter_map(|song| record_id(&song).map(|id| (id.to_string(), song)))
                .collect(),
            _ => HashMap::new(),
        };
        self.last_update = Some(Instant::now());
    }

    /// Forces the next read to refresh.
    pub fn invalidate(&mut self) {
        self.last_update = None;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_update = None;
    }

    pub fn get(&self, song_id: i64) -> Option<&Value> {
        self.entries.get(&song_id.to_string())
    }

    pub fn songs(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tag ids of an AJAX song record. The server sends them as strings.
pub fn song_tag_ids(song: &Value) -> Vec<i64> {
    song.get("tags")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().filter_map(id_value).collect())
        .unwrap_or_default()
}

impl ChurchToolsClient {
    /// Refreshes the catalog when it is older than the TTL. Returns `false`
    /// when a needed refresh failed.
    async fn ensure_song_cache(&self, cache: &mut SongCache) -> Result<bool> {
        if cache.is_fresh(self.options().song_cache_ttl) {
            return Ok(true);
        }

        debug!("Refreshing AJAX song catalog");
        let Some(mut data) = self.ajax("getAllSongs", Vec::new()).await? else {
            return Ok(false);
        };
        let songs = data.get_mut("songs").map(Value::take).unwrap_or(Value::Null);
        cache.replace(songs);
        debug!(songs = cache.len(), "AJAX song catalog refreshed");
        Ok(true)
    }

    /// Returns one song as recorded in the AJAX catalog.
    pub async fn get_song_ajax(&self, song_id: i64) -> Result<Option<Value>> {
        let mut cache = self.song_cache.lock().await;
        if !self.ensure_song_cache(&mut cache).await? {
            return Ok(None);
        }

        match cache.get(song_id) {
            Some(song) => Ok(Some(song.clone())),
            None => {
                info!(song_id, "Song not found in AJAX catalog");
                Ok(None)
            }
        }
    }

    /// Returns the whole AJAX song catalog.
    pub async fn get_songs_ajax(&self) -> Result<Option<Vec<Value>>> {
        let mut cache = self.song_cache.lock().await;
        if !self.ensure_song_cache(&mut cache).await? {
            return Ok(None);
        }
        Ok(Some(cache.songs().cloned().collect()))
    }

    pub async fn get_song_tags(&self, song_id: i64) -> Result<Option<Vec<i64>>> {
        Ok(self
            .get_song_ajax(song_id)
            .await?
            .map(|song| song_tag_ids(&song)))
    }

    pub async fn contains_song_tag(&self, song_id: i64, tag_id: i64) -> Result<bool> {
        Ok(self
            .get_song_tags(song_id)
            .await?
            .map(|tags| tags.contains(&tag_id))
            .unwrap_or(false))
    }

    /// Songs of the AJAX catalog carrying `tag_id`, ordered by song id.
    pub async fn get_songs_by_tag(&self, tag_id: i64) -> Result<Option<Vec<Value>>> {
        let Some(songs) = self.get_songs_ajax().await? else {
            return Ok(None);
        };

        let mut tagged: Vec<Value> = songs
            .into_iter()
            .filter(|song| song_tag_ids(song).contains(&tag_id))
            .collect();
        tagged.sort_by_key(|song| record_id(song).unwrap_or_default());
        Ok(Some(tagged))
    }

    pub async fn add_song_tag(&self, song_id: i64, tag_id: i64) -> Result<bool> {
        self.mutate_song_tag("addSongTag", song_id, tag_id).await
    }

    pub async fn remove_song_tag(&self, song_id: i64, tag_id: i64) -> Result<bool> {
        self.mutate_song_tag("delSongTag", song_id, tag_id).await
    }

    async fn mutate_song_tag(&self, func: &str, song_id: i64, tag_id: i64) -> Result<bool> {
        let result = self
            .ajax(func, form_fields([("id", song_id), ("tag_id", tag_id)]))
            .await;
        self.song_cache.lock().await.invalidate();

        let succeeded = result?.is_some();
        if !succeeded {
            warn!(song_id, tag_id, func, "Song tag was not changed");
        }
        Ok(succeeded)
    }
}

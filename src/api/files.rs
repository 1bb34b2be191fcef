//
//  churchtools-cli
//  api/files.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! File attachments of domain objects.
//!
//! Files hang off a *domain* such as `song_arrangement/417`, `avatar/12` or
//! `groupimage/3`. Uploads are multipart with a single `files[]` field;
//! downloads stream the `fileUrl` of an attachment to disk.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use serde_json::Value;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::common::{client_misuse, id_value, ApiRequest, Result, ServerResponse};
use super::ChurchToolsClient;

/// Size of the writes a download is split into.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

/// Multipart field every upload uses.
pub const UPLOAD_FIELD: &str = "files[]";

/// The object a set of files is attached to, e.g. `song_arrangement/417`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDomain {
    pub domain_type: String,
    pub domain_id: i64,
}

impl FileDomain {
    pub fn new(domain_type: impl Into<String>, domain_id: i64) -> Self {
        Self {
            domain_type: domain_type.into(),
            domain_id,
        }
    }

    pub fn path(&self) -> String {
        format!("/api/files/{}/{}", self.domain_type, self.domain_id)
    }
}

impl std::fmt::Display for FileDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.domain_type, self.domain_id)
    }
}

/// Name of an attachment record.
pub fn file_name(file: &Value) -> Option<&str> {
    file.get("name").and_then(Value::as_str)
}

impl ChurchToolsClient {
    /// Attachments of one domain object, in server order.
    pub async fn get_files(&self, domain: &FileDomain) -> Result<Option<Vec<Value>>> {
        self.get_paginated(&ApiRequest::get(domain.path()), &format!("files of {}", domain))
            .await
    }

    /// Uploads a file from disk.
    ///
    /// The stored name is `custom_name` or the file name of `path`. With
    /// `overwrite`, attachments with the same name are deleted first.
    pub async fn upload_file(
        &self,
        path: &Path,
        domain: &FileDomain,
        custom_name: Option<&str>,
        overwrite: bool,
    ) -> Result<bool> {
        let name = match custom_name {
            Some(name) => name.to_string(),
            None => match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    client_misuse("upload_file", &format!("{} has no file name", path.display()));
                    return Ok(false);
                }
            },
        };
        if name.contains('/') {
            client_misuse("upload_file", &format!("file name '{}' must not contain '/'", name));
            return Ok(false);
        }

        let bytes = tokio::fs::read(path).await?;
        self.upload_file_bytes(bytes, &name, domain, overwrite).await
    }

    /// Uploads in-memory content under `name`.
    pub async fn upload_file_bytes(
        &self,
        bytes: Vec<u8>,
        name: &str,
        domain: &FileDomain,
        overwrite: bool,
    ) -> Result<bool> {
        if name.contains('/') {
            client_misuse("upload_file", &format!("file name '{}' must not contain '/'", name));
            return Ok(false);
        }

        if overwrite {
            debug!(name, domain = %domain, "Removing existing attachment before upload");
            if !self.delete_file_by_name(domain, name).await? {
                warn!(name, domain = %domain, "Existing attachment not removed, skipping upload");
                return Ok(false);
            }
        }

        let request = ApiRequest::post(domain.path()).file(UPLOAD_FIELD, name, bytes);
        let uploaded = self
            .mutate(&request, &format!("upload of {} to {}", name, domain))
            .await?;
        if uploaded {
            info!(name, domain = %domain, "File uploaded");
        }
        Ok(uploaded)
    }

    /// Deletes every attachment of a domain object.
    pub async fn delete_files(&self, domain: &FileDomain) -> Result<bool> {
        self.mutate(&ApiRequest::delete(domain.path()), &format!("deletion of files of {}", domain))
            .await
    }

    /// Deletes the attachments named `name`. Succeeds when nothing matched.
    pub async fn delete_file_by_name(&self, domain: &FileDomain, name: &str) -> Result<bool> {
        let Some(files) = self.get_files(domain).await? else {
            return Ok(false);
        };

        let mut deleted = true;
        for file in files.iter().filter(|f| file_name(f) == Some(name)) {
            let Some(file_id) = file.get("id").and_then(id_value) else {
                warn!(name, domain = %domain, "Attachment without id, cannot delete");
                deleted = false;
                continue;
            };
            let request = ApiRequest::delete(format!("/api/files/{}", file_id));
            deleted &= self
                .mutate(&request, &format!("deletion of file {}", file_id))
                .await?;
        }
        Ok(deleted)
    }

    /// Downloads the attachment named `name` into `target_dir`.
    ///
    /// Returns the written path, or `None` when there is no such attachment.
    pub async fn download_file(
        &self,
        domain: &FileDomain,
        name: &str,
        target_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let Some(files) = self.get_files(domain).await? else {
            return Ok(None);
        };
        let Some(file) = files.iter().find(|f| file_name(f) == Some(name)) else {
            info!(name, domain = %domain, "No attachment with that name");
            return Ok(None);
        };
        let Some(url) = file.get("fileUrl").and_then(Value::as_str) else {
            warn!(name, domain = %domain, "Attachment has no fileUrl");
            return Ok(None);
        };

        let target = target_dir.join(name);
        if self.download_file_from_url(url, &target).await? {
            Ok(Some(target))
        } else {
            Ok(None)
        }
    }

    /// Streams `url` (absolute, or relative to the base URL) into
    /// `target_path`, creating missing parent directories.
    pub async fn download_file_from_url(&self, url: &str, target_path: &Path) -> Result<bool> {
        debug!(url, dest = %target_path.display(), "Downloading file");
        let response = self.execute_streaming(&ApiRequest::get(url)).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            ServerResponse::new(status, body).report(&format!("download of {}", url));
            return Ok(false);
        }

        if let Some(parent) = target_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(target_path).await?;
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for piece in chunk.chunks(DOWNLOAD_CHUNK_SIZE) {
                file.write_all(piece).await?;
            }
            written += chunk.len() as u64;
        }

        file.flush().await?;

        info!(dest = %target_path.display(), size = written, "File downloaded");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_domain_path() {
        let domain = FileDomain::new("song_arrangement", 417);
        assert_eq!(domain.path(), "/api/files/song_arrangement/417");
        assert_eq!(domain.to_string(), "song_arrangement/417");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(&json!({"name": "pinguin.png"})), Some("pinguin.png"));
        assert_eq!(file_name(&json!({"id": 1})), None);
    }
}

//
//  churchtools-cli
//  api/agenda.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Agenda export and agenda documents.
//!
//! # Export
//!
//! `POST /api/agendas/{id}/export?target=<TARGET>` prepares a presentation
//! package and answers with a download URL, which is then streamed to disk.
//! The agenda is addressed either directly or through its event.
//!
//! # Documents
//!
//! [`AgendaDocument`] turns an agenda record into headings and paragraphs,
//! one section per agenda item, and renders it as Markdown.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::common::{id_value, into_list, ApiRequest, Result};
use super::ChurchToolsClient;
use crate::output::markdown::{md_bold, md_header};

/// How an agenda is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgendaRef {
    /// The agenda of this event.
    Event(i64),
    /// The agenda with this id.
    Agenda(i64),
}

/// Presentation software an agenda can be exported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    SongBeamer,
    ProPresenter6,
    ProPresenter7,
}

impl ExportTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTarget::SongBeamer => "SONG_BEAMER",
            ExportTarget::ProPresenter6 => "PROPRESENTER6",
            ExportTarget::ProPresenter7 => "PROPRESENTER7",
        }
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExportTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "SONG_BEAMER" | "SONGBEAMER" => Ok(ExportTarget::SongBeamer),
            "PROPRESENTER6" => Ok(ExportTarget::ProPresenter6),
            "PROPRESENTER7" => Ok(ExportTarget::ProPresenter7),
            other => Err(format!(
                "unknown export target '{}' (expected SONG_BEAMER, PROPRESENTER6 or PROPRESENTER7)",
                other
            )),
        }
    }
}

/// Body options of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub append_arrangement: bool,
    pub export_songs: bool,
    pub with_category: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            append_arrangement: true,
            export_songs: true,
            with_category: true,
        }
    }
}

impl ExportOptions {
    pub fn to_json(&self) -> Value {
        json!({
            "appendArrangement": self.append_arrangement,
            "exportSongs": self.export_songs,
            "withCategory": self.with_category,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    url: String,
}

/// Where an export package is written.
///
/// A path ending in `.zip` is the file itself; anything else is a folder
/// that receives `<TARGET>_<agenda id>.zip`.
pub fn export_file_path(target_path: &Path, target: ExportTarget, agenda_id: i64) -> PathBuf {
    let is_zip = target_path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if is_zip {
        target_path.to_path_buf()
    } else {
        target_path.join(format!("{}_{}.zip", target.as_str(), agenda_id))
    }
}

impl ChurchToolsClient {
    /// Resolves an [`AgendaRef`] to an agenda id.
    pub async fn resolve_agenda_id(&self, agenda: AgendaRef) -> Result<Option<i64>> {
        match agenda {
            AgendaRef::Agenda(id) => Ok(Some(id)),
            AgendaRef::Event(event_id) => {
                let Some(agenda) = self.get_event_agenda(event_id).await? else {
                    return Ok(None);
                };
                let id = agenda.get("id").and_then(id_value);
                if id.is_none() {
                    warn!(event_id, "Agenda of event has no id");
                }
                Ok(id)
            }
        }
    }

    /// Exports an agenda for `target` and downloads the package to
    /// `target_path`. Returns the written file on success.
    pub async fn export_agenda(
        &self,
        agenda: AgendaRef,
        target: ExportTarget,
        target_path: &Path,
        options: &ExportOptions,
    ) -> Result<Option<PathBuf>> {
        let Some(agenda_id) = self.resolve_agenda_id(agenda).await? else {
            return Ok(None);
        };

        let request = ApiRequest::post(format!("/api/agendas/{}/export", agenda_id))
            .query("target", target.as_str())
            .json(options.to_json());
        let Some(data) = self
            .get_data(&request, &format!("export of agenda {}", agenda_id))
            .await?
        else {
            return Ok(None);
        };

        let export: ExportResponse = match serde_json::from_value(data) {
            Ok(export) => export,
            Err(e) => {
                warn!(agenda_id, "Export answer carries no download url ({e})");
                return Ok(None);
            }
        };

        let file = export_file_path(target_path, target, agenda_id);
        if self.download_file_from_url(&export.url, &file).await? {
            info!(agenda_id, target = %target, dest = %file.display(), "Agenda exported");
            Ok(Some(file))
        } else {
            Ok(None)
        }
    }
}

/// One block of an [`AgendaDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
}

/// What goes into an [`AgendaDocument`].
#[derive(Debug, Clone, Default)]
pub struct AgendaDocumentOptions {
    /// Skip items that take place before the event starts.
    pub exclude_before_event: bool,
    /// Service groups whose item notes are included, by id, with the label
    /// to print.
    pub service_groups: BTreeMap<i64, String>,
}

/// A structured rendering of an agenda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaDocument {
    pub title: String,
    pub blocks: Vec<DocumentBlock>,
}

fn text_of<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn song_line(song: &Value) -> Option<String> {
    let title = text_of(song, "title")?;
    let details: Vec<String> = [("arrangement", ""), ("key", "Key "), ("bpm", "BPM ")]
        .iter()
        .filter_map(|(key, label)| {
            let value = match song.get(*key)? {
                Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some(format!("{}{}", label, value))
        })
        .collect();

    if details.is_empty() {
        Some(title.to_string())
    } else {
        Some(format!("{} ({})", title, details.join(", ")))
    }
}

impl AgendaDocument {
    pub fn from_agenda(agenda: &Value, options: &AgendaDocumentOptions) -> Self {
        let title = text_of(agenda, "name")
            .or_else(|| text_of(agenda, "series"))
            .unwrap_or("Agenda")
            .to_string();

        let mut blocks = Vec::new();
        let items = into_list(agenda.get("items").cloned().unwrap_or(Value::Null));

        for item in &items {
            let before_event = item
                .get("isBeforeEvent")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if options.exclude_before_event && before_event {
                continue;
            }

            let item_title = text_of(item, "title").unwrap_or("(untitled)").to_string();
            if item.get("type").and_then(Value::as_str) == Some("header") {
                blocks.push(DocumentBlock::Heading {
                    level: 2,
                    text: item_title,
                });
                continue;
            }
            blocks.push(DocumentBlock::Heading {
                level: 3,
                text: item_title,
            });

            if let Some(responsible) = item.get("responsible").and_then(|r| text_of(r, "text")) {
                blocks.push(DocumentBlock::Paragraph(responsible.to_string()));
            }
            if let Some(song) = item.get("song").and_then(song_line) {
                blocks.push(DocumentBlock::Paragraph(song));
            }
            if let Some(note) = text_of(item, "note") {
                blocks.push(DocumentBlock::Paragraph(note.to_string()));
            }

            let group_notes = into_list(item.get("serviceGroupNotes").cloned().unwrap_or(Value::Null));
            for group_note in &group_notes {
                let Some(group_id) = group_note.get("serviceGroupId").and_then(id_value) else {
                    continue;
                };
                let (Some(label), Some(note)) =
                    (options.service_groups.get(&group_id), text_of(group_note, "note"))
                else {
                    continue;
                };
                blocks.push(DocumentBlock::Paragraph(format!("{}: {}", md_bold(label), note)));
            }
        }

        Self { title, blocks }
    }

    pub fn to_markdown(&self) -> String {
        let mut parts = vec![md_header(1, &self.title)];
        for block in &self.blocks {
            parts.push(match block {
                DocumentBlock::Heading { level, text } => md_header(*level, text),
                DocumentBlock::Paragraph(text) => text.clone(),
            });
        }
        parts.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agenda() -> Value {
        json!({
            "id": 7,
            "name": "Sunday Service",
            "items": [
                {"type": "normal", "title": "Welcome coffee", "isBeforeEvent": true},
                {"type": "header", "title": "Worship"},
                {
                    "type": "song",
                    "title": "Song",
                    "song": {"title": "Amazing Grace", "arrangement": "Standard", "key": "G"},
                    "responsible": {"text": "Band"},
                    "serviceGroupNotes": [
                        {"serviceGroupId": 1, "note": "Use piano"},
                        {"serviceGroupId": 2, "note": "Lights dim"}
                    ]
                },
                {"type": "normal", "title": "Sermon", "note": "  Romans 8  "}
            ]
        })
    }

    #[test]
    fn test_export_file_path() {
        let zip = export_file_path(Path::new("out/agenda.ZIP"), ExportTarget::SongBeamer, 7);
        assert_eq!(zip, PathBuf::from("out/agenda.ZIP"));

        let folder = export_file_path(Path::new("out"), ExportTarget::ProPresenter7, 7);
        assert_eq!(folder, PathBuf::from("out/PROPRESENTER7_7.zip"));
    }

    #[test]
    fn test_export_options_body() {
        let body = ExportOptions {
            export_songs: false,
            ..Default::default()
        }
        .to_json();
        assert_eq!(
            body,
            json!({"appendArrangement": true, "exportSongs": false, "withCategory": true})
        );
    }

    #[test]
    fn test_export_target_parse() {
        assert_eq!("song-beamer".parse::<ExportTarget>(), Ok(ExportTarget::SongBeamer));
        assert_eq!("propresenter6".parse::<ExportTarget>(), Ok(ExportTarget::ProPresenter6));
        assert!("keynote".parse::<ExportTarget>().is_err());
    }

    #[test]
    fn test_document_blocks() {
        let mut options = AgendaDocumentOptions {
            exclude_before_event: true,
            ..Default::default()
        };
        options.service_groups.insert(1, "Music".to_string());

        let document = AgendaDocument::from_agenda(&agenda(), &options);
        assert_eq!(document.title, "Sunday Service");
        assert_eq!(
            document.blocks,
            vec![
                DocumentBlock::Heading { level: 2, text: "Worship".to_string() },
                DocumentBlock::Heading { level: 3, text: "Song".to_string() },
                DocumentBlock::Paragraph("Band".to_string()),
                DocumentBlock::Paragraph("Amazing Grace (Standard, Key G)".to_string()),
                DocumentBlock::Paragraph("**Music**: Use piano".to_string()),
                DocumentBlock::Heading { level: 3, text: "Sermon".to_string() },
                DocumentBlock::Paragraph("Romans 8".to_string()),
            ]
        );
    }

    #[test]
    fn test_document_keeps_pre_event_items_by_default() {
        let document = AgendaDocument::from_agenda(&agenda(), &AgendaDocumentOptions::default());
        assert_eq!(
            document.blocks.first(),
            Some(&DocumentBlock::Heading {
                level: 3,
                text: "Welcome coffee".to_string()
            })
        );
    }

    #[test]
    fn test_markdown() {
        let document = AgendaDocument {
            title: "Service".to_string(),
            blocks: vec![
                DocumentBlock::Heading { level: 2, text: "Part".to_string() },
                DocumentBlock::Paragraph("Text".to_string()),
            ],
        };
        assert_eq!(document.to_markdown(), "# Service\n\n## Part\n\nText");
    }
}

//
//  churchtools-cli
//  cli/event.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct event`: events, agendas, agenda export and event admins.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::json;

use crate::api::agenda::{AgendaDocument, AgendaDocumentOptions, AgendaRef, ExportOptions, ExportTarget};
use crate::api::common::record_id;
use crate::api::events::{Direction, EventQuery};
use crate::output::markdown::{md_list, print_markdown};
use crate::output::{Column, OutputWriter};
use crate::util::{parse_date, parse_field};

use super::session::{connect, ensure, found};
use super::GlobalOptions;

const EVENT_COLUMNS: [Column; 4] = [
    Column::new("ID", "id"),
    Column::new("Name", "name"),
    Column::new("Start", "startDate"),
    Column::new("Calendar", "calendar.title"),
];

#[derive(Args, Debug)]
pub struct EventCommand {
    #[command(subcommand)]
    pub command: EventSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum EventSubcommand {
    /// List events
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show an event
    View(EventArgs),

    /// Print the agenda of an event
    Agenda(AgendaArgs),

    /// Export an agenda for presentation software
    Export(ExportArgs),

    /// Show or replace the admins of an event
    Admins(AdminsArgs),

    /// Show or change how many persons each service needs
    Services(ServicesArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DirectionArg {
    Forward,
    Backward,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// First day (YYYY-MM-DD, today, +N)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day; requires --from
    #[arg(long)]
    pub to: Option<String>,

    /// Count --limit events from today in this direction
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Number of events; requires --direction
    #[arg(long, short = 'L')]
    pub limit: Option<u32>,

    /// Include canceled events
    #[arg(long)]
    pub canceled: bool,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    /// Event id
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct AgendaArgs {
    /// Event id
    pub id: i64,

    /// Leave out items before the event starts
    #[arg(long)]
    pub exclude_before_event: bool,

    /// Include item notes of these service group ids
    #[arg(long, value_delimiter = ',')]
    pub notes_of: Vec<i64>,

    /// Print raw Markdown instead of rendering it
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Event id, or agenda id with --agenda
    pub id: i64,

    /// Treat the id as an agenda id
    #[arg(long)]
    pub agenda: bool,

    /// SONG_BEAMER, PROPRESENTER6 or PROPRESENTER7
    #[arg(long, short = 't', default_value = "SONG_BEAMER")]
    pub target: ExportTarget,

    /// Zip file or folder to write to
    #[arg(long, short = 'o', default_value = ".")]
    pub output: PathBuf,

    /// Do not export songs
    #[arg(long)]
    pub no_songs: bool,

    /// Do not append the arrangement name to song titles
    #[arg(long)]
    pub no_arrangement: bool,

    /// Do not prefix song titles with their category
    #[arg(long)]
    pub no_category: bool,
}

#[derive(Args, Debug)]
pub struct AdminsArgs {
    /// Event id
    pub id: i64,

    /// Replace the admins with these person ids
    #[arg(long, value_delimiter = ',')]
    pub set: Option<Vec<i64>>,
}

#[derive(Args, Debug)]
pub struct ServicesArgs {
    /// Event id
    pub id: i64,

    /// Set a count as SERVICE_ID=COUNT
    #[arg(long)]
    pub set: Option<String>,
}

impl EventCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global).await?;
        let out = OutputWriter::from_flag(global.json);

        match &self.command {
            EventSubcommand::List(args) => {
                let mut query = EventQuery::new();
                if let Some(from) = &args.from {
                    query = query.from_date(parse_date(from)?);
                }
                if let Some(to) = &args.to {
                    query = query.to_date(parse_date(to)?);
                }
                if let Some(direction) = args.direction {
                    query = query.direction(match direction {
                        DirectionArg::Forward => Direction::Forward,
                        DirectionArg::Backward => Direction::Backward,
                    });
                }
                if let Some(limit) = args.limit {
                    query = query.limit(limit);
                }
                if args.canceled {
                    query = query.canceled(true);
                }
                out.write_records(&found(client.get_events(&query).await?, "events")?, &EVENT_COLUMNS)
            }
            EventSubcommand::View(args) => {
                let events = found(client.get_event_by_id(args.id).await?, &format!("event {}", args.id))?;
                match events.first() {
                    Some(event) if !global.json => out.write_record(event, &EVENT_COLUMNS),
                    _ => out.write_records(&events, &EVENT_COLUMNS),
                }
            }
            EventSubcommand::Agenda(args) => {
                let agenda = found(
                    client.get_event_agenda(args.id).await?,
                    &format!("agenda of event {}", args.id),
                )?;
                if global.json {
                    return out.write_value(&agenda);
                }

                let mut options = AgendaDocumentOptions {
                    exclude_before_event: args.exclude_before_event,
                    service_groups: BTreeMap::new(),
                };
                if !args.notes_of.is_empty() {
                    let groups = client
                        .get_event_masterdata_of("serviceGroups")
                        .await?
                        .unwrap_or_default();
                    for group in &groups {
                        let Some(id) = record_id(group) else { continue };
                        if args.notes_of.contains(&id) {
                            let name = group.get("name").and_then(|n| n.as_str()).unwrap_or("Notes");
                            options.service_groups.insert(id, name.to_string());
                        }
                    }
                }

                let markdown = AgendaDocument::from_agenda(&agenda, &options).to_markdown();
                if args.raw {
                    println!("{}", markdown);
                } else {
                    print_markdown(&markdown);
                }
                Ok(())
            }
            EventSubcommand::Export(args) => {
                let agenda = if args.agenda {
                    AgendaRef::Agenda(args.id)
                } else {
                    AgendaRef::Event(args.id)
                };
                let options = ExportOptions {
                    append_arrangement: !args.no_arrangement,
                    export_songs: !args.no_songs,
                    with_category: !args.no_category,
                };
                let file = found(
                    client.export_agenda(agenda, args.target, &args.output, &options).await?,
                    "the agenda export",
                )?;
                if global.json {
                    out.write_value(&json!({ "file": file.display().to_string() }))
                } else {
                    out.write_success(&format!("Exported to {}", file.display()));
                    Ok(())
                }
            }
            EventSubcommand::Admins(args) => {
                if let Some(ids) = &args.set {
                    ensure(
                        client.set_event_admins(args.id, ids).await?,
                        &format!("set the admins of event {}", args.id),
                    )?;
                    out.write_success(&format!("Updated the admins of event {}", args.id));
                    return Ok(());
                }

                let admins = found(
                    client.get_event_admins(args.id).await?,
                    &format!("admins of event {}", args.id),
                )?;
                if global.json {
                    return out.write_value(&json!(admins));
                }
                let persons = client.get_persons_by_ids(&admins).await?.unwrap_or_default();
                let lines: Vec<String> = admins
                    .iter()
                    .map(|id| {
                        let person = persons.iter().find(|p| record_id(p) == Some(*id));
                        let name = person
                            .map(|p| {
                                format!(
                                    "{} {}",
                                    p.get("firstName").and_then(|v| v.as_str()).unwrap_or_default(),
                                    p.get("lastName").and_then(|v| v.as_str()).unwrap_or_default()
                                )
                            })
                            .unwrap_or_default();
                        format!("{} {}", id, name.trim())
                    })
                    .collect();
                print_markdown(&md_list(&lines));
                Ok(())
            }
            EventSubcommand::Services(args) => {
                if let Some(assignment) = &args.set {
                    let (service, count) = parse_field(assignment)?;
                    let service: i64 = service
                        .parse()
                        .with_context(|| format!("Invalid service id '{}'", service))?;
                    let count: u32 = count
                        .parse()
                        .with_context(|| format!("Invalid count '{}'", count))?;
                    ensure(
                        client.set_event_service_count(args.id, service, count).await?,
                        &format!("set service {} of event {}", service, args.id),
                    )?;
                    out.write_success(&format!("Service {} of event {} now needs {}", service, args.id, count));
                    return Ok(());
                }

                let counts = found(
                    client.get_event_service_counts(args.id).await?,
                    &format!("services of event {}", args.id),
                )?;
                let services = client.get_services_by_id().await?.unwrap_or_default();
                let rows: Vec<_> = counts
                    .iter()
                    .map(|(id, count)| {
                        let name = services.get(id).and_then(|s| s.get("name")).cloned();
                        json!({ "id": id, "name": name, "count": count })
                    })
                    .collect();
                out.write_records(
                    &rows,
                    &[Column::new("ID", "id"), Column::new("Service", "name"), Column::new("Count", "count")],
                )
            }
        }
    }
}

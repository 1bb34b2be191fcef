//
//  churchtools-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Command-Line Interface
//!
//! Clap definitions of the `ct` binary. Every top-level command is an
//! `XCommand` struct wrapping a subcommand enum and exposing
//! `async fn run(&self, global: &GlobalOptions) -> Result<()>`.
//!
//! ## Command Structure
//!
//! ```text
//! ct
//! ├── auth       login | logout | status
//! ├── person     list | masterdata
//! ├── song       list | view | create | delete | tags | tag | untag
//! ├── event      list | view | agenda | export | admins | services
//! ├── group      list | view | create | edit | delete | members | add-member
//! │              remove-member | roles | types | hierarchy | add-parent
//! │              remove-parent | stats
//! ├── calendar   list | appointments
//! ├── file       list | upload | download | delete
//! ├── tag        list | of | add | remove
//! ├── post       list | external
//! ├── resource   list | types
//! ├── api        raw request against the server
//! ├── config     get | set | list | path
//! └── version
//! ```
//!
//! ## Global Options
//!
//! - `--host`: ChurchTools site to use (env `CT_HOST`, else the default
//!   host from the config file)
//! - `--json`: print JSON instead of tables

mod api;
mod auth;
mod calendar;
mod config;
mod event;
mod file;
mod group;
mod person;
mod post;
mod resource;
mod session;
mod song;
mod tag;

pub use api::ApiCommand;
pub use auth::AuthCommand;
pub use calendar::CalendarCommand;
pub use config::ConfigCommand;
pub use event::EventCommand;
pub use file::FileCommand;
pub use group::GroupCommand;
pub use person::PersonCommand;
pub use post::PostCommand;
pub use resource::ResourceCommand;
pub use session::{connect, TOKEN_ENV};
pub use song::SongCommand;
pub use tag::TagCommand;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ct",
    version,
    about = "Work with ChurchTools from the command line",
    long_about = "ct is a CLI for ChurchTools.\n\n\
                  It brings songs, events, groups, calendars and files to your terminal.",
    propagate_version = true,
    after_help = "Use 'ct <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// ChurchTools site, e.g. church.example
    #[arg(long, global = true, env = "CT_HOST")]
    pub host: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to a ChurchTools site
    #[command(visible_alias = "login")]
    Auth(AuthCommand),

    /// Persons and person master data
    Person(PersonCommand),

    /// Songs, arrangements and song tags
    Song(SongCommand),

    /// Events, agendas and exports
    Event(EventCommand),

    /// Groups and memberships
    Group(GroupCommand),

    /// Calendars and appointments
    #[command(visible_alias = "cal")]
    Calendar(CalendarCommand),

    /// File attachments
    File(FileCommand),

    /// Tags of songs, persons and groups
    Tag(TagCommand),

    /// Group posts
    Post(PostCommand),

    /// Bookable resources
    Resource(ResourceCommand),

    /// Make an authenticated API request
    Api(ApiCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Show version information
    Version,
}

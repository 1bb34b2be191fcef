//
//  churchtools-cli
//  cli/tag.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct tag`: tags of songs, persons and groups.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::tags::TagDomain;
use crate::output::{Column, OutputWriter};

use super::session::{connect, ensure, found};
use super::GlobalOptions;

const TAG_COLUMNS: [Column; 2] = [Column::new("ID", "id"), Column::new("Name", "name")];

#[derive(Args, Debug)]
pub struct TagCommand {
    #[command(subcommand)]
    pub command: TagSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TagSubcommand {
    /// List all tags of a domain (song, person or group)
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show the tags of one object
    Of(ObjectArgs),

    /// Tag an object
    Add(AddArgs),

    /// Remove a tag from an object
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// song, person or group
    pub domain: TagDomain,
}

#[derive(Args, Debug)]
pub struct ObjectArgs {
    /// song, person or group
    pub domain: TagDomain,

    /// Object id
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// song, person or group
    pub domain: TagDomain,

    /// Object id
    pub id: i64,

    /// Tag name; unknown names create a tag
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// song, person or group
    pub domain: TagDomain,

    /// Object id
    pub id: i64,

    /// Tag id
    pub tag: i64,
}

impl TagCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global).await?;
        let out = OutputWriter::from_flag(global.json);

        match &self.command {
            TagSubcommand::List(args) => {
                let tags = client.get_tags(args.domain).await?;
                out.write_records(&found(tags, &format!("{} tags", args.domain))?, &TAG_COLUMNS)
            }
            TagSubcommand::Of(args) => {
                let tags = client.get_tags_of(args.domain, args.id).await?;
                out.write_records(
                    &found(tags, &format!("tags of {} {}", args.domain, args.id))?,
                    &TAG_COLUMNS,
                )
            }
            TagSubcommand::Add(args) => {
                ensure(
                    client.add_tag(args.domain, args.id, &args.name).await?,
                    &format!("tag {} {} with '{}'", args.domain, args.id, args.name),
                )?;
                out.write_success(&format!("Tagged {} {} with '{}'", args.domain, args.id, args.name));
                Ok(())
            }
            TagSubcommand::Remove(args) => {
                ensure(
                    client.remove_tag(args.domain, args.id, args.tag).await?,
                    &format!("remove tag {} from {} {}", args.tag, args.domain, args.id),
                )?;
                out.write_success(&format!("Removed tag {} from {} {}", args.tag, args.domain, args.id));
                Ok(())
            }
        }
    }
}

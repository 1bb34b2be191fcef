//
//  churchtools-cli
//  cli/song.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct song`: songs, arrangements and song tags.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::songs::NewSong;
use crate::api::tags::TagDomain;
use crate::interactive::prompt_confirm_with_default;
use crate::output::{print_header, Column, OutputWriter};

use super::session::{connect, ensure, found};
use super::GlobalOptions;

const SONG_COLUMNS: [Column; 4] = [
    Column::new("ID", "id"),
    Column::new("Name", "name"),
    Column::new("Category", "category.name"),
    Column::new("Author", "author"),
];

const ARRANGEMENT_COLUMNS: [Column; 5] = [
    Column::new("ID", "id"),
    Column::new("Name", "name"),
    Column::new("Key", "keyOfArrangement"),
    Column::new("BPM", "bpm"),
    Column::new("Default", "isDefault"),
];

#[derive(Args, Debug)]
pub struct SongCommand {
    #[command(subcommand)]
    pub command: SongSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SongSubcommand {
    /// List songs
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a song and its arrangements
    View(SongArgs),

    /// Create a song
    Create(CreateArgs),

    /// Delete a song
    Delete(DeleteArgs),

    /// Show the tags of a song
    Tags(SongArgs),

    /// Add a tag to a song
    Tag(TagArgs),

    /// Remove a tag from a song
    Untag(TagArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only songs carrying this tag id
    #[arg(long)]
    pub tag: Option<i64>,
}

#[derive(Args, Debug)]
pub struct SongArgs {
    /// Song id
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Song title
    pub title: String,

    /// Song category, by name or id
    #[arg(long, short = 'c')]
    pub category: String,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub copyright: Option<String>,

    #[arg(long)]
    pub ccli: Option<String>,

    /// Key of the default arrangement
    #[arg(long)]
    pub key: Option<String>,

    #[arg(long)]
    pub bpm: Option<String>,

    #[arg(long)]
    pub beat: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Song id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Song id
    pub id: i64,

    /// Tag id
    pub tag: i64,
}

impl SongCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global).await?;
        let out = OutputWriter::from_flag(global.json);

        match &self.command {
            SongSubcommand::List(args) => {
                let songs = match args.tag {
                    Some(tag) => client.get_songs_by_tag(tag).await?,
                    None => client.get_songs().await?,
                };
                out.write_records(&found(songs, "songs")?, &SONG_COLUMNS)
            }
            SongSubcommand::View(args) => {
                let song = found(client.get_song(args.id).await?, &format!("song {}", args.id))?;
                if global.json {
                    return out.write_value(&song);
                }
                out.write_record(&song, &SONG_COLUMNS)?;
                println!();
                print_header("Arrangements");
                let arrangements = client.get_song_arrangements(args.id).await?.unwrap_or_default();
                out.write_records(&arrangements, &ARRANGEMENT_COLUMNS)
            }
            SongSubcommand::Create(args) => {
                let category_id = match args.category.parse::<i64>() {
                    Ok(id) => id,
                    Err(_) => match client.lookup_song_category_id(&args.category).await? {
                        Some(id) => id,
                        None => bail!("Unknown song category '{}'", args.category),
                    },
                };

                let mut song = NewSong::new(&args.title, category_id);
                if let Some(author) = &args.author {
                    song = song.author(author);
                }
                if let Some(copyright) = &args.copyright {
                    song = song.copyright(copyright);
                }
                if let Some(ccli) = &args.ccli {
                    song = song.ccli(ccli);
                }
                if let Some(key) = &args.key {
                    song = song.tonality(key);
                }
                if let Some(bpm) = &args.bpm {
                    song = song.bpm(bpm);
                }
                if let Some(beat) = &args.beat {
                    song = song.beat(beat);
                }

                let id = found(client.create_song(&song).await?, "the id of the new song")?;
                if global.json {
                    out.write_value(&json!({ "id": id }))
                } else {
                    out.write_success(&format!("Created song {} ({})", id, args.title));
                    Ok(())
                }
            }
            SongSubcommand::Delete(args) => {
                if !args.yes
                    && !prompt_confirm_with_default(&format!("Delete song {}?", args.id), false)?
                {
                    return Ok(());
                }
                ensure(client.delete_song(args.id).await?, &format!("delete song {}", args.id))?;
                out.write_success(&format!("Deleted song {}", args.id));
                Ok(())
            }
            SongSubcommand::Tags(args) => {
                let tag_ids = found(client.get_song_tags(args.id).await?, &format!("tags of song {}", args.id))?;
                let names = client.get_tag_names_by_id(TagDomain::Song).await?.unwrap_or_default();
                let tags: Vec<_> = tag_ids
                    .iter()
                    .map(|id| json!({ "id": id, "name": names.get(id) }))
                    .collect();
                out.write_records(&tags, &[Column::new("ID", "id"), Column::new("Name", "name")])
            }
            SongSubcommand::Tag(args) => {
                ensure(
                    client.add_song_tag(args.id, args.tag).await?,
                    &format!("tag song {} with {}", args.id, args.tag),
                )?;
                out.write_success(&format!("Tagged song {} with tag {}", args.id, args.tag));
                Ok(())
            }
            SongSubcommand::Untag(args) => {
                ensure(
                    client.remove_song_tag(args.id, args.tag).await?,
                    &format!("remove tag {} from song {}", args.tag, args.id),
                )?;
                out.write_success(&format!("Removed tag {} from song {}", args.tag, args.id));
                Ok(())
            }
        }
    }
}

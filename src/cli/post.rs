//
//  churchtools-cli
//  cli/post.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct post`: group posts.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::posts::PostQuery;
use crate::output::{Column, OutputWriter};
use crate::util::parse_timestamp;

use super::session::{connect, found};
use super::GlobalOptions;

const POST_COLUMNS: [Column; 5] = [
    Column::new("ID", "id"),
    Column::new("Title", "title"),
    Column::new("Group", "group.title"),
    Column::new("Author", "actor.title"),
    Column::new("Published", "publicationDate"),
];

#[derive(Args, Debug)]
pub struct PostCommand {
    #[command(subcommand)]
    pub command: PostSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PostSubcommand {
    /// List posts
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// List posts from external sources
    External,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Posts published before this time (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub before: Option<String>,

    /// Posts published after this time
    #[arg(long)]
    pub after: Option<String>,

    /// Continue after this post identifier; requires --before
    #[arg(long)]
    pub last_post: Option<String>,

    /// Only posts of these group ids
    #[arg(long, value_delimiter = ',')]
    pub group: Vec<i64>,

    /// Only posts by these person ids
    #[arg(long, value_delimiter = ',')]
    pub actor: Vec<i64>,

    /// Only posts of these campus ids
    #[arg(long, value_delimiter = ',')]
    pub campus: Vec<i64>,

    /// Group visibility, e.g. hidden, intern, restricted, public
    #[arg(long)]
    pub group_visibility: Option<String>,

    /// Post visibility, e.g. group_intern, group_visible
    #[arg(long, value_delimiter = ',')]
    pub post_visibility: Vec<String>,

    /// Related data to include, e.g. comments, reactions
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Only posts of my groups
    #[arg(long)]
    pub mine: bool,

    /// Maximum number of posts
    #[arg(long, short = 'L')]
    pub limit: Option<u32>,
}

impl ListArgs {
    fn query(&self) -> Result<PostQuery> {
        let mut query = PostQuery {
            last_post_identifier: self.last_post.clone(),
            campus_ids: self.campus.clone(),
            actor_ids: self.actor.clone(),
            group_ids: self.group.clone(),
            group_visibility: self.group_visibility.clone(),
            post_visibility: self.post_visibility.clone(),
            include: self.include.clone(),
            limit: self.limit,
            ..PostQuery::new()
        };
        if let Some(before) = &self.before {
            query = query.before(parse_timestamp(before)?);
        }
        if let Some(after) = &self.after {
            query = query.after(parse_timestamp(after)?);
        }
        if self.mine {
            query = query.only_my_groups(true);
        }
        Ok(query)
    }
}

impl PostCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global).await?;
        let out = OutputWriter::from_flag(global.json);

        match &self.command {
            PostSubcommand::List(args) => {
                let posts = client.get_posts(&args.query()?).await?;
                out.write_records(&found(posts, "posts")?, &POST_COLUMNS)
            }
            PostSubcommand::External => {
                let posts = client.get_external_posts().await?;
                out.write_records(&found(posts, "external posts")?, &POST_COLUMNS)
            }
        }
    }
}

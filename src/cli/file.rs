//
//  churchtools-cli
//  cli/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct file`: attachments of songs, persons, groups and other domains.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::files::FileDomain;
use crate::interactive::prompt_confirm_with_default;
use crate::output::{Column, OutputWriter};

use super::session::{connect, ensure, found};
use super::GlobalOptions;

const FILE_COLUMNS: [Column; 4] = [
    Column::new("ID", "id"),
    Column::new("Name", "name"),
    Column::new("Size", "size"),
    Column::new("URL", "fileUrl"),
];

#[derive(Args, Debug)]
pub struct FileCommand {
    #[command(subcommand)]
    pub command: FileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FileSubcommand {
    /// List the files of a domain object
    #[command(visible_alias = "ls")]
    List(DomainArgs),

    /// Upload a file
    Upload(UploadArgs),

    /// Download a file by name
    Download(DownloadArgs),

    /// Delete one file by name, or all files of a domain object
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct DomainArgs {
    /// Domain type, e.g. song_arrangement, avatar, groupimage
    pub domain_type: String,

    /// Domain object id
    pub domain_id: i64,
}

impl DomainArgs {
    fn domain(&self) -> FileDomain {
        FileDomain::new(&self.domain_type, self.domain_id)
    }
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    #[command(flatten)]
    pub domain: DomainArgs,

    /// File to upload
    pub path: PathBuf,

    /// Store under this name instead of the file name
    #[arg(long)]
    pub name: Option<String>,

    /// Replace files with the same name
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub domain: DomainArgs,

    /// File name
    pub name: String,

    /// Folder to write to
    #[arg(long, short = 'd', default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub domain: DomainArgs,

    /// Only the files with this name
    #[arg(long)]
    pub name: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl FileCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global).await?;
        let out = OutputWriter::from_flag(global.json);

        match &self.command {
            FileSubcommand::List(args) => {
                let domain = args.domain();
                let files = client.get_files(&domain).await?;
                out.write_records(&found(files, &format!("files of {}", domain))?, &FILE_COLUMNS)
            }
            FileSubcommand::Upload(args) => {
                let domain = args.domain.domain();
                ensure(
                    client
                        .upload_file(&args.path, &domain, args.name.as_deref(), args.overwrite)
                        .await?,
                    &format!("upload {} to {}", args.path.display(), domain),
                )?;
                out.write_success(&format!("Uploaded {} to {}", args.path.display(), domain));
                Ok(())
            }
            FileSubcommand::Download(args) => {
                let domain = args.domain.domain();
                let path = found(
                    client.download_file(&domain, &args.name, &args.dir).await?,
                    &format!("file '{}' of {}", args.name, domain),
                )?;
                if global.json {
                    out.write_value(&json!({ "file": path.display().to_string() }))
                } else {
                    out.write_success(&format!("Downloaded {}", path.display()));
                    Ok(())
                }
            }
            FileSubcommand::Delete(args) => {
                let domain = args.domain.domain();
                let what = match &args.name {
                    Some(name) => format!("file '{}' of {}", name, domain),
                    None => format!("all files of {}", domain),
                };
                if !args.yes && !prompt_confirm_with_default(&format!("Delete {}?", what), false)? {
                    return Ok(());
                }
                let deleted = match &args.name {
                    Some(name) => client.delete_file_by_name(&domain, name).await?,
                    None => client.delete_files(&domain).await?,
                };
                ensure(deleted, &format!("delete {}", what))?;
                out.write_success(&format!("Deleted {}", what));
                Ok(())
            }
        }
    }
}

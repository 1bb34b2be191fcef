//
//  churchtools-cli
//  cli/person.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct person`: persons and person master data.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::output::{Column, OutputWriter};

use super::session::{connect, found};
use super::GlobalOptions;

const PERSON_COLUMNS: [Column; 4] = [
    Column::new("ID", "id"),
    Column::new("First name", "firstName"),
    Column::new("Last name", "lastName"),
    Column::new("Email", "email"),
];

#[derive(Args, Debug)]
pub struct PersonCommand {
    #[command(subcommand)]
    pub command: PersonSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PersonSubcommand {
    /// List persons
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show person master data (sexes, statuses, campuses, roles, ...)
    Masterdata(MasterdataArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only these person ids
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<i64>,
}

#[derive(Args, Debug)]
pub struct MasterdataArgs {
    /// One catalog, e.g. campuses
    pub catalog: Option<String>,
}

impl PersonCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global).await?;
        let out = OutputWriter::from_flag(global.json);

        match &self.command {
            PersonSubcommand::List(args) => {
                let persons = if args.ids.is_empty() {
                    client.get_persons().await?
                } else {
                    client.get_persons_by_ids(&args.ids).await?
                };
                out.write_records(&found(persons, "persons")?, &PERSON_COLUMNS)
            }
            PersonSubcommand::Masterdata(args) => match &args.catalog {
                Some(catalog) => {
                    let entries = client.get_person_masterdata(catalog).await?;
                    out.write_records(
                        &found(entries, &format!("person masterdata '{}'", catalog))?,
                        &[Column::new("ID", "id"), Column::new("Name", "name")],
                    )
                }
                None => {
                    let masterdata = client.get_persons_masterdata().await?;
                    out.write_value(&found(masterdata, "person masterdata")?)
                }
            },
        }
    }
}

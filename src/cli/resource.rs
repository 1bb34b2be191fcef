//
//  churchtools-cli
//  cli/resource.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct resource`: bookable resources.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::resources::ResourceMasterdata;
use crate::output::{Column, OutputWriter};

use super::session::{connect, found};
use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct ResourceCommand {
    #[command(subcommand)]
    pub command: ResourceSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ResourceSubcommand {
    /// List resources
    #[command(visible_alias = "ls")]
    List,

    /// List resource types
    Types,
}

impl ResourceCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global).await?;
        let out = OutputWriter::from_flag(global.json);

        let (kind, columns) = match &self.command {
            ResourceSubcommand::List => (
                ResourceMasterdata::Resources,
                vec![
                    Column::new("ID", "id"),
                    Column::new("Name", "name"),
                    Column::new("Type", "resourceTypeId"),
                    Column::new("Location", "location"),
                ],
            ),
            ResourceSubcommand::Types => (
                ResourceMasterdata::ResourceTypes,
                vec![Column::new("ID", "id"), Column::new("Name", "name")],
            ),
        };

        let entries = client.get_resource_masterdata(kind).await?;
        out.write_records(&found(entries, &format!("resource masterdata '{}'", kind))?, &columns)
    }
}

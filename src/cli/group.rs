//
//  churchtools-cli
//  cli/group.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct group`: groups, group types, memberships and hierarchies.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};

use crate::api::groups::{Membership, NewGroup};
use crate::interactive::prompt_confirm_with_default;
use crate::output::{print_header, Column, OutputWriter};
use crate::util::parse_field;

use super::session::{connect, ensure, found};
use super::GlobalOptions;

const GROUP_COLUMNS: [Column; 4] = [
    Column::new("ID", "id"),
    Column::new("Name", "name"),
    Column::new("Type", "information.groupTypeId"),
    Column::new("Status", "information.groupStatusId"),
];

const MEMBER_COLUMNS: [Column; 5] = [
    Column::new("Person", "personId"),
    Column::new("First name", "person.domainAttributes.firstName"),
    Column::new("Last name", "person.domainAttributes.lastName"),
    Column::new("Role", "groupTypeRoleId"),
    Column::new("Status", "groupMemberStatus"),
];

#[derive(Args, Debug)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub command: GroupSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum GroupSubcommand {
    /// List groups
    #[command(visible_alias = "ls")]
    List,

    /// Show a group
    View(GroupArgs),

    /// Create a group
    Create(CreateArgs),

    /// Change fields of a group
    Edit(EditArgs),

    /// Delete a group
    Delete(DeleteArgs),

    /// List the members of a group
    Members(MembersArgs),

    /// Add a person to a group or change the membership
    AddMember(AddMemberArgs),

    /// Remove a person from a group
    RemoveMember(MemberArgs),

    /// List the roles of a group
    Roles(GroupArgs),

    /// List group types
    Types,

    /// Show parents and children of a group
    Hierarchy(GroupArgs),

    /// Attach a group below a parent group
    AddParent(ParentArgs),

    /// Detach a group from a parent group
    RemoveParent(ParentArgs),

    /// Show member statistics of a group
    Stats(GroupArgs),
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Group id
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Group name
    pub name: String,

    /// Group status id
    #[arg(long)]
    pub status: i64,

    /// Group type id
    #[arg(long = "type")]
    pub group_type: i64,

    /// Campus id
    #[arg(long)]
    pub campus: Option<i64>,

    /// Superior group id
    #[arg(long)]
    pub parent: Option<i64>,

    /// Create even if a group with this name exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Group id
    pub id: i64,

    /// Field to change as key=value (repeatable)
    #[arg(long = "field", short = 'f', required = true)]
    pub fields: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Group id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct MembersArgs {
    /// Group id
    pub id: i64,

    /// Only members with these role ids
    #[arg(long, value_delimiter = ',')]
    pub role: Vec<i64>,
}

#[derive(Args, Debug)]
pub struct MemberArgs {
    /// Group id
    pub id: i64,

    /// Person id
    pub person: i64,
}

#[derive(Args, Debug)]
pub struct AddMemberArgs {
    /// Group id
    pub id: i64,

    /// Person id
    pub person: i64,

    /// Group type role id
    #[arg(long)]
    pub role: Option<i64>,

    /// active, requested, waiting or to_delete
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args, Debug)]
pub struct ParentArgs {
    /// Group id
    pub id: i64,

    /// Parent group id
    pub parent: i64,
}

/// Builds a PATCH body from `key=value` arguments; numbers and booleans keep
/// their JSON type.
fn field_changes(fields: &[String]) -> Result<Value> {
    let mut changes = Map::new();
    for field in fields {
        let (key, raw) = parse_field(field)?;
        let value = serde_json::from_str::<Value>(&raw)
            .ok()
            .filter(|v| v.is_number() || v.is_boolean() || v.is_null())
            .unwrap_or(Value::String(raw));
        changes.insert(key, value);
    }
    Ok(Value::Object(changes))
}

impl GroupCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global).await?;
        let out = OutputWriter::from_flag(global.json);

        match &self.command {
            GroupSubcommand::List => {
                out.write_records(&found(client.get_groups().await?, "groups")?, &GROUP_COLUMNS)
            }
            GroupSubcommand::View(args) => {
                let group = found(client.get_group(args.id).await?, &format!("group {}", args.id))?;
                if global.json {
                    out.write_value(&group)
                } else {
                    out.write_record(&group, &GROUP_COLUMNS)
                }
            }
            GroupSubcommand::Create(args) => {
                let mut group = NewGroup::new(&args.name, args.status, args.group_type).force(args.force);
                if let Some(campus) = args.campus {
                    group = group.campus(campus);
                }
                if let Some(parent) = args.parent {
                    group = group.superior_group(parent);
                }
                let created = found(client.create_group(&group).await?, &format!("group '{}'", args.name))?;
                if global.json {
                    out.write_value(&created)
                } else {
                    out.write_success(&format!(
                        "Created group {} ({})",
                        created.get("id").cloned().unwrap_or(Value::Null),
                        args.name
                    ));
                    Ok(())
                }
            }
            GroupSubcommand::Edit(args) => {
                let changes = field_changes(&args.fields)?;
                let updated = found(
                    client.update_group(args.id, &changes).await?,
                    &format!("updated group {}", args.id),
                )?;
                if global.json {
                    out.write_value(&updated)
                } else {
                    out.write_success(&format!("Updated group {}", args.id));
                    Ok(())
                }
            }
            GroupSubcommand::Delete(args) => {
                if !args.yes
                    && !prompt_confirm_with_default(&format!("Delete group {}?", args.id), false)?
                {
                    return Ok(());
                }
                ensure(client.delete_group(args.id).await?, &format!("delete group {}", args.id))?;
                out.write_success(&format!("Deleted group {}", args.id));
                Ok(())
            }
            GroupSubcommand::Members(args) => {
                let members = client.get_group_members(args.id, &args.role).await?;
                out.write_records(
                    &found(members, &format!("members of group {}", args.id))?,
                    &MEMBER_COLUMNS,
                )
            }
            GroupSubcommand::AddMember(args) => {
                let membership = Membership {
                    role_id: args.role,
                    status: args.status.clone(),
                };
                let member = found(
                    client.add_group_member(args.id, args.person, &membership).await?,
                    &format!("membership of person {} in group {}", args.person, args.id),
                )?;
                if global.json {
                    out.write_value(&member)
                } else {
                    out.write_success(&format!("Person {} is a member of group {}", args.person, args.id));
                    Ok(())
                }
            }
            GroupSubcommand::RemoveMember(args) => {
                ensure(
                    client.remove_group_member(args.id, args.person).await?,
                    &format!("remove person {} from group {}", args.person, args.id),
                )?;
                out.write_success(&format!("Removed person {} from group {}", args.person, args.id));
                Ok(())
            }
            GroupSubcommand::Roles(args) => {
                let roles = client.get_group_roles(args.id).await?;
                out.write_records(
                    &found(roles, &format!("roles of group {}", args.id))?,
                    &[
                        Column::new("ID", "id"),
                        Column::new("Role", "groupTypeRoleId"),
                        Column::new("Name", "name"),
                        Column::new("Active", "isActive"),
                    ],
                )
            }
            GroupSubcommand::Types => {
                let types = client.get_grouptypes().await?;
                out.write_records(
                    &found(types, "group types")?,
                    &[Column::new("ID", "id"), Column::new("Name", "name"), Column::new("Plural", "namePlural")],
                )
            }
            GroupSubcommand::Hierarchy(args) => {
                let hierarchies = found(client.get_group_hierarchies().await?, "group hierarchies")?;
                let entry = hierarchies
                    .get(&args.id)
                    .cloned()
                    .unwrap_or_else(|| json!({ "groupId": args.id, "parents": [], "children": [] }));
                if global.json {
                    return out.write_value(&entry);
                }
                for key in ["parents", "children"] {
                    print_header(key);
                    let ids: Vec<String> = entry
                        .get(key)
                        .and_then(Value::as_array)
                        .map(|ids| ids.iter().map(|id| id.to_string()).collect())
                        .unwrap_or_default();
                    if ids.is_empty() {
                        println!("  -");
                    } else {
                        println!("  {}", ids.join(", "));
                    }
                }
                Ok(())
            }
            GroupSubcommand::AddParent(args) => {
                ensure(
                    client.add_parent_group(args.id, args.parent).await?,
                    &format!("attach group {} below {}", args.id, args.parent),
                )?;
                out.write_success(&format!("Group {} is now below group {}", args.id, args.parent));
                Ok(())
            }
            GroupSubcommand::RemoveParent(args) => {
                ensure(
                    client.remove_parent_group(args.id, args.parent).await?,
                    &format!("detach group {} from {}", args.id, args.parent),
                )?;
                out.write_success(&format!("Group {} is no longer below group {}", args.id, args.parent));
                Ok(())
            }
            GroupSubcommand::Stats(args) => {
                let stats = found(
                    client.get_group_statistics(args.id).await?,
                    &format!("statistics of group {}", args.id),
                )?;
                out.write_value(&stats)
            }
        }
    }
}

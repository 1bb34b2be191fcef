//
//  churchtools-cli
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct config`: read and change the `[core]` settings.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;
use serde_json::json;

use crate::config::Config;
use crate::output::{print_field, write_json};

use super::GlobalOptions;

/// Keys of the `[core]` table
const VALID_CORE_KEYS: &[&str] = &["default_host", "song_cache_ttl_secs", "rate_limit_backoff_secs"];

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List all configuration values and known hosts
    #[command(visible_alias = "ls")]
    List,

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => {
                let config = Config::load()?;
                let value = config.get(&args.key);
                if global.json {
                    write_json(&json!({ "key": args.key, "value": value }))
                } else {
                    if let Some(v) = value {
                        println!("{}", v);
                    }
                    Ok(())
                }
            }
            ConfigSubcommand::Set(args) => {
                if !VALID_CORE_KEYS.contains(&args.key.as_str()) {
                    bail!(
                        "Unknown configuration key '{}'. Valid keys: {}",
                        args.key,
                        VALID_CORE_KEYS.join(", ")
                    );
                }
                let mut config = Config::load()?;
                if !config.set(&args.key, &args.value) {
                    bail!("Invalid value '{}' for {}", args.value, args.key);
                }
                config.save()?;

                if global.json {
                    write_json(&json!({ "success": true, "key": args.key, "value": args.value }))
                } else {
                    println!("{} Set {} to {}", style("✓").green(), args.key, args.value);
                    Ok(())
                }
            }
            ConfigSubcommand::List => {
                let config = Config::load()?;
                if global.json {
                    return write_json(&config);
                }
                for key in VALID_CORE_KEYS {
                    print_field(key, &config.get(key).unwrap_or_default(), true);
                }
                let mut hosts: Vec<_> = config.hosts.iter().collect();
                hosts.sort_by(|a, b| a.0.cmp(b.0));
                for (host, entry) in hosts {
                    println!();
                    println!("{}", style(format!("[hosts.\"{}\"]", host)).bold());
                    print_field("url", &entry.url, true);
                    if let Some(user) = &entry.user {
                        print_field("user", user, true);
                    }
                    if let Some(id) = entry.identity_id {
                        print_field("identity_id", &id.to_string(), true);
                    }
                }
                Ok(())
            }
            ConfigSubcommand::Path => {
                let path = Config::config_path()?;
                if global.json {
                    write_json(&json!({ "path": path.display().to_string() }))
                } else {
                    println!("{}", path.display());
                    Ok(())
                }
            }
        }
    }
}

//
//  churchtools-cli
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Formatting
//!
//! Server records are untyped JSON, so commands describe what to show as a
//! list of [`Column`]s (header plus dotted path into the record) and hand
//! the records to an [`OutputWriter`], which prints either a table or the
//! raw JSON.
//!
//! ## Formats
//!
//! | Format | Flag | Use |
//! |--------|------|-----|
//! | Table | (default) | Human reading in a terminal |
//! | JSON | `--json` | Scripting, piping into `jq` |
//!
//! Agenda documents are printed as Markdown through [`markdown`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use churchtools_cli::output::{Column, OutputWriter};
//!
//! let columns = [Column::new("ID", "id"), Column::new("Name", "name")];
//! OutputWriter::table().write_records(&groups, &columns)?;
//! ```

mod json;
pub mod markdown;
mod table;

pub use json::*;
pub use table::*;

use console::style;
use serde_json::Value;

/// Output format of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One table column: a header and the dotted path of the value to show,
/// e.g. `"calculated.startDate"` or `"tags.0.name"`.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub path: &'static str,
}

impl Column {
    pub const fn new(header: &'static str, path: &'static str) -> Self {
        Self { header, path }
    }
}

/// Prints records, key/value details and status messages.
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    pub fn table() -> Self {
        Self::new(OutputFormat::Table)
    }

    /// `--json` picks JSON, anything else a table.
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::json()
        } else {
            Self::table()
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Prints a list of records as a table of `columns`, or as a JSON array.
    pub fn write_records(&self, records: &[Value], columns: &[Column]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(records),
            OutputFormat::Table => {
                if records.is_empty() {
                    self.write_info("No results");
                    return Ok(());
                }
                TableBuilder::new()
                    .color(self.color)
                    .headers(columns.iter().map(|c| c.header))
                    .rows(records.iter().map(|record| {
                        columns
                            .iter()
                            .map(|c| truncate(&field_text(record, c.path), 60))
                            .collect::<Vec<_>>()
                    }))
                    .print();
                Ok(())
            }
        }
    }

    /// Prints one record: selected fields as `key: value` lines, or the
    /// whole record as JSON.
    pub fn write_record(&self, record: &Value, columns: &[Column]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(record),
            OutputFormat::Table => {
                for column in columns {
                    print_field(column.header, &field_text(record, column.path), self.color);
                }
                Ok(())
            }
        }
    }

    /// Prints any JSON value; tables fall back to pretty JSON.
    pub fn write_value(&self, value: &Value) -> anyhow::Result<()> {
        write_json(value)
    }

    pub fn write_error(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    pub fn write_warning(&self, msg: &str) {
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    pub fn write_info(&self, msg: &str) {
        println!("{}", msg);
    }

    pub fn write_success(&self, msg: &str) {
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// Looks up a dotted path; numeric segments index into arrays.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(record, |current, segment| match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => current.get(segment),
        })
}

/// Text of the value at `path`: strings unquoted, `null`/missing empty,
/// arrays of scalars comma-joined, other values as compact JSON.
pub fn field_text(record: &Value, path: &str) -> String {
    match lookup(record, path) {
        None | Some(Value::Null) => String::new(),
        Some(value) => value_text(value),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => format_bool(*b, false),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

pub fn print_header(text: &str) {
    println!("{}", style(text).bold());
    println!("{}", "-".repeat(text.chars().count()));
}

pub fn print_field(key: &str, value: &str, color: bool) {
    if color {
        println!("{}: {}", style(key).dim(), value);
    } else {
        println!("{}: {}", key, value);
    }
}

//
//  churchtools-cli
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! Sends an authenticated request to any endpoint of the site, reusing the
//! session of the other commands (login token, CSRF header, rate-limit
//! retries). Useful for endpoints without a dedicated command.
//!
//! ## Examples
//!
//! ```bash
//! # Fetch one person
//! ct api /api/persons/12
//!
//! # Change a group
//! ct api -X PATCH /api/groups/7 -F name="Youth Band" -F information.meetingTime=19:00
//!
//! # Follow meta.pagination through every page
//! ct api /api/songs --paginate
//!
//! # Legacy AJAX function
//! ct api --ajax getAllSongs
//! ```

use std::fs;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::api::common::{format_api_error, ApiRequest};
use crate::output::write_json;
use crate::util::parse_field;

use super::session::{connect, found};
use super::GlobalOptions;

/// Make direct API requests
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// Endpoint (e.g. /api/songs/5), or function name with --ajax
    pub endpoint: String,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Request headers as 'Name: Value' (repeatable)
    #[arg(long, short = 'H', action = clap::ArgAction::Append)]
    pub header: Vec<String>,

    /// Body fields as key=value; values are JSON-typed, dots nest (repeatable)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Body fields kept as strings (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,

    /// Query parameters as key=value (repeatable)
    #[arg(long, short = 'q', action = clap::ArgAction::Append)]
    pub query: Vec<String>,

    /// Read the JSON body from a file (- for stdin)
    #[arg(long, short = 'f')]
    pub input: Option<String>,

    /// Follow meta.pagination and print all items
    #[arg(long)]
    pub paginate: bool,

    /// Call a legacy AJAX function; fields are sent as form values
    #[arg(long)]
    pub ajax: bool,

    /// Print only the status
    #[arg(long)]
    pub silent: bool,
}

impl ApiCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let request = self.build_request()?;
        let client = connect(global).await?;

        if self.paginate {
            if *request.method() != Method::GET {
                bail!("--paginate only works with GET requests");
            }
            let items = found(client.get_paginated(&request, &self.endpoint).await?, &self.endpoint)?;
            if !self.silent {
                write_json(&items)?;
            }
            return Ok(());
        }

        let response = client.execute(&request).await?;
        if self.silent {
            println!("{} {}", style("HTTP").dim(), response.status);
        } else if let Ok(json) = serde_json::from_str::<Value>(&response.body) {
            write_json(&json)?;
        } else if !response.body.is_empty() {
            println!("{}", response.body);
        }

        if !response.is_success() {
            bail!(
                "Request failed with status {}: {}",
                response.status,
                format_api_error(response.status, &response.body)
            );
        }
        Ok(())
    }

    fn build_request(&self) -> Result<ApiRequest> {
        if self.ajax {
            let mut fields = Vec::new();
            for field in self.field.iter().chain(&self.raw_field) {
                fields.push(parse_field(field)?);
            }
            return Ok(ApiRequest::ajax(&self.endpoint, fields));
        }

        let mut request = ApiRequest::new(self.parse_method()?, &self.endpoint);

        for param in &self.query {
            let (key, value) = parse_field(param)?;
            request = request.query(key, value);
        }

        for header in &self.header {
            let Some((name, value)) = header.split_once(':') else {
                bail!("Invalid header format: {}. Expected 'Name: Value'", header);
            };
            request = request.header(name.trim(), value.trim());
        }

        if let Some(body) = self.build_body()? {
            request = request.json(body);
        }
        Ok(request)
    }

    fn parse_method(&self) -> Result<Method> {
        match self.method.to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            _ => bail!("Unsupported HTTP method: {}", self.method),
        }
    }

    fn build_body(&self) -> Result<Option<Value>> {
        if let Some(input) = &self.input {
            let content = if input == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
            };
            let value: Value = serde_json::from_str(&content).context("Request body is not valid JSON")?;
            return Ok(Some(value));
        }

        if self.field.is_empty() && self.raw_field.is_empty() {
            return Ok(None);
        }

        let mut body = Map::new();
        for field in &self.field {
            let (key, raw) = parse_field(field)?;
            set_nested_value(&mut body, &key, typed_value(&raw));
        }
        for field in &self.raw_field {
            let (key, raw) = parse_field(field)?;
            set_nested_value(&mut body, &key, Value::String(raw));
        }
        Ok(Some(Value::Object(body)))
    }
}

/// Interprets a field value: booleans, null, numbers, arrays and objects
/// keep their JSON type, anything else is a string.
fn typed_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Value::Number(n)
            } else if raw.starts_with('[') || raw.starts_with('{') {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let nested = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !nested.is_object() {
                *nested = Value::Object(Map::new());
            }
            if let Value::Object(nested) = nested {
                set_nested_value(nested, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        api: ApiCommand,
    }

    fn command(args: &[&str]) -> ApiCommand {
        let mut argv = vec!["api"];
        argv.extend_from_slice(args);
        Harness::parse_from(argv).api
    }

    #[test]
    fn test_typed_value() {
        assert_eq!(typed_value("true"), json!(true));
        assert_eq!(typed_value("42"), json!(42));
        assert_eq!(typed_value("1.5"), json!(1.5));
        assert_eq!(typed_value("[1,2]"), json!([1, 2]));
        assert_eq!(typed_value("[oops"), json!("[oops"));
        assert_eq!(typed_value("Youth Band"), json!("Youth Band"));
    }

    #[test]
    fn test_nested_fields() {
        let cmd = command(&[
            "/api/groups/7",
            "-X",
            "patch",
            "-F",
            "name=Youth",
            "-F",
            "information.meetingTime=19:00",
            "--raw-field",
            "information.note=42",
        ]);
        let request = cmd.build_request().unwrap();
        assert_eq!(request.method(), &Method::PATCH);
        assert_eq!(
            cmd.build_body().unwrap().unwrap(),
            json!({ "name": "Youth", "information": { "meetingTime": "19:00", "note": "42" } })
        );
    }

    #[test]
    fn test_query_and_headers() {
        let cmd = command(&["/api/songs", "-q", "limit=10", "-H", "Accept-Language: de"]);
        let request = cmd.build_request().unwrap();
        assert_eq!(request.query_pairs(), &[("limit".to_string(), "10".to_string())]);
        assert!(request.has_header("accept-language"));
        assert!(cmd.build_body().unwrap().is_none());
    }

    #[test]
    fn test_ajax_request() {
        let cmd = command(&["getAllSongs", "--ajax", "-F", "id=5"]);
        let request = cmd.build_request().unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert!(request
            .query_pairs()
            .iter()
            .any(|(k, v)| k == "func" && v == "getAllSongs"));
    }

    #[test]
    fn test_rejects_unknown_method() {
        assert!(command(&["/api/songs", "-X", "TRACE"]).build_request().is_err());
    }
}

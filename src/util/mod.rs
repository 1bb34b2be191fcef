//
//  churchtools-cli
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Argument parsing helpers shared by the commands.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// Parses a date argument: `today`, `yesterday`, `tomorrow`, `+N`/`-N`
/// days from today, or `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    parse_date_from(input, Local::now().date_naive())
}

fn parse_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    match input.to_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        "tomorrow" => return Ok(today + Duration::days(1)),
        _ => {}
    }

    if let Some(offset) = input.strip_prefix('+').or_else(|| input.strip_prefix('-').map(|_| input)) {
        if let Ok(days) = offset.parse::<i64>() {
            return Ok(today + Duration::days(days));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD, today or +N)", input))
}

/// Parses a timestamp argument: RFC 3339, or a date meaning midnight UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = parse_date(input)?;
    match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => Ok(midnight.and_utc()),
        None => bail!("Invalid timestamp '{}'", input),
    }
}

/// Splits a `key=value` argument.
pub fn parse_field(input: &str) -> Result<(String, String)> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => bail!("Invalid field '{}' (expected key=value)", input),
    }
}

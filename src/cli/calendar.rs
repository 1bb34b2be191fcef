//
//  churchtools-cli
//  cli/calendar.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! `ct calendar`: calendars and their appointments.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::calendars::{AppointmentQuery, Appointments};
use crate::output::{Column, OutputWriter};
use crate::util::parse_date;

use super::session::{connect, found};
use super::GlobalOptions;

const APPOINTMENT_COLUMNS: [Column; 5] = [
    Column::new("ID", "id"),
    Column::new("Title", "title"),
    Column::new("Start", "startDate"),
    Column::new("End", "endDate"),
    Column::new("Calendar", "calendar.id"),
];

#[derive(Args, Debug)]
pub struct CalendarCommand {
    #[command(subcommand)]
    pub command: CalendarSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CalendarSubcommand {
    /// List calendars
    #[command(visible_alias = "ls")]
    List,

    /// List appointments of one or more calendars
    Appointments(AppointmentsArgs),
}

#[derive(Args, Debug)]
pub struct AppointmentsArgs {
    /// Calendar ids
    #[arg(required = true, value_delimiter = ',')]
    pub calendars: Vec<i64>,

    /// One appointment of a single calendar
    #[arg(long)]
    pub appointment: Option<i64>,

    /// First day (YYYY-MM-DD, today, +N)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day
    #[arg(long)]
    pub to: Option<String>,
}

impl CalendarCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = connect(global).await?;
        let out = OutputWriter::from_flag(global.json);

        match &self.command {
            CalendarSubcommand::List => {
                let calendars = client.get_calendars().await?;
                out.write_records(
                    &found(calendars, "calendars")?,
                    &[
                        Column::new("ID", "id"),
                        Column::new("Name", "name"),
                        Column::new("Public", "isPublic"),
                        Column::new("Color", "color"),
                    ],
                )
            }
            CalendarSubcommand::Appointments(args) => {
                let mut query = AppointmentQuery::new(args.calendars.clone());
                if let Some(appointment) = args.appointment {
                    query = query.appointment(appointment);
                }
                if let Some(from) = &args.from {
                    query = query.from_date(parse_date(from)?);
                }
                if let Some(to) = &args.to {
                    query = query.to_date(parse_date(to)?);
                }

                match found(client.get_calendar_appointments(&query).await?, "appointments")? {
                    Appointments::Series(series) if global.json => out.write_value(&series),
                    Appointments::Series(series) => {
                        let appointment = series.get("appointment").unwrap_or(&series);
                        out.write_record(appointment, &APPOINTMENT_COLUMNS)?;
                        let dates = series
                            .get("calculatedDates")
                            .and_then(|d| d.as_array())
                            .cloned()
                            .unwrap_or_default();
                        out.write_records(
                            &dates,
                            &[Column::new("Start", "startDate"), Column::new("End", "endDate")],
                        )
                    }
                    Appointments::Occurrences(items) => out.write_records(&items, &APPOINTMENT_COLUMNS),
                }
            }
        }
    }
}

//
//  churchtools-cli
//  api/calendars.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Calendars and calendar appointments.
//!
//! # Appointment shapes
//!
//! Range queries answer with `{base, calculated}` pairs: `base` is the
//! (possibly recurring) appointment and `calculated` holds the concrete
//! `startDate`/`endDate` of one occurrence. These are flattened into the
//! base record with the occurrence dates written over it.
//!
//! A query for one appointment answers with `{appointment, calculatedDates}`.
//! A series with more than two occurrences is returned whole as
//! [`Appointments::Series`]; otherwise the appointment itself is returned as
//! a single occurrence.

use serde_json::Value;

use super::common::{client_misuse, into_list, ApiRequest, DateParam, Result};
use super::ChurchToolsClient;

/// Appointments as returned by [`ChurchToolsClient::get_calendar_appointments`].
#[derive(Debug, Clone, PartialEq)]
pub enum Appointments {
    /// Individual occurrences with their concrete dates.
    Occurrences(Vec<Value>),
    /// One recurring appointment with its `calculatedDates`.
    Series(Value),
}

impl Appointments {
    /// The occurrences, or the series wrapped as a one-element list.
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Appointments::Occurrences(items) => items,
            Appointments::Series(series) => vec![series],
        }
    }
}

/// Filters for [`ChurchToolsClient::get_calendar_appointments`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentQuery {
    pub calendar_ids: Vec<i64>,
    pub appointment_id: Option<i64>,
    pub from: Option<DateParam>,
    pub to: Option<DateParam>,
}

impl AppointmentQuery {
    pub fn new(calendar_ids: impl Into<Vec<i64>>) -> Self {
        Self {
            calendar_ids: calendar_ids.into(),
            ..Default::default()
        }
    }

    pub fn appointment(mut self, appointment_id: i64) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    pub fn from_date(mut self, date: impl Into<DateParam>) -> Self {
        self.from = Some(date.into());
        self
    }

    pub fn to_date(mut self, date: impl Into<DateParam>) -> Self {
        self.to = Some(date.into());
        self
    }

    /// Builds the request, or `None` when no calendar was given.
    pub fn to_request(&self) -> Option<ApiRequest> {
        let mut request = match self.calendar_ids.as_slice() {
            [] => {
                client_misuse("get_calendar_appointments", "at least one calendar id is required");
                return None;
            }
            [calendar_id] => match self.appointment_id {
                Some(appointment_id) => ApiRequest::get(format!(
                    "/api/calendars/{}/appointments/{}",
                    calendar_id, appointment_id
                )),
                None => ApiRequest::get(format!("/api/calendars/{}/appointments", calendar_id)),
            },
            calendar_ids => {
                if self.appointment_id.is_some() {
                    client_misuse(
                        "get_calendar_appointments",
                        "an appointment id needs exactly one calendar, ignoring the appointment id",
                    );
                }
                ApiRequest::get("/api/calendars/appointments").query_list("calendar_ids[]", calendar_ids)
            }
        };

        let from = self.from.as_ref().and_then(DateParam::to_query);
        let to = self.to.as_ref().and_then(DateParam::to_query);
        Some(request.query_opt("from", from).query_opt("to", to))
    }

    fn selects_one(&self) -> bool {
        self.appointment_id.is_some() && self.calendar_ids.len() == 1
    }
}

/// Flattens one `{base, calculated}` pair. Records without `base` are kept
/// as they are.
pub fn flatten_occurrence(mut record: Value) -> Value {
    let Some(mut base) = record.get_mut("base").map(Value::take) else {
        return record;
    };
    if let (Some(calculated), Some(fields)) = (record.get("calculated"), base.as_object_mut()) {
        for key in ["startDate", "endDate"] {
            if let Some(date) = calculated.get(key) {
                fields.insert(key.to_string(), date.clone());
            }
        }
    }
    base
}

/// Shapes the answer of a single-appointment query.
pub fn shape_single_appointment(mut data: Value) -> Appointments {
    let occurrences = data
        .get("calculatedDates")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    if occurrences > 2 {
        return Appointments::Series(data);
    }
    match data.get_mut("appointment").map(Value::take) {
        Some(appointment) => Appointments::Occurrences(vec![flatten_occurrence(appointment)]),
        None => Appointments::Occurrences(into_list(data)),
    }
}

impl ChurchToolsClient {
    pub async fn get_calendars(&self) -> Result<Option<Vec<Value>>> {
        self.get_paginated(&ApiRequest::get("/api/calendars"), "calendars")
            .await
    }

    /// Appointments of one or more calendars, or one appointment by id.
    pub async fn get_calendar_appointments(&self, query: &AppointmentQuery) -> Result<Option<Appointments>> {
        let Some(request) = query.to_request() else {
            return Ok(None);
        };

        if query.selects_one() {
            let what = format!("appointment {}", query.appointment_id.unwrap_or_default());
            return Ok(self
                .get_data(&request, &what)
                .await?
                .map(shape_single_appointment));
        }

        Ok(self
            .get_paginated(&request, "calendar appointments")
            .await?
            .map(|records| {
                Appointments::Occurrences(records.into_iter().map(flatten_occurrence).collect())
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_paths() {
        let one = AppointmentQuery::new(vec![2]).to_request().map(|r| r.path().to_string());
        assert_eq!(one.as_deref(), Some("/api/calendars/2/appointments"));

        let by_id = AppointmentQuery::new(vec![2])
            .appointment(304976)
            .to_request()
            .map(|r| r.path().to_string());
        assert_eq!(by_id.as_deref(), Some("/api/calendars/2/appointments/304976"));

        let many = AppointmentQuery::new(vec![2, 42])
            .appointment(1)
            .from_date("2024-01-01")
            .to_request();
        let many = many.as_ref();
        assert_eq!(many.map(|r| r.path()), Some("/api/calendars/appointments"));
        assert_eq!(
            many.map(|r| r.query_pairs().len()),
            Some(3),
            "two calendar ids and from, appointment id dropped"
        );
    }

    #[test]
    fn test_empty_calendar_list_is_rejected() {
        assert!(AppointmentQuery::new(Vec::new()).to_request().is_none());
    }

    #[test]
    fn test_flatten_occurrence() {
        let record = json!({
            "base": {"id": 5, "caption": "Service", "startDate": "2024-01-07T09:00:00Z"},
            "calculated": {"startDate": "2024-03-03T09:00:00Z", "endDate": "2024-03-03T10:00:00Z"}
        });
        assert_eq!(
            flatten_occurrence(record),
            json!({
                "id": 5,
                "caption": "Service",
                "startDate": "2024-03-03T09:00:00Z",
                "endDate": "2024-03-03T10:00:00Z"
            })
        );
    }

    #[test]
    fn test_single_appointment_shapes() {
        let series = json!({
            "appointment": {"base": {"id": 1}},
            "calculatedDates": ["a", "b", "c"]
        });
        assert!(matches!(shape_single_appointment(series), Appointments::Series(_)));

        let single = json!({
            "appointment": {"base": {"id": 1}, "calculated": {"startDate": "s", "endDate": "e"}},
            "calculatedDates": ["s"]
        });
        assert_eq!(
            shape_single_appointment(single),
            Appointments::Occurrences(vec![json!({"id": 1, "startDate": "s", "endDate": "e"})])
        );
    }
}

//
//  churchtools-cli
//  api/events.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Events, event master data and event agendas.
//!
//! # Query rules
//!
//! `GET /api/events` accepts a `from`/`to` window, a `direction` with a
//! `limit` (the N events before or after now), `canceled` and `include[]`.
//! Two combinations are rejected client-side: `to` without `from`, and
//! `limit` without `direction`. The offending parameter is dropped with a
//! warning and the query runs without it.
//!
//! Admins and service counts, which only the legacy surface exposes, are in
//! [`crate::api::ajax::events`]; agenda export and document rendering are in
//! [`crate::api::agenda`].

use serde_json::Value;
use tracing::info;

use super::common::{
    client_misuse, id_value, into_list, ApiRequest, DateParam, Result, DEFAULT_PAGE_SIZE,
};
use super::ChurchToolsClient;

/// Which side of today `limit` counts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

/// Filters for [`ChurchToolsClient::get_events`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub from: Option<DateParam>,
    pub to: Option<DateParam>,
    pub direction: Option<Direction>,
    pub limit: Option<u32>,
    pub canceled: Option<bool>,
    pub include: Vec<String>,
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_date(mut self, date: impl Into<DateParam>) -> Self {
        self.from = Some(date.into());
        self
    }

    pub fn to_date(mut self, date: impl Into<DateParam>) -> Self {
        self.to = Some(date.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn canceled(mut self, canceled: bool) -> Self {
        self.canceled = Some(canceled);
        self
    }

    pub fn include(mut self, include: impl Into<String>) -> Self {
        self.include.push(include.into());
        self
    }

    /// Builds the request, dropping parameters used in invalid combinations.
    pub fn to_request(&self) -> ApiRequest {
        let mut request = ApiRequest::get("/api/events");

        let from = self.from.as_ref().and_then(DateParam::to_query);
        let to = self.to.as_ref().and_then(DateParam::to_query);
        match (from, to) {
            (Some(from), Some(to)) => request = request.query("from", from).query("to", to),
            (Some(from), None) => request = request.query("from", from),
            (None, Some(_)) => client_misuse("get_events", "'to' requires 'from', ignoring 'to'"),
            (None, None) => {}
        }

        match (self.direction, self.limit) {
            (Some(direction), Some(limit)) => {
                request = request
                    .query("direction", direction.as_str())
                    .query("limit", limit);
            }
            (Some(direction), None) => {
                request = request
                    .query("direction", direction.as_str())
                    .query("limit", DEFAULT_PAGE_SIZE);
            }
            (None, Some(_)) => {
                client_misuse("get_events", "'limit' requires 'direction', ignoring 'limit'");
                request = request.query("limit", DEFAULT_PAGE_SIZE);
            }
            (None, None) => request = request.query("limit", DEFAULT_PAGE_SIZE),
        }

        if let Some(canceled) = self.canceled {
            request = request.query("canceled", canceled);
        }
        request.query_list("include[]", &self.include)
    }
}

impl ChurchToolsClient {
    /// Events matching `query`, across all pages.
    pub async fn get_events(&self, query: &EventQuery) -> Result<Option<Vec<Value>>> {
        self.get_paginated(&query.to_request(), "events").await
    }

    /// One event, as a one-element list.
    pub async fn get_event_by_id(&self, event_id: i64) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get(format!("/api/events/{}", event_id));
        Ok(self
            .get_data(&request, &format!("event {}", event_id))
            .await?
            .map(into_list))
    }

    /// The complete event master data object.
    pub async fn get_event_masterdata(&self) -> Result<Option<Value>> {
        self.get_data(&ApiRequest::get("/api/event/masterdata"), "event masterdata")
            .await
    }

    /// One catalog of the event master data, e.g. `"serviceGroups"`,
    /// `"songCategories"` or `"absenceReasons"`.
    pub async fn get_event_masterdata_of(&self, catalog: &str) -> Result<Option<Vec<Value>>> {
        let Some(mut masterdata) = self.get_event_masterdata().await? else {
            return Ok(None);
        };
        match masterdata.get_mut(catalog) {
            Some(entries) => Ok(Some(into_list(entries.take()))),
            None => {
                client_misuse(
                    "get_event_masterdata_of",
                    &format!("unknown masterdata catalog '{}'", catalog),
                );
                Ok(None)
            }
        }
    }

    pub async fn get_event_agenda(&self, event_id: i64) -> Result<Option<Value>> {
        let request = ApiRequest::get(format!("/api/events/{}/agenda", event_id));
        self.get_data(&request, &format!("agenda of event {}", event_id))
            .await
    }

    /// Persons assigned to one service of an event (the `eventServices`
    /// rows of that service).
    pub async fn get_persons_with_service(&self, event_id: i64, service_id: i64) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get(format!("/api/events/{}", event_id)).query("include", "eventServices");
        let Some(mut event) = self.get_data(&request, &format!("event {}", event_id)).await? else {
            return Ok(None);
        };

        let services = into_list(event.get_mut("eventServices").map(Value::take).unwrap_or(Value::Null));
        Ok(Some(
            services
                .into_iter()
                .filter(|row| row.get("serviceId").and_then(id_value) == Some(service_id))
                .collect(),
        ))
    }

    /// The event created from a calendar appointment on `start_date`.
    pub async fn get_event_by_calendar_appointment(
        &self,
        appointment_id: i64,
        start_date: impl Into<DateParam>,
    ) -> Result<Option<Value>> {
        let day = start_date.into();
        let query = EventQuery::new().from_date(day.clone()).to_date(day);
        let Some(events) = self.get_events(&query).await? else {
            return Ok(None);
        };

        let found = events
            .into_iter()
            .find(|event| event.get("appointmentId").and_then(id_value) == Some(appointment_id));
        if found.is_none() {
            info!(appointment_id, "No event found for calendar appointment");
        }
        Ok(found)
    }
}

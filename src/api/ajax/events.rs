//
//  churchtools-cli
//  api/ajax/events.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Event admins and service counts over the AJAX surface.
//!
//! # Service counts
//!
//! `addOrRemoveServiceToEvent` takes the complete set of services of one
//! service group as positional triples:
//!
//! ```text
//! id=<event>  col0=<service> val0=checked count0=<n>  col1=... count1=...
//! ```
//!
//! A service of that group missing from the request is removed from the
//! event. Updating one service therefore re-sends every sibling assignment
//! that is currently set, with only the requested row changed.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{info, warn};

use crate::api::common::{client_misuse, form_fields, id_value, Result};
use crate::api::ChurchToolsClient;

/// Counts active assignments per service id in a `getAllEventData` record.
///
/// Rows with `valid_yn = "0"` are historic and are not counted.
pub fn count_services(event: &Value) -> BTreeMap<i64, u32> {
    let rows: Vec<&Value> = match event.get("services") {
        Some(Value::Array(rows)) => rows.iter().collect(),
        Some(Value::Object(rows)) => rows.values().collect(),
        _ => Vec::new(),
    };

    let mut counts = BTreeMap::new();
    for row in rows {
        let valid = row
            .get("valid_yn")
            .map(|v| *v != "0" && *v != 0)
            .unwrap_or(true);
        if !valid {
            continue;
        }
        if let Some(service_id) = row.get("service_id").and_then(id_value) {
            *counts.entry(service_id).or_insert(0) += 1;
        }
    }
    counts
}

/// Admin person ids of a `getAllEventData` record (`"admin": "1, 2"`).
pub fn parse_admin_ids(event: &Value) -> Vec<i64> {
    match event.get("admin") {
        Some(Value::String(admins)) => admins
            .split(',')
            .filter_map(|id| id.trim().parse().ok())
            .collect(),
        Some(Value::Array(admins)) => admins.iter().filter_map(id_value).collect(),
        Some(other) => id_value(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Merges one updated count into the current assignments of a service group.
///
/// Siblings keep their current count when it is non-zero; the updated
/// service is always included, also with a count of zero (which removes it).
pub fn merge_service_count(
    group_services: &[i64],
    current: &BTreeMap<i64, u32>,
    service_id: i64,
    count: u32,
) -> Vec<(i64, u32)> {
    let mut assignments: Vec<(i64, u32)> = group_services
        .iter()
        .filter(|sibling| **sibling != service_id)
        .filter_map(|sibling| {
            current
                .get(sibling)
                .filter(|count| **count > 0)
                .map(|count| (*sibling, *count))
        })
        .collect();
    assignments.push((service_id, count));
    assignments
}

/// Encodes assignments as the positional `colN`/`valN`/`countN` form.
pub fn encode_service_counts(event_id: i64, assignments: &[(i64, u32)]) -> Vec<(String, String)> {
    let mut fields = vec![("id".to_string(), event_id.to_string())];
    for (row, (service_id, count)) in assignments.iter().enumerate() {
        fields.push((format!("col{}", row), service_id.to_string()));
        if *count > 0 {
            fields.push((format!("val{}", row), "checked".to_string()));
        }
        fields.push((format!("count{}", row), count.to_string()));
    }
    fields
}

impl ChurchToolsClient {
    /// The legacy record of one event.
    async fn get_event_data_ajax(&self, event_id: i64) -> Result<Option<Value>> {
        let Some(mut data) = self
            .ajax("getAllEventData", form_fields([("id", event_id)]))
            .await?
        else {
            return Ok(None);
        };

        let key = event_id.to_string();
        if let Some(event) = data.get_mut(key.as_str()) {
            return Ok(Some(event.take()));
        }
        if data.get("id").and_then(id_value) == Some(event_id) {
            return Ok(Some(data));
        }

        info!(event_id, "Event not found in legacy event data");
        Ok(None)
    }

    /// Active assignment counts per service of one event.
    pub async fn get_event_service_counts(&self, event_id: i64) -> Result<Option<BTreeMap<i64, u32>>> {
        Ok(self
            .get_event_data_ajax(event_id)
            .await?
            .map(|event| count_services(&event)))
    }

    /// Number of persons requested for one service of one event.
    pub async fn get_event_service_count(&self, event_id: i64, service_id: i64) -> Result<Option<u32>> {
        Ok(self
            .get_event_service_counts(event_id)
            .await?
            .map(|counts| counts.get(&service_id).copied().unwrap_or(0)))
    }

    /// Sets how many persons are requested for one service of an event,
    /// keeping the other services of the same service group as they are.
    pub async fn set_event_service_count(&self, event_id: i64, service_id: i64, count: u32) -> Result<bool> {
        let Some(services) = self.get_services_by_id().await? else {
            return Ok(false);
        };
        let Some(group_id) = services
            .get(&service_id)
            .and_then(|service| service.get("serviceGroupId"))
            .and_then(id_value)
        else {
            client_misuse(
                "set_event_service_count",
                &format!("service {} is unknown or has no service group", service_id),
            );
            return Ok(false);
        };

        let group_services: Vec<i64> = services
            .iter()
            .filter(|(_, service)| service.get("serviceGroupId").and_then(id_value) == Some(group_id))
            .map(|(id, _)| *id)
            .collect();

        let Some(current) = self.get_event_service_counts(event_id).await? else {
            return Ok(false);
        };

        let assignments = merge_service_count(&group_services, &current, service_id, count);
        let fields = encode_service_counts(event_id, &assignments);
        let updated = self.ajax("addOrRemoveServiceToEvent", fields).await?.is_some();
        if !updated {
            warn!(event_id, service_id, count, "Service count was not updated");
        }
        Ok(updated)
    }

    pub async fn get_event_admins(&self, event_id: i64) -> Result<Option<Vec<i64>>> {
        Ok(self
            .get_event_data_ajax(event_id)
            .await?
            .map(|event| parse_admin_ids(&event)))
    }

    /// Replaces the admins of an event.
    pub async fn set_event_admins(&self, event_id: i64, admin_ids: &[i64]) -> Result<bool> {
        let admins = admin_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let fields = vec![
            ("id".to_string(), event_id.to_string()),
            ("admin".to_string(), admins),
        ];
        Ok(self.ajax("updateEventInfo", fields).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_services() {
        let event = json!({
            "services": [
                {"service_id": "1", "valid_yn": "1"},
                {"service_id": "1", "valid_yn": "1"},
                {"service_id": "2", "valid_yn": "0"},
                {"service_id": 3}
            ]
        });
        let counts = count_services(&event);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), None);
        assert_eq!(counts.get(&3), Some(&1));
    }

    #[test]
    fn test_parse_admin_ids() {
        assert_eq!(parse_admin_ids(&json!({"admin": "9, 12"})), vec![9, 12]);
        assert_eq!(parse_admin_ids(&json!({"admin": [4]})), vec![4]);
        assert!(parse_admin_ids(&json!({"admin": null})).is_empty());
    }

    #[test]
    fn test_merge_keeps_siblings() {
        let current = BTreeMap::from([(1, 2), (2, 1), (3, 0)]);
        let merged = merge_service_count(&[1, 2, 3], &current, 2, 4);
        assert_eq!(merged, vec![(1, 2), (2, 4)]);
    }

    #[test]
    fn test_encode_service_counts() {
        let fields = encode_service_counts(77, &[(1, 2), (5, 0)]);
        let rendered: Vec<String> = fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
        assert_eq!(
            rendered,
            vec!["id=77", "col0=1", "val0=checked", "count0=2", "col1=5", "count1=0"]
        );
    }
}

//
//  churchtools-cli
//  api/persons.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Persons and person master data.
//!
//! `GET /api/persons` is one of the large collections and is requested with
//! a raised page size. Master data (`GET /api/person/masterdata`) is a
//! single object of catalogs such as `sexes`, `statuses`, `campuses`,
//! `roles` or `groupTypes`.

use serde_json::Value;

use super::common::{into_list, ApiRequest, Result, DEFAULT_PAGE_SIZE};
use super::ChurchToolsClient;

impl ChurchToolsClient {
    /// All persons visible to the logged-in user.
    pub async fn get_persons(&self) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get("/api/persons").query("limit", DEFAULT_PAGE_SIZE);
        self.get_paginated(&request, "persons").await
    }

    /// Persons with the given ids.
    pub async fn get_persons_by_ids(&self, ids: &[i64]) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get("/api/persons")
            .query("limit", DEFAULT_PAGE_SIZE)
            .query_list("ids[]", ids);
        self.get_paginated(&request, "persons").await
    }

    pub async fn get_person(&self, person_id: i64) -> Result<Option<Value>> {
        let request = ApiRequest::get(format!("/api/persons/{}", person_id));
        self.get_data(&request, &format!("person {}", person_id)).await
    }

    /// The complete person master data object.
    pub async fn get_persons_masterdata(&self) -> Result<Option<Value>> {
        self.get_data(&ApiRequest::get("/api/person/masterdata"), "person masterdata")
            .await
    }

    /// One catalog of the person master data, e.g. `"sexes"` or `"campuses"`.
    pub async fn get_person_masterdata(&self, catalog: &str) -> Result<Option<Vec<Value>>> {
        let Some(mut masterdata) = self.get_persons_masterdata().await? else {
            return Ok(None);
        };
        match masterdata.get_mut(catalog) {
            Some(entries) => Ok(Some(into_list(entries.take()))),
            None => {
                super::common::client_misuse(
                    "get_person_masterdata",
                    &format!("unknown masterdata catalog '{}'", catalog),
                );
                Ok(None)
            }
        }
    }
}

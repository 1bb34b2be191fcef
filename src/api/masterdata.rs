//
//  churchtools-cli
//  api/masterdata.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Services, global permissions and database field definitions.

use std::collections::BTreeMap;

use serde_json::Value;

use super::common::{index_by_id, ApiRequest, Result};
use super::ChurchToolsClient;

impl ChurchToolsClient {
    /// All services (roles that can be assigned on events).
    pub async fn get_services(&self) -> Result<Option<Vec<Value>>> {
        self.get_paginated(&ApiRequest::get("/api/services"), "services")
            .await
    }

    pub async fn get_service(&self, service_id: i64) -> Result<Option<Value>> {
        let request = ApiRequest::get(format!("/api/services/{}", service_id));
        self.get_data(&request, &format!("service {}", service_id)).await
    }

    /// All services keyed by id.
    pub async fn get_services_by_id(&self) -> Result<Option<BTreeMap<i64, Value>>> {
        Ok(self.get_services().await?.map(index_by_id))
    }

    /// Global permissions of the logged-in user, grouped by module.
    pub async fn get_global_permissions(&self) -> Result<Option<Value>> {
        self.get_data(&ApiRequest::get("/api/permissions/global"), "global permissions")
            .await
    }

    /// Field definitions of the person database, including option lists.
    pub async fn get_db_fields(&self) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get("/api/dbfields").query("include[]", "options");
        self.get_paginated(&request, "database fields").await
    }
}

//
//  churchtools-cli
//  api/resources.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bookable resources (rooms, equipment).

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::error;

use super::common::{into_list, ApiRequest, Result};
use super::ChurchToolsClient;

/// Catalog of `GET /api/resource/masterdata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMasterdata {
    ResourceTypes,
    Resources,
}

impl ResourceMasterdata {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceMasterdata::ResourceTypes => "resourceTypes",
            ResourceMasterdata::Resources => "resources",
        }
    }
}

impl fmt::Display for ResourceMasterdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceMasterdata {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "resourceTypes" | "resource-types" | "types" => Ok(ResourceMasterdata::ResourceTypes),
            "resources" => Ok(ResourceMasterdata::Resources),
            other => Err(format!(
                "unknown resource masterdata '{}' (expected resourceTypes or resources)",
                other
            )),
        }
    }
}

impl ChurchToolsClient {
    /// One catalog of the resource master data.
    pub async fn get_resource_masterdata(&self, kind: ResourceMasterdata) -> Result<Option<Vec<Value>>> {
        let request = ApiRequest::get("/api/resource/masterdata");
        let Some(mut masterdata) = self.get_data(&request, "resource masterdata").await? else {
            return Ok(None);
        };

        match masterdata.get_mut(kind.as_str()) {
            Some(entries) => Ok(Some(into_list(entries.take()))),
            None => {
                error!(kind = %kind, "Resource masterdata has no such catalog");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            "resourceTypes".parse::<ResourceMasterdata>(),
            Ok(ResourceMasterdata::ResourceTypes)
        );
        assert_eq!("resources".parse::<ResourceMasterdata>(), Ok(ResourceMasterdata::Resources));
        assert!("rooms".parse::<ResourceMasterdata>().is_err());
    }
}

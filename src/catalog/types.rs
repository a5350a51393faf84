use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A search result entry from the TLE catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Satellite {
    pub name: String,
    pub satellite_id: u32,
}

impl Satellite {
    pub fn new(name: impl Into<String>, satellite_id: u32) -> Self {
        Self {
            name: name.into(),
            satellite_id,
        }
    }
}

/// Two-line element set for one satellite, as returned by `GET /api/tle/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TleData {
    pub name: String,
    pub satellite_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub line1: String,
    pub line2: String,
}

/// Search envelope. The JSON-LD `@context`/`@id`/`@type` members are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteListResponse {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub member: Vec<Satellite>,
}

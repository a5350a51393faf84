use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::catalog::error::CatalogError;
use crate::catalog::types::{Satellite, SatelliteListResponse, TleData};
use crate::config::CatalogConfig;

/// Returns true when `term` is long enough to be sent to the catalog.
pub fn is_searchable(term: &str, min_len: usize) -> bool {
    term.chars().count() >= min_len
}

/// REST client for the TLE catalog (`/api/tle`).
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    /// `GET {base}?search=<term>&page-size=<n>`
    pub async fn search(&self, term: &str) -> Result<Vec<Satellite>, CatalogError> {
        let page_size = self.page_size.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("search", term), ("page-size", page_size.as_str())])
            .send()
            .await?;

        let list: SatelliteListResponse = decode(response).await?;
        log::debug!(
            "catalog search '{}' returned {} of {} satellites",
            term,
            list.member.len(),
            list.total_items
        );
        Ok(list.member)
    }

    /// `GET {base}/{id}`
    pub async fn fetch_tle(&self, satellite_id: u32) -> Result<TleData, CatalogError> {
        let url = format!("{}/{}", self.base_url, satellite_id);
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        let reason = status
            .canonical_reason()
            .map(String::from)
            .unwrap_or_else(|| status.as_str().to_string());
        return Err(CatalogError::Status(reason));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{iss_tle, spawn_server};
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn config_for(base_url: String) -> CatalogConfig {
        CatalogConfig {
            base_url,
            ..CatalogConfig::default()
        }
    }

    async fn fake_catalog() -> String {
        let app = Router::new()
            .route(
                "/api/tle",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let term = q.get("search").cloned().unwrap_or_default();
                    let page_size = q.get("page-size").cloned().unwrap_or_default();
                    Json(json!({
                        "@context": "https://www.w3.org/ns/hydra/context.jsonld",
                        "@id": "https://tle.ivanstanojevic.me/api/tle",
                        "@type": "Collection",
                        "totalItems": 1,
                        "member": [
                            { "@id": "x", "@type": "Tle", "satelliteId": 25544, "name": format!("{term}|{page_size}") }
                        ]
                    }))
                }),
            )
            .route(
                "/api/tle/{id}",
                get(|Path(id): Path<u32>| async move {
                    if id == 25544 {
                        Ok(Json(serde_json::to_value(iss_tle()).unwrap()))
                    } else {
                        Err(StatusCode::NOT_FOUND)
                    }
                }),
            )
            .route("/broken/api/tle", get(|| async { "not json" }));
        spawn_server(app).await
    }

    #[tokio::test]
    async fn search_sends_term_and_page_size() {
        let base = fake_catalog().await;
        let client = CatalogClient::new(&config_for(format!("{base}/api/tle"))).unwrap();

        let result = client.search("iss zarya").await.unwrap();
        assert_eq!(result, vec![Satellite::new("iss zarya|50", 25544)]);
    }

    #[tokio::test]
    async fn fetch_tle_decodes_element_set() {
        let base = fake_catalog().await;
        let client = CatalogClient::new(&config_for(format!("{base}/api/tle/"))).unwrap();

        let tle = client.fetch_tle(25544).await.unwrap();
        assert_eq!(tle, iss_tle());
    }

    #[tokio::test]
    async fn non_success_status_reports_reason() {
        let base = fake_catalog().await;
        let client = CatalogClient::new(&config_for(format!("{base}/api/tle"))).unwrap();

        let err = client.fetch_tle(1).await.unwrap_err();
        assert!(matches!(err, CatalogError::Status(_)));
        assert_eq!(err.to_string(), "API error: Not Found");
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let base = fake_catalog().await;
        let client = CatalogClient::new(&config_for(format!("{base}/broken/api/tle"))).unwrap();

        let err = client.search("starlink").await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn short_terms_are_not_searchable() {
        assert!(!is_searchable("", 3));
        assert!(!is_searchable("is", 3));
        assert!(is_searchable("iss", 3));
        // counted in characters, not bytes
        assert!(!is_searchable("위성", 3));
    }
}

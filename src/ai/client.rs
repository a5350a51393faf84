use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::AiError;
use crate::config::AiConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Single-prompt client for the `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    url: String,
    language: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig, api_key: &str) -> Result<Self, AiError> {
        let key = api_key.trim();
        if key.is_empty() {
            return Err(AiError::MissingKey);
        }

        let mut value = HeaderValue::from_str(key).map_err(|_| AiError::InvalidKey)?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            url: format!(
                "{}/v1beta/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
            language: config.language.clone(),
        })
    }

    pub fn prompt(&self, satellite_name: &str) -> String {
        format!(
            "Explain the satellite '{}' so that a general audience can understand it. \
             What is its purpose, and what interesting facts are there about it? \
             Answer in {}.",
            satellite_name, self.language
        )
    }

    pub async fn describe(&self, satellite_name: &str) -> Result<String, AiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(self.prompt(satellite_name)),
                }],
            }],
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AiError::Status(status.to_string()));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(AiError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::{extract::Path, http::HeaderMap as AxumHeaders, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn fake_service() -> String {
        let app = Router::new().route(
            "/v1beta/models/{call}",
            post(|Path(call): Path<String>, headers: AxumHeaders, Json(body): Json<Value>| async move {
                if headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) != Some("good-key") {
                    return Err(StatusCode::FORBIDDEN);
                }
                let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
                if prompt.contains("'SILENT'") {
                    return Ok(Json(json!({ "candidates": [] })));
                }
                Ok(Json(json!({
                    "candidates": [{
                        "content": { "parts": [ { "text": format!("{call}: ") }, { "text": prompt } ] }
                    }]
                })))
            }),
        );
        spawn_server(app).await
    }

    fn config(endpoint: String) -> AiConfig {
        AiConfig {
            endpoint,
            ..AiConfig::default()
        }
    }

    #[tokio::test]
    async fn describe_posts_prompt_to_model() {
        let base = fake_service().await;
        let client = GeminiClient::new(&config(base), "good-key").unwrap();

        let text = client.describe("HST").await.unwrap();
        assert!(text.starts_with("gemini-2.5-flash:generateContent: "));
        assert!(text.contains("'HST'"));
        assert!(text.contains("Answer in English."));
    }

    #[tokio::test]
    async fn rejected_key_is_status_error() {
        let base = fake_service().await;
        let client = GeminiClient::new(&config(base), "bad-key").unwrap();
        assert!(matches!(client.describe("HST").await, Err(AiError::Status(_))));
    }

    #[tokio::test]
    async fn empty_candidates_are_reported() {
        let base = fake_service().await;
        let client = GeminiClient::new(&config(base), "good-key").unwrap();
        assert!(matches!(client.describe("SILENT").await, Err(AiError::EmptyResponse)));
    }

    #[test]
    fn construction_validates_key() {
        let config = AiConfig::default();
        assert!(matches!(GeminiClient::new(&config, "  "), Err(AiError::MissingKey)));
        assert!(matches!(GeminiClient::new(&config, "bad\u{7f}key"), Err(AiError::InvalidKey)));
        assert!(GeminiClient::new(&config, "abc").is_ok());
    }
}

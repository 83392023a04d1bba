//! `reqwest` implementation of the case API.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, info};

use super::{ApiError, ApiResult, CaseApi, CaseCreated};
use crate::config::ClientConfig;
use crate::db::PendingAttachment;
use crate::mapper::CasePayload;

/// Body of a 422 response.
#[derive(Debug, Deserialize)]
struct ValidationBody {
    #[serde(default)]
    errors: BTreeMap<String, FieldMessages>,
}

/// Backends send either one message or a list per field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

impl FieldMessages {
    fn into_vec(self) -> Vec<String> {
        match self {
            FieldMessages::One(message) => vec![message],
            FieldMessages::Many(messages) => messages,
        }
    }
}

/// Blocking HTTP client for the lab backend.
pub struct HttpCaseApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCaseApi {
    pub fn new(config: &ClientConfig, token: Option<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl CaseApi for HttpCaseApi {
    fn create_case(&self, payload: &CasePayload) -> ApiResult<CaseCreated> {
        let url = format!("{}/cases", self.base_url);
        info!(
            "POST {} ({} slips, {} products)",
            url,
            payload.slips.len(),
            payload.product_count()
        );

        let response = self
            .authorize(self.client.post(&url))
            .header("Accept", "application/json")
            .json(payload)
            .send()
            .map_err(transport_error)?;
        let response = check_status(response)?;

        let body = response.text().map_err(transport_error)?;
        serde_json::from_str::<CaseCreated>(&body).map_err(|e| {
            error!("Failed to parse case response: {}", e);
            ApiError::Decode(e.to_string())
        })
    }

    fn upload_attachment(&self, slip_id: i64, attachment: &PendingAttachment) -> ApiResult<()> {
        let url = format!("{}/slips/{}/attachments", self.base_url, slip_id);
        debug!("POST {} ({})", url, attachment.file_name);

        let response = self
            .authorize(self.client.post(&url))
            .query(&[("filename", attachment.file_name.as_str())])
            .header("Content-Type", attachment.content_type.as_str())
            .body(attachment.content.clone())
            .send()
            .map_err(transport_error)?;
        check_status(response)?;
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_decode() {
        ApiError::Decode(e.to_string())
    } else {
        ApiError::Network(e.to_string())
    }
}

fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    error!("Backend request failed with status {}: {}", status, body);
    Err(status_error(status, &body))
}

/// Classify a failed response body.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Ok(parsed) = serde_json::from_str::<ValidationBody>(body) {
            if !parsed.errors.is_empty() {
                return ApiError::Validation(
                    parsed
                        .errors
                        .into_iter()
                        .map(|(field, messages)| (field, messages.into_vec()))
                        .collect(),
                );
            }
        }
    }
    ApiError::Status {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_422_field_errors() {
        let body = r#"{"message": "invalid", "errors": {"case.patient_name": "is required", "slips.0.products": ["is empty"]}}"#;
        let err = status_error(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(
            err.field_messages(),
            vec!["case.patient_name: is required", "slips.0.products: is empty"]
        );
    }

    #[test]
    fn test_422_without_errors_map() {
        let err = status_error(StatusCode::UNPROCESSABLE_ENTITY, "not json");
        assert_eq!(
            err,
            ApiError::Status {
                status: 422,
                body: "not json".into()
            }
        );
    }

    #[test]
    fn test_server_error() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[test]
    fn test_base_url_trimmed() {
        let config = ClientConfig {
            api_base_url: "https://lab.example.com/api/".into(),
            ..ClientConfig::default()
        };
        let api = HttpCaseApi::new(&config, Some(" ".into())).unwrap();
        assert_eq!(api.base_url(), "https://lab.example.com/api");
        assert!(api.token.is_none());
    }
}

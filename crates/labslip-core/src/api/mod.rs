//! Backend case API.

mod http;

pub use http::HttpCaseApi;

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::db::PendingAttachment;
use crate::mapper::CasePayload;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 422 with per-field messages
    #[error("Validation failed: {0:?}")]
    Validation(BTreeMap<String, Vec<String>>),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Field errors flattened to `field: message`, in field order.
    pub fn field_messages(&self) -> Vec<String> {
        match self {
            ApiError::Validation(fields) => fields
                .iter()
                .flat_map(|(field, messages)| {
                    messages.iter().map(move |message| format!("{field}: {message}"))
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Product created for a submitted slip.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreatedProduct {
    pub id: i64,
    pub client_ref: String,
}

/// Slip created for a submitted case.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreatedSlip {
    pub id: i64,
    pub client_ref: String,
    #[serde(default)]
    pub products: Vec<CreatedProduct>,
    #[serde(default)]
    pub delivery_date: Option<String>,
}

/// Response to a successful case creation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CaseCreated {
    pub case_id: i64,
    #[serde(default)]
    pub slips: Vec<CreatedSlip>,
}

/// The backend collaborator used by submission.
pub trait CaseApi {
    fn create_case(&self, payload: &CasePayload) -> ApiResult<CaseCreated>;

    fn upload_attachment(&self, slip_id: i64, attachment: &PendingAttachment) -> ApiResult<()>;
}

impl<T: CaseApi + ?Sized> CaseApi for &T {
    fn create_case(&self, payload: &CasePayload) -> ApiResult<CaseCreated> {
        (**self).create_case(payload)
    }

    fn upload_attachment(&self, slip_id: i64, attachment: &PendingAttachment) -> ApiResult<()> {
        (**self).upload_attachment(slip_id, attachment)
    }
}

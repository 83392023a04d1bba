//! Request body accepted by the case creation endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Full case creation body: `{ "case": {...}, "slips": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CasePayload {
    pub case: CasePart,
    pub slips: Vec<SlipPayload>,
}

impl CasePayload {
    pub fn product_count(&self) -> usize {
        self.slips.iter().map(|slip| slip.products.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CasePart {
    pub patient_name: String,
    pub doctor_id: Option<i64>,
    pub office_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlipPayload {
    /// Local slip id, echoed back by the backend
    pub client_ref: String,
    pub status: String,
    pub location_id: Option<i64>,
    pub products: Vec<ProductPayload>,
    pub notes: Vec<NotePayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rush: Option<RushPayload>,
}

/// One product on one arch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductPayload {
    /// Local product id, echoed back by the backend
    pub client_ref: String,
    pub product_id: i64,
    pub name: String,
    /// "maxillary" or "mandibular"
    #[serde(rename = "type")]
    pub arch: String,
    pub restoration: String,
    pub grade_id: i64,
    pub stage_id: i64,
    pub teeth_shade_brand_id: i64,
    pub teeth_shade_id: i64,
    pub gum_shade_brand_id: i64,
    pub gum_shade_id: i64,
    pub teeth: Vec<u8>,
    pub impressions: Vec<ImpressionPayload>,
    pub extractions: Vec<ExtractionPayload>,
    pub add_ons: Vec<AddOnPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImpressionPayload {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub teeth: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddOnPayload {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotePayload {
    pub text: String,
    pub stage: Option<String>,
    pub author: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RushPayload {
    pub requested_date: NaiveDate,
    pub reason: Option<String>,
}

//! Slip (order) models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::product::Product;

/// Slip status as understood by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlipStatus {
    /// Being designed locally
    #[default]
    Draft,
    /// Sent to the lab
    Submitted,
    /// Lab is working on it
    InProgress,
    /// Waiting on the practice
    OnHold,
    Completed,
}

impl SlipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlipStatus::Draft => "draft",
            SlipStatus::Submitted => "submitted",
            SlipStatus::InProgress => "in_progress",
            SlipStatus::OnHold => "on_hold",
            SlipStatus::Completed => "completed",
        }
    }
}

/// A free-text note attached to a slip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub client_id: String,
    pub text: String,
    /// Stage the note refers to (stage notes)
    pub stage: Option<String>,
    pub author: Option<String>,
    pub created_at: String,
}

impl Note {
    pub fn new(text: String, stage: Option<String>, author: Option<String>) -> Self {
        Self {
            client_id: uuid::Uuid::new_v4().to_string(),
            text,
            stage,
            author,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Request to have a slip delivered earlier than the lab schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RushRequest {
    pub requested_date: NaiveDate,
    pub reason: Option<String>,
}

/// An order grouping products and notes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slip {
    /// Local UUID
    pub client_id: String,
    /// Server ID - null until submission succeeds
    pub server_id: Option<i64>,
    pub status: SlipStatus,
    pub location_id: Option<i64>,
    pub products: Vec<Product>,
    pub notes: Vec<Note>,
    pub rush: Option<RushRequest>,
    /// Delivery date reported by the backend
    pub delivery_date: Option<String>,
}

impl Slip {
    pub fn new(location_id: Option<i64>) -> Self {
        Self {
            client_id: uuid::Uuid::new_v4().to_string(),
            server_id: None,
            status: SlipStatus::Draft,
            location_id,
            products: Vec::new(),
            notes: Vec::new(),
            rush: None,
            delivery_date: None,
        }
    }

    /// Check if the slip carries anything worth keeping.
    pub fn has_content(&self) -> bool {
        !self.products.is_empty() || !self.notes.is_empty()
    }

    pub fn product(&self, client_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.client_id == client_id)
    }

    pub fn product_mut(&mut self, client_id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.client_id == client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArchType;

    #[test]
    fn test_new_slip_is_draft() {
        let slip = Slip::new(Some(7));
        assert_eq!(slip.status, SlipStatus::Draft);
        assert_eq!(slip.location_id, Some(7));
        assert!(!slip.has_content());
    }

    #[test]
    fn test_has_content_with_note_only() {
        let mut slip = Slip::new(None);
        slip.notes.push(Note::new("Call before delivery".into(), None, None));
        assert!(slip.has_content());
    }

    #[test]
    fn test_product_lookup() {
        let mut slip = Slip::new(None);
        let product = Product::new(3, "Night Guard".into(), ArchType::Maxillary);
        let id = product.client_id.clone();
        slip.products.push(product);

        assert!(slip.product(&id).is_some());
        assert!(slip.product("missing").is_none());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(SlipStatus::InProgress.as_str(), "in_progress");
        let json = serde_json::to_string(&SlipStatus::OnHold).unwrap();
        assert_eq!(json, "\"on_hold\"");
    }
}

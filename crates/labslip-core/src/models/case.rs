//! Case draft models (the unit persisted between reloads).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::product::Product;
use super::slip::Slip;

/// Patient and practice details for the case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseInfo {
    pub patient_name: String,
    pub doctor_id: Option<i64>,
    pub office_id: Option<i64>,
    pub case_number: Option<String>,
}

/// Client id → server id assignments recorded after submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdMap {
    pub case_id: Option<i64>,
    pub slips: BTreeMap<String, i64>,
    pub products: BTreeMap<String, i64>,
}

impl IdMap {
    pub fn slip(&self, client_id: &str) -> Option<i64> {
        self.slips.get(client_id).copied()
    }

    pub fn product(&self, client_id: &str) -> Option<i64> {
        self.products.get(client_id).copied()
    }
}

/// An in-progress case (mutable, pre-submission staging area).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseDraft {
    /// Unique draft ID
    pub draft_id: String,
    pub case: CaseInfo,
    pub slips: Vec<Slip>,
    /// Products added before slips existed
    #[serde(default)]
    pub unslipped_products: Vec<Product>,
    /// Set once the backend accepted the case
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub ids: IdMap,
    pub created_at: String,
    pub updated_at: String,
}

impl CaseDraft {
    pub fn new(case: CaseInfo) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            draft_id: uuid::Uuid::new_v4().to_string(),
            case,
            slips: Vec::new(),
            unslipped_products: Vec::new(),
            submitted: false,
            ids: IdMap::default(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// All products, slip products first.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.slips
            .iter()
            .flat_map(|slip| slip.products.iter())
            .chain(self.unslipped_products.iter())
    }

    pub fn products_mut(&mut self) -> impl Iterator<Item = &mut Product> {
        self.slips
            .iter_mut()
            .flat_map(|slip| slip.products.iter_mut())
            .chain(self.unslipped_products.iter_mut())
    }

    pub fn product_count(&self) -> usize {
        self.products().count()
    }

    pub fn note_count(&self) -> usize {
        self.slips.iter().map(|slip| slip.notes.len()).sum()
    }

    /// Check if any product has teeth selected.
    pub fn has_selected_teeth(&self) -> bool {
        self.products().any(|p| p.has_selected_teeth())
    }

    /// Check if any slip has products or notes.
    pub fn has_usable_slips(&self) -> bool {
        self.slips.iter().any(|slip| slip.has_content())
    }

    pub fn product(&self, client_id: &str) -> Option<&Product> {
        self.products().find(|p| p.client_id == client_id)
    }

    pub fn product_mut(&mut self, client_id: &str) -> Option<&mut Product> {
        self.products_mut().find(|p| p.client_id == client_id)
    }

    pub fn slip(&self, client_id: &str) -> Option<&Slip> {
        self.slips.iter().find(|s| s.client_id == client_id)
    }

    pub fn slip_mut(&mut self, client_id: &str) -> Option<&mut Slip> {
        self.slips.iter_mut().find(|s| s.client_id == client_id)
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArchType, Note};

    #[test]
    fn test_new_draft_is_empty() {
        let draft = CaseDraft::new(CaseInfo::default());
        assert_eq!(draft.draft_id.len(), 36);
        assert_eq!(draft.product_count(), 0);
        assert!(!draft.has_usable_slips());
        assert!(!draft.submitted);
    }

    #[test]
    fn test_products_include_unslipped() {
        let mut draft = CaseDraft::new(CaseInfo::default());
        let mut slip = Slip::new(None);
        slip.products.push(Product::new(1, "Crown".into(), ArchType::Maxillary));
        draft.slips.push(slip);
        draft
            .unslipped_products
            .push(Product::new(2, "Bridge".into(), ArchType::Mandibular));

        let names: Vec<&str> = draft.products().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Crown", "Bridge"]);
    }

    #[test]
    fn test_note_count_spans_slips() {
        let mut draft = CaseDraft::new(CaseInfo::default());
        for _ in 0..2 {
            let mut slip = Slip::new(None);
            slip.notes.push(Note::new("note".into(), None, None));
            draft.slips.push(slip);
        }
        assert_eq!(draft.note_count(), 2);
        assert!(draft.has_usable_slips());
    }

    #[test]
    fn test_draft_json_defaults() {
        let draft = CaseDraft::new(CaseInfo::default());
        let mut value = serde_json::to_value(&draft).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("unslipped_products");
        obj.remove("submitted");
        obj.remove("ids");

        let back: CaseDraft = serde_json::from_value(value).unwrap();
        assert!(back.unslipped_products.is_empty());
        assert!(!back.submitted);
    }
}

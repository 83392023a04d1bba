//! Case design state.
//!
//! `CaseDesign` is the only owner of in-progress case state. Views that need
//! teeth selections (form inputs, 3D viewers, the cache) read from it rather
//! than keeping their own copies.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    AddOn, Arch, ArchType, CaseDraft, CaseInfo, ExtractionKind, Impression, Note, Product,
    ProductConfiguration, RushRequest, Slip,
};

/// Errors from state handlers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DesignError {
    #[error("Case has already been submitted")]
    Submitted,

    #[error("Case submission is in progress")]
    SubmissionInFlight,

    #[error("Slip not found: {0}")]
    SlipNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Tooth {0} is not a valid tooth number")]
    InvalidTooth(u8),

    #[error("{product} is not made for the {arch} arch")]
    ArchNotDeclared { product: String, arch: &'static str },
}

pub type DesignResult<T> = Result<T, DesignError>;

/// A change to one arch configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigUpdate {
    Restoration(String),
    ProductName(String),
    Grade(String),
    Stage(String),
    /// Picking a brand clears the shade picked for the previous brand
    TeethShadeBrand(String),
    TeethShade(String),
    GumShadeBrand(String),
    GumShade(String),
    /// Quantity 0 removes the impression
    Impression { name: String, quantity: u32 },
    /// Quantity 0 removes the add-on
    AddOn { name: String, quantity: u32 },
}

/// Status of a tooth as drawn by the arch viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToothStatus {
    Selected,
    Extraction(ExtractionKind),
}

/// In-progress case with its UI flags.
#[derive(Debug, Clone)]
pub struct CaseDesign {
    draft: CaseDraft,
    submitting: bool,
    open_product: Option<String>,
}

impl CaseDesign {
    pub fn new(case: CaseInfo) -> Self {
        Self::from_draft(CaseDraft::new(case))
    }

    /// Wrap a draft restored from the cache.
    pub fn from_draft(draft: CaseDraft) -> Self {
        Self {
            draft,
            submitting: false,
            open_product: None,
        }
    }

    pub fn draft(&self) -> &CaseDraft {
        &self.draft
    }

    pub fn into_draft(self) -> CaseDraft {
        self.draft
    }

    pub fn is_submitted(&self) -> bool {
        self.draft.submitted
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Product whose accordion is expanded.
    pub fn open_product(&self) -> Option<&str> {
        self.open_product.as_deref()
    }

    pub fn set_open_product(&mut self, product_id: Option<String>) {
        self.open_product = product_id;
    }

    /// Start over with an empty case, clearing the submitted state.
    pub fn reset(&mut self, case: CaseInfo) {
        *self = Self::new(case);
    }

    // =========================================================================
    // Case and slips
    // =========================================================================

    pub fn set_case_info(&mut self, case: CaseInfo) -> DesignResult<()> {
        self.ensure_editable()?;
        self.draft.case = case;
        self.draft.touch();
        Ok(())
    }

    /// Add an empty slip. Returns its client id.
    pub fn add_slip(&mut self, location_id: Option<i64>) -> DesignResult<String> {
        self.ensure_editable()?;
        let slip = Slip::new(location_id);
        let id = slip.client_id.clone();
        self.draft.slips.push(slip);
        self.draft.touch();
        Ok(id)
    }

    pub fn remove_slip(&mut self, slip_id: &str) -> DesignResult<Slip> {
        self.ensure_editable()?;
        let pos = self
            .draft
            .slips
            .iter()
            .position(|s| s.client_id == slip_id)
            .ok_or_else(|| DesignError::SlipNotFound(slip_id.to_string()))?;
        let slip = self.draft.slips.remove(pos);
        if let Some(open) = &self.open_product {
            if slip.product(open).is_some() {
                self.open_product = None;
            }
        }
        self.draft.touch();
        Ok(slip)
    }

    pub fn set_slip_location(&mut self, slip_id: &str, location_id: Option<i64>) -> DesignResult<()> {
        self.ensure_editable()?;
        self.slip_mut(slip_id)?.location_id = location_id;
        self.draft.touch();
        Ok(())
    }

    /// Add a note (optionally a stage note). Returns the note id.
    pub fn add_note(
        &mut self,
        slip_id: &str,
        text: String,
        stage: Option<String>,
        author: Option<String>,
    ) -> DesignResult<String> {
        self.ensure_editable()?;
        let note = Note::new(text, stage, author);
        let id = note.client_id.clone();
        self.slip_mut(slip_id)?.notes.push(note);
        self.draft.touch();
        Ok(id)
    }

    pub fn remove_note(&mut self, slip_id: &str, note_id: &str) -> DesignResult<()> {
        self.ensure_editable()?;
        let slip = self.slip_mut(slip_id)?;
        let before = slip.notes.len();
        slip.notes.retain(|n| n.client_id != note_id);
        if slip.notes.len() == before {
            return Err(DesignError::NoteNotFound(note_id.to_string()));
        }
        self.draft.touch();
        Ok(())
    }

    pub fn request_rush(
        &mut self,
        slip_id: &str,
        requested_date: NaiveDate,
        reason: Option<String>,
    ) -> DesignResult<()> {
        self.ensure_editable()?;
        self.slip_mut(slip_id)?.rush = Some(RushRequest {
            requested_date,
            reason,
        });
        self.draft.touch();
        Ok(())
    }

    pub fn cancel_rush(&mut self, slip_id: &str) -> DesignResult<()> {
        self.ensure_editable()?;
        self.slip_mut(slip_id)?.rush = None;
        self.draft.touch();
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Add a product picked from the catalog. `None` adds it to the flat
    /// product list used before slips exist. Its accordion opens.
    pub fn add_product(
        &mut self,
        slip_id: Option<&str>,
        catalog_id: i64,
        name: String,
        arch_type: ArchType,
    ) -> DesignResult<String> {
        self.ensure_editable()?;
        let product = Product::new(catalog_id, name, arch_type);
        let id = product.client_id.clone();
        match slip_id {
            Some(slip_id) => self.slip_mut(slip_id)?.products.push(product),
            None => self.draft.unslipped_products.push(product),
        }
        self.open_product = Some(id.clone());
        self.draft.touch();
        Ok(id)
    }

    pub fn remove_product(&mut self, product_id: &str) -> DesignResult<Product> {
        self.ensure_editable()?;
        let removed = self
            .draft
            .slips
            .iter_mut()
            .map(|slip| &mut slip.products)
            .chain(std::iter::once(&mut self.draft.unslipped_products))
            .find_map(|products| {
                products
                    .iter()
                    .position(|p| p.client_id == product_id)
                    .map(|pos| products.remove(pos))
            })
            .ok_or_else(|| DesignError::ProductNotFound(product_id.to_string()))?;

        if self.open_product.as_deref() == Some(product_id) {
            self.open_product = None;
        }
        self.draft.touch();
        Ok(removed)
    }

    /// Apply a configuration change to one declared arch.
    pub fn update_configuration(
        &mut self,
        product_id: &str,
        arch: Arch,
        update: ConfigUpdate,
    ) -> DesignResult<()> {
        self.ensure_editable()?;
        let config = self.configuration_mut(product_id, arch)?;
        apply_update(config, update);
        self.draft.touch();
        Ok(())
    }

    /// Select a tooth for a product. The arch follows from the tooth number.
    pub fn select_tooth(&mut self, product_id: &str, tooth: u8) -> DesignResult<()> {
        self.ensure_editable()?;
        let arch = Arch::of_tooth(tooth).ok_or(DesignError::InvalidTooth(tooth))?;
        self.configuration_mut(product_id, arch)?.teeth.insert(tooth);
        self.draft.touch();
        Ok(())
    }

    pub fn deselect_tooth(&mut self, product_id: &str, tooth: u8) -> DesignResult<()> {
        self.ensure_editable()?;
        let arch = Arch::of_tooth(tooth).ok_or(DesignError::InvalidTooth(tooth))?;
        self.configuration_mut(product_id, arch)?.teeth.remove(&tooth);
        self.draft.touch();
        Ok(())
    }

    /// Put a tooth into an extraction kind, taking it out of any other kind.
    pub fn assign_extraction(
        &mut self,
        product_id: &str,
        kind: ExtractionKind,
        tooth: u8,
    ) -> DesignResult<()> {
        self.ensure_editable()?;
        let arch = Arch::of_tooth(tooth).ok_or(DesignError::InvalidTooth(tooth))?;
        self.configuration_mut(product_id, arch)?
            .extractions
            .assign(kind, tooth);
        self.draft.touch();
        Ok(())
    }

    /// Clear a tooth's extraction kind. Returns the kind it had.
    pub fn clear_extraction(
        &mut self,
        product_id: &str,
        tooth: u8,
    ) -> DesignResult<Option<ExtractionKind>> {
        self.ensure_editable()?;
        let arch = Arch::of_tooth(tooth).ok_or(DesignError::InvalidTooth(tooth))?;
        let previous = self
            .configuration_mut(product_id, arch)?
            .extractions
            .remove(tooth);
        self.draft.touch();
        Ok(previous)
    }

    /// Status of every marked tooth on an arch across all products.
    /// Extraction kinds win over plain selection.
    pub fn tooth_status(&self, arch: Arch) -> BTreeMap<u8, ToothStatus> {
        let mut status = BTreeMap::new();
        let configs = self
            .draft
            .products()
            .filter(|p| p.arch_type.includes(arch))
            .map(|p| p.configuration(arch));

        for config in configs {
            for tooth in &config.teeth {
                status.entry(*tooth).or_insert(ToothStatus::Selected);
            }
            for (kind, teeth) in config.extractions.iter() {
                for tooth in teeth {
                    status.insert(*tooth, ToothStatus::Extraction(kind));
                }
            }
        }
        status
    }

    // =========================================================================
    // Submission flags
    // =========================================================================

    /// Raise the in-flight flag. Fails if already submitted or in flight.
    pub fn begin_submission(&mut self) -> DesignResult<()> {
        self.ensure_editable()?;
        self.submitting = true;
        Ok(())
    }

    /// Lower the in-flight flag.
    pub fn end_submission(&mut self) {
        self.submitting = false;
    }

    /// Mutable draft access for applying submission results.
    pub(crate) fn draft_mut(&mut self) -> &mut CaseDraft {
        &mut self.draft
    }

    fn ensure_editable(&self) -> DesignResult<()> {
        if self.draft.submitted {
            return Err(DesignError::Submitted);
        }
        if self.submitting {
            return Err(DesignError::SubmissionInFlight);
        }
        Ok(())
    }

    fn slip_mut(&mut self, slip_id: &str) -> DesignResult<&mut Slip> {
        self.draft
            .slip_mut(slip_id)
            .ok_or_else(|| DesignError::SlipNotFound(slip_id.to_string()))
    }

    fn configuration_mut(
        &mut self,
        product_id: &str,
        arch: Arch,
    ) -> DesignResult<&mut ProductConfiguration> {
        let product = self
            .draft
            .product_mut(product_id)
            .ok_or_else(|| DesignError::ProductNotFound(product_id.to_string()))?;
        if !product.arch_type.includes(arch) {
            return Err(DesignError::ArchNotDeclared {
                product: product.name.clone(),
                arch: arch.label(),
            });
        }
        Ok(product.configuration_mut(arch))
    }
}

fn apply_update(config: &mut ProductConfiguration, update: ConfigUpdate) {
    match update {
        ConfigUpdate::Restoration(value) => config.restoration = Some(value),
        ConfigUpdate::ProductName(value) => config.product_name = Some(value),
        ConfigUpdate::Grade(value) => config.grade = Some(value),
        ConfigUpdate::Stage(value) => config.stage = Some(value),
        ConfigUpdate::TeethShadeBrand(value) => {
            if config.teeth_shade.brand.as_deref() != Some(value.as_str()) {
                config.teeth_shade.shade = None;
            }
            config.teeth_shade.brand = Some(value);
        }
        ConfigUpdate::TeethShade(value) => config.teeth_shade.shade = Some(value),
        ConfigUpdate::GumShadeBrand(value) => {
            if config.gum_shade.brand.as_deref() != Some(value.as_str()) {
                config.gum_shade.shade = None;
            }
            config.gum_shade.brand = Some(value);
        }
        ConfigUpdate::GumShade(value) => config.gum_shade.shade = Some(value),
        ConfigUpdate::Impression { name, quantity } => {
            config.impressions.retain(|imp| imp.name != name);
            if quantity > 0 {
                config.impressions.push(Impression { name, quantity });
            }
        }
        ConfigUpdate::AddOn { name, quantity } => {
            config.add_ons.retain(|add_on| add_on.name != name);
            if quantity > 0 {
                config.add_ons.push(AddOn { name, quantity });
            }
        }
    }
}

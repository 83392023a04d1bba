//! Mapping of in-memory case state to the backend request body.
//!
//! Pipeline: Validate → MapProduct (per declared arch) → BuildPayload

mod payload;
mod validator;

pub use payload::*;
pub use validator::*;

use crate::models::{Arch, CaseDraft, Note, Product, Slip, SlipStatus};
use crate::resolver::{is_placeholder, CatalogIndex, ResolveError, ShadeKind};

/// Maps products and slips to wire payloads using a catalog index.
pub struct CaseMapper<'a> {
    index: &'a CatalogIndex,
    default_location: Option<i64>,
}

impl<'a> CaseMapper<'a> {
    pub fn new(index: &'a CatalogIndex) -> Self {
        Self {
            index,
            default_location: None,
        }
    }

    /// Location used for slips that do not name one.
    pub fn with_default_location(mut self, location_id: Option<i64>) -> Self {
        self.default_location = location_id;
        self
    }

    /// Map one arch of a product. Every unresolved value is reported.
    pub fn map_product(&self, product: &Product, arch: Arch) -> Result<ProductPayload, Vec<String>> {
        let config = product.configuration(arch);
        let context = format!("{} ({})", product.name, arch.label());
        let mut errors = Vec::new();
        let mut report = |err: ResolveError| errors.push(format!("{context}: {err}"));

        let restoration = config
            .restoration
            .as_deref()
            .filter(|value| !is_placeholder(value))
            .map(|value| value.trim().to_string());

        let grade_id = self
            .index
            .resolve_grade(config.grade.as_deref().unwrap_or_default())
            .map_err(&mut report)
            .ok();
        let stage_id = self
            .index
            .resolve_stage(config.stage.as_deref().unwrap_or_default())
            .map_err(&mut report)
            .ok();
        let teeth_shade = self
            .index
            .resolve_shade(ShadeKind::Teeth, &config.teeth_shade)
            .map_err(&mut report)
            .ok();
        let gum_shade = self
            .index
            .resolve_shade(ShadeKind::Gum, &config.gum_shade)
            .map_err(&mut report)
            .ok();

        if restoration.is_none() {
            errors.push(format!("{context}: restoration is required"));
        }

        match (restoration, grade_id, stage_id, teeth_shade, gum_shade) {
            (Some(restoration), Some(grade_id), Some(stage_id), Some(teeth), Some(gum))
                if errors.is_empty() =>
            {
                Ok(ProductPayload {
                    client_ref: product.client_id.clone(),
                    product_id: product.catalog_id,
                    name: config
                        .product_name
                        .clone()
                        .filter(|name| !is_placeholder(name))
                        .unwrap_or_else(|| product.name.clone()),
                    arch: arch.wire_name().to_string(),
                    restoration,
                    grade_id,
                    stage_id,
                    teeth_shade_brand_id: teeth.brand_id,
                    teeth_shade_id: teeth.shade_id,
                    gum_shade_brand_id: gum.brand_id,
                    gum_shade_id: gum.shade_id,
                    teeth: config.teeth.iter().copied().collect(),
                    impressions: config
                        .impressions
                        .iter()
                        .filter(|imp| imp.quantity > 0 && !is_placeholder(&imp.name))
                        .map(|imp| ImpressionPayload {
                            name: imp.name.clone(),
                            quantity: imp.quantity,
                        })
                        .collect(),
                    extractions: config
                        .extractions
                        .iter()
                        .map(|(kind, teeth)| ExtractionPayload {
                            kind: kind.label().to_string(),
                            teeth: teeth.iter().copied().collect(),
                        })
                        .collect(),
                    add_ons: config
                        .add_ons
                        .iter()
                        .filter(|add_on| add_on.quantity > 0)
                        .map(|add_on| AddOnPayload {
                            name: add_on.name.clone(),
                            quantity: add_on.quantity,
                        })
                        .collect(),
                })
            }
            _ => Err(errors),
        }
    }

    /// Map one slip; products declaring both arches yield two entries.
    pub fn map_slip(&self, slip: &Slip) -> Result<SlipPayload, Vec<String>> {
        let (products, errors) = self.map_products(&slip.products);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SlipPayload {
            client_ref: slip.client_id.clone(),
            status: slip.status.as_str().to_string(),
            location_id: slip.location_id.or(self.default_location),
            products,
            notes: slip.notes.iter().map(note_payload).collect(),
            rush: slip.rush.as_ref().map(|rush| RushPayload {
                requested_date: rush.requested_date,
                reason: rush.reason.clone(),
            }),
        })
    }

    /// Build the full request body.
    ///
    /// Slips without products are skipped. When no slip has products, the
    /// legacy flat product list is sent as one implicit slip whose
    /// `client_ref` is the draft id.
    pub fn build_payload(&self, draft: &CaseDraft) -> Result<CasePayload, Vec<String>> {
        let mut slips = Vec::new();
        let mut errors = Vec::new();

        for slip in draft.slips.iter().filter(|slip| !slip.products.is_empty()) {
            match self.map_slip(slip) {
                Ok(payload) => slips.push(payload),
                Err(mut slip_errors) => errors.append(&mut slip_errors),
            }
        }

        if slips.is_empty() && errors.is_empty() && !draft.unslipped_products.is_empty() {
            let (products, mut product_errors) = self.map_products(&draft.unslipped_products);
            errors.append(&mut product_errors);
            slips.push(SlipPayload {
                client_ref: draft.draft_id.clone(),
                status: SlipStatus::default().as_str().to_string(),
                location_id: self.default_location,
                products,
                notes: Vec::new(),
                rush: None,
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        if slips.is_empty() {
            return Err(vec!["Add at least one product before submitting the case".to_string()]);
        }

        Ok(CasePayload {
            case: CasePart {
                patient_name: draft.case.patient_name.trim().to_string(),
                doctor_id: draft.case.doctor_id,
                office_id: draft.case.office_id,
                case_number: draft.case.case_number.clone(),
            },
            slips,
        })
    }

    fn map_products(&self, products: &[Product]) -> (Vec<ProductPayload>, Vec<String>) {
        let mut mapped = Vec::new();
        let mut errors = Vec::new();
        for product in products {
            for arch in product.arch_type.arches() {
                match self.map_product(product, *arch) {
                    Ok(payload) => mapped.push(payload),
                    Err(mut product_errors) => errors.append(&mut product_errors),
                }
            }
        }
        (mapped, errors)
    }
}

fn note_payload(note: &Note) -> NotePayload {
    NotePayload {
        text: note.text.clone(),
        stage: note.stage.clone(),
        author: note.author.clone(),
        created_at: note.created_at.clone(),
    }
}

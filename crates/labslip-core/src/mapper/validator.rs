//! Pre-submit completeness checks.

use std::fmt;

use crate::models::{Arch, CaseDraft, Product, ProductConfiguration, Slip};
use crate::resolver::{is_missing, is_placeholder};

/// A configuration field the backend refuses to accept empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Restoration,
    ProductName,
    Grade,
    Stage,
    TeethShadeBrand,
    TeethShade,
    GumShadeBrand,
    GumShade,
    Impression,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Restoration => "restoration",
            RequiredField::ProductName => "product name",
            RequiredField::Grade => "grade",
            RequiredField::Stage => "stage",
            RequiredField::TeethShadeBrand => "teeth shade brand",
            RequiredField::TeethShade => "teeth shade",
            RequiredField::GumShadeBrand => "gum shade brand",
            RequiredField::GumShade => "gum shade",
            RequiredField::Impression => "impression",
        }
    }
}

/// One missing field on one arch of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// 1-based slip position
    pub slip_number: usize,
    pub product_name: String,
    pub arch: Arch,
    pub field: RequiredField,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Slip {} - {} ({}): ",
            self.slip_number,
            self.product_name,
            self.arch.label()
        )?;
        match self.field {
            RequiredField::Impression => write!(f, "at least one impression is required"),
            field => write!(f, "{} is required", field.label()),
        }
    }
}

/// Fields missing from one arch configuration, in form order.
pub fn missing_fields(config: &ProductConfiguration) -> Vec<RequiredField> {
    let checks = [
        (RequiredField::Restoration, config.restoration.as_deref()),
        (RequiredField::ProductName, config.product_name.as_deref()),
        (RequiredField::Grade, config.grade.as_deref()),
        (RequiredField::Stage, config.stage.as_deref()),
        (RequiredField::TeethShadeBrand, config.teeth_shade.brand.as_deref()),
        (RequiredField::TeethShade, config.teeth_shade.shade.as_deref()),
        (RequiredField::GumShadeBrand, config.gum_shade.brand.as_deref()),
        (RequiredField::GumShade, config.gum_shade.shade.as_deref()),
    ];

    let mut missing: Vec<RequiredField> = checks
        .into_iter()
        .filter(|(_, value)| is_missing(*value))
        .map(|(field, _)| field)
        .collect();

    let has_impression = config
        .impressions
        .iter()
        .any(|imp| imp.quantity > 0 && !is_placeholder(&imp.name));
    if !has_impression {
        missing.push(RequiredField::Impression);
    }

    missing
}

/// Issues for a list of products belonging to one slip.
pub fn product_issues(slip_number: usize, products: &[Product]) -> Vec<ValidationIssue> {
    products
        .iter()
        .flat_map(|product| {
            product
                .active_configurations()
                .flat_map(move |(arch, config)| {
                    missing_fields(config)
                        .into_iter()
                        .map(move |field| ValidationIssue {
                            slip_number,
                            product_name: product.name.clone(),
                            arch,
                            field,
                        })
                })
        })
        .collect()
}

/// Check every product on every declared arch.
///
/// Problems are collected, not raised; an empty list means the slips can be mapped.
pub fn validate_slips(slips: &[Slip]) -> Vec<String> {
    slips
        .iter()
        .enumerate()
        .flat_map(|(pos, slip)| product_issues(pos + 1, &slip.products))
        .map(|issue| issue.to_string())
        .collect()
}

/// Validate a whole draft, including the legacy flat product list.
pub fn validate_draft(draft: &CaseDraft) -> Vec<String> {
    if draft.product_count() == 0 {
        return vec!["Add at least one product before submitting the case".to_string()];
    }

    let slips_have_products = draft.slips.iter().any(|slip| !slip.products.is_empty());
    if slips_have_products {
        // Leftover flat products would be dropped from the payload
        let mut errors = validate_slips(&draft.slips);
        errors.extend(draft.unslipped_products.iter().map(|product| {
            format!(
                "{} is not on a slip; add it to a slip or remove it",
                product.name
            )
        }));
        errors
    } else {
        product_issues(1, &draft.unslipped_products)
            .into_iter()
            .map(|issue| issue.to_string())
            .collect()
    }
}

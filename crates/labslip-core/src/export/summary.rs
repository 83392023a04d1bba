//! Printable slip summaries.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::models::{Arch, CaseDraft, Product, ProductConfiguration, Slip};

/// Summary of one slip for the print preview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlipSummary {
    /// 1-based slip position
    pub slip_number: usize,
    pub patient_name: String,
    pub case_number: Option<String>,
    pub status: String,
    pub location_id: Option<i64>,
    pub delivery_date: Option<String>,
    pub rush: Option<String>,
    pub lines: Vec<ProductLine>,
    pub notes: Vec<String>,
}

/// One arch of one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductLine {
    pub product: String,
    pub arch: String,
    pub restoration: Option<String>,
    pub grade: Option<String>,
    pub stage: Option<String>,
    pub teeth_shade: Option<String>,
    pub gum_shade: Option<String>,
    pub teeth: Vec<u8>,
    /// "Kind: 1, 2"
    pub extractions: Vec<String>,
    pub impressions: Vec<String>,
    pub add_ons: Vec<String>,
}

impl ProductLine {
    fn new(product: &Product, arch: Arch, config: &ProductConfiguration) -> Self {
        let shade = |brand: &Option<String>, shade: &Option<String>| match (brand, shade) {
            (Some(brand), Some(shade)) => Some(format!("{brand} {shade}")),
            (None, Some(shade)) => Some(shade.clone()),
            _ => None,
        };

        Self {
            product: config
                .product_name
                .clone()
                .unwrap_or_else(|| product.name.clone()),
            arch: arch.label().to_string(),
            restoration: config.restoration.clone(),
            grade: config.grade.clone(),
            stage: config.stage.clone(),
            teeth_shade: shade(&config.teeth_shade.brand, &config.teeth_shade.shade),
            gum_shade: shade(&config.gum_shade.brand, &config.gum_shade.shade),
            teeth: config.teeth.iter().copied().collect(),
            extractions: config
                .extractions
                .iter()
                .map(|(kind, teeth)| format!("{}: {}", kind.label(), join(teeth.iter())))
                .collect(),
            impressions: config
                .impressions
                .iter()
                .map(|imp| format!("{} x{}", imp.name, imp.quantity))
                .collect(),
            add_ons: config
                .add_ons
                .iter()
                .map(|add_on| format!("{} x{}", add_on.name, add_on.quantity))
                .collect(),
        }
    }
}

impl SlipSummary {
    pub fn from_slip(draft: &CaseDraft, slip_number: usize, slip: &Slip) -> Self {
        Self::build(draft, slip_number, Some(slip), &slip.products)
    }

    /// Summaries for every slip with content. Unslipped products form one
    /// extra slip.
    pub fn from_draft(draft: &CaseDraft) -> Vec<Self> {
        let mut summaries: Vec<Self> = draft
            .slips
            .iter()
            .filter(|slip| slip.has_content())
            .enumerate()
            .map(|(i, slip)| Self::from_slip(draft, i + 1, slip))
            .collect();

        if !draft.unslipped_products.is_empty() {
            let number = summaries.len() + 1;
            summaries.push(Self::build(draft, number, None, &draft.unslipped_products));
        }
        summaries
    }

    fn build(draft: &CaseDraft, slip_number: usize, slip: Option<&Slip>, products: &[Product]) -> Self {
        let lines = products
            .iter()
            .flat_map(|product| {
                product
                    .active_configurations()
                    .map(move |(arch, config)| ProductLine::new(product, arch, config))
            })
            .collect();

        Self {
            slip_number,
            patient_name: draft.case.patient_name.clone(),
            case_number: draft.case.case_number.clone(),
            status: slip.map(|s| s.status.as_str()).unwrap_or("draft").to_string(),
            location_id: slip.and_then(|s| s.location_id),
            delivery_date: slip.and_then(|s| s.delivery_date.clone()),
            rush: slip.and_then(|s| s.rush.as_ref()).map(|rush| match &rush.reason {
                Some(reason) => format!("{} ({})", rush.requested_date, reason),
                None => rush.requested_date.to_string(),
            }),
            lines,
            notes: slip
                .map(|s| {
                    s.notes
                        .iter()
                        .map(|note| match &note.stage {
                            Some(stage) => format!("[{}] {}", stage, note.text),
                            None => note.text.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Plain text for printing.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Slip {} - {}", self.slip_number, self.patient_name);
        if let Some(case_number) = &self.case_number {
            let _ = writeln!(out, "Case: {}", case_number);
        }
        let _ = writeln!(out, "Status: {}", self.status);
        if let Some(date) = &self.delivery_date {
            let _ = writeln!(out, "Delivery: {}", date);
        }
        if let Some(rush) = &self.rush {
            let _ = writeln!(out, "RUSH: {}", rush);
        }

        for line in &self.lines {
            let _ = writeln!(out);
            let _ = writeln!(out, "{} ({})", line.product, line.arch);
            let fields = [
                ("Restoration", line.restoration.as_deref()),
                ("Grade", line.grade.as_deref()),
                ("Stage", line.stage.as_deref()),
                ("Teeth shade", line.teeth_shade.as_deref()),
                ("Gum shade", line.gum_shade.as_deref()),
            ];
            for (label, value) in fields {
                let _ = writeln!(out, "  {}: {}", label, value.unwrap_or("-"));
            }
            if !line.teeth.is_empty() {
                let _ = writeln!(out, "  Teeth: {}", join(line.teeth.iter()));
            }
            for extraction in &line.extractions {
                let _ = writeln!(out, "  {}", extraction);
            }
            if !line.impressions.is_empty() {
                let _ = writeln!(out, "  Impressions: {}", line.impressions.join(", "));
            }
            if !line.add_ons.is_empty() {
                let _ = writeln!(out, "  Add-ons: {}", line.add_ons.join(", "));
            }
        }

        if !self.notes.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Notes:");
            for note in &self.notes {
                let _ = writeln!(out, "  - {}", note);
            }
        }
        out
    }
}

fn join<'a>(teeth: impl Iterator<Item = &'a u8>) -> String {
    teeth.map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArchType, CaseInfo, ExtractionKind, Impression, Note, ShadeSelection};

    fn draft() -> CaseDraft {
        let mut draft = CaseDraft::new(CaseInfo {
            patient_name: "Jane Doe".into(),
            case_number: Some("C-100".into()),
            ..CaseInfo::default()
        });
        let mut slip = Slip::new(Some(2));
        let mut product = Product::new(5, "Crown".into(), ArchType::Maxillary);
        let config = &mut product.maxillary;
        config.restoration = Some("Crown".into());
        config.teeth_shade = ShadeSelection::new("Vita", "A2");
        config.teeth.extend([8, 9]);
        config.extractions.assign_all(ExtractionKind::MissingTeeth, [7, 10]);
        config.impressions.push(Impression { name: "Scan".into(), quantity: 1 });
        slip.products.push(product);
        slip.notes.push(Note::new("Polish well".into(), Some("Finish".into()), None));
        draft.slips.push(slip);
        draft.slips.push(Slip::new(None));
        draft
    }

    #[test]
    fn test_from_draft_skips_empty_slips() {
        let summaries = SlipSummary::from_draft(&draft());
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].teeth_shade.as_deref(), Some("Vita A2"));
        assert_eq!(summary.lines[0].extractions, vec!["Missing teeth: 7, 10"]);
        assert_eq!(summary.notes, vec!["[Finish] Polish well"]);
    }

    #[test]
    fn test_unslipped_products_form_a_slip() {
        let mut draft = CaseDraft::new(CaseInfo::default());
        draft
            .unslipped_products
            .push(Product::new(1, "Bridge".into(), ArchType::Both));
        let summaries = SlipSummary::from_draft(&draft);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].status, "draft");
        assert_eq!(summaries[0].lines.len(), 2);
    }

    #[test]
    fn test_text_output() {
        let text = SlipSummary::from_draft(&draft())[0].to_text();
        assert!(text.starts_with("Slip 1 - Jane Doe\n"));
        assert!(text.contains("Case: C-100"));
        assert!(text.contains("Crown (Maxillary)"));
        assert!(text.contains("  Grade: -"));
        assert!(text.contains("  Teeth: 8, 9"));
        assert!(text.contains("  Impressions: Scan x1"));
    }
}

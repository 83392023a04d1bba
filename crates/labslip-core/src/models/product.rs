//! Product and per-arch configuration models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::arch::{Arch, ArchType};
use super::extraction::ExtractionSelection;

/// A prosthetic item on a slip, configured independently per arch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Local UUID - generated when the product is added, never parsed
    pub client_id: String,
    /// Catalog product this item was created from
    pub catalog_id: i64,
    /// Server ID - null until the case is submitted
    pub server_id: Option<i64>,
    /// Catalog product name
    pub name: String,
    /// Arches this product is made for
    pub arch_type: ArchType,
    /// Upper arch configuration
    pub maxillary: ProductConfiguration,
    /// Lower arch configuration
    pub mandibular: ProductConfiguration,
    /// Creation timestamp
    pub created_at: String,
}

impl Product {
    /// Create a product from a catalog selection.
    pub fn new(catalog_id: i64, name: String, arch_type: ArchType) -> Self {
        let mut product = Self {
            client_id: uuid::Uuid::new_v4().to_string(),
            catalog_id,
            server_id: None,
            name: name.clone(),
            arch_type,
            maxillary: ProductConfiguration::default(),
            mandibular: ProductConfiguration::default(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        for arch in arch_type.arches() {
            product.configuration_mut(*arch).product_name = Some(name.clone());
        }
        product
    }

    pub fn configuration(&self, arch: Arch) -> &ProductConfiguration {
        match arch {
            Arch::Maxillary => &self.maxillary,
            Arch::Mandibular => &self.mandibular,
        }
    }

    pub fn configuration_mut(&mut self, arch: Arch) -> &mut ProductConfiguration {
        match arch {
            Arch::Maxillary => &mut self.maxillary,
            Arch::Mandibular => &mut self.mandibular,
        }
    }

    /// Configurations for the arches this product declares.
    pub fn active_configurations(&self) -> impl Iterator<Item = (Arch, &ProductConfiguration)> {
        self.arch_type
            .arches()
            .iter()
            .map(move |arch| (*arch, self.configuration(*arch)))
    }

    /// Check if any declared arch has teeth selected.
    pub fn has_selected_teeth(&self) -> bool {
        self.active_configurations()
            .any(|(_, config)| !config.teeth.is_empty())
    }
}

/// Shade picked from a two-level catalog (brand, then shade).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShadeSelection {
    /// Brand as presented: id, name or display string
    pub brand: Option<String>,
    /// Shade as presented: id, name or display string
    pub shade: Option<String>,
}

impl ShadeSelection {
    pub fn new(brand: &str, shade: &str) -> Self {
        Self {
            brand: Some(brand.to_string()),
            shade: Some(shade.to_string()),
        }
    }
}

/// An impression sent with the case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Impression {
    pub name: String,
    pub quantity: u32,
}

/// An add-on requested for one arch of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddOn {
    pub name: String,
    pub quantity: u32,
}

/// Everything the backend needs for one arch of a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductConfiguration {
    /// Restoration type (e.g., "Crown", "Bridge")
    pub restoration: Option<String>,
    /// Product name as shown in the form
    pub product_name: Option<String>,
    /// Grade (id or name)
    pub grade: Option<String>,
    /// Stage (id or name)
    pub stage: Option<String>,
    pub teeth_shade: ShadeSelection,
    pub gum_shade: ShadeSelection,
    pub impressions: Vec<Impression>,
    pub add_ons: Vec<AddOn>,
    /// Teeth selected for this product
    pub teeth: BTreeSet<u8>,
    pub extractions: ExtractionSelection,
}

impl ProductConfiguration {
    /// Check if teeth selections or extractions were recorded.
    pub fn has_selections(&self) -> bool {
        !self.teeth.is_empty() || !self.extractions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_prefills_declared_arches() {
        let product = Product::new(42, "Zirconia Crown".into(), ArchType::Maxillary);

        assert_eq!(product.client_id.len(), 36);
        assert_eq!(product.maxillary.product_name.as_deref(), Some("Zirconia Crown"));
        assert_eq!(product.mandibular.product_name, None);
        assert!(product.server_id.is_none());
    }

    #[test]
    fn test_client_ids_are_unique() {
        let a = Product::new(42, "Crown".into(), ArchType::Both);
        let b = Product::new(42, "Crown".into(), ArchType::Both);
        assert_ne!(a.client_id, b.client_id);
    }

    #[test]
    fn test_active_configurations_follow_arch_type() {
        let product = Product::new(1, "Denture".into(), ArchType::Both);
        let arches: Vec<Arch> = product.active_configurations().map(|(a, _)| a).collect();
        assert_eq!(arches, vec![Arch::Maxillary, Arch::Mandibular]);
    }

    #[test]
    fn test_has_selected_teeth() {
        let mut product = Product::new(1, "Crown".into(), ArchType::Mandibular);
        assert!(!product.has_selected_teeth());

        // Teeth on an undeclared arch do not count
        product.maxillary.teeth.insert(3);
        assert!(!product.has_selected_teeth());

        product.mandibular.teeth.insert(19);
        assert!(product.has_selected_teeth());
    }
}

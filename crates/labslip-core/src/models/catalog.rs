//! Lookup catalogs fetched from the backend.

use serde::{Deserialize, Serialize};

/// Anything that can be looked up by numeric id or display name.
pub trait CatalogEntry {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

/// A specific color value within a shade brand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shade {
    pub id: i64,
    pub name: String,
}

/// A shade system (manufacturer) with its shades.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShadeBrand {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub shades: Vec<Shade>,
}

/// Product grade (e.g., "Economy", "Premium").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grade {
    pub id: i64,
    pub name: String,
}

/// Production stage (e.g., "Try-in", "Finish").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stage {
    pub id: i64,
    pub name: String,
}

macro_rules! catalog_entry {
    ($($ty:ty),*) => {
        $(impl CatalogEntry for $ty {
            fn id(&self) -> i64 {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

catalog_entry!(Shade, ShadeBrand, Grade, Stage);

/// Everything fetched from the lookup endpoints for one case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    #[serde(default)]
    pub teeth_shade_brands: Vec<ShadeBrand>,
    #[serde(default)]
    pub gum_shade_brands: Vec<ShadeBrand>,
    #[serde(default)]
    pub grades: Vec<Grade>,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Catalog {
    /// Parse the combined lookup response.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

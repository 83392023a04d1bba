//! Catalog index used when mapping configurations to backend ids.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Catalog, Grade, Shade, ShadeBrand, ShadeSelection, Stage};

use super::matcher::{Lookup, MatchMethod};
use super::normalizer::is_missing;
use super::{ResolveError, ResolveResult};

/// What to do when a brand resolves but none of its shades do.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShadeFallback {
    /// Report the shade as unknown
    #[default]
    Reject,
    /// Send `brand_id * 10 + 1` as the shade id (legacy backend behaviour)
    SynthesizeFromBrand,
}

/// Teeth or gum shade catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeKind {
    Teeth,
    Gum,
}

impl ShadeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ShadeKind::Teeth => "teeth shade",
            ShadeKind::Gum => "gum shade",
        }
    }
}

/// Backend ids for a shade selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedShade {
    pub brand_id: i64,
    pub shade_id: i64,
    /// Shade id was made up from the brand id
    pub synthesized: bool,
}

/// Shade brands with a lookup per brand for their shades.
#[derive(Debug, Clone)]
struct ShadeCatalog {
    brands: Lookup<ShadeBrand>,
    shades: Vec<Lookup<Shade>>,
}

impl ShadeCatalog {
    fn new(brands: Vec<ShadeBrand>) -> Self {
        let shades = brands
            .iter()
            .map(|brand| Lookup::new(brand.shades.clone()))
            .collect();
        Self {
            brands: Lookup::new(brands),
            shades,
        }
    }

    fn position(&self, brand_id: i64) -> Option<usize> {
        self.brands
            .entries()
            .iter()
            .position(|brand| brand.id == brand_id)
    }
}

/// Name-to-id resolution built once per catalog fetch.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    teeth: ShadeCatalog,
    gum: ShadeCatalog,
    grades: Lookup<Grade>,
    stages: Lookup<Stage>,
    fallback: ShadeFallback,
}

impl CatalogIndex {
    pub fn new(catalog: Catalog, fallback: ShadeFallback) -> Self {
        Self {
            teeth: ShadeCatalog::new(catalog.teeth_shade_brands),
            gum: ShadeCatalog::new(catalog.gum_shade_brands),
            grades: Lookup::new(catalog.grades),
            stages: Lookup::new(catalog.stages),
            fallback,
        }
    }

    pub fn fallback(&self) -> ShadeFallback {
        self.fallback
    }

    /// Resolve a grade value to its id.
    pub fn resolve_grade(&self, value: &str) -> ResolveResult<i64> {
        self.grades
            .find(value)
            .map(|m| m.entry.id)
            .ok_or_else(|| ResolveError::UnknownGrade(value.to_string()))
    }

    /// Resolve a stage value to its id.
    pub fn resolve_stage(&self, value: &str) -> ResolveResult<i64> {
        self.stages
            .find(value)
            .map(|m| m.entry.id)
            .ok_or_else(|| ResolveError::UnknownStage(value.to_string()))
    }

    /// Resolve a brand + shade pair to backend ids.
    pub fn resolve_shade(
        &self,
        kind: ShadeKind,
        selection: &ShadeSelection,
    ) -> ResolveResult<ResolvedShade> {
        let catalog = match kind {
            ShadeKind::Teeth => &self.teeth,
            ShadeKind::Gum => &self.gum,
        };

        let brand_value = selection.brand.as_deref().unwrap_or_default();
        let shade_value = selection.shade.as_deref().unwrap_or_default();
        if is_missing(selection.brand.as_deref()) || is_missing(selection.shade.as_deref()) {
            return Err(ResolveError::MissingShade(kind.label()));
        }

        let Some(brand) = catalog.brands.find(brand_value) else {
            // Brand text may be stale; a shade unique to one brand still identifies both
            return self.resolve_by_shade_only(catalog, kind, brand_value, shade_value);
        };
        let brand_id = brand.entry.id;

        let shade = catalog
            .position(brand_id)
            .and_then(|pos| catalog.shades[pos].find(shade_value));

        match shade {
            Some(shade) => Ok(ResolvedShade {
                brand_id,
                shade_id: shade.entry.id,
                synthesized: false,
            }),
            None => match self.fallback {
                ShadeFallback::SynthesizeFromBrand => {
                    let shade_id = brand_id * 10 + 1;
                    warn!(
                        "Synthesized {} id {} for shade '{}' of brand {}",
                        kind.label(),
                        shade_id,
                        shade_value,
                        brand_id
                    );
                    Ok(ResolvedShade {
                        brand_id,
                        shade_id,
                        synthesized: true,
                    })
                }
                ShadeFallback::Reject => Err(ResolveError::UnknownShade {
                    kind: kind.label(),
                    brand: brand.entry.name.clone(),
                    shade: shade_value.to_string(),
                }),
            },
        }
    }

    fn resolve_by_shade_only(
        &self,
        catalog: &ShadeCatalog,
        kind: ShadeKind,
        brand_value: &str,
        shade_value: &str,
    ) -> ResolveResult<ResolvedShade> {
        let hits: Vec<(i64, i64, MatchMethod)> = catalog
            .brands
            .entries()
            .iter()
            .zip(catalog.shades.iter())
            .filter_map(|(brand, shades)| {
                shades
                    .find(shade_value)
                    .map(|m| (brand.id, m.entry.id, m.method))
            })
            .collect();

        match hits.as_slice() {
            [(brand_id, shade_id, method)] => {
                debug!(
                    "Resolved {} '{}' by shade alone ({:?}), brand '{}' ignored",
                    kind.label(),
                    shade_value,
                    method,
                    brand_value
                );
                Ok(ResolvedShade {
                    brand_id: *brand_id,
                    shade_id: *shade_id,
                    synthesized: false,
                })
            }
            _ => Err(ResolveError::UnknownBrand {
                kind: kind.label(),
                brand: brand_value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog {
            teeth_shade_brands: vec![
                ShadeBrand {
                    id: 1,
                    name: "Vita Classic".into(),
                    shades: vec![
                        Shade { id: 11, name: "A1".into() },
                        Shade { id: 12, name: "A2".into() },
                    ],
                },
                ShadeBrand {
                    id: 2,
                    name: "Vita 3D-Master".into(),
                    shades: vec![Shade { id: 21, name: "2M2".into() }],
                },
            ],
            gum_shade_brands: vec![ShadeBrand {
                id: 5,
                name: "Ivoclar Gingiva".into(),
                shades: vec![Shade { id: 55, name: "Light Pink".into() }],
            }],
            grades: vec![Grade { id: 3, name: "Premium".into() }],
            stages: vec![Stage { id: 9, name: "Finish".into() }],
        }
    }

    fn index(fallback: ShadeFallback) -> CatalogIndex {
        CatalogIndex::new(catalog(), fallback)
    }

    #[test]
    fn test_resolve_shade_by_names() {
        let resolved = index(ShadeFallback::Reject)
            .resolve_shade(ShadeKind::Teeth, &ShadeSelection::new("Vita Classic", "A2"))
            .unwrap();
        assert_eq!(resolved, ResolvedShade { brand_id: 1, shade_id: 12, synthesized: false });
    }

    #[test]
    fn test_brand_numeric_id_wins() {
        // "2" is treated as the id of Vita 3D-Master, not as a name
        let resolved = index(ShadeFallback::Reject)
            .resolve_shade(ShadeKind::Teeth, &ShadeSelection::new("2", "2M2"))
            .unwrap();
        assert_eq!(resolved.brand_id, 2);
        assert_eq!(resolved.shade_id, 21);
    }

    #[test]
    fn test_composite_display_string() {
        let resolved = index(ShadeFallback::Reject)
            .resolve_shade(ShadeKind::Gum, &ShadeSelection::new("Ivoclar Gingiva (Gum)", "light-pink"))
            .unwrap();
        assert_eq!(resolved.brand_id, 5);
        assert_eq!(resolved.shade_id, 55);
    }

    #[test]
    fn test_unknown_brand_resolved_by_unique_shade() {
        let resolved = index(ShadeFallback::Reject)
            .resolve_shade(ShadeKind::Teeth, &ShadeSelection::new("Old Vita", "2M2"))
            .unwrap();
        assert_eq!(resolved.brand_id, 2);
        assert_eq!(resolved.shade_id, 21);
    }

    #[test]
    fn test_unknown_shade_rejected_by_default() {
        let err = index(ShadeFallback::Reject)
            .resolve_shade(ShadeKind::Teeth, &ShadeSelection::new("Vita Classic", "Z9"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownShade { .. }));
    }

    #[test]
    fn test_unknown_shade_synthesized_when_enabled() {
        let resolved = index(ShadeFallback::SynthesizeFromBrand)
            .resolve_shade(ShadeKind::Gum, &ShadeSelection::new("Ivoclar Gingiva", "Z9"))
            .unwrap();
        assert_eq!(resolved.brand_id, 5);
        assert_eq!(resolved.shade_id, 51);
        assert!(resolved.synthesized);
    }

    #[test]
    fn test_missing_shade() {
        let err = index(ShadeFallback::Reject)
            .resolve_shade(ShadeKind::Teeth, &ShadeSelection::default())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingShade("teeth shade")));
    }

    #[test]
    fn test_grade_and_stage() {
        let index = index(ShadeFallback::Reject);
        assert_eq!(index.resolve_grade("premium").unwrap(), 3);
        assert_eq!(index.resolve_grade("3").unwrap(), 3);
        assert_eq!(index.resolve_stage("Finish").unwrap(), 9);
        assert!(index.resolve_stage("Wax rim").is_err());
    }
}

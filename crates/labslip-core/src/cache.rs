//! Local cache synchronizer.
//!
//! Keeps the in-progress case in the local database so a reload restores it.
//! Drafts are only written once they hold a product or a selected tooth, so
//! an untouched form never replaces a useful cached draft.

use tracing::{debug, info};

use crate::db::{Database, DbResult, ProductSelections};
use crate::design::CaseDesign;
use crate::models::CaseDraft;

/// Result of restoring cached state on mount.
#[derive(Debug)]
pub enum Rehydration {
    /// Nothing cached
    Fresh,
    /// Cached draft has nothing worth showing; go back to product selection
    Redirect { draft_id: String },
    /// Cached draft restored, with the product whose accordion opens
    Restored {
        design: CaseDesign,
        open_product: Option<String>,
    },
}

/// Persists and restores case state.
pub struct CacheSync<'a> {
    db: &'a Database,
}

impl<'a> CacheSync<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Write the draft and its per-product selections. Returns whether
    /// anything was written.
    pub fn persist(&self, design: &CaseDesign) -> DbResult<bool> {
        let draft = design.draft();
        if draft.submitted {
            return Ok(false);
        }
        if draft.product_count() == 0 && !draft.has_selected_teeth() {
            debug!("Skipping cache write for empty draft {}", draft.draft_id);
            return Ok(false);
        }

        self.db.save_case_draft(draft)?;
        for product in draft.products() {
            self.db
                .save_product_selections(&ProductSelections::from_product(&draft.draft_id, product))?;
        }
        let live: Vec<&str> = draft.products().map(|p| p.client_id.as_str()).collect();
        let pruned = self.db.prune_selections(&draft.draft_id, &live)?;
        if pruned > 0 {
            debug!("Pruned {} selection rows of removed products", pruned);
        }
        debug!(
            "Cached draft {} ({} products)",
            draft.draft_id,
            draft.product_count()
        );
        Ok(true)
    }

    /// Restore the most recent unsubmitted draft.
    pub fn rehydrate(&self) -> DbResult<Rehydration> {
        let Some(mut draft) = self.db.latest_case_draft()? else {
            return Ok(Rehydration::Fresh);
        };

        if draft.product_count() == 0 && draft.note_count() == 0 && !draft.has_usable_slips() {
            info!("Cached draft {} is empty, redirecting", draft.draft_id);
            return Ok(Rehydration::Redirect {
                draft_id: draft.draft_id,
            });
        }

        let restored = self.reconcile_selections(&mut draft)?;
        if restored > 0 {
            info!("Restored selections for {} product arches", restored);
        }

        let open_product = draft.products().next().map(|p| p.client_id.clone());
        let mut design = CaseDesign::from_draft(draft);
        design.set_open_product(open_product.clone());

        Ok(Rehydration::Restored {
            design,
            open_product,
        })
    }

    /// Drop the cached draft and its selections.
    pub fn clear(&self, draft_id: &str) -> DbResult<()> {
        self.db.delete_case_draft(draft_id)?;
        let removed = self.db.delete_selections_for_draft(draft_id)?;
        debug!("Cleared draft {} ({} selection rows)", draft_id, removed);
        Ok(())
    }

    /// Fill arches that lost their teeth and extractions from the stored
    /// selections. A product's own row always wins, even when empty. Only a
    /// product with no row borrows from its catalog product, and never from
    /// a row owned by another product still in the draft.
    fn reconcile_selections(&self, draft: &mut CaseDraft) -> DbResult<usize> {
        let draft_id = draft.draft_id.clone();
        let live_ids: Vec<String> = draft.products().map(|p| p.client_id.clone()).collect();
        let live: Vec<&str> = live_ids.iter().map(String::as_str).collect();
        let mut restored = 0;

        for product in draft.products_mut() {
            let missing: Vec<_> = product
                .active_configurations()
                .filter(|(_, config)| !config.has_selections())
                .map(|(arch, _)| arch)
                .collect();
            if missing.is_empty() {
                continue;
            }

            let stored = match self.db.get_product_selections(&product.client_id)? {
                Some(own) => own,
                None => match self.db.latest_selections_for_catalog(
                    &draft_id,
                    product.catalog_id,
                    &live,
                )? {
                    Some(orphan) => orphan,
                    None => continue,
                },
            };

            for arch in missing {
                let selection = stored.arch(arch);
                if selection.is_empty() {
                    continue;
                }
                let config = product.configuration_mut(arch);
                config.teeth = selection.teeth.clone();
                config.extractions = selection.extractions.clone();
                restored += 1;
            }
        }
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Arch, ArchType, CaseInfo, ExtractionKind};

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_empty_draft_not_persisted() {
        let db = db();
        let cache = CacheSync::new(&db);
        let mut design = CaseDesign::new(CaseInfo::default());
        design.add_slip(None).unwrap();

        assert!(!cache.persist(&design).unwrap());
        assert!(matches!(cache.rehydrate().unwrap(), Rehydration::Fresh));
    }

    #[test]
    fn test_restore_opens_first_product() {
        let db = db();
        let cache = CacheSync::new(&db);
        let mut design = CaseDesign::new(CaseInfo::default());
        let slip = design.add_slip(Some(1)).unwrap();
        let first = design
            .add_product(Some(&slip), 1, "Crown".into(), ArchType::Maxillary)
            .unwrap();
        design
            .add_product(Some(&slip), 2, "Bridge".into(), ArchType::Mandibular)
            .unwrap();
        assert!(cache.persist(&design).unwrap());

        match cache.rehydrate().unwrap() {
            Rehydration::Restored {
                design: restored,
                open_product,
            } => {
                assert_eq!(open_product.as_deref(), Some(first.as_str()));
                assert_eq!(restored.open_product(), Some(first.as_str()));
                assert_eq!(restored.draft().product_count(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_redirect_when_draft_has_no_content() {
        let db = db();
        let mut draft = CaseDraft::new(CaseInfo::default());
        draft.slips.push(crate::models::Slip::new(None));
        db.save_case_draft(&draft).unwrap();

        match CacheSync::new(&db).rehydrate().unwrap() {
            Rehydration::Redirect { draft_id } => assert_eq!(draft_id, draft.draft_id),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_reconcile_by_client_id() {
        let db = db();
        let cache = CacheSync::new(&db);
        let mut design = CaseDesign::new(CaseInfo::default());
        let product = design
            .add_product(None, 7, "Crown".into(), ArchType::Maxillary)
            .unwrap();
        design.select_tooth(&product, 3).unwrap();
        design
            .assign_extraction(&product, ExtractionKind::MissingTeeth, 4)
            .unwrap();
        cache.persist(&design).unwrap();

        // Draft row written without its teeth
        let mut stripped = design.draft().clone();
        let config = stripped.product_mut(&product).unwrap().configuration_mut(Arch::Maxillary);
        config.teeth.clear();
        config.extractions = Default::default();
        db.save_case_draft(&stripped).unwrap();

        let Rehydration::Restored { design, .. } = cache.rehydrate().unwrap() else {
            panic!("expected restore");
        };
        let config = design.draft().product(&product).unwrap().configuration(Arch::Maxillary);
        assert!(config.teeth.contains(&3));
        assert_eq!(config.extractions.kind_of(4), Some(ExtractionKind::MissingTeeth));
    }

    #[test]
    fn test_reconcile_by_catalog_id() {
        let db = db();
        let cache = CacheSync::new(&db);
        let mut design = CaseDesign::new(CaseInfo::default());
        let old = design
            .add_product(None, 7, "Crown".into(), ArchType::Mandibular)
            .unwrap();
        design.select_tooth(&old, 19).unwrap();
        cache.persist(&design).unwrap();

        // Draft row rewritten with the product under a new client id and no
        // selection row of its own
        let mut rekeyed = design.draft().clone();
        let product = rekeyed.product_mut(&old).unwrap();
        product.client_id = uuid::Uuid::new_v4().to_string();
        product.configuration_mut(Arch::Mandibular).teeth.clear();
        let new = product.client_id.clone();
        db.save_case_draft(&rekeyed).unwrap();

        let Rehydration::Restored { design, .. } = cache.rehydrate().unwrap() else {
            panic!("expected restore");
        };
        let config = design.draft().product(&new).unwrap().configuration(Arch::Mandibular);
        assert_eq!(config.teeth.iter().copied().collect::<Vec<_>>(), vec![19]);
    }

    #[test]
    fn test_sibling_teeth_not_copied() {
        let db = db();
        let cache = CacheSync::new(&db);
        let mut design = CaseDesign::new(CaseInfo::default());
        let first = design
            .add_product(None, 7, "Crown".into(), ArchType::Maxillary)
            .unwrap();
        let second = design
            .add_product(None, 7, "Crown".into(), ArchType::Maxillary)
            .unwrap();
        design.select_tooth(&first, 3).unwrap();
        cache.persist(&design).unwrap();

        let Rehydration::Restored { design, .. } = cache.rehydrate().unwrap() else {
            panic!("expected restore");
        };
        let draft = design.draft();
        assert!(draft.product(&first).unwrap().configuration(Arch::Maxillary).teeth.contains(&3));
        assert!(draft.product(&second).unwrap().configuration(Arch::Maxillary).teeth.is_empty());
    }

    #[test]
    fn test_removed_product_selections_pruned() {
        let db = db();
        let cache = CacheSync::new(&db);
        let mut design = CaseDesign::new(CaseInfo::default());
        let old = design
            .add_product(None, 7, "Crown".into(), ArchType::Mandibular)
            .unwrap();
        design.select_tooth(&old, 19).unwrap();
        cache.persist(&design).unwrap();

        design.remove_product(&old).unwrap();
        let new = design
            .add_product(None, 7, "Crown".into(), ArchType::Mandibular)
            .unwrap();
        cache.persist(&design).unwrap();
        assert!(db.get_product_selections(&old).unwrap().is_none());

        let Rehydration::Restored { design, .. } = cache.rehydrate().unwrap() else {
            panic!("expected restore");
        };
        let config = design.draft().product(&new).unwrap().configuration(Arch::Mandibular);
        assert!(config.teeth.is_empty());
    }

    #[test]
    fn test_clear() {
        let db = db();
        let cache = CacheSync::new(&db);
        let mut design = CaseDesign::new(CaseInfo::default());
        design
            .add_product(None, 7, "Crown".into(), ArchType::Maxillary)
            .unwrap();
        cache.persist(&design).unwrap();

        cache.clear(&design.draft().draft_id).unwrap();
        assert!(matches!(cache.rehydrate().unwrap(), Rehydration::Fresh));
    }
}

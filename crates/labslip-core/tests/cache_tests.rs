//! Cache persistence across reopened databases.

use labslip_core::cache::{CacheSync, Rehydration};
use labslip_core::db::Database;
use labslip_core::design::{CaseDesign, ToothStatus};
use labslip_core::models::{Arch, ArchType, CaseInfo, ExtractionKind};
use tempfile::tempdir;

#[test]
fn test_draft_survives_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("labslip.db");

    let (product, slip) = {
        let db = Database::open(&path).unwrap();
        let mut design = CaseDesign::new(CaseInfo {
            patient_name: "Jane Doe".into(),
            ..CaseInfo::default()
        });
        let slip = design.add_slip(Some(4)).unwrap();
        let product = design
            .add_product(Some(&slip), 9, "Partial".into(), ArchType::Mandibular)
            .unwrap();
        design.select_tooth(&product, 20).unwrap();
        design
            .assign_extraction(&product, ExtractionKind::ClaspOnTeeth, 21)
            .unwrap();
        design
            .add_note(&slip, "Clasp on 21".into(), Some("Framework".into()), None)
            .unwrap();
        assert!(CacheSync::new(&db).persist(&design).unwrap());
        (product, slip)
    };

    let db = Database::open(&path).unwrap();
    let Rehydration::Restored {
        design,
        open_product,
    } = CacheSync::new(&db).rehydrate().unwrap()
    else {
        panic!("expected restored draft");
    };

    assert_eq!(open_product.as_deref(), Some(product.as_str()));
    assert_eq!(design.draft().case.patient_name, "Jane Doe");
    assert_eq!(design.draft().slip(&slip).unwrap().notes.len(), 1);

    let lower = design.tooth_status(Arch::Mandibular);
    assert_eq!(lower.get(&20), Some(&ToothStatus::Selected));
    assert_eq!(
        lower.get(&21),
        Some(&ToothStatus::Extraction(ExtractionKind::ClaspOnTeeth))
    );
}

#[test]
fn test_teeth_only_draft_is_kept() {
    let db = Database::open_in_memory().unwrap();
    let cache = CacheSync::new(&db);
    let mut design = CaseDesign::new(CaseInfo::default());
    let product = design
        .add_product(None, 1, "Crown".into(), ArchType::Maxillary)
        .unwrap();
    design.select_tooth(&product, 5).unwrap();
    assert!(cache.persist(&design).unwrap());

    // Removing the product leaves nothing worth caching
    design.remove_product(&product).unwrap();
    assert!(!cache.persist(&design).unwrap());

    // The earlier write is still there
    assert!(matches!(
        cache.rehydrate().unwrap(),
        Rehydration::Restored { .. }
    ));
}

#[test]
fn test_notes_only_draft_is_restored() {
    let db = Database::open_in_memory().unwrap();
    let mut design = CaseDesign::new(CaseInfo::default());
    let slip = design.add_slip(None).unwrap();
    design.add_note(&slip, "Call office".into(), None, None).unwrap();

    // Notes alone do not trigger a write
    assert!(!CacheSync::new(&db).persist(&design).unwrap());

    // A draft saved elsewhere with notes only is still restored
    db.save_case_draft(design.draft()).unwrap();
    match CacheSync::new(&db).rehydrate().unwrap() {
        Rehydration::Restored { open_product, .. } => assert_eq!(open_product, None),
        other => panic!("unexpected {:?}", other),
    }
}

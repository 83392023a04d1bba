//! Extraction (tooth status) selections.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Categorical status a tooth can be given on a slip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionKind {
    TeethInMouth,
    MissingTeeth,
    WillExtractOnDelivery,
    HasBeenExtracted,
    FixOrAdd,
    ClaspOnTeeth,
    Prepped,
    Implant,
}

impl ExtractionKind {
    pub const ALL: [ExtractionKind; 8] = [
        ExtractionKind::TeethInMouth,
        ExtractionKind::MissingTeeth,
        ExtractionKind::WillExtractOnDelivery,
        ExtractionKind::HasBeenExtracted,
        ExtractionKind::FixOrAdd,
        ExtractionKind::ClaspOnTeeth,
        ExtractionKind::Prepped,
        ExtractionKind::Implant,
    ];

    /// Label as shown in the extraction picker.
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionKind::TeethInMouth => "Teeth in mouth",
            ExtractionKind::MissingTeeth => "Missing teeth",
            ExtractionKind::WillExtractOnDelivery => "Will extract on delivery",
            ExtractionKind::HasBeenExtracted => "Has been extracted",
            ExtractionKind::FixOrAdd => "Fix or add",
            ExtractionKind::ClaspOnTeeth => "Clasp on teeth",
            ExtractionKind::Prepped => "Prepped",
            ExtractionKind::Implant => "Implant",
        }
    }

    /// Find a kind by its picker label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().to_lowercase() == wanted)
    }
}

/// Teeth grouped by extraction kind for one arch.
///
/// A tooth belongs to at most one kind at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionSelection {
    categories: BTreeMap<ExtractionKind, BTreeSet<u8>>,
}

impl ExtractionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a tooth into a kind, removing it from every other kind.
    pub fn assign(&mut self, kind: ExtractionKind, tooth: u8) {
        self.remove(tooth);
        self.categories.entry(kind).or_default().insert(tooth);
    }

    /// Assign several teeth to the same kind.
    pub fn assign_all<I: IntoIterator<Item = u8>>(&mut self, kind: ExtractionKind, teeth: I) {
        for tooth in teeth {
            self.assign(kind, tooth);
        }
    }

    /// Clear a tooth from whatever kind holds it. Returns the previous kind.
    pub fn remove(&mut self, tooth: u8) -> Option<ExtractionKind> {
        let previous = self.kind_of(tooth);
        if let Some(kind) = previous {
            if let Some(teeth) = self.categories.get_mut(&kind) {
                teeth.remove(&tooth);
                if teeth.is_empty() {
                    self.categories.remove(&kind);
                }
            }
        }
        previous
    }

    /// Kind currently holding a tooth.
    pub fn kind_of(&self, tooth: u8) -> Option<ExtractionKind> {
        self.categories
            .iter()
            .find(|(_, teeth)| teeth.contains(&tooth))
            .map(|(kind, _)| *kind)
    }

    /// Teeth assigned to a kind.
    pub fn teeth(&self, kind: ExtractionKind) -> Vec<u8> {
        self.categories
            .get(&kind)
            .map(|teeth| teeth.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Non-empty kinds with their teeth, in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ExtractionKind, &BTreeSet<u8>)> {
        self.categories.iter().map(|(kind, teeth)| (*kind, teeth))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(|teeth| teeth.is_empty())
    }

    /// Total number of categorized teeth.
    pub fn len(&self) -> usize {
        self.categories.values().map(|teeth| teeth.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_assign_moves_tooth_between_kinds() {
        let mut selection = ExtractionSelection::new();
        selection.assign(ExtractionKind::MissingTeeth, 3);
        selection.assign(ExtractionKind::WillExtractOnDelivery, 3);

        assert_eq!(selection.kind_of(3), Some(ExtractionKind::WillExtractOnDelivery));
        assert!(selection.teeth(ExtractionKind::MissingTeeth).is_empty());
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_assign_is_idempotent() {
        let mut selection = ExtractionSelection::new();
        selection.assign(ExtractionKind::Prepped, 8);
        let once = selection.clone();
        selection.assign(ExtractionKind::Prepped, 8);
        assert_eq!(selection, once);
    }

    #[test]
    fn test_remove_returns_previous_kind() {
        let mut selection = ExtractionSelection::new();
        selection.assign(ExtractionKind::Implant, 19);
        assert_eq!(selection.remove(19), Some(ExtractionKind::Implant));
        assert_eq!(selection.remove(19), None);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(
            ExtractionKind::from_label("will extract on delivery"),
            Some(ExtractionKind::WillExtractOnDelivery)
        );
        assert_eq!(ExtractionKind::from_label("Missing teeth"), Some(ExtractionKind::MissingTeeth));
        assert_eq!(ExtractionKind::from_label("unknown"), None);
    }

    #[test]
    fn test_serde_keeps_categories() {
        let mut selection = ExtractionSelection::new();
        selection.assign_all(ExtractionKind::MissingTeeth, [2, 3]);
        selection.assign(ExtractionKind::Implant, 14);

        let json = serde_json::to_string(&selection).unwrap();
        let back: ExtractionSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }

    fn kind_strategy() -> impl Strategy<Value = ExtractionKind> {
        (0..ExtractionKind::ALL.len()).prop_map(|i| ExtractionKind::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_tooth_in_at_most_one_kind(
            ops in prop::collection::vec((kind_strategy(), 1u8..=32), 0..64)
        ) {
            let mut selection = ExtractionSelection::new();
            for (kind, tooth) in &ops {
                selection.assign(*kind, *tooth);
                prop_assert_eq!(selection.kind_of(*tooth), Some(*kind));
            }

            for tooth in 1u8..=32 {
                let holders = ExtractionKind::ALL
                    .iter()
                    .filter(|kind| selection.teeth(**kind).contains(&tooth))
                    .count();
                prop_assert!(holders <= 1);
            }
        }
    }
}

//! Dental arch models.

use serde::{Deserialize, Serialize};

/// Highest tooth number in universal numbering.
pub const MAX_TOOTH: u8 = 32;

/// One half of a dental configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// Upper arch (teeth 1-16)
    Maxillary,
    /// Lower arch (teeth 17-32)
    Mandibular,
}

impl Arch {
    /// Both arches, upper first.
    pub const ALL: [Arch; 2] = [Arch::Maxillary, Arch::Mandibular];

    /// Human-readable label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Arch::Maxillary => "Maxillary",
            Arch::Mandibular => "Mandibular",
        }
    }

    /// Wire value expected by the backend.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Arch::Maxillary => "maxillary",
            Arch::Mandibular => "mandibular",
        }
    }

    /// Check if a tooth number belongs to this arch.
    pub fn contains(&self, tooth: u8) -> bool {
        match self {
            Arch::Maxillary => (1..=16).contains(&tooth),
            Arch::Mandibular => (17..=MAX_TOOTH).contains(&tooth),
        }
    }

    /// Arch a tooth number belongs to, if it is a valid tooth.
    pub fn of_tooth(tooth: u8) -> Option<Arch> {
        Arch::ALL.into_iter().find(|arch| arch.contains(tooth))
    }
}

/// Which arches a product is made for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArchType {
    #[default]
    Maxillary,
    Mandibular,
    Both,
}

impl ArchType {
    /// Arches declared by this type, upper first.
    pub fn arches(&self) -> &'static [Arch] {
        match self {
            ArchType::Maxillary => &[Arch::Maxillary],
            ArchType::Mandibular => &[Arch::Mandibular],
            ArchType::Both => &Arch::ALL,
        }
    }

    /// Check if the type includes an arch.
    pub fn includes(&self, arch: Arch) -> bool {
        self.arches().contains(&arch)
    }

    /// Parse the tag used by catalog data ("upper", "lower", "both", ...).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "maxillary" | "upper" | "max" => Some(ArchType::Maxillary),
            "mandibular" | "lower" | "mand" => Some(ArchType::Mandibular),
            "both" | "maxillary,mandibular" | "upper,lower" => Some(ArchType::Both),
            _ => None,
        }
    }
}

//! Catalog resolution for form values.
//!
//! Pipeline: form value → normalization → matching cascade → backend id

mod index;
mod matcher;
mod normalizer;

pub use index::*;
pub use matcher::*;
pub use normalizer::*;

use thiserror::Error;

/// Resolution errors. Their messages are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Missing {0} brand or shade")]
    MissingShade(&'static str),

    #[error("Unknown {kind} brand '{brand}'")]
    UnknownBrand { kind: &'static str, brand: String },

    #[error("Unknown {kind} '{shade}' for brand '{brand}'")]
    UnknownShade {
        kind: &'static str,
        brand: String,
        shade: String,
    },

    #[error("Unknown grade '{0}'")]
    UnknownGrade(String),

    #[error("Unknown stage '{0}'")]
    UnknownStage(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;

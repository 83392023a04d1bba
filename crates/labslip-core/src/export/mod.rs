//! Print preview export.

mod summary;

pub use summary::*;

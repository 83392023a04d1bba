//! Domain models for the lab slip system.

mod arch;
mod case;
mod catalog;
mod extraction;
mod product;
mod session;
mod slip;

pub use arch::*;
pub use case::*;
pub use catalog::*;
pub use extraction::*;
pub use product::*;
pub use session::*;
pub use slip::*;

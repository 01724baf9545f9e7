//! McMurchie-Davidson recurrences for one shell pair.

pub mod hermite;
pub mod coulomb;

pub use hermite::HermiteExpansion;
pub use coulomb::{CoulombKernel, HermiteCoulomb};

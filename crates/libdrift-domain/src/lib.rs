//! Pure drift evaluation (no IO).
//!
//! Input: repository snapshots constructed elsewhere.
//! Output: mismatches or drift entries, plus findings + verdict + summary data.

#![forbid(unsafe_code)]

pub mod model;
pub mod reconcile;
pub mod report;
pub mod revision;

mod engine;
mod fingerprint;

pub use engine::{evaluate_reconcile, evaluate_revision};
pub use reconcile::Reconciler;
pub use revision::RevisionComparator;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod test_support;

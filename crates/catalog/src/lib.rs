//! Reconciliation engine for the targhette catalog.
//!
//! Pure engine crate: loads catalog records, builds one image index per run,
//! and reconciles the two. No CLI concerns.

pub mod config;
pub mod destinations;
pub mod error;
pub mod index;
pub mod model;
pub mod naming;
pub mod reconcile;
pub mod report;
pub mod stats;

pub use config::AuditConfig;
pub use error::CatalogError;
pub use index::ImageIndex;
pub use model::{CatalogRecord, MissingEntry, SectionOutcome, SectionStats, UnreferencedImage};
pub use reconcile::reconcile_section;

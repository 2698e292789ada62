//! Jurisdiction reference data: basic amounts and marginal rate tables for
//! Canada, the United States and their provinces, territories and states.

pub mod loader;

pub use loader::{BracketRecord, JurisdictionLoader, JurisdictionLoaderError, JurisdictionRecord};

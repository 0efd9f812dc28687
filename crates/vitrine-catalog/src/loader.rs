//! Catalog file loading.
//!
//! The analyzer itself is loader-agnostic (a materialized slice in, a
//! report out); this module covers the common case of a JSON array on
//! disk. Other sources inject their own `Vec<SpecimenRecord>`.

use std::fs;
use std::path::Path;

use vitrine_core::domain::SpecimenRecord;

use crate::analyzer::CatalogError;

/// Read a catalog from a JSON array file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<SpecimenRecord>, CatalogError> {
    let raw = fs::read_to_string(path)?;
    let records: Vec<SpecimenRecord> = serde_json::from_str(&raw)?;
    log::debug!("loaded {} specimen records", records.len());
    Ok(records)
}

//! Coverage report types.
//!
//! A report is a plain structured snapshot: created fresh on every
//! analysis run, never mutated afterward, serializable for any consumer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `(form, intent)` cell of the cross-tabulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationCount {
    pub form: String,
    pub intent: String,
    pub count: usize,
}

impl CombinationCount {
    /// Combined key used for the deterministic tie-break.
    pub fn key(&self) -> String {
        format!("{}:{}", self.form, self.intent)
    }
}

/// Structural coverage snapshot of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub total_specimens: usize,
    pub with_mechanism: usize,
    pub without_mechanism: usize,
    /// `with_mechanism / total * 100`; 0.0 for an empty catalog, never NaN.
    pub coverage_percentage: f64,
    /// Frequency tables per categorical dimension, over the full
    /// collection. BTreeMaps keep iteration (and serialization) order
    /// deterministic.
    pub by_dimension: BTreeMap<String, BTreeMap<String, usize>>,
    /// `(form, intent)` cells ranked by count descending, ties broken by
    /// lexicographic combined key.
    pub top_combinations: Vec<CombinationCount>,
    /// Ordered human-readable findings.
    pub recommendations: Vec<String>,
}

impl CoverageReport {
    /// Empty-catalog report: all counts zero, percentage zero, no tables.
    pub fn empty() -> Self {
        CoverageReport {
            total_specimens: 0,
            with_mechanism: 0,
            without_mechanism: 0,
            coverage_percentage: 0.0,
            by_dimension: BTreeMap::new(),
            top_combinations: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

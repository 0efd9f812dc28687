//! Catalog coverage analyzer.
//!
//! Cross-tabulates a materialized specimen collection against its
//! categorical dimensions and flags under-served combinations. The whole
//! pass is a pure function of the input plus the injected thresholds:
//! identical collections (in any order) produce identical reports.

use std::collections::BTreeMap;
use thiserror::Error;

use vitrine_core::domain::{DomainError, SpecimenAttributes, SpecimenRecord};
use vitrine_core::CoverageConfig;

use crate::report::{CombinationCount, CoverageReport};

#[derive(Error, Debug)]
pub enum CatalogError {
    /// A specimen is missing a required attribute (or carries an
    /// out-of-range seed). The whole analysis fails rather than silently
    /// dropping the record: a coverage percentage over a truncated set
    /// would be worse than no report.
    #[error("specimen {index} is malformed: missing or invalid `{field}`")]
    MalformedSpecimen { index: usize, field: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Dimension names as they appear in `CoverageReport::by_dimension`.
const DIMENSIONS: [&str; 4] = ["signature", "form", "kbe_layer", "intent"];

pub struct CoverageAnalyzer {
    config: CoverageConfig,
}

impl CoverageAnalyzer {
    pub fn new(config: CoverageConfig) -> Self {
        CoverageAnalyzer { config }
    }

    /// Analyze a materialized catalog. Idempotent; no side effects beyond
    /// the returned report.
    pub fn analyze(&self, records: &[SpecimenRecord]) -> Result<CoverageReport, CatalogError> {
        if records.is_empty() {
            return Ok(CoverageReport::empty());
        }

        // Fail-fast validation pass. Every record must resolve before any
        // counting happens.
        let mut specimens: Vec<(SpecimenAttributes, bool)> = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let attrs = record.validate().map_err(|e| CatalogError::MalformedSpecimen {
                index,
                field: match e {
                    DomainError::MissingAttribute { field } => field,
                    DomainError::InvalidSeed { .. } => "seed",
                    DomainError::UnknownAttribute { kind, .. } => kind,
                },
            })?;
            specimens.push((attrs, record.resolved_mechanism().is_some()));
        }

        let total = specimens.len();
        let with_mechanism = specimens.iter().filter(|(_, has)| *has).count();
        let without_mechanism = total - with_mechanism;
        let coverage_percentage = with_mechanism as f64 / total as f64 * 100.0;

        let by_dimension = Self::dimension_tables(&specimens, |_| true);
        let covered_dimension = Self::dimension_tables(&specimens, |has| has);

        let top_combinations = Self::rank_combinations(&specimens);

        let recommendations = self.recommendations(
            total,
            without_mechanism,
            coverage_percentage,
            &by_dimension,
            &covered_dimension,
            &top_combinations,
        );

        log::debug!(
            "coverage analysis: {}/{} specimens with mechanism, {} combinations",
            with_mechanism,
            total,
            top_combinations.len()
        );

        Ok(CoverageReport {
            total_specimens: total,
            with_mechanism,
            without_mechanism,
            coverage_percentage,
            by_dimension,
            top_combinations,
            recommendations,
        })
    }

    fn dimension_value(attrs: &SpecimenAttributes, dimension: &str) -> &'static str {
        match dimension {
            "signature" => attrs.signature.label(),
            "form" => attrs.form.label(),
            "kbe_layer" => attrs.kbe_layer.label(),
            "intent" => attrs.hook.intent().label(),
            _ => unreachable!("unknown dimension"),
        }
    }

    fn dimension_tables(
        specimens: &[(SpecimenAttributes, bool)],
        include: fn(bool) -> bool,
    ) -> BTreeMap<String, BTreeMap<String, usize>> {
        let mut tables: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for dimension in DIMENSIONS {
            let mut table: BTreeMap<String, usize> = BTreeMap::new();
            for (attrs, has_mechanism) in specimens {
                if include(*has_mechanism) {
                    *table
                        .entry(Self::dimension_value(attrs, dimension).to_string())
                        .or_insert(0) += 1;
                }
            }
            tables.insert(dimension.to_string(), table);
        }
        tables
    }

    fn rank_combinations(specimens: &[(SpecimenAttributes, bool)]) -> Vec<CombinationCount> {
        let mut cells: BTreeMap<(String, String), usize> = BTreeMap::new();
        for (attrs, _) in specimens {
            let key = (
                attrs.form.label().to_string(),
                attrs.hook.intent().label().to_string(),
            );
            *cells.entry(key).or_insert(0) += 1;
        }

        let mut ranked: Vec<CombinationCount> = cells
            .into_iter()
            .map(|((form, intent), count)| CombinationCount { form, intent, count })
            .collect();
        // Count descending; lexicographic combined key breaks ties so the
        // ranking is identical regardless of input order.
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key().cmp(&b.key())));
        ranked
    }

    fn recommendations(
        &self,
        total: usize,
        without_mechanism: usize,
        coverage_percentage: f64,
        by_dimension: &BTreeMap<String, BTreeMap<String, usize>>,
        covered_dimension: &BTreeMap<String, BTreeMap<String, usize>>,
        combinations: &[CombinationCount],
    ) -> Vec<String> {
        let mut out = Vec::new();

        if without_mechanism > 0 {
            out.push(format!(
                "{} of {} specimens have no mechanism assignment (coverage {:.1}%)",
                without_mechanism, total, coverage_percentage
            ));
        }

        // Dead buckets: a dimension value present in the catalog with no
        // mechanism-bearing specimen at all.
        for dimension in DIMENSIONS {
            let full = &by_dimension[dimension];
            let covered = &covered_dimension[dimension];
            for (value, count) in full {
                let covered_count = covered.get(value).copied().unwrap_or(0);
                if *count > 0 && covered_count == 0 {
                    out.push(format!(
                        "no mechanism-bearing specimen covers {} `{}` ({} specimens)",
                        dimension, value, count
                    ));
                }
            }
        }

        // Over-concentration: the top combination dwarfs the median. Not
        // evaluated below two distinct combinations, where a "top" is
        // trivially the whole catalog and the signal means nothing.
        if combinations.len() >= 2 {
            let mut counts: Vec<usize> = combinations.iter().map(|c| c.count).collect();
            counts.sort_unstable();
            let median = if counts.len() % 2 == 1 {
                counts[counts.len() / 2] as f64
            } else {
                (counts[counts.len() / 2 - 1] + counts[counts.len() / 2]) as f64 / 2.0
            };
            let top = &combinations[0];
            let ratio = f64::from(self.config.over_concentration_ratio);
            if top.count as f64 > ratio * median {
                out.push(format!(
                    "combination {}x{} holds {} specimens, more than {:.1}x the median combination count",
                    top.form, top.intent, top.count, ratio
                ));
            }
        }

        out.truncate(self.config.recommendation_limit);
        out
    }
}

impl Default for CoverageAnalyzer {
    fn default() -> Self {
        CoverageAnalyzer::new(CoverageConfig::default())
    }
}

//! Vitrine core: specimen domain types, the seeded theme compositor, and
//! the five-stage presentation progression.
//!
//! Everything here is deterministic by construction. The compositor and
//! the attribute vocabularies are pure data transforms; the stage machine
//! owns its pending work as plain deadlines so cancellation is always
//! synchronous.

pub mod compositor;
pub mod config;
pub mod domain;
pub mod stage_driver;
pub mod stage_machine;

#[cfg(test)]
pub mod tests_determinism;
#[cfg(test)]
pub mod tests_proptest;

// Domain vocabularies and records
pub use domain::{
    Chrono, DomainError, FormId, Hook, Intent, KbeLayer, SignatureId, SpecimenAttributes,
    SpecimenRecord,
};

// Compositor
pub use compositor::{derive, derive_for, Hsl, PaletteRole, RadiusClass, ThemeParameters};

// Stage progression
pub use stage_driver::{StageDriver, StageSnapshot};
pub use stage_machine::{StageMachine, StageState, StageTimings};

// Configuration
pub use config::{ConfigError, CoverageConfig, StageConfig, VitrineConfig};

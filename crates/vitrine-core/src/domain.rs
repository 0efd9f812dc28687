use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown {kind} `{value}`")]
    UnknownAttribute { kind: &'static str, value: String },
    #[error("specimen missing required attribute `{field}`")]
    MissingAttribute { field: &'static str },
    #[error("seed {seed} outside 32-bit range")]
    InvalidSeed { seed: i64 },
}

// ============================================================================
// ATTRIBUTE VOCABULARIES
// ============================================================================
// Each vocabulary is closed: catalog data referencing a name outside the
// set fails at the boundary with DomainError::UnknownAttribute rather than
// flowing through as an unclassified bucket.

/// Palette family of a specimen. Every signature anchors the hue wheel at a
/// fixed base angle; the compositor rotates around that anchor per seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureId {
    /// Warm reds and coppers.
    Ember,
    /// Cold open blues.
    Tide,
    /// Greens, undergrowth.
    Moss,
    /// Desaturated blue-grey.
    Slate,
    /// Violet through magenta.
    Orchid,
    /// Gold and ochre.
    Aurum,
}

impl SignatureId {
    pub const ALL: [SignatureId; 6] = [
        SignatureId::Ember,
        SignatureId::Tide,
        SignatureId::Moss,
        SignatureId::Slate,
        SignatureId::Orchid,
        SignatureId::Aurum,
    ];

    /// Hue anchor in degrees on the standard HSL wheel.
    pub fn base_hue(&self) -> f32 {
        match self {
            SignatureId::Ember => 14.0,
            SignatureId::Tide => 198.0,
            SignatureId::Moss => 122.0,
            SignatureId::Slate => 226.0,
            SignatureId::Orchid => 286.0,
            SignatureId::Aurum => 46.0,
        }
    }

    /// Stable single-byte tag for hashing. Order is frozen; renumbering
    /// would silently re-theme every catalogued specimen.
    pub fn tag(&self) -> u8 {
        match self {
            SignatureId::Ember => 0,
            SignatureId::Tide => 1,
            SignatureId::Moss => 2,
            SignatureId::Slate => 3,
            SignatureId::Orchid => 4,
            SignatureId::Aurum => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignatureId::Ember => "ember",
            SignatureId::Tide => "tide",
            SignatureId::Moss => "moss",
            SignatureId::Slate => "slate",
            SignatureId::Orchid => "orchid",
            SignatureId::Aurum => "aurum",
        }
    }
}

impl std::str::FromStr for SignatureId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignatureId::ALL
            .iter()
            .find(|sig| sig.label() == s)
            .copied()
            .ok_or(DomainError::UnknownAttribute {
                kind: "signature",
                value: s.to_string(),
            })
    }
}

/// Visual archetype of a specimen. Forms carry the saturation/lightness
/// baselines the compositor offsets from, plus a corner-radius bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormId {
    Orb,
    Card,
    Thread,
    Field,
    Sigil,
    Veil,
}

impl FormId {
    pub const ALL: [FormId; 6] = [
        FormId::Orb,
        FormId::Card,
        FormId::Thread,
        FormId::Field,
        FormId::Sigil,
        FormId::Veil,
    ];

    /// Saturation baseline in [0, 1].
    pub fn base_saturation(&self) -> f32 {
        match self {
            FormId::Orb => 0.62,
            FormId::Card => 0.48,
            FormId::Thread => 0.55,
            FormId::Field => 0.40,
            FormId::Sigil => 0.70,
            FormId::Veil => 0.35,
        }
    }

    /// Lightness baseline in [0, 1].
    pub fn base_lightness(&self) -> f32 {
        match self {
            FormId::Orb => 0.55,
            FormId::Card => 0.60,
            FormId::Thread => 0.50,
            FormId::Field => 0.65,
            FormId::Sigil => 0.45,
            FormId::Veil => 0.72,
        }
    }

    /// Weighted radius-class preference, [sharp, soft, round, pill],
    /// summing to 100. The compositor picks with a hash lane.
    pub fn radius_weights(&self) -> [u32; 4] {
        match self {
            FormId::Orb => [0, 10, 40, 50],
            FormId::Card => [10, 60, 25, 5],
            FormId::Thread => [55, 30, 10, 5],
            FormId::Field => [5, 40, 45, 10],
            FormId::Sigil => [60, 25, 10, 5],
            FormId::Veil => [0, 25, 55, 20],
        }
    }

    /// Stable single-byte tag for hashing. Frozen, same as SignatureId.
    pub fn tag(&self) -> u8 {
        match self {
            FormId::Orb => 0,
            FormId::Card => 1,
            FormId::Thread => 2,
            FormId::Field => 3,
            FormId::Sigil => 4,
            FormId::Veil => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormId::Orb => "orb",
            FormId::Card => "card",
            FormId::Thread => "thread",
            FormId::Field => "field",
            FormId::Sigil => "sigil",
            FormId::Veil => "veil",
        }
    }
}

impl std::str::FromStr for FormId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormId::ALL
            .iter()
            .find(|form| form.label() == s)
            .copied()
            .ok_or(DomainError::UnknownAttribute {
                kind: "form",
                value: s.to_string(),
            })
    }
}

/// Time-of-day context a specimen is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chrono {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl Chrono {
    pub const ALL: [Chrono; 4] = [Chrono::Dawn, Chrono::Day, Chrono::Dusk, Chrono::Night];

    pub fn label(&self) -> &'static str {
        match self {
            Chrono::Dawn => "dawn",
            Chrono::Day => "day",
            Chrono::Dusk => "dusk",
            Chrono::Night => "night",
        }
    }
}

/// Cognitive mode classification: what register the specimen works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KbeLayer {
    /// Conceptual, informational.
    Knowing,
    /// Attitudinal, trust-forming.
    Believing,
    /// Somatic, enacted.
    Embodying,
}

impl KbeLayer {
    pub const ALL: [KbeLayer; 3] = [KbeLayer::Knowing, KbeLayer::Believing, KbeLayer::Embodying];

    pub fn label(&self) -> &'static str {
        match self {
            KbeLayer::Knowing => "knowing",
            KbeLayer::Believing => "believing",
            KbeLayer::Embodying => "embodying",
        }
    }
}

/// Interaction verb the specimen's active stage accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hook {
    Tap,
    Hold,
    Drag,
    Observe,
    Type,
    Breathe,
}

impl Hook {
    pub const ALL: [Hook; 6] = [
        Hook::Tap,
        Hook::Hold,
        Hook::Drag,
        Hook::Observe,
        Hook::Type,
        Hook::Breathe,
    ];

    /// Collapse the verb into its interaction intent. Coverage reporting
    /// cross-tabulates on intent rather than raw verb.
    pub fn intent(&self) -> Intent {
        match self {
            Hook::Tap => Intent::Ignite,
            Hook::Hold => Intent::Sustain,
            Hook::Drag => Intent::Shape,
            Hook::Observe => Intent::Witness,
            Hook::Type => Intent::Articulate,
            Hook::Breathe => Intent::Attune,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Hook::Tap => "tap",
            Hook::Hold => "hold",
            Hook::Drag => "drag",
            Hook::Observe => "observe",
            Hook::Type => "type",
            Hook::Breathe => "breathe",
        }
    }
}

/// Interaction intent derived from [`Hook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Ignite,
    Sustain,
    Shape,
    Witness,
    Articulate,
    Attune,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Ignite => "ignite",
            Intent::Sustain => "sustain",
            Intent::Shape => "shape",
            Intent::Witness => "witness",
            Intent::Articulate => "articulate",
            Intent::Attune => "attune",
        }
    }
}

// ============================================================================
// SPECIMEN RECORDS
// ============================================================================

/// Loader-facing specimen record as it arrives from an external catalog
/// source. Categorical fields are optional here so a partially-filled
/// catalog can be materialized and then rejected with a precise error,
/// instead of failing opaquely inside deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecimenRecord {
    /// Palette family. Required for analysis.
    pub signature: Option<SignatureId>,

    /// Visual archetype. Required for analysis.
    pub form: Option<FormId>,

    /// Time-of-day context. Required for analysis.
    pub chrono: Option<Chrono>,

    /// Cognitive layer. Required for analysis.
    pub kbe_layer: Option<KbeLayer>,

    /// Interaction verb. Required for analysis.
    pub hook: Option<Hook>,

    /// Per-specimen seed. Carried as i64 at the boundary (JSON integer);
    /// validation narrows it to 32 bits. Unique within a series, not
    /// required to be unique across the whole catalog.
    pub seed: i64,

    /// Marks the terminal/capstone specimen of its series.
    #[serde(default)]
    pub is_seal: bool,

    /// Behavioral mechanism label assigned by an external classification
    /// step. `None`, empty, or the literal "unassigned" all mean
    /// unassigned.
    #[serde(default)]
    pub mechanism: Option<String>,
}

impl SpecimenRecord {
    /// Resolved mechanism assignment, if any. Empty strings and the
    /// "unassigned" sentinel (case-insensitive) count as absent.
    pub fn resolved_mechanism(&self) -> Option<&str> {
        match self.mechanism.as_deref() {
            Some(m) if !m.is_empty() && !m.eq_ignore_ascii_case("unassigned") => Some(m),
            _ => None,
        }
    }

    /// Validate into an immutable attribute set. Fails on the first
    /// missing categorical or an out-of-range seed.
    pub fn validate(&self) -> Result<SpecimenAttributes, DomainError> {
        let signature = self
            .signature
            .ok_or(DomainError::MissingAttribute { field: "signature" })?;
        let form = self
            .form
            .ok_or(DomainError::MissingAttribute { field: "form" })?;
        let chrono = self
            .chrono
            .ok_or(DomainError::MissingAttribute { field: "chrono" })?;
        let kbe_layer = self
            .kbe_layer
            .ok_or(DomainError::MissingAttribute { field: "kbe_layer" })?;
        let hook = self
            .hook
            .ok_or(DomainError::MissingAttribute { field: "hook" })?;
        let seed = i32::try_from(self.seed).map_err(|_| DomainError::InvalidSeed { seed: self.seed })?;

        Ok(SpecimenAttributes {
            signature,
            form,
            chrono,
            kbe_layer,
            hook,
            seed,
            is_seal: self.is_seal,
        })
    }
}

/// Validated, immutable specimen attributes. Constructed once when the
/// catalog is loaded; never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecimenAttributes {
    pub signature: SignatureId,
    pub form: FormId,
    pub chrono: Chrono,
    pub kbe_layer: KbeLayer,
    pub hook: Hook,
    pub seed: i32,
    pub is_seal: bool,
}

//! Seeded theme compositor.
//!
//! Maps `(signature, form, seed, is_seal)` to a reproducible set of theme
//! parameters. All variation flows through one mixing step: the inputs are
//! packed little-endian into a blake3 hasher and the first 16 digest bytes
//! are read back as four u32 lanes (hue, saturation, lightness, radius).
//! No clock, no ambient randomness, no I/O: identical inputs always yield
//! structurally equal output.

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, FormId, SignatureId};

/// Width of the hue rotation window around a signature's anchor, in
/// hundredths of a degree: 64 degrees total.
const HUE_STEPS: u32 = 6400;

/// Width of the saturation offset window, in hundredths: +/-0.08.
const SATURATION_STEPS: u32 = 16;

/// Width of the lightness offset window, in hundredths: +/-0.06.
const LIGHTNESS_STEPS: u32 = 12;

/// Fixed post-hash bias applied to seal specimens: deeper, more saturated,
/// the "resolved" corner of the color space.
const SEAL_SATURATION_SHIFT: f32 = 0.10;
const SEAL_LIGHTNESS_SHIFT: f32 = -0.06;

/// HSL color triple. `h` in degrees [0, 360), `s` and `l` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    fn new(h: f32, s: f32, l: f32) -> Self {
        Hsl {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
        }
    }
}

/// Named palette role within a derived theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteRole {
    Primary,
    Accent,
    Void,
    TextFaint,
    Halo,
}

impl PaletteRole {
    pub const ALL: [PaletteRole; 5] = [
        PaletteRole::Primary,
        PaletteRole::Accent,
        PaletteRole::Void,
        PaletteRole::TextFaint,
        PaletteRole::Halo,
    ];
}

/// Corner radius class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadiusClass {
    Sharp,
    Soft,
    Round,
    Pill,
}

impl RadiusClass {
    pub fn label(&self) -> &'static str {
        match self {
            RadiusClass::Sharp => "sharp",
            RadiusClass::Soft => "soft",
            RadiusClass::Round => "round",
            RadiusClass::Pill => "pill",
        }
    }
}

/// Derived theme parameter set. Recomputed on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemeParameters {
    pub primary: Hsl,
    pub accent: Hsl,
    pub void: Hsl,
    pub text_faint: Hsl,
    pub halo: Hsl,
    pub radius: RadiusClass,
}

impl ThemeParameters {
    /// Color for a named palette role.
    pub fn role(&self, role: PaletteRole) -> Hsl {
        match role {
            PaletteRole::Primary => self.primary,
            PaletteRole::Accent => self.accent,
            PaletteRole::Void => self.void,
            PaletteRole::TextFaint => self.text_faint,
            PaletteRole::Halo => self.halo,
        }
    }
}

/// Four u32 sub-seed lanes read from the mixing digest.
struct Lanes {
    hue: u32,
    saturation: u32,
    lightness: u32,
    radius: u32,
}

/// The documented mixing step. Fields are packed little-endian in frozen
/// order: signature tag, form tag, seed, seal flag. Changing the order or
/// widths re-themes the entire catalog.
fn mix(signature: SignatureId, form: FormId, seed: i32, is_seal: bool) -> Lanes {
    let mut h = Hasher::new();
    h.update(&[signature.tag()]);
    h.update(&[form.tag()]);
    h.update(&seed.to_le_bytes());
    h.update(&[is_seal as u8]);
    let out = h.finalize();
    let b = out.as_bytes();

    Lanes {
        hue: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        saturation: u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
        lightness: u32::from_le_bytes([b[8], b[9], b[10], b[11]]),
        radius: u32::from_le_bytes([b[12], b[13], b[14], b[15]]),
    }
}

/// Quantize a lane to a centered offset over `steps` hundredths. Integer
/// arithmetic up to the final division keeps the result identical on
/// every platform.
fn centered_offset(lane: u32, steps: u32) -> f32 {
    (lane % steps) as f32 / 100.0 - steps as f32 / 200.0
}

fn pick_radius(lane: u32, form: FormId) -> RadiusClass {
    let weights = form.radius_weights();
    let mut roll = lane % 100;
    let classes = [
        RadiusClass::Sharp,
        RadiusClass::Soft,
        RadiusClass::Round,
        RadiusClass::Pill,
    ];
    for (class, w) in classes.iter().zip(weights.iter()) {
        if roll < *w {
            return *class;
        }
        roll -= w;
    }
    // Weights sum to 100, so the loop always returns.
    RadiusClass::Pill
}

/// Derive the theme for a specimen. Pure; safe to call concurrently from
/// any number of callers.
///
/// `seed` is accepted as i64 (the catalog transport width) and must fit in
/// 32 bits, otherwise `DomainError::InvalidSeed` is returned.
pub fn derive(
    signature: SignatureId,
    form: FormId,
    seed: i64,
    is_seal: bool,
) -> Result<ThemeParameters, DomainError> {
    let seed = i32::try_from(seed).map_err(|_| DomainError::InvalidSeed { seed })?;
    let lanes = mix(signature, form, seed, is_seal);

    let hue = signature.base_hue() + centered_offset(lanes.hue, HUE_STEPS);
    let mut saturation = form.base_saturation() + centered_offset(lanes.saturation, SATURATION_STEPS);
    let mut lightness = form.base_lightness() + centered_offset(lanes.lightness, LIGHTNESS_STEPS);

    if is_seal {
        saturation += SEAL_SATURATION_SHIFT;
        lightness += SEAL_LIGHTNESS_SHIFT;
    }
    saturation = saturation.clamp(0.05, 0.95);
    lightness = lightness.clamp(0.08, 0.92);

    let primary = Hsl::new(hue, saturation, lightness);

    Ok(ThemeParameters {
        primary,
        accent: Hsl::new(hue + 32.0, saturation + 0.08, lightness + 0.04),
        void: Hsl::new(hue, saturation * 0.30, 0.08),
        text_faint: Hsl::new(hue, saturation * 0.18, 0.82),
        halo: Hsl::new(hue, saturation * 0.45, 0.90),
        radius: pick_radius(lanes.radius, form),
    })
}

/// String-level entry point for callers holding unresolved attribute
/// names (CLI, loaders). Resolves the vocabularies first, so a bad name
/// fails with `UnknownAttribute` before any derivation happens.
pub fn derive_for(
    signature: &str,
    form: &str,
    seed: i64,
    is_seal: bool,
) -> Result<ThemeParameters, DomainError> {
    let signature: SignatureId = signature.parse()?;
    let form: FormId = form.parse()?;
    derive(signature, form, seed, is_seal)
}

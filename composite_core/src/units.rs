//! # Unit Conversion
//!
//! Normalizes user-supplied units into a consistent system before the
//! force-sharing calculation. There are three independent unit families:
//!
//! - **Modulus**: GPa, N/m² (Pa), Psi
//! - **Load**: N, kgf
//! - **Area**: m², cm², mm²
//!
//! Each family is its own enum, so a typed converter can never receive a
//! unit from the wrong family. [`UnitTag`] wraps any of them for callers that
//! carry untyped tags; the `*_tagged` converters reject mismatched families
//! with [`CalcError::InvalidUnit`].
//!
//! Catalog moduli are always stored in GPa.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::units::{convert_load_and_area, convert_modulus, AreaUnit, LoadUnit, ModulusUnit};
//!
//! assert_eq!(convert_modulus(70.0, ModulusUnit::PascalSI), 7.0e10);
//!
//! let (stress_n, area_m2) =
//!     convert_load_and_area(10.0, LoadUnit::Kilogramforce, 500.0, AreaUnit::SquareCentimeter);
//! assert!((stress_n - 98.0665).abs() < 1e-9);
//! assert!((area_m2 - 0.05).abs() < 1e-12);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Pascals per gigapascal
pub const PA_PER_GPA: f64 = 1.0e9;

/// Divisor applied by the Psi modulus branch: one psi expressed in GPa.
///
/// The Psi branch divides by this rather than multiplying by a psi-per-GPa
/// factor (1 GPa ≈ 145 037.7 psi).
pub const PSI_MODULUS_DIVISOR: f64 = 0.000_006_894_76;

/// Standard gravity, newtons per kilogram-force
pub const NEWTONS_PER_KGF: f64 = 9.806_65;

/// Square centimeters per square meter
pub const CM2_PER_M2: f64 = 10_000.0;

/// Square millimeters per square meter
pub const MM2_PER_M2: f64 = 1_000_000.0;

/// Normalize a unit label for lookup: trim, lowercase, `²` -> `2`, spaces removed.
fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase().replace('²', "2").replace(' ', "")
}

// ============================================================================
// Unit Families
// ============================================================================

macro_rules! unit_family {
    (
        $(#[$meta:meta])*
        $name:ident, $family:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal [$($alias:literal),*] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// All variants, in menu order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Family name used in error messages
            pub const FAMILY: &'static str = $family;

            /// Display label (e.g., "GPa", "cm²")
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parse from the display label or a common ASCII spelling
            pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
                let key = normalize_label(s);
                $(
                    if key == normalize_label($label) $(|| key == $alias)* {
                        return Ok($name::$variant);
                    }
                )+
                Err(CalcError::invalid_unit($family, s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = CalcError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_str_flexible(s)
            }
        }
    };
}

unit_family! {
    /// Unit in which elastic moduli are reported and fed to the calculator
    ModulusUnit, "modulus" {
        /// Gigapascals (catalog unit, no conversion)
        #[default]
        GPa => "GPa" ["gigapascal"],
        /// Pascals, written N/m²
        PascalSI => "N/m²" ["pa", "pascal", "n/m^2"],
        /// Pounds per square inch (see [`PSI_MODULUS_DIVISOR`])
        Psi => "Psi" ["lbf/in2"],
    }
}

unit_family! {
    /// Unit of the applied load
    LoadUnit, "load" {
        /// Newtons
        #[default]
        Newton => "N" ["newton", "newtons"],
        /// Kilogram-force
        Kilogramforce => "kgf" ["kilogramforce", "kilogram-force", "kgforce"],
    }
}

unit_family! {
    /// Unit of the loaded cross-section area
    AreaUnit, "area" {
        /// Square meters
        #[default]
        SquareMeter => "m²" ["m^2", "sqm"],
        /// Square centimeters
        SquareCentimeter => "cm²" ["cm^2", "sqcm"],
        /// Square millimeters
        SquareMillimeter => "mm²" ["mm^2", "sqmm"],
    }
}

/// A unit from any family.
///
/// Serializes as the bare label; labels are unique across families so
/// deserialization is unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitTag {
    Modulus(ModulusUnit),
    Load(LoadUnit),
    Area(AreaUnit),
}

impl UnitTag {
    /// Family this tag belongs to
    pub fn family(&self) -> &'static str {
        match self {
            UnitTag::Modulus(_) => ModulusUnit::FAMILY,
            UnitTag::Load(_) => LoadUnit::FAMILY,
            UnitTag::Area(_) => AreaUnit::FAMILY,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            UnitTag::Modulus(u) => u.label(),
            UnitTag::Load(u) => u.label(),
            UnitTag::Area(u) => u.label(),
        }
    }
}

impl fmt::Display for UnitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UnitTag {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(u) = ModulusUnit::from_str_flexible(s) {
            return Ok(UnitTag::Modulus(u));
        }
        if let Ok(u) = LoadUnit::from_str_flexible(s) {
            return Ok(UnitTag::Load(u));
        }
        if let Ok(u) = AreaUnit::from_str_flexible(s) {
            return Ok(UnitTag::Area(u));
        }
        Err(CalcError::invalid_unit("any", s))
    }
}

impl From<ModulusUnit> for UnitTag {
    fn from(u: ModulusUnit) -> Self {
        UnitTag::Modulus(u)
    }
}

impl From<LoadUnit> for UnitTag {
    fn from(u: LoadUnit) -> Self {
        UnitTag::Load(u)
    }
}

impl From<AreaUnit> for UnitTag {
    fn from(u: AreaUnit) -> Self {
        UnitTag::Area(u)
    }
}

impl TryFrom<UnitTag> for ModulusUnit {
    type Error = CalcError;

    fn try_from(tag: UnitTag) -> Result<Self, Self::Error> {
        match tag {
            UnitTag::Modulus(u) => Ok(u),
            other => Err(CalcError::invalid_unit(ModulusUnit::FAMILY, other.label())),
        }
    }
}

impl TryFrom<UnitTag> for LoadUnit {
    type Error = CalcError;

    fn try_from(tag: UnitTag) -> Result<Self, Self::Error> {
        match tag {
            UnitTag::Load(u) => Ok(u),
            other => Err(CalcError::invalid_unit(LoadUnit::FAMILY, other.label())),
        }
    }
}

impl TryFrom<UnitTag> for AreaUnit {
    type Error = CalcError;

    fn try_from(tag: UnitTag) -> Result<Self, Self::Error> {
        match tag {
            UnitTag::Area(u) => Ok(u),
            other => Err(CalcError::invalid_unit(AreaUnit::FAMILY, other.label())),
        }
    }
}

// ============================================================================
// Converters
// ============================================================================

/// Convert a catalog modulus (GPa) into `unit`.
pub fn convert_modulus(value_gpa: f64, unit: ModulusUnit) -> f64 {
    match unit {
        ModulusUnit::PascalSI => value_gpa * PA_PER_GPA,
        ModulusUnit::Psi => value_gpa / PSI_MODULUS_DIVISOR,
        ModulusUnit::GPa => value_gpa,
    }
}

/// Inverse of [`convert_modulus`]: bring a converted modulus back to GPa.
pub fn modulus_to_gpa(value: f64, unit: ModulusUnit) -> f64 {
    match unit {
        ModulusUnit::PascalSI => value / PA_PER_GPA,
        ModulusUnit::Psi => value * PSI_MODULUS_DIVISOR,
        ModulusUnit::GPa => value,
    }
}

/// [`convert_modulus`] for an untyped tag.
pub fn convert_modulus_tagged(value_gpa: f64, unit: UnitTag) -> CalcResult<f64> {
    Ok(convert_modulus(value_gpa, ModulusUnit::try_from(unit)?))
}

/// Convert an applied load to newtons and an area to square meters.
///
/// Returns `(stress_n, area_m2)`.
pub fn convert_load_and_area(
    stress_value: f64,
    stress_unit: LoadUnit,
    area_value: f64,
    area_unit: AreaUnit,
) -> (f64, f64) {
    let stress = match stress_unit {
        LoadUnit::Kilogramforce => stress_value * NEWTONS_PER_KGF,
        LoadUnit::Newton => stress_value,
    };

    let area = match area_unit {
        AreaUnit::SquareCentimeter => area_value / CM2_PER_M2,
        AreaUnit::SquareMillimeter => area_value / MM2_PER_M2,
        AreaUnit::SquareMeter => area_value,
    };

    (stress, area)
}

/// [`convert_load_and_area`] for untyped tags.
pub fn convert_load_and_area_tagged(
    stress_value: f64,
    stress_unit: UnitTag,
    area_value: f64,
    area_unit: UnitTag,
) -> CalcResult<(f64, f64)> {
    let stress_unit = LoadUnit::try_from(stress_unit)?;
    let area_unit = AreaUnit::try_from(area_unit)?;
    Ok(convert_load_and_area(stress_value, stress_unit, area_value, area_unit))
}

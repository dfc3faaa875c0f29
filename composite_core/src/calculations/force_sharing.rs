//! # Force Sharing Calculation
//!
//! Splits an applied load between the matrix and reinforcement of a
//! two-phase composite using the rule of mixtures under iso-strain loading:
//!
//! ```text
//! F_total = A · σ
//! F_m     = F_total · (E_m·V_m) / (E_m·V_m + E_r·V_r)
//! F_r     = F_total · (E_r·V_r) / (E_m·V_m + E_r·V_r)
//! ```
//!
//! Volume fractions are independent inputs; they need not sum to 1.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::calculations::force_sharing::compute_forces;
//!
//! // 10 GPa matrix, 70 GPa fibre, 50/50, 1 m², 100 N
//! let result = compute_forces(1.0e10, 7.0e10, 0.5, 0.5, 1.0, 100.0).unwrap();
//! assert_eq!(result.total_force, 100.0);
//! assert!((result.matrix_force - 12.5).abs() < 1e-9);
//! assert!((result.reinforcement_force - 87.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{Material, MaterialCategory};
use crate::units::{convert_load_and_area, AreaUnit, LoadUnit, ModulusUnit};

const CALCULATION_TYPE: &str = "force_sharing";

/// Tolerance used when warning about fractions that do not sum to 1
const VOLUME_SUM_TOLERANCE: f64 = 1e-6;

/// Calculation inputs with every unit already resolved.
///
/// Moduli share one unit (whichever the caller selected), stress is in N
/// and area in m².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInputs {
    /// Matrix elastic modulus E_m
    pub elastic_modulus_matrix: f64,
    /// Reinforcement elastic modulus E_r
    pub elastic_modulus_reinforcement: f64,
    /// Matrix volume fraction V_m
    pub volume_fraction_matrix: f64,
    /// Reinforcement volume fraction V_r
    pub volume_fraction_reinforcement: f64,
    /// Applied load (N)
    pub applied_stress: f64,
    /// Loaded area (m²)
    pub area: f64,
}

/// Load carried by each phase, in newtons.
///
/// ## JSON Example
///
/// ```json
/// { "total_force": 100.0, "matrix_force": 12.5, "reinforcement_force": 87.5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceResult {
    /// Total applied force F = A·σ (N)
    pub total_force: f64,
    /// Force carried by the matrix (N)
    pub matrix_force: f64,
    /// Force carried by the reinforcement (N)
    pub reinforcement_force: f64,
}

impl ForceResult {
    /// Fraction of the total load carried by the matrix (0 when no load)
    pub fn matrix_share(&self) -> f64 {
        if self.total_force == 0.0 {
            0.0
        } else {
            self.matrix_force / self.total_force
        }
    }

    /// Fraction of the total load carried by the reinforcement (0 when no load)
    pub fn reinforcement_share(&self) -> f64 {
        if self.total_force == 0.0 {
            0.0
        } else {
            self.reinforcement_force / self.total_force
        }
    }
}

/// Compute the rule-of-mixtures force split.
///
/// Both moduli must be in the same unit; the split only depends on their
/// ratio.
///
/// # Errors
///
/// * `CalcError::DivisionByZero` - `E_m·V_m + E_r·V_r` is zero
/// * `CalcError::NonFinite` - an intermediate value overflowed or is NaN
pub fn compute_forces(
    modulus_matrix: f64,
    modulus_reinforcement: f64,
    vol_fraction_matrix: f64,
    vol_fraction_reinforcement: f64,
    area: f64,
    stress: f64,
) -> CalcResult<ForceResult> {
    let total_force = area * stress;

    let stiffness_matrix = modulus_matrix * vol_fraction_matrix;
    let stiffness_reinforcement = modulus_reinforcement * vol_fraction_reinforcement;
    let denominator = stiffness_matrix + stiffness_reinforcement;

    if denominator == 0.0 {
        return Err(CalcError::division_by_zero(
            CALCULATION_TYPE,
            format!(
                "E_m·V_m + E_r·V_r is zero (E_m={}, V_m={}, E_r={}, V_r={})",
                modulus_matrix, vol_fraction_matrix, modulus_reinforcement, vol_fraction_reinforcement
            ),
        ));
    }

    let result = ForceResult {
        total_force,
        matrix_force: total_force * stiffness_matrix / denominator,
        reinforcement_force: total_force * stiffness_reinforcement / denominator,
    };

    for (field, value) in [
        ("total_force", result.total_force),
        ("matrix_force", result.matrix_force),
        ("reinforcement_force", result.reinforcement_force),
    ] {
        if !value.is_finite() {
            return Err(CalcError::non_finite(field, value));
        }
    }

    Ok(result)
}

/// [`compute_forces`] over a [`NormalizedInputs`] record.
pub fn compute_normalized(inputs: &NormalizedInputs) -> CalcResult<ForceResult> {
    compute_forces(
        inputs.elastic_modulus_matrix,
        inputs.elastic_modulus_reinforcement,
        inputs.volume_fraction_matrix,
        inputs.volume_fraction_reinforcement,
        inputs.area,
        inputs.applied_stress,
    )
}

/// Composition of the composite by volume, for charts and sanity checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    /// Matrix share of the volume (%)
    pub matrix_percent: f64,
    /// Reinforcement share of the volume (%)
    pub reinforcement_percent: f64,
    /// V_m + V_r (1.0 for a fully described composite)
    pub volume_sum: f64,
}

impl Composition {
    /// Build from raw fractions
    pub fn from_fractions(vol_fraction_matrix: f64, vol_fraction_reinforcement: f64) -> Self {
        Composition {
            matrix_percent: vol_fraction_matrix * 100.0,
            reinforcement_percent: vol_fraction_reinforcement * 100.0,
            volume_sum: vol_fraction_matrix + vol_fraction_reinforcement,
        }
    }

    /// Check that the fractions describe the whole composite
    pub fn is_complete(&self) -> bool {
        (self.volume_sum - 1.0).abs() <= VOLUME_SUM_TOLERANCE
    }
}

/// A full calculation request as a front end submits it.
///
/// ## JSON Example
///
/// ```json
/// {
///   "material_matrix": { "name": "Epóxi", "category": "Matriz", "elastic_modulus_gpa": 3.5 },
///   "material_reinforcement": { "name": "Fibra de Vidro E", "category": "Reforço", "elastic_modulus_gpa": 72.0 },
///   "modulus_unit": "GPa",
///   "vol_fraction_matrix": 0.4,
///   "vol_fraction_reinforcement": 0.6,
///   "stress_value": 100.0,
///   "stress_unit": "kgf",
///   "area_value": 500.0,
///   "area_unit": "cm²"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Matrix constituent (category must be Matriz)
    pub material_matrix: Material,

    /// Reinforcement constituent (category must be Reforço)
    pub material_reinforcement: Material,

    /// Unit the moduli are converted to before the calculation
    #[serde(default)]
    pub modulus_unit: ModulusUnit,

    /// Matrix volume fraction, 0..=1
    pub vol_fraction_matrix: f64,

    /// Reinforcement volume fraction, 0..=1
    pub vol_fraction_reinforcement: f64,

    /// Applied load, in `stress_unit`
    pub stress_value: f64,

    #[serde(default)]
    pub stress_unit: LoadUnit,

    /// Loaded area, in `area_unit`
    pub area_value: f64,

    #[serde(default)]
    pub area_unit: AreaUnit,
}

impl CalculationRequest {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.material_matrix.is_category(MaterialCategory::Matrix) {
            return Err(CalcError::invalid_input(
                "material_matrix",
                &self.material_matrix.name,
                "Matrix material must have category Matriz",
            ));
        }
        if !self.material_reinforcement.is_category(MaterialCategory::Reinforcement) {
            return Err(CalcError::invalid_input(
                "material_reinforcement",
                &self.material_reinforcement.name,
                "Reinforcement material must have category Reforço",
            ));
        }
        for (field, value) in [
            ("vol_fraction_matrix", self.vol_fraction_matrix),
            ("vol_fraction_reinforcement", self.vol_fraction_reinforcement),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Volume fraction must be between 0 and 1",
                ));
            }
        }
        if !self.stress_value.is_finite() || self.stress_value < 0.0 {
            return Err(CalcError::invalid_input(
                "stress_value",
                self.stress_value.to_string(),
                "Applied load cannot be negative",
            ));
        }
        if !self.area_value.is_finite() || self.area_value < 0.0 {
            return Err(CalcError::invalid_input(
                "area_value",
                self.area_value.to_string(),
                "Area cannot be negative",
            ));
        }
        Ok(())
    }

    /// Volume composition of this request
    pub fn composition(&self) -> Composition {
        Composition::from_fractions(self.vol_fraction_matrix, self.vol_fraction_reinforcement)
    }

    /// Resolve every unit, producing the calculator's inputs.
    pub fn normalize(&self) -> NormalizedInputs {
        let (applied_stress, area) =
            convert_load_and_area(self.stress_value, self.stress_unit, self.area_value, self.area_unit);

        NormalizedInputs {
            elastic_modulus_matrix: self.material_matrix.modulus_in(self.modulus_unit),
            elastic_modulus_reinforcement: self.material_reinforcement.modulus_in(self.modulus_unit),
            volume_fraction_matrix: self.vol_fraction_matrix,
            volume_fraction_reinforcement: self.vol_fraction_reinforcement,
            applied_stress,
            area,
        }
    }
}

/// Results returned to the front end.
///
/// ## JSON Example
///
/// ```json
/// {
///   "result": { "total_force": 4903.325, "matrix_force": 152.4, "reinforcement_force": 4750.9 },
///   "modulus_matrix": 3.5,
///   "modulus_reinforcement": 72.0,
///   "modulus_unit": "GPa",
///   "composition": { "matrix_percent": 40.0, "reinforcement_percent": 60.0, "volume_sum": 1.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Force split (N)
    pub result: ForceResult,

    /// Matrix modulus in `modulus_unit`
    pub modulus_matrix: f64,

    /// Reinforcement modulus in `modulus_unit`
    pub modulus_reinforcement: f64,

    /// Unit of the two reported moduli
    pub modulus_unit: ModulusUnit,

    /// Volume composition
    pub composition: Composition,
}

/// Run a full calculation request.
///
/// # Arguments
///
/// * `request` - Materials, fractions, load and area with their units
///
/// # Returns
///
/// * `Ok(CalculationResponse)` - Force split plus the converted moduli
/// * `Err(CalcError)` - Invalid input or a zero stiffness denominator
///
/// # Example
///
/// ```rust
/// use composite_core::calculations::force_sharing::{calculate, CalculationRequest};
/// use composite_core::materials::{Material, MaterialCategory};
/// use composite_core::units::{AreaUnit, LoadUnit, ModulusUnit};
///
/// let request = CalculationRequest {
///     material_matrix: Material::new("Resina", MaterialCategory::Matrix, 10.0).unwrap(),
///     material_reinforcement: Material::new("Fibra", MaterialCategory::Reinforcement, 70.0).unwrap(),
///     modulus_unit: ModulusUnit::PascalSI,
///     vol_fraction_matrix: 0.5,
///     vol_fraction_reinforcement: 0.5,
///     stress_value: 100.0,
///     stress_unit: LoadUnit::Newton,
///     area_value: 1.0,
///     area_unit: AreaUnit::SquareMeter,
/// };
///
/// let response = calculate(&request).unwrap();
/// assert_eq!(response.modulus_matrix, 1.0e10);
/// assert!((response.result.matrix_force - 12.5).abs() < 1e-9);
/// ```
pub fn calculate(request: &CalculationRequest) -> CalcResult<CalculationResponse> {
    request.validate()?;

    let composition = request.composition();
    if !composition.is_complete() {
        warn!(
            volume_sum = composition.volume_sum,
            "volume fractions do not sum to 1; splitting load by the given fractions"
        );
    }

    let inputs = request.normalize();
    debug!(
        matrix = %request.material_matrix.name,
        reinforcement = %request.material_reinforcement.name,
        modulus_unit = %request.modulus_unit,
        ?inputs,
        "calculating force sharing"
    );

    let result = compute_normalized(&inputs)?;
    debug!(?result, "force sharing complete");

    Ok(CalculationResponse {
        result,
        modulus_matrix: inputs.elastic_modulus_matrix,
        modulus_reinforcement: inputs.elastic_modulus_reinforcement,
        modulus_unit: request.modulus_unit,
        composition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        let tol = 1e-9 * a.abs().max(b.abs()).max(1.0);
        assert!((a - b).abs() <= tol, "{} != {}", a, b);
    }

    fn test_request() -> CalculationRequest {
        CalculationRequest {
            material_matrix: Material::new("Resina", MaterialCategory::Matrix, 10.0).unwrap(),
            material_reinforcement: Material::new("Fibra", MaterialCategory::Reinforcement, 70.0).unwrap(),
            modulus_unit: ModulusUnit::PascalSI,
            vol_fraction_matrix: 0.5,
            vol_fraction_reinforcement: 0.5,
            stress_value: 100.0,
            stress_unit: LoadUnit::Newton,
            area_value: 1.0,
            area_unit: AreaUnit::SquareMeter,
        }
    }

    #[test]
    fn test_reference_split() {
        let result = compute_forces(1.0e10, 7.0e10, 0.5, 0.5, 1.0, 100.0).unwrap();
        assert_eq!(result.total_force, 100.0);
        assert_close(result.matrix_force, 12.5);
        assert_close(result.reinforcement_force, 87.5);
    }

    #[test]
    fn test_forces_sum_to_total() {
        let cases = [
            (3.5, 72.0, 0.4, 0.6, 0.05, 980.665),
            (1.0e10, 7.0e10, 0.3, 0.9, 2.0, 12.0),
            (110.0, 400.0, 1.0, 0.0, 1.0e-4, 5.0e6),
            (0.0, 230.0, 0.7, 0.3, 3.0, 1.0),
            (2.8, 15.0, 0.0, 0.25, 10.0, 0.0),
        ];
        for (em, er, vm, vr, a, s) in cases {
            let r = compute_forces(em, er, vm, vr, a, s).unwrap();
            assert_close(r.matrix_force + r.reinforcement_force, r.total_force);
        }
    }

    #[test]
    fn test_zero_denominator_is_error() {
        let err = compute_forces(1.0e10, 7.0e10, 0.0, 0.0, 1.0, 100.0).unwrap_err();
        assert_eq!(err.error_code(), "DIVISION_BY_ZERO");

        let err = compute_forces(0.0, 0.0, 0.5, 0.5, 1.0, 100.0).unwrap_err();
        assert!(matches!(err, CalcError::DivisionByZero { .. }));
    }

    #[test]
    fn test_overflow_is_non_finite() {
        let err = compute_forces(1.0, 1.0, 0.5, 0.5, f64::MAX, 10.0).unwrap_err();
        assert_eq!(err, CalcError::non_finite("total_force", f64::INFINITY));
    }

    #[test]
    fn test_monotonic_in_matrix_fraction() {
        let mut last_share = -1.0;
        for step in 0..=10 {
            let vm = step as f64 / 10.0;
            let r = compute_forces(3.5, 72.0, vm, 0.5, 1.0, 100.0).unwrap();
            assert!(r.matrix_share() > last_share);
            last_share = r.matrix_share();
        }
    }

    #[test]
    fn test_fractions_need_not_sum_to_one() {
        // 0.2 / 0.2 gives the same split as 0.5 / 0.5
        let a = compute_forces(10.0, 70.0, 0.2, 0.2, 1.0, 100.0).unwrap();
        let b = compute_forces(10.0, 70.0, 0.5, 0.5, 1.0, 100.0).unwrap();
        assert_close(a.matrix_force, b.matrix_force);
    }

    #[test]
    fn test_single_phase_carries_everything() {
        let r = compute_forces(3.5, 72.0, 1.0, 0.0, 1.0, 50.0).unwrap();
        assert_eq!(r.matrix_force, 50.0);
        assert_eq!(r.reinforcement_force, 0.0);
        assert_eq!(r.reinforcement_share(), 0.0);
    }

    #[test]
    fn test_zero_load_shares() {
        let r = compute_forces(3.5, 72.0, 0.5, 0.5, 0.0, 50.0).unwrap();
        assert_eq!(r.total_force, 0.0);
        assert_eq!(r.matrix_share(), 0.0);
    }

    #[test]
    fn test_calculate_reference_request() {
        let response = calculate(&test_request()).unwrap();
        assert_eq!(response.modulus_matrix, 1.0e10);
        assert_eq!(response.modulus_reinforcement, 7.0e10);
        assert_eq!(response.modulus_unit, ModulusUnit::PascalSI);
        assert_close(response.result.matrix_force, 12.5);
        assert_close(response.result.reinforcement_force, 87.5);
        assert!(response.composition.is_complete());
        assert_eq!(response.composition.matrix_percent, 50.0);
    }

    #[test]
    fn test_split_independent_of_modulus_unit() {
        let mut request = test_request();
        let reference = calculate(&request).unwrap().result;
        for &unit in ModulusUnit::ALL {
            request.modulus_unit = unit;
            let r = calculate(&request).unwrap().result;
            assert_close(r.matrix_force, reference.matrix_force);
            assert_close(r.reinforcement_force, reference.reinforcement_force);
        }
    }

    #[test]
    fn test_calculate_converts_load_and_area() {
        let mut request = test_request();
        request.stress_value = 10.0;
        request.stress_unit = LoadUnit::Kilogramforce;
        request.area_value = 500.0;
        request.area_unit = AreaUnit::SquareCentimeter;

        let inputs = request.normalize();
        assert_close(inputs.applied_stress, 98.0665);
        assert_close(inputs.area, 0.05);

        let response = calculate(&request).unwrap();
        assert_close(response.result.total_force, 98.0665 * 0.05);
    }

    #[test]
    fn test_calculate_zero_fractions_error() {
        let mut request = test_request();
        request.vol_fraction_matrix = 0.0;
        request.vol_fraction_reinforcement = 0.0;
        let err = calculate(&request).unwrap_err();
        assert_eq!(err.error_code(), "DIVISION_BY_ZERO");
    }

    #[test]
    fn test_validate_fraction_range() {
        let mut request = test_request();
        request.vol_fraction_matrix = 1.2;
        let err = calculate(&request).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "vol_fraction_matrix"));

        let mut request = test_request();
        request.vol_fraction_reinforcement = -0.1;
        assert!(request.validate().is_err());

        let mut request = test_request();
        request.vol_fraction_reinforcement = f64::NAN;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_negative_load_and_area() {
        let mut request = test_request();
        request.stress_value = -1.0;
        assert!(matches!(request.validate(), Err(CalcError::InvalidInput { ref field, .. }) if field == "stress_value"));

        let mut request = test_request();
        request.area_value = -0.5;
        assert!(matches!(request.validate(), Err(CalcError::InvalidInput { ref field, .. }) if field == "area_value"));
    }

    #[test]
    fn test_validate_categories() {
        let mut request = test_request();
        std::mem::swap(&mut request.material_matrix, &mut request.material_reinforcement);
        let err = request.validate().unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "material_matrix"));
    }

    #[test]
    fn test_composition() {
        let c = Composition::from_fractions(0.3, 0.6);
        assert_close(c.matrix_percent, 30.0);
        assert_close(c.reinforcement_percent, 60.0);
        assert_close(c.volume_sum, 0.9);
        assert!(!c.is_complete());
    }

    #[test]
    fn test_request_json_defaults_units() {
        let json = r#"{
            "material_matrix": { "name": "Epóxi", "category": "Matriz", "elastic_modulus_gpa": 3.5 },
            "material_reinforcement": { "name": "Fibra de Vidro E", "category": "Reforço", "elastic_modulus_gpa": 72.0 },
            "vol_fraction_matrix": 0.4,
            "vol_fraction_reinforcement": 0.6,
            "stress_value": 100.0,
            "area_value": 500.0,
            "area_unit": "cm²"
        }"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.modulus_unit, ModulusUnit::GPa);
        assert_eq!(request.stress_unit, LoadUnit::Newton);
        assert_eq!(request.area_unit, AreaUnit::SquareCentimeter);

        let response = calculate(&request).unwrap();
        assert_close(response.result.total_force, 5.0);
    }

    #[test]
    fn test_response_serialization() {
        let response = calculate(&test_request()).unwrap();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"modulus_unit\":\"N/m²\""));
        let parsed: CalculationResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
    }
}

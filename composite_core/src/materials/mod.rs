//! # Materials Catalog
//!
//! Named composite constituents and the read-only repository that serves
//! them to the calculator.
//!
//! ## Material Categories
//!
//! - **Matrix** (`"Matriz"`): the continuous binding phase (resins, light
//!   metals, ceramics)
//! - **Reinforcement** (`"Reforço"`): the embedded strengthening phase
//!   (glass, carbon, aramid, natural fibres)
//!
//! Every catalog modulus is stored in GPa; use [`Material::modulus_in`] to
//! read it in another unit.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::materials::{MaterialCatalog, MaterialCategory, MaterialRepository};
//!
//! let catalog = MaterialCatalog::builtin();
//! let matrices = catalog.get_by_category(MaterialCategory::Matrix);
//! assert!(!matrices.is_empty());
//!
//! let (matrix, reinforcement) = catalog.resolve_pair("Epóxi", "Fibra de Vidro E").unwrap();
//! assert_eq!(matrix.elastic_modulus_gpa, 3.5);
//! assert_eq!(reinforcement.elastic_modulus_gpa, 72.0);
//! ```

pub mod catalog;

pub use catalog::{builtin_materials, MaterialCatalog};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{convert_modulus, ModulusUnit};

/// Which phase of the composite a material may fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialCategory {
    /// Continuous binding phase
    #[serde(rename = "Matriz")]
    Matrix,
    /// Embedded strengthening phase
    #[serde(rename = "Reforço")]
    Reinforcement,
}

impl MaterialCategory {
    /// All categories for UI selection
    pub const ALL: [MaterialCategory; 2] = [MaterialCategory::Matrix, MaterialCategory::Reinforcement];

    /// Catalog spelling (the `tipo` column)
    pub fn code(&self) -> &'static str {
        match self {
            MaterialCategory::Matrix => "Matriz",
            MaterialCategory::Reinforcement => "Reforço",
        }
    }

    /// Parse from the catalog spelling or the English name
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "matriz" | "matrix" => Ok(MaterialCategory::Matrix),
            "reforço" | "reforco" | "reinforcement" => Ok(MaterialCategory::Reinforcement),
            _ => Err(CalcError::invalid_input(
                "tipo",
                s,
                "Category must be 'Matriz' or 'Reforço'",
            )),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialCategory::Matrix => "Matrix",
            MaterialCategory::Reinforcement => "Reinforcement",
        }
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A catalog entry.
///
/// ## JSON Example
///
/// ```json
/// { "name": "Epóxi", "category": "Matriz", "elastic_modulus_gpa": 3.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name, unique within a catalog (case-insensitive)
    pub name: String,
    /// Phase this material may fill
    pub category: MaterialCategory,
    /// Elastic modulus E (GPa)
    pub elastic_modulus_gpa: f64,
}

impl Material {
    /// Create a material, rejecting blank names and negative or non-finite moduli.
    pub fn new(
        name: impl Into<String>,
        category: MaterialCategory,
        elastic_modulus_gpa: f64,
    ) -> CalcResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CalcError::invalid_input("name", name, "Material name cannot be blank"));
        }
        if !elastic_modulus_gpa.is_finite() || elastic_modulus_gpa < 0.0 {
            return Err(CalcError::invalid_input(
                "elastic_modulus_gpa",
                elastic_modulus_gpa.to_string(),
                "Elastic modulus must be a finite, non-negative number",
            ));
        }
        Ok(Material {
            name: name.trim().to_string(),
            category,
            elastic_modulus_gpa,
        })
    }

    /// Elastic modulus converted to `unit`
    pub fn modulus_in(&self, unit: ModulusUnit) -> f64 {
        convert_modulus(self.elastic_modulus_gpa, unit)
    }

    /// Check whether this material may fill the given phase
    pub fn is_category(&self, category: MaterialCategory) -> bool {
        self.category == category
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, E = {} GPa)", self.name, self.category.code(), self.elastic_modulus_gpa)
    }
}

/// Read-only source of materials.
///
/// The calculator only depends on this trait, so catalogs can come from a
/// CSV file, the builtin table, or a test fixture.
pub trait MaterialRepository {
    /// Every material, in catalog order
    fn all(&self) -> Vec<Material>;

    /// Look up a material by name (case-insensitive, surrounding whitespace ignored)
    fn find(&self, name: &str) -> CalcResult<Material>;

    /// Materials of one category, in catalog order
    fn get_by_category(&self, category: MaterialCategory) -> Vec<Material> {
        self.all()
            .into_iter()
            .filter(|m| m.is_category(category))
            .collect()
    }

    /// Resolve a matrix/reinforcement pair by name, checking each category.
    fn resolve_pair(&self, matrix_name: &str, reinforcement_name: &str) -> CalcResult<(Material, Material)> {
        let matrix = self.find(matrix_name)?;
        if !matrix.is_category(MaterialCategory::Matrix) {
            return Err(CalcError::invalid_input(
                "material_matrix",
                &matrix.name,
                format!("'{}' is listed as {}, not Matriz", matrix.name, matrix.category.code()),
            ));
        }

        let reinforcement = self.find(reinforcement_name)?;
        if !reinforcement.is_category(MaterialCategory::Reinforcement) {
            return Err(CalcError::invalid_input(
                "material_reinforcement",
                &reinforcement.name,
                format!(
                    "'{}' is listed as {}, not Reforço",
                    reinforcement.name,
                    reinforcement.category.code()
                ),
            ));
        }

        Ok((matrix, reinforcement))
    }
}

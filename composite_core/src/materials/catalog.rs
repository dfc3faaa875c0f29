//! In-memory material catalog
//!
//! Loads the `nome,tipo,modulo_elasticidade` table that feeds the
//! calculator, or falls back to a builtin table of common composite
//! constituents.
//!
//! ## CSV Format
//!
//! ```text
//! nome,tipo,modulo_elasticidade
//! Epóxi,Matriz,3.5
//! Fibra de Vidro E,Reforço,72
//! ```
//!
//! Column order is free. English headers (`name`, `category`,
//! `elastic_modulus_gpa`) are accepted as well. Moduli are in GPa.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use tracing::{debug, info};

use super::{Material, MaterialCategory, MaterialRepository};
use crate::errors::{CalcError, CalcResult};

/// Immutable, name-indexed collection of materials.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    /// Materials in insertion order (menu order)
    materials: Vec<Material>,

    /// Lowercased name -> position in `materials`
    by_name: HashMap<String, usize>,

    /// Where the catalog came from (file path or "builtin")
    pub source: Option<String>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl MaterialCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from materials; later duplicates replace earlier ones.
    pub fn from_materials(materials: impl IntoIterator<Item = Material>) -> Self {
        let mut catalog = MaterialCatalog::new();
        for material in materials {
            catalog.insert(material);
        }
        catalog
    }

    fn insert(&mut self, material: Material) {
        let key = name_key(&material.name);
        match self.by_name.get(&key) {
            Some(&idx) => {
                debug!(name = %material.name, "duplicate catalog entry replaces earlier row");
                self.materials[idx] = material;
            }
            None => {
                self.by_name.insert(key, self.materials.len());
                self.materials.push(material);
            }
        }
    }

    /// Load a catalog from a CSV file.
    pub fn load_from_csv(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let text = std::fs::read_to_string(path).map_err(|e| {
            CalcError::file_error("open", &path_str, format!("Failed to read CSV: {}", e))
        })?;

        let catalog = Self::parse_csv(&text, &path_str)?;
        info!(path = %path_str, materials = catalog.len(), "loaded material catalog");
        Ok(catalog)
    }

    /// Parse a catalog from CSV text already in memory.
    pub fn from_csv_str(text: &str) -> CalcResult<Self> {
        Self::parse_csv(text, "<memory>")
    }

    fn parse_csv(text: &str, source: &str) -> CalcResult<Self> {
        let mut lines = text.lines().enumerate();

        let header_line = lines
            .by_ref()
            .find(|(_, l)| !l.trim().is_empty())
            .map(|(_, l)| l.trim_start_matches('\u{feff}'))
            .ok_or_else(|| CalcError::file_error("read", source, "CSV file is empty"))?;

        let headers: Vec<String> = header_line.split(',').map(clean_field).collect();
        let col_index = |names: &[&str]| -> Option<usize> {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };

        let name_idx = col_index(&["nome", "name"])
            .ok_or_else(|| CalcError::file_error("parse", source, "Missing 'nome' column"))?;
        let type_idx = col_index(&["tipo", "category"])
            .ok_or_else(|| CalcError::file_error("parse", source, "Missing 'tipo' column"))?;
        let modulus_idx = col_index(&["modulo_elasticidade", "elastic_modulus_gpa"]).ok_or_else(|| {
            CalcError::file_error("parse", source, "Missing 'modulo_elasticidade' column")
        })?;

        let mut catalog = MaterialCatalog::new();

        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let line_num = idx + 1;

            let fields: Vec<String> = line.split(',').map(clean_field).collect();

            let name = field_at(&fields, name_idx, "nome", line_num)?;
            let category_raw = field_at(&fields, type_idx, "tipo", line_num)?;
            let category = MaterialCategory::from_str_flexible(category_raw).map_err(|_| {
                CalcError::invalid_input(
                    "tipo",
                    category_raw,
                    format!("Line {}: category must be 'Matriz' or 'Reforço'", line_num),
                )
            })?;

            let modulus_raw = field_at(&fields, modulus_idx, "modulo_elasticidade", line_num)?;
            let modulus = f64::from_str(modulus_raw).map_err(|_| {
                CalcError::invalid_input(
                    "modulo_elasticidade",
                    modulus_raw,
                    format!("Line {}: not a number", line_num),
                )
            })?;

            let material = Material::new(name, category, modulus).map_err(|e| match e {
                CalcError::InvalidInput { field, value, reason } => CalcError::InvalidInput {
                    field,
                    value,
                    reason: format!("Line {}: {}", line_num, reason),
                },
                other => other,
            })?;
            catalog.insert(material);
        }

        catalog.source = Some(source.to_string());
        Ok(catalog)
    }

    /// The bundled catalog (shared, built once).
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Borrow every material without cloning
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Names of one category, in catalog order
    pub fn names_of(&self, category: MaterialCategory) -> Vec<&str> {
        self.materials
            .iter()
            .filter(|m| m.is_category(category))
            .map(|m| m.name.as_str())
            .collect()
    }
}

impl MaterialRepository for MaterialCatalog {
    fn all(&self) -> Vec<Material> {
        self.materials.clone()
    }

    fn find(&self, name: &str) -> CalcResult<Material> {
        self.by_name
            .get(&name_key(name))
            .map(|&idx| self.materials[idx].clone())
            .ok_or_else(|| CalcError::material_not_found(name.trim()))
    }
}

/// Get a field from a split CSV row, or report the short row
fn field_at<'a>(fields: &'a [String], col: usize, name: &str, line_num: usize) -> CalcResult<&'a str> {
    fields.get(col).map(String::as_str).ok_or_else(|| {
        CalcError::invalid_input(
            name,
            fields.join(","),
            format!("Line {} has {} fields, expected at least {}", line_num, fields.len(), col + 1),
        )
    })
}

/// Trim whitespace and surrounding double quotes from a CSV field
fn clean_field(s: &str) -> String {
    s.trim().trim_matches('"').trim().to_string()
}

// ============================================================================
// Builtin Catalog (for use without a CSV file)
// ============================================================================

static BUILTIN: Lazy<MaterialCatalog> = Lazy::new(|| {
    let mut catalog = MaterialCatalog::from_materials(builtin_materials());
    catalog.source = Some("builtin".to_string());
    catalog
});

/// Common composite constituents with typical moduli (GPa).
///
/// Values are representative handbook figures for demos and tests, not
/// design values.
pub fn builtin_materials() -> Vec<Material> {
    use MaterialCategory::{Matrix, Reinforcement};

    let rows: [(&str, MaterialCategory, f64); 20] = [
        // Polymer matrices
        ("Epóxi", Matrix, 3.5),
        ("Poliéster Insaturado", Matrix, 3.2),
        ("Éster Vinílico", Matrix, 3.4),
        ("Fenólica", Matrix, 3.0),
        ("PEEK", Matrix, 3.6),
        ("Polipropileno", Matrix, 1.5),
        ("Poliamida 66", Matrix, 2.8),
        // Metal and ceramic matrices
        ("Alumínio", Matrix, 70.0),
        ("Titânio", Matrix, 110.0),
        ("Carbeto de Silício", Matrix, 410.0),
        // Reinforcements
        ("Fibra de Vidro E", Reinforcement, 72.0),
        ("Fibra de Vidro S", Reinforcement, 86.0),
        ("Fibra de Carbono HS", Reinforcement, 230.0),
        ("Fibra de Carbono HM", Reinforcement, 390.0),
        ("Aramida (Kevlar 49)", Reinforcement, 112.0),
        ("Fibra de Basalto", Reinforcement, 89.0),
        ("Fibra de Boro", Reinforcement, 400.0),
        ("Fibra de Linho", Reinforcement, 50.0),
        ("Fibra de Juta", Reinforcement, 26.0),
        ("Fibra de Sisal", Reinforcement, 15.0),
    ];

    rows.into_iter()
        .map(|(name, category, e_gpa)| Material {
            name: name.to_string(),
            category,
            elastic_modulus_gpa: e_gpa,
        })
        .collect()
}

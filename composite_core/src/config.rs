//! # Settings
//!
//! Defaults a front end starts from: which catalog to open, which units are
//! preselected, and the initial form values. Settings files are JSON; every
//! field is optional.
//!
//! ## Example
//!
//! ```rust
//! use composite_core::config::Settings;
//!
//! let settings: Settings = serde_json::from_str(r#"{ "area_unit": "cm²", "decimals": 3 }"#).unwrap();
//! assert_eq!(settings.decimals, 3);
//! assert_eq!(settings.default_stress, 100.0);
//! ```
//!
//! ## Environment Overrides
//!
//! - `COMPOSITE_CATALOG` -> `catalog_path`

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialCatalog;
use crate::units::{AreaUnit, LoadUnit, ModulusUnit};

/// Environment variable holding a catalog CSV path
pub const CATALOG_ENV_VAR: &str = "COMPOSITE_CATALOG";

/// Front-end defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CSV catalog to open; the builtin table is used when unset
    pub catalog_path: Option<PathBuf>,

    /// Preselected modulus unit
    pub modulus_unit: ModulusUnit,

    /// Preselected load unit
    pub load_unit: LoadUnit,

    /// Preselected area unit
    pub area_unit: AreaUnit,

    /// Preselected matrix material name
    pub default_matrix: Option<String>,

    /// Preselected reinforcement material name
    pub default_reinforcement: Option<String>,

    pub default_vol_fraction_matrix: f64,
    pub default_vol_fraction_reinforcement: f64,

    /// Initial applied load, in `load_unit`
    pub default_stress: f64,

    /// Initial area, in `area_unit`
    pub default_area: f64,

    /// Decimal places shown for forces and moduli
    pub decimals: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            catalog_path: None,
            modulus_unit: ModulusUnit::GPa,
            load_unit: LoadUnit::Newton,
            area_unit: AreaUnit::SquareMeter,
            default_matrix: None,
            default_reinforcement: None,
            default_vol_fraction_matrix: 0.5,
            default_vol_fraction_reinforcement: 0.5,
            default_stress: 100.0,
            default_area: 1.0,
            decimals: 2,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let text = std::fs::read_to_string(path).map_err(|e| {
            CalcError::file_error("open", &path_str, format!("Failed to read settings: {}", e))
        })?;
        let settings: Settings = serde_json::from_str(&text)?;

        debug!(path = %path_str, "loaded settings");
        Ok(settings)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(|key| env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(CATALOG_ENV_VAR) {
            if !value.trim().is_empty() {
                self.catalog_path = Some(PathBuf::from(value.trim()));
            }
        }
    }

    /// Open the configured catalog, or the builtin one.
    pub fn open_catalog(&self) -> CalcResult<MaterialCatalog> {
        match &self.catalog_path {
            Some(path) => MaterialCatalog::load_from_csv(path),
            None => {
                let catalog = MaterialCatalog::builtin();
                info!(materials = catalog.len(), "using builtin material catalog");
                Ok(catalog)
            }
        }
    }

    /// Format a value with the configured precision
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }
}

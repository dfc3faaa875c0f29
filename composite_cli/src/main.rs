//! # Composite CLI Application
//!
//! Terminal front end for the rule-of-mixtures force sharing calculator.
//!
//! ## Usage
//!
//! ```text
//! composite_cli                                   # interactive session
//! composite_cli materials --category matrix       # list catalog entries
//! composite_cli calc --matrix Epóxi --reinforcement "Fibra de Vidro E" \
//!     --vm 0.4 --vr 0.6 --load 100 --load-unit kgf --area 500 --area-unit cm² --json
//! ```
//!
//! Exit code 1 on any error.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use composite_core::calculations::CalculationRequest;
use composite_core::units::{AreaUnit, LoadUnit};
use composite_core::{CalcError, CalcResult, MaterialCatalog, MaterialCategory, MaterialRepository, Settings};

mod prompt;
mod render;
mod session;

use session::Session;

/// Composite force sharing calculator
#[derive(Parser)]
#[command(name = "composite_cli")]
#[command(version, about = "Rule-of-mixtures load sharing between matrix and reinforcement")]
struct Cli {
    /// Material catalog CSV (nome,tipo,modulo_elasticidade); builtin table when omitted
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Settings JSON file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Also print responses as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog materials
    Materials {
        /// Only show one category (matriz/matrix, reforço/reinforcement)
        #[arg(long)]
        category: Option<String>,
    },
    /// Run one calculation without prompts
    Calc {
        /// Matrix material name
        #[arg(long)]
        matrix: String,
        /// Reinforcement material name
        #[arg(long)]
        reinforcement: String,
        /// Matrix volume fraction
        #[arg(long, default_value_t = 0.5)]
        vm: f64,
        /// Reinforcement volume fraction
        #[arg(long, default_value_t = 0.5)]
        vr: f64,
        /// Applied load
        #[arg(long)]
        load: f64,
        /// Load unit (N, kgf)
        #[arg(long)]
        load_unit: Option<String>,
        /// Loaded area
        #[arg(long)]
        area: f64,
        /// Area unit (m², cm², mm²)
        #[arg(long)]
        area_unit: Option<String>,
        /// Modulus unit for reported moduli (GPa, N/m², Psi)
        #[arg(long)]
        modulus_unit: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> CalcResult<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.apply_env_overrides();
    if let Some(path) = &cli.catalog {
        settings.catalog_path = Some(path.clone());
    }
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn unit_or<T: std::str::FromStr<Err = CalcError>>(raw: Option<&str>, default: T) -> CalcResult<T> {
    raw.map(str::parse::<T>).transpose().map(|u| u.unwrap_or(default))
}

fn run_materials(catalog: &MaterialCatalog, category: Option<&str>) -> CalcResult<()> {
    let materials = match category {
        Some(raw) => catalog.get_by_category(MaterialCategory::from_str_flexible(raw)?),
        None => catalog.all(),
    };
    render::print_materials(&mut io::stdout(), &materials)
        .map_err(|e| CalcError::file_error("write", "<stdout>", e.to_string()))
}

#[allow(clippy::too_many_arguments)]
fn run_calc<W: Write>(
    out: &mut W,
    settings: Settings,
    catalog: MaterialCatalog,
    json: bool,
    matrix: &str,
    reinforcement: &str,
    vm: f64,
    vr: f64,
    load: f64,
    load_unit: Option<&str>,
    area: f64,
    area_unit: Option<&str>,
    modulus_unit: Option<&str>,
) -> CalcResult<()> {
    let (material_matrix, material_reinforcement) = catalog.resolve_pair(matrix, reinforcement)?;

    let request = CalculationRequest {
        material_matrix,
        material_reinforcement,
        modulus_unit: unit_or(modulus_unit, settings.modulus_unit)?,
        vol_fraction_matrix: vm,
        vol_fraction_reinforcement: vr,
        stress_value: load,
        stress_unit: unit_or::<LoadUnit>(load_unit, settings.load_unit)?,
        area_value: area,
        area_unit: unit_or::<AreaUnit>(area_unit, settings.area_unit)?,
    };

    let response = composite_core::calculate(&request)?;
    render::print_response(out, &request, &response, &settings)
        .and_then(|()| if json { render::print_json_section(out, &response) } else { Ok(()) })
        .map_err(|e| CalcError::file_error("write", "<stdout>", e.to_string()))
}

fn run(cli: Cli) -> CalcResult<()> {
    let settings = load_settings(&cli)?;
    let catalog = settings.open_catalog()?;

    match cli.command {
        Some(Commands::Materials { category }) => run_materials(&catalog, category.as_deref()),
        Some(Commands::Calc {
            matrix,
            reinforcement,
            vm,
            vr,
            load,
            load_unit,
            area,
            area_unit,
            modulus_unit,
        }) => run_calc(
            &mut io::stdout(),
            settings,
            catalog,
            cli.json,
            &matrix,
            &reinforcement,
            vm,
            vr,
            load,
            load_unit.as_deref(),
            area,
            area_unit.as_deref(),
            modulus_unit.as_deref(),
        ),
        None => {
            let mut session = Session::new(settings, catalog, cli.json);
            session
                .run(&mut io::stdin().lock(), &mut io::stdout())
                .map_err(|e| CalcError::file_error("read", "<stdin>", e.to_string()))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            render::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composite_core::units::ModulusUnit;

    #[test]
    fn test_cli_parses_calc() {
        let cli = Cli::try_parse_from([
            "composite_cli",
            "calc",
            "--matrix",
            "Epóxi",
            "--reinforcement",
            "Fibra de Vidro E",
            "--load",
            "10",
            "--load-unit",
            "kgf",
            "--area",
            "500",
            "--area-unit",
            "cm2",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Calc { vm, load_unit, .. }) => {
                assert_eq!(vm, 0.5);
                assert_eq!(load_unit.as_deref(), Some("kgf"));
            }
            _ => panic!("expected calc subcommand"),
        }
    }

    #[test]
    fn test_unit_or() {
        assert_eq!(unit_or(None, LoadUnit::Newton).unwrap(), LoadUnit::Newton);
        assert_eq!(unit_or(Some("kgf"), LoadUnit::Newton).unwrap(), LoadUnit::Kilogramforce);
        assert_eq!(unit_or(Some("Pa"), ModulusUnit::GPa).unwrap(), ModulusUnit::PascalSI);
        assert_eq!(unit_or(Some("ft2"), AreaUnit::SquareMeter).unwrap_err().error_code(), "INVALID_UNIT");
    }

    #[test]
    fn test_run_calc_with_builtin_catalog() {
        let mut out = Vec::new();
        let result = run_calc(
            &mut out,
            Settings::default(),
            MaterialCatalog::builtin(),
            true,
            "Epóxi",
            "Fibra de Vidro E",
            0.4,
            0.6,
            100.0,
            Some("N"),
            1.0,
            None,
            None,
        );
        assert!(result.is_ok());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("FORCE SHARING RESULTS"));
        assert!(text.contains("JSON Output (for LLM/API use):"));
        let json_start = text.find('{').unwrap();
        let response: composite_core::CalculationResponse = serde_json::from_str(&text[json_start..]).unwrap();
        assert_eq!(response.composition.matrix_percent, 40.0);
    }

    #[test]
    fn test_run_calc_text_only_without_json() {
        let mut out = Vec::new();
        run_calc(
            &mut out,
            Settings::default(),
            MaterialCatalog::builtin(),
            false,
            "PEEK",
            "Fibra de Carbono HS",
            0.5,
            0.5,
            10.0,
            Some("kgf"),
            500.0,
            Some("cm²"),
            None,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total force:         4.90 N"));
        assert!(!text.contains("JSON Output"));
    }

    #[test]
    fn test_run_calc_rejects_swapped_materials() {
        let err = run_calc(
            &mut Vec::new(),
            Settings::default(),
            MaterialCatalog::builtin(),
            false,
            "Fibra de Vidro E",
            "Epóxi",
            0.5,
            0.5,
            100.0,
            None,
            1.0,
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}

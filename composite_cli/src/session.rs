//! Interactive session: gather inputs, then calculate / edit / clear / quit.
//!
//! The session owns the last result; the core keeps nothing between calls.

use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;

use composite_core::calculations::{calculate, CalculationRequest, CalculationResponse, Composition};
use composite_core::units::{AreaUnit, LoadUnit, ModulusUnit};
use composite_core::{CalcResult, Material, MaterialCatalog, MaterialCategory, MaterialRepository, Settings};
use tracing::{debug, info};

use crate::prompt::{prompt_choice, prompt_f64, prompt_line, prompt_yes_no};
use crate::render;

const FRACTION_RANGE: RangeInclusive<f64> = 0.0..=1.0;
const FRACTION_HINT: &str = "Volume fraction must be between 0 and 1.";
const NON_NEGATIVE: RangeInclusive<f64> = 0.0..=f64::MAX;

/// What the user asked for at the action prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Calculate,
    Edit,
    Clear,
    Quit,
}

impl Action {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "c" | "calc" | "calculate" => Some(Action::Calculate),
            "e" | "edit" => Some(Action::Edit),
            "x" | "clear" => Some(Action::Clear),
            "q" | "quit" | "exit" => Some(Action::Quit),
            _ => None,
        }
    }
}

pub struct Session {
    settings: Settings,
    catalog: MaterialCatalog,
    last: Option<CalculationResponse>,
    json: bool,
}

impl Session {
    pub fn new(settings: Settings, catalog: MaterialCatalog, json: bool) -> Self {
        Session {
            settings,
            catalog,
            last: None,
            json,
        }
    }

    /// Last successful result, if not cleared
    pub fn last_result(&self) -> Option<&CalculationResponse> {
        self.last.as_ref()
    }

    fn choose_material<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
        category: MaterialCategory,
        preferred: Option<&str>,
    ) -> io::Result<Option<Material>> {
        let materials = self.catalog.get_by_category(category);
        if materials.is_empty() {
            writeln!(out, "No {} materials in the catalog.", category.display_name().to_lowercase())?;
            return Ok(None);
        }

        let names: Vec<&str> = materials.iter().map(|m| m.name.as_str()).collect();
        let default = preferred
            .and_then(|p| {
                let p = p.trim().to_lowercase();
                names.iter().position(|n| n.to_lowercase() == p)
            })
            .unwrap_or(0);

        let title = format!("{} material:", category.display_name());
        let idx = prompt_choice(input, out, &title, &names, default)?;
        Ok(materials.into_iter().nth(idx))
    }

    /// Prompt for every input of a calculation request.
    pub fn gather_request<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<Option<CalculationRequest>> {
        let s = &self.settings;

        let Some(material_matrix) =
            self.choose_material(input, out, MaterialCategory::Matrix, s.default_matrix.as_deref())?
        else {
            return Ok(None);
        };
        let Some(material_reinforcement) = self.choose_material(
            input,
            out,
            MaterialCategory::Reinforcement,
            s.default_reinforcement.as_deref(),
        )?
        else {
            return Ok(None);
        };

        let modulus_labels: Vec<&str> = ModulusUnit::ALL.iter().map(|u| u.label()).collect();
        let default_modulus = ModulusUnit::ALL.iter().position(|&u| u == s.modulus_unit).unwrap_or(0);
        let modulus_unit =
            ModulusUnit::ALL[prompt_choice(input, out, "Elastic modulus unit:", &modulus_labels, default_modulus)?];

        writeln!(
            out,
            "Matrix: {} (E = {} {})",
            material_matrix.name,
            s.format_value(material_matrix.modulus_in(modulus_unit)),
            modulus_unit
        )?;
        writeln!(
            out,
            "Reinforcement: {} (E = {} {})",
            material_reinforcement.name,
            s.format_value(material_reinforcement.modulus_in(modulus_unit)),
            modulus_unit
        )?;

        let vol_fraction_matrix = prompt_f64(
            input,
            out,
            &format!("Matrix volume fraction [{}]: ", s.default_vol_fraction_matrix),
            s.default_vol_fraction_matrix,
            FRACTION_RANGE,
            FRACTION_HINT,
        )?;
        let vol_fraction_reinforcement = prompt_f64(
            input,
            out,
            &format!("Reinforcement volume fraction [{}]: ", s.default_vol_fraction_reinforcement),
            s.default_vol_fraction_reinforcement,
            FRACTION_RANGE,
            FRACTION_HINT,
        )?;
        render::print_composition(out, &Composition::from_fractions(vol_fraction_matrix, vol_fraction_reinforcement))?;

        let load_labels: Vec<&str> = LoadUnit::ALL.iter().map(|u| u.label()).collect();
        let default_load = LoadUnit::ALL.iter().position(|&u| u == s.load_unit).unwrap_or(0);
        let stress_unit = LoadUnit::ALL[prompt_choice(input, out, "Load unit:", &load_labels, default_load)?];
        let stress_value = prompt_f64(
            input,
            out,
            &format!("Applied load ({}) [{}]: ", stress_unit, s.default_stress),
            s.default_stress,
            NON_NEGATIVE,
            "Load cannot be negative.",
        )?;

        let area_labels: Vec<&str> = AreaUnit::ALL.iter().map(|u| u.label()).collect();
        let default_area = AreaUnit::ALL.iter().position(|&u| u == s.area_unit).unwrap_or(0);
        let area_unit = AreaUnit::ALL[prompt_choice(input, out, "Area unit:", &area_labels, default_area)?];
        let area_value = prompt_f64(
            input,
            out,
            &format!("Area ({}) [{}]: ", area_unit, s.default_area),
            s.default_area,
            NON_NEGATIVE,
            "Area cannot be negative.",
        )?;

        Ok(Some(CalculationRequest {
            material_matrix,
            material_reinforcement,
            modulus_unit,
            vol_fraction_matrix,
            vol_fraction_reinforcement,
            stress_value,
            stress_unit,
            area_value,
            area_unit,
        }))
    }

    /// Run one request, caching the result on success.
    ///
    /// The calculation error, if any, is printed and handed back so the
    /// caller can decide whether re-entering the inputs helps.
    pub fn execute<W: Write>(&mut self, out: &mut W, request: &CalculationRequest) -> io::Result<CalcResult<()>> {
        match calculate(request) {
            Ok(response) => {
                render::print_response(out, request, &response, &self.settings)?;
                if self.json {
                    render::print_json_section(out, &response)?;
                }
                self.last = Some(response);
                Ok(Ok(()))
            }
            Err(e) => {
                render::print_error(&e);
                Ok(Err(e))
            }
        }
    }

    /// Gather inputs, then loop over the session actions.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> io::Result<()> {
        writeln!(out, "Composite Force Sharing Calculator")?;
        writeln!(out, "==================================")?;
        writeln!(out)?;

        let Some(request) = self.gather_request(input, out)? else {
            return Ok(());
        };
        self.action_loop(input, out, request)
    }

    /// Calculate / edit / clear / quit over an already gathered request.
    pub fn action_loop<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
        mut request: CalculationRequest,
    ) -> io::Result<()> {
        debug!(?request, "inputs gathered");

        loop {
            writeln!(out)?;
            let Some(answer) = prompt_line(input, out, "[c]alculate, [e]dit inputs, [x] clear results, [q]uit: ")
            else {
                break;
            };
            let edit = match Action::parse(&answer) {
                Some(Action::Calculate) => match self.execute(out, &request)? {
                    Ok(()) => false,
                    Err(e) if e.is_recoverable() => {
                        prompt_yes_no(input, out, "Re-enter the inputs?", true)
                    }
                    Err(_) => false,
                },
                Some(Action::Edit) => true,
                Some(Action::Clear) => {
                    self.last = None;
                    info!("results cleared");
                    writeln!(out, "Results cleared.")?;
                    false
                }
                Some(Action::Quit) => break,
                None => {
                    writeln!(out, "Unknown action '{}'", answer)?;
                    false
                }
            };

            if edit {
                writeln!(out)?;
                if let Some(updated) = self.gather_request(input, out)? {
                    debug!(?updated, "inputs edited");
                    request = updated;
                }
            }
        }
        Ok(())
    }
}

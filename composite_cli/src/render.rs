//! Terminal output for materials, composition, and results.

use std::io::{self, Write};

use composite_core::calculations::{CalculationRequest, CalculationResponse, Composition};
use composite_core::{CalcError, Material, Settings};

const BAR_WIDTH: usize = 30;

/// Print a catalog listing
pub fn print_materials<W: Write>(out: &mut W, materials: &[Material]) -> io::Result<()> {
    writeln!(out, "{:<28} {:<10} {:>10}", "Name", "Type", "E (GPa)")?;
    writeln!(out, "{}", "─".repeat(50))?;
    for m in materials {
        writeln!(out, "{:<28} {:<10} {:>10.1}", m.name, m.category.code(), m.elastic_modulus_gpa)?;
    }
    Ok(())
}

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

/// Print the volume composition as a horizontal bar chart
pub fn print_composition<W: Write>(out: &mut W, composition: &Composition) -> io::Result<()> {
    writeln!(out, "Composition (%)")?;
    writeln!(
        out,
        "  Matrix        |{}| {:.1}%",
        bar(composition.matrix_percent),
        composition.matrix_percent
    )?;
    writeln!(
        out,
        "  Reinforcement |{}| {:.1}%",
        bar(composition.reinforcement_percent),
        composition.reinforcement_percent
    )?;
    if !composition.is_complete() {
        writeln!(
            out,
            "  [WARN] Volume fractions sum to {:.3}, not 1.000",
            composition.volume_sum
        )?;
    }
    Ok(())
}

/// Print a calculation response
pub fn print_response<W: Write>(
    out: &mut W,
    request: &CalculationRequest,
    response: &CalculationResponse,
    settings: &Settings,
) -> io::Result<()> {
    let fmt = |v: f64| settings.format_value(v);
    let r = &response.result;

    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(out, "  FORCE SHARING RESULTS")?;
    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(out)?;
    writeln!(out, "Input:")?;
    writeln!(
        out,
        "  Matrix:        {} (E = {} {})",
        request.material_matrix.name,
        fmt(response.modulus_matrix),
        response.modulus_unit
    )?;
    writeln!(
        out,
        "  Reinforcement: {} (E = {} {})",
        request.material_reinforcement.name,
        fmt(response.modulus_reinforcement),
        response.modulus_unit
    )?;
    writeln!(
        out,
        "  Volume:        Vm = {:.2}, Vr = {:.2}",
        request.vol_fraction_matrix, request.vol_fraction_reinforcement
    )?;
    writeln!(out, "  Load:          {} {}", request.stress_value, request.stress_unit)?;
    writeln!(out, "  Area:          {} {}", request.area_value, request.area_unit)?;
    writeln!(out)?;
    writeln!(out, "Forces:")?;
    writeln!(out, "  Total force:         {} N", fmt(r.total_force))?;
    writeln!(
        out,
        "  Matrix force:        {} N ({:.1}%)",
        fmt(r.matrix_force),
        r.matrix_share() * 100.0
    )?;
    writeln!(
        out,
        "  Reinforcement force: {} N ({:.1}%)",
        fmt(r.reinforcement_force),
        r.reinforcement_share() * 100.0
    )?;
    writeln!(out, "═══════════════════════════════════════")?;
    Ok(())
}

/// Print a response as pretty JSON
pub fn print_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => writeln!(out, "{}", json),
        Err(e) => writeln!(out, "(JSON unavailable: {})", e),
    }
}

/// Print the JSON block that follows a text response
pub fn print_json_section<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "JSON Output (for LLM/API use):")?;
    print_json(out, value)
}

/// Print an error in plain text and as JSON to stderr
pub fn print_error(err: &CalcError) {
    eprintln!("Error: {}", err);
    if let Ok(json) = serde_json::to_string_pretty(err) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(50.0).chars().filter(|&c| c == '█').count(), BAR_WIDTH / 2);
        assert_eq!(bar(150.0).chars().filter(|&c| c == '█').count(), BAR_WIDTH);
    }

    #[test]
    fn test_composition_warns_on_incomplete_sum() {
        let mut out = Vec::new();
        print_composition(&mut out, &Composition::from_fractions(0.3, 0.3)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("30.0%"));
        assert!(text.contains("[WARN]"));
    }
}

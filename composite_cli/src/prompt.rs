//! Line-oriented prompts over any reader/writer pair.

use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;

/// Print `prompt` and read one trimmed line. `None` on EOF or I/O error.
pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Option<String> {
    write!(out, "{}", prompt).ok()?;
    out.flush().ok()?;

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Read a number within `range`.
///
/// Blank input takes `default`; a decimal comma is accepted. Unparseable or
/// out-of-range entries print `hint` and ask again. EOF returns `default`.
pub fn prompt_f64<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    default: f64,
    range: RangeInclusive<f64>,
    hint: &str,
) -> io::Result<f64> {
    loop {
        let Some(answer) = prompt_line(input, out, prompt) else {
            return Ok(default);
        };

        let value = if answer.is_empty() {
            default
        } else {
            match answer.replace(',', ".").parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    writeln!(out, "  '{}' is not a number. {}", answer, hint)?;
                    continue;
                }
            }
        };

        if value.is_finite() && range.contains(&value) {
            return Ok(value);
        }
        writeln!(out, "  {} rejected. {}", value, hint)?;
    }
}

/// Show a numbered menu and return the chosen index.
///
/// Accepts the 1-based number or the option's text (case-insensitive).
/// Anything else selects `default`.
pub fn prompt_choice<R: BufRead, W: Write, T: AsRef<str>>(
    input: &mut R,
    out: &mut W,
    title: &str,
    options: &[T],
    default: usize,
) -> io::Result<usize> {
    writeln!(out, "{}", title)?;
    for (i, option) in options.iter().enumerate() {
        let marker = if i == default { "*" } else { " " };
        writeln!(out, " {}{:>2}. {}", marker, i + 1, option.as_ref())?;
    }

    let Some(answer) = prompt_line(input, out, &format!("Select [{}]: ", default + 1)) else {
        return Ok(default);
    };

    if let Ok(n) = answer.parse::<usize>() {
        if (1..=options.len()).contains(&n) {
            return Ok(n - 1);
        }
    }
    let answer = answer.to_lowercase();
    Ok(options
        .iter()
        .position(|o| o.as_ref().to_lowercase() == answer)
        .unwrap_or(default))
}

/// Ask a yes/no question. Blank input and EOF take `default`.
pub fn prompt_yes_no<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str, default: bool) -> bool {
    let suffix = if default { "[Y/n]" } else { "[y/N]" };
    match prompt_line(input, out, &format!("{} {} ", question, suffix)) {
        Some(answer) => match answer.to_lowercase().as_str() {
            "y" | "yes" | "s" | "sim" => true,
            "n" | "no" | "não" | "nao" => false,
            _ => default,
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const FRACTION_HINT: &str = "Enter a value between 0 and 1.";

    #[test]
    fn test_prompt_f64_parses_and_defaults() {
        let mut out = Vec::new();
        let mut input = Cursor::new("12.5\n\n0,25\n");
        let any = 0.0..=f64::MAX;
        assert_eq!(prompt_f64(&mut input, &mut out, "> ", 1.0, any.clone(), "").unwrap(), 12.5);
        assert_eq!(prompt_f64(&mut input, &mut out, "> ", 1.0, any.clone(), "").unwrap(), 1.0);
        assert_eq!(prompt_f64(&mut input, &mut out, "> ", 2.0, any.clone(), "").unwrap(), 0.25);
        // EOF
        assert_eq!(prompt_f64(&mut input, &mut out, "> ", 3.0, any, "").unwrap(), 3.0);
    }

    #[test]
    fn test_prompt_f64_reprompts_out_of_range() {
        let mut out = Vec::new();
        let mut input = Cursor::new("1.5\nabc\n-0.1\nNaN\n0.3\n");
        let value = prompt_f64(&mut input, &mut out, "Vm: ", 0.5, 0.0..=1.0, FRACTION_HINT).unwrap();
        assert_eq!(value, 0.3);

        let shown = String::from_utf8(out).unwrap();
        assert_eq!(shown.matches(FRACTION_HINT).count(), 4);
        assert!(shown.contains("1.5 rejected."));
        assert!(shown.contains("'abc' is not a number."));
    }

    #[test]
    fn test_prompt_f64_rejects_negative_load() {
        let mut out = Vec::new();
        let mut input = Cursor::new("-100\n100\n");
        let value = prompt_f64(&mut input, &mut out, "Load: ", 1.0, 0.0..=f64::MAX, "Must be >= 0.").unwrap();
        assert_eq!(value, 100.0);
    }

    #[test]
    fn test_prompt_f64_eof_after_bad_entry_keeps_default() {
        let mut out = Vec::new();
        let mut input = Cursor::new("7\n");
        assert_eq!(prompt_f64(&mut input, &mut out, "Vr: ", 0.5, 0.0..=1.0, FRACTION_HINT).unwrap(), 0.5);
    }

    #[test]
    fn test_prompt_choice() {
        let options = ["GPa", "N/m²", "Psi"];
        let mut out = Vec::new();

        let mut input = Cursor::new("2\n");
        assert_eq!(prompt_choice(&mut input, &mut out, "Unit", &options, 0).unwrap(), 1);

        let mut input = Cursor::new("psi\n");
        assert_eq!(prompt_choice(&mut input, &mut out, "Unit", &options, 0).unwrap(), 2);

        let mut input = Cursor::new("9\n");
        assert_eq!(prompt_choice(&mut input, &mut out, "Unit", &options, 0).unwrap(), 0);

        let mut input = Cursor::new("");
        assert_eq!(prompt_choice(&mut input, &mut out, "Unit", &options, 1).unwrap(), 1);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains(" * 1. GPa"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_prompt_choice_propagates_write_error() {
        let mut input = Cursor::new("1\n");
        let err = prompt_choice(&mut input, &mut BrokenPipe, "Unit", &["GPa"], 0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_prompt_yes_no() {
        let mut out = Vec::new();
        let mut input = Cursor::new("y\nn\n\nsim\n");
        assert!(prompt_yes_no(&mut input, &mut out, "Edit?", false));
        assert!(!prompt_yes_no(&mut input, &mut out, "Edit?", true));
        assert!(prompt_yes_no(&mut input, &mut out, "Edit?", true));
        assert!(prompt_yes_no(&mut input, &mut out, "Edit?", false));
        // EOF
        assert!(!prompt_yes_no(&mut input, &mut out, "Edit?", false));
    }
}

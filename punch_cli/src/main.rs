//! # Punchplan CLI Application
//!
//! Terminal front-end for the punch layout engine. Pass a JSON profile spec
//! as the first argument, or run with no arguments for a quick interactive
//! demo of a canonical bearer.

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

use punch_core::clash::{detect_clashes, Diagnostics, Severity};
use punch_core::csv::{encode_csv, CsvMeta};
use punch_core::engine::LayoutEngine;
use punch_core::profile::{HoleType, KpaRating, ProfileSpec, ProfileVariant};
use punch_core::span_table::advise;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_char(prompt: &str, default: char) -> char {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().chars().next().unwrap_or(default)
}

fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    println!("Punchplan CLI - NC Punch Program Planner");
    println!("========================================");
    println!();

    let spec = match env::args().nth(1) {
        Some(path) => match load_spec(&path) {
            Ok(spec) => spec,
            Err(message) => {
                eprintln!("Error: {message}");
                std::process::exit(1);
            }
        },
        None => interactive_spec(),
    };

    report(spec);
}

fn load_spec(path: &str) -> Result<ProfileSpec, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("cannot read '{path}': {e}"))?;
    serde_json::from_str(&json).map_err(|e| format!("'{path}' is not a profile spec: {e}"))
}

fn interactive_spec() -> ProfileSpec {
    println!("No spec file given. Running interactive demo...");
    println!();

    let role = prompt_char("Member type, bearer or joist [B/j]: ", 'b');
    let length = prompt_f64("Member length (mm) [5200]: ", 5200.0) as u32;
    let joist_spacing = prompt_f64("Joist spacing (mm) [600]: ", 600.0) as u32;
    let kpa = prompt_f64("Load rating (kPa, 0 for none) [2.5]: ", 2.5);

    let variant = if role.eq_ignore_ascii_case(&'j') {
        ProfileVariant::JoistSingle
    } else {
        ProfileVariant::BearerSingle
    };

    let mut spec = ProfileSpec::new(variant, length);
    spec.joist_spacing_mm = joist_spacing;
    spec.kpa_rating = KpaRating::try_from(kpa).ok();
    if variant.is_bearer() {
        spec.stubs_enabled = true;
        spec.stub_positions = vec![331];
    } else {
        spec.hole_type = HoleType::R200;
    }
    spec
}

fn report(spec: ProfileSpec) {
    println!();
    if let Some(rating) = spec.kpa_rating {
        let span = match spec.joist_length_mm {
            Some(joist_length) if spec.variant.is_bearer() => joist_length,
            _ => spec.length_mm,
        };
        let advice = advise(span as f64, rating);
        println!(
            "Span table ({rating}): {} at {} mm centres{}",
            advice.variant,
            advice.joist_spacing_mm,
            if advice.exceeds_limit {
                " - EXCEEDS TABLE LIMIT"
            } else {
                ""
            }
        );
        println!();
    }

    let engine = match LayoutEngine::new(spec) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            std::process::exit(1);
        }
    };

    let layout = engine.calculations();
    let diagnostics = detect_clashes(layout, engine.spec());

    println!("═══════════════════════════════════════");
    println!("  PUNCH LAYOUT - {}", engine.part_code());
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Member:   {}", engine.spec().variant);
    println!("  Length:   {} mm", engine.spec().length_mm);
    println!("  Openings: {:.1} mm centres", layout.opening_centres_mm);
    println!();
    println!("Punches:");
    println!("  Bolt holes:    {:>3}", layout.bolt_holes.len());
    println!("  Dimples:       {:>3}", layout.dimples.len());
    println!("  Web tabs:      {:>3}", layout.web_tabs.len());
    println!("  Service holes: {:>3}", layout.service_holes.len());
    println!("  Stubs:         {:>3}", layout.stubs.len());
    println!();

    print_diagnostics(&diagnostics);

    println!();
    println!("═══════════════════════════════════════");
    println!(
        "  RESULT: {} ({} errors, {} warnings)",
        if diagnostics.is_export_ready() {
            "READY TO EXPORT"
        } else {
            "EXPORT BLOCKED"
        },
        diagnostics.error_count,
        diagnostics.warning_count
    );
    println!("═══════════════════════════════════════");
    println!();

    println!("Press program:");
    println!(
        "{}",
        encode_csv(layout, &CsvMeta::new(engine.part_code(), 1))
    );

    println!();
    println!("JSON Output (for host/API use):");
    if let Ok(json) = serde_json::to_string_pretty(layout) {
        println!("{}", json);
    }
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    if diagnostics.is_clean() {
        println!("Checks: no clashes found {}", status_icon(true));
        return;
    }
    println!("Checks:");
    for item in &diagnostics.items {
        println!(
            "  {} {}",
            status_icon(item.severity != Severity::Error),
            item.message
        );
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

//! # Flange Genie CLI
//!
//! Terminal front-end for the flange bolting engine: loads a flange
//! definition, optionally runs the bolt optimizer, and prints a report
//! followed by the JSON results.
//!
//! Set `RUST_LOG=flange_core=debug` to trace optimizer candidates.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flange_core::calculations::optimizer::{optimize_and_commit, reset_and_optimize};
use flange_core::inputs::GasketSuggestions;
use flange_core::{evaluate_with, CalcError, CalcResult, CalculationResults, EngineSettings, FlangeInputs, OptimizationOutcome, ReferenceTables};

#[derive(Parser, Debug)]
#[command(name = "flange_cli", version, about = "Flange bolting and gasket geometry report")]
struct Args {
    /// Flange inputs (JSON); the built-in default flange when omitted
    #[arg(long, short = 'i')]
    inputs: Option<PathBuf>,

    /// Reference tables (JSON, or TOML for any other extension)
    #[arg(long, short = 't')]
    tables: Option<PathBuf>,

    /// Engine settings (TOML)
    #[arg(long, short = 's')]
    settings: Option<PathBuf>,

    /// Search bolt size × count for the smallest bolt circle before reporting
    #[arg(long)]
    optimize: bool,

    /// Keep the current bolt size during the search
    #[arg(long, requires = "optimize")]
    fixed_size: bool,

    /// Recompute g0/g1, clear manual geometry, then run a full search
    #[arg(long, conflicts_with = "optimize")]
    reset: bool,

    /// Print only the JSON results
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "flange_core=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> CalcResult<()> {
    let owned_tables = args.tables.as_deref().map(ReferenceTables::load).transpose()?;
    let tables = match &owned_tables {
        Some(t) => t,
        None => ReferenceTables::standard()?,
    };
    let settings = match &args.settings {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };
    let mut inputs = match &args.inputs {
        Some(path) => load_inputs(path)?,
        None => FlangeInputs::default(),
    };
    inputs.validate()?;
    tracing::info!(item = %inputs.item_no, "flange inputs loaded");

    let outcome = if args.reset {
        Some(reset_and_optimize(&mut inputs, tables, &settings))
    } else if args.optimize {
        Some(optimize_and_commit(&mut inputs, tables, args.fixed_size, &settings))
    } else {
        None
    };

    let results = evaluate_with(&inputs, tables, &settings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if let Some(outcome) = &outcome {
        print_optimization(outcome);
    }
    print_report(&inputs, &results);

    println!();
    println!("JSON Output:");
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn load_inputs(path: &Path) -> CalcResult<FlangeInputs> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

fn print_optimization(outcome: &OptimizationOutcome) {
    println!("Optimizer ({}):", outcome.mode());
    match outcome {
        OptimizationOutcome::Found {
            size_in,
            count,
            min_bcd_mm,
            evaluations,
            ..
        } => {
            println!("  Best:  {} in × {} bolts, BCD {:.1} mm", size_in, count, min_bcd_mm);
            println!("  Tried: {} configurations", evaluations);
        }
        OptimizationOutcome::NotFound { evaluations, .. } => {
            println!("  No feasible configuration in {} tries; inputs unchanged", evaluations);
        }
    }
    println!();
}

fn print_report(inputs: &FlangeInputs, r: &CalculationResults) {
    let g = &r.geometry;
    let l = &r.bolt_load;

    println!("═══════════════════════════════════════");
    println!("  FLANGE {} - {}", inputs.item_no, inputs.part_name);
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Design:   {} {} @ {} {}", inputs.design_pressure, inputs.pressure_unit, inputs.design_temp, inputs.temp_unit);
    println!("  Shell:    ID {:.1} mm, g0 {:.1} / g1 {:.1} mm, {}", inputs.inside_dia_mm, inputs.g0_mm, inputs.g1_mm, inputs.shell_material);
    println!("  Bolting:  {} × {} in, {}", inputs.bolt_count, inputs.bolt_size_in, inputs.bolt_material);
    println!("  Gasket:   {} (sketch {})", inputs.gasket_type, inputs.facing_sketch);
    println!();
    println!("Geometry:");
    println!("  BCD M1 (bolt pitch):      {:.1} mm", g.bcd_method1_mm);
    println!("  BCD M2 (radial distance): {:.1} mm", g.bcd_method2_mm);
    println!("  BCD M3 (gasket):          {:.1} mm", g.bcd_method3_mm);
    println!(
        "  Final BCD: {:.1} mm ({}{})",
        g.final_bcd_mm,
        g.bcd_source,
        if g.bcd_manual { ", manual" } else { "" }
    );
    println!("  Flange OD: {:.1} mm", g.final_od_mm);
    println!("  Seating:   {:.1} - {:.1} mm (gasket {:.1} - {:.1} mm)", g.seating_id_mm, g.seating_od_mm, g.gasket_id_mm, g.gasket_od_mm);
    println!("  b0 / b / G: {:.2} / {:.3} / {:.2} mm", g.basic_width_mm, g.effective_width_mm, g.gasket_mean_dia_mm);
    println!(
        "  Pitch:     {:.2} mm (min {:.2}, max {:.2}) {}",
        g.geometric_pitch_mm,
        g.min_bolt_spacing_mm,
        g.max_bolt_spacing_mm,
        status_icon(g.spacing_ok)
    );
    println!();
    println!("Bolt Loads:");
    println!("  H   = {:.0} N", l.h_force_n);
    println!("  Hp  = {:.0} N", l.hp_force_n);
    println!("  Wm1 = {:.0} N", l.wm1_n);
    println!("  Wm2 = {:.0} N", l.wm2_n);
    println!(
        "  Sb:  {:.1} MPa design / {:.1} MPa ambient{}",
        l.design_stress_mpa,
        l.ambient_stress_mpa,
        if l.ambient_stress_fallback { " (fallback)" } else { "" }
    );
    println!("  Am = {:.0} mm² vs Ab = {:.0} mm²", l.required_bolt_area_mm2, l.total_bolt_area_mm2);
    println!(
        "  Capacity: {:.0} N vs {:.0} N ({:+.1}%) {}",
        l.total_bolt_load_design_n,
        r.required_load_n,
        r.margin_percent,
        status_icon(r.is_safe)
    );

    if let Some(p) = &r.pcc1 {
        println!();
        println!("PCC-1 Assembly Bolt Stress:");
        println!("  Sb_sel = {:.1} MPa (calculated {:.1})", p.sb_sel_mpa, p.sb_sel_calc_mpa);
        for (label, check) in [
            ("Step 5 (Sgmin-S)", &p.step5),
            ("Step 6 (Sgmin-O)", &p.step6),
            ("Step 7 (Sgmax)", &p.step7),
            ("Step 8 (flange)", &p.step8),
        ] {
            let threshold = check.threshold_mpa.map_or_else(|| "-".to_string(), |t| format!("{:.1}", t));
            println!("  {:<17} limit {:>7} {}", label, threshold, status_icon(check.passed));
        }
    }

    let suggestions = GasketSuggestions::from_results(inputs, r);
    println!();
    println!("Gasket Suggestions:");
    for s in [&suggestions.bcd_side, &suggestions.shell_side] {
        println!("  {:<5} seating {:.2} - {:.2} mm", s.preference.to_string(), s.seating_id_mm, s.seating_od_mm);
    }

    println!();
    println!("═══════════════════════════════════════");
    println!(
        "  RESULT: {} (governs: {})",
        if r.passes() { "PASS" } else { "FAIL" },
        r.governing_condition()
    );
    println!("═══════════════════════════════════════");
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

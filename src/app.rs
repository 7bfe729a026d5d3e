//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the fit pipeline
//! - prints the report
//! - writes the surface/best-fit/heat-map outputs

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs, SynthArgs};
use crate::data::SynthOptions;
use crate::domain::{Cosmology, FitConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ripfit` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `ripfit` (and `ripfit --data-dir ...`) to behave like
    // `ripfit fit ...`. Clap requires a subcommand name, so we do a small,
    // explicit rewrite of the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    print!("{}", crate::report::format_run_summary(&run, &config));
    println!("{}", crate::report::format_best_fit(&run.best, run.observed.len()));

    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::input(format!(
            "Failed to create output directory '{}': {e}",
            config.out_dir.display()
        ))
    })?;

    let surface_path = config.out_dir.join("rip_Hz_chi2_surface.csv");
    crate::io::export::write_surface_csv(&surface_path, &run.surface)?;

    let bestfit_path = config.out_dir.join("rip_Hz_bestfit.csv");
    crate::io::export::write_bestfit_csv(&bestfit_path, &run.best)?;

    println!("Wrote {}", surface_path.display());
    println!("Wrote {}", bestfit_path.display());

    if let Some(path) = &config.export_fit {
        let fit = pipeline::fit_file(&config, &run);
        crate::io::export::write_fit_json(path, &fit)?;
        println!("Wrote {}", path.display());
    }

    if config.plot {
        let png_path = config.out_dir.join("rip_gridsearch_heatmap.png");
        crate::plot::render_heatmap(
            &png_path,
            &run.surface,
            &run.best,
            config.plot_width,
            config.plot_height,
        )?;
        println!("Wrote {}", png_path.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let surface = crate::io::export::read_surface_csv(&args.surface)?;
    let best = surface.best_fit();

    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::input(format!(
                    "Failed to create output directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
    }

    crate::plot::render_heatmap(&args.out, &surface, &best, args.width, args.height)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let opts = SynthOptions {
        runs: args.runs,
        duration_myr: args.duration_myr,
        step_myr: args.step_myr,
        seed: args.seed,
        noise: args.noise,
    };
    let paths = crate::data::write_synthetic_runs(&args.out_dir, &opts)?;
    println!("Wrote {} synthetic runs under {}", paths.len(), args.out_dir.display());
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        data_dir: args.data_dir.clone(),
        out_dir: args.out_dir.clone(),
        omega_min: args.omega_min,
        omega_max: args.omega_max,
        omega_step: args.omega_step,
        w_min: args.w_min,
        w_max: args.w_max,
        w_step: args.w_step,
        cosmology: Cosmology {
            h0: args.h0,
            omega_m: args.omega_m,
            omega_r: args.omega_r,
        },
        z_min: args.z_min,
        z_max: args.z_max,
        z_samples: args.z_samples,
        extrapolation: args.extrapolation,
        v0_floor: args.v0_floor,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_fit: args.export_fit.clone(),
    }
}

/// Rewrite argv so `ripfit` defaults to `ripfit fit`.
///
/// Rules:
/// - `ripfit`                        -> `ripfit fit`
/// - `ripfit --data-dir sims ...`    -> `ripfit fit --data-dir sims ...`
/// - `ripfit --help/--version/-h`    -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "plot" | "synth");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ExtrapolationPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ripfit", version, about = "Rip-field dark-energy H(z) grid-search fitter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Average the simulation runs, sweep the (Omega_rip_0, w) grid against
    /// the cosmic-chronometer H(z) data, and write surface/best-fit/heat-map
    /// outputs.
    Fit(FitArgs),
    /// Re-render the heat map from a previously saved chi-square surface CSV.
    Plot(PlotArgs),
    /// Generate synthetic run_*.csv files (stand-in for the external simulator).
    Synth(SynthArgs),
}

/// Options for the grid-search fit.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Directory holding run_*.csv simulation outputs.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Output directory for the surface CSV, best-fit CSV, and heat map.
    #[arg(long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Minimum Omega_rip_0 candidate.
    #[arg(long, default_value_t = 0.60)]
    pub omega_min: f64,

    /// Maximum Omega_rip_0 candidate.
    #[arg(long, default_value_t = 0.78)]
    pub omega_max: f64,

    /// Omega_rip_0 grid increment.
    #[arg(long, default_value_t = 0.005)]
    pub omega_step: f64,

    /// Minimum w (evolution index) candidate.
    #[arg(long, default_value_t = 0.50)]
    pub w_min: f64,

    /// Maximum w candidate.
    #[arg(long, default_value_t = 1.00)]
    pub w_max: f64,

    /// w grid increment.
    #[arg(long, default_value_t = 0.05)]
    pub w_step: f64,

    /// Hubble constant H0 (km/s/Mpc).
    #[arg(long, default_value_t = 67.66)]
    pub h0: f64,

    /// Matter density fraction Omega_m.
    #[arg(long, default_value_t = 0.30966)]
    pub omega_m: f64,

    /// Radiation density fraction Omega_r.
    #[arg(long, default_value_t = 9.24e-5)]
    pub omega_r: f64,

    /// Lowest redshift in the age-lookup grid.
    #[arg(long, default_value_t = 0.01)]
    pub z_min: f64,

    /// Highest redshift in the age-lookup grid.
    #[arg(long, default_value_t = 10.0)]
    pub z_max: f64,

    /// Number of samples in the age-lookup grid.
    #[arg(long, default_value_t = 8000)]
    pub z_samples: usize,

    /// Policy for observed redshifts outside the simulated range.
    #[arg(long, value_enum, default_value_t = ExtrapolationPolicy::Clamp)]
    pub extrapolation: ExtrapolationPolicy,

    /// Smallest acceptable |field value| at the z≈0 reference index.
    #[arg(long, default_value_t = 1e-12)]
    pub v0_floor: f64,

    /// Skip the heat-map PNG (rendered by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Heat-map width (pixels).
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Heat-map height (pixels).
    #[arg(long, default_value_t = 900)]
    pub height: u32,

    /// Export fit metadata + best fit to JSON.
    #[arg(long = "export-fit", value_name = "JSON")]
    pub export_fit: Option<PathBuf>,
}

/// Options for re-plotting a saved surface.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Surface CSV produced by `ripfit fit`.
    #[arg(long, value_name = "CSV")]
    pub surface: PathBuf,

    /// Output PNG path.
    #[arg(long, default_value = "out/rip_gridsearch_heatmap.png")]
    pub out: PathBuf,

    /// Heat-map width (pixels).
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Heat-map height (pixels).
    #[arg(long, default_value_t = 900)]
    pub height: u32,
}

/// Options for synthetic run generation.
#[derive(Debug, Parser)]
pub struct SynthArgs {
    /// Directory to write run_*.csv files into.
    #[arg(long, default_value = "data")]
    pub out_dir: PathBuf,

    /// Number of runs.
    #[arg(long, default_value_t = 10)]
    pub runs: usize,

    /// Simulated duration (Myr).
    #[arg(long, default_value_t = 13_800.0)]
    pub duration_myr: f64,

    /// Output cadence (Myr).
    #[arg(long, default_value_t = 100.0)]
    pub step_myr: f64,

    /// RNG seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Relative per-point noise (standard deviation).
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,
}

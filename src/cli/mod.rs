//! Command-line parsing for the bench calculators.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the chemistry/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::WeightMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "benchtop",
    version,
    about = "Bench chemistry calculators: buffer titration recipes and Michaelis-Menten fitting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Solve a buffer adjustment recipe (stock buffer + titrant + water).
    Buffer(BufferArgs),
    /// Fit the Michaelis-Menten model to a kinetics CSV and report
    /// parameters, errors, and R².
    Fit(FitArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Generate a synthetic kinetics dataset CSV (seeded, reproducible).
    Sample(SampleArgs),
}

/// Options for the buffer recipe solver.
///
/// Values are taken as text and parsed by the solver so that a typo is
/// reported as an invalid-input error, exactly like the range checks.
#[derive(Debug, Parser, Clone)]
pub struct BufferArgs {
    /// Stock buffer concentration (M).
    #[arg(long = "initial-conc", default_value = "1.0")]
    pub initial_conc: String,

    /// Target buffer concentration after dilution (M).
    #[arg(long = "final-conc", default_value = "0.15")]
    pub final_conc: String,

    /// Buffer pKa.
    #[arg(long, default_value = "8.0")]
    pub pka: String,

    /// Final total volume of solution (L).
    #[arg(long = "volume", default_value = "1.5")]
    pub total_volume: String,

    /// Stock HCl (strong acid titrant) concentration (M).
    #[arg(long = "hcl", default_value = "12.0")]
    pub hcl_conc: String,

    /// Stock NaOH (strong base titrant) concentration (M).
    #[arg(long = "naoh", default_value = "10.0")]
    pub naoh_conc: String,

    /// Current solution pH.
    #[arg(long = "initial-ph", default_value = "7.0")]
    pub initial_ph: String,

    /// Desired solution pH.
    #[arg(long = "final-ph", default_value = "8.3")]
    pub final_ph: String,
}

/// Options for fitting a kinetics dataset.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Kinetics CSV: substrate column first, then one or more rate columns.
    pub csv: PathBuf,

    /// Observation weighting scheme.
    #[arg(long, value_enum, default_value_t = WeightMode::Auto)]
    pub weights: WeightMode,

    /// Explicit initial guess for Vmax (default: max mean rate).
    #[arg(long = "guess-vmax")]
    pub guess_vmax: Option<f64>,

    /// Explicit initial guess for Km (default: mean substrate concentration).
    #[arg(long = "guess-km")]
    pub guess_km: Option<f64>,

    /// Maximum solver iterations.
    #[arg(long = "max-iters", default_value_t = 200)]
    pub max_iters: usize,

    /// Relative SSE improvement treated as convergence.
    #[arg(long, default_value_t = 1e-10)]
    pub tol: f64,

    /// Number of points in the generated plotting curve.
    #[arg(long = "curve-points", default_value_t = 100)]
    pub curve_points: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-observation results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export curve (model + params + fitted grid) to JSON.
    #[arg(long = "export-curve")]
    pub export_curve: Option<PathBuf>,
}

/// Options for plotting a saved curve.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Curve JSON file produced by `benchtop fit --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for synthetic dataset generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// True Vmax of the generated data.
    #[arg(long, default_value_t = 10.0)]
    pub vmax: f64,

    /// True Km of the generated data.
    #[arg(long, default_value_t = 2.0)]
    pub km: f64,

    /// Number of substrate concentrations (rows).
    #[arg(long, default_value_t = 8)]
    pub points: usize,

    /// Replicate measurements per row (rate columns).
    #[arg(long, default_value_t = 3)]
    pub replicates: usize,

    /// Relative noise level (fraction of the true rate).
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Smallest substrate concentration.
    #[arg(long = "x-min", default_value_t = 0.25)]
    pub x_min: f64,

    /// Largest substrate concentration.
    #[arg(long = "x-max", default_value_t = 16.0)]
    pub x_max: f64,

    /// Write the CSV here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during solving/fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Strong titrant used to shift buffer pH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Titrant {
    Hcl,
    Naoh,
}

impl Titrant {
    /// Human-readable reagent label for recipes and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            Titrant::Hcl => "HCl",
            Titrant::Naoh => "NaOH",
        }
    }
}

/// A validated buffer adjustment request.
///
/// Concentrations are molar, volumes are liters. Construction goes through
/// [`crate::buffer::parse_request`], which enforces the range and
/// dilution-direction constraints, so a value of this type is always usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferRequest {
    pub initial_conc: f64,
    pub final_conc: f64,
    pub pka: f64,
    pub total_volume: f64,
    pub hcl_conc: f64,
    pub naoh_conc: f64,
    pub initial_ph: f64,
    pub final_ph: f64,
}

/// A solved buffer recipe.
///
/// All three volumes are rounded to 4 decimal places and sum to the request's
/// total volume within rounding tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferRecipe {
    pub buffer_volume: f64,
    pub titrant_volume: f64,
    pub water_volume: f64,
    pub titrant: Titrant,
}

/// How observations are weighted in the fit objective.
///
/// With replicate measurements, the per-row spread carries information: noisy
/// rows should pull less on the curve. Weighting squared residuals by
/// `1/std^2` is the standard inverse-variance scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    /// Inverse-variance weights when the dataset has >= 2 replicate columns,
    /// otherwise uniform.
    Auto,
    /// Uniform weights.
    Uniform,
    /// Force inverse-variance weights (requires >= 2 replicate columns).
    Replicate,
}

/// A raw row of the kinetics input table: one substrate concentration and one
/// or more rate replicates.
///
/// Blank replicate cells have already been coerced to 0.0 by ingest (a
/// documented approximation, not a missing-data model).
#[derive(Debug, Clone)]
pub struct KineticsRow {
    pub x: f64,
    pub rates: Vec<f64>,
}

/// A normalized kinetics observation used for fitting.
///
/// One `Observation` corresponds to one row of the input table after replicate
/// reduction.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Substrate concentration (the independent variable).
    pub x: f64,
    /// Mean measured rate across replicates.
    pub rate_mean: f64,
    /// Sample standard deviation across replicates, floored to a small
    /// positive epsilon so inverse-variance weighting stays well-defined.
    pub rate_std: f64,
    /// Number of replicate values behind the mean.
    pub replicates: usize,
    /// Observation weight (higher means more influence).
    pub weight: f64,
}

/// Summary stats about the observations actually used for fitting.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub rate_min: f64,
    pub rate_max: f64,
}

/// Fitted Michaelis–Menten parameters.
///
/// Standard errors come from the scaled covariance of the final
/// Levenberg–Marquardt step and are absent when the fit has no spare degrees
/// of freedom (n <= 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MichaelisModel {
    pub vmax: f64,
    pub km: f64,
    pub vmax_se: Option<f64>,
    pub km_se: Option<f64>,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    /// Weighted sum of squared residuals (the minimized objective).
    pub sse: f64,
    /// Root-mean-square of the unweighted residuals.
    pub rmse: f64,
    /// Coefficient of determination on the replicate means.
    pub r_squared: f64,
    pub n: usize,
    pub iterations: usize,
    pub converged: bool,
}

/// Fit output: parameters plus quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub model: MichaelisModel,
    pub quality: FitQuality,
}

/// A per-observation fitted result (for tables and exports).
#[derive(Debug, Clone)]
pub struct PointResidual {
    pub obs: Observation,
    pub rate_fit: f64,
    pub residual: f64,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated: NaiveDate,
    pub model: MichaelisModel,
    pub fit_quality: FitQuality,
    pub grid: CurveGrid,
}

/// Dense fitted curve over the observed x-range, for plotting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub rate: Vec<f64>,
}

/// A full fit run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub csv_path: PathBuf,
    /// Objective weighting scheme.
    pub weight_mode: WeightMode,

    /// Optional explicit initial guess for Vmax (default: max mean rate).
    pub guess_vmax: Option<f64>,
    /// Optional explicit initial guess for Km (default: mean substrate conc.).
    pub guess_km: Option<f64>,

    pub max_iters: usize,
    /// Relative SSE improvement below which the fit is declared converged.
    pub tol: f64,

    /// Number of points in the generated plotting curve.
    pub curve_points: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}

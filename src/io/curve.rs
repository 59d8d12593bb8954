//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted model:
//! - fitted parameters and their standard errors
//! - fit quality diagnostics
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Local;

use crate::domain::{CurveFile, CurveGrid, FitResult};
use crate::error::AppError;
use crate::models::predict;

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, fit: &FitResult, grid: &CurveGrid) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::invalid_input(format!(
            "Failed to create curve JSON '{}': {e}",
            path.display()
        ))
    })?;

    let curve = CurveFile {
        tool: "benchtop".to_string(),
        generated: Local::now().date_naive(),
        model: fit.model.clone(),
        fit_quality: fit.quality.clone(),
        grid: grid.clone(),
    };

    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::invalid_input(format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::invalid_input(format!(
            "Failed to open curve JSON '{}': {e}",
            path.display()
        ))
    })?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::invalid_input(format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

/// Evaluate the fitted model on `n` evenly spaced points over `[x_min, x_max]`.
pub fn build_grid(fit: &FitResult, x_min: f64, x_max: f64, n: usize) -> CurveGrid {
    let n = n.max(2);
    let mut x0 = x_min;
    let mut x1 = x_max;
    if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
        x0 = 0.0;
        x1 = 1.0;
    }

    let mut xs = Vec::with_capacity(n);
    let mut rates = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x0 + u * (x1 - x0);
        xs.push(x);
        rates.push(predict(x, fit.model.vmax, fit.model.km));
    }

    CurveGrid { x: xs, rate: rates }
}

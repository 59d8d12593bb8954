//! Export per-observation fit results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::PointResidual;
use crate::error::AppError;

/// Write per-observation results to a CSV file.
pub fn write_results_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::invalid_input(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "x,rate_mean,rate_std,replicates,weight,rate_fit,residual")
        .map_err(|e| AppError::invalid_input(format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        let o = &r.obs;
        writeln!(
            file,
            "{:.10},{:.6},{:.6},{},{:.10},{:.6},{:.6}",
            o.x, o.rate_mean, o.rate_std, o.replicates, o.weight, r.rate_fit, r.residual,
        )
        .map_err(|e| AppError::invalid_input(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{BufferRecipe, DatasetStats, FitResult, PointResidual};
use crate::io::ingest::IngestedData;

/// Format a solved buffer recipe as a one-line instruction.
pub fn format_buffer_recipe(recipe: &BufferRecipe) -> String {
    format!(
        "Buffer recipe: add {} liters stock buffer, {} liters of stock {}, and {} liters of water",
        recipe.buffer_volume,
        recipe.titrant_volume,
        recipe.titrant.display_name(),
        recipe.water_volume,
    )
}

/// Format the full fit run summary (dataset stats + parameters + quality).
pub fn format_fit_summary(ingest: &IngestedData, stats: &DatasetStats, fit: &FitResult) -> String {
    let mut out = String::new();

    out.push_str("=== benchtop - Michaelis-Menten fit ===\n");
    out.push_str(&format!(
        "Rows: {} read, {} used",
        ingest.rows_read, ingest.rows_used
    ));
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(" ({} skipped)", ingest.row_errors.len()));
    }
    out.push('\n');
    out.push_str(&format!(
        "Replicates: {} column(s) per row\n",
        ingest.replicate_cols
    ));
    out.push_str(&format!(
        "Points: n={} | x=[{:.3}, {:.3}] | rate=[{:.3}, {:.3}]\n",
        stats.n_points, stats.x_min, stats.x_max, stats.rate_min, stats.rate_max
    ));

    for e in &ingest.row_errors {
        out.push_str(&format!("  (skipped line {}) {}\n", e.line, e.message));
    }

    out.push_str("\nFitted model: v = Vmax * x / (Km + x)\n");
    out.push_str(&format!(
        "- Vmax = {:.4}{}\n",
        fit.model.vmax,
        fmt_se(fit.model.vmax_se)
    ));
    out.push_str(&format!(
        "- Km   = {:.4}{}\n",
        fit.model.km,
        fmt_se(fit.model.km_se)
    ));
    out.push_str(&format!("- R²   = {:.4}\n", fit.quality.r_squared));
    out.push_str(&format!(
        "- SSE={:.6} RMSE={:.6} ({} iterations)\n",
        fit.quality.sse, fit.quality.rmse, fit.quality.iterations
    ));

    out
}

/// Format the per-observation residual table.
pub fn format_residual_table(residuals: &[PointResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>10} {:>12} {:>12} {:>12} {:>12}\n",
        "x", "rate_mean", "rate_fit", "residual", "rate_std"
    ));
    out.push_str(&format!(
        "{:-<10} {:-<12} {:-<12} {:-<12} {:-<12}\n",
        "", "", "", "", ""
    ));

    for r in residuals {
        out.push_str(&format!(
            "{:>10.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
            r.obs.x, r.obs.rate_mean, r.rate_fit, r.residual, r.obs.rate_std
        ));
    }

    out
}

fn fmt_se(se: Option<f64>) -> String {
    match se {
        Some(v) => format!(" ± {v:.4}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BufferRecipe, Titrant};

    #[test]
    fn recipe_string_matches_expected_shape() {
        let recipe = BufferRecipe {
            buffer_volume: 0.225,
            titrant_volume: 0.0049,
            water_volume: 1.2701,
            titrant: Titrant::Naoh,
        };
        assert_eq!(
            format_buffer_recipe(&recipe),
            "Buffer recipe: add 0.225 liters stock buffer, 0.0049 liters of stock NaOH, and 1.2701 liters of water"
        );
    }
}

//! Shared "fit pipeline" logic used by the CLI front-end and tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> replicate reduction -> fit -> residuals -> fitted curve
//!
//! The CLI can then focus on presentation (printing, plotting, exports).

use crate::domain::{CurveGrid, DatasetStats, FitConfig, FitResult, Observation, PointResidual};
use crate::error::AppError;
use crate::fit::{fit_michaelis, reduce_rows, FitOptions};
use crate::io::ingest::{load_kinetics_csv, IngestedData};

/// All computed outputs of a single `benchtop fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub observations: Vec<Observation>,
    pub stats: DatasetStats,
    pub fit: FitResult,
    pub residuals: Vec<PointResidual>,
    pub curve: CurveGrid,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    // 1) Ingest and normalize the CSV.
    let ingest = load_kinetics_csv(&config.csv_path)?;

    // 2) Reduce replicates to weighted observations.
    let observations = reduce_rows(&ingest.rows, ingest.replicate_cols, config.weight_mode)?;
    let stats = dataset_stats(&observations);

    // 3) Fit the model.
    let opts = FitOptions {
        guess_vmax: config.guess_vmax,
        guess_km: config.guess_km,
        max_iters: config.max_iters,
        tol: config.tol,
    };
    let fit = fit_michaelis(&observations, &opts)?;

    // 4) Residuals and the plotting curve.
    let residuals = crate::report::compute_residuals(&observations, &fit)?;
    let curve = crate::io::curve::build_grid(&fit, stats.x_min, stats.x_max, config.curve_points);

    Ok(RunOutput {
        ingest,
        observations,
        stats,
        fit,
        residuals,
        curve,
    })
}

fn dataset_stats(observations: &[Observation]) -> DatasetStats {
    let mut stats = DatasetStats {
        n_points: observations.len(),
        x_min: f64::INFINITY,
        x_max: f64::NEG_INFINITY,
        rate_min: f64::INFINITY,
        rate_max: f64::NEG_INFINITY,
    };
    for obs in observations {
        stats.x_min = stats.x_min.min(obs.x);
        stats.x_max = stats.x_max.max(obs.x);
        stats.rate_min = stats.rate_min.min(obs.rate_mean);
        stats.rate_max = stats.rate_max.max(obs.rate_mean);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeightMode;
    use std::io::Write;
    use std::path::PathBuf;

    fn config_for(path: PathBuf) -> FitConfig {
        FitConfig {
            csv_path: path,
            weight_mode: WeightMode::Auto,
            guess_vmax: None,
            guess_km: None,
            max_iters: 200,
            tol: 1e-10,
            curve_points: 100,
            plot: false,
            plot_width: 100,
            plot_height: 25,
            export_results: None,
            export_curve: None,
        }
    }

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("benchtop_pipeline_{}_{name}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn end_to_end_fit_from_csv() {
        // Exact Michaelis-Menten data for vmax=10, km=2.
        let mut contents = String::from("x,y\n");
        for x in [0.5, 1.0, 2.0, 4.0, 8.0, 16.0] {
            contents.push_str(&format!("{x},{}\n", 10.0 * x / (2.0 + x)));
        }
        let path = write_temp_csv("exact", &contents);

        let run = run_fit(&config_for(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert!((run.fit.model.vmax - 10.0).abs() < 1e-5);
        assert!((run.fit.model.km - 2.0).abs() < 1e-5);
        assert!(run.fit.quality.r_squared > 0.999999);
        assert_eq!(run.curve.x.len(), 100);
        assert_eq!(run.residuals.len(), 6);
        assert!((run.stats.x_min - 0.5).abs() < 1e-12);
        assert!((run.stats.x_max - 16.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_csv_fails_with_fit_error() {
        let path = write_temp_csv("degenerate", "x,y\n1.0,5.0\n1.0,5.0\n");
        let err = run_fit(&config_for(path.clone())).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 3);
    }
}

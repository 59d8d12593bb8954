//! Reporting utilities: residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{FitResult, Observation, PointResidual};
use crate::error::AppError;
use crate::models::predict;

/// Compute fitted values and residuals for each observation.
pub fn compute_residuals(
    observations: &[Observation],
    fit: &FitResult,
) -> Result<Vec<PointResidual>, AppError> {
    let mut out = Vec::with_capacity(observations.len());
    for obs in observations {
        let rate_fit = predict(obs.x, fit.model.vmax, fit.model.km);
        if !rate_fit.is_finite() {
            return Err(AppError::fit_failure(
                "Non-finite model prediction during residual computation.",
            ));
        }
        let residual = obs.rate_mean - rate_fit;
        out.push(PointResidual {
            obs: obs.clone(),
            rate_fit,
            residual,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, MichaelisModel};

    #[test]
    fn compute_residuals_basic() {
        let observations = vec![
            Observation {
                x: 2.0,
                rate_mean: 5.0,
                rate_std: 1e-6,
                replicates: 1,
                weight: 1.0,
            },
            Observation {
                x: 6.0,
                rate_mean: 8.0,
                rate_std: 1e-6,
                replicates: 1,
                weight: 1.0,
            },
        ];
        let fit = FitResult {
            model: MichaelisModel {
                vmax: 10.0,
                km: 2.0,
                vmax_se: None,
                km_se: None,
            },
            quality: FitQuality {
                sse: 0.0,
                rmse: 0.0,
                r_squared: 1.0,
                n: 2,
                iterations: 1,
                converged: true,
            },
        };

        let residuals = compute_residuals(&observations, &fit).unwrap();
        assert_eq!(residuals.len(), 2);
        // v(2) = 5 exactly, v(6) = 7.5.
        assert!(residuals[0].residual.abs() < 1e-12);
        assert!((residuals[1].residual - 0.5).abs() < 1e-12);
    }
}

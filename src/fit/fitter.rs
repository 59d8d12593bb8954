//! Levenberg–Marquardt fitting of the Michaelis–Menten model.
//!
//! Given reduced observations `(x_i, v_i, w_i)` we minimize the weighted sum
//! of squared residuals
//!
//! ```text
//! S(vmax, km) = Σ w_i (v_i - vmax * x_i / (km + x_i))^2
//! ```
//!
//! The model is nonlinear in `km`, so each iteration solves the damped
//! normal-equation system
//!
//! ```text
//! (JᵀWJ + λ diag(JᵀWJ)) δ = JᵀW r
//! ```
//!
//! with the analytic Jacobian from [`crate::models`], accepting the step only
//! when it lowers `S` and inflating `λ` otherwise. This is deterministic and
//! has no RNG.
//!
//! Parameter standard errors come from the scaled covariance
//! `(JᵀWJ)⁻¹ · S/(n-2)` at the accepted optimum, so they are available for
//! both weighted and unweighted fits whenever there is at least one spare
//! degree of freedom.

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitQuality, FitResult, MichaelisModel, Observation};
use crate::error::AppError;
use crate::math::{invert_normal_matrix, r_squared, solve_least_squares};
use crate::models::{fill_jacobian_row, initial_guess, predict};

/// Guard against an effectively zero denominator `km + x`.
const DENOM_EPS: f64 = 1e-12;

/// Attempts at inflating λ before giving up on an iteration.
const MAX_DAMP_RETRIES: usize = 16;

/// Fitting options that affect how the model is calibrated.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Optional explicit initial guess for Vmax.
    ///
    /// When unset, the guess is the largest observed mean rate.
    pub guess_vmax: Option<f64>,
    /// Optional explicit initial guess for Km.
    ///
    /// When unset, the guess is the mean substrate concentration.
    pub guess_km: Option<f64>,
    /// Maximum outer iterations before the fit is declared non-convergent.
    pub max_iters: usize,
    /// Relative SSE improvement below which the fit is declared converged.
    pub tol: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            guess_vmax: None,
            guess_km: None,
            max_iters: 200,
            tol: 1e-10,
        }
    }
}

/// Fit the Michaelis–Menten model to reduced observations.
///
/// Degenerate inputs (fewer than 2 distinct substrate concentrations, zero
/// variance in the mean rates) and solver failures are explicit errors, never
/// silent partial results.
pub fn fit_michaelis(observations: &[Observation], opts: &FitOptions) -> Result<FitResult, AppError> {
    validate_observations(observations)?;

    let n = observations.len();
    let (mut vmax, mut km) = resolve_guess(observations, opts);

    let mut sse = weighted_sse(observations, vmax, km).ok_or_else(|| {
        AppError::fit_failure(format!(
            "Initial guess (vmax={vmax:.6}, km={km:.6}) produces invalid model predictions."
        ))
    })?;

    let mut lambda = 1e-3;
    let mut iterations = 0usize;
    let mut converged = false;

    for _ in 0..opts.max_iters {
        iterations += 1;

        let (normal, gradient) = build_normal_system(observations, vmax, km);

        // Inflate λ until a step actually lowers the objective. When no
        // amount of damping helps, the gradient is numerically zero and we
        // are at a (local) optimum.
        let mut accepted = false;
        for _ in 0..MAX_DAMP_RETRIES {
            let mut damped = normal.clone();
            for i in 0..2 {
                damped[(i, i)] += lambda * normal[(i, i)].max(DENOM_EPS);
            }

            let Some(delta) = solve_least_squares(&damped, &gradient) else {
                lambda *= 10.0;
                continue;
            };

            let cand_vmax = vmax + delta[0];
            let cand_km = km + delta[1];
            if let Some(cand_sse) = weighted_sse(observations, cand_vmax, cand_km) {
                if cand_sse <= sse {
                    let rel_improvement = (sse - cand_sse) / sse.max(f64::MIN_POSITIVE);
                    vmax = cand_vmax;
                    km = cand_km;
                    sse = cand_sse;
                    lambda = (lambda * 0.3).max(1e-12);
                    accepted = true;
                    if rel_improvement < opts.tol {
                        converged = true;
                    }
                    break;
                }
            }
            lambda *= 10.0;
        }

        if !accepted {
            converged = true;
        }
        if converged {
            break;
        }
    }

    if !converged {
        return Err(AppError::fit_failure(format!(
            "Fit did not converge within {} iterations (last SSE: {sse:.6e}).",
            opts.max_iters
        )));
    }
    if !(vmax.is_finite() && km.is_finite()) {
        return Err(AppError::fit_failure("Fit produced non-finite parameters."));
    }

    let (vmax_se, km_se) = standard_errors(observations, vmax, km, sse);

    let means: Vec<f64> = observations.iter().map(|o| o.rate_mean).collect();
    let fitted: Vec<f64> = observations.iter().map(|o| predict(o.x, vmax, km)).collect();
    let r_squared = r_squared(&means, &fitted).ok_or_else(|| {
        AppError::fit_failure("R² is undefined: observed rates carry no variance.")
    })?;

    let rss: f64 = means
        .iter()
        .zip(fitted.iter())
        .map(|(y, y_hat)| (y - y_hat) * (y - y_hat))
        .sum();

    Ok(FitResult {
        model: MichaelisModel {
            vmax,
            km,
            vmax_se,
            km_se,
        },
        quality: FitQuality {
            sse,
            rmse: (rss / n as f64).sqrt(),
            r_squared,
            n,
            iterations,
            converged,
        },
    })
}

fn validate_observations(observations: &[Observation]) -> Result<(), AppError> {
    if observations.len() < 2 {
        return Err(AppError::bad_data(
            "At least 2 data points are required for a Michaelis-Menten fit.",
        ));
    }
    for obs in observations {
        if !(obs.x.is_finite() && obs.rate_mean.is_finite()) {
            return Err(AppError::bad_data("Non-finite value in observations."));
        }
        if !(obs.weight.is_finite() && obs.weight > 0.0) {
            return Err(AppError::bad_data("Non-positive observation weight."));
        }
    }

    let mut xs: Vec<f64> = observations.iter().map(|o| o.x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let distinct = 1 + xs.windows(2).filter(|w| (w[1] - w[0]).abs() > DENOM_EPS).count();
    if distinct < 2 {
        return Err(AppError::bad_data(
            "At least 2 distinct substrate concentrations are required (x-range has zero span).",
        ));
    }

    let means: Vec<f64> = observations.iter().map(|o| o.rate_mean).collect();
    let mean_rate = crate::math::mean(&means).unwrap_or(0.0);
    let tss: f64 = means.iter().map(|v| (v - mean_rate) * (v - mean_rate)).sum();
    if tss <= 0.0 {
        return Err(AppError::bad_data(
            "Observed rates have zero variance; the fit is degenerate.",
        ));
    }

    Ok(())
}

fn resolve_guess(observations: &[Observation], opts: &FitOptions) -> (f64, f64) {
    let (auto_vmax, auto_km) = initial_guess(observations);
    (
        opts.guess_vmax.unwrap_or(auto_vmax),
        opts.guess_km.unwrap_or(auto_km),
    )
}

/// Weighted SSE, or `None` when the candidate parameters put a denominator at
/// zero or blow up to non-finite values.
fn weighted_sse(observations: &[Observation], vmax: f64, km: f64) -> Option<f64> {
    if !(vmax.is_finite() && km.is_finite()) {
        return None;
    }
    let mut sse = 0.0;
    for obs in observations {
        if (km + obs.x).abs() < DENOM_EPS {
            return None;
        }
        let r = obs.rate_mean - predict(obs.x, vmax, km);
        sse += obs.weight * r * r;
    }
    sse.is_finite().then_some(sse)
}

/// Build `JᵀWJ` (2×2) and `JᵀW r` (2) at the current parameters.
fn build_normal_system(observations: &[Observation], vmax: f64, km: f64) -> (DMatrix<f64>, DVector<f64>) {
    let mut normal = DMatrix::<f64>::zeros(2, 2);
    let mut gradient = DVector::<f64>::zeros(2);
    let mut row = [0.0f64; 2];

    for obs in observations {
        fill_jacobian_row(obs.x, vmax, km, &mut row);
        let residual = obs.rate_mean - predict(obs.x, vmax, km);
        for i in 0..2 {
            gradient[i] += obs.weight * row[i] * residual;
            for j in 0..2 {
                normal[(i, j)] += obs.weight * row[i] * row[j];
            }
        }
    }

    (normal, gradient)
}

/// Standard errors from the scaled covariance at the optimum.
///
/// Unavailable (`None`) when there is no spare degree of freedom or the
/// normal matrix is singular.
fn standard_errors(
    observations: &[Observation],
    vmax: f64,
    km: f64,
    sse: f64,
) -> (Option<f64>, Option<f64>) {
    let n = observations.len();
    if n <= 2 {
        return (None, None);
    }

    let (normal, _) = build_normal_system(observations, vmax, km);
    let Some(inverse) = invert_normal_matrix(&normal) else {
        return (None, None);
    };

    let scale = sse / (n - 2) as f64;
    let se = |variance: f64| {
        let v = variance * scale;
        (v.is_finite() && v >= 0.0).then(|| v.sqrt())
    };
    (se(inverse[(0, 0)]), se(inverse[(1, 1)]))
}

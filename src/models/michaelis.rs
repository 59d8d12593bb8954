//! Michaelis–Menten model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - predict `v(x)` given `(vmax, km)` (for residuals/plots)
//! - fill a Jacobian row `[dv/dvmax, dv/dkm]` (for the damped Gauss–Newton step)
//!
//! Both are closed-form:
//!
//! - `v(x) = vmax * x / (km + x)`
//! - `dv/dvmax = x / (km + x)`
//! - `dv/dkm = -vmax * x / (km + x)^2`

use crate::domain::Observation;

/// Predict the reaction rate at substrate concentration `x`.
pub fn predict(x: f64, vmax: f64, km: f64) -> f64 {
    vmax * x / (km + x)
}

/// Fill a Jacobian row for the given substrate concentration.
///
/// # Panics
/// Panics if `out` does not have length 2. Callers size the row correctly.
pub fn fill_jacobian_row(x: f64, vmax: f64, km: f64, out: &mut [f64]) {
    let denom = km + x;
    out[0] = x / denom;
    out[1] = -vmax * x / (denom * denom);
}

/// Default initial parameter guess for a reduced dataset.
///
/// `vmax0` is the largest observed mean rate (the saturation plateau is at
/// least that high) and `km0` is the mean substrate concentration (the
/// half-saturation point sits somewhere inside the sampled range).
pub fn initial_guess(observations: &[Observation]) -> (f64, f64) {
    let mut max_rate = f64::NEG_INFINITY;
    let mut x_sum = 0.0;
    for obs in observations {
        max_rate = max_rate.max(obs.rate_mean);
        x_sum += obs.x;
    }
    let vmax0 = if max_rate.is_finite() && max_rate > 0.0 {
        max_rate
    } else {
        1.0
    };
    let km0 = if observations.is_empty() {
        1.0
    } else {
        (x_sum / observations.len() as f64).max(f64::MIN_POSITIVE)
    };
    (vmax0, km0)
}

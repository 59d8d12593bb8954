//! Synthetic Michaelis–Menten dataset generation.
//!
//! Useful for trying the fitter without lab data and for reproducible demos:
//! given true parameters, a noise level, and a seed, the generated table is
//! fully deterministic.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::KineticsRow;
use crate::error::AppError;
use crate::models::predict;

/// Configuration for synthetic dataset generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub vmax: f64,
    pub km: f64,
    /// Number of substrate concentrations (table rows).
    pub points: usize,
    /// Replicate measurements per row (table rate columns).
    pub replicates: usize,
    /// Relative noise: each rate is jittered by `Normal(0, noise * v(x))`.
    pub noise: f64,
    pub seed: u64,
    pub x_min: f64,
    pub x_max: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            vmax: 10.0,
            km: 2.0,
            points: 8,
            replicates: 3,
            noise: 0.05,
            seed: 42,
            x_min: 0.25,
            x_max: 16.0,
        }
    }
}

/// Generate a synthetic dataset.
///
/// Substrate concentrations are log-spaced over `[x_min, x_max]` so the curve
/// is sampled on both sides of Km, which is how kinetics assays are actually
/// laid out (serial dilutions).
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<KineticsRow>, AppError> {
    if config.points < 2 {
        return Err(AppError::invalid_input("Sample needs at least 2 points."));
    }
    if config.replicates == 0 {
        return Err(AppError::invalid_input("Sample needs at least 1 replicate."));
    }
    if !(config.vmax.is_finite() && config.vmax > 0.0 && config.km.is_finite() && config.km > 0.0) {
        return Err(AppError::invalid_input("Sample vmax and km must be positive."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::invalid_input("Sample noise must be >= 0."));
    }
    if !(config.x_min.is_finite()
        && config.x_max.is_finite()
        && config.x_min > 0.0
        && config.x_max > config.x_min)
    {
        return Err(AppError::invalid_input(
            "Sample x-range must be finite, positive, and increasing.",
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::fit_failure(format!("Noise distribution error: {e}")))?;

    let xs = log_space(config.x_min, config.x_max, config.points);

    let mut rows = Vec::with_capacity(config.points);
    for x in xs {
        let v_true = predict(x, config.vmax, config.km);
        let mut rates = Vec::with_capacity(config.replicates);
        for _ in 0..config.replicates {
            let jitter: f64 = normal.sample(&mut rng);
            // Rates below zero are unphysical; clamp rather than resample to
            // keep the draw count (and thus determinism) independent of noise.
            rates.push((v_true + jitter * config.noise * v_true).max(0.0));
        }
        rows.push(KineticsRow { x, rates });
    }

    Ok(rows)
}

/// Render generated rows as CSV in the fitter's ingest schema.
pub fn sample_to_csv(rows: &[KineticsRow]) -> String {
    let replicates = rows.iter().map(|r| r.rates.len()).max().unwrap_or(1);

    let mut out = String::from("x");
    if replicates == 1 {
        out.push_str(",y");
    } else {
        for i in 1..=replicates {
            out.push_str(&format!(",v{i}"));
        }
    }
    out.push('\n');

    for row in rows {
        out.push_str(&format!("{:.6}", row.x));
        for rate in &row.rates {
            out.push_str(&format!(",{rate:.6}"));
        }
        out.push('\n');
    }

    out
}

/// `steps` log-spaced points between `min` and `max` (inclusive).
fn log_space(min: f64, max: f64, steps: usize) -> Vec<f64> {
    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    (0..steps).map(|i| (ln_min + step * i as f64).exp()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeightMode;
    use crate::fit::{fit_michaelis, reduce_rows, FitOptions};

    #[test]
    fn generation_is_deterministic_per_seed() {
        let config = SampleConfig::default();
        let a = generate_sample(&config).unwrap();
        let b = generate_sample(&config).unwrap();
        for (ra, rb) in a.iter().zip(b.iter()) {
            assert_eq!(ra.x, rb.x);
            assert_eq!(ra.rates, rb.rates);
        }

        let other = generate_sample(&SampleConfig {
            seed: 43,
            ..config
        })
        .unwrap();
        assert!(a.iter().zip(other.iter()).any(|(ra, rb)| ra.rates != rb.rates));
    }

    #[test]
    fn zero_noise_sample_recovers_true_parameters() {
        let config = SampleConfig {
            noise: 0.0,
            ..SampleConfig::default()
        };
        let rows = generate_sample(&config).unwrap();
        let observations = reduce_rows(&rows, config.replicates, WeightMode::Uniform).unwrap();
        let fit = fit_michaelis(&observations, &FitOptions::default()).unwrap();

        assert!((fit.model.vmax - config.vmax).abs() < 1e-6);
        assert!((fit.model.km - config.km).abs() < 1e-6);
        assert!(fit.quality.r_squared > 0.999999);
    }

    #[test]
    fn csv_rendering_matches_ingest_schema() {
        let rows = vec![
            KineticsRow {
                x: 1.0,
                rates: vec![4.0, 4.2],
            },
            KineticsRow {
                x: 2.0,
                rates: vec![6.0, 6.1],
            },
        ];
        let csv = sample_to_csv(&rows);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "x,v1,v2");
        assert_eq!(lines.next().unwrap(), "1.000000,4.000000,4.200000");
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let bad = SampleConfig {
            x_min: 0.0,
            ..SampleConfig::default()
        };
        assert!(generate_sample(&bad).is_err());

        let bad = SampleConfig {
            points: 1,
            ..SampleConfig::default()
        };
        assert!(generate_sample(&bad).is_err());
    }
}

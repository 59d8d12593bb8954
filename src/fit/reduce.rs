//! Replicate reduction and weighting.
//!
//! Each input row carries one or more rate replicates. Before fitting we
//! collapse them to a mean and a sample standard deviation, and assign the
//! observation weight demanded by the configured [`WeightMode`].

use crate::domain::{KineticsRow, Observation, WeightMode};
use crate::error::AppError;
use crate::math::{mean, sample_std};

/// Floor for the replicate standard deviation.
///
/// Identical replicates would produce a zero std and an infinite
/// inverse-variance weight; the floor keeps weighting well-defined.
pub const STD_FLOOR: f64 = 1e-6;

/// Reduce raw rows to fit-ready observations.
///
/// `replicate_cols` is the number of rate columns in the source table; it
/// decides how `WeightMode::Auto` resolves and whether `WeightMode::Replicate`
/// is satisfiable.
pub fn reduce_rows(
    rows: &[KineticsRow],
    replicate_cols: usize,
    mode: WeightMode,
) -> Result<Vec<Observation>, AppError> {
    if rows.is_empty() {
        return Err(AppError::bad_data("No usable data rows to fit."));
    }

    let inverse_variance = match mode {
        WeightMode::Uniform => false,
        WeightMode::Auto => replicate_cols >= 2,
        WeightMode::Replicate => {
            if replicate_cols < 2 {
                return Err(AppError::invalid_input(
                    "Replicate weighting requires at least 2 rate columns.",
                ));
            }
            true
        }
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(rate_mean) = mean(&row.rates) else {
            return Err(AppError::bad_data("Encountered a row with no rate values."));
        };
        let rate_std = sample_std(&row.rates).unwrap_or(0.0).max(STD_FLOOR);
        let weight = if inverse_variance {
            1.0 / (rate_std * rate_std)
        } else {
            1.0
        };
        out.push(Observation {
            x: row.x,
            rate_mean,
            rate_std,
            replicates: row.rates.len(),
            weight,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f64, rates: &[f64]) -> KineticsRow {
        KineticsRow {
            x,
            rates: rates.to_vec(),
        }
    }

    #[test]
    fn single_replicate_auto_uses_uniform_weights() {
        let rows = vec![row(1.0, &[4.0]), row(2.0, &[6.0])];
        let obs = reduce_rows(&rows, 1, WeightMode::Auto).unwrap();
        assert!(obs.iter().all(|o| (o.weight - 1.0).abs() < 1e-12));
        assert!((obs[0].rate_mean - 4.0).abs() < 1e-12);
        // Spread is undefined for one replicate; it is floored, not zero.
        assert!((obs[0].rate_std - STD_FLOOR).abs() < 1e-18);
    }

    #[test]
    fn replicates_reduce_to_mean_and_inverse_variance_weight() {
        let rows = vec![row(1.0, &[4.0, 6.0]), row(2.0, &[10.0, 10.0])];
        let obs = reduce_rows(&rows, 2, WeightMode::Auto).unwrap();

        assert!((obs[0].rate_mean - 5.0).abs() < 1e-12);
        // Sample std of [4, 6] is sqrt(2).
        assert!((obs[0].rate_std - 2f64.sqrt()).abs() < 1e-12);
        assert!((obs[0].weight - 0.5).abs() < 1e-12);

        // Identical replicates hit the std floor rather than an infinite weight.
        assert!((obs[1].rate_std - STD_FLOOR).abs() < 1e-18);
        assert!(obs[1].weight.is_finite());
    }

    #[test]
    fn replicate_mode_rejects_single_column_tables() {
        let rows = vec![row(1.0, &[4.0])];
        let err = reduce_rows(&rows, 1, WeightMode::Replicate).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn uniform_mode_ignores_replicate_spread() {
        let rows = vec![row(1.0, &[4.0, 400.0])];
        let obs = reduce_rows(&rows, 2, WeightMode::Uniform).unwrap();
        assert!((obs[0].weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_table_is_an_error() {
        assert!(reduce_rows(&[], 1, WeightMode::Auto).is_err());
    }
}

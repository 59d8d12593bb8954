//! CSV ingest and normalization.
//!
//! This module turns a kinetics table CSV into clean `KineticsRow`s that are
//! safe to reduce and fit.
//!
//! Expected schema: a header row, a substrate column first (conventionally
//! named `x`), and one or more rate replicate columns after it. Column names
//! beyond the first are free-form (`y`, `v1`, `trial_2`, ...).
//!
//! Design goals:
//! - **Strict schema** for the column layout (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no fitting logic here
//!
//! One deliberate quirk: a *blank* rate cell coerces to 0.0 before averaging.
//! This is an approximation, not a missing-data model, and it is visible in
//! the run summary via `rows_used`.

use std::fs::File;
use std::path::Path;

use crate::domain::KineticsRow;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized rows + bookkeeping.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub rows: Vec<KineticsRow>,
    /// Number of rate columns in the source table.
    pub replicate_cols: usize,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and normalize a kinetics CSV.
pub fn load_kinetics_csv(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::invalid_input(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    if headers.len() < 2 {
        return Err(AppError::invalid_input(
            "CSV needs at least 2 columns: a substrate column and one rate column.",
        ));
    }
    let replicate_cols = headers.len() - 1;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        // Skip fully blank rows silently (trailing newlines etc.).
        if record.iter().all(|cell| cell.is_empty()) {
            rows_read -= 1;
            continue;
        }

        let x_text = record.get(0).unwrap_or("");
        let x = match parse_cell(x_text) {
            Some(v) if v.is_finite() => v,
            _ => {
                row_errors.push(RowError {
                    line,
                    message: format!("Unparseable substrate value '{x_text}'"),
                });
                continue;
            }
        };

        let mut rates = Vec::with_capacity(replicate_cols);
        let mut bad_cell = None;
        for col in 1..=replicate_cols {
            let cell = record.get(col).unwrap_or("");
            if cell.is_empty() {
                // Blank replicate cells coerce to zero.
                rates.push(0.0);
                continue;
            }
            match parse_cell(cell) {
                Some(v) if v.is_finite() => rates.push(v),
                _ => {
                    bad_cell = Some(format!("Unparseable rate value '{cell}'"));
                    break;
                }
            }
        }
        if let Some(message) = bad_cell {
            row_errors.push(RowError { line, message });
            continue;
        }

        rows.push(KineticsRow { x, rates });
    }

    let rows_used = rows.len();
    if rows_used == 0 {
        return Err(AppError::bad_data(format!(
            "No usable data rows in '{}' ({} row error(s)).",
            path.display(),
            row_errors.len()
        )));
    }

    Ok(IngestedData {
        rows,
        replicate_cols,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn parse_cell(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "benchtop_ingest_{}_{}.csv",
            std::process::id(),
            contents.len()
        ));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn single_rate_column_parses() {
        let path = write_temp_csv("x,y\n0,0\n1,8\n2,9\n3,10\n");
        let data = load_kinetics_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(data.replicate_cols, 1);
        assert_eq!(data.rows_used, 4);
        assert!(data.row_errors.is_empty());
        assert_eq!(data.rows[1].rates, vec![8.0]);
    }

    #[test]
    fn replicate_columns_parse_and_blanks_coerce_to_zero() {
        let path = write_temp_csv("x,v1,v2,v3\n1,4.0,4.2,\n2,6.0,6.1,5.9\n");
        let data = load_kinetics_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(data.replicate_cols, 3);
        assert_eq!(data.rows[0].rates, vec![4.0, 4.2, 0.0]);
        assert_eq!(data.rows[1].rates, vec![6.0, 6.1, 5.9]);
    }

    #[test]
    fn bad_rows_are_reported_not_fatal() {
        let path = write_temp_csv("x,y\n1,4.0\nbanana,5.0\n2,pear\n4,9.0\n");
        let data = load_kinetics_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(data.rows_used, 2);
        assert_eq!(data.row_errors.len(), 2);
        assert_eq!(data.row_errors[0].line, 3);
        assert!(data.row_errors[0].message.contains("banana"));
    }

    #[test]
    fn all_bad_rows_is_an_error() {
        let path = write_temp_csv("x,y\nbanana,apple\n");
        let err = load_kinetics_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn single_column_schema_is_rejected() {
        let path = write_temp_csv("x\n1\n2\n");
        let err = load_kinetics_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 2);
    }
}

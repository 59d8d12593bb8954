//! Buffer recipe solver.
//!
//! Given a desired buffer dilution and pH shift, compute how much stock
//! buffer, strong titrant (HCl or NaOH), and water to mix.
//!
//! The chemistry:
//!
//! - dilution fixes the stock buffer volume: `V_buf = C_final * V_total / C_initial`
//! - Henderson–Hasselbalch gives the protonated fraction at a pH:
//!   `HA = moles / (1 + 10^(pH - pKa))`
//! - the change in protonated moles between the initial and final pH is what
//!   the titrant must supply; its sign picks the reagent (deprotonating a
//!   buffer, i.e. raising pH, takes base).
//!
//! Inputs arrive as raw text and are parsed here, so a typo is reported as an
//! invalid-input error rather than a CLI parse failure. Validation order is
//! fixed and the first failing rule determines the message.

use crate::domain::{BufferRecipe, BufferRequest, Titrant};
use crate::error::AppError;

/// Raw text fields as entered by the user.
#[derive(Debug, Clone)]
pub struct RawBufferInput {
    pub initial_conc: String,
    pub final_conc: String,
    pub pka: String,
    pub total_volume: String,
    pub hcl_conc: String,
    pub naoh_conc: String,
    pub initial_ph: String,
    pub final_ph: String,
}

/// Parse and validate the raw text fields into a usable request.
pub fn parse_request(raw: &RawBufferInput) -> Result<BufferRequest, AppError> {
    let request = BufferRequest {
        initial_conc: parse_field(&raw.initial_conc)?,
        final_conc: parse_field(&raw.final_conc)?,
        pka: parse_field(&raw.pka)?,
        total_volume: parse_field(&raw.total_volume)?,
        hcl_conc: parse_field(&raw.hcl_conc)?,
        naoh_conc: parse_field(&raw.naoh_conc)?,
        initial_ph: parse_field(&raw.initial_ph)?,
        final_ph: parse_field(&raw.final_ph)?,
    };
    validate(&request)?;
    Ok(request)
}

fn parse_field(text: &str) -> Result<f64, AppError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::invalid_input("Invalid input values, try again"))
}

/// Reject common nonsense conditions.
///
/// The check order is part of the contract: the first failing rule determines
/// the reported message.
fn validate(r: &BufferRequest) -> Result<(), AppError> {
    if !(r.initial_conc > 0.0 && r.initial_conc <= 100.0) {
        return Err(AppError::invalid_input("Invalid initial buffer concentration"));
    }
    if !(r.final_conc > 0.0 && r.final_conc <= 100.0) {
        return Err(AppError::invalid_input("Invalid final buffer concentration"));
    }
    if !(r.hcl_conc > 0.0 && r.hcl_conc <= 100.0) {
        return Err(AppError::invalid_input("Invalid HCl concentration"));
    }
    if !(r.naoh_conc > 0.0 && r.naoh_conc <= 100.0) {
        return Err(AppError::invalid_input("Invalid NaOH concentration"));
    }
    if r.final_conc > r.initial_conc {
        return Err(AppError::invalid_input(
            "Can't increase concentration through dilution",
        ));
    }
    if !(r.pka > 0.0 && r.pka <= 100.0) {
        return Err(AppError::invalid_input("Invalid pKa value"));
    }
    if !(r.initial_ph > 0.0 && r.initial_ph <= 20.0) {
        return Err(AppError::invalid_input("Invalid initial pH"));
    }
    if !(r.final_ph > 0.0 && r.final_ph <= 20.0) {
        return Err(AppError::invalid_input("Invalid final pH"));
    }
    if !(r.total_volume > 0.0 && r.total_volume.is_finite()) {
        return Err(AppError::invalid_input("Invalid total volume"));
    }
    Ok(())
}

/// Solve a validated request into a recipe.
///
/// Fails only when the requested recipe is physically impossible: the stock
/// buffer plus titrant would already exceed the target total volume, leaving
/// a negative water volume.
pub fn solve(r: &BufferRequest) -> Result<BufferRecipe, AppError> {
    // Dilution fixes the buffer volume and total buffer moles.
    let buffer_volume = r.final_conc * r.total_volume / r.initial_conc;
    let moles_of_buffer = buffer_volume * r.initial_conc;

    // Protonated moles at the initial and final pH.
    let initial_ha = protonated_moles(moles_of_buffer, r.initial_ph, r.pka);
    let final_ha = protonated_moles(moles_of_buffer, r.final_ph, r.pka);

    // A negative difference means we need to deprotonate (raise pH): base.
    let difference = final_ha - initial_ha;
    let (titrant, stock_conc) = if difference < 0.0 {
        (Titrant::Naoh, r.naoh_conc)
    } else {
        (Titrant::Hcl, r.hcl_conc)
    };
    let titrant_volume = difference.abs() / stock_conc;

    let water_volume = r.total_volume - (titrant_volume + buffer_volume);
    if water_volume < 0.0 {
        return Err(AppError::bad_data(format!(
            "Impossible recipe: buffer ({:.4} L) plus titrant ({:.4} L) exceed the target volume ({:.4} L)",
            buffer_volume, titrant_volume, r.total_volume,
        )));
    }

    Ok(BufferRecipe {
        buffer_volume: round4(buffer_volume),
        titrant_volume: round4(titrant_volume),
        water_volume: round4(water_volume),
        titrant,
    })
}

/// Moles of protonated species at a given pH via Henderson–Hasselbalch.
fn protonated_moles(moles: f64, ph: f64, pka: f64) -> f64 {
    let ratio = 10f64.powf(ph - pka);
    moles / (1.0 + ratio)
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(fields: [&str; 8]) -> RawBufferInput {
        RawBufferInput {
            initial_conc: fields[0].to_string(),
            final_conc: fields[1].to_string(),
            pka: fields[2].to_string(),
            total_volume: fields[3].to_string(),
            hcl_conc: fields[4].to_string(),
            naoh_conc: fields[5].to_string(),
            initial_ph: fields[6].to_string(),
            final_ph: fields[7].to_string(),
        }
    }

    fn worked_example() -> RawBufferInput {
        raw(["1.0", "0.15", "8.0", "1.5", "12.0", "10.0", "7.0", "8.3"])
    }

    #[test]
    fn worked_example_selects_naoh_and_matches_closed_form() {
        let request = parse_request(&worked_example()).unwrap();
        let recipe = solve(&request).unwrap();

        assert_eq!(recipe.titrant, Titrant::Naoh);

        // Closed form: V_buf = 0.15 * 1.5 / 1.0, moles = V_buf * 1.0.
        let buffer_volume = 0.15 * 1.5;
        let moles = buffer_volume * 1.0;
        let ha_init = moles / (1.0 + 10f64.powf(7.0 - 8.0));
        let ha_final = moles / (1.0 + 10f64.powf(8.3 - 8.0));
        let titrant_volume = (ha_final - ha_init).abs() / 10.0;

        assert!((recipe.buffer_volume - buffer_volume).abs() < 5e-5);
        assert!((recipe.titrant_volume - titrant_volume).abs() < 5e-5);
        assert!(
            (recipe.water_volume - (1.5 - buffer_volume - titrant_volume)).abs() < 5e-5
        );
    }

    #[test]
    fn volumes_sum_to_total_within_rounding() {
        let cases = [
            ["1.0", "0.15", "8.0", "1.5", "12.0", "10.0", "7.0", "8.3"],
            ["2.0", "0.5", "7.2", "0.25", "6.0", "5.0", "6.8", "7.4"],
            ["0.5", "0.1", "4.8", "10.0", "12.0", "10.0", "5.5", "4.2"],
        ];
        for fields in cases {
            let request = parse_request(&raw(fields)).unwrap();
            let recipe = solve(&request).unwrap();
            let total: f64 = request.total_volume;
            let sum = recipe.buffer_volume + recipe.titrant_volume + recipe.water_volume;
            assert!(
                (sum - total).abs() < 2e-4,
                "volumes {sum} vs total {total} for {fields:?}"
            );
        }
    }

    #[test]
    fn lowering_ph_selects_hcl() {
        let request =
            parse_request(&raw(["1.0", "0.15", "8.0", "1.5", "12.0", "10.0", "8.3", "7.0"]))
                .unwrap();
        let recipe = solve(&request).unwrap();
        assert_eq!(recipe.titrant, Titrant::Hcl);
    }

    #[test]
    fn non_numeric_field_reports_invalid_input() {
        let mut input = worked_example();
        input.pka = "eight".to_string();
        let err = parse_request(&input).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Invalid input values, try again");
    }

    #[test]
    fn concentrating_dilution_is_rejected() {
        let mut input = worked_example();
        input.final_conc = "2.0".to_string();
        let err = parse_request(&input).unwrap_err();
        assert_eq!(err.to_string(), "Can't increase concentration through dilution");
    }

    #[test]
    fn validation_order_reports_first_failure() {
        // Both the initial concentration and the pKa are bad; the earlier
        // rule wins.
        let mut input = worked_example();
        input.initial_conc = "0.0".to_string();
        input.pka = "-1.0".to_string();
        let err = parse_request(&input).unwrap_err();
        assert_eq!(err.to_string(), "Invalid initial buffer concentration");
    }

    #[test]
    fn out_of_range_ph_is_rejected() {
        let mut input = worked_example();
        input.final_ph = "25.0".to_string();
        let err = parse_request(&input).unwrap_err();
        assert_eq!(err.to_string(), "Invalid final pH");
    }

    #[test]
    fn impossible_recipe_is_rejected_not_silent() {
        // No dilution and a weak titrant: buffer fills the target volume, so
        // any titrant at all overflows it.
        let request =
            parse_request(&raw(["1.0", "1.0", "8.0", "1.0", "0.01", "0.01", "7.0", "8.3"]))
                .unwrap();
        let err = solve(&request).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().starts_with("Impossible recipe"));
    }

    #[test]
    fn equal_ph_yields_zero_titrant() {
        let request =
            parse_request(&raw(["1.0", "0.15", "8.0", "1.5", "12.0", "10.0", "7.0", "7.0"]))
                .unwrap();
        let recipe = solve(&request).unwrap();
        assert_eq!(recipe.titrant, Titrant::Hcl);
        assert!(recipe.titrant_volume.abs() < 1e-12);
    }
}

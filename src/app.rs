//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - dispatches to the buffer solver or the kinetics fit pipeline
//! - prints reports/plots
//! - writes optional exports

use std::io::Write;

use clap::Parser;

use crate::buffer::{self, RawBufferInput};
use crate::cli::{BufferArgs, Command, FitArgs, PlotArgs, SampleArgs};
use crate::data::{generate_sample, sample_to_csv, SampleConfig};
use crate::domain::FitConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `benchtop` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Buffer(args) => handle_buffer(args),
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_buffer(args: BufferArgs) -> Result<(), AppError> {
    let raw = RawBufferInput {
        initial_conc: args.initial_conc,
        final_conc: args.final_conc,
        pka: args.pka,
        total_volume: args.total_volume,
        hcl_conc: args.hcl_conc,
        naoh_conc: args.naoh_conc,
        initial_ph: args.initial_ph,
        final_ph: args.final_ph,
    };
    let request = buffer::parse_request(&raw)?;
    let recipe = buffer::solve(&request)?;
    println!("{}", crate::report::format_buffer_recipe(&recipe));
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.ingest, &run.stats, &run.fit)
    );
    println!("{}", crate::report::format_residual_table(&run.residuals));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.residuals,
            &run.fit,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.residuals)?;
    }
    if let Some(path) = &config.export_curve {
        crate::io::curve::write_curve_json(path, &run.fit, &run.curve)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    let plot = crate::plot::render_ascii_plot_from_curve_file(&curve, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        vmax: args.vmax,
        km: args.km,
        points: args.points,
        replicates: args.replicates,
        noise: args.noise,
        seed: args.seed,
        x_min: args.x_min,
        x_max: args.x_max,
    };
    let rows = generate_sample(&config)?;
    let csv = sample_to_csv(&rows);

    match &args.out {
        Some(path) => {
            let mut file = std::fs::File::create(path).map_err(|e| {
                AppError::invalid_input(format!(
                    "Failed to create sample CSV '{}': {e}",
                    path.display()
                ))
            })?;
            file.write_all(csv.as_bytes()).map_err(|e| {
                AppError::invalid_input(format!("Failed to write sample CSV: {e}"))
            })?;
        }
        None => print!("{csv}"),
    }
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        csv_path: args.csv.clone(),
        weight_mode: args.weights,
        guess_vmax: args.guess_vmax,
        guess_km: args.guess_km,
        max_iters: args.max_iters,
        tol: args.tol,
        curve_points: args.curve_points,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_curve: args.export_curve.clone(),
    }
}

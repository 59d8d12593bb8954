//! Domain types used throughout the calculators.
//!
//! This module defines:
//!
//! - buffer recipe inputs/outputs (`BufferRequest`, `BufferRecipe`, `Titrant`)
//! - normalized kinetics observations (`Observation`)
//! - fit outputs (`FitResult`, `MichaelisModel`, `CurveFile`, etc.)

pub mod types;

pub use types::*;

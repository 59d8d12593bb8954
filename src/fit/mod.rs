//! Curve fitting for the kinetics calculator.
//!
//! Responsibilities:
//!
//! - reduce replicate columns to per-row mean/std and observation weights
//! - fit the Michaelis–Menten model by damped Gauss–Newton (Levenberg–Marquardt)
//! - derive parameter standard errors and R²

pub mod fitter;
pub mod reduce;

pub use fitter::*;
pub use reduce::*;

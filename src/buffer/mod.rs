//! Buffer titration recipe solving.
//!
//! Closed-form Henderson–Hasselbalch algebra over eight validated scalars; no
//! iteration, no state.

pub mod solver;

pub use solver::*;

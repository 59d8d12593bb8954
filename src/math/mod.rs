//! Mathematical utilities: least-squares solving and summary statistics.

pub mod leastsq;
pub mod stats;

pub use leastsq::*;
pub use stats::*;

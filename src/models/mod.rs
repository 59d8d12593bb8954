//! Michaelis–Menten model implementation.
//!
//! The model is implemented as small, pure functions so that fitting code can
//! stay generic over parameter vectors.

pub mod michaelis;

pub use michaelis::*;

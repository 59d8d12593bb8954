//! Application error type.
//!
//! Every fallible operation in this crate returns `Result<_, AppError>`.
//! The exit code taxonomy is:
//!
//! - `2` — invalid input / usage (bad flags, unparseable text, out-of-range values)
//! - `3` — unusable data (empty/degenerate datasets, impossible recipes)
//! - `4` — numeric failure (singular systems, non-convergent fits)

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Invalid or unparseable user input (exit code 2).
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Structurally valid input that cannot be computed on (exit code 3).
    pub fn bad_data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Numeric/solver failure (exit code 4).
    pub fn fit_failure(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

//! Error type shared by every module of the crate.

/// Errors raised while building, allocating, parsing or solving.
///
/// All variants are terminal for the current attempt: they describe a
/// structural property of the input, not a transient condition.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or inconsistent facility, demand or configuration input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Total available capacity is strictly below the demand.
    #[error("infeasible: demand {demand} exceeds total capacity {capacity}")]
    Infeasible {
        /// Demand that had to be covered.
        demand: f64,
        /// Capacity available across all facilities.
        capacity: f64,
    },
    /// An allocation does not cover the demand it was built for.
    #[error("allocation assigns {assigned} but demand is {expected}")]
    DemandMismatch {
        /// Demand the allocation should cover.
        expected: f64,
        /// Quantity actually assigned.
        assigned: f64,
    },
    /// Dataset syntax error.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the dataset.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// Dataset file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The exact solver failed for a reason other than infeasibility.
    #[error("solver error: {0}")]
    Solver(String),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

use core::fmt;

/// Result alias for `cleave`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the bisection engine and its boundary codec.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Vector or buffer length mismatch.
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// A neighbor list referenced a vertex outside `0..n`.
    InvalidNeighbor {
        /// Row the neighbor was listed in.
        vertex: usize,
        /// Offending neighbor index.
        neighbor: usize,
    },

    /// Modularity is undefined: total degree is zero, or a vector collapsed
    /// to zero norm during power iteration.
    DivisionByZero,

    /// Power iteration exhausted its update budget.
    ConvergenceFailure {
        /// Number of full iterations attempted.
        iterations: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Reading or writing a graph/community file failed.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::InvalidNeighbor { vertex, neighbor } => {
                write!(f, "vertex {vertex} lists out-of-range neighbor {neighbor}")
            }
            Error::DivisionByZero => write!(f, "division by zero"),
            Error::ConvergenceFailure { iterations } => {
                write!(f, "power iteration did not converge after {iterations} iterations")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "io")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

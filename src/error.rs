use std::error::Error;
use std::fmt;

/// Reasons an estimate is refused before any arithmetic runs.
///
/// Undefined payback or ROI is not an error: those come back as non-finite
/// numbers on the result and the caller decides how to present them.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// Neither a bill nor a usage figure was given, or the roof area is
    /// missing for a model that sizes against the roof.
    MissingRequiredInput(&'static str),
    /// A supplied value is out of its domain (negative, NaN, zero term...).
    InvalidInput { field: &'static str, value: f64 },
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateError::MissingRequiredInput(what) => {
                write!(f, "missing required input: {}", what)
            }
            EstimateError::InvalidInput { field, value } => {
                write!(f, "invalid value for {}: {}", field, value)
            }
        }
    }
}

impl Error for EstimateError {}

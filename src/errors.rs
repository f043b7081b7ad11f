//! Error taxonomy of the engine.
//!
//! Every failure the engine can recover from is returned as a `SculptError` value, never
//! as a panic crossing into the caller. The only conditions that still panic are caller-side
//! invariant violations (e.g. `x` and `y` slices of different length).
use std::error::Error;
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum SculptError {
    /// expression text could not be compiled
    Parse {
        /// text that was handed to the compiler
        input: String,
        message: String,
    },
    /// not enough points for the requested number of basis functions
    UnderdeterminedFit {
        got: usize,
        required: usize,
    },
    /// normal equations could not be solved (singular or severely ill-conditioned)
    SingularSystem(String),
    /// no finite data left to work with
    NonFiniteData(String),
    /// numeric configuration out of its admissible range
    InvalidConfig(String),
}

impl SculptError {
    pub fn parse(input: &str, message: impl Into<String>) -> Self {
        SculptError::Parse {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

impl Display for SculptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SculptError::Parse { input, message } => {
                write!(f, "cannot parse '{}': {}", input, message)
            }
            SculptError::UnderdeterminedFit { got, required } => {
                write!(f, "insufficient points ({}/{})", got, required)
            }
            SculptError::SingularSystem(reason) => write!(f, "singular system: {}", reason),
            SculptError::NonFiniteData(reason) => write!(f, "non-finite data: {}", reason),
            SculptError::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl Error for SculptError {}

//! Error types for startup and configuration
//!
//! Simulation control flow never uses these; they only cover the edges where
//! the game talks to the browser or reads tuning overrides.

use std::fmt;

/// Fatal startup failures. The game loop never starts when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    NoWindow,
    NoDocument,
    MissingElement { id: &'static str },
    NotACanvas { id: &'static str },
    Surface(String),
    NoAdapter(String),
    Device(String),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no browser window available"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::MissingElement { id } => write!(f, "required element #{id} not found"),
            Self::NotACanvas { id } => write!(f, "element #{id} is not a canvas"),
            Self::Surface(msg) => write!(f, "failed to create render surface: {msg}"),
            Self::NoAdapter(msg) => write!(f, "no suitable GPU adapter: {msg}"),
            Self::Device(msg) => write!(f, "failed to create GPU device: {msg}"),
        }
    }
}

impl std::error::Error for StartupError {}

/// Rejected tuning values or unparsable overrides
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    Parse(String),
    NonPositive { field: &'static str, value: f32 },
    InvertedRange { field: &'static str, min: f64, max: f64 },
    OutOfRange { field: &'static str, value: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
            Self::NonPositive { field, value } => {
                write!(f, "tuning field `{field}` must be positive, got {value}")
            }
            Self::InvertedRange { field, min, max } => {
                write!(f, "tuning range `{field}` is inverted: min={min}, max={max}")
            }
            Self::OutOfRange { field, value } => {
                write!(f, "tuning field `{field}` out of range: {value}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

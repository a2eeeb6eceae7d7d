use thiserror::Error;

use crate::math::Vec2;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("mass must be finite and greater than zero, got {0}")]
    InvalidMass(f64),

    #[error("thrust limit must be finite and non-negative, got {0}")]
    InvalidThrustLimit(f64),

    #[error("{0} requires a mass")]
    MissingMass(&'static str),

    #[error("expected a {expected}-dimensional vector, got {got} components")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("non-finite {field}: {value:?}")]
    NonFinite { field: &'static str, value: Vec2 },

    #[error("invalid value {value:?} for --{option}: {reason}")]
    InvalidConfig { option: &'static str, value: String, reason: String },

    #[error("terminal i/o failed")]
    Terminal(#[from] std::io::Error),
}

/// A grid position that fell outside the drawable surface.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{pos:?} beyond range {cols}x{rows}")]
pub struct Clipped {
    pub pos: Vec2,
    pub rows: usize,
    pub cols: usize,
}

//! Error types for channel geometry and reach state.

use cf_core::CfError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChannelError {
    #[error("Invalid channel geometry: {what}")]
    InvalidGeometry { what: &'static str },

    #[error("State length mismatch for reach '{name}': expected {expected}, got {got}")]
    StateLength {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Point {point} is out of range for reach '{name}' with {num_points} points")]
    PointOutOfRange {
        name: String,
        point: i32,
        num_points: usize,
    },
}

pub type ChannelResult<T> = Result<T, ChannelError>;

impl From<ChannelError> for CfError {
    fn from(e: ChannelError) -> Self {
        match e {
            ChannelError::InvalidGeometry { what } => CfError::InvalidArg { what },
            ChannelError::StateLength { .. } => CfError::Invariant {
                what: "reach state length mismatch",
            },
            ChannelError::PointOutOfRange { .. } => CfError::InvalidArg {
                what: "reach point out of range",
            },
        }
    }
}

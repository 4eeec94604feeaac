//! Error types for hydraulic structures.

use cf_core::error::CfError;
use thiserror::Error;

/// Errors raised while configuring or evaluating structures.
#[derive(Error, Debug, Clone)]
pub enum StructureError {
    #[error("Structure '{name}' is not linked on both sides")]
    NotLinked { name: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Junction '{name}' expected {expected} {side} states, got {got}")]
    StateCount {
        name: String,
        side: &'static str,
        expected: usize,
        got: usize,
    },
}

pub type StructureResult<T> = Result<T, StructureError>;

impl From<StructureError> for CfError {
    fn from(e: StructureError) -> Self {
        match e {
            StructureError::NotLinked { .. } => CfError::Invariant {
                what: "structure is not linked on both sides",
            },
            StructureError::InvalidArg { what } => CfError::InvalidArg { what },
            StructureError::StateCount { .. } => CfError::Invariant {
                what: "junction state count mismatch",
            },
        }
    }
}

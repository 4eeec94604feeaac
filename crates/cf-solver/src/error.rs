//! Error types for network solving.

use cf_channel::ChannelError;
use cf_structures::StructureError;
use thiserror::Error;

/// Errors that can occur while assembling or solving the global system.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("System is not square: {equations} equations for {unknowns} unknowns")]
    NotSquare { equations: usize, unknowns: usize },

    #[error("Solve diverged: {what}")]
    Diverged { what: String },

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Structure error: {0}")]
    Structure(#[from] StructureError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// True for errors caused by how the network was put together.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SolverError::Configuration { .. }
                | SolverError::NotSquare { .. }
                | SolverError::Channel(_)
                | SolverError::Structure(_)
        )
    }

    /// True for errors raised by the numerics of a step.
    pub fn is_numerical(&self) -> bool {
        matches!(self, SolverError::Diverged { .. })
    }
}

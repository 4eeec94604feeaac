//! Implicit hydrodynamic solver for channel networks.
//!
//! Gathers the linearized Saint-Venant equations of every reach, the head
//! and discharge relations of every structure, and one row per boundary
//! condition into a single global sparse linear system, then solves the
//! whole network simultaneously each time step.
//!
//! The entry point is [`NetworkSolver`]: wire a [`Network`], add boundary
//! conditions, then call [`NetworkSolver::run_simulation`] or drive
//! individual steps with [`NetworkSolver::step`].

pub mod boundary;
pub mod element;
pub mod error;
pub mod linear;
pub mod network;
pub mod solver;
pub mod varmap;

// Re-exports
pub use boundary::{BoundaryCondition, BoundaryFn};
pub use element::Element;
pub use error::{SolverError, SolverResult};
pub use linear::SPARSE_THRESHOLD;
pub use network::Network;
pub use solver::{NetworkSolver, DEFAULT_THETA};
pub use varmap::VariableMap;

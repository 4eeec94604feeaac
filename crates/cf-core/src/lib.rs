//! cf-core: stable foundation for canalflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs + signed point references)
//! - equation (typed linear-equation builder for the network assembler)
//! - relation (linearized two-point hydraulic relations)
//! - error (shared error types)

pub mod equation;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod relation;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use equation::{Equation, EquationSet, EquationTerm, Var};
pub use error::{CfError, CfResult};
pub use ids::*;
pub use numeric::*;
pub use relation::{PairRelation, PointState};
pub use units::*;

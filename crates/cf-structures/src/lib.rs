//! cf-structures: hydraulic structures linking reaches in a network.
//!
//! Provides the inline structures of a regulated canal system:
//! - gates and valves with controllable openings
//! - turbines modelled as switchable orifices
//! - pumps imposing a fixed head rise
//! - junctions joining several reaches at a common water level
//!
//! Two-port structures reduce to `PairRelation`s over their two endpoint
//! states; junctions emit full `Equation`s since they join an arbitrary
//! number of points. Neither touches the network directly, so every
//! structure stays a deterministic function of its parameters and the
//! states handed to it.

pub mod error;
pub mod gate;
pub mod junction;
pub mod link;
pub mod orifice;
pub mod pump;
pub mod turbine;
pub mod valve;

// Re-exports
pub use error::{StructureError, StructureResult};
pub use gate::Gate;
pub use junction::Junction;
pub use link::{Connection, TwoPortLink};
pub use orifice::orifice_relations;
pub use pump::Pump;
pub use turbine::Turbine;
pub use valve::Valve;

//! Sluice gate structure with controllable opening.

use crate::error::{StructureError, StructureResult};
use crate::link::{Connection, TwoPortLink};
use crate::orifice::orifice_relations;
use cf_core::relation::{PairRelation, PointState};
use cf_core::units::Length;

/// Default discharge coefficient for an underflow sluice gate.
pub const DEFAULT_CD: f64 = 0.62;

/// Underflow sluice gate connecting two reach points.
///
/// The effective flow area scales linearly with the opening fraction,
/// `width * opening`, modelling a slot of unit height.
#[derive(Debug, Clone)]
pub struct Gate {
    name: String,
    link: TwoPortLink,
    /// Discharge coefficient
    pub cd: f64,
    width_m: f64,
    opening: f64,
}

impl Gate {
    /// Create a fully open gate with the default discharge coefficient.
    pub fn new(name: String, width: Length) -> StructureResult<Self> {
        let width_m = width.value;
        if !width_m.is_finite() || width_m <= 0.0 {
            return Err(StructureError::InvalidArg {
                what: "gate width must be positive",
            });
        }
        Ok(Self {
            name,
            link: TwoPortLink::new(),
            cd: DEFAULT_CD,
            width_m,
            opening: 1.0,
        })
    }

    /// Override the discharge coefficient.
    pub fn with_cd(mut self, cd: f64) -> StructureResult<Self> {
        if !cd.is_finite() || cd <= 0.0 {
            return Err(StructureError::InvalidArg {
                what: "discharge coefficient must be positive",
            });
        }
        self.cd = cd;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width_m(&self) -> f64 {
        self.width_m
    }

    pub fn opening(&self) -> f64 {
        self.opening
    }

    /// Set the opening fraction (clamped to 0..1).
    pub fn set_opening(&mut self, opening: f64) {
        self.opening = opening.clamp(0.0, 1.0);
    }

    /// Effective flow area at the current opening (m²).
    pub fn flow_area_m2(&self) -> f64 {
        self.width_m * self.opening
    }

    /// Attach the gate between two reach points.
    pub fn connect(&mut self, up: Connection, down: Connection) {
        self.link.connect(up, down);
    }

    pub fn connections(&self) -> StructureResult<(Connection, Connection)> {
        self.link.require(&self.name)
    }

    /// Linearized equations given the current endpoint states.
    pub fn relations(&self, up: PointState, down: PointState) -> [PairRelation; 2] {
        orifice_relations(self.cd, self.flow_area_m2(), up, down)
    }
}

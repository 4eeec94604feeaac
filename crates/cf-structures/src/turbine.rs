//! Hydropower turbine modelled as a switchable orifice.

use crate::error::{StructureError, StructureResult};
use crate::link::{Connection, TwoPortLink};
use crate::orifice::orifice_relations;
use cf_core::relation::{PairRelation, PointState};
use cf_core::units::Area;

/// Default discharge coefficient for a turbine.
pub const DEFAULT_CD: f64 = 0.9;

/// Turbine connecting two reach points.
///
/// Treated as an energy-dissipating orifice with a fixed equivalent area; a
/// real unit would use performance curves. Switching it off removes the flow
/// path entirely.
#[derive(Debug, Clone)]
pub struct Turbine {
    name: String,
    link: TwoPortLink,
    /// Discharge coefficient
    pub cd: f64,
    equivalent_area_m2: f64,
    is_on: bool,
}

impl Turbine {
    /// Create a running turbine with the default discharge coefficient.
    pub fn new(name: String, equivalent_area: Area) -> StructureResult<Self> {
        let area = equivalent_area.value;
        if !area.is_finite() || area <= 0.0 {
            return Err(StructureError::InvalidArg {
                what: "turbine equivalent area must be positive",
            });
        }
        Ok(Self {
            name,
            link: TwoPortLink::new(),
            cd: DEFAULT_CD,
            equivalent_area_m2: area,
            is_on: true,
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

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Switch the unit on or off.
    pub fn set_on(&mut self, on: bool) {
        self.is_on = on;
    }

    /// Effective flow area: the equivalent area while running, zero when off.
    pub fn flow_area_m2(&self) -> f64 {
        if self.is_on {
            self.equivalent_area_m2
        } else {
            0.0
        }
    }

    /// Attach the turbine between two reach points.
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

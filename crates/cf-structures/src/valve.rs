//! Valve structure with position control.

use crate::error::{StructureError, StructureResult};
use crate::link::{Connection, TwoPortLink};
use crate::orifice::orifice_relations;
use cf_core::relation::{PairRelation, PointState};
use cf_core::units::Length;

/// Default discharge coefficient for a valve.
pub const DEFAULT_CD: f64 = 0.8;

/// Circular valve connecting two reach points.
///
/// Behaves like an orifice whose effective area is the fully-open bore area
/// scaled by the opening fraction.
#[derive(Debug, Clone)]
pub struct Valve {
    name: String,
    link: TwoPortLink,
    /// Discharge coefficient
    pub cd: f64,
    diameter_m: f64,
    max_flow_area_m2: f64,
    opening: f64,
}

impl Valve {
    /// Create a fully open valve with the default discharge coefficient.
    pub fn new(name: String, diameter: Length) -> StructureResult<Self> {
        let diameter_m = diameter.value;
        if !diameter_m.is_finite() || diameter_m <= 0.0 {
            return Err(StructureError::InvalidArg {
                what: "valve diameter must be positive",
            });
        }
        let radius = diameter_m / 2.0;
        Ok(Self {
            name,
            link: TwoPortLink::new(),
            cd: DEFAULT_CD,
            diameter_m,
            max_flow_area_m2: std::f64::consts::PI * radius * radius,
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

    pub fn diameter_m(&self) -> f64 {
        self.diameter_m
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
        self.max_flow_area_m2 * self.opening
    }

    /// Attach the valve between two reach points.
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

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::m;

    #[test]
    fn bore_area_from_diameter() {
        let valve = Valve::new("v".into(), m(1.0)).unwrap();
        assert!((valve.flow_area_m2() - std::f64::consts::PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn valve_rejects_bad_diameter() {
        assert!(Valve::new("v".into(), m(0.0)).is_err());
        assert!(Valve::new("v".into(), m(-0.5)).is_err());
    }

    #[test]
    fn discharge_coefficient_is_validated() {
        let valve = Valve::new("v".into(), m(1.0)).unwrap().with_cd(0.95).unwrap();
        assert_eq!(valve.cd, 0.95);

        assert!(Valve::new("v".into(), m(1.0)).unwrap().with_cd(0.0).is_err());
        assert!(Valve::new("v".into(), m(1.0)).unwrap().with_cd(-0.8).is_err());
    }

    #[test]
    fn partial_opening_scales_area() {
        let mut valve = Valve::new("v".into(), m(1.0)).unwrap();
        valve.set_opening(0.25);
        assert!((valve.flow_area_m2() - std::f64::consts::PI / 16.0).abs() < 1e-12);
    }

    #[test]
    fn closed_valve_forces_zero_flow() {
        let mut valve = Valve::new("v".into(), m(1.0)).unwrap();
        valve.set_opening(0.0);

        let [_, hyd] = valve.relations(PointState::new(3.0, 2.0), PointState::new(1.0, 2.0));
        assert_eq!(hyd.dq_up, 1.0);
        assert_eq!(hyd.rhs, -2.0);
    }
}

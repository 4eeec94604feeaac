//! Pump structure imposing a fixed head rise.

use crate::error::{StructureError, StructureResult};
use crate::link::{Connection, TwoPortLink};
use cf_core::relation::{PairRelation, PointState};
use cf_core::units::Length;

/// Default head rise across a running pump (m).
pub const DEFAULT_HEAD_RISE_M: f64 = 10.0;

/// Fixed-head pump connecting two reach points.
///
/// Enforces flow continuity plus `H_down = H_up + rise`. Switching the pump
/// off drops the rise to zero, leaving a plain head equality so the line
/// still passes flow.
#[derive(Debug, Clone)]
pub struct Pump {
    name: String,
    link: TwoPortLink,
    head_rise_m: f64,
    is_on: bool,
}

impl Pump {
    /// Create a running pump with the default head rise.
    pub fn new(name: String) -> Self {
        Self {
            name,
            link: TwoPortLink::new(),
            head_rise_m: DEFAULT_HEAD_RISE_M,
            is_on: true,
        }
    }

    /// Override the head rise.
    pub fn with_head_rise(mut self, rise: Length) -> StructureResult<Self> {
        let rise_m = rise.value;
        if !rise_m.is_finite() || rise_m < 0.0 {
            return Err(StructureError::InvalidArg {
                what: "pump head rise must be non-negative",
            });
        }
        self.head_rise_m = rise_m;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Switch the pump on or off.
    pub fn set_on(&mut self, on: bool) {
        self.is_on = on;
    }

    /// Head rise applied at the current switch state (m).
    pub fn head_rise_m(&self) -> f64 {
        if self.is_on {
            self.head_rise_m
        } else {
            0.0
        }
    }

    /// Attach the pump between two reach points.
    pub fn connect(&mut self, up: Connection, down: Connection) {
        self.link.connect(up, down);
    }

    pub fn connections(&self) -> StructureResult<(Connection, Connection)> {
        self.link.require(&self.name)
    }

    /// Linearized equations given the current endpoint states.
    pub fn relations(&self, up: PointState, down: PointState) -> [PairRelation; 2] {
        let continuity = PairRelation::continuity(up, down);
        let head_rise = PairRelation {
            dh_up: -1.0,
            dh_down: 1.0,
            rhs: -(down.head_m - up.head_m - self.head_rise_m()),
            ..PairRelation::default()
        };
        [continuity, head_rise]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::m;

    #[test]
    fn default_head_rise() {
        let pump = Pump::new("p".into());
        assert_eq!(pump.head_rise_m(), DEFAULT_HEAD_RISE_M);
    }

    #[test]
    fn head_rise_validation() {
        assert!(Pump::new("p".into()).with_head_rise(m(5.0)).is_ok());
        assert!(Pump::new("p".into()).with_head_rise(m(-1.0)).is_err());
        assert!(Pump::new("p".into()).with_head_rise(m(f64::NAN)).is_err());
    }

    #[test]
    fn satisfied_head_rise_has_zero_residual() {
        let pump = Pump::new("p".into()).with_head_rise(m(5.0)).unwrap();
        let [cont, rise] = pump.relations(PointState::new(2.0, 1.0), PointState::new(7.0, 1.0));
        assert_eq!(cont.rhs, 0.0);
        assert_eq!(rise.rhs, 0.0);
        assert_eq!(rise.dh_up, -1.0);
        assert_eq!(rise.dh_down, 1.0);
    }

    #[test]
    fn residual_drives_toward_target_rise() {
        let pump = Pump::new("p".into()).with_head_rise(m(5.0)).unwrap();
        // Downstream is 3 m short of the target rise
        let [_, rise] = pump.relations(PointState::new(2.0, 1.0), PointState::new(4.0, 1.0));
        assert_eq!(rise.rhs, 3.0);
    }

    #[test]
    fn pump_off_leaves_head_equality() {
        let mut pump = Pump::new("p".into()).with_head_rise(m(5.0)).unwrap();
        pump.set_on(false);
        assert_eq!(pump.head_rise_m(), 0.0);

        let [_, rise] = pump.relations(PointState::new(2.0, 1.0), PointState::new(2.0, 1.0));
        assert_eq!(rise.rhs, 0.0);
    }
}

//! Linearized two-point hydraulic relations.
//!
//! Reach segments and two-port structures both reduce to equations over the
//! head and flow corrections at a pair of points. `PairRelation` is that
//! shared currency: one linear equation in `(dH_up, dQ_up, dH_down, dQ_down)`
//! with the current-state residual on the right-hand side.

/// Snapshot of the state at one computational point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointState {
    /// Water level above the local channel invert (m)
    pub head_m: f64,
    /// Discharge through the cross-section (m³/s)
    pub flow_m3s: f64,
}

impl PointState {
    pub fn new(head_m: f64, flow_m3s: f64) -> Self {
        Self { head_m, flow_m3s }
    }
}

/// One linear equation in the delta unknowns of an up/down point pair.
///
/// Coefficients are zero for variables the relation does not involve; zero
/// entries are skipped when the equation is stamped into the global matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PairRelation {
    pub dh_up: f64,
    pub dq_up: f64,
    pub dh_down: f64,
    pub dq_down: f64,
    pub rhs: f64,
}

impl PairRelation {
    /// Flow continuity across a structure: `dQ_up - dQ_down = -(Q_up - Q_down)`.
    ///
    /// Drives the corrected flows on both sides to a common value.
    pub fn continuity(up: PointState, down: PointState) -> Self {
        Self {
            dq_up: 1.0,
            dq_down: -1.0,
            rhs: -(up.flow_m3s - down.flow_m3s),
            ..Self::default()
        }
    }
}

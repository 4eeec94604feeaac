//! Time-dependent boundary conditions.

use cf_core::equation::Var;
use cf_core::ids::{ElementId, PointRef};
use core::fmt;

/// Value schedule for a boundary condition: time in seconds to target value.
pub type BoundaryFn = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Pins one state variable to a scheduled value.
///
/// Each condition contributes one row `1·dVar = target(t) − current` per
/// step, so after the solve the variable equals the schedule exactly.
pub struct BoundaryCondition {
    pub(crate) element: ElementId,
    pub(crate) var: Var,
    pub(crate) point: PointRef,
    func: BoundaryFn,
}

impl BoundaryCondition {
    pub fn new(
        element: ElementId,
        var: Var,
        point: PointRef,
        func: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            element,
            var,
            point,
            func: Box::new(func),
        }
    }

    /// Scheduled value at time `t` (s).
    pub fn target(&self, t: f64) -> f64 {
        (self.func)(t)
    }
}

impl fmt::Debug for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryCondition")
            .field("element", &self.element)
            .field("var", &self.var)
            .field("point", &self.point)
            .field("func", &"<fn(t) -> value>")
            .finish()
    }
}

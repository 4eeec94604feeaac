//! Implicit network solver: assemble, solve, apply.

use crate::boundary::BoundaryCondition;
use crate::element::Element;
use crate::error::{SolverError, SolverResult};
use crate::linear;
use crate::network::Network;
use crate::varmap::VariableMap;
use cf_core::equation::{Equation, Var};
use cf_core::ids::{PointRef, ReachId, StructureId};
use cf_core::units::Time;
use cf_structures::{Connection, Gate, Pump, Turbine, Valve};
use tracing::{debug, info};

/// Default time weighting for the implicit scheme.
pub const DEFAULT_THETA: f64 = 0.6;

/// Drives a network through time with one global linear solve per step.
///
/// ## Stepping
///
/// Each step gathers the linearized equations of every element, adds one row
/// per boundary condition, checks that the system is square, stamps and
/// solves it, then applies the head and flow corrections to every reach.
///
/// Row order is reaches first (registration order, continuity then momentum
/// per segment), then structures, then boundary conditions. The unknown
/// layout is fixed by the variable map built in [`NetworkSolver::build_variable_map`].
pub struct NetworkSolver {
    network: Network,
    dt_s: f64,
    theta: f64,
    boundary_conditions: Vec<BoundaryCondition>,
    var_map: Option<VariableMap>,
}

impl NetworkSolver {
    /// Create a solver over a finished network.
    ///
    /// `theta` is the implicit weighting factor and must lie in `(0, 1]`;
    /// 1.0 is fully implicit.
    pub fn new(network: Network, dt: Time, theta: f64) -> SolverResult<Self> {
        let dt_s = dt.value;
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return Err(SolverError::Configuration {
                what: "time step must be positive".to_string(),
            });
        }
        if !theta.is_finite() || theta <= 0.0 || theta > 1.0 {
            return Err(SolverError::Configuration {
                what: "theta must lie in (0, 1]".to_string(),
            });
        }
        Ok(Self {
            network,
            dt_s,
            theta,
            boundary_conditions: Vec::new(),
            var_map: None,
        })
    }

    /// Create a solver with the default theta weighting.
    pub fn with_default_theta(network: Network, dt: Time) -> SolverResult<Self> {
        Self::new(network, dt, DEFAULT_THETA)
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn dt_s(&self) -> f64 {
        self.dt_s
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Mutable access to a gate, e.g. to move its opening between steps.
    pub fn gate_mut(&mut self, id: StructureId) -> SolverResult<&mut Gate> {
        self.network.gate_mut(id)
    }

    /// Mutable access to a valve.
    pub fn valve_mut(&mut self, id: StructureId) -> SolverResult<&mut Valve> {
        self.network.valve_mut(id)
    }

    /// Mutable access to a turbine, e.g. to trip it between steps.
    pub fn turbine_mut(&mut self, id: StructureId) -> SolverResult<&mut Turbine> {
        self.network.turbine_mut(id)
    }

    /// Mutable access to a pump.
    pub fn pump_mut(&mut self, id: StructureId) -> SolverResult<&mut Pump> {
        self.network.pump_mut(id)
    }

    /// Pin a reach variable to a time schedule.
    ///
    /// Adds one equation row per step; the variable equals `func(t)` exactly
    /// after each solve.
    pub fn add_boundary_condition(
        &mut self,
        element: ReachId,
        var: Var,
        point: PointRef,
        func: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> SolverResult<()> {
        let reach = self.network.reach(element)?;
        reach.resolve_point(point)?;
        self.boundary_conditions
            .push(BoundaryCondition::new(element, var, point, func));
        Ok(())
    }

    pub fn num_boundary_conditions(&self) -> usize {
        self.boundary_conditions.len()
    }

    /// Lay out the unknown vector. Called once before stepping; a second
    /// call is rejected.
    pub fn build_variable_map(&mut self) -> SolverResult<()> {
        if self.var_map.is_some() {
            return Err(SolverError::Configuration {
                what: "variable map is already built".to_string(),
            });
        }
        let map = VariableMap::build(&self.network);
        debug!(num_vars = map.num_vars(), "variable map built");
        self.var_map = Some(map);
        Ok(())
    }

    /// Number of unknowns, once the variable map is built.
    pub fn num_vars(&self) -> Option<usize> {
        self.var_map.as_ref().map(|m| m.num_vars())
    }

    fn gather_equations(&self, t: f64) -> SolverResult<Vec<Equation>> {
        let mut equations = Vec::new();

        for (id, element) in self.network.iter() {
            if element.is_reach() {
                equations.extend(element.contribute_equations(
                    id,
                    &self.network,
                    self.dt_s,
                    self.theta,
                )?);
            }
        }
        for (id, element) in self.network.iter() {
            if !element.is_reach() {
                equations.extend(element.contribute_equations(
                    id,
                    &self.network,
                    self.dt_s,
                    self.theta,
                )?);
            }
        }

        for bc in &self.boundary_conditions {
            let state = self
                .network
                .point_state(Connection::new(bc.element, bc.point))?;
            let current = match bc.var {
                Var::Head => state.head_m,
                Var::Flow => state.flow_m3s,
            };
            let mut eq = Equation::new();
            eq.add_term(bc.element, bc.var, bc.point, 1.0)
                .set_rhs(bc.target(t) - current);
            equations.push(eq);
        }

        Ok(equations)
    }

    /// Advance the network by one step at simulation time `t` (s).
    ///
    /// Fails with `NotSquare` before anything is stamped when the equation
    /// and unknown counts disagree, and with `Diverged` when the solve
    /// produces no finite corrections.
    pub fn step(&mut self, t: f64) -> SolverResult<()> {
        let map = self
            .var_map
            .as_ref()
            .ok_or_else(|| SolverError::Configuration {
                what: "variable map is not built; call build_variable_map first".to_string(),
            })?;

        let equations = self.gather_equations(t)?;
        let num_vars = map.num_vars();
        if equations.len() != num_vars {
            return Err(SolverError::NotSquare {
                equations: equations.len(),
                unknowns: num_vars,
            });
        }

        let mut triplets = Vec::new();
        let mut rhs = vec![0.0; num_vars];
        for (row, eq) in equations.iter().enumerate() {
            for term in eq.terms() {
                let col = map.column(term.element, term.var, term.point)?;
                triplets.push((row, col, term.coeff));
            }
            rhs[row] = eq.rhs();
        }

        let solution = linear::solve(num_vars, &triplets, &rhs)?;
        if solution.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::Diverged {
                what: format!("non-finite corrections at t = {} s", t),
            });
        }

        let mut max_dh_m = 0.0_f64;
        for (id, element) in self.network.iter_mut() {
            if let Element::Reach(reach) = element {
                if let Some((base, num_points)) = map.slot(id) {
                    let dh: Vec<f64> = (0..num_points).map(|i| solution[base + 2 * i]).collect();
                    let dq: Vec<f64> =
                        (0..num_points).map(|i| solution[base + 2 * i + 1]).collect();
                    max_dh_m = dh.iter().fold(max_dh_m, |m, d| m.max(d.abs()));
                    reach.update_state(&dh, &dq)?;
                }
            }
        }
        for (_, element) in self.network.iter_mut() {
            element.finish_step();
        }
        debug!(t_s = t, max_dh_m, "corrections applied");

        Ok(())
    }

    /// Run `num_steps` steps, with step `i` at time `i · dt`.
    ///
    /// Builds the variable map first if it has not been built yet.
    pub fn run_simulation(&mut self, num_steps: usize) -> SolverResult<()> {
        if self.var_map.is_none() {
            self.build_variable_map()?;
        }
        info!(num_steps, dt_s = self.dt_s, "starting hydrodynamic simulation");
        for i in 0..num_steps {
            let t = i as f64 * self.dt_s;
            debug!(step = i + 1, num_steps, t_s = t, "advancing network");
            self.step(t)?;
        }
        info!("simulation finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_channel::{Reach, TrapezoidSection};
    use cf_core::units::{m, m3ps, s};

    fn single_reach_network() -> Network {
        let section = TrapezoidSection::rectangular(m(5.0)).unwrap();
        let reach = Reach::uniform(
            "canal".into(),
            section,
            0.0,
            0.0,
            m(100.0),
            3,
            m(1.0),
            m3ps(0.0),
        )
        .unwrap();
        let mut net = Network::new();
        net.add_reach(reach);
        net
    }

    #[test]
    fn construction_validates_timestep_and_theta() {
        assert!(NetworkSolver::new(single_reach_network(), s(0.0), 0.6).is_err());
        assert!(NetworkSolver::new(single_reach_network(), s(-1.0), 0.6).is_err());
        assert!(NetworkSolver::new(single_reach_network(), s(10.0), 0.0).is_err());
        assert!(NetworkSolver::new(single_reach_network(), s(10.0), 1.2).is_err());
        assert!(NetworkSolver::new(single_reach_network(), s(10.0), f64::NAN).is_err());
        // Fully implicit is allowed
        assert!(NetworkSolver::new(single_reach_network(), s(10.0), 1.0).is_ok());
    }

    #[test]
    fn default_theta_constructor() {
        let solver = NetworkSolver::with_default_theta(single_reach_network(), s(10.0)).unwrap();
        assert_eq!(solver.theta(), DEFAULT_THETA);
    }

    #[test]
    fn step_requires_a_built_map() {
        let mut solver = NetworkSolver::new(single_reach_network(), s(10.0), 0.6).unwrap();
        assert_eq!(solver.num_vars(), None);

        let err = solver.step(0.0).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn variable_map_builds_once() {
        let mut solver = NetworkSolver::new(single_reach_network(), s(10.0), 0.6).unwrap();
        solver.build_variable_map().unwrap();
        assert_eq!(solver.num_vars(), Some(6));

        let err = solver.build_variable_map().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn boundary_conditions_are_validated() {
        let section = TrapezoidSection::rectangular(m(5.0)).unwrap();
        let reach = Reach::uniform(
            "canal".into(),
            section,
            0.0,
            0.0,
            m(100.0),
            3,
            m(1.0),
            m3ps(0.0),
        )
        .unwrap();
        let mut net = Network::new();
        let reach_id = net.add_reach(reach);
        let mut solver = NetworkSolver::new(net, s(10.0), 0.6).unwrap();

        assert!(solver
            .add_boundary_condition(reach_id, Var::Head, PointRef::FIRST, |_| 1.0)
            .is_ok());
        // Point 9 does not exist on a 3-point reach
        assert!(solver
            .add_boundary_condition(reach_id, Var::Head, PointRef(9), |_| 1.0)
            .is_err());
        assert_eq!(solver.num_boundary_conditions(), 1);
    }
}

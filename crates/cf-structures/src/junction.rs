//! Junction joining several reach endpoints at a common water level.

use crate::error::{StructureError, StructureResult};
use crate::link::Connection;
use cf_core::equation::{Equation, EquationSet, Var};
use cf_core::relation::PointState;

/// Junction where reaches converge or diverge.
///
/// Contributes one mass balance over all connected flows plus N-1 equations
/// forcing every connected head to match the first connection's head. The
/// connection order is inflows first, then outflows, in registration order.
#[derive(Debug, Clone)]
pub struct Junction {
    name: String,
    inflows: Vec<Connection>,
    outflows: Vec<Connection>,
}

impl Junction {
    pub fn new(name: String) -> Self {
        Self {
            name,
            inflows: Vec::new(),
            outflows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a connection whose flow enters the junction.
    pub fn add_inflow(&mut self, conn: Connection) {
        self.inflows.push(conn);
    }

    /// Register a connection whose flow leaves the junction.
    pub fn add_outflow(&mut self, conn: Connection) {
        self.outflows.push(conn);
    }

    pub fn inflows(&self) -> &[Connection] {
        &self.inflows
    }

    pub fn outflows(&self) -> &[Connection] {
        &self.outflows
    }

    pub fn num_connections(&self) -> usize {
        self.inflows.len() + self.outflows.len()
    }

    /// Linearized junction equations given per-connection states, in the same
    /// order as `inflows()` and `outflows()`.
    ///
    /// A junction with fewer than two connections contributes nothing.
    pub fn equations(
        &self,
        inflow_states: &[PointState],
        outflow_states: &[PointState],
    ) -> StructureResult<EquationSet> {
        if inflow_states.len() != self.inflows.len() {
            return Err(StructureError::StateCount {
                name: self.name.clone(),
                side: "inflow",
                expected: self.inflows.len(),
                got: inflow_states.len(),
            });
        }
        if outflow_states.len() != self.outflows.len() {
            return Err(StructureError::StateCount {
                name: self.name.clone(),
                side: "outflow",
                expected: self.outflows.len(),
                got: outflow_states.len(),
            });
        }
        if self.num_connections() < 2 {
            return Ok(EquationSet::new());
        }

        let mut set = EquationSet::new();

        // Mass balance: corrected inflows minus corrected outflows cancel the
        // current imbalance.
        let mut mass = Equation::new();
        let mut rhs = 0.0;
        for (conn, state) in self.inflows.iter().zip(inflow_states) {
            mass.add_term(conn.element, Var::Flow, conn.point, 1.0);
            rhs -= state.flow_m3s;
        }
        for (conn, state) in self.outflows.iter().zip(outflow_states) {
            mass.add_term(conn.element, Var::Flow, conn.point, -1.0);
            rhs += state.flow_m3s;
        }
        mass.set_rhs(rhs);
        set.push(mass);

        // Common head: every connection matches the first one.
        let first = self.inflows.iter().chain(&self.outflows).next();
        let first_state = inflow_states.iter().chain(outflow_states).next();
        if let (Some(first), Some(first_state)) = (first, first_state) {
            let rest = self
                .inflows
                .iter()
                .chain(&self.outflows)
                .zip(inflow_states.iter().chain(outflow_states))
                .skip(1);
            for (conn, state) in rest {
                let mut eq = Equation::new();
                eq.add_term(first.element, Var::Head, first.point, 1.0)
                    .add_term(conn.element, Var::Head, conn.point, -1.0)
                    .set_rhs(-(first_state.head_m - state.head_m));
                set.push(eq);
            }
        }

        Ok(set)
    }
}

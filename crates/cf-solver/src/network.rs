//! The element arena and its wiring.

use crate::element::Element;
use crate::error::{SolverError, SolverResult};
use cf_channel::Reach;
use cf_core::ids::{ElementId, ReachId, StructureId};
use cf_core::relation::PointState;
use cf_structures::{Connection, Gate, Junction, Pump, Turbine, Valve};

/// A hydraulic network: reaches plus the structures wired between them.
///
/// Elements live in an arena and are addressed by the `ElementId` returned
/// when they are added. Wiring is validated eagerly, so a bad link is
/// reported where it is made rather than in the middle of a solve.
#[derive(Debug, Default)]
pub struct Network {
    elements: Vec<Element>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, element: Element) -> ElementId {
        let id = ElementId::from_index(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    pub fn add_reach(&mut self, reach: Reach) -> ReachId {
        self.push(Element::Reach(reach))
    }

    pub fn add_gate(&mut self, gate: Gate) -> StructureId {
        self.push(Element::Gate(gate))
    }

    pub fn add_valve(&mut self, valve: Valve) -> StructureId {
        self.push(Element::Valve(valve))
    }

    pub fn add_turbine(&mut self, turbine: Turbine) -> StructureId {
        self.push(Element::Turbine(turbine))
    }

    pub fn add_pump(&mut self, pump: Pump) -> StructureId {
        self.push(Element::Pump(pump))
    }

    pub fn add_junction(&mut self, junction: Junction) -> StructureId {
        self.push(Element::Junction(junction))
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId::from_index(i as u32), e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ElementId, &mut Element)> {
        self.elements
            .iter_mut()
            .enumerate()
            .map(|(i, e)| (ElementId::from_index(i as u32), e))
    }

    pub fn element(&self, id: ElementId) -> SolverResult<&Element> {
        self.elements
            .get(id.index() as usize)
            .ok_or_else(|| unknown_element(id))
    }

    fn element_mut(&mut self, id: ElementId) -> SolverResult<&mut Element> {
        self.elements
            .get_mut(id.index() as usize)
            .ok_or_else(|| unknown_element(id))
    }

    pub fn reach(&self, id: ElementId) -> SolverResult<&Reach> {
        match self.element(id)? {
            Element::Reach(r) => Ok(r),
            other => Err(wrong_kind(id, other, "reach")),
        }
    }

    pub fn reach_mut(&mut self, id: ElementId) -> SolverResult<&mut Reach> {
        match self.element_mut(id)? {
            Element::Reach(r) => Ok(r),
            other => Err(wrong_kind(id, other, "reach")),
        }
    }

    pub fn gate_mut(&mut self, id: ElementId) -> SolverResult<&mut Gate> {
        match self.element_mut(id)? {
            Element::Gate(g) => Ok(g),
            other => Err(wrong_kind(id, other, "gate")),
        }
    }

    pub fn valve_mut(&mut self, id: ElementId) -> SolverResult<&mut Valve> {
        match self.element_mut(id)? {
            Element::Valve(v) => Ok(v),
            other => Err(wrong_kind(id, other, "valve")),
        }
    }

    pub fn turbine_mut(&mut self, id: ElementId) -> SolverResult<&mut Turbine> {
        match self.element_mut(id)? {
            Element::Turbine(t) => Ok(t),
            other => Err(wrong_kind(id, other, "turbine")),
        }
    }

    pub fn pump_mut(&mut self, id: ElementId) -> SolverResult<&mut Pump> {
        match self.element_mut(id)? {
            Element::Pump(p) => Ok(p),
            other => Err(wrong_kind(id, other, "pump")),
        }
    }

    /// Current state at a connection endpoint.
    pub fn point_state(&self, conn: Connection) -> SolverResult<PointState> {
        let reach = self.reach(conn.element)?;
        let idx = reach.resolve_point(conn.point)?;
        Ok(reach.point_state(idx)?)
    }

    fn validate_endpoint(&self, conn: Connection) -> SolverResult<()> {
        let reach = self.reach(conn.element)?;
        reach.resolve_point(conn.point)?;
        Ok(())
    }

    /// Wire a two-port structure between two reach points.
    ///
    /// Both endpoints must name existing reaches with resolvable points;
    /// chaining a structure directly to another structure is rejected.
    pub fn link(
        &mut self,
        structure: StructureId,
        up: Connection,
        down: Connection,
    ) -> SolverResult<()> {
        self.validate_endpoint(up)?;
        self.validate_endpoint(down)?;
        match self.element_mut(structure)? {
            Element::Gate(g) => g.connect(up, down),
            Element::Valve(v) => v.connect(up, down),
            Element::Turbine(t) => t.connect(up, down),
            Element::Pump(p) => p.connect(up, down),
            other => {
                return Err(SolverError::Configuration {
                    what: format!(
                        "element {} is a {}, not a two-port structure",
                        structure,
                        other.kind()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Register a reach endpoint whose flow enters a junction.
    pub fn junction_add_inflow(
        &mut self,
        junction: StructureId,
        conn: Connection,
    ) -> SolverResult<()> {
        self.validate_endpoint(conn)?;
        match self.element_mut(junction)? {
            Element::Junction(j) => {
                j.add_inflow(conn);
                Ok(())
            }
            other => Err(wrong_kind(junction, other, "junction")),
        }
    }

    /// Register a reach endpoint whose flow leaves a junction.
    pub fn junction_add_outflow(
        &mut self,
        junction: StructureId,
        conn: Connection,
    ) -> SolverResult<()> {
        self.validate_endpoint(conn)?;
        match self.element_mut(junction)? {
            Element::Junction(j) => {
                j.add_outflow(conn);
                Ok(())
            }
            other => Err(wrong_kind(junction, other, "junction")),
        }
    }
}

fn unknown_element(id: ElementId) -> SolverError {
    SolverError::Configuration {
        what: format!("no element with id {}", id),
    }
}

fn wrong_kind(id: ElementId, actual: &Element, expected: &str) -> SolverError {
    SolverError::Configuration {
        what: format!("element {} is a {}, expected a {}", id, actual.kind(), expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_channel::TrapezoidSection;
    use cf_core::ids::PointRef;
    use cf_core::units::{m, m3ps};

    fn reach(name: &str) -> Reach {
        let section = TrapezoidSection::rectangular(m(5.0)).unwrap();
        Reach::uniform(
            name.into(),
            section,
            0.0,
            0.0,
            m(100.0),
            3,
            m(1.0),
            m3ps(2.0),
        )
        .unwrap()
    }

    #[test]
    fn linking_a_gate_between_reaches() {
        let mut net = Network::new();
        let r1 = net.add_reach(reach("upper"));
        let r2 = net.add_reach(reach("lower"));
        let gate = net.add_gate(Gate::new("g".into(), m(2.0)).unwrap());

        net.link(
            gate,
            Connection::upstream_end(r1),
            Connection::downstream_start(r2),
        )
        .unwrap();

        match net.element(gate).unwrap() {
            Element::Gate(g) => assert!(g.connections().is_ok()),
            _ => panic!("expected gate"),
        }
    }

    #[test]
    fn linking_rejects_bad_wiring() {
        let mut net = Network::new();
        let r1 = net.add_reach(reach("upper"));
        let r2 = net.add_reach(reach("lower"));
        let gate = net.add_gate(Gate::new("g".into(), m(2.0)).unwrap());
        let pump = net.add_pump(Pump::new("p".into()));

        // A reach is not a two-port structure
        assert!(net
            .link(
                r1,
                Connection::upstream_end(r2),
                Connection::downstream_start(r2)
            )
            .is_err());

        // Structure-to-structure chaining has no state to attach to
        assert!(net
            .link(
                gate,
                Connection::upstream_end(pump),
                Connection::downstream_start(r2)
            )
            .is_err());

        // Out-of-range point
        assert!(net
            .link(
                gate,
                Connection::new(r1, PointRef(7)),
                Connection::downstream_start(r2)
            )
            .is_err());

        // Unknown id
        let ghost = ElementId::from_index(99);
        assert!(net
            .link(
                gate,
                Connection::upstream_end(ghost),
                Connection::downstream_start(r2)
            )
            .is_err());
    }

    #[test]
    fn junction_wiring_checks_kind() {
        let mut net = Network::new();
        let r1 = net.add_reach(reach("a"));
        let junction = net.add_junction(Junction::new("j".into()));
        let gate = net.add_gate(Gate::new("g".into(), m(2.0)).unwrap());

        net.junction_add_inflow(junction, Connection::upstream_end(r1))
            .unwrap();
        assert!(net
            .junction_add_inflow(gate, Connection::upstream_end(r1))
            .is_err());
    }

    #[test]
    fn point_state_reads_the_reach() {
        let mut net = Network::new();
        let r1 = net.add_reach(reach("a"));

        let state = net.point_state(Connection::upstream_end(r1)).unwrap();
        assert_eq!(state.head_m, 1.0);
        assert_eq!(state.flow_m3s, 2.0);
    }

    #[test]
    fn typed_accessors_enforce_kind() {
        let mut net = Network::new();
        let r1 = net.add_reach(reach("a"));
        let pump = net.add_pump(Pump::new("p".into()));

        assert!(net.reach(r1).is_ok());
        assert!(net.reach(pump).is_err());
        assert!(net.pump_mut(pump).is_ok());
        assert!(net.gate_mut(pump).is_err());
    }
}

//! Closed set of network elements.

use crate::error::SolverResult;
use crate::network::Network;
use cf_channel::Reach;
use cf_core::equation::{Equation, EquationSet};
use cf_core::ids::{ElementId, PointRef};
use cf_core::relation::{PairRelation, PointState};
use cf_structures::{Connection, Gate, Junction, Pump, Turbine, Valve};

/// One element of the network arena.
///
/// The set is closed on purpose: the assembler and the variable map match on
/// it exhaustively, so adding a variant turns every site that needs updating
/// into a compile error.
#[derive(Debug, Clone)]
pub enum Element {
    Reach(Reach),
    Gate(Gate),
    Valve(Valve),
    Turbine(Turbine),
    Pump(Pump),
    Junction(Junction),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Element::Reach(r) => r.name(),
            Element::Gate(g) => g.name(),
            Element::Valve(v) => v.name(),
            Element::Turbine(t) => t.name(),
            Element::Pump(p) => p.name(),
            Element::Junction(j) => j.name(),
        }
    }

    /// Short label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Reach(_) => "reach",
            Element::Gate(_) => "gate",
            Element::Valve(_) => "valve",
            Element::Turbine(_) => "turbine",
            Element::Pump(_) => "pump",
            Element::Junction(_) => "junction",
        }
    }

    pub fn is_reach(&self) -> bool {
        matches!(self, Element::Reach(_))
    }

    /// Equations this element contributes to the global system for one step.
    ///
    /// `id` is the element's own handle; structure endpoint states are
    /// resolved against `net`.
    pub fn contribute_equations(
        &self,
        id: ElementId,
        net: &Network,
        dt_s: f64,
        theta: f64,
    ) -> SolverResult<EquationSet> {
        let set = match self {
            Element::Reach(reach) => {
                let mut set = EquationSet::new();
                for (i, seg) in reach.segment_equations(dt_s, theta).iter().enumerate() {
                    let up = (id, PointRef(i as i32));
                    let down = (id, PointRef(i as i32 + 1));
                    set.push(Equation::from_pair_relation(&seg.continuity, up, down));
                    set.push(Equation::from_pair_relation(&seg.momentum, up, down));
                }
                set
            }
            Element::Gate(gate) => {
                let (up, down) = gate.connections()?;
                let rels = gate.relations(net.point_state(up)?, net.point_state(down)?);
                pair_relation_set(&rels, up, down)
            }
            Element::Valve(valve) => {
                let (up, down) = valve.connections()?;
                let rels = valve.relations(net.point_state(up)?, net.point_state(down)?);
                pair_relation_set(&rels, up, down)
            }
            Element::Turbine(turbine) => {
                let (up, down) = turbine.connections()?;
                let rels = turbine.relations(net.point_state(up)?, net.point_state(down)?);
                pair_relation_set(&rels, up, down)
            }
            Element::Pump(pump) => {
                let (up, down) = pump.connections()?;
                let rels = pump.relations(net.point_state(up)?, net.point_state(down)?);
                pair_relation_set(&rels, up, down)
            }
            Element::Junction(junction) => {
                let inflow_states = endpoint_states(net, junction.inflows())?;
                let outflow_states = endpoint_states(net, junction.outflows())?;
                junction.equations(&inflow_states, &outflow_states)?
            }
        };
        Ok(set)
    }

    /// Post-solve hook, called once per step after reach states update.
    ///
    /// Structures hold no per-step state today, so this is a no-op for every
    /// variant.
    pub fn finish_step(&mut self) {}
}

fn pair_relation_set(rels: &[PairRelation; 2], up: Connection, down: Connection) -> EquationSet {
    let mut set = EquationSet::new();
    for rel in rels {
        set.push(Equation::from_pair_relation(
            rel,
            (up.element, up.point),
            (down.element, down.point),
        ));
    }
    set
}

fn endpoint_states(net: &Network, conns: &[Connection]) -> SolverResult<Vec<PointState>> {
    conns.iter().map(|c| net.point_state(*c)).collect()
}

//! Mapping from state variables to global matrix columns.

use crate::element::Element;
use crate::error::{SolverError, SolverResult};
use crate::network::Network;
use cf_core::equation::Var;
use cf_core::ids::{ElementId, PointRef};

#[derive(Clone, Copy, Debug)]
struct ReachSlot {
    base: usize,
    num_points: usize,
}

/// Immutable layout of the global unknown vector.
///
/// Reaches are laid out in registration order; each point contributes its
/// head then its flow, so a point's columns are `base + 2i` and
/// `base + 2i + 1`. Structures carry no state of their own and thus no
/// columns.
///
/// The map is built once from a finished network. Keeping it immutable means
/// a column lookup can never silently disagree with the matrix being stamped.
#[derive(Clone, Debug)]
pub struct VariableMap {
    slots: Vec<Option<ReachSlot>>,
    total: usize,
}

impl VariableMap {
    /// Lay out every reach of the network.
    pub fn build(net: &Network) -> Self {
        let mut slots = vec![None; net.num_elements()];
        let mut base = 0;
        for (id, element) in net.iter() {
            if let Element::Reach(reach) = element {
                slots[id.index() as usize] = Some(ReachSlot {
                    base,
                    num_points: reach.num_points(),
                });
                base += 2 * reach.num_points();
            }
        }
        Self { slots, total: base }
    }

    /// Total number of unknowns (and required equations).
    pub fn num_vars(&self) -> usize {
        self.total
    }

    /// Column of one variable, resolving signed point references.
    pub fn column(&self, element: ElementId, var: Var, point: PointRef) -> SolverResult<usize> {
        let slot = self
            .slots
            .get(element.index() as usize)
            .and_then(|s| s.as_ref())
            .ok_or_else(|| SolverError::Configuration {
                what: format!("element {} carries no state variables", element),
            })?;
        let point_idx = point
            .resolve(slot.num_points)
            .ok_or_else(|| SolverError::Configuration {
                what: format!(
                    "point {} out of range for element {} with {} points",
                    point, element, slot.num_points
                ),
            })?;
        let offset = match var {
            Var::Head => 0,
            Var::Flow => 1,
        };
        Ok(slot.base + 2 * point_idx + offset)
    }

    /// Base column and point count for a reach, if it has one.
    pub fn slot(&self, element: ElementId) -> Option<(usize, usize)> {
        self.slots
            .get(element.index() as usize)
            .and_then(|s| s.as_ref())
            .map(|s| (s.base, s.num_points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_channel::{Reach, TrapezoidSection};
    use cf_core::units::{m, m3ps};
    use cf_structures::Pump;

    fn reach(name: &str, num_points: usize) -> Reach {
        let section = TrapezoidSection::rectangular(m(5.0)).unwrap();
        Reach::uniform(
            name.into(),
            section,
            0.0,
            0.0,
            m(100.0),
            num_points,
            m(1.0),
            m3ps(0.0),
        )
        .unwrap()
    }

    #[test]
    fn reaches_interleave_head_then_flow() {
        let mut net = Network::new();
        let r1 = net.add_reach(reach("a", 3));
        let r2 = net.add_reach(reach("b", 2));
        let map = VariableMap::build(&net);

        assert_eq!(map.num_vars(), 10);
        assert_eq!(map.column(r1, Var::Head, PointRef(0)).unwrap(), 0);
        assert_eq!(map.column(r1, Var::Flow, PointRef(0)).unwrap(), 1);
        assert_eq!(map.column(r1, Var::Head, PointRef(2)).unwrap(), 4);
        // Second reach starts after the first one's 6 columns
        assert_eq!(map.column(r2, Var::Head, PointRef(0)).unwrap(), 6);
        assert_eq!(map.column(r2, Var::Flow, PointRef::LAST).unwrap(), 9);
    }

    #[test]
    fn signed_references_resolve_against_the_reach() {
        let mut net = Network::new();
        let r1 = net.add_reach(reach("a", 4));
        let map = VariableMap::build(&net);

        assert_eq!(
            map.column(r1, Var::Head, PointRef::LAST).unwrap(),
            map.column(r1, Var::Head, PointRef(3)).unwrap()
        );
        assert!(map.column(r1, Var::Head, PointRef(4)).is_err());
    }

    #[test]
    fn structures_have_no_columns() {
        let mut net = Network::new();
        let _r1 = net.add_reach(reach("a", 2));
        let pump = net.add_pump(Pump::new("p".into()));
        let map = VariableMap::build(&net);

        assert_eq!(map.num_vars(), 4);
        assert!(map.slot(pump).is_none());
        assert!(map.column(pump, Var::Head, PointRef(0)).is_err());
    }
}

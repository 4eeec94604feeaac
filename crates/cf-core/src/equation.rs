//! Typed builder for the rows of the global linear system.
//!
//! Every component contributes its equations as `Equation` values: a list of
//! `(element, variable, point) -> coefficient` terms plus a right-hand side.
//! The assembler resolves each term to a matrix column through the variable
//! map; nothing here knows about column numbering.

use crate::ids::{ElementId, PointRef};
use crate::relation::PairRelation;

/// The two state variables carried per computational point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Var {
    /// Water level (m)
    Head,
    /// Discharge (m³/s)
    Flow,
}

/// One coefficient of an equation: which unknown it multiplies, and by what.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquationTerm {
    pub element: ElementId,
    pub var: Var,
    pub point: PointRef,
    pub coeff: f64,
}

/// One row of the global system, in delta form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Equation {
    terms: Vec<EquationTerm>,
    rhs: f64,
}

impl Equation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one `coeff * dVar(element, point)` term.
    pub fn add_term(
        &mut self,
        element: ElementId,
        var: Var,
        point: PointRef,
        coeff: f64,
    ) -> &mut Self {
        self.terms.push(EquationTerm {
            element,
            var,
            point,
            coeff,
        });
        self
    }

    pub fn set_rhs(&mut self, rhs: f64) -> &mut Self {
        self.rhs = rhs;
        self
    }

    pub fn terms(&self) -> &[EquationTerm] {
        &self.terms
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Expand a two-point relation into a row against concrete endpoints.
    ///
    /// Zero coefficients are dropped so the stamped matrix stays sparse.
    /// Term order is fixed (up H, up Q, down H, down Q) for reproducibility.
    pub fn from_pair_relation(
        rel: &PairRelation,
        up: (ElementId, PointRef),
        down: (ElementId, PointRef),
    ) -> Self {
        let mut eq = Equation::new();
        if rel.dh_up != 0.0 {
            eq.add_term(up.0, Var::Head, up.1, rel.dh_up);
        }
        if rel.dq_up != 0.0 {
            eq.add_term(up.0, Var::Flow, up.1, rel.dq_up);
        }
        if rel.dh_down != 0.0 {
            eq.add_term(down.0, Var::Head, down.1, rel.dh_down);
        }
        if rel.dq_down != 0.0 {
            eq.add_term(down.0, Var::Flow, down.1, rel.dq_down);
        }
        eq.set_rhs(rel.rhs);
        eq
    }
}

/// The equations contributed by one component for one timestep.
#[derive(Clone, Debug, Default)]
pub struct EquationSet {
    equations: Vec<Equation>,
}

impl EquationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, eq: Equation) {
        self.equations.push(eq);
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Equation> {
        self.equations.iter()
    }

    pub fn into_vec(self) -> Vec<Equation> {
        self.equations
    }
}

impl From<Vec<Equation>> for EquationSet {
    fn from(equations: Vec<Equation>) -> Self {
        Self { equations }
    }
}

impl IntoIterator for EquationSet {
    type Item = Equation;
    type IntoIter = std::vec::IntoIter<Equation>;

    fn into_iter(self) -> Self::IntoIter {
        self.equations.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::PointState;

    #[test]
    fn builder_accumulates_terms_and_rhs() {
        let a = ElementId::from_index(0);
        let b = ElementId::from_index(1);

        let mut eq = Equation::new();
        eq.add_term(a, Var::Flow, PointRef::LAST, 1.0)
            .add_term(b, Var::Flow, PointRef::FIRST, -1.0)
            .set_rhs(-2.5);

        assert_eq!(eq.terms().len(), 2);
        assert_eq!(eq.terms()[0].element, a);
        assert_eq!(eq.terms()[1].var, Var::Flow);
        assert_eq!(eq.rhs(), -2.5);
    }

    #[test]
    fn pair_relation_expansion_skips_zero_coefficients() {
        let up = ElementId::from_index(0);
        let down = ElementId::from_index(1);
        let rel = PairRelation::continuity(PointState::new(2.0, 5.0), PointState::new(1.0, 3.0));

        let eq = Equation::from_pair_relation(&rel, (up, PointRef::LAST), (down, PointRef::FIRST));

        // Continuity involves only the two flow unknowns
        assert_eq!(eq.terms().len(), 2);
        assert!(eq.terms().iter().all(|t| t.var == Var::Flow));
        assert_eq!(eq.rhs(), -2.0);
    }

    #[test]
    fn equation_set_collects() {
        let mut set = EquationSet::new();
        assert!(set.is_empty());
        set.push(Equation::new());
        set.push(Equation::new());
        assert_eq!(set.len(), 2);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn term_round_trips() {
        let term = EquationTerm {
            element: ElementId::from_index(2),
            var: Var::Head,
            point: PointRef(-1),
            coeff: 0.5,
        };
        let json = serde_json::to_string(&term).unwrap();
        assert_eq!(serde_json::from_str::<EquationTerm>(&json).unwrap(), term);
        assert!(json.contains("\"Head\""));
    }
}

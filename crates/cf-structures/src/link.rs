//! Connections between structures and reach points.

use crate::error::{StructureError, StructureResult};
use cf_core::ids::{ElementId, PointRef};

/// One attachment point: an element plus a (possibly signed) point on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    pub element: ElementId,
    pub point: PointRef,
}

impl Connection {
    pub fn new(element: ElementId, point: PointRef) -> Self {
        Self { element, point }
    }

    /// The last point of a reach, where flow leaves it.
    pub fn upstream_end(element: ElementId) -> Self {
        Self::new(element, PointRef::LAST)
    }

    /// The first point of a reach, where flow enters it.
    pub fn downstream_start(element: ElementId) -> Self {
        Self::new(element, PointRef::FIRST)
    }
}

/// The two endpoints of an inline structure, filled in when the network wires
/// it between reaches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TwoPortLink {
    up: Option<Connection>,
    down: Option<Connection>,
}

impl TwoPortLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach both endpoints. Re-linking replaces the previous attachment.
    pub fn connect(&mut self, up: Connection, down: Connection) {
        self.up = Some(up);
        self.down = Some(down);
    }

    pub fn upstream(&self) -> Option<Connection> {
        self.up
    }

    pub fn downstream(&self) -> Option<Connection> {
        self.down
    }

    pub fn is_linked(&self) -> bool {
        self.up.is_some() && self.down.is_some()
    }

    /// Both endpoints, or `NotLinked` naming the owning structure.
    pub fn require(&self, name: &str) -> StructureResult<(Connection, Connection)> {
        match (self.up, self.down) {
            (Some(up), Some(down)) => Ok((up, down)),
            _ => Err(StructureError::NotLinked {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_starts_empty() {
        let link = TwoPortLink::new();
        assert!(!link.is_linked());
        assert!(link.require("s").is_err());
    }

    #[test]
    fn connect_fills_both_ends() {
        let a = ElementId::from_index(0);
        let b = ElementId::from_index(1);

        let mut link = TwoPortLink::new();
        link.connect(Connection::upstream_end(a), Connection::downstream_start(b));

        assert!(link.is_linked());
        let (up, down) = link.require("s").unwrap();
        assert_eq!(up.element, a);
        assert_eq!(up.point, PointRef::LAST);
        assert_eq!(down.element, b);
        assert_eq!(down.point, PointRef::FIRST);
    }
}

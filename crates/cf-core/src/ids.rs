use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier for an element in the network arena.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<ElementId>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(NonZeroU32);

impl ElementId {
    /// Create an ElementId from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        // index+1 must be nonzero
        Self(NonZeroU32::new(index + 1).expect("index+1 is nonzero"))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.index())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type ReachId = ElementId;
pub type StructureId = ElementId;

/// Signed reference to a computational point on a reach.
///
/// Negative values count from the end, so `PointRef(-1)` is the last point
/// of whatever reach it is resolved against.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointRef(pub i32);

impl PointRef {
    /// First point of a reach.
    pub const FIRST: PointRef = PointRef(0);
    /// Last point of a reach.
    pub const LAST: PointRef = PointRef(-1);

    /// Resolve against a reach with `num_points` points.
    ///
    /// Returns `None` when the reference falls outside `0..num_points`.
    pub fn resolve(self, num_points: usize) -> Option<usize> {
        let n = num_points as i64;
        let i = self.0 as i64;
        let resolved = if i < 0 { n + i } else { i };
        if (0..n).contains(&resolved) {
            Some(resolved as usize)
        } else {
            None
        }
    }
}

impl From<i32> for PointRef {
    fn from(i: i32) -> Self {
        PointRef(i)
    }
}

impl fmt::Debug for PointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointRef({})", self.0)
    }
}

impl fmt::Display for PointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = ElementId::from_index(i);
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn option_id_is_small() {
        // This is a classic reason for NonZero: Option<Id> can be same size as Id.
        assert_eq!(
            core::mem::size_of::<ElementId>(),
            core::mem::size_of::<Option<ElementId>>()
        );
    }

    #[test]
    fn point_ref_resolves_forward_and_backward() {
        assert_eq!(PointRef(0).resolve(5), Some(0));
        assert_eq!(PointRef(4).resolve(5), Some(4));
        assert_eq!(PointRef(-1).resolve(5), Some(4));
        assert_eq!(PointRef(-5).resolve(5), Some(0));
    }

    #[test]
    fn point_ref_rejects_out_of_range() {
        assert_eq!(PointRef(5).resolve(5), None);
        assert_eq!(PointRef(-6).resolve(5), None);
        assert_eq!(PointRef(0).resolve(0), None);
    }

    #[test]
    fn point_ref_constants() {
        assert_eq!(PointRef::FIRST.resolve(3), Some(0));
        assert_eq!(PointRef::LAST.resolve(3), Some(2));
    }
}

//! Trapezoidal cross-section geometry.

use crate::error::{ChannelError, ChannelResult};
use cf_core::numeric::DRY_FLOOR;
use cf_core::units::Length;

/// Trapezoidal channel cross-section.
///
/// Defined by the bottom width `b` and the side slope `z` (horizontal run per
/// unit rise; `z = 0` is a rectangle). All properties are pure functions of
/// flow depth, with depth clamped at zero so a drawn-down reach degenerates
/// to a dry section instead of producing negative areas.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapezoidSection {
    bottom_width_m: f64,
    side_slope: f64,
}

impl TrapezoidSection {
    /// Create a new section.
    pub fn new(bottom_width: Length, side_slope: f64) -> ChannelResult<Self> {
        let b = bottom_width.value;
        if !b.is_finite() || b <= 0.0 {
            return Err(ChannelError::InvalidGeometry {
                what: "bottom width must be positive",
            });
        }
        if !side_slope.is_finite() || side_slope < 0.0 {
            return Err(ChannelError::InvalidGeometry {
                what: "side slope must be non-negative",
            });
        }
        Ok(Self {
            bottom_width_m: b,
            side_slope,
        })
    }

    /// Rectangular section (side slope 0).
    pub fn rectangular(bottom_width: Length) -> ChannelResult<Self> {
        Self::new(bottom_width, 0.0)
    }

    pub fn bottom_width_m(&self) -> f64 {
        self.bottom_width_m
    }

    pub fn side_slope(&self) -> f64 {
        self.side_slope
    }

    /// Flow area `A(h) = (b + z·h)·h` (m²).
    pub fn area(&self, depth_m: f64) -> f64 {
        let h = depth_m.max(0.0);
        (self.bottom_width_m + self.side_slope * h) * h
    }

    /// Water-surface width `B(h) = b + 2·z·h` (m).
    pub fn top_width(&self, depth_m: f64) -> f64 {
        let h = depth_m.max(0.0);
        self.bottom_width_m + 2.0 * self.side_slope * h
    }

    /// Wetted perimeter `P(h) = b + 2·h·sqrt(1 + z²)` (m).
    pub fn wetted_perimeter(&self, depth_m: f64) -> f64 {
        let h = depth_m.max(0.0);
        self.bottom_width_m + 2.0 * h * (1.0 + self.side_slope * self.side_slope).sqrt()
    }

    /// Hydraulic radius `R = A/P` (m), zero for a dry section.
    pub fn hydraulic_radius(&self, depth_m: f64) -> f64 {
        let p = self.wetted_perimeter(depth_m);
        if p < DRY_FLOOR {
            return 0.0;
        }
        self.area(depth_m) / p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::numeric::{Tolerances, nearly_equal};
    use cf_core::units::m;

    #[test]
    fn rectangular_geometry() {
        let sec = TrapezoidSection::rectangular(m(5.0)).unwrap();
        let tol = Tolerances::default();
        assert!(nearly_equal(sec.area(2.0), 10.0, tol));
        assert!(nearly_equal(sec.top_width(2.0), 5.0, tol));
        assert!(nearly_equal(sec.wetted_perimeter(2.0), 9.0, tol));
        assert!(nearly_equal(sec.hydraulic_radius(2.0), 10.0 / 9.0, tol));
    }

    #[test]
    fn trapezoid_geometry() {
        // b = 3, z = 2, h = 1: A = (3 + 2)·1 = 5, B = 3 + 4 = 7
        let sec = TrapezoidSection::new(m(3.0), 2.0).unwrap();
        let tol = Tolerances::default();
        assert!(nearly_equal(sec.area(1.0), 5.0, tol));
        assert!(nearly_equal(sec.top_width(1.0), 7.0, tol));
        assert!(nearly_equal(
            sec.wetted_perimeter(1.0),
            3.0 + 2.0 * 5.0_f64.sqrt(),
            tol
        ));
    }

    #[test]
    fn dry_section_degenerates_to_zero() {
        let sec = TrapezoidSection::rectangular(m(5.0)).unwrap();
        assert_eq!(sec.area(0.0), 0.0);
        assert_eq!(sec.area(-1.0), 0.0);
        assert_eq!(sec.hydraulic_radius(0.0), 0.0);
        // Top width of a dry rectangle is still the bottom width
        assert_eq!(sec.top_width(-0.5), 5.0);
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(TrapezoidSection::new(m(0.0), 1.0).is_err());
        assert!(TrapezoidSection::new(m(-2.0), 1.0).is_err());
        assert!(TrapezoidSection::new(m(5.0), -0.1).is_err());
        assert!(TrapezoidSection::new(m(f64::NAN), 0.0).is_err());
    }
}

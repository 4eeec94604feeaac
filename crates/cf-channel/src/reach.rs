//! A discretized channel reach producing linearized Saint-Venant equations.

use crate::error::{ChannelError, ChannelResult};
use crate::section::TrapezoidSection;
use cf_core::numeric::DRY_FLOOR;
use cf_core::relation::{PairRelation, PointState};
use cf_core::units::constants::G_MPS2;
use cf_core::units::{Length, VolumeRate};
use cf_core::PointRef;

/// Linearized equation pair for one segment (adjacent point pair) of a reach.
#[derive(Debug, Clone, Copy)]
pub struct SegmentEquations {
    pub continuity: PairRelation,
    pub momentum: PairRelation,
}

/// One reach of open channel, discretized into `num_points` computational
/// points spaced `dx` apart, each carrying a head and a flow.
///
/// ## Model
///
/// The reach contributes, per segment, a delta-form linearization of the
/// Saint-Venant equations under the Preissmann 4-point implicit scheme:
///
/// - continuity `∂Q/∂x + B·∂H/∂t = 0`
/// - momentum `∂Q/∂t + gA(∂H/∂x − S₀ + Sf) = 0` with Manning friction,
///   the friction slope linearized about the segment-averaged flow
///
/// All coefficients are evaluated at the average of the two endpoint states.
/// Heads are measured from the local channel invert, so head doubles as flow
/// depth when evaluating section geometry; the bed slope term carries the
/// elevation drop instead.
///
/// State is mutated only through [`Reach::update_state`], which applies the
/// solved corrections after each global solve.
#[derive(Debug, Clone)]
pub struct Reach {
    name: String,
    section: TrapezoidSection,
    manning_n: f64,
    bed_slope: f64,
    length_m: f64,
    dx_m: f64,
    head_m: Vec<f64>,
    flow_m3s: Vec<f64>,
}

impl Reach {
    /// Create a reach from explicit initial state arrays.
    ///
    /// Both arrays must have the same length (>= 2); that length becomes the
    /// point count and fixes `dx = length / (num_points - 1)`.
    pub fn new(
        name: String,
        section: TrapezoidSection,
        manning_n: f64,
        bed_slope: f64,
        length: Length,
        initial_head_m: Vec<f64>,
        initial_flow_m3s: Vec<f64>,
    ) -> ChannelResult<Self> {
        let length_m = length.value;
        if !length_m.is_finite() || length_m <= 0.0 {
            return Err(ChannelError::InvalidGeometry {
                what: "reach length must be positive",
            });
        }
        if !manning_n.is_finite() || manning_n < 0.0 {
            return Err(ChannelError::InvalidGeometry {
                what: "Manning roughness must be non-negative",
            });
        }
        if !bed_slope.is_finite() {
            return Err(ChannelError::InvalidGeometry {
                what: "bed slope must be finite",
            });
        }
        let num_points = initial_head_m.len();
        if num_points < 2 {
            return Err(ChannelError::InvalidGeometry {
                what: "a reach needs at least two computational points",
            });
        }
        if initial_flow_m3s.len() != num_points {
            return Err(ChannelError::StateLength {
                name,
                expected: num_points,
                got: initial_flow_m3s.len(),
            });
        }

        let dx_m = length_m / (num_points - 1) as f64;
        Ok(Self {
            name,
            section,
            manning_n,
            bed_slope,
            length_m,
            dx_m,
            head_m: initial_head_m,
            flow_m3s: initial_flow_m3s,
        })
    }

    /// Create a reach with uniform initial head and flow.
    pub fn uniform(
        name: String,
        section: TrapezoidSection,
        manning_n: f64,
        bed_slope: f64,
        length: Length,
        num_points: usize,
        initial_head: Length,
        initial_flow: VolumeRate,
    ) -> ChannelResult<Self> {
        Self::new(
            name,
            section,
            manning_n,
            bed_slope,
            length,
            vec![initial_head.value; num_points],
            vec![initial_flow.value; num_points],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn section(&self) -> &TrapezoidSection {
        &self.section
    }

    pub fn manning_n(&self) -> f64 {
        self.manning_n
    }

    pub fn bed_slope(&self) -> f64 {
        self.bed_slope
    }

    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    /// Spacing between computational points (m).
    pub fn dx_m(&self) -> f64 {
        self.dx_m
    }

    pub fn num_points(&self) -> usize {
        self.head_m.len()
    }

    /// Number of point pairs, each contributing one continuity and one
    /// momentum equation.
    pub fn num_segments(&self) -> usize {
        self.num_points() - 1
    }

    /// Heads at every point (m above the local invert).
    pub fn head(&self) -> &[f64] {
        &self.head_m
    }

    /// Flows at every point (m³/s).
    pub fn flow(&self) -> &[f64] {
        &self.flow_m3s
    }

    /// Resolve a signed point reference against this reach.
    pub fn resolve_point(&self, point: PointRef) -> ChannelResult<usize> {
        point
            .resolve(self.num_points())
            .ok_or_else(|| ChannelError::PointOutOfRange {
                name: self.name.clone(),
                point: point.0,
                num_points: self.num_points(),
            })
    }

    /// Snapshot of the state at one (already resolved) point.
    pub fn point_state(&self, index: usize) -> ChannelResult<PointState> {
        if index >= self.num_points() {
            return Err(ChannelError::PointOutOfRange {
                name: self.name.clone(),
                point: index as i32,
                num_points: self.num_points(),
            });
        }
        Ok(PointState::new(self.head_m[index], self.flow_m3s[index]))
    }

    /// Manning friction slope `Sf = n²·Q·|Q| / (A²·R^(4/3))`.
    ///
    /// Sign-preserving via `Q·|Q|` so reverse flow decelerates correctly.
    /// Returns zero for a dry segment instead of dividing by zero.
    fn friction_slope(&self, flow_m3s: f64, area_m2: f64, radius_m: f64) -> f64 {
        if area_m2 < DRY_FLOOR || radius_m < DRY_FLOOR {
            return 0.0;
        }
        self.manning_n * self.manning_n * flow_m3s * flow_m3s.abs()
            / (area_m2 * area_m2 * radius_m.powf(4.0 / 3.0))
    }

    /// Derivative of the friction slope with respect to flow, `∂Sf/∂Q`.
    fn friction_slope_dq(&self, flow_m3s: f64, area_m2: f64, radius_m: f64) -> f64 {
        if area_m2 < DRY_FLOOR || radius_m < DRY_FLOOR {
            return 0.0;
        }
        2.0 * self.manning_n * self.manning_n * flow_m3s.abs()
            / (area_m2 * area_m2 * radius_m.powf(4.0 / 3.0))
    }

    /// Produce the linearized equation pair for every segment.
    ///
    /// The right-hand sides are current-state residuals, so a state that
    /// already satisfies steady flow yields an all-zero contribution and the
    /// solver leaves it untouched.
    pub fn segment_equations(&self, dt_s: f64, theta: f64) -> Vec<SegmentEquations> {
        let mut out = Vec::with_capacity(self.num_segments());

        for i in 0..self.num_segments() {
            let h_i = self.head_m[i];
            let q_i = self.flow_m3s[i];
            let h_j = self.head_m[i + 1];
            let q_j = self.flow_m3s[i + 1];

            let h_avg = 0.5 * (h_i + h_j);
            let q_avg = 0.5 * (q_i + q_j);

            let area = self.section.area(h_avg);
            let width = self.section.top_width(h_avg);
            let radius = self.section.hydraulic_radius(h_avg);
            let sf = self.friction_slope(q_avg, area, radius);

            // Continuity: storage on the head corrections, the theta-weighted
            // flux difference on the flow corrections.
            let storage = width * self.dx_m / (2.0 * dt_s);
            let continuity = PairRelation {
                dh_up: storage,
                dq_up: -theta,
                dh_down: storage,
                dq_down: theta,
                rhs: q_i - q_j,
            };

            // Momentum: local acceleration plus the linearized friction term
            // on the flow corrections, hydrostatic pressure gradient on the
            // head corrections. The friction derivative is split between the
            // two endpoints since Sf is evaluated at the segment average.
            let inertia = self.dx_m / (2.0 * dt_s);
            let friction =
                0.5 * G_MPS2 * area * self.dx_m * self.friction_slope_dq(q_avg, area, radius) * theta;
            let momentum = PairRelation {
                dh_up: -G_MPS2 * area * theta,
                dq_up: inertia + friction,
                dh_down: G_MPS2 * area * theta,
                dq_down: inertia + friction,
                rhs: -G_MPS2 * area * self.dx_m * ((h_j - h_i) / self.dx_m - self.bed_slope + sf),
            };

            out.push(SegmentEquations {
                continuity,
                momentum,
            });
        }

        out
    }

    /// Apply the solved corrections element-wise. The only mutation path.
    pub fn update_state(&mut self, dh: &[f64], dq: &[f64]) -> ChannelResult<()> {
        if dh.len() != self.num_points() {
            return Err(ChannelError::StateLength {
                name: self.name.clone(),
                expected: self.num_points(),
                got: dh.len(),
            });
        }
        if dq.len() != self.num_points() {
            return Err(ChannelError::StateLength {
                name: self.name.clone(),
                expected: self.num_points(),
                got: dq.len(),
            });
        }
        for (h, d) in self.head_m.iter_mut().zip(dh) {
            *h += d;
        }
        for (q, d) in self.flow_m3s.iter_mut().zip(dq) {
            *q += d;
        }
        Ok(())
    }
}

//! Linearized orifice hydraulics shared by gates, valves and turbines.

use cf_core::numeric::DRY_FLOOR;
use cf_core::relation::{PairRelation, PointState};
use cf_core::units::constants::G_MPS2;

/// Linearized submerged-orifice equation pair for a structure with the given
/// discharge coefficient and effective flow area.
///
/// The first relation is flow continuity across the structure. The second is
/// the orifice law `Q = Cd·A·sqrt(2g·(H_up − H_down))` linearized about the
/// current state:
///
/// `dQ_up − (∂Q/∂H_up)·dH_up − (∂Q/∂H_down)·dH_down = −(Q_up − Q_calc)`
///
/// A closed structure (`flow_area_m2` below the dry floor) or an adverse head
/// difference degenerates to the zero-flow relation `dQ_up = −Q_up`, which
/// drives the corrected upstream flow to zero.
pub fn orifice_relations(
    cd: f64,
    flow_area_m2: f64,
    up: PointState,
    down: PointState,
) -> [PairRelation; 2] {
    let continuity = PairRelation::continuity(up, down);

    let head_diff = up.head_m - down.head_m;
    let hydraulics = if head_diff <= 0.0 || flow_area_m2 < DRY_FLOOR {
        PairRelation {
            dq_up: 1.0,
            rhs: -up.flow_m3s,
            ..PairRelation::default()
        }
    } else {
        let q_calc = cd * flow_area_m2 * (2.0 * G_MPS2 * head_diff).sqrt();
        let df_dhead = 0.5 * cd * flow_area_m2 * (2.0 * G_MPS2).sqrt() / head_diff.sqrt();
        PairRelation {
            dq_up: 1.0,
            dh_up: -df_dhead,
            dh_down: df_dhead,
            rhs: -(up.flow_m3s - q_calc),
            ..PairRelation::default()
        }
    };

    [continuity, hydraulics]
}

//! Two canal reaches coupled by a sluice gate.
//!
//! Holds the inflow and the downstream water level fixed, lets the network
//! settle, then opens the gate further and runs on to show the upstream
//! level drawing down.
//!
//! Run with `RUST_LOG=debug` to watch the per-step assembly.

use cf_channel::{Reach, TrapezoidSection};
use cf_core::equation::Var;
use cf_core::ids::PointRef;
use cf_core::units::{m, m3ps, s};
use cf_solver::{Network, NetworkSolver, SolverResult};
use cf_structures::{Connection, Gate};

fn main() -> SolverResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let section = TrapezoidSection::rectangular(m(5.0))?;

    let mut network = Network::new();
    let upstream = network.add_reach(Reach::uniform(
        "upstream".into(),
        section,
        0.03,
        0.0002,
        m(1000.0),
        11,
        m(2.0),
        m3ps(5.0),
    )?);
    let downstream = network.add_reach(Reach::uniform(
        "downstream".into(),
        section,
        0.03,
        0.0002,
        m(1000.0),
        11,
        m(1.5),
        m3ps(5.0),
    )?);

    let mut gate = Gate::new("check gate".into(), m(4.0))?;
    gate.set_opening(0.4);
    let gate_id = network.add_gate(gate);
    network.link(
        gate_id,
        Connection::upstream_end(upstream),
        Connection::downstream_start(downstream),
    )?;

    let mut solver = NetworkSolver::with_default_theta(network, s(10.0))?;
    solver.add_boundary_condition(upstream, Var::Flow, PointRef::FIRST, |_| 5.0)?;
    solver.add_boundary_condition(downstream, Var::Head, PointRef::LAST, |_| 1.5)?;

    solver.run_simulation(60)?;
    report("before opening the gate", &solver, upstream, downstream)?;

    solver.gate_mut(gate_id)?.set_opening(0.8);
    solver.run_simulation(60)?;
    report("after opening the gate", &solver, upstream, downstream)?;

    Ok(())
}

fn report(
    label: &str,
    solver: &NetworkSolver,
    upstream: cf_core::ids::ReachId,
    downstream: cf_core::ids::ReachId,
) -> SolverResult<()> {
    let up = solver.network().reach(upstream)?;
    let down = solver.network().reach(downstream)?;

    println!("--- {label} ---");
    println!(
        "upstream   head {:7.4} m -> {:7.4} m, outflow {:7.4} m3/s",
        up.head()[0],
        up.head()[up.num_points() - 1],
        up.flow()[up.num_points() - 1],
    );
    println!(
        "downstream head {:7.4} m -> {:7.4} m, inflow  {:7.4} m3/s",
        down.head()[0],
        down.head()[down.num_points() - 1],
        down.flow()[0],
    );
    Ok(())
}

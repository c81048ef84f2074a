use crate::j2020;
use approx::assert_abs_diff_eq;
use rstest::*;
use smd::cosmic::{KeplerianElements, Spacecraft};
use smd::dynamics::propulsion::{Eps, Thruster};
use smd::dynamics::PropagatorKind;
use smd::linalg::Vector7;
use smd::md::{MemorySink, Mission, MissionOpts};
use smd::propagators::Integrable;
use smd::time::Unit;
use smd::{Bodies, Orbit};
use std::f64::consts::TAU;

fn idle_sc() -> Spacecraft {
    Spacecraft::new(
        "idle",
        500.0,
        50.0,
        Eps::Unlimited,
        vec![Thruster::generic("PPS1350", 0.089, 1650.0)],
        vec![],
        vec![],
    )
}

fn opts(propagator: PropagatorKind) -> MissionOpts {
    MissionOpts::builder()
        .propagator(propagator)
        .status_period(None)
        .build()
}

#[rstest]
#[case(PropagatorKind::Cartesian, 0.0, 28.5)]
#[case(PropagatorKind::Cartesian, 0.001, 0.0)]
#[case(PropagatorKind::GaussianVOP, 0.01, 28.5)]
fn closed_leo_orbit(#[case] propagator: PropagatorKind, #[case] ecc: f64, #[case] inc: f64) {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let orbit =
        Orbit::keplerian(7_000.0, ecc, inc, 10.0, 20.0, 30.0, start, Bodies::Earth).unwrap();
    let end = start + orbit.period();

    let sink = MemorySink::default();
    let mut mission = Mission::new(idle_sc(), orbit, start, end, opts(propagator))
        .with_history(Box::new(sink.clone()));
    let details = mission.propagate().unwrap();

    assert_eq!(mission.current(), end);
    let last = mission.orbit();
    assert!(last.eq_within(&Orbit { epoch: end, ..orbit }, 1e-2, 1e-5), "{last:e}\n{orbit:e}");
    assert_abs_diff_eq!(last.sma(), 7_000.0, epsilon = 1e-3);
    // Nothing to do for the thrusters
    assert_eq!(mission.sc.fuel_mass_kg, 50.0);

    // Every accepted step records the state before it, and the final state is recorded once done
    let states = sink.states();
    assert_eq!(states.len() as u64, details.steps + 1);
    assert_eq!(states[0].epoch, start);
    assert_eq!(states.last().unwrap().epoch, end);
    for pair in states.windows(2) {
        assert!(pair[1].epoch > pair[0].epoch);
    }
    assert!(states.iter().all(|s| s.sc.fuel_mass_kg == 50.0));
}

#[test]
fn fuel_constant_when_loitering() {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let orbit =
        Orbit::keplerian(8_000.0, 0.05, 30.0, 0.0, 10.0, 45.0, start, Bodies::Earth).unwrap();
    let mut sc = idle_sc();
    sc.waypoints.push_back(smd::dynamics::guidance::Waypoint::loiter(Unit::Hour * 2, None));
    let mut mission =
        Mission::new(sc, orbit, start, start + Unit::Hour * 1, opts(PropagatorKind::GaussianVOP));
    mission.propagate().unwrap();
    assert_eq!(mission.sc.fuel_mass_kg, 50.0);
    assert_eq!(mission.thrust_direction().norm(), 0.0);
    // The loiter lasts longer than the mission
    assert!(!mission.sc.waypoints_cleared());
}

#[test]
fn angles_wrapped_after_step() {
    let start = j2020();
    let orbit =
        Orbit::keplerian(8_000.0, 0.05, 30.0, 0.0, 10.0, 45.0, start, Bodies::Earth).unwrap();
    let mut mission = Mission::new(
        idle_sc(),
        orbit,
        start,
        start + Unit::Day * 1,
        opts(PropagatorKind::GaussianVOP),
    );

    let state =
        Vector7::from_column_slice(&[8_000.0, -0.05, 0.5, -0.25, TAU + 0.5, 3.0 * TAU + 1.0, 50.0]);
    mission.set_state(10.0, &state).unwrap();

    let oe: KeplerianElements = mission.elements();
    assert_abs_diff_eq!(oe.ecc, 0.05);
    assert_abs_diff_eq!(oe.inc, 0.5);
    assert_abs_diff_eq!(oe.raan, TAU - 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(oe.aop, 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(oe.ta, 1.0, epsilon = 1e-12);
    for angle in [oe.inc, oe.raan, oe.aop, oe.ta] {
        assert!((0.0..TAU).contains(&angle));
    }
    // The integrated state is exactly what was committed
    let back = mission.get_state();
    assert_abs_diff_eq!(back[3], TAU - 0.25, epsilon = 1e-12);
    assert_eq!(mission.current(), start + 10.0 * Unit::Second);
}

#[test]
fn cartesian_and_gauss_agree() {
    let start = j2020();
    let orbit =
        Orbit::keplerian(12_000.0, 0.2, 40.0, 30.0, 60.0, 90.0, start, Bodies::Earth).unwrap();
    let end = start + Unit::Hour * 3;
    let mut cart = Mission::new(idle_sc(), orbit, start, end, opts(PropagatorKind::Cartesian));
    let mut gauss = Mission::new(idle_sc(), orbit, start, end, opts(PropagatorKind::GaussianVOP));
    cart.propagate().unwrap();
    gauss.propagate().unwrap();
    assert!(
        cart.orbit().eq_within(gauss.orbit(), 1e-2, 1e-5),
        "{:e}\n{:e}",
        cart.orbit(),
        gauss.orbit()
    );
}

use crate::j2020;
use approx::assert_abs_diff_eq;
use rstest::*;
use smd::cosmic::{AstroError, Spacecraft};
use smd::dynamics::guidance::{Objective, OrbitalElement, Ruggiero, Waypoint, WaypointAction};
use smd::dynamics::propulsion::{Eps, Thruster};
use smd::dynamics::PropagatorKind;
use smd::md::{MemorySink, Mission, MissionOpts, MissionPhase};
use smd::propagators::{Integrable, PropagationError};
use smd::time::Unit;
use smd::{Bodies, Orbit, SmdError};

fn sc(waypoints: Vec<Waypoint>) -> Spacecraft {
    Spacecraft::new(
        "lowthrust",
        400.0,
        100.0,
        Eps::Unlimited,
        vec![Thruster::generic("hall", 1.0, 3000.0)],
        vec![],
        waypoints,
    )
}

#[fixture]
fn leo() -> Orbit {
    Orbit::keplerian(7_000.0, 0.01, 28.5, 10.0, 20.0, 30.0, j2020(), Bodies::Earth).unwrap()
}

#[rstest]
#[case(PropagatorKind::Cartesian)]
#[case(PropagatorKind::GaussianVOP)]
fn reach_distance(leo: Orbit, #[case] propagator: PropagatorKind) {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let opts = MissionOpts::builder().propagator(propagator).status_period(None).build();
    let sink = MemorySink::default();
    // No end date: the mission ends once the waypoint is cleared
    let mut mission = Mission::new(
        sc(vec![Waypoint::reach_distance(7_100.0, None)]),
        leo,
        start,
        start - Unit::Second * 1,
        opts,
    )
    .with_history(Box::new(sink.clone()));
    mission.propagate().unwrap();

    assert!(mission.sc.waypoints_cleared());
    assert_eq!(mission.phase(), MissionPhase::Done);
    assert!(mission.orbit().rmag() >= 7_100.0);
    assert!(mission.sc.fuel_mass_kg < 100.0);
    let states = sink.states();
    // Cleared on the very last step
    assert!(states[states.len() - 2].orbit.rmag() < 7_100.0);
    assert!(states.last().unwrap().orbit.rmag() >= 7_100.0);
    // Thrusting all along, so the fuel decreases at every step
    for pair in states.windows(2) {
        assert!(pair[1].sc.fuel_mass_kg < pair[0].sc.fuel_mass_kg);
    }
    // Continuous prograde thrust at constant flow rate
    let flow = Thruster::generic("hall", 1.0, 3000.0).mass_flow_kg_s();
    let elapsed = (mission.current() - start).to_seconds();
    assert_abs_diff_eq!(100.0 - mission.sc.fuel_mass_kg, flow * elapsed, epsilon = 1e-9);
}

#[test]
fn raise_sma_with_ruggiero() {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let orbit =
        Orbit::keplerian(7_000.0, 0.01, 30.0, 10.0, 20.0, 30.0, start, Bodies::Earth).unwrap();
    let law =
        Ruggiero::new(&[Objective::within_tolerance(OrbitalElement::Sma, 7_050.0, 5.0)]).unwrap();
    let opts = MissionOpts::builder()
        .propagator(PropagatorKind::Cartesian)
        .status_period(None)
        .build();
    let mut mission = Mission::new(
        sc(vec![Waypoint::target_orbit(law, None)]),
        orbit,
        start,
        start + Unit::Day * 1,
        opts,
    );
    mission.propagate().unwrap();
    assert!(mission.sc.waypoints_cleared(), "{}", mission.orbit());
    assert!((mission.orbit().sma() - 7_050.0).abs() < 10.0, "{}", mission.orbit());
    // The waypoint was cleared before the end date and the thrusters were off since then
    let fuel = mission.sc.fuel_mass_kg;
    assert!(fuel < 100.0 && fuel > 90.0);
    assert_eq!(mission.thrust_direction().norm(), 0.0);
}

#[test]
fn escape_then_capture() {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let orbit = Orbit::cartesian(50_000.0, 0.0, 0.0, 0.0, 3.9, 0.2, start, Bodies::Earth);
    assert!(orbit.energy() < 0.0);
    let sc = Spacecraft::new(
        "escape and capture",
        100.0,
        100.0,
        Eps::Unlimited,
        vec![Thruster::generic("big", 10.0, 3000.0)],
        vec![],
        vec![Waypoint::to_hyperbolic(None), Waypoint::to_elliptical(None)],
    );
    let opts = MissionOpts::builder()
        .propagator(PropagatorKind::Cartesian)
        .status_period(None)
        .build();
    let mut mission = Mission::new(sc, orbit, start, start - Unit::Second * 1, opts);
    mission.propagate().unwrap();
    assert!(mission.sc.waypoints_cleared());
    assert!(mission.orbit().energy() < 0.0);
}

#[rstest]
fn switch_to_current_frame_is_fatal(leo: Orbit) {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let opts = MissionOpts::builder()
        .propagator(PropagatorKind::Cartesian)
        .status_period(None)
        .build();
    let waypoints = vec![Waypoint::reach_distance(
        7_100.0,
        Some(WaypointAction::FrameSwitch(Bodies::Earth)),
    )];
    let mut mission = Mission::new(sc(waypoints), leo, start, start - Unit::Second * 1, opts);
    assert!(matches!(
        mission.propagate(),
        Err(SmdError::Propagation {
            source: PropagationError::PropAstro {
                source: AstroError::InvalidFrameTransition { body: Bodies::Earth, .. }
            }
        })
    ));
}

#[test]
fn waypoint_switch_after_leaving_soi() {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let soi = Bodies::Earth.body().soi.unwrap();
    let orbit = Orbit::cartesian(soi - 1_000.0, 0.0, 0.0, 0.5, 1.0, 0.0, start, Bodies::Earth);
    let waypoints = vec![Waypoint::reach_distance(
        2.0 * soi,
        Some(WaypointAction::FrameSwitch(Bodies::Sun)),
    )];
    let opts = MissionOpts::builder()
        .propagator(PropagatorKind::Cartesian)
        .status_period(None)
        .build();
    let mut mission = Mission::new(sc(waypoints), orbit, start, start + Unit::Day * 1, opts);

    let mut state = mission.get_state();
    state[0] = soi + 1_000.0;
    mission.set_state(30.0, &state).unwrap();
    assert_eq!(mission.orbit().origin, Bodies::Sun);
    assert!(!mission.sc.waypoints_cleared());
    // Already about 1 AU away, the waypoint cannot steer any further
    assert_eq!(mission.thrust_direction().norm(), 0.0);

    // The waypoint clears in the frame it was switched to, its own switch is dropped
    let state = mission.get_state();
    mission.set_state(60.0, &state).unwrap();
    assert!(mission.sc.waypoints_cleared());
    assert_eq!(mission.orbit().origin, Bodies::Sun);
    assert!(mission.sc.func_q.is_empty());
}

#[test]
fn steering_follows_frame_switch() {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let soi = Bodies::Earth.body().soi.unwrap();
    let orbit = Orbit::cartesian(soi - 1_000.0, 0.0, 0.0, 0.5, 1.0, 0.0, start, Bodies::Earth);
    let opts = MissionOpts::builder()
        .propagator(PropagatorKind::Cartesian)
        .status_period(None)
        .build();
    let mut mission = Mission::new(
        sc(vec![Waypoint::reach_velocity(100.0, None)]),
        orbit,
        start,
        start + Unit::Day * 1,
        opts,
    );
    // Prograde in the geocentric frame
    let geo_expected = orbit.dcm_from_rcn_to_inertial().transpose() * orbit.velocity().normalize();
    assert!((mission.thrust_direction() - geo_expected).norm() < 1e-12);

    // Leaving the sphere of influence switches to the Sun
    let mut state = mission.get_state();
    state[0] = soi + 1_000.0;
    mission.set_state(30.0, &state).unwrap();
    let helio = *mission.orbit();
    assert_eq!(helio.origin, Bodies::Sun);

    // The waypoint is still active and steers prograde in the heliocentric frame
    assert!(!mission.sc.waypoints_cleared());
    let expected = helio.dcm_from_rcn_to_inertial().transpose() * helio.velocity().normalize();
    assert!((mission.thrust_direction() - expected).norm() < 1e-12);
    assert!((mission.thrust_direction() - geo_expected).norm() > 1e-3);
}

use crate::j2020;
use approx::assert_abs_diff_eq;
use smd::cosmic::{Cargo, Spacecraft};
use smd::dynamics::guidance::{Waypoint, WaypointAction};
use smd::dynamics::propulsion::Eps;
use smd::dynamics::PropagatorKind;
use smd::md::{MemorySink, Mission, MissionOpts};
use smd::time::Unit;
use smd::{Bodies, Orbit};

#[test]
fn load_and_drop_cargo() {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let orbit =
        Orbit::keplerian(7_500.0, 0.02, 51.6, 100.0, 30.0, 10.0, start, Bodies::Earth).unwrap();
    let sc = Spacecraft::new(
        "tug",
        1_000.0,
        0.0,
        Eps::Unlimited,
        vec![],
        vec![Cargo::new("ballast", 25.0)],
        vec![
            Waypoint::loiter(
                Unit::Hour * 1,
                Some(WaypointAction::AddCargo(Cargo::new("rover", 150.0))),
            ),
            Waypoint::loiter(
                Unit::Hour * 1,
                Some(WaypointAction::DropCargo("ballast".to_string())),
            ),
        ],
    );
    let opts = MissionOpts::builder()
        .propagator(PropagatorKind::GaussianVOP)
        .status_period(None)
        .build();
    let sink = MemorySink::default();
    let mut mission = Mission::new(sc, orbit, start, start + Unit::Hour * 3, opts)
        .with_history(Box::new(sink.clone()));
    mission.propagate().unwrap();

    assert!(mission.sc.waypoints.is_empty());
    assert_eq!(mission.sc.cargo, vec![Cargo::new("rover", 150.0)]);
    assert_abs_diff_eq!(mission.sc.mass_kg(), 1_150.0);

    // The history shows the three successive masses, in that order
    let mut masses: Vec<f64> = sink.states().iter().map(|s| s.sc.mass_kg()).collect();
    masses.dedup();
    assert_eq!(masses, vec![1_025.0, 1_175.0, 1_150.0]);

    // The rover was loaded right after the first hour
    let loaded = sink
        .states()
        .into_iter()
        .find(|s| s.sc.cargo.len() == 2)
        .unwrap();
    let after = loaded.epoch - start;
    assert!(after >= Unit::Hour * 1 && after <= Unit::Hour * 1 + Unit::Second * 20, "{after}");
}

#[test]
fn dropping_unknown_cargo_is_harmless() {
    let start = j2020();
    let orbit =
        Orbit::keplerian(7_500.0, 0.02, 51.6, 100.0, 30.0, 10.0, start, Bodies::Earth).unwrap();
    let sc = Spacecraft::new(
        "tug",
        1_000.0,
        0.0,
        Eps::Unlimited,
        vec![],
        vec![],
        vec![Waypoint::loiter(
            Unit::Minute * 10,
            Some(WaypointAction::DropCargo("nothing".to_string())),
        )],
    );
    let opts = MissionOpts::builder().status_period(None).build();
    let mut mission = Mission::new(sc, orbit, start, start - Unit::Second * 1, opts);
    mission.propagate().unwrap();
    assert!(mission.sc.waypoints_cleared());
    assert_abs_diff_eq!(mission.sc.mass_kg(), 1_000.0);
}

use crate::j2020;
use smd::cosmic::{frames, radii_to_sma_ecc, Spacecraft, AU};
use smd::dynamics::guidance::{Waypoint, WaypointAction};
use smd::dynamics::propulsion::{Eps, Thruster};
use smd::dynamics::PropagatorKind;
use smd::md::{MemorySink, Mission, MissionOpts};
use smd::propagators::PropOpts;
use smd::time::Unit;
use smd::{Bodies, Orbit};

#[test]
fn spiral_out_of_earth() {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let earth = Bodies::Earth.body();
    let soi = earth.soi.unwrap();
    // 300 x 390 km altitude
    let (sma, ecc) = radii_to_sma_ecc(earth.radius + 390.0, earth.radius + 300.0).unwrap();
    let orbit = Orbit::keplerian(sma, ecc, 28.5, 45.0, 30.0, 10.0, start, Bodies::Earth).unwrap();

    let sc = Spacecraft::new(
        "escapee",
        1_000.0,
        300.0,
        Eps::Capped { power_w: 5_000.0 },
        vec![Thruster::generic("hall", 50.0, 20_000.0)],
        vec![],
        vec![
            Waypoint::outward_spiral(Bodies::Earth, Some(WaypointAction::FrameSwitch(Bodies::Sun))),
            Waypoint::loiter(Unit::Day * 1, None),
        ],
    );
    let opts = MissionOpts::builder()
        .propagator(PropagatorKind::Cartesian)
        .prop_opts(PropOpts::with_fixed_step_s(30.0))
        .status_period(None)
        .build();
    let sink = MemorySink::default();
    let mut mission = Mission::new(sc, orbit, start, start - Unit::Second * 1, opts)
        .with_history(Box::new(sink.clone()));
    mission.propagate().unwrap();

    assert!(mission.sc.waypoints_cleared());
    assert_eq!(mission.orbit().origin, Bodies::Sun);

    let states = sink.states();
    // Exactly one switch, from the Earth to the Sun
    let switches: Vec<_> = states
        .windows(2)
        .filter(|pair| pair[0].orbit.origin != pair[1].orbit.origin)
        .collect();
    assert_eq!(switches.len(), 1);
    assert_eq!(switches[0][0].orbit.origin, Bodies::Earth);
    assert_eq!(switches[0][1].orbit.origin, Bodies::Sun);

    // The geocentric leg went through a parabolic orbit well within the sphere of influence
    let geocentric: Vec<_> = states.iter().filter(|s| s.orbit.origin == Bodies::Earth).collect();
    assert!(geocentric[0].orbit.ecc() < 0.01);
    let escape = geocentric
        .iter()
        .find(|s| s.orbit.ecc() > 1.0)
        .expect("never escaped");
    assert!(escape.orbit.rmag() < soi);
    for state in &geocentric {
        assert!(state.orbit.rmag() <= soi);
    }

    // The switch happened once the sphere of influence was left, about 1 AU from the Sun
    let first_helio = &switches[0][1].orbit;
    assert!((first_helio.rmag() / AU - 0.985).abs() < 0.01, "{}", first_helio.rmag() / AU);
    let back_to_earth = frames::switch(first_helio, Bodies::Earth).unwrap();
    assert!(back_to_earth.rmag() > soi && back_to_earth.rmag() < 1.01 * soi, "{back_to_earth}");

    // Fuel is only ever consumed, and only until the sphere of influence was left
    for pair in states.windows(2) {
        assert!(pair[1].sc.fuel_mass_kg <= pair[0].sc.fuel_mass_kg);
    }
    assert!(mission.sc.fuel_mass_kg < 300.0 && mission.sc.fuel_mass_kg > 0.0);
    let fuel_at_switch = switches[0][1].sc.fuel_mass_kg;
    assert_eq!(mission.sc.fuel_mass_kg, fuel_at_switch);

    // Then coasted for a day around the Sun
    let helio_time = mission.current() - switches[0][1].epoch;
    assert!(
        helio_time >= Unit::Day * 1 && helio_time <= Unit::Day * 1 + Unit::Second * 90,
        "{helio_time}"
    );
}

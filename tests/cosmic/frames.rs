use crate::j2020;
use rstest::*;
use smd::cosmic::{frames, AstroError, AU};
use smd::time::Unit;
use smd::{Bodies, Orbit};

#[rstest]
#[case(Bodies::Earth, Bodies::Sun)]
#[case(Bodies::Earth, Bodies::Mars)]
#[case(Bodies::Mars, Bodies::Jupiter)]
#[case(Bodies::Venus, Bodies::Earth)]
fn switch_there_and_back(#[case] from: Bodies, #[case] to: Bodies) {
    let _ = pretty_env_logger::try_init();
    let epoch = j2020() + 123.0 * Unit::Day;
    let orbit = Orbit::keplerian(9_000.0, 0.1, 35.0, 40.0, 50.0, 60.0, epoch, from).unwrap();
    let there = frames::switch(&orbit, to).unwrap();
    assert_eq!(there.origin, to);
    assert_eq!(there.epoch, epoch);
    let back = frames::switch(&there, from).unwrap();
    assert_eq!(back.origin, from);
    // Heliocentric positions are of the order of 1e8 km, so the round trip loses a few digits
    assert!(back.eq_within(&orbit, 1e-4, 1e-9), "{back:e}\n{orbit:e}");
}

#[test]
fn heliocentric_distance_of_earth_orbit() {
    let orbit = Orbit::cartesian(7_000.0, 0.0, 0.0, 0.0, 7.5, 0.0, j2020(), Bodies::Earth);
    let helio = frames::switch(&orbit, Bodies::Sun).unwrap();
    // Early January is about the perihelion of the Earth
    assert!((helio.rmag() / AU - 0.983).abs() < 5e-3, "{}", helio.rmag() / AU);
    // The spacecraft moves with the Earth, around 30 km/s
    assert!((helio.vmag() - 30.0).abs() < 8.0, "{}", helio.vmag());
}

#[test]
fn no_switch_to_current_frame() {
    let orbit = Orbit::cartesian(1.0e8, 0.0, 0.0, 0.0, 30.0, 0.0, j2020(), Bodies::Sun);
    assert!(matches!(
        frames::switch(&orbit, Bodies::Sun),
        Err(AstroError::InvalidFrameTransition { body: Bodies::Sun, .. })
    ));
}

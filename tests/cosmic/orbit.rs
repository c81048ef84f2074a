use crate::j2020;
use approx::assert_abs_diff_eq;
use rstest::*;
use smd::cosmic::{radii_to_sma_ecc, AstroError};
use smd::{Bodies, Orbit};

#[rstest]
#[case(Bodies::Earth, 7_000.0, 0.001, 28.5, 10.0, 20.0, 30.0)]
#[case(Bodies::Earth, 24_396.0, 0.7283, 7.0, 350.0, 178.0, 359.0)]
#[case(Bodies::Earth, 42_164.0, 0.05, 0.5, 45.0, 90.0, 170.0)]
#[case(Bodies::Mars, 10_000.0, 0.2, 60.0, 120.0, 280.0, 15.0)]
#[case(Bodies::Sun, 1.5e8, 0.0167, 23.4, 0.01, 102.9, 100.0)]
fn keplerian_round_trip(
    #[case] origin: Bodies,
    #[case] sma: f64,
    #[case] ecc: f64,
    #[case] inc: f64,
    #[case] raan: f64,
    #[case] aop: f64,
    #[case] ta: f64,
) {
    let orbit = Orbit::keplerian(sma, ecc, inc, raan, aop, ta, j2020(), origin).unwrap();
    let oe = orbit.elements();
    assert_abs_diff_eq!(oe.sma, sma, epsilon = sma * 1e-10);
    assert_abs_diff_eq!(oe.ecc, ecc, epsilon = 1e-10);
    assert_abs_diff_eq!(orbit.inc_deg(), inc, epsilon = 1e-7);
    assert_abs_diff_eq!(orbit.raan_deg(), raan, epsilon = 1e-7);
    assert_abs_diff_eq!(orbit.aop_deg(), aop, epsilon = 1e-6);
    assert_abs_diff_eq!(orbit.ta_deg(), ta, epsilon = 1e-6);

    // And back to a state vector
    let back = Orbit::from_elements(&oe, j2020(), origin).unwrap();
    assert!(
        back.eq_within(&orbit, 1e-6 * sma.max(1.0), 1e-9 * orbit.vmag().max(1.0)),
        "{back} != {orbit}"
    );
}

#[test]
fn singular_elements() {
    assert!(matches!(
        Orbit::keplerian(7_000.0, 0.1, 10.0, 0.0, 0.0, 0.0, j2020(), Bodies::Earth),
        Err(AstroError::TrueAnomalySingular { .. })
    ));
    assert!(matches!(
        Orbit::keplerian(7_000.0, 0.1, 10.0, 0.0, 0.0, 360.0, j2020(), Bodies::Earth),
        Err(AstroError::TrueAnomalySingular { .. })
    ));
    assert!(matches!(
        Orbit::keplerian(7_000.0, 1.0, 10.0, 0.0, 0.0, 10.0, j2020(), Bodies::Earth),
        Err(AstroError::UnsupportedEccentricity { .. })
    ));
    assert!(matches!(
        Orbit::keplerian(7_000.0, -0.1, 10.0, 0.0, 0.0, 10.0, j2020(), Bodies::Earth),
        Err(AstroError::UnsupportedEccentricity { .. })
    ));
}

#[test]
fn energy_and_period() {
    let orbit =
        Orbit::keplerian(7_000.0, 0.01, 45.0, 0.0, 0.0, 90.0, j2020(), Bodies::Earth).unwrap();
    let gm = Bodies::Earth.body().gm;
    assert_abs_diff_eq!(orbit.energy(), -gm / (2.0 * 7_000.0), epsilon = 1e-9);
    let period_s = 2.0 * std::f64::consts::PI * (7_000.0_f64.powi(3) / gm).sqrt();
    assert_abs_diff_eq!(orbit.period().to_seconds(), period_s, epsilon = 1e-6);
    assert_abs_diff_eq!(orbit.periapsis(), 6_930.0, epsilon = 1e-6);
    assert_abs_diff_eq!(orbit.apoapsis(), 7_070.0, epsilon = 1e-6);
}

#[test]
fn gto_from_radii() {
    let (sma, ecc) = radii_to_sma_ecc(42_164.0, 6_678.0).unwrap();
    assert_abs_diff_eq!(sma, 24_421.0, epsilon = 1e-9);
    assert_abs_diff_eq!(ecc, 0.726_546_8, epsilon = 1e-6);
    assert!(radii_to_sma_ecc(6_678.0, 42_164.0).is_err());
}

use crate::j2020;
use rstest::*;
use smd::dynamics::{third_body, Perturbations, PropagatorKind};
use smd::time::Unit;
use smd::{Bodies, Orbit};

#[rstest]
#[case(Bodies::Earth)]
#[case(Bodies::Mars)]
#[case(Bodies::Sun)]
fn no_self_perturbation(#[case] origin: Bodies) {
    let epoch = j2020() + 42.0 * Unit::Day;
    let orbit =
        Orbit::cartesian(origin.body().radius * 2.0, 0.0, 0.0, 0.0, 1.0, 1.0, epoch, origin);
    assert_eq!(third_body(&orbit, origin, epoch).norm(), 0.0);
    for mode in [PropagatorKind::Cartesian, PropagatorKind::GaussianVOP] {
        let pert = Perturbations::with_bodies(&[origin]).perturb(&orbit, epoch, mode);
        assert_eq!(pert.norm(), 0.0);
    }
}

#[test]
fn solar_tide_in_leo() {
    let epoch = j2020();
    let orbit = Orbit::cartesian(7_000.0, 0.0, 0.0, 0.0, 7.5, 0.0, epoch, Bodies::Earth);
    let tide = third_body(&orbit, Bodies::Sun, epoch).norm();
    // Order of magnitude of the solar tidal acceleration in LEO: 2 GM r / d^3
    assert!(tide > 1e-11 && tide < 1e-9, "{tide}");
    let pert = Perturbations::with_bodies(&[Bodies::Sun]).perturb(
        &orbit,
        epoch,
        PropagatorKind::GaussianVOP,
    );
    assert!((pert.fixed_rows::<3>(0).norm() - tide).abs() < 1e-18);
    assert_eq!(pert[6], 0.0);
}

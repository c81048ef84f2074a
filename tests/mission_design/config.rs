use smd::dynamics::PropagatorKind;
use smd::io::{ConfigRepr, MissionConfig, WaypointConfig};
use smd::md::MissionPhase;
use smd::time::Unit;
use smd::Bodies;
use std::path::PathBuf;

const GEO_TRANSFER: &str = r#"
spacecraft:
  name: gto
  dry_mass_kg: 300
  fuel_mass_kg: 20
  eps: !Capped
    power_w: 3000
  thrusters:
    - name: BHT-1500
      voltage_v: 300
      power_w: 1500
      model:
        kind: Efficiency
        isp_s: 1600
        curve: [[0.0, 0.4], [2000.0, 0.55]]
  cargo:
    - name: cubesat
      mass_kg: 4
  waypoints:
    - !Loiter
      duration: 30 min
      action: !DropCargo cubesat
    - !ReachVelocity
      velocity_km_s: 12.0
      tolerance_km_s: 0.5
origin: Earth
orbit: !Keplerian
  sma_km: 24396
  ecc: 0.7283
  inc_deg: 7
  raan_deg: 1
  aop_deg: 178
  ta_deg: 10
start: 2021-03-20T12:00:00 UTC
end: 2021-03-20T14:00:00 UTC
propagator: GaussianVOP
perturbations:
  j2: true
  bodies: [Sun]
step_s: 20
"#;

#[test]
fn geo_transfer_from_yaml() {
    let _ = pretty_env_logger::try_init();
    let mut cfg = MissionConfig::loads(GEO_TRANSFER).unwrap();
    assert_eq!(cfg.origin, Bodies::Earth);
    assert_eq!(cfg.propagator, PropagatorKind::GaussianVOP);
    assert!(cfg.perturbations.j2);
    assert!(matches!(
        cfg.spacecraft.waypoints[1],
        WaypointConfig::ReachVelocity { tolerance_km_s: Some(_), .. }
    ));

    let path: PathBuf = std::env::temp_dir().join("smd_geo_transfer.csv");
    cfg.history = Some(path.to_string_lossy().to_string());

    let mut mission = cfg.build().unwrap();
    assert_eq!(mission.end - mission.start, Unit::Hour * 2);
    let details = mission.propagate().unwrap();
    assert_eq!(mission.phase(), MissionPhase::Done);
    // 2 hours with 20 second steps
    assert_eq!(details.steps, 360);
    assert!(mission.sc.cargo.is_empty());
    // Thrusting to reach the velocity after the loiter
    assert!(mission.sc.fuel_mass_kg < 20.0);

    // One row per step, plus the final state, plus the header
    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert!(headers.iter().any(|h| h == "fuel_mass_kg"));
    assert_eq!(rdr.records().count() as u64, details.steps + 1);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn rejects_bad_files() {
    assert!(MissionConfig::load("data/does_not_exist.yaml").is_err());
    let mut cfg = MissionConfig::loads(GEO_TRANSFER).unwrap();
    cfg.spacecraft.dry_mass_kg = 0.0;
    assert!(cfg.build().is_err());
}

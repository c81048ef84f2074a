use crate::j2020;
use smd::cosmic::Spacecraft;
use smd::dynamics::propulsion::Eps;
use smd::dynamics::{Perturbations, PropagatorKind};
use smd::linalg::Vector7;
use smd::md::{MemorySink, Mission, MissionOpts, MissionPhase, StopHandle};
use smd::time::Unit;
use smd::{Bodies, Orbit};
use std::sync::{Arc, Mutex};

fn idle() -> Spacecraft {
    Spacecraft::new("idle", 100.0, 10.0, Eps::Unlimited, vec![], vec![], vec![])
}

#[test]
fn stop_before_start() {
    let start = j2020();
    let orbit = Orbit::cartesian(7_000.0, 0.0, 0.0, 0.0, 7.5, 0.5, start, Bodies::Earth);
    let sink = MemorySink::default();
    let opts = MissionOpts::builder().status_period(None).build();
    let mut mission = Mission::new(idle(), orbit, start, start + Unit::Day * 10, opts)
        .with_history(Box::new(sink.clone()));
    mission.stop_handle().stop();
    let details = mission.propagate().unwrap();
    assert_eq!(details.steps, 0);
    assert_eq!(mission.current(), start);
    assert_eq!(mission.phase(), MissionPhase::Done);
    // Only the final state
    assert_eq!(sink.len(), 1);
}

#[test]
fn stop_mid_flight() {
    let _ = pretty_env_logger::try_init();
    let start = j2020();
    let orbit = Orbit::cartesian(7_000.0, 0.0, 0.0, 0.0, 7.5, 0.5, start, Bodies::Earth);
    // The handle only exists once the mission is built, the perturbation picks it up from there
    let slot: Arc<Mutex<Option<StopHandle>>> = Arc::new(Mutex::new(None));
    let trigger = Arc::clone(&slot);
    let perturbations = Perturbations {
        arbitrary: Some(Arc::new(move |orbit: &Orbit, _: PropagatorKind| {
            if orbit.epoch >= j2020() + Unit::Hour * 1 {
                if let Some(handle) = trigger.lock().unwrap().as_ref() {
                    handle.stop();
                }
            }
            Vector7::zeros()
        })),
        ..Default::default()
    };
    let opts = MissionOpts::builder()
        .propagator(PropagatorKind::Cartesian)
        .perturbations(perturbations)
        .status_period(Some(Unit::Millisecond * 5))
        .build();
    let mut mission = Mission::new(idle(), orbit, start, start + Unit::Day * 10, opts);
    *slot.lock().unwrap() = Some(mission.stop_handle());
    mission.propagate().unwrap();

    let elapsed = mission.current() - start;
    assert!(
        elapsed >= Unit::Hour * 1 && elapsed <= Unit::Hour * 1 + Unit::Second * 20,
        "{elapsed}"
    );
    assert_eq!(mission.phase(), MissionPhase::Done);
}

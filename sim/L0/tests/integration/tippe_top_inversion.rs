//! Tippe-top hand-off from the body sphere to the stem sphere.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use spintoy_core::{ContactModel, Simulation, Toy, Warning};
use spintoy_types::{ContactState, SimulationConfig, Transform};

/// Tilt (angle between symmetry axis and up) where both spheres touch.
fn crossing_tilt() -> f64 {
    (-13.0_f64 / 21.0).acos()
}

/// A tippe-top resting on its body sphere at `tilt`, rolling further over
/// about `-Z` at `rate`.
fn tipping(tilt: f64, rate: f64) -> Simulation {
    let mut sim = Simulation::new(Toy::tippe_top().expect("preset"), SimulationConfig::default())
        .expect("tippe-top should build");

    let orientation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -tilt);
    let omega = Vector3::new(0.0, 0.0, -rate);
    let probe = Transform::at_rest(Point3::origin(), orientation).with_angular_velocity(omega);
    let r = sim
        .toy()
        .shape()
        .contact(ContactState::LargeSphere, &probe, &Vector3::y())
        .expect("regular pose")
        .r;

    let state = Transform::new(
        Point3::new(0.0, -r.y, 0.0),
        orientation,
        -omega.cross(&r),
        omega,
    );
    sim.set_transform(state).expect("finite state");
    sim
}

#[test]
fn test_crossing_angle() {
    let before = tipping(crossing_tilt() - 0.01, 0.0);
    assert_eq!(before.contact_state(), ContactState::LargeSphere);
    let after = tipping(crossing_tilt() + 0.01, 0.0);
    assert_eq!(after.contact_state(), ContactState::SmallSphere);
}

#[test]
fn test_switch_cancels_normal_velocity() {
    let mut sim = tipping(127.5 * PI / 180.0, 1.0);
    assert_eq!(sim.contact_state(), ContactState::LargeSphere);
    sim.set_simulating(true);

    for _ in 0..6 {
        sim.update(1.0 / 60.0);
        if sim.topology_switches() > 0 {
            break;
        }
    }

    assert_eq!(sim.topology_switches(), 1, "stem should touch down once");
    assert_eq!(sim.contact_state(), ContactState::SmallSphere);
    let event = sim.last_switch().expect("a switch was recorded");
    assert_eq!(event.from, ContactState::LargeSphere);
    assert_eq!(event.to, ContactState::SmallSphere);
    assert!(event.normal_velocity_before < 0.0, "stem was not falling");
    assert!(event.normal_velocity_after.abs() < 1e-9);
    assert!(event.time > 0.0 && event.time < 0.1);
    assert_eq!(sim.warning_count(Warning::BadState), 0);

    // The hand-off is caught at a sub-step boundary, so the stem may sink
    // by up to one sub-step of tilt.
    for p in sim.contact_points().expect("regular pose") {
        assert_relative_eq!(p.y, 0.0, epsilon = 5e-2);
    }
}

/// The preset, spun upright on its body sphere, rises onto its stem once
/// and stays there.
#[test]
fn test_preset_inverts_onto_stem() {
    let mut sim = Simulation::new(Toy::tippe_top().expect("preset"), SimulationConfig::default())
        .expect("tippe-top should build");
    assert_eq!(sim.contact_state(), ContactState::LargeSphere);
    sim.set_simulating(true);

    let mut landed = None;
    for _ in 0..2400 {
        sim.update(1.0 / 60.0);
        if landed.is_none() && sim.contact_state() == ContactState::SmallSphere {
            landed = Some(sim.time());
        }
        if landed.is_some() {
            let t = sim.time();
            assert_eq!(sim.contact_state(), ContactState::SmallSphere, "fell back at {t}");
        }
    }

    let landed = landed.expect("the top never inverted");
    assert!(landed > 10.0, "inverted too early, at {landed}");
    assert_eq!(sim.topology_switches(), 1);
    let event = sim.last_switch().expect("a switch was recorded");
    assert_eq!(event.from, ContactState::LargeSphere);
    assert_eq!(event.to, ContactState::SmallSphere);
    assert!(event.normal_velocity_after <= 1e-9);
    assert!(event.normal_velocity_after.abs() < 1e-9);
    assert_eq!(sim.warning_count(Warning::BadState), 0);
    assert!(sim.transform().body_axis().y < crossing_tilt().cos());
}

#[test]
fn test_reset_forgets_switches() {
    let mut sim = tipping(127.5 * PI / 180.0, 1.0);
    sim.set_simulating(true);
    for _ in 0..6 {
        sim.update(1.0 / 60.0);
    }
    assert!(sim.topology_switches() >= 1);

    sim.reset();
    assert_eq!(sim.topology_switches(), 0);
    assert!(sim.last_switch().is_none());
    assert_eq!(sim.contact_state(), ContactState::LargeSphere);
    assert_relative_eq!(sim.transform().body_axis(), Vector3::y(), epsilon = 1e-12);
}

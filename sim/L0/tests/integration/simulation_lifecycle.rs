//! Simulation lifecycle: start, pause, reset, perturb, recover.

use approx::assert_relative_eq;
use nalgebra::Vector3;
use spintoy_core::{Simulation, Toy, ToyKind, Warning};
use spintoy_types::{Gravity, IntegrationMethod, SimulationConfig};

const FRAME: f64 = 1.0 / 60.0;

fn running(kind: ToyKind) -> Simulation {
    let mut sim = Simulation::new(Toy::from_kind(kind).expect("preset"), SimulationConfig::default())
        .expect("preset should build");
    sim.set_simulating(true);
    sim
}

fn bits(sim: &Simulation) -> Vec<u64> {
    sim.transform().components().iter().map(|x| x.to_bits()).collect()
}

// ============================================================================
// Reset and idle frames
// ============================================================================

#[test]
fn test_reset_then_zero_update_is_start_pose() {
    for kind in ToyKind::ALL {
        let mut sim = running(kind);
        let start = *sim.transform();
        for _ in 0..10 {
            sim.update(FRAME);
        }
        sim.reset();
        sim.update(0.0);
        assert_eq!(*sim.transform(), start, "{kind}");
        assert_eq!(sim.time(), 0.0);
        assert!(sim.telemetry().is_empty());
        assert!(sim.is_simulating());
    }
}

#[test]
fn test_pause_freezes_state() {
    let mut sim = running(ToyKind::Rattleback);
    sim.update(FRAME);
    sim.set_simulating(false);
    let frozen = bits(&sim);
    for _ in 0..5 {
        sim.update(FRAME);
    }
    assert_eq!(bits(&sim), frozen);

    sim.toggle_simulating();
    sim.update(FRAME);
    assert_ne!(bits(&sim), frozen);
}

// ============================================================================
// Determinism and invariants
// ============================================================================

#[test]
fn test_runs_are_bitwise_deterministic() {
    for kind in ToyKind::ALL {
        let mut a = running(kind);
        let mut b = running(kind);
        for _ in 0..30 {
            a.update(FRAME);
            b.update(FRAME);
        }
        assert_eq!(bits(&a), bits(&b), "{kind} is not deterministic");
    }
}

#[test]
fn test_orientation_stays_unit_for_every_method() {
    for method in [
        IntegrationMethod::ExplicitEuler,
        IntegrationMethod::Heun,
        IntegrationMethod::RungeKutta4,
    ] {
        for kind in ToyKind::ALL {
            let config = SimulationConfig::default().integration(method);
            let mut sim = Simulation::new(Toy::from_kind(kind).expect("preset"), config)
                .expect("preset should build");
            sim.set_simulating(true);
            for _ in 0..30 {
                sim.update(FRAME);
                assert!(
                    (sim.rotation().quaternion().norm() - 1.0).abs() < 1e-6,
                    "{kind} with {method}"
                );
            }
        }
    }
}

// ============================================================================
// Perturbation and recovery
// ============================================================================

#[test]
fn test_perturbation_accumulates() {
    let mut sim = running(ToyKind::PhiTop);
    let before = sim.angular_velocity();
    let kick = Vector3::new(1.0, 0.0, 0.5);
    sim.apply_angular_acceleration(kick);
    sim.apply_angular_acceleration(kick);
    assert_relative_eq!(sim.angular_velocity(), before + kick * 2.0, epsilon = 1e-12);
}

#[test]
fn test_nan_state_auto_resets() {
    let mut sim = running(ToyKind::PhiTop);
    let start = *sim.transform();
    for _ in 0..5 {
        sim.update(FRAME);
    }

    sim.apply_angular_acceleration(Vector3::new(f64::NAN, 0.0, 0.0));
    sim.update(FRAME);

    assert_eq!(*sim.transform(), start);
    assert_eq!(sim.time(), 0.0);
    assert_eq!(sim.warning_count(Warning::BadState), 1);
    assert!(sim.is_simulating());

    // It carries on from the start pose.
    sim.update(FRAME);
    assert!(sim.time() > 0.0);
}

#[test]
fn test_bad_timestep_warns() {
    let mut sim = running(ToyKind::Oloid);
    sim.update(f64::INFINITY);
    assert_eq!(sim.warning_count(Warning::BadTimestep), 1);
    assert_eq!(sim.time(), 0.0);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_invalid_config_is_rejected() {
    let toy = || Toy::tippe_top().expect("preset");

    let zero_gravity = SimulationConfig::default().gravity(Gravity::custom(Vector3::zeros()));
    assert!(Simulation::new(toy(), zero_gravity).unwrap_err().is_config_error());

    let zero_substeps = SimulationConfig::default().substeps(0);
    assert!(Simulation::new(toy(), zero_substeps).unwrap_err().is_config_error());

    let zero_capacity = SimulationConfig::default().telemetry_capacity(0);
    assert!(Simulation::new(toy(), zero_capacity).unwrap_err().is_config_error());
}

#[test]
fn test_telemetry_keeps_last_hundred_frames() {
    let mut sim = running(ToyKind::TippeTop);
    for _ in 0..150 {
        sim.update(FRAME);
    }
    let trace = sim.telemetry();
    assert_eq!(trace.capacity(), 100);
    assert_eq!(trace.len(), 100);

    let (t_last, w_last) = *trace.latest().expect("samples");
    assert_relative_eq!(t_last, sim.time(), epsilon = 1e-12);
    assert_eq!(w_last, sim.angular_velocity());

    let times: Vec<f64> = trace.iter().map(|s| s.0).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_moon_gravity_is_gentler() {
    let config = SimulationConfig::default().gravity(Gravity::moon());
    let sim = Simulation::new(Toy::phi_top().expect("preset"), config).expect("build");
    assert_relative_eq!(sim.ground().up, Vector3::y(), epsilon = 1e-12);
    assert!(sim.ground().gravity < 2.0);
}

//! Oloid rolling on its two circles.

use approx::assert_relative_eq;
use nalgebra::Vector3;
use spintoy_core::{Simulation, Toy, Warning};
use spintoy_types::{ContactState, Friction, IntegrationMethod, SimulationConfig};

const FRAME: f64 = 1.0 / 60.0;

fn oloid() -> Simulation {
    Simulation::new(Toy::oloid().expect("preset"), SimulationConfig::default())
        .expect("oloid should build")
}

// ============================================================================
// Start pose
// ============================================================================

#[test]
fn test_starts_on_both_circles() {
    let sim = oloid();
    assert_eq!(sim.contact_state(), ContactState::DualCircle);
    assert_relative_eq!(sim.position().y, 0.5_f64.sqrt(), epsilon = 1e-12);

    let points = sim.contact_points().expect("regular pose");
    assert_eq!(points.len(), 2);
    for p in &points {
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
    }

    // It rolls about the contact line, so the whole line is at rest.
    let line = (points[1] - points[0]).normalize();
    let spin = sim.angular_velocity().normalize();
    assert_relative_eq!(line.cross(&spin).norm(), 0.0, epsilon = 1e-9);
    for p in &points {
        let slip = sim.transform().point_velocity(&(p - sim.position()));
        assert_relative_eq!(slip.norm(), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_tilting_breaks_line_contact() {
    let mut sim = oloid();
    let mut tilted = *sim.transform();
    tilted.orientation =
        nalgebra::UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.2) * tilted.orientation;
    sim.set_transform(tilted).expect("finite state");
    assert!(matches!(sim.contact_state(), ContactState::SingleCircle(_)));
    assert_eq!(sim.contact_points().expect("regular pose").len(), 1);
}

// ============================================================================
// Rolling
// ============================================================================

#[test]
fn test_rolls_on_the_ground() {
    let mut sim = oloid();
    sim.set_simulating(true);
    let start = sim.position();
    let e0 = sim.energy().total();

    for _ in 0..120 {
        sim.update(FRAME);
        let lowest = sim
            .contact_points()
            .expect("regular pose")
            .iter()
            .map(|p| p.y)
            .fold(f64::INFINITY, f64::min);
        assert!(lowest.abs() < 0.05, "oloid left the ground: {lowest}");
    }

    assert_eq!(sim.warning_count(Warning::BadState), 0);
    assert!((sim.rotation().norm() - 1.0).abs() < 1e-6);
    assert!(sim.energy().total() < e0 * 1.01, "oloid gained energy");

    let travelled = (sim.position() - start).xz().norm();
    assert!(travelled > 0.01, "oloid did not roll: {travelled}");
}

/// Without friction the line contact carries the oloid for a whole second
/// without hand-offs eating into its energy.
#[test]
fn test_frictionless_rolling_keeps_line_contact() {
    let config = SimulationConfig::reference(IntegrationMethod::RungeKutta4).substeps(1);
    let toy = Toy::oloid().expect("preset").with_friction(Friction::frictionless());
    let mut sim = Simulation::new(toy, config).expect("frictionless oloid should build");
    sim.set_simulating(true);

    let e0 = sim.energy().total();
    let mut worst: f64 = 0.0;
    for _ in 0..1000 {
        sim.update(1e-3);
        worst = worst.max((sim.energy().total() - e0).abs());
    }

    let drift = worst / e0.abs();
    assert!(drift < 1e-3, "oloid energy drift {drift:e}");
    assert!(sim.topology_switches() <= 4, "{} switches", sim.topology_switches());
    assert!(sim.warnings().is_clear(), "warnings: {:?}", sim.warnings());
}

//! Energy conservation with friction switched off.
//!
//! Without slip friction or rolling resistance the only reaction is the
//! normal force, which does no work while the contact stays on the ground.
//! RK4 at 1 ms must then hold the total energy to well under 0.1% over a
//! simulated second.

use spintoy_core::{Simulation, Toy};
use spintoy_types::{Friction, IntegrationMethod, SimulationConfig};

const DT: f64 = 1e-3;
const STEPS: usize = 1000;

fn relative_drift(toy: Toy) -> f64 {
    let config = SimulationConfig::reference(IntegrationMethod::RungeKutta4).substeps(1);
    let mut sim = Simulation::new(toy.with_friction(Friction::frictionless()), config)
        .expect("frictionless toy should build");
    sim.set_simulating(true);

    let e0 = sim.energy().total();
    let mut worst: f64 = 0.0;
    for _ in 0..STEPS {
        sim.update(DT);
        worst = worst.max((sim.energy().total() - e0).abs());
    }
    assert!(sim.warnings().is_clear(), "warnings: {:?}", sim.warnings());
    worst / e0.abs()
}

// ============================================================================
// Sliding regime
// ============================================================================

#[test]
fn test_phi_top_frictionless_energy() {
    let drift = relative_drift(Toy::phi_top().expect("preset"));
    assert!(drift < 1e-3, "phi-top energy drift {drift:e}");
}

#[test]
fn test_tippe_top_frictionless_energy() {
    let drift = relative_drift(Toy::tippe_top().expect("preset"));
    assert!(drift < 1e-3, "tippe-top energy drift {drift:e}");
}

// ============================================================================
// Rolling regime
// ============================================================================

#[test]
fn test_rattleback_frictionless_energy() {
    let drift = relative_drift(Toy::rattleback().expect("preset"));
    assert!(drift < 1e-3, "rattleback energy drift {drift:e}");
}

// ============================================================================
// Dissipation
// ============================================================================

/// With friction on, energy may only go down (up to constraint drift).
#[test]
fn test_friction_dissipates() {
    let config = SimulationConfig::reference(IntegrationMethod::RungeKutta4).substeps(1);
    let mut sim = Simulation::new(Toy::phi_top().expect("preset"), config).expect("build");
    sim.set_simulating(true);

    let e0 = sim.energy().total();
    for _ in 0..STEPS {
        sim.update(DT);
    }
    let e1 = sim.energy().total();
    assert!(e1 < e0, "energy rose from {e0} to {e1}");
}

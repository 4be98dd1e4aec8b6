//! Order of convergence of the integrators on the real toy dynamics.
//!
//! The contact state is held fixed so the vector field is smooth. For a
//! method of order `p`, the differences between solutions at `h`, `h/2` and
//! `h/4` shrink by `2^p`:
//!
//! ```text
//! ratio = |y(h) - y(h/2)| / |y(h/2) - y(h/4)|  →  2^p
//! ```

use spintoy_core::{Simulation, Toy, ToyKind, dynamics, integrate_with_method};
use spintoy_types::{IntegrationMethod, SimulationConfig, Transform};

// ============================================================================
// Helpers
// ============================================================================

/// Integrate `toy` from its start pose over `steps` steps of size `h`.
fn solve(toy: &Toy, method: IntegrationMethod, h: f64, steps: usize) -> [f64; 13] {
    let sim = Simulation::new(toy.clone(), SimulationConfig::default()).expect("preset");
    let ground = *sim.ground();
    let contact = sim.contact_state();

    let mut state = *sim.transform();
    for _ in 0..steps {
        state = integrate_with_method(
            method,
            |s: &Transform| dynamics::derivative(toy.shape(), toy.params(), &ground, contact, s),
            &state,
            h,
        )
        .expect("dynamics should stay regular");
    }
    state.components()
}

fn distance(a: &[f64; 13], b: &[f64; 13]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Step size giving a rotation of a few degrees per step.
fn step_size(kind: ToyKind) -> f64 {
    match kind {
        ToyKind::Oloid | ToyKind::Rattleback => 0.02,
        ToyKind::PhiTop | ToyKind::TippeTop => 1e-3,
    }
}

fn convergence_ratio(kind: ToyKind, method: IntegrationMethod) -> f64 {
    let toy = Toy::from_kind(kind).expect("preset");
    let h = step_size(kind);
    let steps = 10;
    let coarse = solve(&toy, method, h, steps);
    let medium = solve(&toy, method, h / 2.0, steps * 2);
    let fine = solve(&toy, method, h / 4.0, steps * 4);
    distance(&coarse, &medium) / distance(&medium, &fine)
}

// ============================================================================
// Fourth order
// ============================================================================

#[test]
fn test_rk4_fourth_order_on_every_toy() {
    for kind in ToyKind::ALL {
        let ratio = convergence_ratio(kind, IntegrationMethod::RungeKutta4);
        assert!(
            (10.0..28.0).contains(&ratio),
            "{kind}: RK4 ratio {ratio:.2}, expected ~16"
        );
    }
}

// ============================================================================
// Lower orders
// ============================================================================

#[test]
fn test_heun_second_order() {
    let ratio = convergence_ratio(ToyKind::PhiTop, IntegrationMethod::Heun);
    assert!((3.0..5.5).contains(&ratio), "Heun ratio {ratio:.2}, expected ~4");
}

#[test]
fn test_euler_first_order() {
    let ratio = convergence_ratio(ToyKind::PhiTop, IntegrationMethod::ExplicitEuler);
    assert!((1.6..2.6).contains(&ratio), "Euler ratio {ratio:.2}, expected ~2");
}

/// At equal step size a higher-order method lands closer to the reference.
#[test]
fn test_rk4_beats_euler() {
    let toy = Toy::tippe_top().expect("preset");
    let h = step_size(ToyKind::TippeTop);
    let reference = solve(&toy, IntegrationMethod::RungeKutta4, h / 8.0, 80);
    let rk4 = solve(&toy, IntegrationMethod::RungeKutta4, h, 10);
    let euler = solve(&toy, IntegrationMethod::ExplicitEuler, h, 10);
    assert!(distance(&rk4, &reference) < distance(&euler, &reference) * 1e-2);
}

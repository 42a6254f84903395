//! Microphysics law validation
//!
//! Checks the public velocity, efficiency and growth laws against hand
//! computed values for the case-study constants.

use approx::assert_relative_eq;
use droplet_sim_core::physics::{
    ClosingMotion, CoalescenceGrowth, DiffusionalGrowth, LARGE_DROP_LIMIT, LINEAR_LIMIT,
    STOKES_LIMIT,
};
use droplet_sim_core::{
    CollectionEfficiencyTable, LookupRule, Meters, MetersPerSecond, Seconds, SimulationConfig,
    SimulationError, TerminalVelocityModel, VelocityRegime,
};

/// Fall speed rises with radius inside every regime.
#[test]
fn test_fall_speed_monotonic_within_regimes() {
    let model = TerminalVelocityModel::default();
    let radii: Vec<Meters> = (1..=400)
        .map(|i| Meters::from_micrometres(f64::from(i) * 10.0))
        .collect();

    for pair in radii.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if VelocityRegime::for_radius(a) == VelocityRegime::for_radius(b) {
            assert!(model.fall_speed(b) > model.fall_speed(a), "{a} -> {b}");
        }
    }
}

/// Regime boundaries are non-inclusive on the lower side except at 600 µm.
#[test]
fn test_regime_boundaries() {
    assert_eq!(VelocityRegime::for_radius(STOKES_LIMIT), VelocityRegime::Linear);
    assert_eq!(VelocityRegime::for_radius(LINEAR_LIMIT), VelocityRegime::Linear);
    assert_eq!(
        VelocityRegime::for_radius(LARGE_DROP_LIMIT),
        VelocityRegime::LargeDrop
    );

    let model = TerminalVelocityModel::default();
    assert_relative_eq!(*model.fall_speed(STOKES_LIMIT), 0.32, max_relative = 1e-12);
    assert_relative_eq!(*model.fall_speed(LINEAR_LIMIT), 4.8, max_relative = 1e-12);
}

/// The updraft speed of 5 m/s is first matched in the square-root regime.
#[test]
fn test_updraft_crossover_radius() {
    let config = SimulationConfig::default();
    let model = TerminalVelocityModel::new(config.velocity_coefficients);
    let crossover = Meters::new((*config.updraft_speed / config.velocity_coefficients.k3).powi(2));

    assert_eq!(
        VelocityRegime::for_radius(crossover),
        VelocityRegime::Intermediate
    );
    assert_relative_eq!(*model.fall_speed(crossover), 5.0, max_relative = 1e-12);
    assert!(model.fall_speed(LINEAR_LIMIT) < config.updraft_speed);
}

/// Under the threshold rule the cursor walks one row per call while the
/// radius stays above successive thresholds.
#[test]
fn test_threshold_cursor_walks_upward() {
    let config = SimulationConfig::default();
    let mut table = CollectionEfficiencyTable::new(
        config.collection_efficiency,
        config.coalescence_efficiency,
        LookupRule::Threshold,
    )
    .unwrap();

    assert_eq!(table.advance_if_needed(Meters::from_micrometres(15.0)), None);
    assert_eq!(table.cursor(), 0);

    let big = Meters::from_micrometres(45.0);
    let e0 = table.advance_if_needed(big).unwrap();
    assert_relative_eq!(e0, 0.17 * 0.7, max_relative = 1e-12);
    table.advance_if_needed(big);
    table.advance_if_needed(big);
    assert_eq!(table.active_index(), Some(2));

    // 45 µm is below the 50 µm row: the cursor waits there
    let held = table.advance_if_needed(big).unwrap();
    assert_eq!(table.active_index(), Some(2));
    assert_eq!(table.cursor(), 3);
    assert_relative_eq!(held, 0.55 * 0.7, max_relative = 1e-12);

    // A smaller radius never moves the cursor back
    table.advance_if_needed(Meters::from_micrometres(1.0));
    assert_eq!(table.active_index(), Some(2));
}

/// Growth per metre is larger when the closing speed is small.
#[test]
fn test_coalescence_is_fastest_near_balance() {
    let growth = CoalescenceGrowth::new(6.0e-3, 1000.0);
    let w = MetersPerSecond::new(5.0);
    let dz = Meters::new(1.0);

    let slow = growth
        .step(0.6, MetersPerSecond::new(4.9), w, ClosingMotion::Rising, dz)
        .unwrap();
    let fast = growth
        .step(0.6, MetersPerSecond::new(2.5), w, ClosingMotion::Rising, dz)
        .unwrap();
    assert!(slow.radius_increment > fast.radius_increment);
    assert!(slow.time_increment > fast.time_increment);

    let balanced = growth.step(0.6, w, w, ClosingMotion::Falling, dz);
    assert!(matches!(
        balanced,
        Err(SimulationError::DenominatorSignViolation { .. })
    ));
}

/// Repeated evaporation steps follow r² decreasing linearly in time.
#[test]
fn test_diffusion_is_linear_in_radius_squared() {
    let config = SimulationConfig::default();
    let diffusion = DiffusionalGrowth::new(config.diffusion_constant());
    let dt = Seconds::new(1.0);

    let r0 = Meters::from_micrometres(1000.0);
    let mut r = r0;
    for _ in 0..1000 {
        r = diffusion.next_radius(r, dt, Meters::new(1000.0)).unwrap();
    }

    let expected = *r0 * *r0 + 2.0 * config.diffusion_constant() * 1000.0;
    assert_relative_eq!(*r * *r, expected, max_relative = 1e-9);
    assert!(r < r0);
}

#[test]
fn test_small_droplet_evaporates() {
    let diffusion = DiffusionalGrowth::new(-3.0e-11);
    let result = diffusion.next_radius(
        Meters::from_micrometres(1.0),
        Seconds::new(1.0),
        Meters::new(500.0),
    );
    match result {
        Err(SimulationError::InvalidRadicand { radicand, height }) => {
            assert!(radicand < 0.0);
            assert_eq!(height, Meters::new(500.0));
        }
        other => panic!("expected evaporation, got {other:?}"),
    }
}

//! Scalar metrics extracted from a finished run
//!
//! Read-only over the frozen series and its phase boundaries; nothing here
//! re-evaluates the physics. A section is `None` when its phase did not
//! finish through its own termination condition.

use super::error::RunOutcome;
use super::integrator::SimulationRun;
use crate::core_types::{Celsius, Meters, Seconds};

/// Metrics at the top of the trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AscentSummary {
    /// Time from release to the highest point
    pub duration: Seconds,
    /// Highest point above ground
    pub max_height: Meters,
    /// Highest point above the release height
    pub rise_from_start: Meters,
    /// Radius at the highest point
    pub radius_at_max_height: Meters,
}

/// Metrics at cloud base
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentSummary {
    /// Time from the highest point back to cloud base
    pub duration: Seconds,
    pub radius_at_cloud_base: Meters,
    /// Time from release to cloud base
    pub total_in_cloud_time: Seconds,
}

/// Metrics at the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallSummary {
    /// Time from cloud base to the ground, from the series
    pub duration: Seconds,
    /// Cloud base height over the frozen fall speed
    pub duration_estimate: Seconds,
    /// Time from release to the ground
    pub total_time: Seconds,
    pub radius_at_ground: Meters,
    /// Ground radius minus cloud-base radius (negative when evaporating)
    pub size_change_from_cloud_base: Meters,
}

/// Report-ready metrics of one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    /// Temperature at the release point (informational)
    pub initial_temperature: Celsius,
    /// Number of recorded samples
    pub samples: usize,
    pub ascent: Option<AscentSummary>,
    pub descent: Option<DescentSummary>,
    pub fall: Option<FallSummary>,
}

impl RunSummary {
    /// Derive the metrics of `run`
    #[must_use]
    pub fn extract(run: &SimulationRun) -> Self {
        let series = run.series();
        let boundaries = run.boundaries();
        let at = |index: Option<usize>| index.and_then(|i| series.get(i));

        let seed = series.first();
        let top = at(boundaries.ascent_end);
        let base = at(boundaries.descent_end);
        let ground = at(boundaries.fall_end);

        let ascent = seed.zip(top).map(|(seed, top)| AscentSummary {
            duration: top.time - seed.time,
            max_height: top.height,
            rise_from_start: top.height - seed.height,
            radius_at_max_height: top.radius,
        });

        let descent = top.zip(base).map(|(top, base)| DescentSummary {
            duration: base.time - top.time,
            radius_at_cloud_base: base.radius,
            total_in_cloud_time: base.time,
        });

        let fall = base.zip(ground).map(|(base, ground)| FallSummary {
            duration: ground.time - base.time,
            duration_estimate: run.config().cloud_base / ground.velocity,
            total_time: ground.time,
            radius_at_ground: ground.radius,
            size_change_from_cloud_base: ground.radius - base.radius,
        });

        Self {
            outcome: run.outcome().clone(),
            initial_temperature: run.config().initial_temperature(),
            samples: series.len(),
            ascent,
            descent,
            fall,
        }
    }

    /// Whether the droplet left the cloud top during ascent
    #[must_use]
    pub fn cloud_top_exceeded(&self) -> bool {
        self.outcome.exceeded_cloud_top()
    }

    /// Whether the droplet evaporated before reaching the ground
    #[must_use]
    pub fn evaporated(&self) -> bool {
        self.outcome.evaporated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{DropletState, MetersPerSecond, SimulationConfig};
    use crate::simulation::{Phase, PhaseBoundaries, SimulationError};
    use approx::assert_relative_eq;

    fn sample(time: f64, height: f64, radius_um: f64, velocity: f64) -> DropletState {
        DropletState {
            time: Seconds::new(time),
            height: Meters::new(height),
            radius: Meters::from_micrometres(radius_um),
            velocity: MetersPerSecond::new(velocity),
        }
    }

    fn complete_run() -> SimulationRun {
        let config = SimulationConfig {
            cloud_base: Meters::new(2000.0),
            ..SimulationConfig::default()
        };
        let series = vec![
            sample(0.0, 2250.0, 15.0, 0.0),
            sample(100.0, 4000.0, 300.0, 2.4),
            sample(600.0, 5500.0, 619.0, 4.9),
            sample(900.0, 3000.0, 2000.0, 8.9),
            sample(1000.0, 2000.5, 3000.0, 10.0),
            sample(1100.0, 1000.5, 2999.0, 10.0),
            sample(1200.0, 0.5, 2998.5, 10.0),
        ];
        let boundaries = PhaseBoundaries {
            ascent_end: Some(2),
            descent_end: Some(4),
            fall_end: Some(6),
        };
        SimulationRun::from_parts(config, series, boundaries, RunOutcome::ReachedGround)
    }

    #[test]
    fn test_complete_run_metrics() {
        let summary = complete_run().summary();
        assert!(!summary.cloud_top_exceeded());
        assert!(!summary.evaporated());
        assert_eq!(summary.samples, 7);

        let ascent = summary.ascent.unwrap();
        assert_eq!(ascent.duration, Seconds::new(600.0));
        assert_eq!(ascent.max_height, Meters::new(5500.0));
        assert_eq!(ascent.rise_from_start, Meters::new(3250.0));
        assert_eq!(ascent.radius_at_max_height, Meters::from_micrometres(619.0));

        let descent = summary.descent.unwrap();
        assert_eq!(descent.duration, Seconds::new(400.0));
        assert_eq!(descent.total_in_cloud_time, Seconds::new(1000.0));
        assert_eq!(descent.radius_at_cloud_base, Meters::from_micrometres(3000.0));

        let fall = summary.fall.unwrap();
        assert_eq!(fall.duration, Seconds::new(200.0));
        assert_eq!(fall.total_time, Seconds::new(1200.0));
        assert_eq!(fall.duration_estimate, Seconds::new(200.0));
        assert_relative_eq!(
            fall.size_change_from_cloud_base.as_micrometres(),
            -1.5,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_halted_run_has_partial_sections() {
        let config = SimulationConfig::default();
        let series = vec![sample(0.0, 2250.0, 15.0, 0.0), sample(10.0, 2300.0, 15.0, 0.03)];
        let outcome = RunOutcome::Halted {
            phase: Phase::Ascent,
            error: SimulationError::CloudTopExceeded {
                height: Meters::new(8000.001),
                cloud_top: Meters::new(8000.0),
            },
        };
        let run = SimulationRun::from_parts(config, series, PhaseBoundaries::default(), outcome);

        let summary = RunSummary::extract(&run);
        assert!(summary.cloud_top_exceeded());
        assert!(summary.ascent.is_none());
        assert!(summary.descent.is_none());
        assert!(summary.fall.is_none());
        assert!((*summary.initial_temperature - 8.75).abs() < 1e-12);
    }

    #[test]
    fn test_evaporated_run_keeps_in_cloud_sections() {
        let mut run = complete_run();
        let series = run.series()[..6].to_vec();
        let boundaries = PhaseBoundaries {
            fall_end: None,
            ..run.boundaries()
        };
        let outcome = RunOutcome::Halted {
            phase: Phase::FreeFall,
            error: SimulationError::InvalidRadicand {
                radicand: -1.0e-12,
                height: Meters::new(900.0),
            },
        };
        run = SimulationRun::from_parts(run.config().clone(), series, boundaries, outcome);

        let summary = run.summary();
        assert!(summary.evaporated());
        assert!(summary.ascent.is_some());
        assert!(summary.descent.is_some());
        assert!(summary.fall.is_none());
        assert_eq!(run.phase_samples(Phase::FreeFall).len(), 1);
    }
}

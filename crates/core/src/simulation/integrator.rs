//! Three-phase droplet integrator
//!
//! Drives a droplet through `Ascent → DescentInCloud → FreeFall → Terminated`.
//! Each phase has its own step rule and termination predicate:
//!
//! | Phase | Step | Velocity | Growth | Ends when |
//! |---|---|---|---|---|
//! | Ascent | +dz | u(r) | coalescence, w − u | u(r) ≥ w |
//! | DescentInCloud | −dz | u(r) | coalescence, u − w | next z < cloud base |
//! | FreeFall | dt | frozen at cloud exit | diffusional | next z < 0 |
//!
//! Every phase computes the tentative next sample first and drops it when it
//! violates the phase predicate, so the last kept sample of a phase is always
//! inside that phase's valid region. Samples are only ever appended.

use std::fmt;

use tracing::{debug, info, warn};

use super::error::{RunOutcome, SimulationError};
use super::summary::RunSummary;
use crate::core_types::{
    ConfigError, DropletState, Meters, Quantity, SimulationConfig, UninitializedEfficiencyPolicy,
};
use crate::physics::{
    ClosingMotion, CoalescenceGrowth, CollectionEfficiencyTable, DiffusionalGrowth,
    TerminalVelocityModel,
};

/// Integration phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Carried upward inside the cloud
    Ascent,
    /// Falling through the updraft inside the cloud
    DescentInCloud,
    /// Falling below cloud base
    FreeFall,
    /// Frozen; no further transitions
    Terminated,
}

impl Phase {
    /// Phase that follows a natural end of this one
    #[must_use]
    pub fn next(self) -> Phase {
        match self {
            Phase::Ascent => Phase::DescentInCloud,
            Phase::DescentInCloud => Phase::FreeFall,
            Phase::FreeFall | Phase::Terminated => Phase::Terminated,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Ascent => "ascent",
            Phase::DescentInCloud => "descent in cloud",
            Phase::FreeFall => "free fall",
            Phase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Index of the last sample of each completed phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseBoundaries {
    pub ascent_end: Option<usize>,
    pub descent_end: Option<usize>,
    pub fall_end: Option<usize>,
}

/// Owns the trajectory and the efficiency cursor for one run
#[derive(Debug, Clone)]
pub struct PhaseIntegrator {
    config: SimulationConfig,
    velocity: TerminalVelocityModel,
    efficiency: CollectionEfficiencyTable,
    coalescence: CoalescenceGrowth,
    series: Vec<DropletState>,
    current: DropletState,
    boundaries: PhaseBoundaries,
    phase: Phase,
    outcome: Option<RunOutcome>,
    zero_growth_logged: bool,
}

impl PhaseIntegrator {
    /// Validate the configuration and seed the trajectory at the release point.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration fails validation.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let efficiency = CollectionEfficiencyTable::new(
            config.collection_efficiency.clone(),
            config.coalescence_efficiency,
            config.lookup_rule,
        )?;
        let seed = DropletState::seed(config.start_height(), config.initial_radius);

        info!(
            "Releasing {:.1} µm droplet at {:.1} (cloud {:.0}..{:.0}, w = {:.2}, {:?} lookup)",
            config.initial_radius.as_micrometres(),
            seed.height,
            config.cloud_base,
            config.cloud_top(),
            config.updraft_speed,
            config.lookup_rule
        );

        Ok(Self {
            velocity: TerminalVelocityModel::new(config.velocity_coefficients),
            coalescence: CoalescenceGrowth::new(
                config.liquid_water_content,
                config.liquid_density,
            ),
            efficiency,
            series: vec![seed],
            current: seed,
            boundaries: PhaseBoundaries::default(),
            phase: Phase::Ascent,
            outcome: None,
            zero_growth_logged: false,
            config: config.clone(),
        })
    }

    /// Phase that the next call to [`Self::step_phase`] will run
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Samples recorded so far
    #[must_use]
    pub fn series(&self) -> &[DropletState] {
        &self.series
    }

    #[must_use]
    pub fn boundaries(&self) -> PhaseBoundaries {
        self.boundaries
    }

    /// Read-only view of the efficiency table and its cursor
    #[must_use]
    pub fn efficiency_table(&self) -> &CollectionEfficiencyTable {
        &self.efficiency
    }

    /// Terminal outcome, once the run has terminated
    #[must_use]
    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Run the current phase to completion and transition.
    ///
    /// Returns the outcome once the run has terminated, `None` while phases
    /// remain. Calling again after termination changes nothing.
    pub fn step_phase(&mut self) -> Option<RunOutcome> {
        let phase = self.phase;
        if phase == Phase::Terminated {
            return self.outcome.clone();
        }

        let start = self.series.len();
        info!("Entering {} at {:.3}", phase, self.current.height);

        let result = match phase {
            Phase::Ascent => self.ascend(),
            Phase::DescentInCloud => self.descend(),
            Phase::FreeFall => self.fall(),
            Phase::Terminated => Ok(()),
        };

        let added = self.series.len() - start;
        match result {
            Ok(()) => {
                let last = self.series.len() - 1;
                match phase {
                    Phase::Ascent => self.boundaries.ascent_end = Some(last),
                    Phase::DescentInCloud => self.boundaries.descent_end = Some(last),
                    Phase::FreeFall => self.boundaries.fall_end = Some(last),
                    Phase::Terminated => {}
                }
                info!(
                    "Finished {} after {} steps: z = {:.3}, r = {:.2} µm, t = {:.1}",
                    phase,
                    added,
                    self.current.height,
                    self.current.radius.as_micrometres(),
                    self.current.time
                );

                self.phase = phase.next();
                if self.phase == Phase::Terminated {
                    self.outcome = Some(RunOutcome::ReachedGround);
                }
            }
            Err(error) => {
                warn!("Run halted during {} after {} steps: {}", phase, added, error);
                self.phase = Phase::Terminated;
                self.outcome = Some(RunOutcome::Halted { phase, error });
            }
        }

        self.outcome.clone()
    }

    /// Drive all remaining phases and freeze the trajectory
    #[must_use]
    pub fn run(mut self) -> SimulationRun {
        let outcome = loop {
            if let Some(outcome) = self.step_phase() {
                break outcome;
            }
        };

        SimulationRun {
            config: self.config,
            series: self.series,
            boundaries: self.boundaries,
            outcome,
        }
    }

    fn ascend(&mut self) -> Result<(), SimulationError> {
        let updraft = self.config.updraft_speed;
        let dz = self.config.height_step;
        let cloud_top = self.config.cloud_top();

        loop {
            let prev = self.current;
            let fall_speed = self.velocity.fall_speed(prev.radius);
            if fall_speed >= updraft {
                return Ok(());
            }

            let height = prev.height + dz;
            if height > cloud_top {
                return Err(SimulationError::CloudTopExceeded { height, cloud_top });
            }
            let efficiency = self.collection_efficiency(prev.radius)?;

            let step = self.coalescence.step(
                efficiency,
                fall_speed,
                updraft,
                ClosingMotion::Rising,
                dz,
            )?;
            self.record(DropletState {
                time: prev.time + step.time_increment,
                height,
                radius: prev.radius + step.radius_increment,
                velocity: fall_speed,
            })?;
        }
    }

    fn descend(&mut self) -> Result<(), SimulationError> {
        let updraft = self.config.updraft_speed;
        let dz = self.config.height_step;
        let cloud_base = self.config.cloud_base;

        loop {
            let prev = self.current;
            let height = prev.height - dz;
            if height < cloud_base {
                return Ok(());
            }

            let fall_speed = self.velocity.fall_speed(prev.radius);
            let efficiency = self.collection_efficiency(prev.radius)?;
            let step = self.coalescence.step(
                efficiency,
                fall_speed,
                updraft,
                ClosingMotion::Falling,
                dz,
            )?;
            self.record(DropletState {
                time: prev.time + step.time_increment,
                height,
                radius: prev.radius + step.radius_increment,
                velocity: fall_speed,
            })?;
        }
    }

    fn fall(&mut self) -> Result<(), SimulationError> {
        // Fall speed stays at its cloud-base value for the whole phase. A seed
        // that never took an in-cloud step has no recorded speed yet.
        let velocity = if self.boundaries.descent_end == Some(0) {
            self.velocity.fall_speed(self.current.radius)
        } else {
            self.current.velocity
        };
        if velocity.is_nan() || *velocity <= 0.0 {
            return Err(SimulationError::DenominatorSignViolation {
                phase: Phase::FreeFall,
                denominator: *velocity,
            });
        }

        let diffusion = DiffusionalGrowth::new(self.config.diffusion_constant());
        let dt = self.config.time_step;
        let dz = velocity * dt;
        debug!(
            "Free fall at {:.3} with diffusion constant {:e} m²/s",
            velocity,
            diffusion.constant()
        );

        loop {
            let prev = self.current;
            let height = prev.height - dz;
            if height < Meters::ZERO {
                return Ok(());
            }

            let radius = diffusion.next_radius(prev.radius, dt, height)?;
            self.record(DropletState {
                time: prev.time + dt,
                height,
                radius,
                velocity,
            })?;
        }
    }

    /// Collection efficiency for this step, applying the configured policy
    /// while no table row is active
    fn collection_efficiency(&mut self, radius: Meters) -> Result<f64, SimulationError> {
        if let Some(efficiency) = self.efficiency.advance_if_needed(radius) {
            return Ok(efficiency);
        }

        match self.config.uninitialized_efficiency {
            UninitializedEfficiencyPolicy::ZeroGrowth => {
                if !self.zero_growth_logged {
                    debug!(
                        "No collection efficiency for r = {:.2} µm yet; coalescence growth is zero",
                        radius.as_micrometres()
                    );
                    self.zero_growth_logged = true;
                }
                Ok(0.0)
            }
            UninitializedEfficiencyPolicy::Halt => {
                Err(SimulationError::UninitializedEfficiency { radius })
            }
        }
    }

    fn record(&mut self, state: DropletState) -> Result<(), SimulationError> {
        if self.series.len() >= self.config.max_steps {
            return Err(SimulationError::StepLimitExceeded {
                limit: self.config.max_steps,
            });
        }
        self.series.push(state);
        self.current = state;
        Ok(())
    }
}

/// Frozen trajectory of a finished run
#[derive(Debug, Clone)]
pub struct SimulationRun {
    config: SimulationConfig,
    series: Vec<DropletState>,
    boundaries: PhaseBoundaries,
    outcome: RunOutcome,
}

impl SimulationRun {
    #[cfg(test)]
    pub(crate) fn from_parts(
        config: SimulationConfig,
        series: Vec<DropletState>,
        boundaries: PhaseBoundaries,
        outcome: RunOutcome,
    ) -> Self {
        Self {
            config,
            series,
            boundaries,
            outcome,
        }
    }

    /// Configuration the run was produced from
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Every recorded sample, seed first
    #[must_use]
    pub fn series(&self) -> &[DropletState] {
        &self.series
    }

    #[must_use]
    pub fn boundaries(&self) -> PhaseBoundaries {
        self.boundaries
    }

    #[must_use]
    pub fn outcome(&self) -> &RunOutcome {
        &self.outcome
    }

    /// Last recorded sample
    #[must_use]
    pub fn final_state(&self) -> Option<&DropletState> {
        self.series.last()
    }

    /// Samples produced by one phase.
    ///
    /// The seed belongs to the ascent. A phase the run halted in yields the
    /// valid prefix it produced; a phase that never started yields nothing.
    #[must_use]
    pub fn phase_samples(&self, phase: Phase) -> &[DropletState] {
        let b = self.boundaries;
        let (start, end) = match phase {
            Phase::Ascent => (Some(0), b.ascent_end),
            Phase::DescentInCloud => (b.ascent_end.map(|i| i + 1), b.descent_end),
            Phase::FreeFall => (b.descent_end.map(|i| i + 1), b.fall_end),
            Phase::Terminated => (None, None),
        };

        let Some(start) = start else {
            return &[];
        };
        let end = match end {
            Some(last) => last + 1,
            None if self.halted_in(phase) => self.series.len(),
            None => return &[],
        };
        self.series.get(start..end).unwrap_or(&[])
    }

    /// Ascent and in-cloud descent samples
    #[must_use]
    pub fn in_cloud(&self) -> &[DropletState] {
        let len = self.phase_samples(Phase::Ascent).len()
            + self.phase_samples(Phase::DescentInCloud).len();
        &self.series[..len]
    }

    /// Pairs of projected values for plotting, e.g. `(Radius, Height)`
    pub fn projection(&self, x: Quantity, y: Quantity) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.series.iter().map(move |s| (s.get(x), s.get(y)))
    }

    /// Scalar metrics of the run
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary::extract(self)
    }

    fn halted_in(&self, phase: Phase) -> bool {
        matches!(self.outcome, RunOutcome::Halted { phase: p, .. } if p == phase)
    }
}

/// Validate `config` and run all three phases.
///
/// Physical halts are reported through [`SimulationRun::outcome`], not as
/// an error.
///
/// # Errors
/// Returns `ConfigError` if the configuration is rejected before any step.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationRun, ConfigError> {
    Ok(PhaseIntegrator::new(config)?.run())
}

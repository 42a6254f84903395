//! Run outcomes and the conditions that halt a run early

use std::fmt;

use super::integrator::Phase;
use crate::core_types::Meters;

/// Conditions detected at a step boundary that stop the integration.
///
/// None of these are retried: the model is deterministic, so the same
/// inputs reach the same condition again.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The droplet would evaporate completely before reaching the ground
    InvalidRadicand { radicand: f64, height: Meters },
    /// The droplet left the cloud top before its fall speed matched the updraft
    CloudTopExceeded { height: Meters, cloud_top: Meters },
    /// Growth was requested before any collection efficiency row was active
    UninitializedEfficiency { radius: Meters },
    /// A phase would divide by a non-positive relative speed
    DenominatorSignViolation { phase: Phase, denominator: f64 },
    /// The sample cap was reached before the run terminated naturally
    StepLimitExceeded { limit: usize },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidRadicand { radicand, height } => write!(
                f,
                "droplet evaporated at {height:.1} before reaching the ground (radicand {radicand:e})"
            ),
            SimulationError::CloudTopExceeded { height, cloud_top } => write!(
                f,
                "droplet exceeded the cloud top ({height:.1} > {cloud_top:.1})"
            ),
            SimulationError::UninitializedEfficiency { radius } => write!(
                f,
                "no collection efficiency defined for r = {:.2} µm",
                radius.as_micrometres()
            ),
            SimulationError::DenominatorSignViolation { phase, denominator } => write!(
                f,
                "non-positive relative speed {denominator} m/s during {phase}"
            ),
            SimulationError::StepLimitExceeded { limit } => {
                write!(f, "step limit of {limit} samples reached")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Terminal state of a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// All three phases completed and the droplet reached the ground
    ReachedGround,
    /// The run stopped inside `phase`; the series holds the valid prefix
    Halted { phase: Phase, error: SimulationError },
}

impl RunOutcome {
    /// Whether the droplet reached the ground
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, RunOutcome::ReachedGround)
    }

    /// The halting condition, if any
    #[must_use]
    pub fn error(&self) -> Option<&SimulationError> {
        match self {
            RunOutcome::ReachedGround => None,
            RunOutcome::Halted { error, .. } => Some(error),
        }
    }

    /// Whether the run stopped because the droplet left the cloud top
    #[must_use]
    pub fn exceeded_cloud_top(&self) -> bool {
        matches!(self.error(), Some(SimulationError::CloudTopExceeded { .. }))
    }

    /// Whether the droplet evaporated below cloud base
    #[must_use]
    pub fn evaporated(&self) -> bool {
        matches!(self.error(), Some(SimulationError::InvalidRadicand { .. }))
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::ReachedGround => write!(f, "reached the ground"),
            RunOutcome::Halted { phase, error } => write!(f, "halted during {phase}: {error}"),
        }
    }
}

//! Droplet state samples

use serde::{Deserialize, Serialize};

use super::units::{Meters, MetersPerSecond, Seconds};

/// One recorded step of the droplet trajectory.
///
/// Samples are appended by the phase integrator and never modified
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropletState {
    /// Elapsed time since release
    pub time: Seconds,
    /// Height above ground
    pub height: Meters,
    /// Droplet radius
    pub radius: Meters,
    /// Fall speed (always ≥ 0)
    pub velocity: MetersPerSecond,
}

impl DropletState {
    /// Seed sample: at rest at the release point
    #[must_use]
    pub fn seed(height: Meters, radius: Meters) -> Self {
        Self {
            time: Seconds::ZERO,
            height,
            radius,
            velocity: MetersPerSecond::ZERO,
        }
    }

    /// Project the sample onto one axis, in SI units
    #[must_use]
    pub fn get(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::Time => *self.time,
            Quantity::Height => *self.height,
            Quantity::Radius => *self.radius,
            Quantity::Velocity => *self.velocity,
        }
    }
}

/// Scalar axes a sample can be projected onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    Time,
    Height,
    Radius,
    Velocity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_at_rest() {
        let seed = DropletState::seed(Meters::new(2250.0), Meters::from_micrometres(15.0));
        assert_eq!(seed.time, Seconds::ZERO);
        assert_eq!(seed.velocity, MetersPerSecond::ZERO);
        assert_eq!(seed.get(Quantity::Height), 2250.0);
    }
}

//! Droplet growth laws
//!
//! # Scientific Background
//!
//! Inside the cloud a droplet grows by sweeping up cloud water
//! (continuous collection model):
//!
//! `dr/dz = E·M / (4·ρ_l) · u / (w − u)` while rising,
//! `dr/dz = E·M / (4·ρ_l) · u / (u − w)` while falling,
//!
//! where the denominator is the droplet's speed relative to the ground
//! and converts the height step into a time step, `dt = dz / |w − u|`.
//!
//! Below cloud base there is no cloud water to collect. The radius then
//! follows the diffusional law `r·dr/dt = c`, integrated exactly over one
//! time step as `r' = √(r² + 2·c·dt)`. With `c = (coalescence − 1)·xi1` and
//! a coalescence efficiency below one, `c` is negative and the drop slowly
//! evaporates.
//!
//! # References
//! - Rogers, R.R. & Yau, M.K. (1989). "A Short Course in Cloud Physics", ch. 7–8.

use crate::core_types::{Meters, MetersPerSecond, Seconds};
use crate::simulation::{Phase, SimulationError};

/// Direction of droplet motion relative to the updraft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosingMotion {
    /// Carried upward: the updraft outpaces the fall speed
    Rising,
    /// Falling through the updraft
    Falling,
}

impl ClosingMotion {
    /// Net vertical speed: `w − u` when rising, `u − w` when falling
    #[must_use]
    pub fn closing_speed(self, fall_speed: MetersPerSecond, updraft: MetersPerSecond) -> f64 {
        match self {
            ClosingMotion::Rising => *updraft - *fall_speed,
            ClosingMotion::Falling => *fall_speed - *updraft,
        }
    }

    /// Integration phase this motion belongs to
    #[must_use]
    pub fn phase(self) -> Phase {
        match self {
            ClosingMotion::Rising => Phase::Ascent,
            ClosingMotion::Falling => Phase::DescentInCloud,
        }
    }
}

/// Radius and time increments of one in-cloud height step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoalescenceStep {
    /// Radius gained
    pub radius_increment: Meters,
    /// Time taken to cover the height step
    pub time_increment: Seconds,
}

/// Continuous collection growth inside the cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoalescenceGrowth {
    /// Liquid water content M (kg/m³)
    liquid_water_content: f64,
    /// Density of liquid water (kg/m³)
    liquid_density: f64,
}

impl CoalescenceGrowth {
    #[must_use]
    pub fn new(liquid_water_content: f64, liquid_density: f64) -> Self {
        Self {
            liquid_water_content,
            liquid_density,
        }
    }

    /// Radius gained per metre of travel per unit of `u / closing speed`
    #[must_use]
    pub fn rate_coefficient(&self, efficiency: f64) -> f64 {
        efficiency * self.liquid_water_content / (4.0 * self.liquid_density)
    }

    /// Advance one height step.
    ///
    /// # Arguments
    ///
    /// * `efficiency` - Collection efficiency in effect (0 for no growth)
    /// * `fall_speed` - Terminal velocity of the droplet
    /// * `updraft` - Updraft speed
    /// * `motion` - Whether the droplet is rising or falling
    /// * `height_step` - Height covered in this step
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::DenominatorSignViolation` if the closing
    /// speed is not strictly positive for the given motion.
    pub fn step(
        &self,
        efficiency: f64,
        fall_speed: MetersPerSecond,
        updraft: MetersPerSecond,
        motion: ClosingMotion,
        height_step: Meters,
    ) -> Result<CoalescenceStep, SimulationError> {
        let closing = motion.closing_speed(fall_speed, updraft);
        if !(closing.is_finite() && closing > 0.0) {
            return Err(SimulationError::DenominatorSignViolation {
                phase: motion.phase(),
                denominator: closing,
            });
        }

        let dr = self.rate_coefficient(efficiency) * *fall_speed / closing * *height_step;
        Ok(CoalescenceStep {
            radius_increment: Meters::new(dr),
            time_increment: Seconds::new(*height_step / closing),
        })
    }
}

/// Diffusional growth (or evaporation) below cloud base
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionalGrowth {
    /// Diffusion constant c (m²/s), negative for evaporation
    constant: f64,
}

impl DiffusionalGrowth {
    #[must_use]
    pub fn new(constant: f64) -> Self {
        Self { constant }
    }

    /// Diffusion constant c
    #[must_use]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Radius after one time step: `√(r² + 2·c·dt)`.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::InvalidRadicand` when the droplet would
    /// evaporate completely within the step. `height` is carried into
    /// the error to locate the event.
    pub fn next_radius(
        &self,
        radius: Meters,
        time_step: Seconds,
        height: Meters,
    ) -> Result<Meters, SimulationError> {
        let radicand = *radius * *radius + 2.0 * self.constant * *time_step;
        if radicand < 0.0 || !radicand.is_finite() {
            return Err(SimulationError::InvalidRadicand { radicand, height });
        }
        Ok(Meters::new(radicand.sqrt()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DZ: Meters = Meters::new(0.001);

    #[test]
    fn test_rising_step_matches_formula() {
        let growth = CoalescenceGrowth::new(6.0e-3, 1000.0);
        let u = MetersPerSecond::new(1.0);
        let w = MetersPerSecond::new(5.0);
        let step = growth
            .step(0.5, u, w, ClosingMotion::Rising, DZ)
            .unwrap();

        let expected = 0.5 * 6.0e-3 / 4000.0 * (1.0 / 4.0) * 0.001;
        assert_relative_eq!(*step.radius_increment, expected, max_relative = 1e-12);
        assert_relative_eq!(*step.time_increment, 0.001 / 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_falling_step_matches_formula() {
        let growth = CoalescenceGrowth::new(6.0e-3, 1000.0);
        let u = MetersPerSecond::new(7.0);
        let w = MetersPerSecond::new(5.0);
        let step = growth
            .step(0.6, u, w, ClosingMotion::Falling, DZ)
            .unwrap();

        let expected = 0.6 * 6.0e-3 / 4000.0 * (7.0 / 2.0) * 0.001;
        assert_relative_eq!(*step.radius_increment, expected, max_relative = 1e-12);
        assert_relative_eq!(*step.time_increment, 0.0005, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_efficiency_still_advances_time() {
        let growth = CoalescenceGrowth::new(6.0e-3, 1000.0);
        let step = growth
            .step(
                0.0,
                MetersPerSecond::new(0.03),
                MetersPerSecond::new(5.0),
                ClosingMotion::Rising,
                DZ,
            )
            .unwrap();
        assert_eq!(step.radius_increment, Meters::ZERO);
        assert!(*step.time_increment > 0.0);
    }

    #[test]
    fn test_wrong_sign_denominator_is_rejected() {
        let growth = CoalescenceGrowth::new(6.0e-3, 1000.0);
        let w = MetersPerSecond::new(5.0);

        let rising = growth.step(0.5, MetersPerSecond::new(6.0), w, ClosingMotion::Rising, DZ);
        assert!(matches!(
            rising,
            Err(SimulationError::DenominatorSignViolation {
                phase: Phase::Ascent,
                ..
            })
        ));

        let falling = growth.step(0.5, w, w, ClosingMotion::Falling, DZ);
        assert!(matches!(
            falling,
            Err(SimulationError::DenominatorSignViolation {
                phase: Phase::DescentInCloud,
                denominator,
            }) if denominator == 0.0
        ));
    }

    #[test]
    fn test_diffusional_step_is_exact() {
        let law = DiffusionalGrowth::new(-3.0e-11);
        let r = Meters::new(1.0e-3);
        let dt = Seconds::new(0.001);
        let next = law.next_radius(r, dt, Meters::new(1000.0)).unwrap();
        assert_eq!(*next, (1.0e-3_f64 * 1.0e-3 + 2.0 * -3.0e-11 * 0.001).sqrt());
        assert!(next < r);
    }

    #[test]
    fn test_diffusional_growth_with_positive_constant() {
        let law = DiffusionalGrowth::new(1.0e-10);
        let r = Meters::new(5.0e-4);
        let next = law.next_radius(r, Seconds::new(1.0), Meters::new(10.0)).unwrap();
        assert!(next > r);
    }

    #[test]
    fn test_evaporation_reports_invalid_radicand() {
        let law = DiffusionalGrowth::new(-1.0e-3);
        let result = law.next_radius(Meters::new(1.0e-4), Seconds::new(1.0), Meters::new(500.0));
        match result {
            Err(SimulationError::InvalidRadicand { radicand, height }) => {
                assert!(radicand < 0.0);
                assert_eq!(height, Meters::new(500.0));
            }
            other => panic!("expected InvalidRadicand, got {other:?}"),
        }
    }
}

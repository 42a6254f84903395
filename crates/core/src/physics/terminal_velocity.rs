//! Terminal fall speed of a water droplet
//!
//! # Scientific Background
//!
//! The drag regime of a falling drop changes with its size, so the fall
//! speed is approximated by four power laws (Rogers & Yau 1989, eqs. 8.5–8.8):
//!
//! | Regime | Radius | Law |
//! |---|---|---|
//! | Stokes | r < 40 µm | u = k1·r² |
//! | Linear | 40 µm ≤ r ≤ 600 µm | u = k2·r |
//! | Intermediate | 600 µm < r < 2 mm | u = k3·√r |
//! | Large drop | r ≥ 2 mm | u = k4·√r |
//!
//! The fits are not tuned to join continuously. With the default
//! coefficients the speed jumps by ~0.13 m/s at 40 µm, ~0.12 m/s at 600 µm
//! and ~0.45 m/s at 2 mm.

use crate::core_types::{Meters, MetersPerSecond, VelocityCoefficients};

/// Upper limit of the Stokes regime (exclusive)
pub const STOKES_LIMIT: Meters = Meters::new(40.0e-6);

/// Upper limit of the linear regime (inclusive)
pub const LINEAR_LIMIT: Meters = Meters::new(600.0e-6);

/// Lower limit of the large-drop regime (inclusive)
pub const LARGE_DROP_LIMIT: Meters = Meters::new(2.0e-3);

/// Drag regime of a falling droplet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityRegime {
    /// Viscous drag, u ∝ r²
    Stokes,
    /// Transitional drag, u ∝ r
    Linear,
    /// Inertial drag below 2 mm, u ∝ √r
    Intermediate,
    /// Inertial drag for large drops, u ∝ √r
    LargeDrop,
}

impl VelocityRegime {
    /// Select the regime for a droplet radius
    #[must_use]
    pub fn for_radius(radius: Meters) -> Self {
        if radius < STOKES_LIMIT {
            VelocityRegime::Stokes
        } else if radius <= LINEAR_LIMIT {
            VelocityRegime::Linear
        } else if radius < LARGE_DROP_LIMIT {
            VelocityRegime::Intermediate
        } else {
            VelocityRegime::LargeDrop
        }
    }
}

/// Piecewise terminal velocity law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalVelocityModel {
    coefficients: VelocityCoefficients,
}

impl TerminalVelocityModel {
    /// Create a model from the four regime coefficients
    #[must_use]
    pub fn new(coefficients: VelocityCoefficients) -> Self {
        Self { coefficients }
    }

    /// Fall speed of a droplet of the given radius
    #[must_use]
    pub fn fall_speed(&self, radius: Meters) -> MetersPerSecond {
        self.fall_speed_in(VelocityRegime::for_radius(radius), radius)
    }

    /// Evaluate one regime's law regardless of whether `radius` belongs to it.
    ///
    /// Used to measure the jump between neighbouring fits at a boundary.
    #[must_use]
    pub fn fall_speed_in(&self, regime: VelocityRegime, radius: Meters) -> MetersPerSecond {
        let r = radius.max(Meters::ZERO);
        let k = &self.coefficients;
        let speed = match regime {
            VelocityRegime::Stokes => k.k1 * *r * *r,
            VelocityRegime::Linear => k.k2 * *r,
            VelocityRegime::Intermediate => k.k3 * r.sqrt(),
            VelocityRegime::LargeDrop => k.k4 * r.sqrt(),
        };
        MetersPerSecond::new(speed)
    }
}

impl Default for TerminalVelocityModel {
    fn default() -> Self {
        Self::new(VelocityCoefficients::default())
    }
}

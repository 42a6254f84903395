//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers keep heights, radii, durations and speeds from being
//! mixed up in the phase integrator. All quantities are `f64`: a run at
//! `dz = 1 mm` accumulates millions of height increments and `f32` would
//! drift by metres.
//!
//! # Design Philosophy
//! - `Deref` to the inner `f64` for arithmetic-heavy physics code
//! - Only the cross-unit operations the model needs (`Meters / MetersPerSecond`
//!   gives `Seconds`, `MetersPerSecond * Seconds` gives `Meters`)
//! - Total ordering via `f64::total_cmp` (NaN sorts above all values)
//! - `#[serde(transparent)]` so configs serialize as plain numbers
//!
//! # Usage
//! ```
//! use droplet_sim_core::core_types::units::{Meters, MetersPerSecond, Seconds};
//!
//! let dz = Meters::new(0.5);
//! let closing = MetersPerSecond::new(2.0);
//! let dt: Seconds = dz / closing;
//! assert!((*dt - 0.25).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Div, Mul, Neg, Sub, SubAssign};

/// Common impls shared by every scalar unit: ordering, deref, conversion
/// and same-unit arithmetic.
macro_rules! scalar_unit {
    ($name:ident, $suffix:literal) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<f64> for $name {
            #[inline]
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for f64 {
            #[inline]
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if let Some(precision) = f.precision() {
                    write!(f, "{:.*} {}", precision, self.0, $suffix)
                } else {
                    write!(f, "{} {}", self.0, $suffix)
                }
            }
        }
    };
}

// ============================================================================
// LENGTH
// ============================================================================

/// Length in meters (heights and droplet radii)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Meters(f64);

scalar_unit!(Meters, "m");

impl Meters {
    /// Zero length
    pub const ZERO: Meters = Meters(0.0);

    /// Create a new length in meters
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Meters(value)
    }

    /// Create from micrometres (1 µm = 1e-6 m)
    #[inline]
    #[must_use]
    pub const fn from_micrometres(value: f64) -> Self {
        Meters(value * 1.0e-6)
    }

    /// Value in micrometres
    #[inline]
    #[must_use]
    pub fn as_micrometres(self) -> f64 {
        self.0 * 1.0e6
    }

    /// Value in millimetres
    #[inline]
    #[must_use]
    pub fn as_millimetres(self) -> f64 {
        self.0 * 1.0e3
    }

    /// Value in kilometres
    #[inline]
    #[must_use]
    pub fn as_kilometres(self) -> f64 {
        self.0 * 1.0e-3
    }
}

/// Distance / speed = time
impl Div<MetersPerSecond> for Meters {
    type Output = Seconds;
    #[inline]
    fn div(self, rhs: MetersPerSecond) -> Seconds {
        Seconds(self.0 / rhs.0)
    }
}

// ============================================================================
// TIME
// ============================================================================

/// Time in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Seconds(f64);

scalar_unit!(Seconds, "s");

impl Seconds {
    /// Zero duration
    pub const ZERO: Seconds = Seconds(0.0);

    /// Create a new duration in seconds
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Seconds(value)
    }

    /// Value in minutes
    #[inline]
    #[must_use]
    pub fn as_minutes(self) -> f64 {
        self.0 / 60.0
    }
}

// ============================================================================
// VELOCITY
// ============================================================================

/// Speed in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

scalar_unit!(MetersPerSecond, "m/s");

impl MetersPerSecond {
    /// At rest
    pub const ZERO: MetersPerSecond = MetersPerSecond(0.0);

    /// Create a new speed in m/s
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }
}

/// Speed × time = distance
impl Mul<Seconds> for MetersPerSecond {
    type Output = Meters;
    #[inline]
    fn mul(self, rhs: Seconds) -> Meters {
        Meters(self.0 * rhs.0)
    }
}

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Celsius(f64);

scalar_unit!(Celsius, "°C");

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -273.15,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }
}

//! Run configuration for the droplet simulation
//!
//! `SimulationConfig` gathers every constant the integrator reads. It is
//! built once, validated, and never mutated while a run is in progress.
//!
//! Defaults reproduce the classroom case study: a 15 µm droplet released
//! 250 m above the base of a 6 km deep cloud with a 5 m/s updraft and
//! 6 g/m³ of liquid water. Terminal-velocity coefficients are the
//! piecewise fits of Rogers & Yau (1989), converted to SI.
//!
//! # References
//! - Rogers, R.R. & Yau, M.K. (1989). "A Short Course in Cloud Physics", 3rd ed., ch. 8.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::units::{Celsius, Meters, MetersPerSecond, Seconds};

/// Collision efficiency thresholds of the case study (µm)
const DEFAULT_THRESHOLDS_UM: [f64; 18] = [
    20.0, 30.0, 40.0, 50.0, 60.0, 80.0, 100.0, 150.0, 200.0, 300.0, 400.0, 500.0, 600.0, 1000.0,
    1400.0, 1800.0, 2400.0, 3000.0,
];

/// Collision efficiency paired 1:1 with `DEFAULT_THRESHOLDS_UM`
const DEFAULT_EFFICIENCIES: [f64; 18] = [
    0.17, 0.37, 0.55, 0.58, 0.68, 0.76, 0.81, 0.83, 0.87, 0.87, 0.88, 0.88, 0.88, 0.88, 0.88,
    0.86, 0.83, 0.81,
];

/// Coefficients of the four-regime terminal velocity law
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityCoefficients {
    /// Stokes regime, m⁻¹·s⁻¹
    pub k1: f64,
    /// Linear regime, s⁻¹
    pub k2: f64,
    /// Intermediate square-root regime, m^½·s⁻¹
    pub k3: f64,
    /// Large-drop square-root regime, m^½·s⁻¹
    pub k4: f64,
}

impl Default for VelocityCoefficients {
    fn default() -> Self {
        Self {
            k1: 1.19e8,
            k2: 8.0e3,
            k3: 2.01e2,
            k4: 2.11e2,
        }
    }
}

/// One row of the collection efficiency table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyBreakpoint {
    /// Radius threshold
    pub radius: Meters,
    /// Dimensionless collision efficiency at this threshold
    pub efficiency: f64,
}

impl EfficiencyBreakpoint {
    /// Build a breakpoint from a threshold given in micrometres
    #[must_use]
    pub fn from_micrometres(radius_um: f64, efficiency: f64) -> Self {
        Self {
            radius: Meters::from_micrometres(radius_um),
            efficiency,
        }
    }
}

/// How the efficiency cursor compares the droplet radius with the threshold
/// under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupRule {
    /// Advance once the radius meets or exceeds the threshold at the cursor.
    /// The crossed entry becomes active.
    #[default]
    Threshold,
    /// Thresholds are bin upper bounds: while the radius is at or below the
    /// bound at the cursor, that entry becomes active and the cursor moves on.
    /// With an increasing table this sweeps the cursor to the last entry
    /// within the first few steps.
    UpperBound,
}

/// What the integrator does while no efficiency entry is active yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UninitializedEfficiencyPolicy {
    /// Collision-coalescence contributes nothing until a threshold is crossed
    #[default]
    ZeroGrowth,
    /// Halt the run with `SimulationError::UninitializedEfficiency`
    Halt,
}

/// Immutable constants of a single simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Coalescence efficiency applied on top of the collision table
    pub coalescence_efficiency: f64,
    /// Cloud liquid water content M (kg/m³)
    pub liquid_water_content: f64,
    /// Density of liquid water (kg/m³)
    pub liquid_density: f64,
    /// Updraft speed w inside the cloud
    pub updraft_speed: MetersPerSecond,
    /// Terminal velocity law coefficients
    pub velocity_coefficients: VelocityCoefficients,
    /// Height step of the in-cloud phases
    pub height_step: Meters,
    /// Time step of the below-cloud phase
    pub time_step: Seconds,
    /// Release height above cloud base
    pub initial_offset: Meters,
    /// Cloud base height above ground
    pub cloud_base: Meters,
    /// Vertical extent of the cloud
    pub cloud_depth: Meters,
    /// Droplet radius at release
    pub initial_radius: Meters,
    /// Diffusivity xi1 of the below-cloud growth law (m²/s)
    pub diffusivity: f64,
    /// Temperature at cloud base
    pub cloud_base_temperature: Celsius,
    /// Temperature lapse rate (K/m)
    pub lapse_rate: f64,
    /// Collision efficiency breakpoints, ordered by radius
    pub collection_efficiency: Vec<EfficiencyBreakpoint>,
    /// Cursor comparison rule for the efficiency table
    pub lookup_rule: LookupRule,
    /// Behaviour before the first efficiency entry is active
    pub uninitialized_efficiency: UninitializedEfficiencyPolicy,
    /// Hard cap on recorded samples
    pub max_steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            coalescence_efficiency: 0.7,
            liquid_water_content: 6.0e-3,
            liquid_density: 1000.0,
            updraft_speed: MetersPerSecond::new(5.0),
            velocity_coefficients: VelocityCoefficients::default(),
            height_step: Meters::new(0.001),
            time_step: Seconds::new(0.001),
            initial_offset: Meters::new(250.0),
            cloud_base: Meters::new(2000.0),
            cloud_depth: Meters::new(6000.0),
            initial_radius: Meters::from_micrometres(15.0),
            diffusivity: 1.0e-10,
            cloud_base_temperature: Celsius::new(10.0),
            lapse_rate: 0.005,
            collection_efficiency: default_efficiency_table(),
            lookup_rule: LookupRule::Threshold,
            uninitialized_efficiency: UninitializedEfficiencyPolicy::ZeroGrowth,
            max_steps: 50_000_000,
        }
    }
}

/// The case-study collision efficiency table
#[must_use]
pub fn default_efficiency_table() -> Vec<EfficiencyBreakpoint> {
    DEFAULT_THRESHOLDS_UM
        .iter()
        .zip(DEFAULT_EFFICIENCIES.iter())
        .map(|(&r, &e)| EfficiencyBreakpoint::from_micrometres(r, e))
        .collect()
}

impl SimulationConfig {
    /// Case-study constants with the upper-bound lookup
    #[must_use]
    pub fn reference() -> Self {
        Self {
            lookup_rule: LookupRule::UpperBound,
            ..Self::default()
        }
    }

    /// Height of the cloud top above ground
    #[must_use]
    pub fn cloud_top(&self) -> Meters {
        self.cloud_base + self.cloud_depth
    }

    /// Height of the droplet at release
    #[must_use]
    pub fn start_height(&self) -> Meters {
        self.cloud_base + self.initial_offset
    }

    /// Air temperature at the release point.
    ///
    /// Reported only; no growth or fall-speed law depends on it.
    #[must_use]
    pub fn initial_temperature(&self) -> Celsius {
        let value = *self.cloud_base_temperature - self.lapse_rate * *self.initial_offset;
        Celsius::from(value.max(*Celsius::ABSOLUTE_ZERO))
    }

    /// Diffusion constant c = (coalescence − 1) · xi1 of the below-cloud law
    #[must_use]
    pub fn diffusion_constant(&self) -> f64 {
        (self.coalescence_efficiency - 1.0) * self.diffusivity
    }

    /// Check the configuration for values the integrator cannot work with.
    ///
    /// # Errors
    /// Returns the first offending field as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = &self.velocity_coefficients;
        let positive = [
            ("liquid_water_content", self.liquid_water_content),
            ("liquid_density", self.liquid_density),
            ("updraft_speed", *self.updraft_speed),
            ("k1", k.k1),
            ("k2", k.k2),
            ("k3", k.k3),
            ("k4", k.k4),
            ("height_step", *self.height_step),
            ("time_step", *self.time_step),
            ("cloud_depth", *self.cloud_depth),
            ("initial_radius", *self.initial_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let non_negative = [
            ("coalescence_efficiency", self.coalescence_efficiency),
            ("diffusivity", self.diffusivity),
            ("cloud_base", *self.cloud_base),
            ("lapse_rate", self.lapse_rate),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if !(*self.initial_offset >= 0.0 && self.initial_offset <= self.cloud_depth) {
            return Err(ConfigError::StartOutsideCloud {
                offset: self.initial_offset,
                depth: self.cloud_depth,
            });
        }

        if self.collection_efficiency.is_empty() {
            return Err(ConfigError::EmptyEfficiencyTable);
        }
        for (index, entry) in self.collection_efficiency.iter().enumerate() {
            if !(entry.efficiency.is_finite() && entry.efficiency >= 0.0) {
                return Err(ConfigError::InvalidEfficiency {
                    index,
                    value: entry.efficiency,
                });
            }
            if !(entry.radius.is_finite() && *entry.radius > 0.0) {
                return Err(ConfigError::UnorderedEfficiencyTable { index });
            }
        }
        if let Some(index) = self
            .collection_efficiency
            .windows(2)
            .position(|pair| pair[1].radius <= pair[0].radius)
        {
            return Err(ConfigError::UnorderedEfficiencyTable { index: index + 1 });
        }

        if self.max_steps == 0 {
            return Err(ConfigError::ZeroStepLimit);
        }

        Ok(())
    }
}

/// Reasons a `SimulationConfig` is rejected before any step runs
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A quantity that must be strictly positive is zero, negative or not finite
    NonPositive { field: &'static str, value: f64 },
    /// A quantity that must be non-negative is negative or not finite
    Negative { field: &'static str, value: f64 },
    /// The release point lies outside the cloud
    StartOutsideCloud { offset: Meters, depth: Meters },
    /// The efficiency table has no entries
    EmptyEfficiencyTable,
    /// Threshold at `index` is not strictly above its predecessor
    UnorderedEfficiencyTable { index: usize },
    /// Efficiency at `index` is negative or not finite
    InvalidEfficiency { index: usize, value: f64 },
    /// Threshold and efficiency columns have different lengths
    MismatchedEfficiencyTable { thresholds: usize, efficiencies: usize },
    /// `max_steps` is zero
    ZeroStepLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive and finite, got {value}")
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{field} must be non-negative and finite, got {value}")
            }
            ConfigError::StartOutsideCloud { offset, depth } => write!(
                f,
                "initial offset {offset} lies outside the cloud (depth {depth})"
            ),
            ConfigError::EmptyEfficiencyTable => write!(f, "collection efficiency table is empty"),
            ConfigError::UnorderedEfficiencyTable { index } => write!(
                f,
                "collection efficiency threshold {index} is not strictly increasing"
            ),
            ConfigError::InvalidEfficiency { index, value } => {
                write!(f, "collection efficiency {index} is invalid: {value}")
            }
            ConfigError::MismatchedEfficiencyTable {
                thresholds,
                efficiencies,
            } => write!(
                f,
                "efficiency table has {thresholds} thresholds but {efficiencies} values"
            ),
            ConfigError::ZeroStepLimit => write!(f, "max_steps must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

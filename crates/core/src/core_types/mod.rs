//! Core types and utilities

pub mod config;
pub mod state;
pub mod units;

pub use config::{
    default_efficiency_table, ConfigError, EfficiencyBreakpoint, LookupRule, SimulationConfig,
    UninitializedEfficiencyPolicy, VelocityCoefficients,
};
pub use state::{DropletState, Quantity};
pub use units::*;

//! Droplet Microphysics Simulation Core Library
//!
//! A one-dimensional, piecewise-analytic model of a single water droplet
//! carried through a convective cloud and falling out of its base. It
//! reconstructs height, radius, fall speed and elapsed time over three
//! regimes and reports the transition metrics.
//!
//! ## Model
//!
//! - Terminal velocity from a four-regime power law (Stokes, linear, and two
//!   square-root fits)
//! - Growth by continuous collision-coalescence inside the cloud, scaled by a
//!   tabulated collection efficiency walked with a forward-only cursor
//! - Diffusional growth or evaporation below cloud base
//! - A strict `Ascent → DescentInCloud → FreeFall` state machine that records
//!   every step into an append-only series

// Core types and utilities
pub mod core_types;

// Microphysics laws
pub mod physics;

// Phase integrator, outcomes and summaries
pub mod simulation;

// Re-export core types
pub use core_types::{
    ConfigError, DropletState, EfficiencyBreakpoint, LookupRule, Quantity, SimulationConfig,
    UninitializedEfficiencyPolicy, VelocityCoefficients,
};
pub use core_types::{Celsius, Meters, MetersPerSecond, Seconds};

// Re-export physics
pub use physics::{CollectionEfficiencyTable, TerminalVelocityModel, VelocityRegime};

// Re-export simulation types
pub use simulation::{
    simulate, Phase, PhaseBoundaries, PhaseIntegrator, RunOutcome, RunSummary, SimulationError,
    SimulationRun,
};

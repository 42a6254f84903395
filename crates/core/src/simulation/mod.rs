//! Droplet trajectory simulation
//!
//! The [`PhaseIntegrator`] steps a single droplet through three regimes
//! (rising in the updraft, falling through the cloud, falling below
//! cloud base) and freezes the result into a [`SimulationRun`].
//! [`RunSummary`] reduces that run to the scalar metrics a report needs.
//!
//! # Example
//!
//! ```rust,no_run
//! use droplet_sim_core::{simulate, SimulationConfig};
//!
//! let run = simulate(&SimulationConfig::reference()).expect("valid config");
//! let summary = run.summary();
//! if let Some(ascent) = summary.ascent {
//!     println!("max height: {:.1}", ascent.max_height);
//! }
//! ```

mod error;
mod integrator;
mod summary;

pub use error::{RunOutcome, SimulationError};
pub use integrator::{simulate, Phase, PhaseBoundaries, PhaseIntegrator, SimulationRun};
pub use summary::{AscentSummary, DescentSummary, FallSummary, RunSummary};

//! Droplet microphysics
//!
//! Pure laws evaluated once per integration step:
//! - Terminal fall speed as a function of radius (four drag regimes)
//! - Collection efficiency lookup with a forward-only cursor
//! - Collision-coalescence growth inside the cloud
//! - Diffusional growth/evaporation below cloud base
//!
//! # References
//!
//! - Rogers, R.R. & Yau, M.K. (1989). "A Short Course in Cloud Physics", 3rd ed.
//!   Pergamon Press.

pub mod collection_efficiency;
pub mod growth;
pub mod terminal_velocity;

pub use collection_efficiency::CollectionEfficiencyTable;
pub use growth::{ClosingMotion, CoalescenceGrowth, CoalescenceStep, DiffusionalGrowth};
pub use terminal_velocity::{
    TerminalVelocityModel, VelocityRegime, LARGE_DROP_LIMIT, LINEAR_LIMIT, STOKES_LIMIT,
};

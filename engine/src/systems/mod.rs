//! Prop systems: self-contained state machines driven by the controller.
//!
//! Each system owns only its own state and reaches the body, owner, and
//! world through the host traits passed into its methods.

pub mod ccd_system;
pub mod grab_system;
pub mod proximity_system;

pub use ccd_system::CcdGate;
pub use grab_system::{GrabController, GrabState};
pub use proximity_system::{ProximityOutcome, ProximityScheduler, ProximityTier};

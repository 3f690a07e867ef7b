//! Physics type re-exports from glam
//!
//! This module provides the core mathematical types used throughout
//! the prop controller, re-exported from the glam library, plus the
//! world-axis conventions the controller assumes of its host.

pub use glam::{Quat, Vec3};

/// World up axis. Heights (and the safety cull floor) are measured along it.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Local forward axis of a holder. A holder's forward vector is its
/// rotation applied to this axis.
pub const LOCAL_FORWARD: Vec3 = Vec3::NEG_Z;

/// Forward vector of anything oriented by `rotation`.
pub fn forward_vector(rotation: Quat) -> Vec3 {
    rotation * LOCAL_FORWARD
}

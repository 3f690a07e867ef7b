//! Physics module for the prop controller
//!
//! Everything here is pure math over glam types: no host calls, no state.
//! The controller layers (systems, prop) decide *when* to use it.
//!
//! # Unit System
//!
//! Length units follow the host. The stock tuning constants (hold
//! distance 50-250, wall clearance 12, radial radius 500, cull floor
//! -20000) assume centimeters.
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types (Vec3, Quat) re-exported from glam
//! - [`collision`] - Ray/sphere vs AABB sweeps and the [`SweepHit`] result
//! - [`impulse`] - Damage event to impulse translation
//! - [`interp`] - Frame-rate independent interpolation and range mapping

pub mod collision;
pub mod impulse;
pub mod interp;
pub mod types;

pub use collision::{SweepHit, aabb_surface_normal, ray_aabb_intersect, sweep_sphere_aabb};
pub use impulse::{
    DamageEvent, DamageShape, DamageTypeModifier, ImpulseCommand, ImpulseResponse, apply_damage,
    translate_damage,
};
pub use interp::{map_range_clamped, qinterp_to, vinterp_to};
pub use types::{LOCAL_FORWARD, Quat, Vec3, WORLD_UP, forward_vector};

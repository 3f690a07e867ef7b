//! Collision query primitives
//!
//! The controller treats the host's sweep query as a black box that returns
//! the first blocking hit along a segment. This module defines that result
//! type and the ray/sphere-vs-AABB math used by the sandbox host to answer
//! such queries.
//!
//! # Sweeps
//!
//! Boxes are intersected per axis (slab test): the latest entry and the
//! earliest exit across the three axes bound the overlap. A sphere sweep
//! is a ray cast against the box inflated by the sphere radius (Minkowski
//! sum, square corners).
//!
//! # Example
//!
//! ```ignore
//! use physics_prop_engine::physics::collision::sweep_sphere_aabb;
//! use glam::Vec3;
//!
//! let hit = sweep_sphere_aabb(
//!     Vec3::ZERO,
//!     Vec3::new(0.0, 0.0, -200.0),
//!     10.0,
//!     Vec3::new(-50.0, -50.0, -120.0),
//!     Vec3::new(50.0, 50.0, -100.0),
//! );
//! if let Some(hit) = hit {
//!     println!("Blocked at {:?}, normal {:?}", hit.location, hit.normal);
//! }
//! ```

use glam::Vec3;

use crate::host::ActorId;

/// First blocking hit of a sweep query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Position of the swept shape's center at the moment of contact
    pub location: Vec3,
    /// Surface normal at the contact (normalized, facing the sweep origin)
    pub normal: Vec3,
    /// Distance travelled from the sweep start to `location`
    pub distance: f32,
    /// Actor that owns the blocking geometry, if any
    pub actor: Option<ActorId>,
}

impl SweepHit {
    /// Creates a new SweepHit with the given parameters.
    pub fn new(location: Vec3, normal: Vec3, distance: f32, actor: Option<ActorId>) -> Self {
        Self {
            location,
            normal,
            distance,
            actor,
        }
    }
}

/// Entry distance of a ray into a box, by slabs.
///
/// `ray_dir` must be normalized. A ray starting inside the box reports its
/// exit distance; a box entirely behind the origin is a miss.
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero direction components get huge inverse values
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Computes the outward surface normal for a point on an AABB surface.
///
/// Picks the face whose normalized coordinate has the largest magnitude.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.x && abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Sweeps a sphere of `radius` from `start` to `end` against an AABB.
///
/// Returns the first contact along the segment, or `None` if the segment
/// is clear. A sweep that *starts* inside the inflated box is reported as
/// a hit at the start point, so a held prop never gets pushed through.
pub fn sweep_sphere_aabb(
    start: Vec3,
    end: Vec3,
    radius: f32,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<SweepHit> {
    let delta = end - start;
    let length = delta.length();
    if length < 1e-6 {
        return None;
    }
    let dir = delta / length;

    let inflated_min = aabb_min - Vec3::splat(radius);
    let inflated_max = aabb_max + Vec3::splat(radius);

    let starts_inside =
        start.cmpge(inflated_min).all() && start.cmple(inflated_max).all();
    if starts_inside {
        return Some(SweepHit::new(start, -dir, 0.0, None));
    }

    let t = ray_aabb_intersect(start, dir, inflated_min, inflated_max)?;
    if t > length {
        return None;
    }

    let location = start + dir * t;
    let normal = aabb_surface_normal(location, inflated_min, inflated_max);
    Some(SweepHit::new(location, normal, t, None))
}

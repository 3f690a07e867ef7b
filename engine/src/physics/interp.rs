//! Frame-rate independent interpolation helpers.
//!
//! `vinterp_to` / `qinterp_to` move a value a fraction `delta_time * speed`
//! of the way to its target each frame, which gives exponential smoothing
//! that converges regardless of frame rate.

use glam::{Quat, Vec3};

/// Below this squared distance the interpolation snaps to the target.
const SNAP_DISTANCE_SQ: f32 = 1e-8;

/// Interpolate a position toward `target`.
///
/// A non-positive `speed` snaps straight to the target.
pub fn vinterp_to(current: Vec3, target: Vec3, delta_time: f32, speed: f32) -> Vec3 {
    if speed <= 0.0 {
        return target;
    }
    let dist = target - current;
    if dist.length_squared() < SNAP_DISTANCE_SQ {
        return target;
    }
    let alpha = (delta_time * speed).clamp(0.0, 1.0);
    current + dist * alpha
}

/// Interpolate a rotation toward `target` along the shortest arc.
pub fn qinterp_to(current: Quat, target: Quat, delta_time: f32, speed: f32) -> Quat {
    if speed <= 0.0 {
        return target;
    }
    if current.abs_diff_eq(target, 1e-6) {
        return target;
    }
    let alpha = (delta_time * speed).clamp(0.0, 1.0);
    current.slerp(target, alpha).normalize()
}

/// Map `value` from `in_range` to `out_range`, clamping to the output ends.
///
/// A degenerate input range maps everything to `out_range.0`.
pub fn map_range_clamped(value: f32, in_range: (f32, f32), out_range: (f32, f32)) -> f32 {
    let span = in_range.1 - in_range.0;
    if span.abs() < f32::EPSILON {
        return out_range.0;
    }
    let t = ((value - in_range.0) / span).clamp(0.0, 1.0);
    out_range.0 + (out_range.1 - out_range.0) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vinterp_moves_fraction() {
        let p = vinterp_to(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), 0.01, 20.0);
        // 0.01 * 20 = 20% of the way
        assert!((p.x - 20.0).abs() < 1e-4, "got {}", p.x);
    }

    #[test]
    fn test_vinterp_large_step_clamps_to_target() {
        let target = Vec3::new(5.0, 6.0, 7.0);
        assert_eq!(vinterp_to(Vec3::ZERO, target, 1.0, 20.0), target);
    }

    #[test]
    fn test_vinterp_zero_speed_snaps() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(vinterp_to(Vec3::ZERO, target, 0.016, 0.0), target);
    }

    #[test]
    fn test_qinterp_converges() {
        let target = Quat::from_rotation_y(1.0);
        let mut q = Quat::IDENTITY;
        for _ in 0..200 {
            q = qinterp_to(q, target, 1.0 / 60.0, 20.0);
        }
        assert!(q.angle_between(target) < 1e-3);
    }

    #[test]
    fn test_map_range_clamped() {
        assert_eq!(map_range_clamped(5.0, (0.0, 10.0), (0.0, 1.0)), 0.5);
        assert_eq!(map_range_clamped(-5.0, (0.0, 10.0), (0.2, 1.0)), 0.2);
        assert_eq!(map_range_clamped(50.0, (0.0, 10.0), (0.2, 1.0)), 1.0);
        assert_eq!(map_range_clamped(3.0, (2.0, 2.0), (0.2, 1.0)), 0.2);
    }
}

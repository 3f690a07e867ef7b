//! Speed-gated continuous collision detection.
//!
//! CCD is expensive, so it is only switched on while the body is fast
//! enough to tunnel through thin geometry between solver steps. The body's
//! current CCD flag is the applied state; the gate only calls into the
//! body when the desired state differs from it.

use crate::host::PhysicsBody;

/// Per-tick CCD comparator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CcdGate {
    speed_threshold: f32,
}

impl CcdGate {
    /// A threshold of `0.0` (or less) disables the gate.
    pub fn new(speed_threshold: f32) -> Self {
        Self { speed_threshold }
    }

    pub fn speed_threshold(&self) -> f32 {
        self.speed_threshold
    }

    pub fn is_active(&self) -> bool {
        self.speed_threshold > 0.0
    }

    /// Whether a body moving at `speed_sq` (squared speed) wants CCD.
    pub fn wants_ccd(&self, speed_sq: f32) -> bool {
        speed_sq > self.speed_threshold * self.speed_threshold
    }

    /// Compare the body's speed against the threshold and flip CCD if needed.
    ///
    /// Returns the new CCD state when a change was requested, `None` when
    /// the body already matches (or the gate is disabled).
    pub fn update(&self, body: &mut dyn PhysicsBody) -> Option<bool> {
        if !self.is_active() {
            return None;
        }

        let desired = self.wants_ccd(body.linear_velocity().length_squared());
        if body.uses_ccd() == desired {
            return None;
        }

        body.set_use_ccd(desired);
        tracing::trace!(enabled = desired, "ccd toggled");
        Some(desired)
    }
}

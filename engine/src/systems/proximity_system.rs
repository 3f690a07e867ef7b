//! Distance-driven simulation budget.
//!
//! A repeating timer (period = check interval + a one-off random jitter so
//! many props spawned together don't all evaluate on the same frame) checks
//! how far the prop is from the active viewpoint:
//!
//! - far: force the body to rest and tick it once per second
//! - near: tick it every frame again
//!
//! The scheduler only throttles tick *rate*. Tick enablement belongs to the
//! controller's sleep/wake handling.

use rand::Rng;
use static_assertions::const_assert;

use crate::host::{PhysicsBody, PropOwner, PropWorld, TimerHandle, TimerToken};
use crate::physics::types::WORLD_UP;

/// Props whose height drops below this fell out of the world.
pub const WORLD_DEPTH_FLOOR: f32 = -20_000.0;

/// Upper bound of the activation jitter added to the check interval.
pub const MAX_TIMER_JITTER: f32 = 0.5;

/// Body tick interval while far from the viewpoint.
pub const COARSE_TICK_INTERVAL: f32 = 1.0;

/// Body tick interval while near: every frame.
pub const NATIVE_TICK_INTERVAL: f32 = 0.0;

const_assert!(COARSE_TICK_INTERVAL > NATIVE_TICK_INTERVAL);
const_assert!(MAX_TIMER_JITTER >= 0.0);

/// Distance band the prop was last evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityTier {
    Near,
    Far,
}

/// What one evaluation decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityOutcome {
    /// The prop fell out of the world and its owner was destroyed.
    Culled,
    /// No viewpoint this cycle; nothing changed.
    NoViewpoint,
    Near,
    Far,
}

/// A registered timer. Dropping it cancels the registration's token, so
/// the host stops firing it even if nobody clears it explicitly.
#[derive(Debug)]
struct ArmedTimer {
    handle: TimerHandle,
    token: TimerToken,
}

impl Drop for ArmedTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Periodic distance evaluator.
#[derive(Debug)]
pub struct ProximityScheduler {
    cull_distance: f32,
    check_interval: f32,
    timer: Option<ArmedTimer>,
    tier: Option<ProximityTier>,
}

impl ProximityScheduler {
    /// A `cull_distance` of `0.0` disables the scheduler entirely, as does
    /// a non-positive `check_interval`.
    pub fn new(cull_distance: f32, check_interval: f32) -> Self {
        Self {
            cull_distance,
            check_interval,
            timer: None,
            tier: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cull_distance > 0.0 && self.check_interval > 0.0
    }

    /// Whether the repeating timer is armed.
    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer.as_ref().map(|timer| timer.handle)
    }

    pub fn tier(&self) -> Option<ProximityTier> {
        self.tier
    }

    /// Arm the repeating timer. The jitter is drawn once, here.
    ///
    /// Returns `false` if the scheduler is disabled or already armed.
    pub fn activate<R: Rng>(&mut self, world: &mut dyn PropWorld, rng: &mut R) -> bool {
        if !self.is_enabled() || self.timer.is_some() {
            return false;
        }

        let jitter = rng.random_range(0.0..=MAX_TIMER_JITTER);
        let period = self.check_interval + jitter;
        let token = TimerToken::new();
        let handle = world.set_timer(period, true, token.clone());
        self.timer = Some(ArmedTimer { handle, token });

        tracing::debug!(period, "proximity timer armed");
        true
    }

    /// Cancel the repeating timer, if armed.
    pub fn deactivate(&mut self, world: &mut dyn PropWorld) {
        if let Some(timer) = self.timer.take() {
            world.clear_timer(timer.handle);
            tracing::debug!("proximity timer cleared");
        }
    }

    /// One timer tick.
    pub fn evaluate(
        &mut self,
        body: &mut dyn PhysicsBody,
        owner: &mut dyn PropOwner,
        world: &dyn PropWorld,
    ) -> ProximityOutcome {
        let location = owner.location();

        if location.dot(WORLD_UP) < WORLD_DEPTH_FLOOR {
            tracing::info!(?location, "prop fell out of the world, destroying owner");
            owner.destroy();
            return ProximityOutcome::Culled;
        }

        let Some(viewpoint) = world.viewpoint() else {
            tracing::trace!("no viewpoint, skipping proximity check");
            return ProximityOutcome::NoViewpoint;
        };

        let dist_sq = viewpoint.location.distance_squared(location);
        let cull_dist_sq = self.cull_distance * self.cull_distance;

        let tier = if dist_sq > cull_dist_sq {
            if body.is_simulating_physics() && body.is_awake() {
                body.put_to_sleep();
            }
            set_tick_interval_if_changed(body, COARSE_TICK_INTERVAL);
            ProximityTier::Far
        } else {
            set_tick_interval_if_changed(body, NATIVE_TICK_INTERVAL);
            ProximityTier::Near
        };

        if self.tier != Some(tier) {
            tracing::trace!(?tier, distance = dist_sq.sqrt(), "proximity tier changed");
            self.tier = Some(tier);
        }

        match tier {
            ProximityTier::Near => ProximityOutcome::Near,
            ProximityTier::Far => ProximityOutcome::Far,
        }
    }
}

/// Put the body back on per-frame ticking.
///
/// Returns `true` if the interval had to change.
pub fn restore_native_tick(body: &mut dyn PhysicsBody) -> bool {
    set_tick_interval_if_changed(body, NATIVE_TICK_INTERVAL)
}

fn set_tick_interval_if_changed(body: &mut dyn PhysicsBody, interval: f32) -> bool {
    if body.tick_interval() == interval {
        return false;
    }
    body.set_tick_interval(interval);
    true
}

//! Grab / carry / throw state machine.
//!
//! While held, the body stops simulating and the owning actor is moved
//! directly: every tick it eases toward a point `hold_distance` in front of
//! the holder. A sphere sweep from the holder to that point keeps the prop
//! from being pushed into walls, and the move itself sweeps so the prop
//! slides along anything it grazes.
//!
//! ```text
//!          grab(holder)
//!   Idle ───────────────▶ Held
//!    ▲                     │
//!    └─────────────────────┘
//!        drop() / throw()
//! ```

use glam::{Quat, Vec3};
use static_assertions::const_assert;

use crate::host::{ActorId, HolderId, HolderPose, ImpulseMode, PhysicsBody, PropOwner, PropWorld};
use crate::physics::collision::SweepHit;
use crate::physics::interp::{qinterp_to, vinterp_to};

/// Closest a prop is carried, whatever the distance it was grabbed from.
pub const MIN_HOLD_DISTANCE: f32 = 50.0;

/// Farthest a prop is carried.
pub const MAX_HOLD_DISTANCE: f32 = 250.0;

/// Radius of the anti-clipping sweep.
pub const GRAB_SWEEP_RADIUS: f32 = 10.0;

/// Distance kept between a blocking surface and the prop's origin.
pub const WALL_CLEARANCE: f32 = 12.0;

/// Interpolation speed toward the hold target (1/s).
pub const HOLD_INTERP_SPEED: f32 = 20.0;

const_assert!(MIN_HOLD_DISTANCE > 0.0);
const_assert!(MIN_HOLD_DISTANCE < MAX_HOLD_DISTANCE);
const_assert!(WALL_CLEARANCE > GRAB_SWEEP_RADIUS);

/// Current grab state. The holder exists exactly while held.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GrabState {
    #[default]
    Idle,
    Held {
        holder: HolderId,
        /// Actor owning the holder at grab time, for collision restore.
        holder_actor: Option<ActorId>,
        /// Whether that actor keeps a move-ignore list we added to.
        holder_is_mover: bool,
        hold_distance: f32,
    },
}

/// Clamp a grab-time separation into the carry range.
pub fn clamp_hold_distance(distance: f32) -> f32 {
    distance.clamp(MIN_HOLD_DISTANCE, MAX_HOLD_DISTANCE)
}

/// Pull a hold target back in front of a blocking hit.
pub fn clamp_target_to_hit(target: Vec3, hit: Option<SweepHit>) -> Vec3 {
    match hit {
        Some(hit) => hit.location + hit.normal * WALL_CLEARANCE,
        None => target,
    }
}

/// Owns the grab state machine.
#[derive(Debug, Clone, Default)]
pub struct GrabController {
    state: GrabState,
}

impl GrabController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GrabState {
        self.state
    }

    pub fn is_grabbed(&self) -> bool {
        matches!(self.state, GrabState::Held { .. })
    }

    pub fn holder(&self) -> Option<HolderId> {
        match self.state {
            GrabState::Held { holder, .. } => Some(holder),
            GrabState::Idle => None,
        }
    }

    pub fn hold_distance(&self) -> Option<f32> {
        match self.state {
            GrabState::Held { hold_distance, .. } => Some(hold_distance),
            GrabState::Idle => None,
        }
    }

    /// Take hold of the prop.
    ///
    /// Returns `false` if the holder cannot be resolved. Grabbing while
    /// already held re-targets to the new holder, undoing the previous
    /// holder's collision suppression first.
    pub fn grab(
        &mut self,
        holder: HolderId,
        body: &mut dyn PhysicsBody,
        owner: &dyn PropOwner,
        world: &mut dyn PropWorld,
    ) -> bool {
        let Some(pose) = world.holder(holder) else {
            tracing::trace!(?holder, "grab ignored, holder not found");
            return false;
        };

        if self.is_grabbed() {
            self.restore_holder_collision(body, owner, world);
        }

        body.set_simulate_physics(false);

        let prop_actor = owner.actor_id();
        if let Some(holder_owner) = pose.owner {
            body.ignore_actor_when_moving(holder_owner.actor, true);
            if holder_owner.is_mover {
                world.set_move_ignore_actor(holder_owner.actor, prop_actor, true);
            }
        }

        let hold_distance = clamp_hold_distance(pose.location.distance(body.location()));

        self.state = GrabState::Held {
            holder,
            holder_actor: pose.owner.map(|o| o.actor),
            holder_is_mover: pose.owner.is_some_and(|o| o.is_mover),
            hold_distance,
        };

        tracing::debug!(?holder, hold_distance, "prop grabbed");
        true
    }

    /// Release the prop, handing it the holder's current velocity.
    ///
    /// Returns `false` if nothing was held.
    pub fn drop(
        &mut self,
        body: &mut dyn PhysicsBody,
        owner: &dyn PropOwner,
        world: &mut dyn PropWorld,
    ) -> bool {
        let GrabState::Held { holder, .. } = self.state else {
            return false;
        };

        body.set_simulate_physics(true);

        // Inertia hand-off: a running holder throws the prop passively
        if let Some(holder_owner) = world.holder(holder).and_then(|pose| pose.owner) {
            body.set_linear_velocity(holder_owner.velocity);
        }

        self.restore_holder_collision(body, owner, world);
        body.wake();

        self.state = GrabState::Idle;
        tracing::debug!(?holder, "prop dropped");
        true
    }

    /// Release the prop and launch it with a velocity change of `force`
    /// along `direction`.
    ///
    /// Returns `false` if nothing was held.
    pub fn throw(
        &mut self,
        direction: Vec3,
        force: f32,
        body: &mut dyn PhysicsBody,
        owner: &dyn PropOwner,
        world: &mut dyn PropWorld,
    ) -> bool {
        if !self.drop(body, owner, world) {
            return false;
        }

        body.add_impulse(direction.normalize_or_zero() * force, ImpulseMode::VelocityChange);
        tracing::debug!(?direction, force, "prop thrown");
        true
    }

    /// Where the prop wants to be this tick, before smoothing.
    pub fn hold_target(
        &self,
        pose: &HolderPose,
        prop_actor: ActorId,
        world: &dyn PropWorld,
    ) -> Option<(Vec3, Quat)> {
        let GrabState::Held {
            holder_actor,
            hold_distance,
            ..
        } = self.state
        else {
            return None;
        };

        let target = pose.location + pose.forward() * hold_distance;

        let mut ignored = vec![prop_actor];
        ignored.extend(pose.owner.map(|o| o.actor).or(holder_actor));

        let hit = world.sweep_sphere(pose.location, target, GRAB_SWEEP_RADIUS, &ignored);
        Some((clamp_target_to_hit(target, hit), pose.rotation))
    }

    /// Ease the held prop toward its hold target.
    ///
    /// Returns `false` when not held or when the holder no longer resolves.
    pub fn update_grabbed_position(
        &self,
        owner: &mut dyn PropOwner,
        world: &dyn PropWorld,
    ) -> bool {
        let Some(holder) = self.holder() else {
            return false;
        };
        let Some(pose) = world.holder(holder) else {
            tracing::trace!(?holder, "holder vanished while grabbed");
            return false;
        };
        let Some((target_location, target_rotation)) =
            self.hold_target(&pose, owner.actor_id(), world)
        else {
            return false;
        };

        let dt = world.delta_seconds();
        let location = vinterp_to(owner.location(), target_location, dt, HOLD_INTERP_SPEED);
        let rotation = qinterp_to(owner.rotation(), target_rotation, dt, HOLD_INTERP_SPEED);

        owner.set_location_and_rotation(location, rotation, true);
        true
    }

    fn restore_holder_collision(
        &self,
        body: &mut dyn PhysicsBody,
        owner: &dyn PropOwner,
        world: &mut dyn PropWorld,
    ) {
        let GrabState::Held {
            holder_actor: Some(actor),
            holder_is_mover,
            ..
        } = self.state
        else {
            return;
        };

        body.ignore_actor_when_moving(actor, false);
        if holder_is_mover {
            world.set_move_ignore_actor(actor, owner.actor_id(), false);
        }
    }
}

//! Host capability contract
//!
//! The controller does not simulate, render, schedule, or play anything
//! itself. It drives a physics body, the actor that owns it, and the world
//! they live in through the traits below, and refers to everything it does
//! not own (holders, other actors, materials, sounds, timers) by plain
//! handles that the host resolves.
//!
//! Events flow the other way: the controller declares which notifications
//! it wants ([`BodyEvents`], [`DamageEvents`]) and the host dispatches them
//! synchronously to the controller's `handle_*` methods.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::audio::{CollisionHit, ImpactCue};
use crate::physics::collision::SweepHit;
use crate::physics::types::forward_vector;

// ============================================================================
// HANDLES
// ============================================================================

/// Actor (scene entity) identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

/// Physics body identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Positioning anchor (e.g. a hand socket in front of the camera).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HolderId(pub u32);

/// Sub-part of a body (bone / shape index) that received a point hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub u32);

/// Surface material identity reported by collision hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u32);

/// Sound asset reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(pub u32);

/// Repeating timer registration returned by [`PropWorld::set_timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Cancellation flag shared between a timer's registrant and the host.
///
/// The host must discard a timer whose token is cancelled without firing
/// it again, even if [`PropWorld::clear_timer`] was never called.
#[derive(Debug, Clone, Default)]
pub struct TimerToken(Rc<Cell<bool>>);

impl TimerToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

// ============================================================================
// BODY
// ============================================================================

/// How an impulse is interpreted by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseMode {
    /// Applied directly as a change in velocity, ignoring mass.
    VelocityChange,
    /// Applied as a change in momentum (divided by mass).
    Momentum,
}

/// Attenuation of a radial impulse with distance from its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialFalloff {
    /// Full strength everywhere inside the radius.
    Constant,
    /// Strength falls linearly to zero at the radius.
    Linear,
}

/// Solver sleep sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepFamily {
    #[default]
    Normal,
    /// Lower sleep threshold: bodies come to rest sooner.
    Sensitive,
}

/// Which body notifications the controller wants dispatched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BodyEvents {
    pub sleep: bool,
    pub wake: bool,
    pub hit: bool,
}

impl BodyEvents {
    pub const NONE: Self = Self {
        sleep: false,
        wake: false,
        hit: false,
    };
    pub const ALL: Self = Self {
        sleep: true,
        wake: true,
        hit: true,
    };
}

/// A body notification, dispatched by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyEvent {
    Sleep,
    Wake,
    Hit(CollisionHit),
}

/// Rigid body driven by the host's solver.
pub trait PhysicsBody {
    fn id(&self) -> BodyId;

    fn set_simulate_physics(&mut self, simulate: bool);
    fn is_simulating_physics(&self) -> bool;

    fn set_notify_rigid_body_collision(&mut self, notify: bool);
    fn set_generate_overlap_events(&mut self, generate: bool);

    fn set_use_ccd(&mut self, enabled: bool);
    fn uses_ccd(&self) -> bool;

    fn set_linear_damping(&mut self, damping: f32);
    fn set_angular_damping(&mut self, damping: f32);
    fn set_sleep_family(&mut self, family: SleepFamily);

    fn is_awake(&self) -> bool;
    /// Force the body to rest immediately.
    fn put_to_sleep(&mut self);
    /// Force the body awake.
    fn wake(&mut self);

    fn mass(&self) -> f32;
    fn location(&self) -> Vec3;
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);

    /// Impulse through the center of mass.
    fn add_impulse(&mut self, impulse: Vec3, mode: ImpulseMode);
    /// Momentum impulse at a world location (produces torque off-center).
    fn add_impulse_at_location(&mut self, impulse: Vec3, location: Vec3, part: Option<PartId>);
    fn add_radial_impulse(
        &mut self,
        origin: Vec3,
        radius: f32,
        strength: f32,
        falloff: RadialFalloff,
        mode: ImpulseMode,
    );

    /// Seconds between body ticks. `0.0` means every frame.
    fn set_tick_interval(&mut self, seconds: f32);
    fn tick_interval(&self) -> f32;

    /// Suppress (or restore) collision response against `actor` while moving.
    fn ignore_actor_when_moving(&mut self, actor: ActorId, ignore: bool);

    /// Replace the set of notifications dispatched for this body.
    fn set_event_subscriptions(&mut self, events: BodyEvents);
}

// ============================================================================
// OWNER
// ============================================================================

/// Which damage shapes the controller wants dispatched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageEvents {
    pub any: bool,
    pub point: bool,
    pub radial: bool,
}

impl DamageEvents {
    pub const NONE: Self = Self {
        any: false,
        point: false,
        radial: false,
    };
    pub const ALL: Self = Self {
        any: true,
        point: true,
        radial: true,
    };
}

/// The scene actor that owns the prop's body.
pub trait PropOwner {
    fn actor_id(&self) -> ActorId;

    fn location(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    /// Move the actor. With `sweep` the move stops at (and slides along)
    /// blocking geometry instead of teleporting through it.
    fn set_location_and_rotation(&mut self, location: Vec3, rotation: Quat, sweep: bool);
    fn velocity(&self) -> Vec3;

    fn set_actor_tick_enabled(&mut self, enabled: bool);
    fn destroy(&mut self);

    fn has_authority(&self) -> bool;
    fn set_replicate_movement(&mut self, replicate: bool);

    fn set_damage_subscriptions(&mut self, events: DamageEvents);
}

// ============================================================================
// WORLD
// ============================================================================

/// The active observer (first local player's camera).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub location: Vec3,
    pub rotation: Quat,
}

/// Actor that owns a holder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolderOwner {
    pub actor: ActorId,
    pub velocity: Vec3,
    /// Dynamic movers (pawns) keep their own move-ignore list.
    pub is_mover: bool,
}

/// Snapshot of a holder's transform, resolved fresh each time it is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolderPose {
    pub location: Vec3,
    pub rotation: Quat,
    pub owner: Option<HolderOwner>,
}

impl HolderPose {
    pub fn forward(&self) -> Vec3 {
        forward_vector(self.rotation)
    }
}

/// Scene-wide services.
pub trait PropWorld {
    /// Elapsed simulation time in seconds.
    fn time_seconds(&self) -> f32;
    /// Duration of the current frame in seconds.
    fn delta_seconds(&self) -> f32;

    fn viewpoint(&self) -> Option<Viewpoint>;
    fn holder(&self, holder: HolderId) -> Option<HolderPose>;

    /// First blocking hit of a sphere swept from `start` to `end`,
    /// skipping geometry owned by any actor in `ignored`.
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f32, ignored: &[ActorId])
    -> Option<SweepHit>;

    /// Make `mover` ignore (or stop ignoring) `ignored` when it moves.
    fn set_move_ignore_actor(&mut self, mover: ActorId, ignored: ActorId, ignore: bool);

    /// Register a timer. It stops firing once cleared or once `token` is
    /// cancelled.
    fn set_timer(&mut self, period: f32, looping: bool, token: TimerToken) -> TimerHandle;
    fn clear_timer(&mut self, handle: TimerHandle);

    fn play_sound_at(&mut self, cue: &ImpactCue);
}

//! Sandbox rigid body.
//!
//! A point mass with gravity, damping, a ground plane and a crude sleep
//! rule. Every call the controller makes is recorded in [`BodyCallLog`].

use std::collections::HashSet;

use glam::Vec3;

use crate::audio::CollisionHit;
use crate::host::{
    ActorId, BodyEvent, BodyEvents, BodyId, ImpulseMode, PartId, PhysicsBody, RadialFalloff,
    SleepFamily,
};
use crate::physics::impulse::ImpulseCommand;
use crate::physics::types::WORLD_UP;

/// Gravity in cm/s².
pub const SANDBOX_GRAVITY: f32 = -980.0;

/// Fraction of normal speed kept after a ground bounce.
const GROUND_RESTITUTION: f32 = 0.3;

/// Below this speed a grounded body falls asleep.
const SLEEP_SPEED: f32 = 5.0;

/// Every external call made on a [`SandboxBody`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyCallLog {
    pub set_simulate: Vec<bool>,
    pub set_ccd: Vec<bool>,
    pub put_to_sleep: u32,
    pub wake: u32,
    pub set_tick_interval: Vec<f32>,
    pub set_linear_velocity: Vec<Vec3>,
    pub ignore_actor: Vec<(ActorId, bool)>,
    pub impulses: Vec<ImpulseCommand>,
}

#[derive(Debug, Clone)]
pub struct SandboxBody {
    id: BodyId,
    pub simulating: bool,
    pub awake: bool,
    pub notify_collisions: bool,
    pub generate_overlaps: bool,
    pub ccd: bool,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub sleep_family: SleepFamily,
    pub mass: f32,
    pub location: Vec3,
    pub velocity: Vec3,
    pub tick_interval: f32,
    /// Height of the ground plane, if any.
    pub ground: Option<f32>,
    pub ignored_actors: HashSet<ActorId>,
    pub subscriptions: BodyEvents,
    pub calls: BodyCallLog,
    pending_events: Vec<BodyEvent>,
}

impl SandboxBody {
    pub fn new(id: BodyId, location: Vec3, mass: f32) -> Self {
        Self {
            id,
            simulating: false,
            awake: true,
            notify_collisions: false,
            generate_overlaps: true,
            ccd: false,
            linear_damping: 0.01,
            angular_damping: 0.0,
            sleep_family: SleepFamily::Normal,
            mass,
            location,
            velocity: Vec3::ZERO,
            tick_interval: 0.0,
            ground: None,
            ignored_actors: HashSet::new(),
            subscriptions: BodyEvents::NONE,
            calls: BodyCallLog::default(),
            pending_events: Vec::new(),
        }
    }

    pub fn with_ground(mut self, height: f32) -> Self {
        self.ground = Some(height);
        self
    }

    /// Take the notifications queued since the last call.
    pub fn drain_events(&mut self) -> Vec<BodyEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn emit(&mut self, event: BodyEvent) {
        let wanted = match event {
            BodyEvent::Sleep => self.subscriptions.sleep,
            BodyEvent::Wake => self.subscriptions.wake,
            BodyEvent::Hit(_) => self.subscriptions.hit && self.notify_collisions,
        };
        if wanted {
            self.pending_events.push(event);
        }
    }

    fn velocity_delta(&self, impulse: Vec3, mode: ImpulseMode) -> Vec3 {
        match mode {
            ImpulseMode::VelocityChange => impulse,
            ImpulseMode::Momentum if self.mass > 0.0 => impulse / self.mass,
            ImpulseMode::Momentum => Vec3::ZERO,
        }
    }

    /// Integrate one step. Does nothing unless simulating and awake.
    pub fn step(&mut self, dt: f32) {
        if !self.simulating || !self.awake {
            return;
        }

        self.velocity += WORLD_UP * SANDBOX_GRAVITY * dt;
        self.velocity /= 1.0 + dt * self.linear_damping;
        self.location += self.velocity * dt;

        let Some(ground) = self.ground else {
            return;
        };

        let height = self.location.dot(WORLD_UP);
        let normal_speed = self.velocity.dot(WORLD_UP);
        if height <= ground && normal_speed < 0.0 {
            let impulse = WORLD_UP * (-normal_speed * self.mass * (1.0 + GROUND_RESTITUTION));
            self.location += WORLD_UP * (ground - height);
            self.velocity -= WORLD_UP * normal_speed * (1.0 + GROUND_RESTITUTION);

            self.emit(BodyEvent::Hit(CollisionHit {
                normal_impulse: impulse,
                impact_point: self.location,
                material: None,
                other_actor: None,
            }));
        }

        let grounded = self.location.dot(WORLD_UP) <= ground + 1.0;
        if grounded && self.velocity.length() < SLEEP_SPEED {
            self.velocity = Vec3::ZERO;
            self.awake = false;
            self.emit(BodyEvent::Sleep);
        }
    }
}

impl PhysicsBody for SandboxBody {
    fn id(&self) -> BodyId {
        self.id
    }

    fn set_simulate_physics(&mut self, simulate: bool) {
        self.calls.set_simulate.push(simulate);
        self.simulating = simulate;
    }

    fn is_simulating_physics(&self) -> bool {
        self.simulating
    }

    fn set_notify_rigid_body_collision(&mut self, notify: bool) {
        self.notify_collisions = notify;
    }

    fn set_generate_overlap_events(&mut self, generate: bool) {
        self.generate_overlaps = generate;
    }

    fn set_use_ccd(&mut self, enabled: bool) {
        self.calls.set_ccd.push(enabled);
        self.ccd = enabled;
    }

    fn uses_ccd(&self) -> bool {
        self.ccd
    }

    fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping;
    }

    fn set_angular_damping(&mut self, damping: f32) {
        self.angular_damping = damping;
    }

    fn set_sleep_family(&mut self, family: SleepFamily) {
        self.sleep_family = family;
    }

    fn is_awake(&self) -> bool {
        self.awake
    }

    fn put_to_sleep(&mut self) {
        self.calls.put_to_sleep += 1;
        if self.awake {
            self.awake = false;
            self.velocity = Vec3::ZERO;
            self.emit(BodyEvent::Sleep);
        }
    }

    fn wake(&mut self) {
        self.calls.wake += 1;
        if !self.awake {
            self.awake = true;
            self.emit(BodyEvent::Wake);
        }
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn location(&self) -> Vec3 {
        self.location
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.calls.set_linear_velocity.push(velocity);
        self.velocity = velocity;
    }

    fn add_impulse(&mut self, impulse: Vec3, mode: ImpulseMode) {
        self.calls.impulses.push(ImpulseCommand::Linear { impulse, mode });
        self.velocity += self.velocity_delta(impulse, mode);
    }

    fn add_impulse_at_location(&mut self, impulse: Vec3, location: Vec3, part: Option<PartId>) {
        self.calls.impulses.push(ImpulseCommand::AtLocation {
            impulse,
            location,
            part,
        });
        self.velocity += self.velocity_delta(impulse, ImpulseMode::Momentum);
    }

    fn add_radial_impulse(
        &mut self,
        origin: Vec3,
        radius: f32,
        strength: f32,
        falloff: RadialFalloff,
        mode: ImpulseMode,
    ) {
        self.calls.impulses.push(ImpulseCommand::Radial {
            origin,
            radius,
            strength,
            falloff,
            mode,
        });

        let offset = self.location - origin;
        let distance = offset.length();
        if distance > radius {
            return;
        }
        let scale = match falloff {
            RadialFalloff::Constant => 1.0,
            RadialFalloff::Linear => 1.0 - distance / radius,
        };
        let dir = offset.try_normalize().unwrap_or(WORLD_UP);
        self.velocity += self.velocity_delta(dir * strength * scale, mode);
    }

    fn set_tick_interval(&mut self, seconds: f32) {
        self.calls.set_tick_interval.push(seconds);
        self.tick_interval = seconds;
    }

    fn tick_interval(&self) -> f32 {
        self.tick_interval
    }

    fn ignore_actor_when_moving(&mut self, actor: ActorId, ignore: bool) {
        self.calls.ignore_actor.push((actor, ignore));
        if ignore {
            self.ignored_actors.insert(actor);
        } else {
            self.ignored_actors.remove(&actor);
        }
    }

    fn set_event_subscriptions(&mut self, events: BodyEvents) {
        self.subscriptions = events;
    }
}

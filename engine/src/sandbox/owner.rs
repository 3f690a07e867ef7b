//! Sandbox actor that owns the prop body.

use glam::{Quat, Vec3};

use crate::host::{ActorId, DamageEvents, PropOwner};

/// One `set_location_and_rotation` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerMove {
    pub location: Vec3,
    pub rotation: Quat,
    pub sweep: bool,
}

#[derive(Debug, Clone)]
pub struct SandboxOwner {
    id: ActorId,
    pub location: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub tick_enabled: bool,
    pub destroyed: bool,
    pub authority: bool,
    pub replicate_movement: bool,
    pub damage_subscriptions: DamageEvents,
    pub moves: Vec<OwnerMove>,
    pub tick_toggles: Vec<bool>,
    pub replicate_toggles: Vec<bool>,
}

impl SandboxOwner {
    pub fn new(id: ActorId, location: Vec3) -> Self {
        Self {
            id,
            location,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            tick_enabled: true,
            destroyed: false,
            authority: true,
            replicate_movement: true,
            damage_subscriptions: DamageEvents::NONE,
            moves: Vec::new(),
            tick_toggles: Vec::new(),
            replicate_toggles: Vec::new(),
        }
    }

    /// Run as a remote proxy.
    pub fn without_authority(mut self) -> Self {
        self.authority = false;
        self
    }
}

impl PropOwner for SandboxOwner {
    fn actor_id(&self) -> ActorId {
        self.id
    }

    fn location(&self) -> Vec3 {
        self.location
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_location_and_rotation(&mut self, location: Vec3, rotation: Quat, sweep: bool) {
        self.moves.push(OwnerMove {
            location,
            rotation,
            sweep,
        });
        self.location = location;
        self.rotation = rotation;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_actor_tick_enabled(&mut self, enabled: bool) {
        self.tick_toggles.push(enabled);
        self.tick_enabled = enabled;
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn has_authority(&self) -> bool {
        self.authority
    }

    fn set_replicate_movement(&mut self, replicate: bool) {
        self.replicate_toggles.push(replicate);
        self.replicate_movement = replicate;
    }

    fn set_damage_subscriptions(&mut self, events: DamageEvents) {
        self.damage_subscriptions = events;
    }
}

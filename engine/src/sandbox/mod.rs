//! In-memory host
//!
//! A minimal implementation of the host contract: a point-mass body over a
//! ground plane, an owner actor, and a world with box obstacles, timers and
//! a sound log. Every call the controller makes is recorded so behaviour
//! can be asserted on, and [`SandboxScene::step`] drives a controller
//! through frames the way an engine would.

pub mod body;
pub mod owner;
pub mod world;

pub use body::{BodyCallLog, SANDBOX_GRAVITY, SandboxBody};
pub use owner::{OwnerMove, SandboxOwner};
pub use world::{Obstacle, SandboxTimer, SandboxWorld};

use glam::Vec3;

use crate::host::{ActorId, BodyId, PhysicsBody};
use crate::prop::{PropContext, PropController};

/// Body, owner and world of one prop.
#[derive(Debug, Clone)]
pub struct SandboxScene {
    pub body: SandboxBody,
    pub owner: SandboxOwner,
    pub world: SandboxWorld,
    /// Whether the host still has a body to hand out.
    pub has_body: bool,
}

impl SandboxScene {
    pub fn new(location: Vec3, mass: f32) -> Self {
        Self {
            body: SandboxBody::new(BodyId(1), location, mass).with_ground(0.0),
            owner: SandboxOwner::new(ActorId(1), location),
            world: SandboxWorld::new(),
            has_body: true,
        }
    }

    /// Borrow the scene as a controller context.
    pub fn ctx(&mut self) -> PropContext<'_> {
        let body = if self.has_body {
            Some(&mut self.body as &mut dyn PhysicsBody)
        } else {
            None
        };
        PropContext::new(body, &mut self.owner, &mut self.world)
    }

    /// Run one frame of `dt` seconds: timers, controller tick, physics,
    /// then body notifications. Owner and body are kept in sync the way a
    /// root-component body would be.
    pub fn step(&mut self, prop: &mut PropController, dt: f32) {
        if self.owner.destroyed {
            return;
        }

        for handle in self.world.advance(dt) {
            prop.on_timer(handle, &mut self.ctx());
        }
        if self.owner.destroyed {
            return;
        }

        if prop.wants_tick() {
            prop.tick(&mut self.ctx());
        }

        if self.body.simulating {
            self.body.step(dt);
            self.owner.location = self.body.location;
            self.owner.velocity = self.body.velocity;
        } else {
            self.body.location = self.owner.location;
        }

        self.dispatch_events(prop);
    }

    /// Deliver queued body notifications to the controller.
    pub fn dispatch_events(&mut self, prop: &mut PropController) {
        for event in self.body.drain_events() {
            prop.handle_body_event(event, &mut self.ctx());
        }
    }
}

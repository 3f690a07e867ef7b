//! Physics Prop Library
//!
//! Gameplay logic for interactive physics props: objects that can be
//! grabbed, carried, dropped and thrown, that trade simulation fidelity for
//! cost depending on how far they are from the viewer, and that play
//! impact sounds and react to damage with impulses.
//!
//! The library owns no physics solver, scene or audio device. It drives
//! whatever host embeds it through the traits in [`host`].
//!
//! # Modules
//!
//! - [`prop`] - Composition root routing lifecycle calls and events
//! - [`systems`] - Grab state machine, CCD gate, proximity scheduler
//! - [`audio`] - Impact sound table and trigger
//! - [`physics`] - Damage to impulse translation, sweep math, interpolation
//! - [`config`] - Per-instance tuning loaded from JSON
//! - [`host`] - Capability traits and handles the host implements
//! - [`sandbox`] - In-memory recording host for tests and demos
//!
//! # Example
//!
//! ```ignore
//! use physics_prop_engine::config::PropConfig;
//! use physics_prop_engine::prop::PropController;
//! use physics_prop_engine::sandbox::SandboxScene;
//! use glam::Vec3;
//!
//! let mut scene = SandboxScene::new(Vec3::new(0.0, 100.0, 0.0), 10.0);
//! let mut prop = PropController::new(PropConfig::default(), None);
//!
//! prop.physicalize(&mut scene.ctx());
//! for _ in 0..60 {
//!     scene.step(&mut prop, 1.0 / 60.0);
//! }
//! prop.end_play(&mut scene.ctx());
//! ```

pub mod audio;
pub mod config;
pub mod host;
pub mod physics;
pub mod prop;
pub mod sandbox;
pub mod systems;

// Re-export the types most hosts touch
pub use audio::{CollisionHit, ImpactCue, ImpactSoundEntry, ImpactTable};
pub use config::{ConfigError, PropConfig};
pub use host::{PhysicsBody, PropOwner, PropWorld};
pub use physics::{DamageEvent, DamageTypeModifier};
pub use prop::{PropContext, PropController};

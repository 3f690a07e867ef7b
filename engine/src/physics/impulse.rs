//! Damage to impulse translation
//!
//! Converts the three damage notification shapes (any / point / radial)
//! into a single impulse command plus a wake decision. Translation is pure;
//! [`apply_damage`] is the only function here that touches a body.
//!
//! Numbers are deliberately arcade-style: magnitude is `amount * multiplier`
//! with no distance or mass normalization, and any/radial impulses are
//! velocity changes so light and heavy props react the same way.

use glam::Vec3;
use static_assertions::const_assert;

use crate::host::{ImpulseMode, PartId, PhysicsBody, RadialFalloff};
use crate::physics::types::WORLD_UP;

/// Base multiplier for any/point damage.
pub const DIRECT_DAMAGE_MULTIPLIER: f32 = 500.0;

/// Radial (explosion) damage pushes this many times harder than direct damage.
pub const RADIAL_POWER_SCALE: f32 = 4.0;

/// Base multiplier for radial damage.
pub const RADIAL_DAMAGE_MULTIPLIER: f32 = DIRECT_DAMAGE_MULTIPLIER * RADIAL_POWER_SCALE;

/// Falloff radius of radial damage impulses.
pub const RADIAL_IMPULSE_RADIUS: f32 = 500.0;

const_assert!(RADIAL_DAMAGE_MULTIPLIER > DIRECT_DAMAGE_MULTIPLIER);

/// Per-damage-type impulse behaviour, attached to a damage event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DamageTypeModifier {
    /// Stock multiplier, always wakes.
    #[default]
    None,
    /// Impulse decoupled from damage: `power` replaces the base multiplier
    /// (scaled by [`RADIAL_POWER_SCALE`] for radial damage).
    ExplicitImpulse { power: f32, force_wake: bool },
    /// Scales the stock multiplier, always wakes.
    ScaledImpulse { multiplier: f32 },
}

/// Shape of a damage notification, for modifier resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageShape {
    Any,
    Point,
    Radial,
}

impl DamageShape {
    pub fn base_multiplier(self) -> f32 {
        match self {
            DamageShape::Any | DamageShape::Point => DIRECT_DAMAGE_MULTIPLIER,
            DamageShape::Radial => RADIAL_DAMAGE_MULTIPLIER,
        }
    }
}

impl DamageTypeModifier {
    /// Resolve to `(multiplier, wake)` for a damage shape.
    pub fn resolve(self, shape: DamageShape) -> (f32, bool) {
        let base = shape.base_multiplier();
        match self {
            DamageTypeModifier::None => (base, true),
            DamageTypeModifier::ExplicitImpulse { power, force_wake } => {
                let multiplier = match shape {
                    DamageShape::Radial => power * RADIAL_POWER_SCALE,
                    DamageShape::Any | DamageShape::Point => power,
                };
                (multiplier, force_wake)
            }
            DamageTypeModifier::ScaledImpulse { multiplier } => (base * multiplier, true),
        }
    }
}

/// A damage notification received by the prop's owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageEvent {
    /// Generic damage with no hit information.
    Any {
        amount: f32,
        /// Aim direction of the instigating controller, if there is one.
        instigator_aim: Option<Vec3>,
        /// World location of the damage causer, if there is one.
        causer_location: Option<Vec3>,
        modifier: DamageTypeModifier,
    },
    /// Traced hit (bullet, melee swing).
    Point {
        amount: f32,
        shot_direction: Vec3,
        hit_location: Vec3,
        hit_part: Option<PartId>,
        modifier: DamageTypeModifier,
    },
    /// Explosion.
    Radial {
        amount: f32,
        origin: Vec3,
        modifier: DamageTypeModifier,
    },
}

impl DamageEvent {
    pub fn shape(&self) -> DamageShape {
        match self {
            DamageEvent::Any { .. } => DamageShape::Any,
            DamageEvent::Point { .. } => DamageShape::Point,
            DamageEvent::Radial { .. } => DamageShape::Radial,
        }
    }

    pub fn amount(&self) -> f32 {
        match *self {
            DamageEvent::Any { amount, .. }
            | DamageEvent::Point { amount, .. }
            | DamageEvent::Radial { amount, .. } => amount,
        }
    }

    pub fn modifier(&self) -> DamageTypeModifier {
        match *self {
            DamageEvent::Any { modifier, .. }
            | DamageEvent::Point { modifier, .. }
            | DamageEvent::Radial { modifier, .. } => modifier,
        }
    }
}

/// The body call an impulse translates to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpulseCommand {
    /// Through the center of mass.
    Linear { impulse: Vec3, mode: ImpulseMode },
    /// At a world location.
    AtLocation {
        impulse: Vec3,
        location: Vec3,
        part: Option<PartId>,
    },
    /// Outward from an origin.
    Radial {
        origin: Vec3,
        radius: f32,
        strength: f32,
        falloff: RadialFalloff,
        mode: ImpulseMode,
    },
}

impl ImpulseCommand {
    /// Peak impulse magnitude of the command.
    pub fn magnitude(&self) -> f32 {
        match *self {
            ImpulseCommand::Linear { impulse, .. } | ImpulseCommand::AtLocation { impulse, .. } => {
                impulse.length()
            }
            ImpulseCommand::Radial { strength, .. } => strength,
        }
    }

    /// Issue the command against a body.
    pub fn apply(&self, body: &mut dyn PhysicsBody) {
        match *self {
            ImpulseCommand::Linear { impulse, mode } => body.add_impulse(impulse, mode),
            ImpulseCommand::AtLocation {
                impulse,
                location,
                part,
            } => body.add_impulse_at_location(impulse, location, part),
            ImpulseCommand::Radial {
                origin,
                radius,
                strength,
                falloff,
                mode,
            } => body.add_radial_impulse(origin, radius, strength, falloff, mode),
        }
    }
}

/// Result of translating a damage event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseResponse {
    /// Force-wake the body before applying the impulse.
    pub wake: bool,
    pub command: ImpulseCommand,
}

/// Unit direction for generic damage: instigator aim, then causer to body,
/// then straight up. A zero-length candidate falls through to the next.
fn any_damage_direction(
    instigator_aim: Option<Vec3>,
    causer_location: Option<Vec3>,
    body_location: Vec3,
) -> Vec3 {
    instigator_aim
        .and_then(Vec3::try_normalize)
        .or_else(|| causer_location.and_then(|causer| (body_location - causer).try_normalize()))
        .unwrap_or(WORLD_UP)
}

/// Translate a damage event hitting a body at `body_location`.
pub fn translate_damage(event: &DamageEvent, body_location: Vec3) -> ImpulseResponse {
    let (multiplier, wake) = event.modifier().resolve(event.shape());
    let magnitude = event.amount() * multiplier;

    let command = match *event {
        DamageEvent::Any {
            instigator_aim,
            causer_location,
            ..
        } => ImpulseCommand::Linear {
            impulse: any_damage_direction(instigator_aim, causer_location, body_location)
                * magnitude,
            mode: ImpulseMode::VelocityChange,
        },
        DamageEvent::Point {
            shot_direction,
            hit_location,
            hit_part,
            ..
        } => ImpulseCommand::AtLocation {
            impulse: shot_direction * magnitude,
            location: hit_location,
            part: hit_part,
        },
        DamageEvent::Radial { origin, .. } => ImpulseCommand::Radial {
            origin,
            radius: RADIAL_IMPULSE_RADIUS,
            strength: magnitude,
            falloff: RadialFalloff::Linear,
            mode: ImpulseMode::VelocityChange,
        },
    };

    ImpulseResponse { wake, command }
}

/// Apply a damage event to a body.
///
/// Returns `false` (and does nothing) if the body is not simulating.
pub fn apply_damage(body: &mut dyn PhysicsBody, event: &DamageEvent) -> bool {
    if !body.is_simulating_physics() {
        return false;
    }

    let response = translate_damage(event, body.location());
    if response.wake {
        body.wake();
    }
    response.command.apply(body);

    tracing::trace!(
        shape = ?event.shape(),
        magnitude = response.command.magnitude(),
        wake = response.wake,
        "damage impulse applied"
    );
    true
}

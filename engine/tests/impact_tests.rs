//! Impact Tests - Damage Impulses and Impact Audio
//!
//! Damage notifications routed through the controller onto the body, and
//! collision hits turned into sound cues.

use std::sync::Arc;

use glam::Vec3;
use physics_prop_engine::audio::impact_trigger::{MAX_IMPACT_PITCH, MIN_IMPACT_PITCH};
use physics_prop_engine::audio::{CollisionHit, ImpactSoundEntry, ImpactTable};
use physics_prop_engine::config::PropConfig;
use physics_prop_engine::host::{
    BodyEvent, ImpulseMode, MaterialId, PartId, PhysicsBody, RadialFalloff, SoundId,
};
use physics_prop_engine::physics::{DamageEvent, DamageTypeModifier, ImpulseCommand};
use physics_prop_engine::prop::PropController;
use physics_prop_engine::sandbox::SandboxScene;

fn config() -> PropConfig {
    PropConfig {
        rng_seed: Some(3),
        ..PropConfig::default()
    }
}

fn table() -> Arc<ImpactTable> {
    Arc::new(
        ImpactTable::new(ImpactSoundEntry::new(SoundId(1), 1.0))
            .with_entry(MaterialId(4), ImpactSoundEntry::new(SoundId(4), 0.5)),
    )
}

fn physicalized(table: Option<Arc<ImpactTable>>) -> (SandboxScene, PropController) {
    let mut scene = SandboxScene::new(Vec3::new(0.0, 100.0, 0.0), 10.0);
    let mut prop = PropController::new(config(), table);
    assert!(prop.physicalize(&mut scene.ctx()));
    (scene, prop)
}

fn hit(impulse: f32, material: Option<MaterialId>) -> BodyEvent {
    BodyEvent::Hit(CollisionHit {
        normal_impulse: Vec3::new(0.0, impulse, 0.0),
        impact_point: Vec3::new(5.0, 0.0, 5.0),
        material,
        other_actor: None,
    })
}

// ============================================================================
// Damage
// ============================================================================

#[test]
fn test_point_damage_explicit_impulse_leaves_sleeping_body_asleep() {
    let (mut scene, mut prop) = physicalized(None);
    scene.body.put_to_sleep();
    scene.dispatch_events(&mut prop);
    let wakes_before = scene.body.calls.wake;

    let event = DamageEvent::Point {
        amount: 10.0,
        shot_direction: Vec3::NEG_Z,
        hit_location: Vec3::new(1.0, 110.0, 2.0),
        hit_part: Some(PartId(3)),
        modifier: DamageTypeModifier::ExplicitImpulse {
            power: 100.0,
            force_wake: false,
        },
    };
    assert!(prop.handle_damage(&event, &mut scene.ctx()));

    assert_eq!(scene.body.calls.wake, wakes_before);
    assert!(!scene.body.awake);
    assert_eq!(
        scene.body.calls.impulses,
        vec![ImpulseCommand::AtLocation {
            impulse: Vec3::new(0.0, 0.0, -1000.0),
            location: Vec3::new(1.0, 110.0, 2.0),
            part: Some(PartId(3)),
        }]
    );

    prop.end_play(&mut scene.ctx());
}

#[test]
fn test_radial_damage_defaults() {
    let (mut scene, mut prop) = physicalized(None);
    let origin = Vec3::new(0.0, 0.0, 100.0);

    let event = DamageEvent::Radial {
        amount: 5.0,
        origin,
        modifier: DamageTypeModifier::None,
    };
    assert!(prop.handle_damage(&event, &mut scene.ctx()));

    assert_eq!(scene.body.calls.wake, 1);
    assert_eq!(
        scene.body.calls.impulses,
        vec![ImpulseCommand::Radial {
            origin,
            radius: 500.0,
            strength: 10_000.0,
            falloff: RadialFalloff::Linear,
            mode: ImpulseMode::VelocityChange,
        }]
    );

    prop.end_play(&mut scene.ctx());
}

#[test]
fn test_any_damage_pushes_away_from_causer() {
    let (mut scene, mut prop) = physicalized(None);

    let event = DamageEvent::Any {
        amount: 2.0,
        instigator_aim: None,
        causer_location: Some(Vec3::new(-100.0, 100.0, 0.0)),
        modifier: DamageTypeModifier::ScaledImpulse { multiplier: 0.5 },
    };
    assert!(prop.handle_damage(&event, &mut scene.ctx()));

    let [ImpulseCommand::Linear { impulse, mode }] = scene.body.calls.impulses[..] else {
        panic!("expected one linear impulse, got {:?}", scene.body.calls.impulses);
    };
    assert_eq!(mode, ImpulseMode::VelocityChange);
    assert!((impulse - Vec3::new(500.0, 0.0, 0.0)).length() < 1e-3);

    prop.end_play(&mut scene.ctx());
}

#[test]
fn test_any_damage_follows_unit_instigator_aim() {
    let (mut scene, mut prop) = physicalized(None);

    let event = DamageEvent::Any {
        amount: 1.0,
        instigator_aim: Some(Vec3::new(0.0, 0.0, 2.0)),
        causer_location: Some(Vec3::new(-100.0, 100.0, 0.0)),
        modifier: DamageTypeModifier::None,
    };
    assert!(prop.handle_damage(&event, &mut scene.ctx()));

    assert_eq!(scene.body.calls.wake, 1);
    let [ImpulseCommand::Linear { impulse, mode }] = scene.body.calls.impulses[..] else {
        panic!("expected one linear impulse, got {:?}", scene.body.calls.impulses);
    };
    assert_eq!(mode, ImpulseMode::VelocityChange);
    assert!((impulse - Vec3::new(0.0, 0.0, 500.0)).length() < 1e-3, "impulse = {impulse}");

    prop.end_play(&mut scene.ctx());
}

#[test]
fn test_radial_damage_explicit_impulse() {
    let origin = Vec3::new(0.0, 50.0, 0.0);
    let blast = |force_wake| DamageEvent::Radial {
        amount: 2.0,
        origin,
        modifier: DamageTypeModifier::ExplicitImpulse {
            power: 100.0,
            force_wake,
        },
    };
    let expected = ImpulseCommand::Radial {
        origin,
        radius: 500.0,
        strength: 800.0,
        falloff: RadialFalloff::Linear,
        mode: ImpulseMode::VelocityChange,
    };

    let (mut scene, mut prop) = physicalized(None);
    assert!(prop.handle_damage(&blast(false), &mut scene.ctx()));
    assert_eq!(scene.body.calls.wake, 0);
    assert_eq!(scene.body.calls.impulses, vec![expected]);
    prop.end_play(&mut scene.ctx());

    let (mut scene, mut prop) = physicalized(None);
    assert!(prop.handle_damage(&blast(true), &mut scene.ctx()));
    assert_eq!(scene.body.calls.wake, 1);
    assert_eq!(scene.body.calls.impulses, vec![expected]);
    prop.end_play(&mut scene.ctx());
}

#[test]
fn test_damage_ignored_while_not_simulating() {
    let (mut scene, mut prop) = physicalized(None);
    scene.body.simulating = false;

    let event = DamageEvent::Radial {
        amount: 5.0,
        origin: Vec3::ZERO,
        modifier: DamageTypeModifier::None,
    };
    assert!(!prop.handle_damage(&event, &mut scene.ctx()));
    assert!(scene.body.calls.impulses.is_empty());
    assert_eq!(scene.body.calls.wake, 0);

    prop.end_play(&mut scene.ctx());

    // Never physicalized
    let mut scene = SandboxScene::new(Vec3::ZERO, 1.0);
    scene.body.simulating = true;
    let mut prop = PropController::new(config(), None);
    assert!(!prop.handle_damage(&event, &mut scene.ctx()));
    assert!(scene.body.calls.impulses.is_empty());
}

// ============================================================================
// Impact audio
// ============================================================================

#[test]
fn test_hit_plays_cue_at_impact_point() {
    let (mut scene, mut prop) = physicalized(Some(table()));

    // Mass 10: intensity 15000 sits an eighth of the way up [10000, 50000]
    prop.handle_body_event(hit(150_000.0, Some(MaterialId(4))), &mut scene.ctx());

    assert_eq!(scene.world.sounds.len(), 1);
    let cue = scene.world.sounds[0];
    assert_eq!(cue.sound, SoundId(4));
    assert_eq!(cue.location, Vec3::new(5.0, 0.0, 5.0));
    assert!((cue.volume - 0.5 * 0.3).abs() < 1e-4, "volume = {}", cue.volume);
    assert!(cue.pitch >= MIN_IMPACT_PITCH && cue.pitch <= MAX_IMPACT_PITCH);

    prop.end_play(&mut scene.ctx());
}

#[test]
fn test_hit_threshold_boundary() {
    let (mut scene, mut prop) = physicalized(Some(table()));

    // Exactly 10000 after dividing by mass 10
    prop.handle_body_event(hit(100_000.0, None), &mut scene.ctx());
    assert_eq!(scene.world.sounds.len(), 1);

    scene.world.time += 1.0;
    prop.handle_body_event(hit(99_990.0, None), &mut scene.ctx());
    assert_eq!(scene.world.sounds.len(), 1);

    prop.end_play(&mut scene.ctx());
}

#[test]
fn test_hits_inside_cooldown_are_dropped() {
    let (mut scene, mut prop) = physicalized(Some(table()));
    scene.world.time = 2.0;

    prop.handle_body_event(hit(500_000.0, None), &mut scene.ctx());
    scene.world.time = 2.05;
    prop.handle_body_event(hit(500_000.0, None), &mut scene.ctx());
    assert_eq!(scene.world.sounds.len(), 1);

    scene.world.time = 2.15;
    prop.handle_body_event(hit(500_000.0, None), &mut scene.ctx());
    assert_eq!(scene.world.sounds.len(), 2);
    assert_eq!(prop.impact_audio().last_impact_time(), Some(2.15));

    prop.end_play(&mut scene.ctx());
}

#[test]
fn test_no_table_means_silence() {
    let (mut scene, mut prop) = physicalized(None);
    prop.handle_body_event(hit(1e9, None), &mut scene.ctx());
    assert!(scene.world.sounds.is_empty());

    prop.set_impact_table(Some(table()));
    prop.handle_body_event(hit(1e9, None), &mut scene.ctx());
    assert_eq!(scene.world.sounds.len(), 1);

    prop.end_play(&mut scene.ctx());
}

#[test]
fn test_falling_prop_sounds_on_landing() {
    let mut scene = SandboxScene::new(Vec3::new(0.0, 300.0, 0.0), 10.0);
    let mut prop = PropController::new(
        PropConfig {
            min_impact_threshold: 100.0,
            ..config()
        },
        Some(table()),
    );
    prop.physicalize(&mut scene.ctx());

    for _ in 0..600 {
        scene.step(&mut prop, 1.0 / 60.0);
    }

    assert!(!scene.world.sounds.is_empty());
    let first = scene.world.sounds[0];
    assert_eq!(first.sound, SoundId(1));
    assert!(first.location.y.abs() < 1e-3);
    assert!(!scene.body.awake);

    prop.end_play(&mut scene.ctx());
}

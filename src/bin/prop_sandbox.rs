//! Prop Sandbox - Scripted Scenario Runner
//!
//! Runs a single physics prop through the in-memory host and logs what the
//! controller does: settle, grab, carry into a wall, throw, take damage,
//! get rested by distance, fall out of the world.
//!
//! Run with: `cargo run --bin prop_sandbox [config.json]`
//!
//! Logging follows `RUST_LOG` (default `debug`).

use std::sync::Arc;

use glam::{Quat, Vec3};
use tracing::info;
use tracing_subscriber::EnvFilter;

use physics_prop_engine::audio::ImpactTable;
use physics_prop_engine::config::{ConfigError, PropConfig};
use physics_prop_engine::host::{
    ActorId, HolderId, HolderOwner, HolderPose, PhysicsBody, Viewpoint,
};
use physics_prop_engine::physics::{DamageEvent, DamageTypeModifier};
use physics_prop_engine::prop::PropController;
use physics_prop_engine::sandbox::{Obstacle, SandboxScene};

const FRAME: f32 = 1.0 / 60.0;
const HAND: HolderId = HolderId(1);
const PLAYER: ActorId = ActorId(2);

const IMPACT_TABLE_JSON: &str = r#"{
    "entries": {
        "1": { "sound": 11, "volume_multiplier": 0.7 },
        "2": { "sound": 12 }
    },
    "default_entry": { "sound": 10 }
}"#;

fn load_config() -> Result<PropConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => PropConfig::from_json_file(path)?,
        None => PropConfig::default(),
    };

    Ok(PropConfig {
        rng_seed: config.rng_seed.or(Some(42)),
        // Sandbox impulses are small next to an engine's; hear every landing
        min_impact_threshold: config.min_impact_threshold.min(100.0),
        ..config
    })
}

fn run(scene: &mut SandboxScene, prop: &mut PropController, seconds: f32) {
    let frames = (seconds / FRAME).round() as u32;
    for _ in 0..frames {
        scene.step(prop, FRAME);
        if scene.owner.destroyed {
            break;
        }
    }
}

fn hand_at(scene: &mut SandboxScene, location: Vec3, velocity: Vec3) {
    scene.world.set_holder(
        HAND,
        HolderPose {
            location,
            rotation: Quat::IDENTITY,
            owner: Some(HolderOwner {
                actor: PLAYER,
                velocity,
                is_mover: true,
            }),
        },
    );
}

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .init();

    let config = load_config()?;
    let table = Arc::new(ImpactTable::from_json_str(IMPACT_TABLE_JSON)?);

    info!(?config, "Prop sandbox v{}", env!("CARGO_PKG_VERSION"));

    let mut scene = SandboxScene::new(Vec3::new(0.0, 150.0, -120.0), 20.0);
    scene.world.set_viewpoint(Some(Viewpoint {
        location: Vec3::new(0.0, 170.0, 0.0),
        rotation: Quat::IDENTITY,
    }));
    scene.world.add_obstacle(Obstacle::new(
        Vec3::new(-200.0, 0.0, -330.0),
        Vec3::new(200.0, 300.0, -300.0),
        None,
    ));
    hand_at(&mut scene, Vec3::new(0.0, 150.0, 0.0), Vec3::ZERO);

    let mut prop = PropController::try_new(config, Some(table))?;

    // 1. Settle
    scene.body.simulating = true;
    prop.begin_play(&mut scene.ctx());
    run(&mut scene, &mut prop, 2.0);
    info!(location = ?scene.owner.location, awake = scene.body.awake, "settled");

    // 2. Grab and walk into the wall
    prop.grab(HAND, &mut scene.ctx());
    for step in 0..120 {
        let z = -(step as f32) * 2.0;
        hand_at(&mut scene, Vec3::new(0.0, 150.0, z), Vec3::new(0.0, 0.0, -120.0));
        run(&mut scene, &mut prop, FRAME);
    }
    info!(location = ?scene.owner.location, "carried up to the wall");

    // 3. Throw back toward the player's right
    prop.throw(Vec3::new(1.0, 0.5, 1.0), 1500.0, &mut scene.ctx());
    run(&mut scene, &mut prop, 4.0);
    info!(
        location = ?scene.owner.location,
        ccd = scene.body.ccd,
        ccd_toggles = scene.body.calls.set_ccd.len(),
        "throw landed"
    );

    // 4. Get shot, then caught in a blast
    let shot = DamageEvent::Point {
        amount: 25.0,
        shot_direction: Vec3::NEG_X,
        hit_location: scene.body.location + Vec3::Y * 10.0,
        hit_part: None,
        modifier: DamageTypeModifier::None,
    };
    prop.handle_damage(&shot, &mut scene.ctx());
    run(&mut scene, &mut prop, 2.0);

    let blast = DamageEvent::Radial {
        amount: 1.0,
        origin: scene.body.location - Vec3::Y * 50.0,
        modifier: DamageTypeModifier::ExplicitImpulse {
            power: 150.0,
            force_wake: true,
        },
    };
    prop.handle_damage(&blast, &mut scene.ctx());
    run(&mut scene, &mut prop, 3.0);
    info!(location = ?scene.owner.location, "after damage");

    // 5. Walk away
    scene.world.set_viewpoint(Some(Viewpoint {
        location: scene.body.location + Vec3::new(10_000.0, 0.0, 0.0),
        rotation: Quat::IDENTITY,
    }));
    run(&mut scene, &mut prop, 2.0);
    info!(
        tier = ?prop.proximity().tier(),
        tick_interval = scene.body.tick_interval,
        "viewer left"
    );

    // 6. Fall through the floor
    scene.body.ground = None;
    scene.body.wake();
    scene.dispatch_events(&mut prop);
    scene.body.location.y = -25_000.0;
    run(&mut scene, &mut prop, 2.0);
    info!(culled = prop.is_culled(), destroyed = scene.owner.destroyed, "out of the world");

    prop.end_play(&mut scene.ctx());

    info!(
        sounds = scene.world.sounds.len(),
        impulses = scene.body.calls.impulses.len(),
        sleeps = scene.body.calls.put_to_sleep,
        "done"
    );
    Ok(())
}

//! Composition root for a single physics prop.
//!
//! [`PropController`] owns the grab state machine, the CCD gate, the
//! proximity scheduler and the impact-audio trigger, and routes host
//! lifecycle calls and events to them. It holds no references to the host:
//! every call brings a [`PropContext`] with the body, owner and world to
//! act on, and the body is ignored unless it is the one that was
//! physicalized.

use std::sync::Arc;

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{CollisionHit, ImpactAudioTrigger, ImpactTable};
use crate::config::{ConfigError, PropConfig};
use crate::host::{
    BodyEvent, BodyEvents, BodyId, DamageEvents, HolderId, PhysicsBody, PropOwner, PropWorld,
    SleepFamily, TimerHandle,
};
use crate::physics::impulse::{DamageEvent, apply_damage};
use crate::systems::proximity_system::restore_native_tick;
use crate::systems::{CcdGate, GrabController, ProximityOutcome, ProximityScheduler};

/// Linear and angular damping applied at physicalization so props come
/// to rest quickly.
pub const PROP_DAMPING: f32 = 0.5;

/// Host objects a controller call acts on.
pub struct PropContext<'a> {
    /// The body to drive, if the host still has one.
    pub body: Option<&'a mut dyn PhysicsBody>,
    pub owner: &'a mut dyn PropOwner,
    pub world: &'a mut dyn PropWorld,
}

impl<'a> PropContext<'a> {
    pub fn new(
        body: Option<&'a mut dyn PhysicsBody>,
        owner: &'a mut dyn PropOwner,
        world: &'a mut dyn PropWorld,
    ) -> Self {
        Self { body, owner, world }
    }
}

/// Resolve the context body if it is the managed one.
fn managed_body<'b, 'a: 'b>(
    managed: Option<BodyId>,
    slot: &'b mut Option<&'a mut dyn PhysicsBody>,
) -> Option<&'b mut (dyn PhysicsBody + 'a)> {
    let body = slot.as_deref_mut()?;
    let id = body.id();
    (Some(id) == managed).then_some(body)
}

/// Interactive, self-optimizing physics prop.
///
/// # Example
///
/// ```ignore
/// let mut prop = PropController::new(PropConfig::default(), Some(table));
///
/// prop.physicalize(&mut PropContext::new(Some(&mut body), &mut owner, &mut world));
///
/// // every frame, while the host says the prop wants it
/// if prop.wants_tick() {
///     prop.tick(&mut PropContext::new(Some(&mut body), &mut owner, &mut world));
/// }
/// ```
pub struct PropController {
    config: PropConfig,
    body: Option<BodyId>,
    tick_enabled: bool,
    culled: bool,
    grab: GrabController,
    ccd: CcdGate,
    proximity: ProximityScheduler,
    impact_audio: ImpactAudioTrigger,
    rng: StdRng,
}

impl PropController {
    /// Build a controller from an already validated config.
    ///
    /// Values are taken as given: a non-positive `distance_check_interval`
    /// or a zero `cull_distance` leaves the proximity timer unarmed. Use
    /// [`try_new`](Self::try_new) for configs from untrusted sources.
    pub fn new(config: PropConfig, impact_table: Option<Arc<ImpactTable>>) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            ccd: CcdGate::new(config.ccd_speed_threshold),
            proximity: ProximityScheduler::new(
                config.cull_distance,
                config.distance_check_interval,
            ),
            impact_audio: ImpactAudioTrigger::new(
                impact_table,
                config.min_impact_threshold,
                config.impact_cooldown,
            ),
            grab: GrabController::new(),
            body: None,
            tick_enabled: false,
            culled: false,
            rng,
            config,
        }
    }

    /// Validate `config`, then build the controller.
    pub fn try_new(
        config: PropConfig,
        impact_table: Option<Arc<ImpactTable>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, impact_table))
    }

    pub fn config(&self) -> &PropConfig {
        &self.config
    }

    pub fn body(&self) -> Option<BodyId> {
        self.body
    }

    pub fn is_physicalized(&self) -> bool {
        self.body.is_some()
    }

    /// Whether the safety cull destroyed this prop's owner.
    pub fn is_culled(&self) -> bool {
        self.culled
    }

    /// Whether the host should call [`tick`](Self::tick) this frame.
    pub fn wants_tick(&self) -> bool {
        self.tick_enabled
    }

    pub fn grab_controller(&self) -> &GrabController {
        &self.grab
    }

    pub fn proximity(&self) -> &ProximityScheduler {
        &self.proximity
    }

    pub fn impact_audio(&self) -> &ImpactAudioTrigger {
        &self.impact_audio
    }

    pub fn set_impact_table(&mut self, table: Option<Arc<ImpactTable>>) {
        self.impact_audio.set_table(table);
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Take over the context body: enable simulation and hit notifications,
    /// subscribe to sleep/wake/hit and damage, tune it to rest quickly and
    /// arm the proximity timer.
    ///
    /// Returns `false` if the context has no body.
    pub fn physicalize(&mut self, ctx: &mut PropContext<'_>) -> bool {
        let PropContext { body, owner, world } = ctx;
        let Some(body) = body.as_deref_mut() else {
            tracing::trace!("physicalize ignored, no body");
            return false;
        };

        self.body = Some(body.id());

        body.set_simulate_physics(true);
        body.set_notify_rigid_body_collision(true);
        body.set_generate_overlap_events(false);

        // Ticking is driven by wake events from here on
        owner.set_actor_tick_enabled(false);

        body.set_event_subscriptions(BodyEvents::ALL);
        body.set_sleep_family(SleepFamily::Sensitive);
        body.set_linear_damping(PROP_DAMPING);
        body.set_angular_damping(PROP_DAMPING);

        self.proximity.activate(&mut **world, &mut self.rng);

        owner.set_damage_subscriptions(DamageEvents::ALL);

        tracing::debug!(body = ?self.body, "prop physicalized");
        true
    }

    /// Physicalize the owner's body automatically if nobody did so
    /// explicitly and it is already simulating.
    pub fn begin_play(&mut self, ctx: &mut PropContext<'_>) -> bool {
        if self.body.is_some() {
            return false;
        }
        let simulating = ctx
            .body
            .as_deref()
            .is_some_and(|body| body.is_simulating_physics());
        simulating && self.physicalize(ctx)
    }

    /// Tear down: release a held prop, cancel the proximity timer and
    /// drop all subscriptions.
    pub fn end_play(&mut self, ctx: &mut PropContext<'_>) {
        if self.grab.is_grabbed() {
            self.drop(ctx);
        }

        self.proximity.deactivate(&mut *ctx.world);
        self.tick_enabled = false;

        if let Some(body) = managed_body(self.body, &mut ctx.body) {
            body.set_event_subscriptions(BodyEvents::NONE);
        }
        ctx.owner.set_damage_subscriptions(DamageEvents::NONE);
    }

    /// Per-frame work: CCD gate, then hold repositioning.
    pub fn tick(&mut self, ctx: &mut PropContext<'_>) {
        let PropContext { body, owner, world } = ctx;
        let Some(body) = managed_body(self.body, body) else {
            return;
        };

        self.ccd.update(body);

        if self.grab.is_grabbed() {
            self.grab.update_grabbed_position(&mut **owner, &**world);
        }
    }

    /// Route a fired timer. Timers that are not ours are ignored.
    pub fn on_timer(&mut self, handle: TimerHandle, ctx: &mut PropContext<'_>) {
        if self.proximity.timer() != Some(handle) {
            return;
        }

        let PropContext { body, owner, world } = ctx;
        let Some(body) = managed_body(self.body, body) else {
            return;
        };

        if self.proximity.evaluate(body, &mut **owner, &**world) == ProximityOutcome::Culled {
            self.culled = true;
            self.tick_enabled = false;
            self.proximity.deactivate(&mut **world);
        }
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    /// Dispatch a body notification.
    pub fn handle_body_event(&mut self, event: BodyEvent, ctx: &mut PropContext<'_>) {
        match event {
            BodyEvent::Sleep => self.on_sleep(ctx),
            BodyEvent::Wake => self.on_wake(ctx),
            BodyEvent::Hit(hit) => self.on_hit(&hit, ctx),
        }
    }

    /// Translate a damage notification into an impulse on the body.
    ///
    /// Generic damage also puts a distance-throttled body back on
    /// per-frame ticking, since it is about to move.
    ///
    /// Returns `false` if the body is absent or not simulating.
    pub fn handle_damage(&mut self, event: &DamageEvent, ctx: &mut PropContext<'_>) -> bool {
        let Some(body) = managed_body(self.body, &mut ctx.body) else {
            return false;
        };
        if !apply_damage(body, event) {
            return false;
        }

        if matches!(event, DamageEvent::Any { .. }) && restore_native_tick(body) {
            tracing::trace!("native tick restored by damage");
        }
        true
    }

    fn on_sleep(&mut self, ctx: &mut PropContext<'_>) {
        self.tick_enabled = false;
        ctx.owner.set_actor_tick_enabled(false);
        if ctx.owner.has_authority() {
            ctx.owner.set_replicate_movement(false);
        }
        tracing::trace!("prop asleep");
    }

    fn on_wake(&mut self, ctx: &mut PropContext<'_>) {
        self.tick_enabled = true;
        ctx.owner.set_actor_tick_enabled(true);
        if ctx.owner.has_authority() {
            ctx.owner.set_replicate_movement(true);
        }
        tracing::trace!("prop awake");
    }

    fn on_hit(&mut self, hit: &CollisionHit, ctx: &mut PropContext<'_>) {
        let mass = managed_body(self.body, &mut ctx.body).map_or(0.0, |body| body.mass());
        let now = ctx.world.time_seconds();

        if let Some(cue) = self.impact_audio.evaluate(hit, mass, now, &mut self.rng) {
            ctx.world.play_sound_at(&cue);
        }
    }

    // ========================================================================
    // INTERACTION
    // ========================================================================

    /// Take hold of the prop with `holder`.
    ///
    /// Returns `false` if there is no managed body or the holder does not
    /// resolve.
    pub fn grab(&mut self, holder: HolderId, ctx: &mut PropContext<'_>) -> bool {
        let PropContext { body, owner, world } = ctx;
        let Some(body) = managed_body(self.body, body) else {
            return false;
        };

        let grabbed = self.grab.grab(holder, body, &**owner, &mut **world);
        if grabbed {
            self.tick_enabled = true;
        }
        grabbed
    }

    /// Gently release the held prop.
    ///
    /// Returns `false` if nothing was held.
    pub fn drop(&mut self, ctx: &mut PropContext<'_>) -> bool {
        let PropContext { body, owner, world } = ctx;
        let Some(body) = managed_body(self.body, body) else {
            return false;
        };
        self.grab.drop(body, &**owner, &mut **world)
    }

    /// Release the held prop and launch it along `direction`.
    ///
    /// Returns `false` if nothing was held.
    pub fn throw(&mut self, direction: Vec3, force: f32, ctx: &mut PropContext<'_>) -> bool {
        let PropContext { body, owner, world } = ctx;
        let Some(body) = managed_body(self.body, body) else {
            return false;
        };
        self.grab.throw(direction, force, body, &**owner, &mut **world)
    }

    pub fn is_grabbed(&self) -> bool {
        self.grab.is_grabbed()
    }
}

impl Drop for PropController {
    fn drop(&mut self) {
        if self.proximity.is_active() {
            // The scheduler cancels its token on drop
            tracing::debug!(
                timer = ?self.proximity.timer(),
                "prop controller dropped without end_play, proximity timer cancelled"
            );
        }
    }
}

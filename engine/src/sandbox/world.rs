//! Sandbox scene services: clock, viewpoint, holders, box obstacles,
//! timers and a sound log.

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::Vec3;

use crate::audio::ImpactCue;
use crate::host::{ActorId, HolderId, HolderPose, PropWorld, TimerHandle, TimerToken, Viewpoint};
use crate::physics::collision::{SweepHit, sweep_sphere_aabb};

/// Axis-aligned blocking box, optionally owned by an actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub min: Vec3,
    pub max: Vec3,
    pub actor: Option<ActorId>,
}

impl Obstacle {
    pub fn new(min: Vec3, max: Vec3, actor: Option<ActorId>) -> Self {
        Self { min, max, actor }
    }
}

#[derive(Debug, Clone)]
pub struct SandboxTimer {
    pub period: f32,
    pub looping: bool,
    /// Seconds until the next fire.
    pub remaining: f32,
    pub token: TimerToken,
}

#[derive(Debug, Clone, Default)]
pub struct SandboxWorld {
    pub time: f32,
    pub delta: f32,
    pub viewpoint: Option<Viewpoint>,
    pub holders: HashMap<HolderId, HolderPose>,
    pub obstacles: Vec<Obstacle>,
    /// `(mover, ignored)` pairs currently suppressed.
    pub move_ignores: HashSet<(ActorId, ActorId)>,
    pub sounds: Vec<ImpactCue>,
    pub cleared_timers: Vec<TimerHandle>,
    timers: BTreeMap<u64, SandboxTimer>,
    next_timer: u64,
}

impl SandboxWorld {
    pub fn new() -> Self {
        Self {
            delta: 1.0 / 60.0,
            ..Self::default()
        }
    }

    pub fn set_viewpoint(&mut self, viewpoint: Option<Viewpoint>) {
        self.viewpoint = viewpoint;
    }

    pub fn set_holder(&mut self, id: HolderId, pose: HolderPose) {
        self.holders.insert(id, pose);
    }

    pub fn remove_holder(&mut self, id: HolderId) {
        self.holders.remove(&id);
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// A live timer. Cancelled registrations are not reported.
    pub fn timer(&self, handle: TimerHandle) -> Option<&SandboxTimer> {
        self.timers
            .get(&handle.0)
            .filter(|timer| !timer.token.is_cancelled())
    }

    pub fn active_timer_count(&self) -> usize {
        self.timers
            .values()
            .filter(|timer| !timer.token.is_cancelled())
            .count()
    }

    /// Advance the clock by `dt` and return the timers that fired, in
    /// registration order. A looping timer fires at most once per call.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerHandle> {
        self.time += dt;
        self.delta = dt;
        self.timers.retain(|_, timer| !timer.token.is_cancelled());

        let mut fired = Vec::new();
        let mut finished = Vec::new();
        for (&id, timer) in self.timers.iter_mut() {
            timer.remaining -= dt;
            if timer.remaining > 0.0 {
                continue;
            }
            fired.push(TimerHandle(id));
            if timer.looping {
                timer.remaining += timer.period;
                timer.remaining = timer.remaining.max(0.0);
            } else {
                finished.push(id);
            }
        }
        for id in finished {
            self.timers.remove(&id);
        }
        fired
    }
}

impl PropWorld for SandboxWorld {
    fn time_seconds(&self) -> f32 {
        self.time
    }

    fn delta_seconds(&self) -> f32 {
        self.delta
    }

    fn viewpoint(&self) -> Option<Viewpoint> {
        self.viewpoint
    }

    fn holder(&self, holder: HolderId) -> Option<HolderPose> {
        self.holders.get(&holder).copied()
    }

    fn sweep_sphere(
        &self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        ignored: &[ActorId],
    ) -> Option<SweepHit> {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.actor.is_none_or(|actor| !ignored.contains(&actor)))
            .filter_map(|obstacle| {
                sweep_sphere_aabb(start, end, radius, obstacle.min, obstacle.max).map(|hit| {
                    SweepHit {
                        actor: obstacle.actor,
                        ..hit
                    }
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn set_move_ignore_actor(&mut self, mover: ActorId, ignored: ActorId, ignore: bool) {
        if ignore {
            self.move_ignores.insert((mover, ignored));
        } else {
            self.move_ignores.remove(&(mover, ignored));
        }
    }

    fn set_timer(&mut self, period: f32, looping: bool, token: TimerToken) -> TimerHandle {
        self.next_timer += 1;
        let id = self.next_timer;
        self.timers.insert(
            id,
            SandboxTimer {
                period,
                looping,
                remaining: period,
                token,
            },
        );
        TimerHandle(id)
    }

    fn clear_timer(&mut self, handle: TimerHandle) {
        if self.timers.remove(&handle.0).is_some() {
            self.cleared_timers.push(handle);
        }
    }

    fn play_sound_at(&mut self, cue: &ImpactCue) {
        self.sounds.push(*cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looping_timer_fires_each_period() {
        let mut world = SandboxWorld::new();
        let handle = world.set_timer(1.0, true, TimerToken::new());

        assert!(world.advance(0.5).is_empty());
        assert_eq!(world.advance(0.5), vec![handle]);
        assert!(world.advance(0.5).is_empty());
        assert_eq!(world.advance(0.5), vec![handle]);

        world.clear_timer(handle);
        assert!(world.advance(5.0).is_empty());
        assert_eq!(world.cleared_timers, vec![handle]);
    }

    #[test]
    fn test_one_shot_timer_is_removed() {
        let mut world = SandboxWorld::new();
        let handle = world.set_timer(0.25, false, TimerToken::new());
        assert_eq!(world.advance(0.3), vec![handle]);
        assert_eq!(world.active_timer_count(), 0);
    }

    #[test]
    fn test_cancelled_token_stops_timer() {
        let mut world = SandboxWorld::new();
        let token = TimerToken::new();
        let handle = world.set_timer(0.5, true, token.clone());
        assert_eq!(world.advance(0.5), vec![handle]);

        token.cancel();
        assert_eq!(world.active_timer_count(), 0);
        assert!(world.timer(handle).is_none());
        assert!(world.advance(2.0).is_empty());
    }

    #[test]
    fn test_sweep_skips_ignored_actors_and_picks_nearest() {
        let mut world = SandboxWorld::new();
        let near = Obstacle::new(
            Vec3::new(-50.0, -50.0, -60.0),
            Vec3::new(50.0, 50.0, -50.0),
            Some(ActorId(7)),
        );
        let far = Obstacle::new(
            Vec3::new(-50.0, -50.0, -160.0),
            Vec3::new(50.0, 50.0, -150.0),
            None,
        );
        world.add_obstacle(far);
        world.add_obstacle(near);

        let end = Vec3::new(0.0, 0.0, -300.0);
        let hit = world.sweep_sphere(Vec3::ZERO, end, 10.0, &[]).expect("hit");
        assert_eq!(hit.actor, Some(ActorId(7)));

        let hit = world
            .sweep_sphere(Vec3::ZERO, end, 10.0, &[ActorId(7)])
            .expect("hit");
        assert_eq!(hit.actor, None);
        assert!((hit.location.z + 140.0).abs() < 1e-3);
    }
}

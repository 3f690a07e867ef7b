//! Impact sound trigger.
//!
//! Every collision-hit notification from the body passes through
//! [`ImpactAudioTrigger::evaluate`]. Most are discarded: hits inside the
//! cooldown, hits too soft to hear, surfaces with no sound. The rest come
//! out as an [`ImpactCue`] for the host to play.

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;
use static_assertions::const_assert;

use super::impact_table::ImpactTable;
use crate::host::{ActorId, MaterialId, SoundId};
use crate::physics::interp::map_range_clamped;

/// Intensity at `threshold * INTENSITY_RANGE_SCALE` plays at full volume.
pub const INTENSITY_RANGE_SCALE: f32 = 5.0;

/// Volume of the softest accepted impact.
pub const MIN_IMPACT_VOLUME: f32 = 0.2;
/// Volume of an impact at or above the top of the intensity range.
pub const MAX_IMPACT_VOLUME: f32 = 1.0;

/// Pitch is drawn uniformly from this range on every accepted impact.
pub const MIN_IMPACT_PITCH: f32 = 0.85;
pub const MAX_IMPACT_PITCH: f32 = 1.1;

const_assert!(MIN_IMPACT_VOLUME < MAX_IMPACT_VOLUME);
const_assert!(MIN_IMPACT_PITCH < MAX_IMPACT_PITCH);
const_assert!(INTENSITY_RANGE_SCALE > 1.0);

/// A raw collision-hit notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    /// Normal impulse the solver applied to resolve the contact.
    pub normal_impulse: Vec3,
    pub impact_point: Vec3,
    /// Physical material of the surface that was hit.
    pub material: Option<MaterialId>,
    pub other_actor: Option<ActorId>,
}

/// A sound the host should play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactCue {
    pub sound: SoundId,
    pub location: Vec3,
    pub volume: f32,
    pub pitch: f32,
}

/// Cooldown- and threshold-gated impact sound selection.
pub struct ImpactAudioTrigger {
    table: Option<Arc<ImpactTable>>,
    min_impact_threshold: f32,
    impact_cooldown: f32,
    /// Time of the last accepted impact. Starts unset, so the first hit
    /// is never held back by the cooldown, even at time zero.
    last_impact_time: Option<f32>,
}

impl ImpactAudioTrigger {
    pub fn new(
        table: Option<Arc<ImpactTable>>,
        min_impact_threshold: f32,
        impact_cooldown: f32,
    ) -> Self {
        Self {
            table,
            min_impact_threshold,
            impact_cooldown,
            last_impact_time: None,
        }
    }

    pub fn table(&self) -> Option<&Arc<ImpactTable>> {
        self.table.as_ref()
    }

    pub fn set_table(&mut self, table: Option<Arc<ImpactTable>>) {
        self.table = table;
    }

    pub fn last_impact_time(&self) -> Option<f32> {
        self.last_impact_time
    }

    /// Mass-normalized intensity of a hit.
    ///
    /// Dividing the contact impulse by mass gives a velocity-like value, so
    /// one threshold works for light and heavy props alike. A non-positive
    /// mass leaves the impulse magnitude as is.
    pub fn intensity(normal_impulse: Vec3, mass: f32) -> f32 {
        let magnitude = normal_impulse.length();
        if mass > 0.0 { magnitude / mass } else { magnitude }
    }

    /// Volume for an intensity, before the entry's multiplier.
    pub fn volume_for(&self, intensity: f32) -> f32 {
        map_range_clamped(
            intensity,
            (
                self.min_impact_threshold,
                self.min_impact_threshold * INTENSITY_RANGE_SCALE,
            ),
            (MIN_IMPACT_VOLUME, MAX_IMPACT_VOLUME),
        )
    }

    /// Filter a hit. On acceptance the cue is returned and `now` becomes
    /// the new cooldown reference.
    pub fn evaluate<R: Rng>(
        &mut self,
        hit: &CollisionHit,
        mass: f32,
        now: f32,
        rng: &mut R,
    ) -> Option<ImpactCue> {
        let table = self.table.as_ref()?;

        if let Some(last) = self.last_impact_time {
            if now - last < self.impact_cooldown {
                tracing::trace!(elapsed = now - last, "impact inside cooldown");
                return None;
            }
        }

        let intensity = Self::intensity(hit.normal_impulse, mass);
        if intensity < self.min_impact_threshold {
            return None;
        }

        let entry = table.lookup(hit.material);
        let Some(sound) = entry.sound else {
            tracing::trace!(material = ?hit.material, "no impact sound for surface");
            return None;
        };

        let volume = self.volume_for(intensity) * entry.volume_multiplier;
        let pitch = rng.random_range(MIN_IMPACT_PITCH..=MAX_IMPACT_PITCH);

        self.last_impact_time = Some(now);

        Some(ImpactCue {
            sound,
            location: hit.impact_point,
            volume,
            pitch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ImpactSoundEntry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn table() -> Arc<ImpactTable> {
        Arc::new(
            ImpactTable::new(ImpactSoundEntry::new(SoundId(1), 1.0))
                .with_entry(MaterialId(5), ImpactSoundEntry::new(SoundId(2), 0.5))
                .with_entry(MaterialId(6), ImpactSoundEntry::default()),
        )
    }

    fn hit(impulse: f32, material: Option<MaterialId>) -> CollisionHit {
        CollisionHit {
            normal_impulse: Vec3::new(0.0, impulse, 0.0),
            impact_point: Vec3::new(1.0, 0.0, 0.0),
            material,
            other_actor: None,
        }
    }

    #[test]
    fn test_no_table_is_silent() {
        let mut trigger = ImpactAudioTrigger::new(None, 100.0, 0.1);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(trigger.evaluate(&hit(1e6, None), 1.0, 0.0, &mut rng).is_none());
    }

    #[test]
    fn test_intensity_normalized_by_mass() {
        assert_eq!(ImpactAudioTrigger::intensity(Vec3::new(0.0, 1000.0, 0.0), 10.0), 100.0);
        assert_eq!(ImpactAudioTrigger::intensity(Vec3::new(0.0, 1000.0, 0.0), 0.0), 1000.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(2);

        let mut trigger = ImpactAudioTrigger::new(Some(table()), 100.0, 0.0);
        let cue = trigger.evaluate(&hit(1000.0, None), 10.0, 0.0, &mut rng);
        let cue = cue.expect("intensity at threshold should play");
        assert!((cue.volume - MIN_IMPACT_VOLUME).abs() < 1e-5);

        let mut trigger = ImpactAudioTrigger::new(Some(table()), 100.0, 0.0);
        assert!(trigger.evaluate(&hit(999.0, None), 10.0, 0.0, &mut rng).is_none());
    }

    #[test]
    fn test_cooldown_discards_second_hit() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut trigger = ImpactAudioTrigger::new(Some(table()), 100.0, 0.1);

        assert!(trigger.evaluate(&hit(500.0, None), 1.0, 1.0, &mut rng).is_some());
        assert!(trigger.evaluate(&hit(500.0, None), 1.0, 1.05, &mut rng).is_none());
        assert_eq!(trigger.last_impact_time(), Some(1.0));
        assert!(trigger.evaluate(&hit(500.0, None), 1.0, 1.2, &mut rng).is_some());
        assert_eq!(trigger.last_impact_time(), Some(1.2));
    }

    #[test]
    fn test_first_hit_ignores_cooldown() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut trigger = ImpactAudioTrigger::new(Some(table()), 100.0, 10.0);

        assert!(trigger.evaluate(&hit(500.0, None), 1.0, 0.0, &mut rng).is_some());
        assert_eq!(trigger.last_impact_time(), Some(0.0));
        assert!(trigger.evaluate(&hit(500.0, None), 1.0, 9.0, &mut rng).is_none());
    }

    #[test]
    fn test_volume_mapping_and_multiplier() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut trigger = ImpactAudioTrigger::new(Some(table()), 100.0, 0.0);

        // Top of range, half-volume surface
        let cue = trigger
            .evaluate(&hit(5000.0, Some(MaterialId(5))), 1.0, 0.0, &mut rng)
            .expect("loud hit");
        assert_eq!(cue.sound, SoundId(2));
        assert!((cue.volume - 0.5).abs() < 1e-5);
        assert_eq!(cue.location, Vec3::new(1.0, 0.0, 0.0));

        // Midpoint of [100, 500] -> 0.6
        assert!((trigger.volume_for(300.0) - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_surface_without_sound_is_discarded() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut trigger = ImpactAudioTrigger::new(Some(table()), 100.0, 0.0);
        assert!(trigger.evaluate(&hit(5000.0, Some(MaterialId(6))), 1.0, 0.0, &mut rng).is_none());
        // A discarded hit does not start the cooldown
        assert!(trigger.last_impact_time().is_none());
    }

    #[test]
    fn test_pitch_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut trigger = ImpactAudioTrigger::new(Some(table()), 100.0, 0.0);
        for i in 0..200 {
            let cue = trigger
                .evaluate(&hit(300.0, None), 1.0, i as f32, &mut rng)
                .expect("accepted");
            assert!(cue.pitch >= MIN_IMPACT_PITCH && cue.pitch <= MAX_IMPACT_PITCH);
            assert!(cue.volume >= MIN_IMPACT_VOLUME && cue.volume <= MAX_IMPACT_VOLUME);
        }
    }
}

//! Impact audio
//!
//! Turns raw collision-hit notifications into sound cues: which sound, how
//! loud, at what pitch, or nothing at all.
//!
//! - [`impact_table`] - Material to sound mapping shared by many props
//! - [`impact_trigger`] - Cooldown/threshold filter producing [`ImpactCue`]s

pub mod impact_table;
pub mod impact_trigger;

pub use impact_table::{ImpactSoundEntry, ImpactTable};
pub use impact_trigger::{CollisionHit, ImpactAudioTrigger, ImpactCue};

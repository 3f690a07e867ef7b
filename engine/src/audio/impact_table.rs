//! Impact sound table.
//!
//! Authored outside the controller (typically a JSON asset) and shared
//! read-only between every prop that references it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::host::{MaterialId, SoundId};

/// A sound to play for one surface material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactSoundEntry {
    /// `None` means "no sound for this surface".
    pub sound: Option<SoundId>,
    pub volume_multiplier: f32,
}

impl Default for ImpactSoundEntry {
    fn default() -> Self {
        Self {
            sound: None,
            volume_multiplier: 1.0,
        }
    }
}

impl ImpactSoundEntry {
    pub fn new(sound: SoundId, volume_multiplier: f32) -> Self {
        Self {
            sound: Some(sound),
            volume_multiplier,
        }
    }
}

/// Surface material to impact sound mapping, with a fallback entry.
///
/// # Example
///
/// ```ignore
/// let table = ImpactTable::from_json_str(r#"{
///     "entries": { "1": { "sound": 10, "volume_multiplier": 0.8 } },
///     "default_entry": { "sound": 99 }
/// }"#)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactTable {
    pub entries: HashMap<MaterialId, ImpactSoundEntry>,
    /// Used when the hit surface has no material or no entry.
    pub default_entry: ImpactSoundEntry,
}

impl ImpactTable {
    /// Create an empty table that always resolves to `default_entry`.
    pub fn new(default_entry: ImpactSoundEntry) -> Self {
        Self {
            entries: HashMap::new(),
            default_entry,
        }
    }

    /// Builder-style insert.
    pub fn with_entry(mut self, material: MaterialId, entry: ImpactSoundEntry) -> Self {
        self.entries.insert(material, entry);
        self
    }

    pub fn insert(&mut self, material: MaterialId, entry: ImpactSoundEntry) {
        self.entries.insert(material, entry);
    }

    /// Entry for a surface, falling back to the default entry.
    pub fn lookup(&self, material: Option<MaterialId>) -> &ImpactSoundEntry {
        material
            .and_then(|m| self.entries.get(&m))
            .unwrap_or(&self.default_entry)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wood_table() -> ImpactTable {
        ImpactTable::new(ImpactSoundEntry::new(SoundId(99), 1.0))
            .with_entry(MaterialId(1), ImpactSoundEntry::new(SoundId(10), 0.5))
    }

    #[test]
    fn test_lookup_known_material() {
        let table = wood_table();
        assert_eq!(table.lookup(Some(MaterialId(1))).sound, Some(SoundId(10)));
    }

    #[test]
    fn test_lookup_falls_back_to_default() {
        let table = wood_table();
        assert_eq!(table.lookup(Some(MaterialId(2))).sound, Some(SoundId(99)));
        assert_eq!(table.lookup(None).sound, Some(SoundId(99)));
    }

    #[test]
    fn test_entry_default_has_no_sound() {
        let entry = ImpactSoundEntry::default();
        assert!(entry.sound.is_none());
        assert_eq!(entry.volume_multiplier, 1.0);
    }

    #[test]
    fn test_from_json() {
        let table = ImpactTable::from_json_str(
            r#"{
                "entries": { "1": { "sound": 10, "volume_multiplier": 0.8 } },
                "default_entry": { "sound": 99 }
            }"#,
        )
        .expect("valid table");
        assert_eq!(table.lookup(Some(MaterialId(1))), &ImpactSoundEntry::new(SoundId(10), 0.8));
        assert_eq!(table.default_entry.sound, Some(SoundId(99)));
        assert_eq!(table.default_entry.volume_multiplier, 1.0);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ImpactTable::from_json_str("[1, 2, 3]").is_err());
    }
}

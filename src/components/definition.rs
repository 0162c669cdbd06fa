//! Need Definitions and the Catalog
//!
//! Immutable per-resource configuration, keyed by string id. The catalog is
//! loaded once from config and only ever read afterwards; instances derive
//! their runtime state from it at attach time.

use std::collections::HashMap;
use std::ops::Index;

use bevy_ecs::prelude::*;

use crate::components::need::{Band, NeedKind};

/// Static configuration for one threshold band of one need.
#[derive(Debug, Clone)]
pub struct BandProfile {
    /// Minutes of decay from full at which this band begins.
    pub minutes_from_full: f32,
    /// Movement speed multiplier while in this band.
    pub speed_mult: f32,
    /// Incentive multiplier contributed while in this band.
    pub incentive_mult: f32,
    /// Alert shown while in this band, if any.
    pub alert: Option<String>,
    /// Status icon shown while in this band, if any.
    pub icon: Option<String>,
    /// Slowdown debuff that can randomly trigger in this band, by catalog id.
    pub slowdown: Option<String>,
}

impl Default for BandProfile {
    fn default() -> Self {
        Self {
            minutes_from_full: 0.0,
            speed_mult: 1.0,
            incentive_mult: 1.0,
            alert: None,
            icon: None,
            slowdown: None,
        }
    }
}

/// Per-band table, frozen after construction.
#[derive(Debug, Clone, Default)]
pub struct BandTable([BandProfile; 4]);

impl BandTable {
    pub fn new(profiles: [BandProfile; 4]) -> Self {
        Self(profiles)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Band, &BandProfile)> {
        Band::ALL.iter().map(move |b| (*b, &self.0[b.index()]))
    }
}

impl Index<Band> for BandTable {
    type Output = BandProfile;

    fn index(&self, band: Band) -> &BandProfile {
        &self.0[band.index()]
    }
}

/// Immutable template describing one resource's name, color, capacity,
/// decay timing, and per-band effects.
#[derive(Debug, Clone)]
pub struct NeedDefinition {
    pub id: String,
    pub name: String,
    pub kind: NeedKind,
    /// Display color name for text and icons.
    pub color: String,
    pub max_value: f32,
    pub min_value: f32,
    /// Scales how quickly this need decays compared to others.
    pub time_scalar: f32,
    /// Minutes to decay from max to min at scalar 1.0. Validated when an
    /// instance is constructed, not here.
    pub minutes_from_max_to_min: f32,
    /// Minutes of decay already elapsed at spawn; `None` starts at full.
    pub starting_minutes_of_decay: Option<f32>,
    /// Alert category this need's alerts replace each other within.
    pub alert_category: String,
    /// Seconds between re-evaluations of this need.
    pub seconds_per_update: f32,
    pub bands: BandTable,
}

/// A randomized slowdown debuff referenced from a band.
#[derive(Debug, Clone)]
pub struct SlowdownSpec {
    pub id: String,
    /// Speed multiplier while the debuff is active, clamped like band mults.
    pub speed_modifier: f32,
    /// How long the debuff lasts once triggered.
    pub duration_seconds: f32,
    /// Minimum time between one debuff ending and the next arming.
    pub cooldown_minutes: f32,
    /// Per-second trigger probability, as a fraction in [0, 1].
    pub chance_per_second: f32,
    /// One-shot message queued when the debuff starts.
    pub start_message: String,
    /// One-shot message queued when the debuff ends.
    pub end_message: String,
}

impl SlowdownSpec {
    pub fn cooldown_seconds(&self) -> f32 {
        self.cooldown_minutes * 60.0
    }
}

/// Validated, immutable need configuration, keyed by identifier.
///
/// Loaded once from config; the engine only reads it.
#[derive(Resource, Debug, Default, Clone)]
pub struct NeedCatalog {
    needs: HashMap<String, NeedDefinition>,
    slowdowns: HashMap<String, SlowdownSpec>,
}

impl NeedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a need definition. Last write wins, matching config order.
    pub fn insert_need(&mut self, def: NeedDefinition) {
        self.needs.insert(def.id.clone(), def);
    }

    pub fn insert_slowdown(&mut self, spec: SlowdownSpec) {
        self.slowdowns.insert(spec.id.clone(), spec);
    }

    pub fn need(&self, id: &str) -> Option<&NeedDefinition> {
        self.needs.get(id)
    }

    pub fn slowdown(&self, id: &str) -> Option<&SlowdownSpec> {
        self.slowdowns.get(id)
    }

    pub fn need_count(&self) -> usize {
        self.needs.len()
    }

    pub fn needs(&self) -> impl Iterator<Item = &NeedDefinition> {
        self.needs.values()
    }
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::*;
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let catalog = catalog_with_hunger();
        assert!(catalog.need("hunger").is_some());
        assert!(catalog.need("bloodlust").is_none());
        assert_eq!(catalog.need_count(), 1);
    }

    #[test]
    fn test_band_table_indexing() {
        let def = hunger_definition();
        assert_eq!(def.bands[Band::ExtraSatisfied].minutes_from_full, 10.0);
        assert_eq!(def.bands[Band::Low].speed_mult, 0.9);
    }
}

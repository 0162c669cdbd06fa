//! Needs Snapshot
//!
//! Read-only dump of an ensemble for the developer inspection surface:
//! serde structs for JSON output plus a flat human-readable table. Not a
//! stable API.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::components::{Band, NeedInstance, Needs};

#[derive(Debug, Clone, Serialize)]
pub struct NeedsSnapshot {
    pub ready: bool,
    /// The ensemble's live tick deadline.
    pub next_update: f64,
    pub needs: Vec<NeedSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NeedSnapshot {
    pub id: String,
    pub kind: String,
    pub value: f32,
    pub max_value: f32,
    pub band: Band,
    pub decay_rate: f32,
    pub debuff_active: bool,
    pub bands: Vec<BandSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BandSnapshot {
    pub band: Band,
    pub threshold: f32,
    pub speed_mult: f32,
    pub incentive_mult: f32,
    pub alert: Option<String>,
    pub icon: Option<String>,
}

/// Capture an ensemble, needs sorted by kind for stable output.
pub fn snapshot(needs: &Needs) -> NeedsSnapshot {
    let mut entries: Vec<&NeedInstance> = needs.iter().collect();
    entries.sort_by_key(|n| n.kind().as_str());
    NeedsSnapshot {
        ready: needs.is_ready(),
        next_update: needs.next_update,
        needs: entries.into_iter().map(snapshot_need).collect(),
    }
}

fn snapshot_need(need: &NeedInstance) -> NeedSnapshot {
    NeedSnapshot {
        id: need.definition_id().to_string(),
        kind: need.kind().to_string(),
        value: need.value(),
        max_value: need.max_value(),
        band: need.band(),
        decay_rate: need.decay_rate(),
        debuff_active: need.debuff().is_active(),
        bands: Band::ALL
            .iter()
            .map(|band| BandSnapshot {
                band: *band,
                threshold: need.threshold_value(*band),
                speed_mult: need.speed_mult(*band),
                incentive_mult: need.incentive_mult(*band),
                alert: need.alert_for(*band).map(str::to_string),
                icon: need.icon_for(*band).map(str::to_string),
            })
            .collect(),
    }
}

impl NeedsSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Flat `"hunger.value" -> "412.3"` style table, the shape the original
    /// debug tooling exposed.
    pub fn table(&self) -> BTreeMap<String, String> {
        let mut table = BTreeMap::new();
        table.insert("ready".to_string(), self.ready.to_string());
        table.insert("next_update".to_string(), format!("{:.2}", self.next_update));
        for need in &self.needs {
            let prefix = &need.kind;
            table.insert(format!("{prefix}.value"), format!("{:.1}", need.value));
            table.insert(format!("{prefix}.band"), need.band.to_string());
            table.insert(
                format!("{prefix}.debuff_active"),
                need.debuff_active.to_string(),
            );
            for band in &need.bands {
                table.insert(
                    format!("{prefix}.{}.threshold", band.band),
                    format!("{:.1}", band.threshold),
                );
                table.insert(
                    format!("{prefix}.{}.speed_mult", band.band),
                    format!("{:.2}", band.speed_mult),
                );
                table.insert(
                    format!("{prefix}.{}.incentive_mult", band.band),
                    format!("{:.2}", band.incentive_mult),
                );
            }
        }
        table
    }
}

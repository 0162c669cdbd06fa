//! Configuration System
//!
//! Loads need and slowdown definitions from needs.toml for easy adjustment
//! without recompiling, and converts them into the immutable `NeedCatalog`
//! the engine reads.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::components::{BandProfile, BandTable, NeedCatalog, NeedDefinition, NeedKind, SlowdownSpec};
use crate::error::NeedsError;

/// Default tuning file path
pub const DEFAULT_NEEDS_PATH: &str = "needs.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub need: Vec<NeedEntry>,
    #[serde(default)]
    pub slowdown: Vec<SlowdownEntry>,
}

/// One need definition as it appears in the tuning file
#[derive(Debug, Clone, Deserialize)]
pub struct NeedEntry {
    pub id: String,
    pub name: String,
    pub kind: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_max_value")]
    pub max_value: f32,
    #[serde(default)]
    pub min_value: f32,
    #[serde(default = "default_scalar")]
    pub decay_scalar: f32,
    #[serde(default = "default_window")]
    pub minutes_from_max_to_min: f32,
    /// Minutes of decay already applied at spawn; omit to start at full.
    #[serde(default)]
    pub starting_minutes_of_decay: Option<f32>,
    #[serde(default = "default_update_rate")]
    pub seconds_per_update: f32,
    /// Defaults to the need's id.
    #[serde(default)]
    pub alert_category: Option<String>,
    #[serde(default)]
    pub extra_satisfied: BandEntry,
    #[serde(default)]
    pub satisfied: BandEntry,
    #[serde(default)]
    pub low: BandEntry,
    #[serde(default)]
    pub critical: BandEntry,
}

/// Per-band tuning
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BandEntry {
    #[serde(default)]
    pub minutes_from_full: f32,
    #[serde(default = "default_mult")]
    pub speed_mult: f32,
    #[serde(default = "default_mult")]
    pub incentive_mult: f32,
    #[serde(default)]
    pub alert: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub slowdown: Option<String>,
}

/// One randomized slowdown debuff definition
#[derive(Debug, Clone, Deserialize)]
pub struct SlowdownEntry {
    pub id: String,
    #[serde(default = "default_mult")]
    pub speed_modifier: f32,
    #[serde(default = "default_slowdown_duration")]
    pub duration_seconds: f32,
    #[serde(default = "default_slowdown_cooldown")]
    pub cooldown_minutes: f32,
    /// Checked once per second while the band is occupied.
    #[serde(default = "default_chance")]
    pub chance_percent: f32,
    #[serde(default = "default_start_message")]
    pub start_message: String,
    #[serde(default = "default_end_message")]
    pub end_message: String,
}

fn default_color() -> String {
    "white".to_string()
}

fn default_max_value() -> f32 {
    600.0
}

fn default_scalar() -> f32 {
    1.0
}

fn default_window() -> f32 {
    60.0
}

fn default_update_rate() -> f32 {
    1.0
}

fn default_mult() -> f32 {
    1.0
}

fn default_slowdown_duration() -> f32 {
    60.0
}

fn default_slowdown_cooldown() -> f32 {
    5.0
}

fn default_chance() -> f32 {
    100.0
}

fn default_start_message() -> String {
    "You feel sluggish.".to_string()
}

fn default_end_message() -> String {
    "You feel normal again.".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NeedsError> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_NEEDS_PATH).unwrap_or_else(|e| {
            tracing::warn!("could not load {DEFAULT_NEEDS_PATH}: {e}; using defaults");
            Self::default()
        })
    }

    /// Validate and freeze into the catalog the engine reads. A bad kind
    /// string is fatal here; decay-window validation waits for instance
    /// construction.
    pub fn build_catalog(&self) -> Result<NeedCatalog, NeedsError> {
        let mut catalog = NeedCatalog::new();
        for entry in &self.slowdown {
            catalog.insert_slowdown(SlowdownSpec {
                id: entry.id.clone(),
                speed_modifier: entry.speed_modifier.clamp(0.05, 10.0),
                duration_seconds: entry.duration_seconds.max(0.0),
                cooldown_minutes: entry.cooldown_minutes.max(0.0),
                chance_per_second: (entry.chance_percent / 100.0).clamp(0.0, 1.0),
                start_message: entry.start_message.clone(),
                end_message: entry.end_message.clone(),
            });
        }
        for entry in &self.need {
            let kind = NeedKind::from_str(&entry.kind).map_err(|_| NeedsError::UnknownNeedKind {
                id: entry.id.clone(),
                kind: entry.kind.clone(),
            })?;
            catalog.insert_need(NeedDefinition {
                id: entry.id.clone(),
                name: entry.name.clone(),
                kind,
                color: entry.color.clone(),
                max_value: entry.max_value,
                min_value: entry.min_value,
                time_scalar: entry.decay_scalar,
                minutes_from_max_to_min: entry.minutes_from_max_to_min,
                starting_minutes_of_decay: entry.starting_minutes_of_decay,
                alert_category: entry
                    .alert_category
                    .clone()
                    .unwrap_or_else(|| entry.id.clone()),
                seconds_per_update: if entry.seconds_per_update > 0.0 {
                    entry.seconds_per_update
                } else {
                    tracing::warn!(
                        need = %entry.id,
                        seconds_per_update = entry.seconds_per_update,
                        "seconds_per_update must be positive, using {}",
                        default_update_rate()
                    );
                    default_update_rate()
                },
                bands: BandTable::new([
                    band_profile(&entry.extra_satisfied),
                    band_profile(&entry.satisfied),
                    band_profile(&entry.low),
                    band_profile(&entry.critical),
                ]),
            });
        }
        Ok(catalog)
    }
}

fn band_profile(entry: &BandEntry) -> BandProfile {
    BandProfile {
        minutes_from_full: entry.minutes_from_full,
        speed_mult: entry.speed_mult,
        incentive_mult: entry.incentive_mult,
        alert: entry.alert.clone(),
        icon: entry.icon.clone(),
        slowdown: entry.slowdown.clone(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            need: vec![
                NeedEntry {
                    id: "hunger".into(),
                    name: "Hunger".into(),
                    kind: "hunger".into(),
                    color: "orange".into(),
                    max_value: 600.0,
                    min_value: 0.0,
                    decay_scalar: 1.0,
                    minutes_from_max_to_min: 60.0,
                    starting_minutes_of_decay: None,
                    seconds_per_update: 1.0,
                    alert_category: None,
                    extra_satisfied: BandEntry {
                        minutes_from_full: 10.0,
                        incentive_mult: 1.1,
                        alert: Some("Sated".into()),
                        icon: Some("hunger-full".into()),
                        ..BandEntry::empty()
                    },
                    satisfied: BandEntry {
                        minutes_from_full: 20.0,
                        ..BandEntry::empty()
                    },
                    low: BandEntry {
                        minutes_from_full: 50.0,
                        speed_mult: 0.9,
                        incentive_mult: 0.9,
                        alert: Some("Hungry".into()),
                        icon: Some("hunger-low".into()),
                        ..BandEntry::empty()
                    },
                    critical: BandEntry {
                        minutes_from_full: 55.0,
                        speed_mult: 0.75,
                        incentive_mult: 0.75,
                        alert: Some("Starving".into()),
                        icon: Some("hunger-critical".into()),
                        slowdown: Some("hunger-pangs".into()),
                        ..BandEntry::empty()
                    },
                },
                NeedEntry {
                    id: "thirst".into(),
                    name: "Thirst".into(),
                    kind: "thirst".into(),
                    color: "aqua".into(),
                    max_value: 600.0,
                    min_value: 0.0,
                    decay_scalar: 1.0,
                    minutes_from_max_to_min: 45.0,
                    starting_minutes_of_decay: None,
                    seconds_per_update: 1.0,
                    alert_category: None,
                    extra_satisfied: BandEntry {
                        minutes_from_full: 8.0,
                        incentive_mult: 1.1,
                        alert: Some("Quenched".into()),
                        icon: Some("thirst-full".into()),
                        ..BandEntry::empty()
                    },
                    satisfied: BandEntry {
                        minutes_from_full: 15.0,
                        ..BandEntry::empty()
                    },
                    low: BandEntry {
                        minutes_from_full: 37.0,
                        speed_mult: 0.9,
                        incentive_mult: 0.9,
                        alert: Some("Thirsty".into()),
                        icon: Some("thirst-low".into()),
                        ..BandEntry::empty()
                    },
                    critical: BandEntry {
                        minutes_from_full: 42.0,
                        speed_mult: 0.7,
                        incentive_mult: 0.75,
                        alert: Some("Parched".into()),
                        icon: Some("thirst-critical".into()),
                        ..BandEntry::empty()
                    },
                },
            ],
            slowdown: vec![SlowdownEntry {
                id: "hunger-pangs".into(),
                speed_modifier: 0.8,
                duration_seconds: 30.0,
                cooldown_minutes: 5.0,
                chance_percent: 2.0,
                start_message: "Hunger pangs slow you down.".into(),
                end_message: "The pangs subside.".into(),
            }],
        }
    }
}

impl BandEntry {
    /// A band with no effects, for struct-update spelling in defaults.
    fn empty() -> Self {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Band;

    #[test]
    fn test_default_config_builds() {
        let config = Config::default();
        let catalog = config.build_catalog().unwrap();
        assert_eq!(catalog.need_count(), 2);
        let hunger = catalog.need("hunger").unwrap();
        assert_eq!(hunger.kind, NeedKind::Hunger);
        assert_eq!(hunger.bands[Band::Low].minutes_from_full, 50.0);
        assert!(catalog.slowdown("hunger-pangs").is_some());
    }

    #[test]
    fn test_parse_minimal_entry() {
        let config: Config = toml::from_str(
            r#"
            [[need]]
            id = "thirst"
            name = "Thirst"
            kind = "thirst"

            [need.low]
            minutes_from_full = 40.0
            speed_mult = 0.85
            "#,
        )
        .unwrap();
        let catalog = config.build_catalog().unwrap();
        let thirst = catalog.need("thirst").unwrap();
        assert_eq!(thirst.max_value, 600.0);
        assert_eq!(thirst.bands[Band::Low].speed_mult, 0.85);
        assert_eq!(thirst.alert_category, "thirst");
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let config: Config = toml::from_str(
            r#"
            [[need]]
            id = "vibes"
            name = "Vibes"
            kind = "vibes"
            "#,
        )
        .unwrap();
        let err = config.build_catalog().unwrap_err();
        assert!(matches!(err, NeedsError::UnknownNeedKind { .. }));
    }

    #[test]
    fn test_nonpositive_update_rate_falls_back() {
        let config: Config = toml::from_str(
            r#"
            [[need]]
            id = "hunger"
            name = "Hunger"
            kind = "hunger"
            seconds_per_update = 0.0
            "#,
        )
        .unwrap();
        let catalog = config.build_catalog().unwrap();
        // A zero cadence would make the ensemble due every tick with a
        // zero-second decay step.
        assert_eq!(catalog.need("hunger").unwrap().seconds_per_update, 1.0);
    }

    #[test]
    fn test_chance_percent_converted_and_clamped() {
        let config: Config = toml::from_str(
            r#"
            [[slowdown]]
            id = "s"
            chance_percent = 250.0
            speed_modifier = 0.001
            "#,
        )
        .unwrap();
        let catalog = config.build_catalog().unwrap();
        let spec = catalog.slowdown("s").unwrap();
        assert_eq!(spec.chance_per_second, 1.0);
        assert_eq!(spec.speed_modifier, 0.05);
    }
}

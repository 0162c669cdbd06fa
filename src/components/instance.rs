//! Need Instance
//!
//! The live, decaying value for one need on one actor. Constructed from a
//! `NeedDefinition` at attach time: the decay rate, the absolute band
//! boundaries, and the per-band modifier tables are all derived once and
//! frozen for the instance's lifetime. Only the current value, the cached
//! band, and the debuff timer mutate afterwards.

use tracing::warn;

use crate::components::debuff::DebuffTimer;
use crate::components::definition::{NeedCatalog, NeedDefinition, SlowdownSpec};
use crate::components::need::{Band, NeedKind};
use crate::effects::{IncentiveModifier, SpeedModifiers};
use crate::error::NeedsError;

/// Band multipliers outside this range are treated as misconfiguration
/// and clamped.
const MULT_MIN: f32 = 0.05;
const MULT_MAX: f32 = 10.0;

/// Sleeping actors never decay across this margin into the Critical band.
const SLEEP_GRACE_SECONDS: f32 = 5.0 * 60.0;

/// Result of a band recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandChange {
    pub old: Band,
    pub new: Band,
}

impl BandChange {
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

/// One need's runtime state on one actor.
#[derive(Debug, Clone)]
pub struct NeedInstance {
    kind: NeedKind,
    definition_id: String,
    name: String,
    color: String,
    alert_category: String,

    current_value: f32,
    max_value: f32,
    min_value: f32,
    /// Units per second, constant for the instance's lifetime.
    decay_rate: f32,

    /// Absolute lower boundary of each band, non-increasing with severity.
    /// Critical's entry is pinned to `min_value`.
    thresholds: [f32; 4],
    speed_mults: [f32; 4],
    incentive_mults: [f32; 4],
    alerts: [Option<String>; 4],
    icons: [Option<String>; 4],
    slowdowns: [Option<SlowdownSpec>; 4],

    /// Cached for change detection; `recompute_band` is the only writer.
    current_band: Band,

    debuff: DebuffTimer,

    update_interval: f32,
}

impl NeedInstance {
    /// Derive a live instance from its definition. Fatal if the decay
    /// window is non-positive or a band references an unknown slowdown.
    pub fn new(def: &NeedDefinition, catalog: &NeedCatalog, now: f64) -> Result<Self, NeedsError> {
        let window_minutes = def.minutes_from_max_to_min * def.time_scalar;
        if window_minutes <= 0.0 {
            return Err(NeedsError::InvalidDecayWindow {
                id: def.id.clone(),
                minutes: window_minutes,
            });
        }
        let decay_rate = def.max_value / (window_minutes * 60.0);

        let current_value = match def.starting_minutes_of_decay {
            Some(minutes) if minutes >= 0.0 => {
                let decayed = def.max_value - decay_rate * minutes * 60.0 * def.time_scalar;
                decayed.clamp(def.min_value, def.max_value)
            }
            _ => def.max_value,
        };

        let mut thresholds = [def.min_value; 4];
        let mut speed_mults = [1.0; 4];
        let mut incentive_mults = [1.0; 4];
        let mut alerts: [Option<String>; 4] = Default::default();
        let mut icons: [Option<String>; 4] = Default::default();
        let mut slowdowns: [Option<SlowdownSpec>; 4] = Default::default();

        for (band, profile) in def.bands.iter() {
            let i = band.index();
            // Critical's boundary coincides with the floor so it matches
            // once nothing else does; its configured minutes are ignored.
            thresholds[i] = if band == Band::Critical {
                def.min_value
            } else {
                let absolute =
                    def.max_value - decay_rate * profile.minutes_from_full * 60.0 * def.time_scalar;
                absolute.clamp(def.min_value, def.max_value)
            };
            speed_mults[i] = profile.speed_mult.clamp(MULT_MIN, MULT_MAX);
            incentive_mults[i] = profile.incentive_mult.clamp(MULT_MIN, MULT_MAX);
            alerts[i] = profile.alert.clone();
            icons[i] = profile.icon.clone();
            slowdowns[i] = match &profile.slowdown {
                Some(slowdown_id) => Some(
                    catalog
                        .slowdown(slowdown_id)
                        .cloned()
                        .ok_or_else(|| NeedsError::UnknownSlowdown {
                            id: def.id.clone(),
                            slowdown: slowdown_id.clone(),
                        })?,
                ),
                None => None,
            };
        }

        if thresholds.windows(2).any(|pair| pair[1] > pair[0]) {
            warn!(
                need = %def.id,
                ?thresholds,
                "band boundaries are not non-increasing with severity; band lookup may skip bands"
            );
        }

        let mut instance = Self {
            kind: def.kind,
            definition_id: def.id.clone(),
            name: def.name.clone(),
            color: def.color.clone(),
            alert_category: def.alert_category.clone(),
            current_value,
            max_value: def.max_value,
            min_value: def.min_value,
            decay_rate,
            thresholds,
            speed_mults,
            incentive_mults,
            alerts,
            icons,
            slowdowns,
            current_band: Band::Critical,
            debuff: DebuffTimer::new(now),
            update_interval: def.seconds_per_update,
        };
        instance.recompute_band();
        Ok(instance)
    }

    pub fn kind(&self) -> NeedKind {
        self.kind
    }

    pub fn definition_id(&self) -> &str {
        &self.definition_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn alert_category(&self) -> &str {
        &self.alert_category
    }

    pub fn value(&self) -> f32 {
        self.current_value
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    pub fn min_value(&self) -> f32 {
        self.min_value
    }

    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    pub fn band(&self) -> Band {
        self.current_band
    }

    pub fn update_interval(&self) -> f32 {
        self.update_interval
    }

    /// Apply `delta_seconds` of decay. Never increases the value; the value
    /// never leaves [min, max]. While sleeping, the step is skipped whenever
    /// it would bring the projected time-to-Critical under five minutes,
    /// which also makes decay a no-op for sleepers already at or below
    /// Critical.
    pub fn decay(&mut self, delta_seconds: f32, sleeping: bool) {
        if delta_seconds <= 0.0 {
            return;
        }
        let projected = (self.current_value - self.decay_rate * delta_seconds)
            .clamp(self.min_value, self.max_value);
        if sleeping && self.time_to_critical_from(projected) < SLEEP_GRACE_SECONDS {
            return;
        }
        self.current_value = projected;
    }

    /// Additive mutation, clamped into [min, max].
    pub fn modify(&mut self, amount: f32) {
        self.current_value = (self.current_value + amount).clamp(self.min_value, self.max_value);
    }

    /// Absolute mutation, clamped into [min, max].
    pub fn set_value(&mut self, amount: f32) {
        self.current_value = amount.clamp(self.min_value, self.max_value);
    }

    /// Snap the value to a band's lower boundary.
    pub fn set_to_band(&mut self, band: Band) {
        self.set_value(self.thresholds[band.index()]);
    }

    /// The band whose boundary is the highest one the value still clears.
    /// Ties between a floor-clamped boundary and Critical resolve toward
    /// the less severe band.
    pub fn band_for_value(&self, value: f32) -> Band {
        for band in [Band::ExtraSatisfied, Band::Satisfied, Band::Low] {
            if value >= self.thresholds[band.index()] {
                return band;
            }
        }
        Band::Critical
    }

    /// Recompute the current band from the current value and update the
    /// cache. Side effects are the caller's job.
    pub fn recompute_band(&mut self) -> BandChange {
        let old = self.current_band;
        let new = self.band_for_value(self.current_value);
        self.current_band = new;
        BandChange { old, new }
    }

    /// Absolute lower boundary of a band.
    pub fn threshold_value(&self, band: Band) -> f32 {
        self.thresholds[band.index()]
    }

    pub fn is_below(&self, band: Band) -> bool {
        self.current_value < self.thresholds[band.index()]
    }

    /// Seconds of decay from the current value to `target`. Infinite if the
    /// decay rate is non-positive, which the construction check makes
    /// unreachable.
    pub fn time_to_value(&self, target: f32) -> f32 {
        if self.decay_rate <= 0.0 {
            return f32::INFINITY;
        }
        (self.current_value - target).abs() / self.decay_rate
    }

    /// Seconds until the value leaves the current band for the next worse
    /// one. `None` in Critical, which has nowhere further to fall.
    pub fn time_to_next_band(&self) -> Option<f32> {
        match self.current_band {
            Band::Critical => None,
            band => Some(self.time_to_value(self.thresholds[band.index()])),
        }
    }

    /// Seconds until the value reaches the floor.
    pub fn time_to_floor(&self) -> f32 {
        self.time_to_value(self.min_value)
    }

    /// Seconds until `value` would enter the Critical band, i.e. fall below
    /// the Low boundary.
    fn time_to_critical_from(&self, value: f32) -> f32 {
        let low_boundary = self.thresholds[Band::Low.index()];
        if value <= low_boundary {
            return 0.0;
        }
        if self.decay_rate <= 0.0 {
            return f32::INFINITY;
        }
        (value - low_boundary) / self.decay_rate
    }

    /// Contribute this need's movement-speed multiplier, including the
    /// debuff's while active. Composition is the accumulator's contract.
    pub fn apply_speed(&self, modifiers: &mut SpeedModifiers) {
        let band_mult = self.speed_mults[self.current_band.index()];
        modifiers.modify(band_mult, band_mult);
        if let Some(debuff_mult) = self.debuff.active_multiplier() {
            modifiers.modify(debuff_mult, debuff_mult);
        }
    }

    /// Contribute this need's incentive multiplier.
    pub fn apply_incentive(&self, modifier: &mut IncentiveModifier) {
        modifier.modify(self.incentive_mults[self.current_band.index()], 0.0);
    }

    /// Alert for the current band, if any.
    pub fn current_alert(&self) -> Option<&str> {
        self.alerts[self.current_band.index()].as_deref()
    }

    /// Status icon for the current band, if any.
    pub fn current_icon(&self) -> Option<&str> {
        self.icons[self.current_band.index()].as_deref()
    }

    pub fn alert_for(&self, band: Band) -> Option<&str> {
        self.alerts[band.index()].as_deref()
    }

    pub fn icon_for(&self, band: Band) -> Option<&str> {
        self.icons[band.index()].as_deref()
    }

    pub fn speed_mult(&self, band: Band) -> f32 {
        self.speed_mults[band.index()]
    }

    pub fn incentive_mult(&self, band: Band) -> f32 {
        self.incentive_mults[band.index()]
    }

    /// Drive the debuff state machine against the current band's spec.
    /// Returns true if its state (and therefore the speed contribution)
    /// changed.
    pub fn tick_debuff(&mut self, now: f64, rng: &mut rand::rngs::SmallRng) -> bool {
        let spec = self.slowdowns[self.current_band.index()].as_ref();
        self.debuff.tick(now, spec, rng)
    }

    pub fn debuff(&self) -> &DebuffTimer {
        &self.debuff
    }

    pub fn debuff_mut(&mut self) -> &mut DebuffTimer {
        &mut self.debuff
    }
}

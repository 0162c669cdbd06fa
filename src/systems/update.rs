//! Needs Tick Driver
//!
//! Runs once per simulation step: decays every due ensemble, drives debuff
//! timers, and — only when a band or debuff actually changed — refreshes
//! the whole ensemble's speed, incentive, and alert contributions. The
//! refresh-everything-on-any-change policy trades a little redone work for
//! guaranteed consistency.

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::components::{Needs, Sleeping};
use crate::effects::{
    AlertSink, IncentiveModifier, IncentiveSink, MovementSpeedSink, SpeedModifiers,
};
use crate::{NeedCatalog, NeedsError, SimClock, SimRng};

/// The externally owned setters the engine writes through, bundled so the
/// cascade has one signature everywhere.
pub struct EffectSinks<'a> {
    pub speed: &'a mut MovementSpeedSink,
    pub alerts: &'a mut AlertSink,
    pub incentives: &'a mut IncentiveSink,
}

/// Per-tick decay and threshold re-evaluation for every ready ensemble
/// whose deadline has elapsed.
pub fn update_needs(
    clock: Res<SimClock>,
    mut rng: ResMut<SimRng>,
    mut speed: ResMut<MovementSpeedSink>,
    mut alerts: ResMut<AlertSink>,
    mut incentives: ResMut<IncentiveSink>,
    mut query: Query<(Entity, &mut Needs, Option<&Sleeping>)>,
) {
    let now = clock.now();
    for (entity, mut needs, sleeping) in query.iter_mut() {
        if !needs.due(now) {
            continue;
        }

        // All instances share one decay granularity: the shortest cadence.
        let min_interval = needs.min_update_interval() as f64;
        let delta_seconds = (now - (needs.next_update - min_interval)) as f32;
        needs.next_update = now + min_interval;

        let is_sleeping = sleeping.is_some();
        let mut changed = false;
        for need in needs.iter_mut() {
            need.decay(delta_seconds, is_sleeping);
            // A debuff transition changes the speed contribution, so it
            // counts as a change for the refresh policy.
            changed |= need.tick_debuff(now, &mut rng.0);
        }
        changed |= needs.recompute_bands();

        if changed {
            debug!(?entity, now, "needs changed, refreshing ensemble effects");
            refresh_ensemble(
                entity,
                &needs,
                &mut EffectSinks {
                    speed: &mut speed,
                    alerts: &mut alerts,
                    incentives: &mut incentives,
                },
            );
        }
    }
}

/// Push the whole ensemble's current contributions into the sinks: speed
/// and incentive accumulators rebuilt from every instance, and each
/// instance's alert shown or its category cleared.
pub fn refresh_ensemble(entity: Entity, needs: &Needs, sinks: &mut EffectSinks<'_>) {
    let mut speed = SpeedModifiers::default();
    let mut incentive = IncentiveModifier::default();
    for need in needs.iter() {
        need.apply_speed(&mut speed);
        need.apply_incentive(&mut incentive);
    }
    sinks.speed.set(entity, speed);
    sinks.incentives.set(entity, incentive);

    for need in needs.iter() {
        match need.current_alert() {
            Some(alert) => sinks.alerts.show(entity, need.alert_category(), alert),
            None => sinks.alerts.clear_category(entity, need.alert_category()),
        }
    }
}

/// Recompute every band after an external mutation and run the refresh
/// cascade if anything moved. Mirrors the tick driver's policy for
/// synchronous, same-tick mutation calls.
pub fn refresh_if_changed(entity: Entity, needs: &mut Needs, sinks: &mut EffectSinks<'_>) {
    if needs.recompute_bands() {
        refresh_ensemble(entity, needs, sinks);
    }
}

/// Actor lifecycle: attach. Loads the ensemble from the catalog and
/// publishes its initial contributions.
pub fn attach_needs(
    entity: Entity,
    needs: &mut Needs,
    catalog: &NeedCatalog,
    now: f64,
    sinks: &mut EffectSinks<'_>,
) -> Result<(), NeedsError> {
    needs.load(catalog, now)?;
    refresh_ensemble(entity, needs, sinks);
    Ok(())
}

/// Actor lifecycle: remove. Clears every alert category this ensemble
/// owned and drops its sink entries.
pub fn detach_needs(entity: Entity, needs: &Needs, sinks: &mut EffectSinks<'_>) {
    for need in needs.iter() {
        sinks.alerts.clear_category(entity, need.alert_category());
    }
    sinks.speed.remove(entity);
    sinks.incentives.remove(entity);
}

/// Actor lifecycle: reset to a freshly spawned state. A full reload plus
/// an unconditional refresh.
pub fn rejuvenate_needs(
    entity: Entity,
    needs: &mut Needs,
    catalog: &NeedCatalog,
    now: f64,
    sinks: &mut EffectSinks<'_>,
) -> Result<(), NeedsError> {
    needs.load(catalog, now)?;
    refresh_ensemble(entity, needs, sinks);
    Ok(())
}
